#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::milestone::MilestoneKind;

/// Alert severity. Variant order carries the comparison order:
/// `Overdue` notifications outrank `UpcomingDue`, which outrank
/// `StageCompleted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum NotificationKind {
    Overdue,
    UpcomingDue,
    StageCompleted,
}

impl NotificationKind {
    pub fn severity(&self) -> Severity {
        match self {
            NotificationKind::Overdue => Severity::Critical,
            NotificationKind::UpcomingDue => Severity::Warning,
            NotificationKind::StageCompleted => Severity::Info,
        }
    }
}

/// A derived, user-facing alert. Never persisted: recomputed on every fetch
/// from current timeline state, with no identity beyond its field values.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Notification {
    pub company_id: String,
    pub milestone: MilestoneKind,
    pub kind: NotificationKind,
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    pub fn new(
        company_id: impl Into<String>,
        milestone: MilestoneKind,
        kind: NotificationKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            company_id: company_id.into(),
            milestone,
            kind,
            message: message.into(),
            severity: kind.severity(),
        }
    }
}
