use chrono::{DateTime, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One tracked step in a vendor's tender process.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Milestone {
    pub date: Option<DateTime<Utc>>,
    pub is_completed: bool,
}

impl Milestone {
    pub fn unset() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        !self.is_completed
    }
}

/// The five tender milestones, in their canonical process order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MilestoneKind {
    NdaReceived,
    NdaSigned,
    RfiSent,
    RfiDue,
    OfferReceived,
}

impl MilestoneKind {
    /// Canonical process order: NDA exchange, RFI round, final offer.
    pub const ALL: [MilestoneKind; 5] = [
        MilestoneKind::NdaReceived,
        MilestoneKind::NdaSigned,
        MilestoneKind::RfiSent,
        MilestoneKind::RfiDue,
        MilestoneKind::OfferReceived,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MilestoneKind::NdaReceived => "NDA Received",
            MilestoneKind::NdaSigned => "NDA Signed",
            MilestoneKind::RfiSent => "RFI Sent",
            MilestoneKind::RfiDue => "RFI Due",
            MilestoneKind::OfferReceived => "Offer Received",
        }
    }

    /// Whether this milestone carries a due-date semantic: its date is a
    /// deadline the vendor can miss, not a record of when something happened.
    pub fn is_due(&self) -> bool {
        matches!(self, MilestoneKind::RfiDue)
    }
}
