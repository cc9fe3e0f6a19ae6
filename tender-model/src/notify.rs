use chrono::{DateTime, Duration, Utc};

use crate::{
    milestone::{Milestone, MilestoneKind},
    notification::{Notification, NotificationKind},
    timeline::CompanyTimeline,
};

/// Look-ahead window for upcoming-due alerts, in days.
pub const UPCOMING_WINDOW_DAYS: i64 = 3;

/// Derive the notification list from current timeline state.
///
/// Evaluated per timeline, per milestone, first match wins per milestone, so
/// each milestone contributes at most one notification:
///
/// 1. due-semantic milestone, not completed, date in the past -> overdue
/// 2. not completed, date inside the look-ahead window -> upcoming due
/// 3. completed -> stage completed
///
/// Completed stages re-notify on every derivation. There is no
/// acknowledgment store to dedup against, so the list is a pure function of
/// `(timelines, now)`.
///
/// The result is ordered by descending severity; within a severity the
/// timeline/milestone order is preserved.
pub fn derive_notifications(
    timelines: &[CompanyTimeline],
    now: DateTime<Utc>,
) -> Vec<Notification> {
    let mut notifications = Vec::new();

    for timeline in timelines {
        for (kind, milestone) in timeline.milestones() {
            if let Some(notification) =
                evaluate_milestone(timeline, kind, milestone, now)
            {
                notifications.push(notification);
            }
        }
    }

    notifications.sort_by(|a, b| b.severity.cmp(&a.severity));
    notifications
}

fn evaluate_milestone(
    timeline: &CompanyTimeline,
    kind: MilestoneKind,
    milestone: &Milestone,
    now: DateTime<Utc>,
) -> Option<Notification> {
    if milestone.is_completed {
        return Some(Notification::new(
            &timeline.company_id,
            kind,
            NotificationKind::StageCompleted,
            format!("{}: {} completed", timeline.company_name, kind.label()),
        ));
    }

    let date = milestone.date?;

    if kind.is_due() && date < now {
        return Some(Notification::new(
            &timeline.company_id,
            kind,
            NotificationKind::Overdue,
            format!(
                "{}: {} was due {}",
                timeline.company_name,
                kind.label(),
                date.format("%Y-%m-%d")
            ),
        ));
    }

    let window_end = now + Duration::days(UPCOMING_WINDOW_DAYS);
    if date >= now && date <= window_end {
        return Some(Notification::new(
            &timeline.company_id,
            kind,
            NotificationKind::UpcomingDue,
            format!(
                "{}: {} is due {}",
                timeline.company_name,
                kind.label(),
                date.format("%Y-%m-%d")
            ),
        ));
    }

    None
}
