use crate::timeline::CompanyTimeline;

/// Order timelines most-recently-updated first.
///
/// The sort is stable: ties on identical `updated_at` timestamps keep their
/// original fetch order.
pub fn sort_timelines(timelines: &mut [CompanyTimeline]) {
    timelines.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
}
