use chrono::{DateTime, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::milestone::{Milestone, MilestoneKind};

/// The full tender timeline for one vendor/company.
///
/// `company_id` is stable, assigned at creation and never reused. Milestones
/// are logically ordered, but a later milestone completed while an earlier
/// one is not is tolerated data, never rejected here.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CompanyTimeline {
    pub company_id: String,
    pub company_name: String,
    pub nda_received: Milestone,
    pub nda_signed: Milestone,
    pub rfi_sent: Milestone,
    pub rfi_due: Milestone,
    pub offer_received: Milestone,
    /// Server-assigned on every mutation.
    pub updated_at: DateTime<Utc>,
}

impl CompanyTimeline {
    pub fn milestone(&self, kind: MilestoneKind) -> &Milestone {
        match kind {
            MilestoneKind::NdaReceived => &self.nda_received,
            MilestoneKind::NdaSigned => &self.nda_signed,
            MilestoneKind::RfiSent => &self.rfi_sent,
            MilestoneKind::RfiDue => &self.rfi_due,
            MilestoneKind::OfferReceived => &self.offer_received,
        }
    }

    pub fn milestone_mut(&mut self, kind: MilestoneKind) -> &mut Milestone {
        match kind {
            MilestoneKind::NdaReceived => &mut self.nda_received,
            MilestoneKind::NdaSigned => &mut self.nda_signed,
            MilestoneKind::RfiSent => &mut self.rfi_sent,
            MilestoneKind::RfiDue => &mut self.rfi_due,
            MilestoneKind::OfferReceived => &mut self.offer_received,
        }
    }

    /// Milestones in canonical process order.
    pub fn milestones(
        &self,
    ) -> impl Iterator<Item = (MilestoneKind, &Milestone)> {
        MilestoneKind::ALL
            .into_iter()
            .map(move |kind| (kind, self.milestone(kind)))
    }

    pub fn completed_count(&self) -> usize {
        self.milestones().filter(|(_, m)| m.is_completed).count()
    }
}
