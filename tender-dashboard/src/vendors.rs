//! The fixed vendor list seeded into an empty `timelines` table.

/// Days from "now" used as the default RFI due date on seeded rows.
pub const SEED_DUE_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedVendor {
    pub company_id: &'static str,
    pub company_name: &'static str,
}

/// Known vendors present in every fresh deployment. Operator-created
/// vendors get timestamp-derived ids instead.
pub const SEED_VENDORS: &[SeedVendor] = &[
    SeedVendor {
        company_id: "northlight-media",
        company_name: "Northlight Media",
    },
    SeedVendor {
        company_id: "vektor-ai",
        company_name: "Vektor AI",
    },
    SeedVendor {
        company_id: "halcyon-studios",
        company_name: "Halcyon Studios",
    },
    SeedVendor {
        company_id: "orbital-data-labs",
        company_name: "Orbital Data Labs",
    },
    SeedVendor {
        company_id: "bluewater-press",
        company_name: "Bluewater Press",
    },
];
