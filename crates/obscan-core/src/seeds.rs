//! Built-in metro seed list.
//!
//! One downtown ZIP per major US metro. Pickup searches return stores within
//! a radius of the seed, so spreading seeds across metros buys coverage.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetroSeed {
    pub postal_code: &'static str,
    pub metro: &'static str,
}

pub const DEFAULT_METRO_SEEDS: &[MetroSeed] = &[
    MetroSeed {
        postal_code: "30303",
        metro: "Atlanta",
    },
    MetroSeed {
        postal_code: "89109",
        metro: "Las Vegas",
    },
    MetroSeed {
        postal_code: "10001",
        metro: "New York",
    },
    MetroSeed {
        postal_code: "19103",
        metro: "Philadelphia",
    },
    MetroSeed {
        postal_code: "15222",
        metro: "Pittsburgh",
    },
    MetroSeed {
        postal_code: "43215",
        metro: "Columbus",
    },
    MetroSeed {
        postal_code: "60601",
        metro: "Chicago",
    },
    MetroSeed {
        postal_code: "63101",
        metro: "St. Louis",
    },
    MetroSeed {
        postal_code: "66204",
        metro: "Overland Park",
    },
    MetroSeed {
        postal_code: "77002",
        metro: "Houston",
    },
    MetroSeed {
        postal_code: "80202",
        metro: "Denver",
    },
    MetroSeed {
        postal_code: "90012",
        metro: "Los Angeles",
    },
    MetroSeed {
        postal_code: "94103",
        metro: "San Francisco",
    },
    MetroSeed {
        postal_code: "98101",
        metro: "Seattle",
    },
];
