//! Versioned feature schemas
//!
//! Each request variant feeds its model through a fixed, ordered list of named
//! feature slots. The slot names are the column names the artifact was trained
//! on; the loader compares them against the artifact metadata at startup so a
//! reordered or renamed column is a load failure instead of a silently wrong
//! prediction.

use serde::Serialize;
use strum::{Display, EnumString};

/// Request variant served by one artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Variant {
    /// Environmental readings plus a timestamp (cyclical time encoding)
    Generation,
    /// Environmental readings plus calendar fields and a source identifier
    Source,
    /// Calendar fields only (consumer load)
    Consumption,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::Generation, Variant::Source, Variant::Consumption];

    pub fn schema(self) -> &'static FeatureSchema {
        match self {
            Variant::Generation => &GENERATION_V1,
            Variant::Source => &SOURCE_V1,
            Variant::Consumption => &CONSUMPTION_V1,
        }
    }

    /// Whether artifacts for this variant must bundle a categorical vocabulary
    pub fn requires_vocabulary(self) -> bool {
        matches!(self, Variant::Source)
    }
}

/// Ordered list of named feature slots
#[derive(Debug, PartialEq, Eq)]
pub struct FeatureSchema {
    pub variant: Variant,
    pub version: u32,
    pub slots: &'static [&'static str],
}

pub const GENERATION_V1: FeatureSchema = FeatureSchema {
    variant: Variant::Generation,
    version: 1,
    slots: &[
        "IRRADIATION",
        "AMBIENT_TEMPERATURE",
        "MODULE_TEMPERATURE",
        "hour_sin",
        "hour_cos",
        "minute_sin",
        "minute_cos",
    ],
};

pub const SOURCE_V1: FeatureSchema = FeatureSchema {
    variant: Variant::Source,
    version: 1,
    slots: &[
        "AMBIENT_TEMPERATURE",
        "MODULE_TEMPERATURE",
        "IRRADIATION",
        "HOUR",
        "DAY",
        "MONTH",
        "SOURCE_ENCODED",
    ],
};

pub const CONSUMPTION_V1: FeatureSchema = FeatureSchema {
    variant: Variant::Consumption,
    version: 1,
    slots: &["HOUR", "DAY", "MONTH"],
};

impl FeatureSchema {
    pub fn width(&self) -> usize {
        self.slots.len()
    }

    pub fn index_of(&self, slot: &str) -> Option<usize> {
        self.slots.iter().position(|s| *s == slot)
    }

    /// Order-sensitive comparison against the columns recorded at training time
    pub fn matches_columns<S: AsRef<str>>(&self, columns: &[S]) -> bool {
        columns.len() == self.slots.len()
            && columns
                .iter()
                .zip(self.slots.iter())
                .all(|(c, s)| c.as_ref() == *s)
    }

    pub fn slot_names(&self) -> Vec<String> {
        self.slots.iter().map(|s| s.to_string()).collect()
    }
}
