use serde::{Deserialize, Serialize};

use crate::smtp_verify::CatchAllStatus;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MxRecord {
    pub preference: u16,
    pub exchange: String,
}

impl MxRecord {
    pub fn new(preference: u16, exchange: impl Into<String>) -> Self {
        Self {
            preference,
            exchange: exchange.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MxStatus {
    Records(Vec<MxRecord>),
    NoRecords,
}

impl MxStatus {
    pub fn records(&self) -> &[MxRecord] {
        match self {
            Self::Records(records) => records.as_slice(),
            Self::NoRecords => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MxResolution {
    Found,
    Missing { reason: String },
}

/// Facts gathered once per domain and shared by every address of that
/// domain for the lifetime of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRecord {
    pub domain: String,
    /// Exchanger host names, most preferred first.
    pub exchangers: Vec<String>,
    pub resolution: MxResolution,
    pub catch_all: CatchAllStatus,
    pub disposable: bool,
}

impl DomainRecord {
    pub fn has_mx(&self) -> bool {
        matches!(self.resolution, MxResolution::Found)
    }

    pub fn primary_exchanger(&self) -> Option<&str> {
        self.exchangers.first().map(String::as_str)
    }
}
