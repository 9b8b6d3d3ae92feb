use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::catalog::Technology;

/// Per-address availability flags for the three access technologies.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coverage {
    pub address_id: String,
    pub city: String,
    pub district: String,
    pub fiber: bool,
    pub vdsl: bool,
    pub fwa: bool,
}

impl Coverage {
    pub fn has(&self, tech: Technology) -> bool {
        match tech {
            Technology::Fiber => self.fiber,
            Technology::Vdsl => self.vdsl,
            Technology::Fwa => self.fwa,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallSlot {
    pub slot_id: i64,
    pub address_id: String,
    pub slot_start: DateTime<Utc>,
    pub slot_end: DateTime<Utc>,
    pub tech: Technology,
    pub available: bool,
}
