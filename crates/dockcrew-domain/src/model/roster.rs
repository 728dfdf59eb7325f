//! Labor status view

use serde::{Deserialize, Serialize};

use dockcrew_types::Batch;

/// Labor names split by whether their batch is working
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaborRoster {
    pub free: Vec<String>,
    pub busy: Vec<String>,
}

impl LaborRoster {
    pub fn from_batches<'a>(batches: impl IntoIterator<Item = &'a Batch>) -> Self {
        let mut roster = Self::default();
        for batch in batches {
            let names = batch.members.iter().cloned();
            if batch.is_available() {
                roster.free.extend(names);
            } else {
                roster.busy.extend(names);
            }
        }
        roster
    }
}
