//! Core type definitions for call detail records

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One call leg as stored in the CDR table.
///
/// An A-leg carries `bleg_uuid` naming the leg it was transferred to; the
/// B-leg is identified by its own `uuid`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallLegRecord {
    pub id: i64,
    pub caller_number: String,
    pub destination_number: String,
    pub start_stamp: NaiveDateTime,
    pub end_stamp: NaiveDateTime,
    /// Total leg duration in seconds
    pub duration: i64,
    /// Connected (billed) seconds
    pub billsec: i64,
    #[serde(default)]
    pub caller_name: Option<String>,
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub bleg_uuid: Option<String>,
}

impl CallLegRecord {
    /// Lowercased leg uuid, `None` when absent or blank
    pub fn leg_key(&self) -> Option<String> {
        normalize_uuid(self.uuid.as_deref())
    }

    /// Lowercased peer leg uuid, `None` when absent or blank
    pub fn peer_key(&self) -> Option<String> {
        normalize_uuid(self.bleg_uuid.as_deref())
    }
}

fn normalize_uuid(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_ascii_lowercase)
}

/// One logical call as presented to callers.
///
/// For a transferred call this is the A-leg's identity with the B-leg's
/// connected time and destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrelatedRecord {
    pub id: i64,
    pub caller_number: String,
    pub destination_number: String,
    pub start_stamp: NaiveDateTime,
    pub end_stamp: NaiveDateTime,
    pub duration: i64,
    pub billsec: i64,
    pub caller_name: Option<String>,
    pub uuid: Option<String>,
    pub bleg_uuid: Option<String>,
    /// Destination number of the paired leg
    pub transfer_destination: Option<String>,
    /// Ids of every stored row folded into this record, A-leg first
    #[serde(default, skip_serializing)]
    pub source_ids: Vec<i64>,
}

impl CorrelatedRecord {
    /// A leg with no pairing
    pub fn standalone(record: &CallLegRecord) -> Self {
        Self {
            id: record.id,
            caller_number: record.caller_number.clone(),
            destination_number: record.destination_number.clone(),
            start_stamp: record.start_stamp,
            end_stamp: record.end_stamp,
            duration: record.duration,
            billsec: record.billsec,
            caller_name: record.caller_name.clone(),
            uuid: record.uuid.clone(),
            bleg_uuid: record.bleg_uuid.clone(),
            transfer_destination: None,
            source_ids: vec![record.id],
        }
    }

    /// An A-leg merged with its B-leg. Duration and billing come from the B-leg.
    pub fn paired(a_leg: &CallLegRecord, b_leg: &CallLegRecord) -> Self {
        Self {
            duration: b_leg.duration,
            billsec: b_leg.billsec,
            transfer_destination: Some(b_leg.destination_number.clone()),
            source_ids: vec![a_leg.id, b_leg.id],
            ..Self::standalone(a_leg)
        }
    }

    pub fn is_transferred(&self) -> bool {
        self.transfer_destination.is_some()
    }
}
