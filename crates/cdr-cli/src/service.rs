//! Query façade: storage rows -> correlation -> recording presence

use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

use cdr_core::{correlate, CallStats, CallUuid, CorrelatedRecord};
use cdr_db::{CdrDb, CdrQuery, DbError};
use cdr_recordings::RecordingIndex;

/// A correlated call with its recording status
#[derive(Debug, Clone, Serialize)]
pub struct CallView {
    #[serde(flatten)]
    pub record: CorrelatedRecord,
    pub has_audio: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recording: Option<PathBuf>,
}

/// Serves call queries from the CDR store and the recording index
pub struct CdrService {
    db: CdrDb,
    recordings: Arc<RecordingIndex>,
}

impl CdrService {
    pub fn new(db: CdrDb, recordings: Arc<RecordingIndex>) -> Self {
        Self { db, recordings }
    }

    /// Calls matching the filters, newest first
    pub fn search(&self, query: &CdrQuery) -> Result<Vec<CallView>, DbError> {
        let rows = self.db.get_records(query)?;
        Ok(correlate(&rows)
            .into_iter()
            .map(|record| self.view(record, false))
            .collect())
    }

    /// The call containing record `id`.
    ///
    /// The record is correlated with its leg neighbourhood: the leg it
    /// names, the rows naming that leg, and the rows naming the record. A
    /// B-leg therefore resolves to the call of the A-leg that claims it.
    pub fn detail(&self, id: i64) -> Result<Option<CallView>, DbError> {
        let Some(record) = self.db.get_record(id)? else {
            return Ok(None);
        };

        let mut legs = Vec::new();
        if let Some(peer_uuid) = record.peer_key() {
            legs.extend(self.db.get_record_by_uuid(&peer_uuid)?);
            legs.extend(self.db.get_records_by_peer_uuid(&peer_uuid)?);
        }
        if let Some(uuid) = record.leg_key() {
            // A lower-id row sharing this uuid is the one claimants pair with
            legs.extend(self.db.get_record_by_uuid(&uuid)?);
            legs.extend(self.db.get_records_by_peer_uuid(&uuid)?);
        }
        legs.push(record);
        legs.sort_by_key(|leg| leg.id);
        legs.dedup_by_key(|leg| leg.id);

        Ok(correlate(&legs)
            .into_iter()
            .find(|call| call.source_ids.contains(&id))
            .map(|call| self.view(call, true)))
    }

    /// Statistics over the calls matching the filters
    pub fn stats(&self, query: &CdrQuery) -> Result<CallStats, DbError> {
        let rows = self.db.get_records(query)?;
        Ok(CallStats::from_records(&correlate(&rows)))
    }

    fn view(&self, record: CorrelatedRecord, with_path: bool) -> CallView {
        // Stored uuids are not trusted; only valid ones reach the index
        let uuid = record
            .uuid
            .as_deref()
            .and_then(|uuid| CallUuid::parse(uuid).ok());

        let (has_audio, recording) = match uuid {
            Some(uuid) if with_path => {
                let path = self.recordings.lookup(&uuid);
                (path.is_some(), path)
            }
            Some(uuid) => (self.recordings.has_recording(&uuid), None),
            None => (false, None),
        };

        CallView {
            record,
            has_audio,
            recording,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cdr_core::CallLegRecord;
    use cdr_db::schema::{init_schema, insert_record};
    use chrono::{NaiveDate, NaiveDateTime};
    use rusqlite::Connection;
    use std::fs;
    use tempfile::TempDir;

    pub const A_UUID: &str = "aaaaaaaa-1111-4111-8111-111111111111";
    pub const B_UUID: &str = "bbbbbbbb-2222-4222-9222-222222222222";
    pub const C_UUID: &str = "cccccccc-3333-4333-a333-333333333333";

    fn at(day: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(10, minute, 0)
            .unwrap()
    }

    fn leg(id: i64, day: u32, dest: &str, uuid: Option<&str>, peer: Option<&str>) -> CallLegRecord {
        CallLegRecord {
            id,
            caller_number: "13900001111".into(),
            destination_number: dest.into(),
            start_stamp: at(day, id as u32),
            end_stamp: at(day, id as u32 + 5),
            duration: 10 * id,
            billsec: 9 * id,
            caller_name: Some("客服".into()),
            uuid: uuid.map(String::from),
            bleg_uuid: peer.map(String::from),
        }
    }

    /// A transferred call (1 -> 2), a plain call with a recording (3), and a
    /// plain call with a malformed uuid (4)
    pub struct Fixture {
        pub service: CdrService,
        pub recordings: TempDir,
        _db_dir: TempDir,
    }

    pub fn fixture() -> Fixture {
        fixture_with(&[
            leg(1, 1, "8000", Some(&A_UUID.to_uppercase()), Some(B_UUID)),
            leg(2, 1, "8001", Some(B_UUID), None),
            leg(3, 2, "9000", Some(C_UUID), None),
            leg(4, 3, "8002", Some("not-a-uuid"), None),
        ])
    }

    pub fn fixture_with(records: &[CallLegRecord]) -> Fixture {
        let db_dir = tempfile::tempdir().unwrap();
        let db_path = db_dir.path().join("cdr.db");
        {
            let conn = Connection::open(&db_path).unwrap();
            init_schema(&conn).unwrap();
            for record in records {
                insert_record(&conn, record).unwrap();
            }
        }

        let recordings = tempfile::tempdir().unwrap();
        fs::write(
            recordings.path().join(format!("20240101_{A_UUID}.wav")),
            b"RIFF",
        )
        .unwrap();
        fs::write(
            recordings.path().join(format!("20240102_{C_UUID}.wav")),
            b"RIFF",
        )
        .unwrap();

        let db = CdrDb::open(&db_path).unwrap();
        let index = Arc::new(RecordingIndex::open(recordings.path()));

        Fixture {
            service: CdrService::new(db, index),
            recordings,
            _db_dir: db_dir,
        }
    }

    #[test]
    fn test_search_folds_transfer_and_flags_audio() {
        let fx = fixture();
        let calls = fx.service.search(&CdrQuery::new()).unwrap();

        let ids: Vec<i64> = calls.iter().map(|c| c.record.id).collect();
        assert_eq!(ids, vec![4, 3, 1]);

        let transferred = &calls[2];
        assert_eq!(transferred.record.transfer_destination.as_deref(), Some("8001"));
        assert_eq!(transferred.record.duration, 20);
        assert_eq!(transferred.record.billsec, 18);
        assert!(transferred.has_audio);
        assert!(transferred.recording.is_none());

        assert!(calls[1].has_audio);
        assert!(!calls[0].has_audio);
    }

    #[test]
    fn test_search_filters_destination() {
        let fx = fixture();
        let calls = fx
            .service
            .search(&CdrQuery::new().with_destination("900"))
            .unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].record.id, 3);
    }

    #[test]
    fn test_detail_of_a_leg() {
        let fx = fixture();
        let call = fx.service.detail(1).unwrap().unwrap();

        assert_eq!(call.record.transfer_destination.as_deref(), Some("8001"));
        assert_eq!(call.record.billsec, 18);
        let path = call.recording.unwrap();
        assert!(path.ends_with(format!("20240101_{A_UUID}.wav")));
    }

    #[test]
    fn test_detail_of_b_leg_resolves_to_its_call() {
        let fx = fixture();
        let call = fx.service.detail(2).unwrap().unwrap();

        assert_eq!(call.record.id, 1);
        assert_eq!(call.record.source_ids, vec![1, 2]);
        assert_eq!(call.record.transfer_destination.as_deref(), Some("8001"));
        assert!(call.recording.is_some());
    }

    #[test]
    fn test_detail_of_mutually_referencing_legs() {
        let fx = fixture_with(&[
            leg(4, 1, "7001", Some("leg-y"), Some("leg-x")),
            leg(5, 1, "7002", Some("leg-x"), Some("leg-y")),
        ]);

        for id in [4, 5] {
            let call = fx.service.detail(id).unwrap().unwrap();
            assert_eq!(call.record.id, 4);
            assert_eq!(call.record.source_ids, vec![4, 5]);
            assert_eq!(call.record.transfer_destination.as_deref(), Some("7002"));
            assert!(!call.has_audio);
        }
    }

    #[test]
    fn test_detail_matches_search_for_competing_claims() {
        let fx = fixture_with(&[
            leg(1, 1, "8000", Some(A_UUID), Some(B_UUID)),
            leg(2, 1, "8001", Some(B_UUID), None),
            leg(3, 1, "8002", Some(C_UUID), Some(B_UUID)),
        ]);

        let searched = fx.service.search(&CdrQuery::new()).unwrap();
        for call in &searched {
            let detail = fx.service.detail(call.record.id).unwrap().unwrap();
            assert_eq!(detail.record, call.record);
        }

        // The later claimant stays standalone
        let late = fx.service.detail(3).unwrap().unwrap();
        assert_eq!(late.record.id, 3);
        assert!(late.record.transfer_destination.is_none());
    }

    #[test]
    fn test_detail_missing() {
        let fx = fixture();
        assert!(fx.service.detail(404).unwrap().is_none());
    }

    #[test]
    fn test_recording_lookup_after_new_file() {
        let fx = fixture();
        let uuid = CallUuid::parse(B_UUID).unwrap();
        assert!(fx.service.recordings.cached(&uuid).is_none());

        fs::write(
            fx.recordings.path().join(format!("late_{B_UUID}.wav")),
            b"RIFF",
        )
        .unwrap();
        fx.service.recordings.rebuild_full();

        assert!(fx.service.recordings.lookup(&uuid).is_some());
    }

    #[test]
    fn test_stats() {
        let fx = fixture();
        let stats = fx.service.stats(&CdrQuery::new()).unwrap();
        assert_eq!(stats.total_calls, 3);
        assert_eq!(stats.transferred_calls, 1);
        assert_eq!(stats.by_day.len(), 3);
    }

    #[test]
    fn test_view_serialization() {
        let fx = fixture();
        let call = fx.service.detail(3).unwrap().unwrap();
        let json = serde_json::to_value(&call).unwrap();

        assert_eq!(json["id"], 3);
        assert_eq!(json["has_audio"], true);
        assert!(json["recording"].is_string());
        assert!(json["transfer_destination"].is_null());
    }
}
