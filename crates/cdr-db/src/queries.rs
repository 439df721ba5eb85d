//! Database query functions

use chrono::NaiveDateTime;
use rusqlite::{OptionalExtension, Row};

use crate::connection::{CdrDb, DbError};
use cdr_core::CallLegRecord;

const RECORD_COLUMNS: &str = "id, caller_id_number, destination_number, start_stamp, end_stamp,
     duration, billsec, caller_name, uuid, bleg_uuid";

/// Filter predicates for CDR queries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CdrQuery {
    /// Case-insensitive substring of the destination number
    pub destination: Option<String>,
    /// Calls starting at or after this time
    pub from: Option<NaiveDateTime>,
    /// Calls ending at or before this time
    pub to: Option<NaiveDateTime>,
}

impl CdrQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    pub fn with_from(mut self, from: NaiveDateTime) -> Self {
        self.from = Some(from);
        self
    }

    pub fn with_to(mut self, to: NaiveDateTime) -> Self {
        self.to = Some(to);
        self
    }
}

impl CdrDb {
    /// Get all rows matching the query, in storage (id) order
    pub fn get_records(&self, query: &CdrQuery) -> Result<Vec<CallLegRecord>, DbError> {
        let mut sql = format!("SELECT {RECORD_COLUMNS} FROM cdr WHERE 1=1");
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(destination) = query.destination.as_deref().filter(|d| !d.is_empty()) {
            sql.push_str(" AND destination_number LIKE ? ESCAPE '\\'");
            params.push(Box::new(like_pattern(destination)));
        }

        if let Some(from) = query.from {
            sql.push_str(" AND start_stamp >= ?");
            params.push(Box::new(from));
        }

        if let Some(to) = query.to {
            sql.push_str(" AND end_stamp <= ?");
            params.push(Box::new(to));
        }

        sql.push_str(" ORDER BY id");

        let mut stmt = self.conn.prepare(&sql)?;
        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let rows = stmt.query_map(param_refs.as_slice(), row_to_record)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }

        Ok(records)
    }

    /// Get a single row by id
    pub fn get_record(&self, id: i64) -> Result<Option<CallLegRecord>, DbError> {
        let sql = format!("SELECT {RECORD_COLUMNS} FROM cdr WHERE id = ?1");
        Ok(self.conn.query_row(&sql, [id], row_to_record).optional()?)
    }

    /// Get the first row (lowest id) carrying a leg uuid, ignoring case
    pub fn get_record_by_uuid(&self, uuid: &str) -> Result<Option<CallLegRecord>, DbError> {
        let sql = format!(
            "SELECT {RECORD_COLUMNS} FROM cdr WHERE uuid = ?1 COLLATE NOCASE ORDER BY id LIMIT 1"
        );
        Ok(self
            .conn
            .query_row(&sql, [uuid.trim()], row_to_record)
            .optional()?)
    }

    /// Get every row naming `uuid` as its peer leg, ignoring case, in id order
    pub fn get_records_by_peer_uuid(&self, uuid: &str) -> Result<Vec<CallLegRecord>, DbError> {
        let sql = format!(
            "SELECT {RECORD_COLUMNS} FROM cdr WHERE bleg_uuid = ?1 COLLATE NOCASE ORDER BY id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([uuid.trim()], row_to_record)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }

        Ok(records)
    }
}

fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<CallLegRecord> {
    Ok(CallLegRecord {
        id: row.get(0)?,
        caller_number: row.get(1)?,
        destination_number: row.get(2)?,
        start_stamp: row.get(3)?,
        end_stamp: row.get(4)?,
        duration: row.get(5)?,
        billsec: row.get(6)?,
        caller_name: row.get(7)?,
        uuid: row.get(8)?,
        bleg_uuid: row.get(9)?,
    })
}
