//! CDR table layout
//!
//! The switch writes this table; the schema here is used to create fresh
//! stores and test fixtures.

use cdr_core::CallLegRecord;
use rusqlite::{params, Connection};

use crate::connection::DbError;

/// Create the cdr table and its indexes if they do not exist
pub fn init_schema(conn: &Connection) -> Result<(), DbError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS cdr (
            id INTEGER PRIMARY KEY,
            caller_id_number TEXT NOT NULL DEFAULT '',
            destination_number TEXT NOT NULL DEFAULT '',
            start_stamp TEXT NOT NULL,
            end_stamp TEXT NOT NULL,
            duration INTEGER NOT NULL DEFAULT 0,
            billsec INTEGER NOT NULL DEFAULT 0,
            caller_name TEXT,
            uuid TEXT,
            bleg_uuid TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_cdr_start_stamp ON cdr(start_stamp);
        CREATE INDEX IF NOT EXISTS idx_cdr_uuid ON cdr(uuid COLLATE NOCASE);",
    )?;
    Ok(())
}

/// Insert one call leg row
pub fn insert_record(conn: &Connection, record: &CallLegRecord) -> Result<(), DbError> {
    conn.execute(
        "INSERT INTO cdr (id, caller_id_number, destination_number, start_stamp, end_stamp,
                          duration, billsec, caller_name, uuid, bleg_uuid)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            record.id,
            record.caller_number,
            record.destination_number,
            record.start_stamp,
            record.end_stamp,
            record.duration,
            record.billsec,
            record.caller_name,
            record.uuid,
            record.bleg_uuid,
        ],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_schema_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM cdr", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
