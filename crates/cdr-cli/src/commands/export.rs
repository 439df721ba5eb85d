//! Export command - write matching calls as CSV

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::cli::{Cli, FilterArgs, OutputFormat};
use crate::output::colors;
use crate::service::{CallView, CdrService};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const COLUMNS: [&str; 11] = [
    "id",
    "start_stamp",
    "end_stamp",
    "caller_number",
    "caller_name",
    "destination_number",
    "transfer_destination",
    "duration",
    "billsec",
    "uuid",
    "has_audio",
];

/// One CSV line, in `COLUMNS` order
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    id: i64,
    start_stamp: String,
    end_stamp: String,
    caller_number: &'a str,
    caller_name: Option<&'a str>,
    destination_number: &'a str,
    transfer_destination: Option<&'a str>,
    duration: i64,
    billsec: i64,
    uuid: Option<&'a str>,
    has_audio: bool,
}

impl<'a> From<&'a CallView> for ExportRow<'a> {
    fn from(call: &'a CallView) -> Self {
        let record = &call.record;
        Self {
            id: record.id,
            start_stamp: record.start_stamp.format(TIME_FORMAT).to_string(),
            end_stamp: record.end_stamp.format(TIME_FORMAT).to_string(),
            caller_number: &record.caller_number,
            caller_name: record.caller_name.as_deref(),
            destination_number: &record.destination_number,
            transfer_destination: record.transfer_destination.as_deref(),
            duration: record.duration,
            billsec: record.billsec,
            uuid: record.uuid.as_deref(),
            has_audio: call.has_audio,
        }
    }
}

pub fn run(
    cli: &Cli,
    service: &CdrService,
    filters: &FilterArgs,
    output: Option<&Path>,
) -> Result<()> {
    let calls = service.search(&filters.to_query())?;

    let Some(target) = output.filter(|path| *path != Path::new("-")) else {
        write_csv(io::stdout().lock(), &calls)?;
        return Ok(());
    };

    let file = File::create(target).with_context(|| format!("creating {}", target.display()))?;
    write_csv(file, &calls)?;
    tracing::info!(rows = calls.len(), path = %target.display(), "calls exported");

    if matches!(cli.effective_format(), OutputFormat::Human) {
        eprintln!(
            "{}",
            colors::success(&format!(
                "Exported {} calls to {}",
                colors::format_count(calls.len() as i64),
                target.display()
            ))
        );
    }

    Ok(())
}

/// Write the header and one line per call
fn write_csv<W: Write>(writer: W, calls: &[CallView]) -> Result<()> {
    let mut out = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    out.write_record(COLUMNS)?;
    for call in calls {
        out.serialize(ExportRow::from(call))?;
    }
    out.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cdr_core::{CallLegRecord, CorrelatedRecord};
    use chrono::NaiveDate;

    fn leg(id: i64, dest: &str, uuid: &str, peer: Option<&str>) -> CallLegRecord {
        let start = NaiveDate::from_ymd_opt(2024, 2, 1)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        CallLegRecord {
            id,
            caller_number: "13700001111".into(),
            destination_number: dest.into(),
            start_stamp: start,
            end_stamp: start + chrono::Duration::seconds(90),
            duration: 90,
            billsec: 80 + id,
            caller_name: None,
            uuid: Some(uuid.into()),
            bleg_uuid: peer.map(String::from),
        }
    }

    fn export(calls: &[CallView]) -> String {
        let mut buf = Vec::new();
        write_csv(&mut buf, calls).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_header_only_when_empty() {
        assert_eq!(
            export(&[]),
            "id,start_stamp,end_stamp,caller_number,caller_name,destination_number,\
             transfer_destination,duration,billsec,uuid,has_audio\n"
        );
    }

    #[test]
    fn test_rows_follow_correlated_calls() {
        let mut a_leg = leg(1, "8000", "a-leg", Some("b-leg"));
        a_leg.caller_name = Some("Sales, East".into());
        let b_leg = leg(2, "8001", "b-leg", None);

        let calls = vec![
            CallView {
                record: CorrelatedRecord::paired(&a_leg, &b_leg),
                has_audio: true,
                recording: None,
            },
            CallView {
                record: CorrelatedRecord::standalone(&leg(3, "9000", "c-leg", None)),
                has_audio: false,
                recording: None,
            },
        ];

        let out = export(&calls);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[1],
            "1,2024-02-01 08:30:00,2024-02-01 08:31:30,13700001111,\"Sales, East\",8000,8001,90,82,a-leg,true"
        );
        assert_eq!(
            lines[2],
            "3,2024-02-01 08:30:00,2024-02-01 08:31:30,13700001111,,9000,,90,83,c-leg,false"
        );
    }
}
