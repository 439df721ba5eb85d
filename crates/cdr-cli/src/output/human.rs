//! Human-readable output formatting

use super::colors::*;
use crate::service::CallView;
use cdr_core::CallStats;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format a call as one list line
pub fn format_call(call: &CallView) -> String {
    let record = &call.record;
    let mut parts = vec![
        colored_id(record.id),
        colored_time(&record.start_stamp.format(TIME_FORMAT).to_string()),
        audio_marker(call.has_audio),
        format!(
            "{} → {}",
            colored_number(&record.caller_number),
            colored_number(&record.destination_number)
        ),
    ];

    if let Some(target) = &record.transfer_destination {
        parts.push(format!("⇒ {}", colored_transfer(target)));
    }

    parts.push(format!("({})", format_duration(record.billsec)));

    if let Some(name) = record.caller_name.as_deref().filter(|n| !n.is_empty()) {
        parts.push(label(name));
    }

    parts.join(" ")
}

/// Format a call with every field
pub fn format_call_detail(call: &CallView) -> String {
    let record = &call.record;
    let mut lines = vec![header(&format!("Call #{}", record.id)), String::new()];

    let mut field = |name: &str, text: String| {
        lines.push(format!("  {}: {}", label(name), text));
    };

    field("Caller", colored_number(&record.caller_number));
    if let Some(name) = &record.caller_name {
        field("Caller name", value(name));
    }
    field("Destination", colored_number(&record.destination_number));
    if let Some(target) = &record.transfer_destination {
        field("Transferred to", colored_transfer(target));
    }
    field("Start", value(&record.start_stamp.format(TIME_FORMAT).to_string()));
    field("End", value(&record.end_stamp.format(TIME_FORMAT).to_string()));
    field("Duration", value(&format_duration(record.duration)));
    field("Billed", value(&format_duration(record.billsec)));
    if let Some(uuid) = &record.uuid {
        field("UUID", value(uuid));
    }
    match &call.recording {
        Some(path) => field("Recording", value(&path.display().to_string())),
        None => field("Recording", label("none")),
    }

    lines.join("\n")
}

/// Format call statistics
pub fn format_stats(stats: &CallStats) -> String {
    let mut lines = vec![header("Call Statistics"), String::new()];

    lines.push(format!(
        "  {}: {}",
        label("Calls"),
        format_count(stats.total_calls as i64)
    ));
    lines.push(format!(
        "  {}: {}",
        label("Answered"),
        format_count(stats.answered_calls as i64)
    ));
    lines.push(format!(
        "  {}: {}",
        label("Transferred"),
        format_count(stats.transferred_calls as i64)
    ));
    lines.push(format!(
        "  {}: {} (avg {})",
        label("Billed"),
        format_duration(stats.total_billsec),
        format_duration(stats.average_billsec.round() as i64)
    ));

    if !stats.by_day.is_empty() {
        lines.push(String::new());
        lines.push(header("By day"));
        for day in &stats.by_day {
            lines.push(format!("  {}  {}", day.date, format_count(day.count as i64)));
        }
    }

    lines.push(String::new());
    lines.push(header("By duration"));
    for bucket in &stats.by_duration {
        lines.push(format!(
            "  {:<7} {}",
            bucket.label,
            format_count(bucket.count as i64)
        ));
    }

    lines.join("\n")
}
