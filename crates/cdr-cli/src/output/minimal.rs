//! Minimal output formatting

use crate::service::CallView;

/// Format a call as tab-separated id, uuid and transfer target
pub fn format_call(call: &CallView) -> String {
    let record = &call.record;
    format!(
        "{}\t{}\t{}",
        record.id,
        record.uuid.as_deref().unwrap_or("-"),
        record.transfer_destination.as_deref().unwrap_or("-")
    )
}
