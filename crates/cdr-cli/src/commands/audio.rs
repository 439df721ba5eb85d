//! Audio command - resolve a recording and stream it out

use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io;
use std::path::Path;

use cdr_core::CallUuid;
use cdr_recordings::RecordingIndex;

use crate::cli::{Cli, OutputFormat};
use crate::output::{colors, json};

pub fn run(cli: &Cli, index: &RecordingIndex, uuid: &str, output: Option<&Path>) -> Result<()> {
    // Reject malformed input before it reaches the index
    let uuid = CallUuid::parse(uuid)?;

    let Some(path) = index.lookup(&uuid) else {
        bail!("No recording found for call {}", uuid);
    };

    if let Some(target) = output {
        let copied = copy_recording(&path, target)?;
        tracing::info!(uuid = %uuid, bytes = copied, "recording copied");
        if target != Path::new("-") && matches!(cli.effective_format(), OutputFormat::Human) {
            eprintln!(
                "{}",
                colors::success(&format!(
                    "Wrote {} to {}",
                    colors::format_size(copied),
                    target.display()
                ))
            );
        }
        return Ok(());
    }

    match cli.effective_format() {
        OutputFormat::Human | OutputFormat::Minimal => println!("{}", path.display()),
        OutputFormat::Json => {
            let output = serde_json::json!({
                "uuid": uuid,
                "path": path,
            });
            println!("{}", json::to_string(&output, cli.pretty)?);
        }
    }

    Ok(())
}

/// Copy the recording bytes to a file, or stdout for "-"
fn copy_recording(source: &Path, target: &Path) -> Result<u64> {
    let mut reader =
        File::open(source).with_context(|| format!("opening {}", source.display()))?;

    let copied = if target == Path::new("-") {
        io::copy(&mut reader, &mut io::stdout().lock())?
    } else {
        let mut writer =
            File::create(target).with_context(|| format!("creating {}", target.display()))?;
        io::copy(&mut reader, &mut writer)?
    };

    Ok(copied)
}
