//! Watch command - keep the recording index live and answer lookups

use anyhow::Result;
use serde::Serialize;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::Arc;

use cdr_core::CallUuid;
use cdr_recordings::{RecordingIndex, RecordingWatcher};

use crate::cli::{Cli, OutputFormat};
use crate::output::{colors, json};

/// Answer to one lookup line
#[derive(Debug, Serialize)]
struct LookupAnswer {
    input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub fn run(cli: &Cli, index: Arc<RecordingIndex>, queue: usize) -> Result<()> {
    let watcher = RecordingWatcher::spawn_with_capacity(Arc::clone(&index), queue)?;

    if matches!(cli.effective_format(), OutputFormat::Human) {
        eprintln!(
            "{}",
            colors::success(&format!(
                "Watching {} ({} recordings). Enter call UUIDs, Ctrl+D to stop.",
                index.configured_dir().display(),
                colors::format_count(index.len() as i64)
            ))
        );
    }

    for line in io::stdin().lock().lines() {
        let line = line?;
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let answer = answer(&index, input);
        match cli.effective_format() {
            OutputFormat::Human => match (&answer.path, &answer.error) {
                (Some(path), _) => println!("{} {}", colors::success(input), path.display()),
                (None, Some(err)) => println!("{} {}", colors::error(input), err),
                (None, None) => println!("{} not found", colors::warning(input)),
            },
            OutputFormat::Json => println!("{}", json::to_string(&answer, false)?),
            OutputFormat::Minimal => match &answer.path {
                Some(path) => println!("{}", path.display()),
                None => println!("-"),
            },
        }
    }

    watcher.shutdown();
    Ok(())
}

fn answer(index: &RecordingIndex, input: &str) -> LookupAnswer {
    match CallUuid::parse(input) {
        Ok(uuid) => LookupAnswer {
            input: input.to_string(),
            path: index.lookup(&uuid),
            error: None,
        },
        Err(err) => LookupAnswer {
            input: input.to_string(),
            path: None,
            error: Some(err.to_string()),
        },
    }
}
