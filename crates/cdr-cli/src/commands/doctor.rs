//! Doctor command - diagnose database and recordings configuration

use anyhow::Result;

use cdr_db::{CdrDb, DbError};
use cdr_recordings::RecordingIndex;

use crate::cli::{Cli, OutputFormat};
use crate::config::Settings;
use crate::output::colors;

pub fn run(cli: &Cli, settings: &Settings) -> Result<()> {
    let checks = collect_checks(settings);

    match cli.effective_format() {
        OutputFormat::Human => {
            println!("{}", colors::header("CDR Doctor"));
            println!();

            for check in &checks {
                let status = if check.passed {
                    colors::success(&check.name)
                } else {
                    colors::error(&check.name)
                };
                println!("  {} - {}", status, check.details);
            }

            println!();
            if checks.iter().all(|c| c.passed) {
                println!("{}", colors::success("All checks passed"));
            } else {
                println!("{}", colors::error("Some checks failed"));
                println!();
                println!("Set CDR_DB_PATH and CDR_RECORDINGS_DIR (or --db-path / --recordings-dir).");
            }
        }

        OutputFormat::Json => {
            let output = serde_json::json!({
                "checks": checks.iter().map(|c| serde_json::json!({
                    "name": c.name,
                    "passed": c.passed,
                    "details": c.details
                })).collect::<Vec<_>>(),
                "all_passed": checks.iter().all(|c| c.passed)
            });
            if cli.pretty {
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!("{}", serde_json::to_string(&output)?);
            }
        }

        OutputFormat::Minimal => {
            let failed: Vec<_> = checks.iter().filter(|c| !c.passed).collect();
            if failed.is_empty() {
                println!("ok");
            } else {
                for c in failed {
                    println!("FAIL: {}", c.name);
                }
            }
        }
    }

    Ok(())
}

struct Check {
    name: String,
    passed: bool,
    details: String,
}

fn collect_checks(settings: &Settings) -> Vec<Check> {
    let mut checks = Vec::new();

    match CdrDb::open(&settings.db_path) {
        Ok(db) => {
            checks.push(Check {
                name: "Database".to_string(),
                passed: true,
                details: format!("Opened {}", settings.db_path.display()),
            });
            match db.stats() {
                Ok(stats) => checks.push(Check {
                    name: "Has data".to_string(),
                    passed: stats.record_count > 0,
                    details: format!(
                        "{} records, {} ({} .. {})",
                        colors::format_count(stats.record_count),
                        colors::format_size(stats.db_size_bytes),
                        stats.earliest.as_deref().unwrap_or("-"),
                        stats.latest.as_deref().unwrap_or("-")
                    ),
                }),
                Err(e) => checks.push(Check {
                    name: "Has data".to_string(),
                    passed: false,
                    details: format!("Query failed: {}", e),
                }),
            }
        }
        Err(DbError::NotFound(path)) => checks.push(Check {
            name: "Database".to_string(),
            passed: false,
            details: format!("Not found at {}", path.display()),
        }),
        Err(e) => checks.push(Check {
            name: "Database".to_string(),
            passed: false,
            details: format!("Failed to open: {}", e),
        }),
    }

    let index = RecordingIndex::open(&settings.recordings_dir);
    checks.push(Check {
        name: "Recordings directory".to_string(),
        passed: index.is_enabled(),
        details: if index.is_enabled() {
            format!(
                "{} recordings in {}",
                colors::format_count(index.len() as i64),
                settings.recordings_dir.display()
            )
        } else {
            format!("Not found at {}", settings.recordings_dir.display())
        },
    });

    checks
}
