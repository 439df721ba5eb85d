//! Search command - list calls matching filters

use anyhow::Result;

use crate::cli::{Cli, FilterArgs, OutputFormat};
use crate::output::{colors, human, json, minimal};
use crate::service::CdrService;

pub fn run(cli: &Cli, service: &CdrService, filters: &FilterArgs) -> Result<()> {
    let calls = service.search(&filters.to_query())?;

    match cli.effective_format() {
        OutputFormat::Human => {
            if calls.is_empty() {
                println!("No calls found");
            } else {
                println!(
                    "{}",
                    colors::header(&format!("Calls ({})", colors::format_count(calls.len() as i64)))
                );
                println!();
                for call in &calls {
                    println!("{}", human::format_call(call));
                }
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "success": true,
                "data": calls,
            });
            println!("{}", json::to_string(&output, cli.pretty)?);
        }
        OutputFormat::Minimal => {
            for call in &calls {
                println!("{}", minimal::format_call(call));
            }
        }
    }

    Ok(())
}
