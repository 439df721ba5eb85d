//! Stats command - call statistics and distributions

use anyhow::Result;

use crate::cli::{Cli, FilterArgs, OutputFormat};
use crate::output::{human, json};
use crate::service::CdrService;

pub fn run(cli: &Cli, service: &CdrService, filters: &FilterArgs) -> Result<()> {
    let stats = service.stats(&filters.to_query())?;

    match cli.effective_format() {
        OutputFormat::Human => println!("{}", human::format_stats(&stats)),
        OutputFormat::Json => {
            let output = serde_json::json!({
                "success": true,
                "data": stats,
            });
            println!("{}", json::to_string(&output, cli.pretty)?);
        }
        OutputFormat::Minimal => {
            println!(
                "{}\t{}\t{}",
                stats.total_calls, stats.transferred_calls, stats.total_billsec
            );
        }
    }

    Ok(())
}
