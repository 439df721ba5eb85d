//! Show command - one call in detail

use anyhow::{bail, Result};

use crate::cli::{Cli, OutputFormat};
use crate::output::{human, json, minimal};
use crate::service::CdrService;

pub fn run(cli: &Cli, service: &CdrService, id: i64) -> Result<()> {
    let Some(call) = service.detail(id)? else {
        bail!("Call #{} not found", id);
    };

    match cli.effective_format() {
        OutputFormat::Human => println!("{}", human::format_call_detail(&call)),
        OutputFormat::Json => {
            let output = serde_json::json!({
                "success": true,
                "data": call,
            });
            println!("{}", json::to_string(&output, cli.pretty)?);
        }
        OutputFormat::Minimal => println!("{}", minimal::format_call(&call)),
    }

    Ok(())
}
