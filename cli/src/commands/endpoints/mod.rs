//! # tpmprobe Endpoints Command
//!
//! File: cli/src/commands/endpoints/mod.rs
//!
//! ## Overview
//!
//! Implements `tpmprobe endpoints`, which lists the backend operations the
//! probe can exercise together with the method and path each one uses.
//!
//! ```bash
//! tpmprobe endpoints
//! tpmprobe endpoints --id 42
//! ```
//!
use crate::commands::probe::catalog::{PathParams, ALL_OPERATIONS};
use crate::core::error::Result;
use clap::Parser;
use clap::ValueEnum;
use tracing::info;

/// # Endpoints Arguments (`EndpointsArgs`)
#[derive(Parser, Debug)]
#[command(about = "List the backend operations the probe can send")]
pub struct EndpointsArgs {
    /// TPM ID substituted into the example paths.
    #[arg(long, default_value = "1")]
    pub id: String,
}

/// Prints one line per operation: CLI name, label, method, path pattern, example path, body.
pub async fn handle_endpoints(args: EndpointsArgs) -> Result<()> {
    info!("Handling endpoints command with args: {:?}", args);
    print!("{}", render_table(&args.id));
    Ok(())
}

fn render_table(id: &str) -> String {
    let params = PathParams {
        id: id.to_string(),
        ..Default::default()
    };
    let mut out = format!(
        "{:<18} {:<18} {:<7} {:<33} {:<38} {}\n",
        "OPERATION", "LABEL", "METHOD", "PATTERN", "EXAMPLE", "BODY"
    );
    for op in ALL_OPERATIONS {
        let name = op
            .to_possible_value()
            .map(|v| v.get_name().to_string())
            .unwrap_or_default();
        out.push_str(&format!(
            "{:<18} {:<18} {:<7} {:<33} {:<38} {}\n",
            name,
            op.label(),
            op.method().as_str(),
            op.path_template(),
            op.path(&params),
            if op.carries_body() { "TpmPayload JSON" } else { "none" }
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_lists_every_operation() {
        let table = render_table("9");
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 1 + ALL_OPERATIONS.len());
        assert!(lines[0].starts_with("OPERATION"));
        assert!(table.contains("/update_tpm/9"));
        assert!(table.contains("/update_tpm/{id}"));
        assert!(table.contains("/get_swatch_config?colorName=DIELINE"));
        let create = lines.iter().find(|l| l.starts_with("create-tpm")).unwrap();
        assert!(create.contains("POST"));
        assert!(create.ends_with("TpmPayload JSON"));
    }
}
