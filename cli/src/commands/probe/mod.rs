//! # tpmprobe Probe Command
//!
//! File: cli/src/commands/probe/mod.rs
//!
//! ## Overview
//!
//! Implements `tpmprobe probe`: send one hand-built HTTP/1.1 request to the
//! TPM configuration backend over a raw TCP socket and show exactly what came
//! back.
//!
//! ## Architecture
//!
//! - `catalog.rs`: the backend operations (label, method, path template)
//! - `payload.rs`: the TPM JSON body for CREATE/UPDATE
//! - `report.rs`: terminal rendering of the result
//!
//! The network work itself lives in `common::network`.
//!
//! ## Examples
//!
//! ```bash
//! # Default: GET Layer Config against 127.0.0.1:8000
//! tpmprobe probe
//!
//! # Update TPM 7, sending only the name and dimension A
//! tpmprobe probe update-tpm --id 7 --name Box --description "" --variant "" --dim-b "" --dim-h ""
//!
//! # See how the server copes without Content-Length
//! tpmprobe probe create-tpm --format raw --show-request
//! ```
//!
//! Probe flow:
//! 1. Load file configuration and apply command-line overrides
//! 2. Resolve the operation into a `RequestSpec` and build its bytes
//! 3. Run the socket probe under the configured timeouts
//! 4. Classify the captured bytes and print the report
//!
use crate::common::network::{
    endpoint::Endpoint,
    probe::{self, ProbeTimeouts},
    request::{self, RequestSpec, WireFormat},
    response,
};
use crate::common::ui;
use crate::core::{
    config::{self, Config},
    error::Result,
};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

/// Backend operations and their paths.
pub mod catalog;
/// TPM request body.
pub mod payload;
/// Output formatting.
pub mod report;

use catalog::{Operation, PathParams};
use payload::{parse_dimension, TpmPayload};

/// # Probe Arguments (`ProbeArgs`)
///
/// Host, port, timeouts, format and echo default to the configuration files
/// and are only overridden when given here.
#[derive(Parser, Debug)]
#[command(about = "Send one raw HTTP/1.1 request to the backend and show the response")]
pub struct ProbeArgs {
    /// Backend operation to exercise.
    #[arg(value_enum, default_value_t = Operation::GetLayerConfig)]
    pub operation: Operation,

    /// Backend host name or IP address.
    #[arg(long)]
    pub host: Option<String>,

    /// Backend TCP port.
    #[arg(long, short, value_parser = clap::value_parser!(u16).range(1..))]
    pub port: Option<u16>,

    /// Request path, replacing the one generated for the operation.
    #[arg(long)]
    pub path: Option<String>,

    /// TPM ID for GET by ID, UPDATE and DELETE.
    #[arg(long, default_value = "1")]
    pub id: String,

    /// Layer configuration name for GET Layer Config.
    #[arg(long, default_value = "default")]
    pub config_name: String,

    /// Swatch color name for GET Swatch Config.
    #[arg(long, default_value = "DIELINE")]
    pub color_name: String,

    /// Wire format used to build the request.
    #[arg(long, short, value_enum)]
    pub format: Option<WireFormat>,

    /// Milliseconds allowed for sending the request and reading the response.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_ms: Option<u64>,

    /// Milliseconds allowed for opening the connection.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub connect_timeout_ms: Option<u64>,

    /// Print the exact request above the response.
    #[arg(long, short = 's', overrides_with = "no_show_request")]
    pub show_request: bool,

    /// Do not print the request, even when a config file turns it on.
    #[arg(long, overrides_with = "show_request")]
    pub no_show_request: bool,

    /// TPM name (CREATE/UPDATE). Empty omits the field.
    #[arg(long, default_value = "Test TPM")]
    pub name: String,

    /// TPM description (CREATE/UPDATE). Empty omits the field.
    #[arg(long, default_value = "Test description")]
    pub description: String,

    /// TPM variant (CREATE/UPDATE). Empty omits the field.
    #[arg(long, default_value = "v1.0")]
    pub variant: String,

    /// Dimension A (CREATE/UPDATE). Empty omits the field.
    #[arg(long, default_value = "100")]
    pub dim_a: String,

    /// Dimension B (CREATE/UPDATE). Empty omits the field.
    #[arg(long, default_value = "200")]
    pub dim_b: String,

    /// Dimension H (CREATE/UPDATE). Empty omits the field.
    #[arg(long, default_value = "50")]
    pub dim_h: String,

    /// Read settings from this file instead of the user and project config.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// A fully resolved probe, ready to run.
#[derive(Debug)]
pub struct ProbePlan {
    pub operation: Operation,
    pub spec: RequestSpec,
    pub timeouts: ProbeTimeouts,
    pub show_request: bool,
}

/// # Handle Probe Command (`handle_probe`)
///
/// Resolves the arguments against the configuration, runs one probe and
/// prints the report. Network failures are part of the report, not errors:
/// only configuration and input problems return `Err`.
pub async fn handle_probe(args: ProbeArgs) -> Result<()> {
    info!("Handling probe command with args: {:?}", args);

    let file_config = config::load_config(args.config.as_deref())?;
    let plan = plan(&args, file_config)?;
    let request_bytes = request::build(&plan.spec);
    let endpoint = plan.spec.endpoint();

    info!(
        "Testing {} connection to {} ({})",
        plan.spec.method(),
        endpoint,
        plan.spec.wire_format()
    );
    if let Some(body) = plan.spec.body() {
        debug!("Payload: {}", String::from_utf8_lossy(body));
    }
    debug!(
        "Sending exact bytes: {}",
        ui::visible_line_endings(&String::from_utf8_lossy(&request_bytes))
    );

    let outcome = probe::run(endpoint, &request_bytes, plan.timeouts).await;
    let (parsed, summary) = response::classify(&outcome, plan.operation.label());

    let rendered = report::Report {
        request: &request_bytes,
        show_request: plan.show_request,
        outcome: &outcome,
        parsed: &parsed,
        summary: &summary,
    }
    .render();
    print!("{}", rendered);

    Ok(())
}

/// Merges command-line overrides into `config` and builds the request spec.
pub fn plan(args: &ProbeArgs, mut config: Config) -> Result<ProbePlan> {
    if let Some(host) = &args.host {
        config.target.host = host.clone();
    }
    if let Some(port) = args.port {
        config.target.port = port;
    }
    if let Some(format) = args.format {
        config.probe.wire_format = format;
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config.probe.timeout_ms = timeout_ms;
    }
    if let Some(connect_timeout_ms) = args.connect_timeout_ms {
        config.probe.connect_timeout_ms = connect_timeout_ms;
    }
    if args.show_request {
        config.probe.show_request = true;
    } else if args.no_show_request {
        config.probe.show_request = false;
    }
    config::validate_config(&config)?;

    let operation = args.operation;
    let path = match &args.path {
        Some(path) => path.clone(),
        None => operation.path(&PathParams {
            id: args.id.clone(),
            config_name: args.config_name.clone(),
            color_name: args.color_name.clone(),
        }),
    };
    let endpoint = Endpoint::new(config.target.host.clone(), config.target.port, &path);

    let body = if operation.carries_body() {
        let payload = TpmPayload {
            name: args.name.clone(),
            description: args.description.clone(),
            variant: args.variant.clone(),
            a: parse_dimension("A", &args.dim_a)?,
            b: parse_dimension("B", &args.dim_b)?,
            h: parse_dimension("H", &args.dim_h)?,
        };
        Some(payload.to_json()?)
    } else {
        None
    };

    Ok(ProbePlan {
        operation,
        spec: RequestSpec::new(endpoint, operation.method(), config.probe.wire_format, body),
        timeouts: ProbeTimeouts {
            read: Duration::from_millis(config.probe.timeout_ms),
            connect: Duration::from_millis(config.probe.connect_timeout_ms),
        },
        show_request: config.probe.show_request,
    })
}
