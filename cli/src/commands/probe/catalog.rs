//! # Backend Endpoint Catalogue
//!
//! File: cli/src/commands/probe/catalog.rs
//!
//! ## Overview
//!
//! The fixed set of backend operations the probe knows how to exercise, with
//! their display labels, HTTP methods and path templates. The backend itself
//! is an external collaborator: this table describes it, it does not own it.
//!
use crate::common::network::request::Method;
use clap::ValueEnum;
use url::form_urlencoded;

/// One backend operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Operation {
    GetLayerConfig,
    GetSwatchConfig,
    GetTpmConfig,
    GetTpmById,
    CreateTpm,
    UpdateTpm,
    DeleteTpm,
}

/// Every operation, in menu order.
pub const ALL_OPERATIONS: [Operation; 7] = [
    Operation::GetLayerConfig,
    Operation::GetSwatchConfig,
    Operation::GetTpmConfig,
    Operation::GetTpmById,
    Operation::CreateTpm,
    Operation::UpdateTpm,
    Operation::DeleteTpm,
];

/// Values substituted into path templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathParams {
    pub id: String,
    pub config_name: String,
    pub color_name: String,
}

impl Default for PathParams {
    fn default() -> Self {
        Self {
            id: "1".to_string(),
            config_name: "default".to_string(),
            color_name: "DIELINE".to_string(),
        }
    }
}

impl Operation {
    /// Label used in status summaries, e.g. `UPDATE TPM`.
    pub fn label(&self) -> &'static str {
        match self {
            Operation::GetLayerConfig => "GET Layer Config",
            Operation::GetSwatchConfig => "GET Swatch Config",
            Operation::GetTpmConfig => "GET TPM Config",
            Operation::GetTpmById => "GET TPM by ID",
            Operation::CreateTpm => "CREATE TPM",
            Operation::UpdateTpm => "UPDATE TPM",
            Operation::DeleteTpm => "DELETE TPM",
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Operation::CreateTpm => Method::Post,
            Operation::UpdateTpm => Method::Put,
            Operation::DeleteTpm => Method::Delete,
            _ => Method::Get,
        }
    }

    /// Whether the request carries a TPM payload.
    pub fn carries_body(&self) -> bool {
        self.method().allows_body()
    }

    /// The path pattern as documented by the backend.
    pub fn path_template(&self) -> &'static str {
        match self {
            Operation::GetLayerConfig => "/get_layer_config?configName=...",
            Operation::GetSwatchConfig => "/get_swatch_config?colorName=...",
            Operation::GetTpmConfig => "/get_tpm_config",
            Operation::GetTpmById => "/get_tpm_by_id/{id}",
            Operation::CreateTpm => "/create_tpm",
            Operation::UpdateTpm => "/update_tpm/{id}",
            Operation::DeleteTpm => "/delete_tpm/{id}",
        }
    }

    /// The concrete request path. The id segment and query values are
    /// percent-encoded.
    pub fn path(&self, params: &PathParams) -> String {
        match self {
            Operation::GetLayerConfig => {
                format!("/get_layer_config?configName={}", encode(&params.config_name))
            }
            Operation::GetSwatchConfig => {
                format!("/get_swatch_config?colorName={}", encode(&params.color_name))
            }
            Operation::GetTpmConfig => "/get_tpm_config".to_string(),
            Operation::GetTpmById => format!("/get_tpm_by_id/{}", encode_segment(&params.id)),
            Operation::CreateTpm => "/create_tpm".to_string(),
            Operation::UpdateTpm => format!("/update_tpm/{}", encode_segment(&params.id)),
            Operation::DeleteTpm => format!("/delete_tpm/{}", encode_segment(&params.id)),
        }
    }
}

fn encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Path segments take `%20` for a space; a literal `+` is already `%2B`.
fn encode_segment(value: &str) -> String {
    encode(value).replace('+', "%20")
}
