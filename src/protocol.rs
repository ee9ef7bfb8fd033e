//! Public protocol structs for the HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and clients independently.

use serde::{Deserialize, Serialize};

use crate::codec::ValidationReport;

/// Query for the identifier endpoints: `?id=[0P1N1-1]`.
#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: String,
}

/// Validation outcome as promised by the contract: never an error status,
/// always the full list of broken rules.
#[derive(Debug, Serialize)]
pub struct ValidateOut {
    #[serde(rename = "isValid")]
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl From<ValidationReport> for ValidateOut {
    fn from(report: ValidationReport) -> Self {
        ValidateOut { is_valid: report.is_valid, errors: report.errors }
    }
}

#[derive(Debug, Serialize)]
pub struct GenerateOut {
    pub id: String,
}

/// Uniform error payload; the message is rendered from the tagged error
/// kinds at this boundary only.
#[derive(Debug, Serialize)]
pub struct ErrorOut {
    pub message: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}
