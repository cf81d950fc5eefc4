//! Scan template models (read-side contract of the template store).

use serde::Serialize;
use sqlx::FromRow;
use vantage_core::types::DbId;

/// A row from the `scan_templates` table.
///
/// `parameters` holds the phase-keyed parameter maps as stored JSON; it
/// is decoded into `PhaseParams` by the template parameter engine so a
/// malformed template surfaces as a validation error at dispatch time,
/// not as a decode panic here.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ScanTemplate {
    pub id: DbId,
    pub name: String,
    pub parameters: serde_json::Value,
    /// Custom-POC selection list; input to descriptor synthesis, never
    /// serialized into the outgoing descriptor.
    pub poc_names: Vec<String>,
}
