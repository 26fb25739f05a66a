//! Row models and request payloads.

pub mod employee;
pub mod role;

use idm_core::types::DbId;
use serde::Deserialize;

/// Body of the bulk `ids` endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdsRequest {
    #[serde(default)]
    pub ids: Vec<DbId>,
}
