//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// `?activeOnly=true` filter for schema listings.
#[derive(Debug, Default, Deserialize)]
pub struct ActiveOnlyParams {
    #[serde(default, alias = "activeOnly")]
    pub active_only: bool,
}
