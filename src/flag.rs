use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Flags keyed by name, serialized as a bare JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct FlagMap(pub BTreeMap<String, bool>);

impl FlagMap {
    pub fn single(name: impl Into<String>, enabled: bool) -> Self {
        Self(BTreeMap::from([(name.into(), enabled)]))
    }
}

impl From<BTreeMap<String, bool>> for FlagMap {
    fn from(flags: BTreeMap<String, bool>) -> Self {
        Self(flags)
    }
}

/// Body of `PUT /flags/{name}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateFlagRequest {
    /// The new value for the feature flag.
    #[serde(rename = "isEnabled")]
    pub is_enabled: bool,
}

/// Body of `POST /flags`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateFlagRequest {
    /// The name of the new feature flag.
    pub name: String,
    /// The initial value for the feature flag.
    #[serde(rename = "isEnabled")]
    pub is_enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}
