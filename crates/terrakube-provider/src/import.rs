//! Import identifier parsing

use crate::error::{ProviderError, Result};
use serde::{Deserialize, Serialize};

/// Parsed `"<organization_id>,<id>"` import identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportId {
    pub organization_id: String,
    pub id: String,
}

impl ImportId {
    pub fn parse(raw: &str) -> Result<Self> {
        let parts: Vec<&str> = raw.split(',').collect();

        match parts.as_slice() {
            [organization_id, id] if !organization_id.is_empty() && !id.is_empty() => Ok(Self {
                organization_id: organization_id.to_string(),
                id: id.to_string(),
            }),
            _ => Err(ProviderError::InvalidImportIdentifier(raw.to_string())),
        }
    }
}

impl std::str::FromStr for ImportId {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
