//! Campaign export input model

use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{Error, Result};

/// One JSON object from the export, kept untyped until it is resolved against a table
pub type JsonObject = Map<String, Value>;

/// Parsed campaign export.
///
/// Both arrays are required. Any other top-level key is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CampaignExport {
    pub pages: Vec<JsonObject>,
    pub conns: Vec<JsonObject>,
}

impl CampaignExport {
    /// Read and parse an export file
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let export: CampaignExport = contents.parse()?;
        tracing::debug!(
            "Parsed {}: {} pages, {} connections",
            path.display(),
            export.pages.len(),
            export.conns.len()
        );
        Ok(export)
    }
}

impl FromStr for CampaignExport {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_export() {
        let export: CampaignExport = r#"{
            "pages": [{"id": 1, "name": "Hut"}, {"page": {"id": 2}}],
            "conns": [{"fromid": 1, "toid": 2, "relationship": "near"}],
            "campaign": "ignored"
        }"#
        .parse()
        .unwrap();

        assert_eq!(export.pages.len(), 2);
        assert_eq!(export.conns.len(), 1);
        assert_eq!(export.pages[0]["name"], "Hut");
    }

    #[test]
    fn test_missing_conns_is_an_error() {
        let err = r#"{"pages": []}"#.parse::<CampaignExport>().unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_non_object_element_is_an_error() {
        let res = r#"{"pages": [1, 2], "conns": []}"#.parse::<CampaignExport>();
        assert!(res.is_err());
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!("{\"pages\": [".parse::<CampaignExport>().is_err());
    }
}
