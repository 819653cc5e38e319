//! Group
//!
//! Maps machines whose labels satisfy a selector to a profile.

use crate::error::ModelError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Required label values, keyed by label name.
pub type Selector = BTreeMap<String, String>;

/// A named selection rule binding a selector to a profile.
///
/// Groups carry no explicit priority. Precedence is the position of the group
/// in the store's ordered listing; the first match wins. A group with an empty
/// selector matches every machine and belongs at the end of that listing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Group {
    /// Unique group identifier
    #[serde(default)]
    pub id: String,

    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Identifier of the profile served to matching machines
    #[serde(default)]
    pub profile: String,

    /// Labels a machine must carry, with exactly these values
    #[serde(default)]
    pub selector: Selector,
}

impl Group {
    /// Decodes a group from its JSON document.
    pub fn parse(data: &[u8]) -> Result<Self, ModelError> {
        Ok(serde_json::from_slice(data)?)
    }

    /// Checks that the group can be persisted.
    ///
    /// The referenced profile is not required to exist yet.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.id.is_empty() {
            return Err(ModelError::IdRequired);
        }
        if self.profile.is_empty() {
            return Err(ModelError::ProfileRequired);
        }
        Ok(())
    }

    /// Whether this group matches every machine.
    #[must_use]
    pub fn is_catch_all(&self) -> bool {
        self.selector.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_group() {
        let group = Group::parse(
            br#"{"id": "x86", "profile": "worker", "selector": {"arch": "x86_64", "serial": "ABC"}}"#,
        )
        .unwrap();

        assert_eq!(group.id, "x86");
        assert_eq!(group.profile, "worker");
        assert_eq!(group.selector.get("arch").map(String::as_str), Some("x86_64"));
        assert!(!group.is_catch_all());
    }

    #[test]
    fn test_parse_group_without_selector_is_catch_all() {
        let group = Group::parse(br#"{"id": "default", "profile": "installer"}"#).unwrap();
        assert!(group.is_catch_all());
    }

    #[test]
    fn test_validate_group() {
        let group = Group {
            id: "g".to_string(),
            profile: "p".to_string(),
            ..Default::default()
        };
        assert!(group.validate().is_ok());

        let missing_id = Group {
            profile: "p".to_string(),
            ..Default::default()
        };
        assert!(matches!(missing_id.validate(), Err(ModelError::IdRequired)));

        let missing_profile = Group {
            id: "g".to_string(),
            ..Default::default()
        };
        assert!(matches!(missing_profile.validate(), Err(ModelError::ProfileRequired)));
    }

    #[test]
    fn test_parse_rejects_unknown_fields() {
        let result = Group::parse(br#"{"id": "g", "profile": "p", "priority": 1}"#);
        assert!(matches!(result, Err(ModelError::Malformed(_))));
    }
}
