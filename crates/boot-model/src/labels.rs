//! Label sets
//!
//! Machine attributes reported by the boot loader, used to match group selectors.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// MAC address label
pub const LABEL_MAC: &str = "mac";
/// SMBIOS UUID label
pub const LABEL_UUID: &str = "uuid";
/// Hostname label
pub const LABEL_HOSTNAME: &str = "hostname";
/// Serial number label
pub const LABEL_SERIAL: &str = "serial";
/// DNS domain label
pub const LABEL_DOMAIN: &str = "domain";
/// CPU architecture label
pub const LABEL_ARCH: &str = "arch";

/// Labels the iPXE inspect script reports for every machine.
pub const WELL_KNOWN_LABELS: [&str; 6] = [
    LABEL_MAC,
    LABEL_UUID,
    LABEL_HOSTNAME,
    LABEL_SERIAL,
    LABEL_DOMAIN,
    LABEL_ARCH,
];

/// Per-request mapping from label name to value.
///
/// Keys are case-sensitive. A label the machine did not report is a missing
/// key, never an empty value. Every way of building a label set applies the
/// same rules: empty keys and values are dropped and a parsable `mac` is
/// normalised to lowercase colon-separated form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct LabelSet(BTreeMap<String, String>);

/// Applies the label rules to one pair, or `None` if the label is absent.
fn normalize_label(key: String, value: String) -> Option<(String, String)> {
    if key.is_empty() || value.is_empty() {
        return None;
    }
    let value = if key == LABEL_MAC {
        normalize_mac(&value).unwrap_or(value)
    } else {
        value
    };
    Some((key, value))
}

impl LabelSet {
    /// Creates an empty label set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a label set from request query pairs.
    ///
    /// The first value of a repeated key wins.
    pub fn from_query_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        pairs.into_iter().collect()
    }

    /// Sets a label, replacing any previous value.
    ///
    /// An empty value removes the label.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        match normalize_label(key.clone(), value.into()) {
            Some((key, value)) => {
                self.0.insert(key, value);
            }
            None => {
                self.0.remove(&key);
            }
        }
    }

    /// Returns the value of a label, if the machine reported it.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Number of labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no labels were reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates labels in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Collects pairs with the label rules; the first value of a repeated key wins.
impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LabelSet {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut labels = BTreeMap::new();
        for (key, value) in iter {
            if let Some((key, value)) = normalize_label(key.into(), value.into()) {
                labels.entry(key).or_insert(value);
            }
        }
        Self(labels)
    }
}

impl From<BTreeMap<String, String>> for LabelSet {
    fn from(map: BTreeMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl From<LabelSet> for BTreeMap<String, String> {
    fn from(labels: LabelSet) -> Self {
        labels.0
    }
}

impl std::fmt::Display for LabelSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (key, value) in &self.0 {
            if !first {
                f.write_str(",")?;
            }
            first = false;
            write!(f, "{key}={value}")?;
        }
        Ok(())
    }
}

/// Normalises a 48-bit MAC address to `aa:bb:cc:dd:ee:ff`.
///
/// Accepts colon, hyphen (iPXE `${mac:hexhyp}`) or dot separated forms and
/// bare hex. Returns `None` when the value is not a MAC address.
#[must_use]
pub fn normalize_mac(value: &str) -> Option<String> {
    let digits: String = value
        .chars()
        .filter(|c| !matches!(c, ':' | '-' | '.'))
        .collect();
    if digits.len() != 12 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let lower = digits.to_ascii_lowercase();
    let octets: Vec<&str> = (0..6).map(|i| &lower[i * 2..i * 2 + 2]).collect();
    Some(octets.join(":"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_mac_forms() {
        assert_eq!(normalize_mac("52-54-00-89-D8-10").as_deref(), Some("52:54:00:89:d8:10"));
        assert_eq!(normalize_mac("52:54:00:89:d8:10").as_deref(), Some("52:54:00:89:d8:10"));
        assert_eq!(normalize_mac("5254.0089.d810").as_deref(), Some("52:54:00:89:d8:10"));
        assert_eq!(normalize_mac("52540089D810").as_deref(), Some("52:54:00:89:d8:10"));
    }

    #[test]
    fn test_normalize_mac_rejects_garbage() {
        assert_eq!(normalize_mac(""), None);
        assert_eq!(normalize_mac("52:54:00:89:d8"), None);
        assert_eq!(normalize_mac("zz:54:00:89:d8:10"), None);
    }

    #[test]
    fn test_from_query_pairs() {
        let labels = LabelSet::from_query_pairs(vec![
            ("mac", "52-54-00-89-d8-10"),
            ("arch", "x86_64"),
            ("arch", "arm64"),
            ("hostname", ""),
            ("rack", "r12"),
        ]);

        assert_eq!(labels.get("mac"), Some("52:54:00:89:d8:10"));
        assert_eq!(labels.get("arch"), Some("x86_64"));
        assert_eq!(labels.get("hostname"), None);
        assert_eq!(labels.get("rack"), Some("r12"));
        assert_eq!(labels.len(), 3);
    }

    #[test]
    fn test_unparsable_mac_kept_verbatim() {
        let labels = LabelSet::from_query_pairs([("mac", "not-a-mac")]);
        assert_eq!(labels.get("mac"), Some("not-a-mac"));
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let labels = LabelSet::from_query_pairs([("Arch", "x86_64")]);
        assert_eq!(labels.get("arch"), None);
        assert_eq!(labels.get("Arch"), Some("x86_64"));
    }

    #[test]
    fn test_deserialize_applies_label_rules() {
        let labels: LabelSet =
            serde_json::from_str(r#"{"serial": "", "mac": "52-54-00-89-D8-10", "arch": "x86_64"}"#).unwrap();

        assert_eq!(labels.get("serial"), None);
        assert_eq!(labels.get("mac"), Some("52:54:00:89:d8:10"));
        assert_eq!(labels.len(), 2);
        assert_eq!(serde_json::to_string(&labels).unwrap(), r#"{"arch":"x86_64","mac":"52:54:00:89:d8:10"}"#);
    }

    #[test]
    fn test_insert_applies_label_rules() {
        let mut labels = LabelSet::new();
        labels.insert("mac", "5254.0089.d810");
        labels.insert("serial", "ABC");
        assert_eq!(labels.get("mac"), Some("52:54:00:89:d8:10"));

        labels.insert("serial", "");
        assert_eq!(labels.get("serial"), None);
        labels.insert("", "x");
        assert_eq!(labels.len(), 1);
    }

    #[test]
    fn test_collect_applies_label_rules() {
        let labels: LabelSet = [("hostname", ""), ("arch", "arm64"), ("arch", "x86_64")].into_iter().collect();
        assert_eq!(labels.get("hostname"), None);
        assert_eq!(labels.get("arch"), Some("arm64"));
    }

    #[test]
    fn test_display() {
        let labels: LabelSet = [("arch", "x86_64"), ("mac", "52:54:00:89:d8:10")].into_iter().collect();
        assert_eq!(labels.to_string(), "arch=x86_64,mac=52:54:00:89:d8:10");
    }
}
