//! Group matching
//!
//! Groups are scanned once, in the order the store lists them, and the first
//! group whose selector is satisfied wins. Operators read the group list top
//! to bottom to know which rule applies, so this order is the whole
//! precedence model: specific groups first, catch-all groups last.

use crate::error::CoreError;
use boot_model::{Group, LabelSet, Selector};

/// Whether `labels` satisfies every `(label, value)` pair of `selector`.
///
/// Values compare by exact string equality. A label missing from `labels`
/// never satisfies a requirement, even one for the empty string.
#[must_use]
pub fn selector_matches(selector: &Selector, labels: &LabelSet) -> bool {
    selector
        .iter()
        .all(|(label, required)| labels.get(label) == Some(required.as_str()))
}

/// Returns the first group in `groups` whose selector `labels` satisfies.
///
/// An empty selector matches every request. Returns [`CoreError::NoMatch`]
/// when nothing matches, including when `groups` is empty.
pub fn select_group<'a>(groups: &'a [Group], labels: &LabelSet) -> Result<&'a Group, CoreError> {
    groups
        .iter()
        .find(|group| selector_matches(&group.selector, labels))
        .ok_or(CoreError::NoMatch)
}
