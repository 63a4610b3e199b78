//! Encoding of the project → application → component hierarchy into flat
//! label maps and selectors.
//!
//! Nothing here performs I/O. Names are assumed to be valid Kubernetes label
//! values already.

mod source;

use std::collections::BTreeMap;

use ocdev_base::{PROJECT_NAME, consts::k8s::labels};

pub use self::source::{ComponentSource, SourceType};

/// Labels identifying a component (or, without a component name, an
/// application).
///
/// With `include_creation_labels` the result is meant for a resource that is
/// about to be created and carries every label ocdev stamps. Without it the
/// result only contains keys that every existing resource is guaranteed to
/// have, so it can be used as a filter without silently matching nothing.
#[must_use]
pub fn build_labels(
    component: Option<&str>,
    application: &str,
    include_creation_labels: bool,
) -> BTreeMap<String, String> {
    let identity = [(labels::APPLICATION, application)]
        .into_iter()
        .chain(component.filter(|c| !c.is_empty()).map(|c| (labels::COMPONENT, c)));

    let creation = include_creation_labels
        .then(|| {
            labels::ADDITIONAL_APPLICATION
                .iter()
                .map(|key| (*key, application))
                .chain([(labels::MANAGED_BY, PROJECT_NAME)])
        })
        .into_iter()
        .flatten();

    identity.chain(creation).map(|(key, value)| (key.to_string(), value.to_string())).collect()
}

/// Renders an equality selector, `key=value` pairs joined by commas in key
/// order.
#[must_use]
pub fn build_selector(labels: &BTreeMap<String, String>) -> String {
    labels.iter().map(|(key, value)| format!("{key}={value}")).collect::<Vec<_>>().join(",")
}

/// Parses an equality selector produced by [`build_selector`].
///
/// Terms without `=` are skipped.
#[must_use]
pub fn parse_selector(selector: &str) -> BTreeMap<String, String> {
    selector
        .split(',')
        .filter_map(|term| term.split_once('='))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .filter(|(key, _)| !key.is_empty())
        .collect()
}

/// Returns true if every pair of `selector` is present in `labels`.
#[must_use]
pub fn matches_selector(
    labels: &BTreeMap<String, String>,
    selector: &BTreeMap<String, String>,
) -> bool {
    selector.iter().all(|(key, value)| labels.get(key) == Some(value))
}
