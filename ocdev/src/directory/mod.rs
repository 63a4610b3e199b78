//! Read-side queries over labeled resources.
//!
//! The cluster is the source of truth for which applications and components
//! exist. Labels are checked for agreement every time they are read, since
//! nothing keeps the objects of one component consistent after creation.

mod error;

use std::collections::BTreeSet;

use ocdev_base::consts::k8s::labels;
use snafu::ResultExt;

pub use self::error::Error;
use crate::{
    label,
    platform::{Platform, ResourceDescriptor},
};

/// Label queries against one [`Platform`].
#[derive(Debug)]
pub struct ResourceDirectory<'p, P> {
    platform: &'p P,
}

impl<'p, P> ResourceDirectory<'p, P>
where
    P: Platform,
{
    #[must_use]
    pub const fn new(platform: &'p P) -> Self { Self { platform } }

    /// Distinct values of `label_key` among the component resources matching
    /// `selector`.
    ///
    /// # Errors
    ///
    /// Returns an error if the resources cannot be listed.
    pub async fn list_names(
        &self,
        project: &str,
        label_key: &str,
        selector: &str,
    ) -> Result<BTreeSet<String>, Error> {
        self.platform
            .list_label_values(project, label_key, selector)
            .await
            .with_context(|_| error::PlatformSnafu { selector: selector.to_string() })
    }

    /// # Errors
    ///
    /// Returns an error if the resources cannot be listed.
    pub async fn fetch_group(
        &self,
        project: &str,
        selector: &str,
    ) -> Result<Vec<ResourceDescriptor>, Error> {
        self.platform
            .list_resources(project, selector)
            .await
            .with_context(|_| error::PlatformSnafu { selector: selector.to_string() })
    }

    /// # Errors
    ///
    /// Returns an error if the routes cannot be listed.
    pub async fn fetch_routes(
        &self,
        project: &str,
        selector: &str,
    ) -> Result<Vec<ResourceDescriptor>, Error> {
        self.platform
            .list_routes(project, selector)
            .await
            .with_context(|_| error::PlatformSnafu { selector: selector.to_string() })
    }

    /// Builder image type shared by every resource of `component`.
    ///
    /// # Errors
    ///
    /// Returns an error if the resources cannot be listed, if the component
    /// has no resources or if they disagree on the type.
    pub async fn component_type(
        &self,
        project: &str,
        component: &str,
        application: &str,
    ) -> Result<String, Error> {
        let selector =
            label::build_selector(&label::build_labels(Some(component), application, false));
        let group = self.fetch_group(project, &selector).await?;
        assert_label_consistency(&group, labels::COMPONENT_TYPE)
    }
}

/// Returns the value of `label_key` if every resource carries it with the
/// same value.
///
/// A resource without the label disagrees with every other one.
///
/// # Errors
///
/// Returns [`Error::EmptyGroup`] for an empty slice and
/// [`Error::InconsistentLabel`] when values differ or are missing.
pub fn assert_label_consistency(
    resources: &[ResourceDescriptor],
    label_key: &str,
) -> Result<String, Error> {
    let values = resources
        .iter()
        .map(|resource| resource.label(label_key).unwrap_or_default())
        .collect::<BTreeSet<_>>();

    match values.first() {
        None => error::EmptyGroupSnafu { label: label_key }.fail(),
        Some(value) if values.len() == 1 && !value.is_empty() => Ok((*value).to_string()),
        Some(_) => {
            tracing::debug!("Label {label_key} differs across resources: {values:?}");
            error::InconsistentLabelSnafu {
                label: label_key,
                values: values.into_iter().map(ToString::to_string).collect::<Vec<_>>(),
            }
            .fail()
        }
    }
}
