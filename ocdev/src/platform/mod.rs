//! The cluster as seen by ocdev.
//!
//! [`Platform`] is the only way the rest of the crate talks to the cluster.
//! [`KubePlatform`] implements it on top of `kube` for OpenShift-compatible
//! API servers.

mod archive;
mod cluster;
mod error;
#[cfg(test)]
pub(crate) mod memory;

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    path::Path,
};

pub use self::{archive::archive_directory, cluster::KubePlatform, error::Error};

/// Kinds of objects ocdev creates or inspects.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum ResourceKind {
    ImageStream,
    BuildConfig,
    DeploymentConfig,
    Service,
    Route,
}

impl ResourceKind {
    /// Kinds that make up a component. Routes are owned by a component but
    /// managed on their own.
    pub const COMPONENT_KINDS: [Self; 4] =
        [Self::ImageStream, Self::BuildConfig, Self::DeploymentConfig, Self::Service];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ImageStream => "imagestream",
            Self::BuildConfig => "buildconfig",
            Self::DeploymentConfig => "deploymentconfig",
            Self::Service => "service",
            Self::Route => "route",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Source section of a build configuration.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BuildSource {
    /// Built from a git repository cloned by the cluster.
    Git { uri: String },

    /// Built from an archive uploaded with each build.
    Binary,

    /// Anything ocdev does not create itself.
    Other { source_type: String },
}

/// Kind-specific part of a [`ResourceDescriptor`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum ResourcePayload {
    #[default]
    None,

    Build { source: BuildSource },

    Route { host: String },
}

/// The parts of a cluster object ocdev cares about.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResourceDescriptor {
    pub kind: ResourceKind,

    pub name: String,

    pub labels: BTreeMap<String, String>,

    pub annotations: BTreeMap<String, String>,

    pub payload: ResourcePayload,
}

impl ResourceDescriptor {
    #[must_use]
    pub fn label(&self, key: &str) -> Option<&str> { self.labels.get(key).map(String::as_str) }

    #[must_use]
    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations.get(key).map(String::as_str)
    }

    /// Host of a route, empty for every other kind.
    #[must_use]
    pub fn host(&self) -> &str {
        match &self.payload {
            ResourcePayload::Route { host } => host,
            _ => "",
        }
    }

    /// `kind/name`, the way `oc` prints objects.
    #[must_use]
    pub fn reference(&self) -> String { format!("{}/{}", self.kind, self.name) }
}

const DEFAULT_BUILDER_TAG: &str = "latest";

/// Builder image stream a component is built with.
///
/// Written as `[namespace/]name[:tag]`, e.g. `nodejs`, `nodejs:8` or
/// `openshift/python:3.6`. Only `name` is a valid label value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BuilderImage {
    /// `None` uses the configured builder namespace.
    pub namespace: Option<String>,

    pub name: String,

    pub tag: String,
}

impl BuilderImage {
    #[must_use]
    pub fn parse(image: &str) -> Self {
        let (namespace, rest) = match image.rsplit_once('/') {
            Some((namespace, rest)) if !namespace.is_empty() => (Some(namespace.to_string()), rest),
            Some((_, rest)) => (None, rest),
            None => (None, image),
        };
        let (name, tag) = match rest.split_once(':') {
            Some((name, tag)) if !tag.is_empty() => (name, tag),
            Some((name, _)) => (name, DEFAULT_BUILDER_TAG),
            None => (rest, DEFAULT_BUILDER_TAG),
        };
        Self { namespace, name: name.to_string(), tag: tag.to_string() }
    }

    /// `name:tag`, the image stream tag inside the builder namespace.
    #[must_use]
    pub fn stream_tag(&self) -> String { format!("{}:{}", self.name, self.tag) }
}

impl fmt::Display for BuilderImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(namespace) = &self.namespace {
            write!(f, "{namespace}/")?;
        }
        write!(f, "{}:{}", self.name, self.tag)
    }
}

/// Everything needed to create the objects of a new component.
#[derive(Clone, Debug)]
pub struct NewApp {
    pub name: String,

    pub builder: BuilderImage,

    pub source: BuildSource,

    pub labels: BTreeMap<String, String>,

    pub annotations: BTreeMap<String, String>,
}

/// Operations ocdev needs from the cluster.
///
/// Implementations never retry; every failure is returned to the caller as
/// soon as it happens.
pub trait Platform {
    /// Namespace selected by the user's cluster configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the current project cannot be determined.
    fn current_project(&self) -> Result<String, Error>;

    /// Creates the image stream, build configuration, deployment
    /// configuration and service of a component.
    ///
    /// Returns the references of the created objects.
    ///
    /// # Errors
    ///
    /// Returns an error if any object cannot be created. Objects created
    /// before the failure are left in place.
    async fn new_app_from_source(&self, project: &str, app: &NewApp)
    -> Result<Vec<String>, Error>;

    /// Starts a build of `name` from the source recorded in its build
    /// configuration. Returns the name of the build.
    ///
    /// # Errors
    ///
    /// Returns an error if the build cannot be started.
    async fn start_build(&self, project: &str, name: &str) -> Result<String, Error>;

    /// Starts a build of `name` using the content of `directory` as input.
    /// Returns the name of the build.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be archived or the build
    /// cannot be started.
    async fn start_binary_build(
        &self,
        project: &str,
        name: &str,
        directory: &Path,
    ) -> Result<String, Error>;

    /// Lists the component objects in `project` matching `selector`. An
    /// empty selector matches everything.
    ///
    /// # Errors
    ///
    /// Returns an error if any kind cannot be listed.
    async fn list_resources(
        &self,
        project: &str,
        selector: &str,
    ) -> Result<Vec<ResourceDescriptor>, Error>;

    /// Distinct values of `label_key` among the component objects matching
    /// `selector`.
    ///
    /// # Errors
    ///
    /// Returns an error if the objects cannot be listed.
    async fn list_label_values(
        &self,
        project: &str,
        label_key: &str,
        selector: &str,
    ) -> Result<BTreeSet<String>, Error> {
        Ok(self
            .list_resources(project, selector)
            .await?
            .iter()
            .filter_map(|resource| resource.label(label_key))
            .map(ToString::to_string)
            .collect())
    }

    /// Deletes every component object matching `selector` and returns their
    /// references.
    ///
    /// # Errors
    ///
    /// Returns an error as soon as one object cannot be listed or deleted.
    async fn delete_resources(&self, project: &str, selector: &str)
    -> Result<Vec<String>, Error>;

    /// # Errors
    ///
    /// Returns an error if the build configuration does not exist or cannot
    /// be read.
    async fn get_build_config(
        &self,
        project: &str,
        name: &str,
    ) -> Result<ResourceDescriptor, Error>;

    /// Exposes `service` through a new route carrying `labels`. The name of
    /// the route and its host are assigned by the cluster.
    ///
    /// # Errors
    ///
    /// Returns an error if the route cannot be created.
    async fn create_route(
        &self,
        project: &str,
        service: &str,
        labels: &BTreeMap<String, String>,
    ) -> Result<ResourceDescriptor, Error>;

    /// # Errors
    ///
    /// Returns an error if the route cannot be deleted.
    async fn delete_route(&self, project: &str, name: &str) -> Result<(), Error>;

    /// # Errors
    ///
    /// Returns an error if the routes cannot be listed.
    async fn list_routes(
        &self,
        project: &str,
        selector: &str,
    ) -> Result<Vec<ResourceDescriptor>, Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_image_defaults() {
        let image = BuilderImage::parse("nodejs");
        assert_eq!(image, BuilderImage {
            namespace: None,
            name: "nodejs".to_string(),
            tag: "latest".to_string(),
        });
        assert_eq!(image.stream_tag(), "nodejs:latest");
        assert_eq!(BuilderImage::parse("nodejs:").tag, "latest");
    }

    #[test]
    fn test_builder_image_with_namespace_and_tag() {
        let image = BuilderImage::parse("openshift/python:3.6");
        assert_eq!(image.namespace.as_deref(), Some("openshift"));
        assert_eq!(image.name, "python");
        assert_eq!(image.stream_tag(), "python:3.6");
        assert_eq!(image.to_string(), "openshift/python:3.6");

        let image = BuilderImage::parse("nodejs:8");
        assert_eq!(image.namespace, None);
        assert_eq!(image.stream_tag(), "nodejs:8");
    }
}
