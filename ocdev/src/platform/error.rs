use std::path::PathBuf;

use snafu::Snafu;

use crate::{error::ErrorKind, platform::ResourceKind};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display(
        "Failed to list {kind} objects matching '{selector}' in namespace {namespace}, error: \
         {source}"
    ))]
    ListResources {
        kind: ResourceKind,
        namespace: String,
        selector: String,
        #[snafu(source(from(kube::Error, Box::new)))]
        source: Box<kube::Error>,
    },

    #[snafu(display("Failed to get {kind}/{name} in namespace {namespace}, error: {source}"))]
    GetResource {
        kind: ResourceKind,
        namespace: String,
        name: String,
        #[snafu(source(from(kube::Error, Box::new)))]
        source: Box<kube::Error>,
    },

    #[snafu(display("Failed to create {kind}/{name} in namespace {namespace}, error: {source}"))]
    CreateResource {
        kind: ResourceKind,
        namespace: String,
        name: String,
        #[snafu(source(from(kube::Error, Box::new)))]
        source: Box<kube::Error>,
    },

    #[snafu(display("Failed to delete {kind}/{name} in namespace {namespace}, error: {source}"))]
    DeleteResource {
        kind: ResourceKind,
        namespace: String,
        name: String,
        #[snafu(source(from(kube::Error, Box::new)))]
        source: Box<kube::Error>,
    },

    #[snafu(display("{kind}/{name} does not exist in namespace {namespace}"))]
    ResourceNotFound { kind: ResourceKind, namespace: String, name: String },

    #[snafu(display("Failed to start build of {name} in namespace {namespace}, error: {source}"))]
    InstantiateBuild {
        namespace: String,
        name: String,
        #[snafu(source(from(kube::Error, Box::new)))]
        source: Box<kube::Error>,
    },

    #[snafu(display("Failed to construct binary build request for {name}, error: {source}"))]
    BinaryBuildRequest { name: String, source: http::Error },

    #[snafu(display("Failed to archive directory {}, error: {source}", directory.display()))]
    ArchiveDirectory { directory: PathBuf, source: std::io::Error },
}

impl Error {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ResourceNotFound { .. } => ErrorKind::NotFound,
            _ => ErrorKind::Upstream,
        }
    }
}
