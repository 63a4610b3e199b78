use snafu::Snafu;

use crate::{context, directory, error::ErrorKind, platform};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("Failed to determine the current project, error: {source}"))]
    CurrentProject { source: platform::Error },

    #[snafu(display("No project is selected, run `oc project <name>` first"))]
    NoCurrentProject,

    #[snafu(display("{source}"))]
    Context { source: context::Error },

    #[snafu(display("No application is active in project {project}"))]
    NoCurrentApplication { project: String },

    #[snafu(display("No component is active in application {application} of project {project}"))]
    NoCurrentComponent { project: String, application: String },

    #[snafu(display("Application {application} does not exist in project {project}"))]
    ApplicationNotFound { project: String, application: String },

    #[snafu(display(
        "Component {component} does not exist in application {application} of project {project}"
    ))]
    ComponentNotFound { project: String, application: String, component: String },

    #[snafu(display("Failed to list applications in project {project}, error: {source}"))]
    ListApplications { project: String, source: directory::Error },

    #[snafu(display("Failed to list components of application {application}, error: {source}"))]
    ListComponents { application: String, source: directory::Error },

    #[snafu(display("Failed to get type of component {component}, error: {source}"))]
    ComponentType { component: String, source: directory::Error },

    #[snafu(display("Failed to list URLs of application {application}, error: {source}"))]
    ListUrls { application: String, source: directory::Error },

    #[snafu(display(
        "Failed to create component {component} in application {application}, error: {source}"
    ))]
    CreateComponent { application: String, component: String, source: platform::Error },

    #[snafu(display(
        "Component {component} was created but its first build could not be started, error: \
         {source}"
    ))]
    TriggerBuild { component: String, source: platform::Error },

    #[snafu(display("Failed to start build of component {component}, error: {source}"))]
    StartBuild { component: String, source: platform::Error },

    #[snafu(display("Failed to get source of component {component}, error: {source}"))]
    GetBuildConfig { component: String, source: platform::Error },

    #[snafu(display("Component {component} is built from an unsupported source: {source_type}"))]
    UnsupportedSource { component: String, source_type: String },

    #[snafu(display("Component {component} cannot be built from {location}: path is not UTF-8"))]
    NonUtf8Source { component: String, location: String },

    #[snafu(display("Failed to delete component {component}, error: {source}"))]
    DeleteComponent { component: String, source: platform::Error },

    #[snafu(display("Failed to delete application {application}, error: {source}"))]
    DeleteApplication { application: String, source: platform::Error },

    #[snafu(display("Failed to create URL for component {component}, error: {source}"))]
    CreateUrl { component: String, source: platform::Error },

    #[snafu(display("Failed to delete URL {name}, error: {source}"))]
    DeleteUrl { name: String, source: platform::Error },
}

impl Error {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NoCurrentProject
            | Self::NoCurrentApplication { .. }
            | Self::NoCurrentComponent { .. }
            | Self::ApplicationNotFound { .. }
            | Self::ComponentNotFound { .. } => ErrorKind::NotFound,
            Self::UnsupportedSource { .. } | Self::NonUtf8Source { .. } => {
                ErrorKind::UnsupportedSource
            }
            Self::Context { source } => source.kind(),
            Self::ListApplications { source, .. }
            | Self::ListComponents { source, .. }
            | Self::ComponentType { source, .. }
            | Self::ListUrls { source, .. } => source.kind(),
            Self::CurrentProject { source }
            | Self::CreateComponent { source, .. }
            | Self::TriggerBuild { source, .. }
            | Self::StartBuild { source, .. }
            | Self::GetBuildConfig { source, .. }
            | Self::DeleteComponent { source, .. }
            | Self::DeleteApplication { source, .. }
            | Self::CreateUrl { source, .. }
            | Self::DeleteUrl { source, .. } => source.kind(),
        }
    }
}

impl From<context::Error> for Error {
    fn from(source: context::Error) -> Self { Self::Context { source } }
}
