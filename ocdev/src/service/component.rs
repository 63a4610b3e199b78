use std::{collections::BTreeMap, path::Path};

use ocdev_base::{
    PROJECT_VERSION,
    consts::k8s::{annotations, labels},
};
use snafu::{OptionExt, ResultExt, ensure};

use crate::{
    label::{self, ComponentSource},
    platform::{BuildSource, BuilderImage, NewApp, Platform, ResourcePayload},
    service::{Error, Session, error, given},
};

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ComponentSummary {
    pub name: String,

    pub component_type: String,
}

/// Outcome of a successful component creation.
#[derive(Clone, Debug)]
pub struct CreatedComponent {
    pub application: String,

    /// References of the created objects.
    pub resources: Vec<String>,

    /// First build, started right away for local sources.
    pub build: Option<String>,
}

pub struct ComponentService<'s, P> {
    session: &'s Session<P>,
}

impl<'s, P> ComponentService<'s, P>
where
    P: Platform,
{
    pub(super) const fn new(session: &'s Session<P>) -> Self { Self { session } }

    /// Creates a component built by the cluster from the git repository at
    /// `uri`.
    ///
    /// # Errors
    ///
    /// Returns an error if the application cannot be resolved or created, or
    /// if any object of the component cannot be created.
    pub async fn create_from_git(
        &self,
        component: &str,
        component_type: &str,
        uri: &str,
    ) -> Result<CreatedComponent, Error> {
        self.create(component, component_type, ComponentSource::Git { uri: uri.to_string() }).await
    }

    /// Creates a component built from uploads of `directory` and starts its
    /// first build.
    ///
    /// # Errors
    ///
    /// Returns an error if the application cannot be resolved or created, or
    /// if any object of the component cannot be created. A failure to start
    /// the build is reported as [`Error::TriggerBuild`]; the component exists
    /// at that point.
    pub async fn create_from_dir(
        &self,
        component: &str,
        component_type: &str,
        directory: &Path,
    ) -> Result<CreatedComponent, Error> {
        self.create(component, component_type, ComponentSource::Local {
            path: directory.to_path_buf(),
        })
        .await
    }

    async fn create(
        &self,
        component: &str,
        component_type: &str,
        source: ComponentSource,
    ) -> Result<CreatedComponent, Error> {
        let source_url = source.to_annotation_value().with_context(|| {
            error::NonUtf8SourceSnafu { component, location: source.to_string() }
        })?;
        let project = self.session.project()?;
        let applications = self.session.applications();
        let application = applications.current_or_default()?;
        let _created = applications.ensure_exists(&application).await?;

        let builder = BuilderImage::parse(component_type);
        let app = NewApp {
            name: component.to_string(),
            source: match &source {
                ComponentSource::Git { uri } => BuildSource::Git { uri: uri.clone() },
                ComponentSource::Local { .. } => BuildSource::Binary,
            },
            labels: label::build_labels(Some(component), &application, true)
                .into_iter()
                .chain([(labels::COMPONENT_TYPE.to_string(), builder.name.clone())])
                .collect(),
            annotations: BTreeMap::from([
                (annotations::SOURCE_URL.to_string(), source_url),
                (annotations::VERSION.clone(), PROJECT_VERSION.to_string()),
            ]),
            builder,
        };
        let resources = self
            .session
            .platform()
            .new_app_from_source(&project, &app)
            .await
            .context(error::CreateComponentSnafu { application: &application, component })?;
        tracing::info!(
            "Component {component} of type {component_type} created in application {application}"
        );

        self.session.context().set_active_component(component, &application, &project)?;

        let build = match &source {
            ComponentSource::Local { path } => {
                tracing::info!("Starting first build of {component} from {}", path.display());
                let build = self
                    .session
                    .platform()
                    .start_binary_build(&project, component, path)
                    .await
                    .context(error::TriggerBuildSnafu { component })?;
                Some(build)
            }
            ComponentSource::Git { .. } => None,
        };

        Ok(CreatedComponent { application, resources, build })
    }

    /// Components of the active application with their types.
    ///
    /// # Errors
    ///
    /// Returns an error if no application is active, the resources cannot be
    /// listed, or the resources of a component disagree on its type.
    pub async fn list(&self) -> Result<Vec<ComponentSummary>, Error> {
        let project = self.session.project()?;
        let application = self.session.applications().current()?;
        let selector = label::build_selector(&label::build_labels(None, &application, false));

        let directory = self.session.directory();
        let names = directory
            .list_names(&project, labels::COMPONENT, &selector)
            .await
            .context(error::ListComponentsSnafu { application: &application })?;

        let mut components = Vec::with_capacity(names.len());
        for name in names {
            let component_type = directory
                .component_type(&project, &name, &application)
                .await
                .context(error::ComponentTypeSnafu { component: &name })?;
            components.push(ComponentSummary { name, component_type });
        }
        Ok(components)
    }

    /// # Errors
    ///
    /// Returns an error if no application is active, the component has no
    /// resources, or its resources disagree on the type.
    pub async fn component_type(&self, component: &str) -> Result<String, Error> {
        let project = self.session.project()?;
        let application = self.session.applications().current()?;
        self.session
            .directory()
            .component_type(&project, component, &application)
            .await
            .context(error::ComponentTypeSnafu { component })
    }

    /// Where `component` is built from, read back from its build
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the build configuration cannot be read, or if it
    /// is neither a git build nor a binary build with a recorded directory.
    pub async fn source(&self, component: &str) -> Result<ComponentSource, Error> {
        let project = self.session.project()?;
        let build_config = self
            .session
            .platform()
            .get_build_config(&project, component)
            .await
            .context(error::GetBuildConfigSnafu { component })?;

        let source = match &build_config.payload {
            ResourcePayload::Build { source: BuildSource::Git { uri } } => {
                ComponentSource::Git { uri: uri.clone() }
            }
            ResourcePayload::Build { source: BuildSource::Binary } => build_config
                .annotation(annotations::SOURCE_URL)
                .filter(|value| !value.is_empty())
                .map(ComponentSource::from_annotation_value)
                .filter(|source| matches!(source, ComponentSource::Local { .. }))
                .context(error::UnsupportedSourceSnafu { component, source_type: "Binary" })?,
            ResourcePayload::Build { source: BuildSource::Other { source_type } } => {
                return error::UnsupportedSourceSnafu { component, source_type }.fail();
            }
            ResourcePayload::None | ResourcePayload::Route { .. } => {
                return error::UnsupportedSourceSnafu { component, source_type: "None" }.fail();
            }
        };

        tracing::debug!("Component {component} source type is {} ({source})", source.source_type());
        Ok(source)
    }

    /// Active component of the active (or default) application.
    ///
    /// # Errors
    ///
    /// Returns an error if no component is active or the context cannot be
    /// read.
    pub fn current(&self) -> Result<String, Error> {
        let project = self.session.project()?;
        let application = self.session.applications().current_or_default()?;
        self.session
            .context()
            .active_component(&application, &project)?
            .context(error::NoCurrentComponentSnafu { project, application })
    }

    /// Resolves an optional component argument against the context.
    pub(super) fn resolve(&self, component: Option<&str>) -> Result<String, Error> {
        given(component).map_or_else(|| self.current(), |name| Ok(name.to_string()))
    }

    /// # Errors
    ///
    /// Returns an error if no application is active, `component` does not
    /// exist in it, or the context cannot be written.
    pub async fn set_current(&self, component: &str) -> Result<(), Error> {
        let project = self.session.project()?;
        let application = self.session.applications().current()?;
        self.ensure_exists(&project, &application, component).await?;
        self.session.context().set_active_component(component, &application, &project)?;
        Ok(())
    }

    /// Deletes every resource of `component` and returns their references.
    ///
    /// The active component is cleared afterwards if it was `component`. When
    /// the deletion fails the context is left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if `component` does not exist or its resources cannot
    /// be deleted.
    pub async fn delete(&self, component: &str) -> Result<Vec<String>, Error> {
        let project = self.session.project()?;
        let application = self.session.applications().current_or_default()?;
        self.ensure_exists(&project, &application, component).await?;

        let selector =
            label::build_selector(&label::build_labels(Some(component), &application, false));
        let deleted = self
            .session
            .platform()
            .delete_resources(&project, &selector)
            .await
            .context(error::DeleteComponentSnafu { component })?;
        tracing::info!("Component {component} deleted from application {application}");

        let context = self.session.context();
        if context.active_component(&application, &project)?.as_deref() == Some(component) {
            context.set_active_component("", &application, &project)?;
        }
        Ok(deleted)
    }

    /// Starts a new build of `component` (or the active component).
    ///
    /// Local components upload `directory`, or the directory recorded at
    /// creation when none is given. Git components rebuild from their
    /// repository. Returns the name of the build.
    ///
    /// # Errors
    ///
    /// Returns an error if the component or its source cannot be resolved, or
    /// if the build cannot be started.
    pub async fn push(
        &self,
        component: Option<&str>,
        directory: Option<&Path>,
    ) -> Result<String, Error> {
        let component = self.resolve(component)?;
        let project = self.session.project()?;
        let platform = self.session.platform();

        let build = match self.source(&component).await? {
            ComponentSource::Local { path } => {
                let directory = directory.unwrap_or(path.as_path());
                tracing::info!("Pushing {} to component {component}", directory.display());
                platform.start_binary_build(&project, &component, directory).await
            }
            ComponentSource::Git { uri } => {
                if let Some(directory) = directory {
                    tracing::warn!(
                        "Component {component} is built from {uri}, ignoring {}",
                        directory.display()
                    );
                }
                tracing::info!("Rebuilding component {component} from {uri}");
                platform.start_build(&project, &component).await
            }
        };
        build.context(error::StartBuildSnafu { component })
    }

    pub(super) async fn ensure_exists(
        &self,
        project: &str,
        application: &str,
        component: &str,
    ) -> Result<(), Error> {
        let selector = label::build_selector(&label::build_labels(None, application, false));
        let names = self
            .session
            .directory()
            .list_names(project, labels::COMPONENT, &selector)
            .await
            .context(error::ListComponentsSnafu { application })?;
        ensure!(
            names.contains(component),
            error::ComponentNotFoundSnafu { project, application, component }
        );
        Ok(())
    }
}
