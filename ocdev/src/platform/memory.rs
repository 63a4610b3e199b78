//! In-memory [`Platform`] used by tests.
//!
//! Objects are kept per project, so a service that sends a request to the
//! wrong namespace does not find what it created.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use crate::{
    label,
    platform::{
        BuildSource, Error, NewApp, Platform, ResourceDescriptor, ResourceKind, ResourcePayload,
    },
};

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TriggeredBuild {
    pub component: String,

    /// `None` for a rebuild from the recorded source.
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Default)]
struct ProjectState {
    resources: Vec<ResourceDescriptor>,
    routes: Vec<ResourceDescriptor>,
    builds: Vec<TriggeredBuild>,
}

#[derive(Debug, Default)]
struct State {
    current: String,
    projects: BTreeMap<String, ProjectState>,
    route_counter: usize,
    fail_deletes: bool,
    fail_builds: bool,
}

impl State {
    fn project(&mut self, project: &str) -> &mut ProjectState {
        self.projects.entry(project.to_string()).or_default()
    }
}

#[derive(Debug)]
pub struct MemoryPlatform {
    state: Mutex<State>,
}

impl MemoryPlatform {
    pub fn new(project: impl Into<String>) -> Self {
        Self { state: Mutex::new(State { current: project.into(), ..State::default() }) }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("memory platform state is poisoned")
    }

    /// Switches the project reported by [`Platform::current_project`], like
    /// `oc project <name>`.
    pub fn select_project(&self, project: &str) { project.clone_into(&mut self.state().current); }

    /// Adds `resource` to the current project.
    pub fn insert(&self, resource: ResourceDescriptor) {
        let mut state = self.state();
        let current = state.current.clone();
        state.project(&current).resources.push(resource);
    }

    pub fn resources(&self) -> Vec<ResourceDescriptor> {
        let mut state = self.state();
        let current = state.current.clone();
        state.project(&current).resources.clone()
    }

    pub fn routes(&self) -> Vec<ResourceDescriptor> {
        let mut state = self.state();
        let current = state.current.clone();
        state.project(&current).routes.clone()
    }

    pub fn builds(&self) -> Vec<TriggeredBuild> {
        let mut state = self.state();
        let current = state.current.clone();
        state.project(&current).builds.clone()
    }

    pub fn fail_deletes(&self) { self.state().fail_deletes = true; }

    pub fn fail_builds(&self) { self.state().fail_builds = true; }

    fn matching(resources: &[ResourceDescriptor], selector: &str) -> Vec<ResourceDescriptor> {
        let selector = label::parse_selector(selector);
        resources
            .iter()
            .filter(|resource| label::matches_selector(&resource.labels, &selector))
            .cloned()
            .collect()
    }

    fn trigger(
        &self,
        project: &str,
        name: &str,
        directory: Option<&Path>,
    ) -> Result<String, Error> {
        let mut state = self.state();
        if state.fail_builds {
            return Err(Error::ArchiveDirectory {
                directory: directory.map_or_else(|| PathBuf::from(name), Path::to_path_buf),
                source: std::io::Error::other("injected build failure"),
            });
        }
        let project_state = state.project(project);
        let exists = project_state
            .resources
            .iter()
            .any(|resource| resource.kind == ResourceKind::BuildConfig && resource.name == name);
        if !exists {
            return Err(not_found(project, ResourceKind::BuildConfig, name));
        }
        project_state.builds.push(TriggeredBuild {
            component: name.to_string(),
            directory: directory.map(Path::to_path_buf),
        });
        Ok(format!("{name}-{}", project_state.builds.len()))
    }
}

impl Platform for MemoryPlatform {
    fn current_project(&self) -> Result<String, Error> { Ok(self.state().current.clone()) }

    async fn new_app_from_source(&self, project: &str, app: &NewApp) -> Result<Vec<String>, Error> {
        let created = ResourceKind::COMPONENT_KINDS
            .into_iter()
            .map(|kind| ResourceDescriptor {
                kind,
                name: app.name.clone(),
                labels: app.labels.clone(),
                annotations: app.annotations.clone(),
                payload: if kind == ResourceKind::BuildConfig {
                    ResourcePayload::Build { source: app.source.clone() }
                } else {
                    ResourcePayload::None
                },
            })
            .collect::<Vec<_>>();
        let references = created.iter().map(ResourceDescriptor::reference).collect();
        self.state().project(project).resources.extend(created);
        Ok(references)
    }

    async fn start_build(&self, project: &str, name: &str) -> Result<String, Error> {
        self.trigger(project, name, None)
    }

    async fn start_binary_build(
        &self,
        project: &str,
        name: &str,
        directory: &Path,
    ) -> Result<String, Error> {
        self.trigger(project, name, Some(directory))
    }

    async fn list_resources(
        &self,
        project: &str,
        selector: &str,
    ) -> Result<Vec<ResourceDescriptor>, Error> {
        Ok(Self::matching(&self.state().project(project).resources, selector))
    }

    async fn delete_resources(&self, project: &str, selector: &str) -> Result<Vec<String>, Error> {
        let mut state = self.state();
        if state.fail_deletes {
            return Err(not_found(project, ResourceKind::DeploymentConfig, selector));
        }
        let parsed = label::parse_selector(selector);
        let project_state = state.project(project);
        let (deleted, kept) = std::mem::take(&mut project_state.resources)
            .into_iter()
            .partition::<Vec<_>, _>(|resource| label::matches_selector(&resource.labels, &parsed));
        project_state.resources = kept;
        Ok(deleted.iter().map(ResourceDescriptor::reference).collect())
    }

    async fn get_build_config(
        &self,
        project: &str,
        name: &str,
    ) -> Result<ResourceDescriptor, Error> {
        self.state()
            .project(project)
            .resources
            .iter()
            .find(|resource| resource.kind == ResourceKind::BuildConfig && resource.name == name)
            .cloned()
            .ok_or_else(|| not_found(project, ResourceKind::BuildConfig, name))
    }

    async fn create_route(
        &self,
        project: &str,
        service: &str,
        labels: &BTreeMap<String, String>,
    ) -> Result<ResourceDescriptor, Error> {
        let mut state = self.state();
        state.route_counter += 1;
        let name = format!("{service}-{}", state.route_counter);
        let route = ResourceDescriptor {
            kind: ResourceKind::Route,
            name: name.clone(),
            labels: labels.clone(),
            annotations: BTreeMap::new(),
            payload: ResourcePayload::Route { host: format!("{name}-{project}.apps.example.com") },
        };
        state.project(project).routes.push(route.clone());
        Ok(route)
    }

    async fn delete_route(&self, project: &str, name: &str) -> Result<(), Error> {
        let mut state = self.state();
        let routes = &mut state.project(project).routes;
        let before = routes.len();
        routes.retain(|route| route.name != name);
        if routes.len() == before {
            return Err(not_found(project, ResourceKind::Route, name));
        }
        Ok(())
    }

    async fn list_routes(
        &self,
        project: &str,
        selector: &str,
    ) -> Result<Vec<ResourceDescriptor>, Error> {
        Ok(Self::matching(&self.state().project(project).routes, selector))
    }
}

fn not_found(project: &str, kind: ResourceKind, name: &str) -> Error {
    Error::ResourceNotFound { kind, namespace: project.to_string(), name: name.to_string() }
}

/// A component resource as `oc new-app` would have stamped it.
pub fn component_resource(
    kind: ResourceKind,
    component: &str,
    application: &str,
    component_type: Option<&str>,
) -> ResourceDescriptor {
    let mut labels = label::build_labels(Some(component), application, true);
    labels.extend(component_type.map(|ty| {
        (ocdev_base::consts::k8s::labels::COMPONENT_TYPE.to_string(), ty.to_string())
    }));
    ResourceDescriptor {
        kind,
        name: component.to_string(),
        labels,
        annotations: BTreeMap::new(),
        payload: if kind == ResourceKind::BuildConfig {
            ResourcePayload::Build { source: BuildSource::Binary }
        } else {
            ResourcePayload::None
        },
    }
}
