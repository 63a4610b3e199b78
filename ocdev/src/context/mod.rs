//! The local "current context": which application is active in each project
//! and which component is active in each application.
//!
//! This is an advisory cache used to fill in omitted identifiers. It never
//! decides whether an entity exists; the cluster does.

mod error;

use std::{
    io::{ErrorKind as IoErrorKind, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use tempfile::NamedTempFile;

pub use self::error::Error;

/// Context of one application inside one project.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationContext {
    pub name: String,

    pub project: String,

    #[serde(default)]
    pub active: bool,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub active_component: String,
}

/// The whole content of the context file.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextState {
    #[serde(default)]
    pub active_applications: Vec<ApplicationContext>,
}

impl ContextState {
    #[must_use]
    pub fn active_application(&self, project: &str) -> Option<&str> {
        self.active_applications
            .iter()
            .find(|app| app.project == project && app.active)
            .map(|app| app.name.as_str())
    }

    /// Marks `application` as the active one in `project`. An empty name
    /// leaves no application active.
    pub fn set_active_application(&mut self, application: &str, project: &str) {
        for app in self.active_applications.iter_mut().filter(|app| app.project == project) {
            app.active = app.name == application;
        }
        if !application.is_empty() && self.find(application, project).is_none() {
            self.active_applications.push(ApplicationContext {
                name: application.to_string(),
                project: project.to_string(),
                active: true,
                active_component: String::new(),
            });
        }
    }

    #[must_use]
    pub fn active_component(&self, application: &str, project: &str) -> Option<&str> {
        self.find(application, project)
            .map(|app| app.active_component.as_str())
            .filter(|component| !component.is_empty())
    }

    /// Records `component` as active in `application`. An empty name clears
    /// the entry.
    pub fn set_active_component(&mut self, component: &str, application: &str, project: &str) {
        if let Some(app) = self
            .active_applications
            .iter_mut()
            .find(|app| app.name == application && app.project == project)
        {
            app.active_component = component.to_string();
        } else if !component.is_empty() {
            self.active_applications.push(ApplicationContext {
                name: application.to_string(),
                project: project.to_string(),
                active: false,
                active_component: component.to_string(),
            });
        }
    }

    /// Drops everything known about `application` in `project`.
    pub fn forget_application(&mut self, application: &str, project: &str) {
        self.active_applications.retain(|app| !(app.name == application && app.project == project));
    }

    fn find(&self, application: &str, project: &str) -> Option<&ApplicationContext> {
        self.active_applications
            .iter()
            .find(|app| app.name == application && app.project == project)
    }
}

/// File-backed store for [`ContextState`].
///
/// Every accessor loads the whole file and every mutator rewrites it.
/// Concurrent writers are not detected; the last one wins.
#[derive(Clone, Debug)]
pub struct ContextStore {
    path: PathBuf,
}

impl ContextStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

    #[must_use]
    pub fn path(&self) -> &Path { &self.path }

    /// Reads the context file. A file that does not exist yet is an empty
    /// context.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<ContextState, Error> {
        let data = match std::fs::read(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == IoErrorKind::NotFound => return Ok(ContextState::default()),
            Err(source) => {
                return Err(Error::ReadContext { filename: self.path.clone(), source });
            }
        };
        if data.iter().all(u8::is_ascii_whitespace) {
            return Ok(ContextState::default());
        }
        serde_yaml::from_slice(&data)
            .context(error::ParseContextSnafu { filename: self.path.clone() })
    }

    /// Replaces the context file with `state`.
    ///
    /// The new content is written to a uniquely named temporary file next to
    /// the target and renamed over it.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be serialized or the file cannot
    /// be written.
    pub fn save(&self, state: &ContextState) -> Result<(), Error> {
        let data = serde_yaml::to_string(state).context(error::SerializeContextSnafu)?;

        let directory = self
            .path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(directory).with_context(|_| {
            error::CreateContextDirectorySnafu { directory: directory.to_path_buf() }
        })?;

        let mut temporary = NamedTempFile::new_in(directory)
            .with_context(|_| error::WriteContextSnafu { filename: directory.to_path_buf() })?;
        temporary.write_all(data.as_bytes()).with_context(|_| error::WriteContextSnafu {
            filename: temporary.path().to_path_buf(),
        })?;
        let _file = temporary
            .persist(&self.path)
            .map_err(|err| err.error)
            .with_context(|_| error::WriteContextSnafu { filename: self.path.clone() })?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if the context file cannot be loaded.
    pub fn active_application(&self, project: &str) -> Result<Option<String>, Error> {
        Ok(self.load()?.active_application(project).map(ToString::to_string))
    }

    /// # Errors
    ///
    /// Returns an error if the context file cannot be loaded or saved.
    pub fn set_active_application(&self, application: &str, project: &str) -> Result<(), Error> {
        self.update(|state| state.set_active_application(application, project))
    }

    /// # Errors
    ///
    /// Returns an error if the context file cannot be loaded.
    pub fn active_component(
        &self,
        application: &str,
        project: &str,
    ) -> Result<Option<String>, Error> {
        Ok(self.load()?.active_component(application, project).map(ToString::to_string))
    }

    /// # Errors
    ///
    /// Returns an error if the context file cannot be loaded or saved.
    pub fn set_active_component(
        &self,
        component: &str,
        application: &str,
        project: &str,
    ) -> Result<(), Error> {
        self.update(|state| state.set_active_component(component, application, project))
    }

    /// # Errors
    ///
    /// Returns an error if the context file cannot be loaded or saved.
    pub fn forget_application(&self, application: &str, project: &str) -> Result<(), Error> {
        self.update(|state| state.forget_application(application, project))
    }

    fn update<F>(&self, mutate: F) -> Result<(), Error>
    where
        F: FnOnce(&mut ContextState),
    {
        let mut state = self.load()?;
        mutate(&mut state);
        self.save(&state)
    }
}
