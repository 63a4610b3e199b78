//! Create, list, delete and select applications, components and URLs.
//!
//! A [`Session`] binds one [`Platform`] to one [`ContextStore`]. The entity
//! services borrow it and resolve omitted names in this order: explicit
//! argument, then the context store, then a `NotFound` error.

mod application;
mod component;
mod error;
mod url;

use snafu::{ResultExt, ensure};

pub use self::{
    application::{ApplicationService, ApplicationSummary},
    component::{ComponentService, ComponentSummary},
    error::Error,
    url::{UrlService, UrlSummary},
};
use crate::{context::ContextStore, directory::ResourceDirectory, platform::Platform};

pub struct Session<P> {
    platform: P,
    context: ContextStore,
    default_application: String,
}

impl<P> Session<P>
where
    P: Platform,
{
    #[must_use]
    pub fn new(platform: P, context: ContextStore, default_application: impl Into<String>) -> Self {
        Self { platform, context, default_application: default_application.into() }
    }

    #[must_use]
    pub const fn platform(&self) -> &P { &self.platform }

    #[must_use]
    pub const fn context(&self) -> &ContextStore { &self.context }

    #[must_use]
    pub fn default_application(&self) -> &str { &self.default_application }

    #[must_use]
    pub const fn applications(&self) -> ApplicationService<'_, P> { ApplicationService::new(self) }

    #[must_use]
    pub const fn components(&self) -> ComponentService<'_, P> { ComponentService::new(self) }

    #[must_use]
    pub const fn urls(&self) -> UrlService<'_, P> { UrlService::new(self) }

    const fn directory(&self) -> ResourceDirectory<'_, P> { ResourceDirectory::new(&self.platform) }

    /// # Errors
    ///
    /// Returns an error if the platform cannot tell, or if no project is
    /// selected.
    pub fn project(&self) -> Result<String, Error> {
        let project = self.platform.current_project().context(error::CurrentProjectSnafu)?;
        ensure!(!project.is_empty(), error::NoCurrentProjectSnafu);
        Ok(project)
    }
}

/// An argument that was given and is not empty.
fn given(name: Option<&str>) -> Option<&str> { name.filter(|name| !name.is_empty()) }
