use std::collections::BTreeSet;

use ocdev_base::consts::k8s::labels;
use snafu::{OptionExt, ResultExt, ensure};

use crate::{
    label,
    platform::Platform,
    service::{Error, Session, error, given},
};

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ApplicationSummary {
    pub name: String,

    /// Whether this is the active application of the current project.
    pub active: bool,
}

pub struct ApplicationService<'s, P> {
    session: &'s Session<P>,
}

impl<'s, P> ApplicationService<'s, P>
where
    P: Platform,
{
    pub(super) const fn new(session: &'s Session<P>) -> Self { Self { session } }

    /// Applications of the current project, i.e. every distinct value of the
    /// application label.
    ///
    /// # Errors
    ///
    /// Returns an error if the resources cannot be listed or the context
    /// cannot be read.
    pub async fn list(&self) -> Result<Vec<ApplicationSummary>, Error> {
        let project = self.session.project()?;
        let names = self.names(&project).await?;
        let active = self.session.context().active_application(&project)?;

        Ok(names
            .into_iter()
            .map(|name| ApplicationSummary {
                active: active.as_deref() == Some(name.as_str()),
                name,
            })
            .collect())
    }

    /// # Errors
    ///
    /// Returns an error if the resources cannot be listed.
    pub async fn exists(&self, application: &str) -> Result<bool, Error> {
        let project = self.session.project()?;
        Ok(self.names(&project).await?.contains(application))
    }

    /// Makes `application` the active application of the current project.
    ///
    /// Nothing is created in the cluster: the application comes into
    /// existence with its first component.
    ///
    /// # Errors
    ///
    /// Returns an error if the context cannot be written.
    pub fn create(&self, application: &str) -> Result<(), Error> {
        let project = self.session.project()?;
        self.session.context().set_active_application(application, &project)?;
        tracing::info!("Application {application} is now active in project {project}");
        Ok(())
    }

    /// Creates `application` unless the cluster already knows it. Returns
    /// true if it had to be created.
    ///
    /// # Errors
    ///
    /// Returns an error if the resources cannot be listed or the context
    /// cannot be written.
    pub async fn ensure_exists(&self, application: &str) -> Result<bool, Error> {
        if self.exists(application).await? {
            return Ok(false);
        }
        tracing::debug!("Application {application} does not exist yet, creating it");
        self.create(application)?;
        Ok(true)
    }

    /// # Errors
    ///
    /// Returns an error if no application is active or the context cannot be
    /// read.
    pub fn current(&self) -> Result<String, Error> {
        let project = self.session.project()?;
        self.session
            .context()
            .active_application(&project)?
            .context(error::NoCurrentApplicationSnafu { project })
    }

    /// Like [`Self::current`], but falls back to the configured default
    /// application.
    ///
    /// # Errors
    ///
    /// Returns an error if the context cannot be read.
    pub fn current_or_default(&self) -> Result<String, Error> {
        let project = self.session.project()?;
        if let Some(application) = self.session.context().active_application(&project)? {
            return Ok(application);
        }
        let application = self.session.default_application().to_string();
        tracing::debug!("No application is active in project {project}, using {application}");
        Ok(application)
    }

    /// Resolves an optional application argument against the context.
    pub(super) fn resolve(&self, application: Option<&str>) -> Result<String, Error> {
        given(application).map_or_else(|| self.current(), |name| Ok(name.to_string()))
    }

    /// # Errors
    ///
    /// Returns an error if `application` does not exist or the context cannot
    /// be written.
    pub async fn set_current(&self, application: &str) -> Result<(), Error> {
        let project = self.session.project()?;
        ensure!(
            self.names(&project).await?.contains(application),
            error::ApplicationNotFoundSnafu { project, application }
        );
        self.session.context().set_active_application(application, &project)?;
        Ok(())
    }

    /// Deletes every component and URL of `application`, then drops it from
    /// the context. Returns the references of the deleted objects.
    ///
    /// # Errors
    ///
    /// Returns an error if `application` has nothing to delete or any object
    /// cannot be deleted. The context is left untouched in that case.
    pub async fn delete(&self, application: &str) -> Result<Vec<String>, Error> {
        let project = self.session.project()?;
        let selector = label::build_selector(&label::build_labels(None, application, false));

        let routes = self
            .session
            .directory()
            .fetch_routes(&project, &selector)
            .await
            .context(error::ListUrlsSnafu { application })?;
        ensure!(
            !routes.is_empty() || self.names(&project).await?.contains(application),
            error::ApplicationNotFoundSnafu { project, application }
        );

        let mut deleted = self
            .session
            .platform()
            .delete_resources(&project, &selector)
            .await
            .context(error::DeleteApplicationSnafu { application })?;
        for route in routes {
            self.session
                .platform()
                .delete_route(&project, &route.name)
                .await
                .context(error::DeleteUrlSnafu { name: route.name.clone() })?;
            deleted.push(route.reference());
        }

        self.session.context().forget_application(application, &project)?;
        tracing::info!("Application {application} deleted from project {project}");
        Ok(deleted)
    }

    async fn names(&self, project: &str) -> Result<BTreeSet<String>, Error> {
        self.session
            .directory()
            .list_names(project, labels::APPLICATION, labels::APPLICATION)
            .await
            .context(error::ListApplicationsSnafu { project })
    }
}
