use ocdev_base::consts::k8s::labels;
use snafu::ResultExt;

use crate::{
    label,
    platform::{Platform, ResourceDescriptor},
    service::{Error, Session, error, given},
};

/// A route exposing one component.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UrlSummary {
    pub name: String,

    pub component: String,

    /// Host assigned by the cluster.
    pub url: String,
}

impl From<ResourceDescriptor> for UrlSummary {
    fn from(route: ResourceDescriptor) -> Self {
        Self {
            component: route.label(labels::COMPONENT).unwrap_or_default().to_string(),
            url: route.host().to_string(),
            name: route.name,
        }
    }
}

pub struct UrlService<'s, P> {
    session: &'s Session<P>,
}

impl<'s, P> UrlService<'s, P>
where
    P: Platform,
{
    pub(super) const fn new(session: &'s Session<P>) -> Self { Self { session } }

    /// Exposes `component` (or the active component) through a new route.
    ///
    /// The route carries the filter labels of the component only.
    ///
    /// # Errors
    ///
    /// Returns an error if the component cannot be resolved or does not
    /// exist, or if the route cannot be created.
    pub async fn create(&self, component: Option<&str>) -> Result<UrlSummary, Error> {
        let project = self.session.project()?;
        let application = self.session.applications().current_or_default()?;
        let components = self.session.components();
        let component = components.resolve(component)?;
        components.ensure_exists(&project, &application, &component).await?;

        let route_labels = label::build_labels(Some(&component), &application, false);
        let route = self
            .session
            .platform()
            .create_route(&project, &component, &route_labels)
            .await
            .context(error::CreateUrlSnafu { component: &component })?;
        tracing::info!("URL {} created for component {component}", route.name);
        Ok(UrlSummary::from(route))
    }

    /// Deletes the URL called `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the route cannot be deleted.
    pub async fn delete(&self, name: &str) -> Result<(), Error> {
        let project = self.session.project()?;
        self.session
            .platform()
            .delete_route(&project, name)
            .await
            .context(error::DeleteUrlSnafu { name })?;
        tracing::info!("URL {name} deleted from project {project}");
        Ok(())
    }

    /// URLs of `application` (or the active application), narrowed to
    /// `component` when one is given.
    ///
    /// # Errors
    ///
    /// Returns an error if no application can be resolved or the routes
    /// cannot be listed.
    pub async fn list(
        &self,
        component: Option<&str>,
        application: Option<&str>,
    ) -> Result<Vec<UrlSummary>, Error> {
        let project = self.session.project()?;
        let application = self.session.applications().resolve(application)?;
        let selector =
            label::build_selector(&label::build_labels(given(component), &application, false));
        tracing::debug!("Listing routes with label selector: {selector}");

        let routes = self
            .session
            .directory()
            .fetch_routes(&project, &selector)
            .await
            .context(error::ListUrlsSnafu { application: &application })?;
        Ok(routes.into_iter().map(UrlSummary::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::ErrorKind,
        platform::{ResourceKind, memory::component_resource},
        service::tests::session,
    };

    fn insert_component(session: &Session<crate::platform::memory::MemoryPlatform>, name: &str) {
        for kind in ResourceKind::COMPONENT_KINDS {
            session.platform().insert(component_resource(kind, name, "demo", Some("nodejs")));
        }
    }

    #[tokio::test]
    async fn test_list_by_application_and_component() {
        let (_dir, session) = session();
        insert_component(&session, "api");
        insert_component(&session, "web");
        session.applications().set_current("demo").await.unwrap();

        let api = session.urls().create(Some("api")).await.unwrap();
        let web = session.urls().create(Some("web")).await.unwrap();
        assert_eq!(api.component, "api");
        assert!(api.url.starts_with(&api.name));

        let all = session.urls().list(None, Some("demo")).await.unwrap();
        assert_eq!(all, [api.clone(), web]);

        let narrowed = session.urls().list(Some("api"), Some("demo")).await.unwrap();
        assert_eq!(narrowed, [api]);

        assert!(session.urls().list(None, Some("other")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_route_carries_filter_labels_only() {
        let (_dir, session) = session();
        insert_component(&session, "api");
        session.applications().set_current("demo").await.unwrap();

        let _url = session.urls().create(Some("api")).await.unwrap();
        let routes = session.platform().routes();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].labels, label::build_labels(Some("api"), "demo", false));
    }

    #[tokio::test]
    async fn test_create_uses_active_component() {
        let (_dir, session) = session();
        insert_component(&session, "api");
        session.applications().set_current("demo").await.unwrap();

        let err = session.urls().create(None).await.unwrap_err();
        assert!(matches!(err, Error::NoCurrentComponent { .. }));

        session.components().set_current("api").await.unwrap();
        let url = session.urls().create(None).await.unwrap();
        assert_eq!(url.component, "api");

        let listed = session.urls().list(None, None).await.unwrap();
        assert_eq!(listed, [url]);
    }

    #[tokio::test]
    async fn test_create_for_missing_component() {
        let (_dir, session) = session();
        session.applications().create("demo").unwrap();

        let err = session.urls().create(Some("ghost")).await.unwrap_err();
        assert!(matches!(err, Error::ComponentNotFound { .. }));
        assert!(session.platform().routes().is_empty());
    }

    #[tokio::test]
    async fn test_delete() {
        let (_dir, session) = session();
        insert_component(&session, "api");
        session.applications().set_current("demo").await.unwrap();
        let url = session.urls().create(Some("api")).await.unwrap();

        session.urls().delete(&url.name).await.unwrap();
        assert!(session.platform().routes().is_empty());

        let err = session.urls().delete(&url.name).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_component_deletion_keeps_urls() {
        let (_dir, session) = session();
        insert_component(&session, "api");
        session.applications().set_current("demo").await.unwrap();
        let url = session.urls().create(Some("api")).await.unwrap();

        let _deleted = session.components().delete("api").await.unwrap();
        assert_eq!(session.urls().list(Some("api"), None).await.unwrap(), [url]);
    }
}
