use std::{collections::BTreeMap, path::Path};

use k8s_openapi::{
    api::core::v1::{Service, ServicePort, ServiceSpec},
    apimachinery::pkg::util::intstr::IntOrString,
};
use kube::{
    Api,
    api::{DeleteParams, DynamicObject, ListParams, ObjectMeta, PostParams, TypeMeta},
    core::GroupVersionKind,
    discovery::ApiResource,
};
use serde_json::{Value, json};
use snafu::{OptionExt, ResultExt};

use crate::platform::{
    BuildSource, Error, NewApp, Platform, ResourceDescriptor, ResourceKind, ResourcePayload,
    archive_directory, error,
};

/// Label linking the pods of a deployment configuration to its service.
const DEPLOYMENT_CONFIG_LABEL: &str = "deploymentconfig";

/// [`Platform`] backed by the Kubernetes API of an OpenShift cluster.
#[derive(Clone)]
pub struct KubePlatform {
    client: kube::Client,
    builder_image_namespace: String,
    service_port: u16,
}

impl KubePlatform {
    #[must_use]
    pub fn new(
        client: kube::Client,
        builder_image_namespace: impl Into<String>,
        service_port: u16,
    ) -> Self {
        Self { client, builder_image_namespace: builder_image_namespace.into(), service_port }
    }

    fn api(&self, project: &str, kind: ResourceKind) -> Api<DynamicObject> {
        Api::namespaced_with(self.client.clone(), project, &api_resource(kind))
    }

    async fn create(
        &self,
        project: &str,
        kind: ResourceKind,
        object: &DynamicObject,
    ) -> Result<DynamicObject, Error> {
        let name = object
            .metadata
            .name
            .clone()
            .or_else(|| object.metadata.generate_name.clone())
            .unwrap_or_default();
        self.api(project, kind).create(&PostParams::default(), object).await.context(
            error::CreateResourceSnafu { kind, namespace: project.to_string(), name },
        )
    }

    fn component_object(
        project: &str,
        kind: ResourceKind,
        app: &NewApp,
        data: Value,
    ) -> DynamicObject {
        let mut object =
            DynamicObject::new(&app.name, &api_resource(kind)).within(project).data(data);
        object.metadata.labels = Some(app.labels.clone());
        object.metadata.annotations = Some(app.annotations.clone());
        object
    }

    fn image_stream(project: &str, app: &NewApp) -> DynamicObject {
        Self::component_object(project, ResourceKind::ImageStream, app, json!({ "spec": {} }))
    }

    fn build_config(
        builder_image_namespace: &str,
        project: &str,
        app: &NewApp,
    ) -> DynamicObject {
        let (source, triggers) = match &app.source {
            BuildSource::Git { uri } => (
                json!({ "type": "Git", "git": { "uri": uri } }),
                json!([{ "type": "ConfigChange" }]),
            ),
            BuildSource::Binary | BuildSource::Other { .. } => {
                (json!({ "type": "Binary", "binary": {} }), json!([]))
            }
        };
        let builder_namespace =
            app.builder.namespace.as_deref().unwrap_or(builder_image_namespace);

        Self::component_object(
            project,
            ResourceKind::BuildConfig,
            app,
            json!({
                "spec": {
                    "source": source,
                    "strategy": {
                        "type": "Source",
                        "sourceStrategy": {
                            "from": {
                                "kind": "ImageStreamTag",
                                "namespace": builder_namespace,
                                "name": app.builder.stream_tag(),
                            }
                        }
                    },
                    "output": {
                        "to": { "kind": "ImageStreamTag", "name": format!("{}:latest", app.name) }
                    },
                    "triggers": triggers,
                }
            }),
        )
    }

    fn deployment_config(&self, project: &str, app: &NewApp) -> DynamicObject {
        let pod_labels = app
            .labels
            .clone()
            .into_iter()
            .chain([(DEPLOYMENT_CONFIG_LABEL.to_string(), app.name.clone())])
            .collect::<BTreeMap<_, _>>();
        let image = format!("{}:latest", app.name);

        Self::component_object(
            project,
            ResourceKind::DeploymentConfig,
            app,
            json!({
                "spec": {
                    "replicas": 1,
                    "selector": { DEPLOYMENT_CONFIG_LABEL: app.name },
                    "template": {
                        "metadata": { "labels": pod_labels },
                        "spec": {
                            "containers": [{
                                "name": app.name,
                                "image": image,
                                "ports": [{
                                    "containerPort": self.service_port,
                                    "protocol": "TCP",
                                }],
                            }]
                        }
                    },
                    "triggers": [
                        { "type": "ConfigChange" },
                        {
                            "type": "ImageChange",
                            "imageChangeParams": {
                                "automatic": true,
                                "containerNames": [app.name],
                                "from": { "kind": "ImageStreamTag", "name": image },
                            }
                        }
                    ],
                }
            }),
        )
    }

    fn service(&self, project: &str, app: &NewApp) -> Service {
        let port = i32::from(self.service_port);
        Service {
            metadata: ObjectMeta {
                name: Some(app.name.clone()),
                namespace: Some(project.to_string()),
                labels: Some(app.labels.clone()),
                annotations: Some(app.annotations.clone()),
                ..ObjectMeta::default()
            },
            spec: Some(ServiceSpec {
                selector: Some(BTreeMap::from_iter([(
                    DEPLOYMENT_CONFIG_LABEL.to_string(),
                    app.name.clone(),
                )])),
                ports: Some(vec![ServicePort {
                    name: Some(format!("{port}-tcp")),
                    port,
                    protocol: Some("TCP".to_string()),
                    target_port: Some(IntOrString::Int(port)),
                    ..ServicePort::default()
                }]),
                ..ServiceSpec::default()
            }),
            ..Service::default()
        }
    }
}

impl Platform for KubePlatform {
    fn current_project(&self) -> Result<String, Error> {
        Ok(self.client.default_namespace().to_string())
    }

    async fn new_app_from_source(
        &self,
        project: &str,
        app: &NewApp,
    ) -> Result<Vec<String>, Error> {
        let mut created = Vec::with_capacity(ResourceKind::COMPONENT_KINDS.len());

        for (kind, object) in [
            (ResourceKind::ImageStream, Self::image_stream(project, app)),
            (
                ResourceKind::BuildConfig,
                Self::build_config(&self.builder_image_namespace, project, app),
            ),
            (ResourceKind::DeploymentConfig, self.deployment_config(project, app)),
        ] {
            let _object = self.create(project, kind, &object).await?;
            tracing::debug!("{kind}/{} created in namespace {project}", app.name);
            created.push(format!("{kind}/{}", app.name));
        }

        let _service = Api::<Service>::namespaced(self.client.clone(), project)
            .create(&PostParams::default(), &self.service(project, app))
            .await
            .with_context(|_| error::CreateResourceSnafu {
                kind: ResourceKind::Service,
                namespace: project.to_string(),
                name: app.name.clone(),
            })?;
        tracing::debug!("{}/{} created in namespace {project}", ResourceKind::Service, app.name);
        created.push(format!("{}/{}", ResourceKind::Service, app.name));

        Ok(created)
    }

    async fn start_build(&self, project: &str, name: &str) -> Result<String, Error> {
        let build: DynamicObject = self
            .api(project, ResourceKind::BuildConfig)
            .create_subresource("instantiate", name, &PostParams::default(), &build_request(name))
            .await
            .with_context(|_| error::InstantiateBuildSnafu {
                namespace: project.to_string(),
                name: name.to_string(),
            })?;
        Ok(build.metadata.name.unwrap_or_default())
    }

    async fn start_binary_build(
        &self,
        project: &str,
        name: &str,
        directory: &Path,
    ) -> Result<String, Error> {
        let archive = archive_directory(directory)?;
        tracing::debug!(
            "Uploading {} bytes from {} to buildconfig/{name}",
            archive.len(),
            directory.display()
        );

        let uri = format!(
            "/apis/build.openshift.io/v1/namespaces/{project}/buildconfigs/{name}/instantiatebinary"
        );
        let request = http::Request::post(uri)
            .header(http::header::CONTENT_TYPE, "application/octet-stream")
            .body(archive)
            .with_context(|_| error::BinaryBuildRequestSnafu { name: name.to_string() })?;

        let build: DynamicObject = self.client.request(request).await.with_context(|_| {
            error::InstantiateBuildSnafu { namespace: project.to_string(), name: name.to_string() }
        })?;
        Ok(build.metadata.name.unwrap_or_default())
    }

    async fn list_resources(
        &self,
        project: &str,
        selector: &str,
    ) -> Result<Vec<ResourceDescriptor>, Error> {
        let params = list_params(selector);
        let mut resources = Vec::new();
        for kind in ResourceKind::COMPONENT_KINDS {
            let list = self.api(project, kind).list(&params).await.with_context(|_| {
                error::ListResourcesSnafu {
                    kind,
                    namespace: project.to_string(),
                    selector: selector.to_string(),
                }
            })?;
            resources.extend(list.items.into_iter().map(|object| describe(kind, object)));
        }
        Ok(resources)
    }

    async fn delete_resources(
        &self,
        project: &str,
        selector: &str,
    ) -> Result<Vec<String>, Error> {
        let mut deleted = Vec::new();
        for resource in self.list_resources(project, selector).await? {
            let _status = self
                .api(project, resource.kind)
                .delete(&resource.name, &DeleteParams::background())
                .await
                .with_context(|_| error::DeleteResourceSnafu {
                    kind: resource.kind,
                    namespace: project.to_string(),
                    name: resource.name.clone(),
                })?;
            tracing::debug!("{} deleted in namespace {project}", resource.reference());
            deleted.push(resource.reference());
        }
        Ok(deleted)
    }

    async fn get_build_config(
        &self,
        project: &str,
        name: &str,
    ) -> Result<ResourceDescriptor, Error> {
        let kind = ResourceKind::BuildConfig;
        let object = self
            .api(project, kind)
            .get_opt(name)
            .await
            .with_context(|_| error::GetResourceSnafu {
                kind,
                namespace: project.to_string(),
                name: name.to_string(),
            })?
            .with_context(|| error::ResourceNotFoundSnafu {
                kind,
                namespace: project.to_string(),
                name: name.to_string(),
            })?;
        Ok(describe(kind, object))
    }

    async fn create_route(
        &self,
        project: &str,
        service: &str,
        labels: &BTreeMap<String, String>,
    ) -> Result<ResourceDescriptor, Error> {
        let kind = ResourceKind::Route;
        let created = self.create(project, kind, &route_object(project, service, labels)).await?;
        Ok(describe(kind, created))
    }

    async fn delete_route(&self, project: &str, name: &str) -> Result<(), Error> {
        let kind = ResourceKind::Route;
        let _status = self
            .api(project, kind)
            .delete(name, &DeleteParams::default())
            .await
            .with_context(|_| error::DeleteResourceSnafu {
                kind,
                namespace: project.to_string(),
                name: name.to_string(),
            })?;
        Ok(())
    }

    async fn list_routes(
        &self,
        project: &str,
        selector: &str,
    ) -> Result<Vec<ResourceDescriptor>, Error> {
        let kind = ResourceKind::Route;
        let list = self.api(project, kind).list(&list_params(selector)).await.with_context(|_| {
            error::ListResourcesSnafu {
                kind,
                namespace: project.to_string(),
                selector: selector.to_string(),
            }
        })?;
        Ok(list.items.into_iter().map(|object| describe(kind, object)).collect())
    }
}

fn api_resource(kind: ResourceKind) -> ApiResource {
    let (group, version, name) = match kind {
        ResourceKind::ImageStream => ("image.openshift.io", "v1", "ImageStream"),
        ResourceKind::BuildConfig => ("build.openshift.io", "v1", "BuildConfig"),
        ResourceKind::DeploymentConfig => ("apps.openshift.io", "v1", "DeploymentConfig"),
        ResourceKind::Service => ("", "v1", "Service"),
        ResourceKind::Route => ("route.openshift.io", "v1", "Route"),
    };
    ApiResource::from_gvk(&GroupVersionKind::gvk(group, version, name))
}

/// Body of `buildconfigs/<name>/instantiate`.
fn build_request(name: &str) -> Value {
    json!({
        "kind": "BuildRequest",
        "apiVersion": "build.openshift.io/v1",
        "metadata": { "name": name },
    })
}

/// Route to `service` whose name is generated by the API server.
fn route_object(
    project: &str,
    service: &str,
    labels: &BTreeMap<String, String>,
) -> DynamicObject {
    let resource = api_resource(ResourceKind::Route);
    DynamicObject {
        types: Some(TypeMeta { api_version: resource.api_version, kind: resource.kind }),
        metadata: ObjectMeta {
            generate_name: Some(format!("{service}-")),
            namespace: Some(project.to_string()),
            labels: Some(labels.clone()),
            ..ObjectMeta::default()
        },
        data: json!({ "spec": { "to": { "kind": "Service", "name": service } } }),
    }
}

fn list_params(selector: &str) -> ListParams {
    if selector.is_empty() { ListParams::default() } else { ListParams::default().labels(selector) }
}

fn describe(kind: ResourceKind, object: DynamicObject) -> ResourceDescriptor {
    let payload = match kind {
        ResourceKind::BuildConfig => ResourcePayload::Build { source: build_source(&object.data) },
        ResourceKind::Route => ResourcePayload::Route {
            host: object
                .data
                .pointer("/spec/host")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        },
        _ => ResourcePayload::None,
    };
    ResourceDescriptor {
        kind,
        name: object.metadata.name.unwrap_or_default(),
        labels: object.metadata.labels.unwrap_or_default(),
        annotations: object.metadata.annotations.unwrap_or_default(),
        payload,
    }
}

fn build_source(data: &Value) -> BuildSource {
    match data.pointer("/spec/source/type").and_then(Value::as_str) {
        Some("Git") => BuildSource::Git {
            uri: data
                .pointer("/spec/source/git/uri")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        },
        Some("Binary") => BuildSource::Binary,
        other => BuildSource::Other { source_type: other.unwrap_or("None").to_string() },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::BuilderImage;

    #[test]
    fn test_api_resource_plurals() {
        assert_eq!(api_resource(ResourceKind::BuildConfig).plural, "buildconfigs");
        assert_eq!(api_resource(ResourceKind::Route).api_version, "route.openshift.io/v1");
        assert_eq!(api_resource(ResourceKind::Service).api_version, "v1");
    }

    #[test]
    fn test_build_source_from_build_config() {
        let uri = "https://example.com/r.git";
        let git = json!({ "spec": { "source": { "type": "Git", "git": { "uri": uri } } } });
        assert_eq!(build_source(&git), BuildSource::Git { uri: uri.to_string() });

        let binary = json!({ "spec": { "source": { "type": "Binary", "binary": {} } } });
        assert_eq!(build_source(&binary), BuildSource::Binary);

        let dockerfile = json!({ "spec": { "source": { "type": "Dockerfile" } } });
        assert_eq!(
            build_source(&dockerfile),
            BuildSource::Other { source_type: "Dockerfile".to_string() }
        );
    }

    fn new_app(builder: &str) -> NewApp {
        NewApp {
            name: "api".to_string(),
            builder: BuilderImage::parse(builder),
            source: BuildSource::Git { uri: "https://example.com/r.git".to_string() },
            labels: BTreeMap::from_iter([(
                "app.kubernetes.io/name".to_string(),
                "demo".to_string(),
            )]),
            annotations: BTreeMap::new(),
        }
    }

    #[test]
    fn test_build_request_body() {
        let body = build_request("api");
        assert_eq!(
            body,
            json!({
                "kind": "BuildRequest",
                "apiVersion": "build.openshift.io/v1",
                "metadata": { "name": "api" },
            })
        );
        assert!(body.is_object());
    }

    #[test]
    fn test_route_object_body() {
        let labels = BTreeMap::from_iter([
            ("app.kubernetes.io/name".to_string(), "demo".to_string()),
            ("app.kubernetes.io/component-name".to_string(), "api".to_string()),
        ]);
        let body = serde_json::to_value(route_object("proj", "api", &labels)).unwrap();

        assert_eq!(body["apiVersion"], "route.openshift.io/v1");
        assert_eq!(body["kind"], "Route");
        assert_eq!(body["metadata"]["generateName"], "api-");
        assert_eq!(body["metadata"]["namespace"], "proj");
        assert_eq!(body["metadata"]["labels"]["app.kubernetes.io/component-name"], "api");
        assert_eq!(body["spec"]["to"], json!({ "kind": "Service", "name": "api" }));
    }

    #[test]
    fn test_build_config_builder_image() {
        let object = KubePlatform::build_config("openshift", "proj", &new_app("nodejs:8"));
        let from = &object.data["spec"]["strategy"]["sourceStrategy"]["from"];
        assert_eq!(from["namespace"], "openshift");
        assert_eq!(from["name"], "nodejs:8");
        assert_eq!(object.data["spec"]["source"]["git"]["uri"], "https://example.com/r.git");

        let object = KubePlatform::build_config("openshift", "proj", &new_app("custom/python:3.6"));
        let from = &object.data["spec"]["strategy"]["sourceStrategy"]["from"];
        assert_eq!(from["namespace"], "custom");
        assert_eq!(from["name"], "python:3.6");
    }

    #[test]
    fn test_describe_route() {
        let mut object = DynamicObject::new("api-x7k2p", &api_resource(ResourceKind::Route))
            .data(json!({ "spec": { "host": "api-x7k2p-demo.apps.example.com" } }));
        object.metadata.labels = Some(BTreeMap::from_iter([(
            "app.kubernetes.io/name".to_string(),
            "demo".to_string(),
        )]));

        let route = describe(ResourceKind::Route, object);
        assert_eq!(route.name, "api-x7k2p");
        assert_eq!(route.host(), "api-x7k2p-demo.apps.example.com");
        assert_eq!(route.label("app.kubernetes.io/name"), Some("demo"));
        assert_eq!(route.reference(), "route/api-x7k2p");
    }
}
