pub mod k8s {
    pub mod labels {
        //! Labels stamped on every resource ocdev creates.
        //!
        //! The application and component labels form the identity of a
        //! resource and are the only keys used in read selectors. The
        //! remaining keys are written at creation time and never filtered on.

        /// Name of the application a resource belongs to.
        pub const APPLICATION: &str = "app.kubernetes.io/name";

        /// Name of the component a resource belongs to.
        pub const COMPONENT: &str = "app.kubernetes.io/component-name";

        /// Builder type of the component, e.g. `nodejs`.
        pub const COMPONENT_TYPE: &str = "app.kubernetes.io/component-type";

        /// Creation-only labels that repeat the application name.
        pub const ADDITIONAL_APPLICATION: &[&str] = &["app"];

        pub const MANAGED_BY: &str = "app.kubernetes.io/managed-by";
    }

    pub mod annotations {
        use std::sync::LazyLock;

        use crate::PROJECT_NAME;

        /// Source the component was built from: a git URI or a `file://` URI
        /// of a local directory.
        pub const SOURCE_URL: &str = "app.kubernetes.io/url";

        /// Version of ocdev that created a resource.
        pub static VERSION: LazyLock<String> = LazyLock::new(|| format!("{PROJECT_NAME}.version"));
    }
}

/// Application used when none is active in the current project.
pub const DEFAULT_APPLICATION_NAME: &str = "app";

/// Namespace holding the builder image streams.
pub const DEFAULT_BUILDER_IMAGE_NAMESPACE: &str = "openshift";

/// Port exposed by the service of every component.
pub const DEFAULT_SERVICE_PORT: u16 = 8080;
