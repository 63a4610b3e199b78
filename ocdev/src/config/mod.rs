mod error;
mod log;

use std::{
    io::ErrorKind as IoErrorKind,
    path::{Path, PathBuf},
};

use ocdev_base::consts::{
    DEFAULT_APPLICATION_NAME, DEFAULT_BUILDER_IMAGE_NAMESPACE, DEFAULT_SERVICE_PORT,
};
use resolve_path::PathResolveExt;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

pub use self::{error::Error, log::LogConfig};

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Application used by commands run before any application is active.
    #[serde(default = "default_application_name")]
    pub default_application_name: String,

    /// Namespace of the builder image streams, e.g. `nodejs` or `python`.
    #[serde(default = "default_builder_image_namespace")]
    pub builder_image_namespace: String,

    /// Port every component listens on and is exposed through.
    #[serde(default = "default_service_port")]
    pub service_port: u16,

    /// File holding the active application and component of each project.
    #[serde(default = "Config::default_context_file_path")]
    pub context_file_path: PathBuf,

    #[serde(default = "LogConfig::default")]
    pub log: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_application_name: default_application_name(),
            builder_image_namespace: default_builder_image_namespace(),
            service_port: default_service_port(),
            context_file_path: Self::default_context_file_path(),
            log: LogConfig::default(),
        }
    }
}

impl Config {
    #[must_use]
    pub fn search_config_file_path() -> PathBuf {
        let paths = vec![Self::default_path()]
            .into_iter()
            .chain(ocdev_base::fallback_project_config_directories().into_iter().map(|mut path| {
                path.push(ocdev_base::CLI_CONFIG_NAME);
                path
            }))
            .collect::<Vec<_>>();
        for path in paths {
            let Ok(exists) = path.try_exists() else {
                continue;
            };
            if exists {
                return path;
            }
        }
        Self::default_path()
    }

    #[inline]
    #[must_use]
    pub fn default_path() -> PathBuf {
        [ocdev_base::PROJECT_CONFIG_DIR.to_path_buf(), PathBuf::from(ocdev_base::CLI_CONFIG_NAME)]
            .into_iter()
            .collect()
    }

    #[inline]
    #[must_use]
    pub fn default_context_file_path() -> PathBuf {
        [ocdev_base::PROJECT_CONFIG_DIR.to_path_buf(), PathBuf::from(ocdev_base::CLI_CONTEXT_NAME)]
            .into_iter()
            .collect()
    }

    /// Loads the configuration from `path`. A file that does not exist
    /// yields the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// if a path inside it cannot be resolved.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = resolve(path.as_ref())?;
        let mut config: Self = match std::fs::read(&path) {
            Ok(data) => {
                serde_yaml::from_slice(&data).context(error::ParseConfigSnafu { filename: path })?
            }
            Err(err) if err.kind() == IoErrorKind::NotFound => {
                tracing::debug!("No config file at {}, using defaults", path.display());
                Self::default()
            }
            Err(source) => return Err(Error::OpenConfig { filename: path, source }),
        };

        config.context_file_path = resolve(&config.context_file_path)?;
        config.log.file_path = config.log.file_path.as_deref().map(resolve).transpose()?;

        Ok(config)
    }

    /// The default configuration rendered as YAML.
    #[must_use]
    pub fn template_basic() -> Vec<u8> {
        serde_yaml::to_string(&Self::default()).unwrap_or_default().into_bytes()
    }
}

fn resolve(path: &Path) -> Result<PathBuf, Error> {
    path.try_resolve()
        .map(|path| path.to_path_buf())
        .with_context(|_| error::ResolveFilePathSnafu { file_path: path.to_path_buf() })
}

fn default_application_name() -> String { DEFAULT_APPLICATION_NAME.to_string() }

fn default_builder_image_namespace() -> String { DEFAULT_BUILDER_IMAGE_NAMESPACE.to_string() }

const fn default_service_port() -> u16 { DEFAULT_SERVICE_PORT }
