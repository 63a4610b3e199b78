//! The `ocdev` command line.
//!
//! Every command resolves the current project from the kubeconfig and the
//! active application and component from the context file, so most of them
//! can be run without naming anything:
//!
//! ```bash
//! # Create a component from the current directory and start its first build
//! ocdev component create nodejs
//!
//! # Upload the directory again after changing it
//! ocdev push
//!
//! # Expose the active component and list its URLs
//! ocdev url create
//! ocdev url list
//! ```

mod application;
mod component;
pub mod error;
mod push;
mod url;

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use clap::{CommandFactory, Parser, Subcommand};
use ocdev_base::CLI_PROGRAM_NAME;
use resolve_path::PathResolveExt;
use snafu::ResultExt;
use tokio::{io::AsyncWriteExt, runtime::Runtime};

pub use self::error::Error;
use self::{
    application::ApplicationCommands, component::ComponentCommands, push::PushCommand,
    url::UrlCommands,
};
use crate::{
    config::Config, context::ContextStore, platform::KubePlatform, service::Session, shadow,
};

#[derive(Parser)]
#[command(
    name = CLI_PROGRAM_NAME,
    author,
    version,
    long_version = shadow::CLAP_LONG_VERSION,
    about = "ocdev: develop applications on OpenShift from the command line.",
    long_about = "ocdev manages components (builds, deployments, services and routes) grouped \
                  into applications inside an OpenShift project. Applications and components \
                  exist only as labels on cluster objects; the active application and component \
                  are remembered locally so commands can omit them.",
    color = clap::ColorChoice::Always
)]
pub struct Cli {
    #[clap(subcommand)]
    commands: Option<Commands>,

    #[clap(
        long = "config",
        short = 'c',
        env = "OCDEV_CONFIG_FILE_PATH",
        help = "Specify a configuration file. Defaults to ~/.config/ocdev/config.yaml or \
                OCDEV_CONFIG_FILE_PATH env var."
    )]
    config_file: Option<PathBuf>,

    #[clap(
        long = "log-level",
        env = "OCDEV_LOG_LEVEL",
        help = "Set the logging level (e.g., info, debug, trace)."
    )]
    log_level: Option<tracing::Level>,
}

#[derive(Clone, Subcommand)]
pub enum Commands {
    #[command(about = "Display client and server version information")]
    Version {
        #[clap(long = "client", help = "If true, shows client version only (no server required).")]
        client: bool,
    },

    #[command(about = "Generate shell completion script for the specified shell (bash, zsh, fish)")]
    Completions { shell: clap_complete::Shell },

    #[command(about = "Output the default configuration in YAML format")]
    DefaultConfig,

    #[command(alias = "app", about = "Manage applications in the current project")]
    Application {
        #[command(subcommand)]
        commands: ApplicationCommands,
    },

    #[command(alias = "cmp", about = "Manage components of the active application")]
    Component {
        #[command(subcommand)]
        commands: ComponentCommands,
    },

    #[command(about = "Start a new build of a component")]
    Push(PushCommand),

    #[command(about = "Expose components outside the cluster")]
    Url {
        #[command(subcommand)]
        commands: UrlCommands,
    },
}

impl Default for Cli {
    fn default() -> Self { Self::parse() }
}

impl Cli {
    fn load_config(&self) -> Result<Config, Error> {
        let mut config =
            Config::load(self.config_file.clone().unwrap_or_else(Config::search_config_file_path))?;

        if let Some(log_level) = self.log_level {
            config.log.level = log_level;
        }

        Ok(config)
    }

    /// Runs the parsed command and returns the exit code.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded, the cluster
    /// cannot be reached, or the command fails.
    ///
    /// # Panics
    ///
    /// Panics if writing the version, completions or default configuration
    /// to standard output fails.
    pub fn run(self) -> Result<i32, Error> {
        let client_version = Self::command().get_version().unwrap_or_default().to_string();
        match self.commands {
            Some(Commands::Version { client }) if client => {
                std::io::stdout()
                    .write_all(Self::command().render_long_version().as_bytes())
                    .expect("Failed to write to stdout");
                std::io::stdout()
                    .write_all(format!("Client Version: {client_version}\n").as_bytes())
                    .expect("Failed to write to stdout");

                return Ok(0);
            }
            Some(Commands::Completions { shell }) => {
                let mut app = Self::command();
                let bin_name = app.get_name().to_string();
                clap_complete::generate(shell, &mut app, bin_name, &mut std::io::stdout());
                return Ok(0);
            }
            Some(Commands::DefaultConfig) => {
                std::io::stdout()
                    .write_all(Config::template_basic().as_slice())
                    .expect("Failed to write to stdout");
                return Ok(0);
            }
            None => {
                let help = Self::command().render_long_help().ansi().to_string();
                std::io::stderr().write_all(help.as_bytes()).expect("Failed to write to stderr");
                return Ok(-1);
            }
            _ => {}
        }

        let config = self.load_config()?;
        config.log.registry();
        tracing::debug!("Using context file {}", config.context_file_path.display());

        let fut = async move {
            let kube_client = kube::Client::try_default().await.context(error::KubeConfigSnafu)?;

            if let Some(Commands::Version { .. }) = self.commands {
                let server_version = kube_client.apiserver_version().await.map_or_else(
                    |_| "unknown".to_string(),
                    |info| format!("{}.{}", info.major, info.minor),
                );
                let info =
                    format!("Client Version: {client_version}\nServer Version: {server_version}\n");
                write_stdout(Self::command().render_long_version()).await?;
                write_stdout(info).await?;
                return Ok(0);
            }

            let Config {
                default_application_name,
                builder_image_namespace,
                service_port,
                context_file_path,
                ..
            } = config;
            let platform = KubePlatform::new(kube_client, builder_image_namespace, service_port);
            let context = ContextStore::new(context_file_path);
            let session = Session::new(platform, context, default_application_name);

            match self.commands {
                Some(Commands::Application { commands }) => commands.run(&session).await?,
                Some(Commands::Component { commands }) => commands.run(&session).await?,
                Some(Commands::Push(cmd)) => cmd.run(&session).await?,
                Some(Commands::Url { commands }) => commands.run(&session).await?,
                _ => {}
            }

            Ok(0)
        };

        Runtime::new().context(error::InitializeTokioRuntimeSnafu)?.block_on(fut)
    }
}

async fn write_stdout(text: impl AsRef<[u8]>) -> Result<(), Error> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(text.as_ref()).await.context(error::WriteStdoutSnafu)?;
    stdout.flush().await.context(error::WriteStdoutSnafu)
}

/// Absolute form of a directory given on the command line.
fn resolve_directory(directory: &Path) -> Result<PathBuf, Error> {
    directory
        .try_resolve()
        .map(|path| path.to_path_buf())
        .with_context(|_| error::ResolveDirectorySnafu { directory: directory.to_path_buf() })
}
