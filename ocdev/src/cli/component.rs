use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::{
    cli::{Error, resolve_directory, write_stdout},
    platform::Platform,
    service::Session,
    ui::table::TableExt,
};

#[derive(Args, Clone)]
pub struct CreateComponentCommand {
    #[arg(help = "Builder image type, optionally with a tag, e.g. nodejs or nodejs:8")]
    pub component_type: String,

    #[arg(help = "Name of the component. Defaults to the builder image name.")]
    pub name: Option<String>,

    #[arg(long, conflicts_with = "local", help = "Git repository to build the component from")]
    pub git: Option<String>,

    #[arg(
        long,
        help = "Local directory to build the component from. Defaults to the current directory \
                when --git is not given."
    )]
    pub local: Option<PathBuf>,
}

impl CreateComponentCommand {
    async fn run<P>(self, session: &Session<P>) -> Result<(), Error>
    where
        P: Platform,
    {
        let Self { component_type, name, git, local } = self;
        let name = name.unwrap_or_else(|| default_component_name(&component_type));
        let components = session.components();

        let created = if let Some(uri) = git {
            components.create_from_git(&name, &component_type, &uri).await?
        } else {
            let directory = resolve_directory(&local.unwrap_or_else(|| PathBuf::from(".")))?;
            write_stdout(format!("Creating component {name}, building {}\n", directory.display()))
                .await?;
            components.create_from_dir(&name, &component_type, &directory).await?
        };

        let output = created
            .resources
            .iter()
            .map(|reference| format!("{reference} created\n"))
            .chain([format!(
                "Component '{name}' was created in application '{}'\n",
                created.application
            )])
            .chain(created.build.map(|build| format!("Build {build} started\n")))
            .collect::<String>();
        write_stdout(output).await
    }
}

#[derive(Clone, Subcommand)]
pub enum ComponentCommands {
    /// Creates a component in the active application.
    #[command(about = "Create a component in the active application")]
    Create(Box<CreateComponentCommand>),

    /// Prints the active component.
    #[command(about = "Print the active component")]
    Get {
        #[arg(short, long, help = "Print the name only")]
        short: bool,
    },

    /// Makes an existing component the active one.
    #[command(about = "Make an existing component the active one")]
    Set {
        #[arg(help = "Name of the component")]
        name: String,
    },

    /// Lists the components of the active application.
    #[command(alias = "ls", about = "List the components of the active application")]
    List,

    /// Deletes a component, the active one if no name is given.
    #[command(about = "Delete a component, the active one if no name is given")]
    Delete {
        #[arg(help = "Name of the component")]
        name: Option<String>,
    },
}

impl ComponentCommands {
    pub async fn run<P>(self, session: &Session<P>) -> Result<(), Error>
    where
        P: Platform,
    {
        let components = session.components();
        match self {
            Self::Create(cmd) => (*cmd).run(session).await,
            Self::Get { short } => {
                let name = components.current()?;
                if short {
                    write_stdout(format!("{name}\n")).await
                } else {
                    write_stdout(format!("The current component is: {name}\n")).await
                }
            }
            Self::Set { name } => {
                components.set_current(&name).await?;
                write_stdout(format!("Switched to component: {name}\n")).await
            }
            Self::List => {
                let list = components.list().await?;
                if list.is_empty() {
                    write_stdout("There are no components in the active application\n").await
                } else {
                    write_stdout(format!("{}\n", list.render_table())).await
                }
            }
            Self::Delete { name } => {
                let name = match name.filter(|name| !name.is_empty()) {
                    Some(name) => name,
                    None => components.current()?,
                };
                let deleted = components.delete(&name).await?;
                let output = deleted
                    .iter()
                    .map(|reference| format!("{reference} deleted\n"))
                    .chain([format!("Component '{name}' was deleted\n")])
                    .collect::<String>();
                write_stdout(output).await
            }
        }
    }
}

/// `nodejs:8` and `openshift/nodejs` both name a component `nodejs`.
fn default_component_name(component_type: &str) -> String {
    let image = component_type.rsplit('/').next().unwrap_or(component_type);
    image.split(':').next().unwrap_or(image).to_string()
}
