use clap::Subcommand;

use crate::{
    cli::{Error, write_stdout},
    platform::Platform,
    service::Session,
    ui::table::TableExt,
};

#[derive(Clone, Subcommand)]
pub enum ApplicationCommands {
    /// Creates an application and makes it the active one.
    #[command(about = "Create an application and make it the active one")]
    Create {
        #[arg(help = "Name of the application")]
        name: String,
    },

    /// Prints the active application.
    #[command(about = "Print the active application")]
    Get {
        #[arg(short, long, help = "Print the name only")]
        short: bool,
    },

    /// Makes an existing application the active one.
    #[command(about = "Make an existing application the active one")]
    Set {
        #[arg(help = "Name of the application")]
        name: String,
    },

    /// Lists the applications of the current project.
    #[command(alias = "ls", about = "List the applications of the current project")]
    List,

    /// Deletes every component and URL of an application.
    #[command(about = "Delete an application with all its components and URLs")]
    Delete {
        #[arg(help = "Name of the application")]
        name: String,
    },
}

impl ApplicationCommands {
    pub async fn run<P>(self, session: &Session<P>) -> Result<(), Error>
    where
        P: Platform,
    {
        let applications = session.applications();
        match self {
            Self::Create { name } => {
                applications.create(&name)?;
                write_stdout(format!("Switched to application: {name}\n")).await
            }
            Self::Get { short } => {
                let name = applications.current()?;
                if short {
                    write_stdout(format!("{name}\n")).await
                } else {
                    write_stdout(format!("The current application is: {name}\n")).await
                }
            }
            Self::Set { name } => {
                applications.set_current(&name).await?;
                write_stdout(format!("Switched to application: {name}\n")).await
            }
            Self::List => {
                let list = applications.list().await?;
                if list.is_empty() {
                    write_stdout("There are no applications in the current project\n").await
                } else {
                    write_stdout(format!("{}\n", list.render_table())).await
                }
            }
            Self::Delete { name } => {
                let deleted = applications.delete(&name).await?;
                let output = deleted
                    .iter()
                    .map(|reference| format!("{reference} deleted\n"))
                    .chain([format!("Deleted application: {name}\n")])
                    .collect::<String>();
                write_stdout(output).await
            }
        }
    }
}
