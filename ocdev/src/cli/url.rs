use clap::Subcommand;

use crate::{
    cli::{Error, write_stdout},
    platform::Platform,
    service::Session,
    ui::table::TableExt,
};

#[derive(Clone, Subcommand)]
pub enum UrlCommands {
    /// Exposes a component outside the cluster.
    #[command(about = "Create a URL for a component, the active one if no name is given")]
    Create {
        #[arg(help = "Name of the component")]
        component: Option<String>,
    },

    /// Deletes a URL by its name.
    #[command(about = "Delete a URL")]
    Delete {
        #[arg(help = "Name of the URL, as printed by `url list`")]
        name: String,
    },

    /// Lists URLs of an application, optionally of one component only.
    #[command(alias = "ls", about = "List URLs")]
    List {
        #[arg(short, long, help = "List URLs of this application instead of the active one")]
        application: Option<String>,

        #[arg(short, long, help = "List URLs of this component only")]
        component: Option<String>,
    },
}

impl UrlCommands {
    pub async fn run<P>(self, session: &Session<P>) -> Result<(), Error>
    where
        P: Platform,
    {
        let urls = session.urls();
        match self {
            Self::Create { component } => {
                let url = urls.create(component.as_deref()).await?;
                write_stdout(format!(
                    "URL created for component: {}\n\n{} - {}\n",
                    url.component, url.name, url.url
                ))
                .await
            }
            Self::Delete { name } => {
                urls.delete(&name).await?;
                write_stdout(format!("Deleted URL: {name}\n")).await
            }
            Self::List { application, component } => {
                let list = urls.list(component.as_deref(), application.as_deref()).await?;
                if list.is_empty() {
                    write_stdout("No URLs found\n").await
                } else {
                    write_stdout(format!("{}\n", list.render_table())).await
                }
            }
        }
    }
}
