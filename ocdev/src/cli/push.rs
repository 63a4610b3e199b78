use std::path::PathBuf;

use clap::Args;

use crate::{
    cli::{Error, resolve_directory, write_stdout},
    platform::Platform,
    service::Session,
};

#[derive(Args, Clone)]
pub struct PushCommand {
    #[arg(help = "Name of the component. Defaults to the active component.")]
    pub component: Option<String>,

    #[arg(
        long,
        help = "Directory to upload. Defaults to the directory the component was created from."
    )]
    pub local: Option<PathBuf>,
}

impl PushCommand {
    pub async fn run<P>(self, session: &Session<P>) -> Result<(), Error>
    where
        P: Platform,
    {
        let Self { component, local } = self;
        let directory = local.as_deref().map(resolve_directory).transpose()?;

        let build = session.components().push(component.as_deref(), directory.as_deref()).await?;
        write_stdout(format!("Build {build} started\n")).await
    }
}
