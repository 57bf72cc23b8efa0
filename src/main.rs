mod command;
mod config;
mod prelude;
mod setup;

use self::{command::Command, config::AppConfig};

#[derive(clap::Parser)]
#[clap(version, about = "Beat Saber map toolkit")]
struct Opts {
    #[clap(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    let opts: Opts = clap::Parser::parse();

    setup::setup()?;

    let config = AppConfig::load().map_err(|err| color_eyre::eyre::eyre!("{err:?}"))?;
    opts.command
        .execute(&config)
        .await
        .map_err(|err| color_eyre::eyre::eyre!("{err:?}"))
}
