mod api;
pub mod fetch;
pub mod lookup;

use clap::{Parser, Subcommand};
use eyre::{eyre, Result, WrapErr};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    fmt,
    prelude::*,
};

use base::setting::{load, Settings};
use base::CLI_NAME;
use fetch::musicbrainz::MusicBrainzClient;

#[derive(Parser)]
#[command(name = CLI_NAME, author, version, about, long_about = None)]
#[command(next_line_help = true)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(short, long, name = "ADDRESS", default_value_t = String::from("127.0.0.1:5000"))]
    listen_address: String,

    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Prints the default configuration file
    DefaultConfig,
    Serve,
}

#[tokio::main]
async fn main() -> Result<()> {
    // logging
    color_eyre::install()?;
    let tracing_builder = tracing_subscriber::registry().with(fmt::layer());
    if std::env::var(base::ONTHISDAY_LOGLEVEL).is_ok() {
        tracing_builder.with(EnvFilter::from_env(base::ONTHISDAY_LOGLEVEL))
    } else {
        tracing_builder.with(EnvFilter::default().add_directive(LevelFilter::INFO.into()))
    }
    .init();

    let cli = Cli::parse();
    match cli.command.unwrap_or(Command::Serve) {
        Command::DefaultConfig => {
            let str = toml::to_string(&Settings::default())?;
            println!("{}", str);
            Ok(())
        }
        Command::Serve => {
            let settings = load(cli.config)?;
            let catalog = MusicBrainzClient::new(&settings.musicbrainz)
                .wrap_err(eyre!("Could not build the MusicBrainz client"))?;
            let state = api::AppState::new(Arc::new(catalog), settings);

            let addr: SocketAddr = cli
                .listen_address
                .parse()
                .wrap_err(eyre!("Invalid listen address"))?;
            tracing::info! {%addr, "Listening"};
            axum::Server::bind(&addr)
                .serve(api::router(state).into_make_service())
                .await?;
            Ok(())
        }
    }
}
