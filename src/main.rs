#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]

use crate::command::server;
use crate::configuration::Configuration;
use crate::proxy::ProviderRegistry;
use argh::FromArgs;
use std::net::SocketAddr;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

mod command;
mod configuration;
mod proxy;
mod secret;

fn set_tracing() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().json())
        .try_init();
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8018))
}

#[derive(FromArgs, PartialEq, Debug)]
/// Simple HTTP server to proxy authentication requests.
struct Arguments {
    #[argh(option, short = 'b', default = "default_bind_address()")]
    /// IP and port to bind to, defaults to `127.0.0.1:8018`
    bind: SocketAddr,

    #[argh(option, short = 'u')]
    /// URI of an authentication server, repeat for multiple servers
    uri: Vec<String>,

    #[argh(option, short = 'c')]
    /// optional path to a TOML configuration file
    config: Option<String>,
}

fn main() -> ExitCode {
    let arguments: Arguments = argh::from_env();

    match run(arguments) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}

fn run(arguments: Arguments) -> Result<(), command::Error> {
    let config = match &arguments.config {
        Some(path) => Configuration::load(path)?,
        None => Configuration::default(),
    };

    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.global.worker_threads)
        .enable_all()
        .build()?
        .block_on(run_command(arguments, config))
}

async fn run_command(arguments: Arguments, config: Configuration) -> Result<(), command::Error> {
    set_tracing();

    let registry = ProviderRegistry::default();
    let server = server::Command::new(arguments.bind, &arguments.uri, &config, &registry).await?;
    server.run(shutdown_signal()).await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        error!("Unable to listen for the interrupt signal: {error}");
        std::future::pending::<()>().await;
    }
}
