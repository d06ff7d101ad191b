use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use duet_server::ServerConfig;
use std::net::IpAddr;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "duet")]
#[command(about = "Rendezvous and signaling relay for two-party media sessions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the signaling server.
    Serve(ServeArgs),
}

#[derive(clap::Args)]
struct ServeArgs {
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    port: u16,

    #[arg(long, default_value = "0.0.0.0")]
    host: IpAddr,

    /// Directory served for every path except the signaling socket.
    #[arg(long, env = "DUET_STATIC_DIR", default_value = "public")]
    static_dir: PathBuf,

    /// Serve only the signaling socket.
    #[arg(long)]
    no_static: bool,

    /// Queue depth between sockets and the session coordinator.
    #[arg(long, default_value_t = 100)]
    command_buffer: usize,
}

impl ServeArgs {
    fn into_config(self) -> ServerConfig {
        ServerConfig {
            host: self.host,
            port: self.port,
            static_dir: (!self.no_static).then_some(self.static_dir),
            command_buffer: self.command_buffer.max(1),
        }
    }
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("duet_server=info,duet_cli=info"))
        .context("Invalid log filter")?;

    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // Without a signal handler the server simply runs until killed.
        std::future::pending::<()>().await;
    }
    info!("Shutting down...");
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;

    let Cli { command } = Cli::parse();

    match command {
        Commands::Serve(args) => {
            let config = args.into_config();

            println!("{}", "Starting duet signaling server...".green().bold());
            match &config.static_dir {
                Some(dir) => println!("   Static files: {}", dir.display().to_string().cyan()),
                None => println!("   Static files: {}", "disabled".yellow()),
            }

            let listener = duet_server::bind(&config).await?;
            println!(
                "   Listening:    {}",
                format!("http://{}", listener.local_addr()?).cyan()
            );
            println!("   Press Ctrl+C to stop");

            duet_server::serve(listener, &config, shutdown_signal()).await?;
        }
    }

    Ok(())
}
