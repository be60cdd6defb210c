//! Triage - Kubernetes incident investigation service

use clap::{Parser, Subcommand};
use triage_core::{BindMode, GatewayConfig, IncidentDescriptor};
use triage_gateway::{build_graph, start_gateway};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "triage", about = "Triage - SRE incident investigation agent")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the ingress server
    Serve {
        #[arg(short, long, default_value = "8000")]
        port: u16,
        #[arg(short, long, default_value = "lan")]
        bind: String,
    },
    /// Investigate a single incident from the command line
    Investigate {
        #[arg(long)]
        event_type: String,
        #[arg(long, default_value = "medium")]
        severity: String,
        #[arg(long)]
        resource: String,
        #[arg(long)]
        message: String,
    },
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "triage=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Some(Commands::Serve { port, bind }) => {
            let bind_mode = match bind.as_str() {
                "loopback" | "localhost" | "127.0.0.1" => BindMode::Loopback,
                _ => BindMode::Lan,
            };
            start_gateway(GatewayConfig {
                port,
                bind: bind_mode,
            })
            .await?;
        }

        Some(Commands::Investigate {
            event_type,
            severity,
            resource,
            message,
        }) => {
            let incident = IncidentDescriptor {
                event_type,
                severity,
                resource,
                message,
            };

            let (graph, _) = build_graph()?;
            let state = graph.run(incident).await?;

            println!(
                "decision:   {}",
                state.decision().map(|d| d.as_str()).unwrap_or("none")
            );
            println!("root cause: {}", state.root_cause().unwrap_or("unknown"));
        }

        Some(Commands::Version) => {
            println!("triage v{}", env!("CARGO_PKG_VERSION"));
        }

        // No subcommand = serve with defaults
        None => {
            start_gateway(GatewayConfig::default()).await?;
        }
    }

    Ok(())
}
