//! Dropload CLI - run the upload relay or upload files directly
//!
//! ```bash
//! dropload serve                        # Start HTTP relay (port 5000)
//! dropload upload photo.png -s imgur    # Upload a local file, print the link
//! dropload services                     # Show configured services
//! ```

use clap::{Parser, Subcommand};
use dropload::{Config, HostRegistry, Service, UploadFile};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dropload")]
#[command(about = "Upload files to Catbox or Imgur", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start HTTP relay
    Serve {
        /// Port to listen on (default: DROPLOAD_PORT or 5000)
        #[arg(short, long)]
        port: Option<u16>,

        /// Directory with the built frontend
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Upload a local file and print its link
    Upload {
        /// File to upload
        input: PathBuf,

        /// Destination service: catbox or imgur (default: DROPLOAD_DEFAULT_SERVICE)
        #[arg(short, long)]
        service: Option<Service>,
    },

    /// List configured services
    Services,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("dropload=info,tower_http=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match Config::from_env() {
        Ok(config) => match cli.command {
            Commands::Serve { port, static_dir } => cmd_serve(config, port, static_dir).await,
            Commands::Upload { input, service } => cmd_upload(&config, &input, service).await,
            Commands::Services => cmd_services(&config),
        },
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn cmd_serve(
    mut config: Config,
    port: Option<u16>,
    static_dir: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(port) = port {
        config.port = port;
    }
    if let Some(dir) = static_dir {
        config.static_dir = dir;
    }
    if !config.static_dir.exists() {
        tracing::warn!(
            "Static directory {} does not exist, only the API will be served",
            config.static_dir.display()
        );
    }

    dropload::server::start_server(config).await
}

async fn cmd_upload(
    config: &Config,
    input: &Path,
    service: Option<Service>,
) -> Result<(), Box<dyn std::error::Error>> {
    let service = service.unwrap_or(config.default_service);
    let registry = HostRegistry::from_config(config)?;
    let host = registry
        .get(service)
        .ok_or_else(|| format!("Service not available: {}", service))?;

    let bytes = tokio::fs::read(input).await?;
    let file_name = input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload");
    let file = UploadFile::new(file_name, None, bytes);

    eprintln!("📤 Uploading {} ({} bytes) to {}", file.file_name, file.len(), service);
    let link = host.upload(file).await?;
    eprintln!("✅ Upload complete");

    println!("{}", link);
    Ok(())
}

fn cmd_services(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let registry = HostRegistry::from_config(config)?;
    let available = registry.services();

    for service in Service::ALL {
        let status = if available.contains(&service) {
            "available"
        } else {
            "not configured"
        };
        let marker = if service == config.default_service { " (default)" } else { "" };
        println!("  {}{} - {}", service, marker, status);
    }

    Ok(())
}
