//! CLI entry point for general-studies

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "general-studies")]
#[command(version)]
#[command(about = "Generate and serve General Studies topic pages", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new page
    New {
        /// Title of the new page
        title: String,

        /// Slug of an existing page to add this one to as a child
        #[arg(short, long)]
        parent: Option<String>,
    },

    /// Generate static files
    #[command(alias = "g")]
    Generate {
        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Start a local server that renders pages on request
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// Clean the public folder
    Clean,

    /// List the page tree
    List,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "general_studies=debug,info"
    } else {
        "general_studies=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing site in {:?}", target_dir);
            general_studies::commands::init::init_site(&target_dir)?;
            println!("Initialized site in {:?}", target_dir);
        }

        Commands::New { title, parent } => {
            let site = general_studies::Site::new(&base_dir)?;
            tracing::info!("Creating new page with title: {}", title);
            general_studies::commands::new::create_page(&site, &title, parent.as_deref())?;
        }

        Commands::Generate { watch } => {
            let site = general_studies::Site::new(&base_dir)?;
            tracing::info!("Generating static files...");

            site.generate()?;
            println!("Generated successfully!");

            if watch {
                general_studies::commands::generate::watch(&site).await?;
            }
        }

        Commands::Server { port, ip } => {
            let site = general_studies::Site::new(&base_dir)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            general_studies::server::start(&site, &ip, port).await?;
        }

        Commands::Clean => {
            let site = general_studies::Site::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List => {
            let site = general_studies::Site::new(&base_dir)?;
            general_studies::commands::list::run(&site)?;
        }

        Commands::Version => {
            println!("general-studies version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
