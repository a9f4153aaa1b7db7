//! CLI entry point for learnsite

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use learnsite::content::ContentType;
use learnsite::{commands, server, LearnSite};

#[derive(Parser)]
#[command(name = "learnsite")]
#[command(version)]
#[command(about = "Static route enumeration and site generation for a learning portal", long_about = None)]
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
    /// Initialize a new site with sample content
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new document
    New {
        /// Collection: instructor, lab, lesson, module, track, page
        r#type: ContentType,

        /// Route path of the document, e.g. blue-team/log-analysis
        path: String,

        /// Display title (derived from the path when omitted)
        #[arg(short, long)]
        title: Option<String>,
    },

    /// Generate static files
    #[command(alias = "g")]
    Generate {
        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Start a local server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Serve the generated files only, without watching or revalidating
        #[arg(long)]
        r#static: bool,
    },

    /// Clean the public folder
    Clean,

    /// List the static routes of a collection
    List {
        /// Collection name, or `all`
        #[arg(default_value = "all")]
        r#type: String,
    },

    /// Resolve a single document by its route
    Show {
        r#type: ContentType,
        route: String,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "learnsite=debug,info"
    } else {
        "learnsite=info"
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
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing site in {:?}", target_dir);
            commands::init::init_site(&target_dir)?;
            println!("Initialized site in {:?}", target_dir);
        }

        Commands::New {
            r#type,
            path,
            title,
        } => {
            let site = LearnSite::new(&base_dir)?;
            let file = commands::new::create_document(&site, r#type, &path, title.as_deref())?;
            println!("Created: {:?}", file);
        }

        Commands::Generate { watch } => {
            let site = LearnSite::new(&base_dir)?;
            tracing::info!("Generating static files...");
            site.generate().await?;
            println!("Generated successfully!");

            if watch {
                commands::generate::watch(&site).await?;
            }
        }

        Commands::Server { port, ip, r#static } => {
            let site = LearnSite::new(&base_dir)?;

            // Generate first
            tracing::info!("Generating static files...");
            site.generate().await?;

            tracing::info!("Starting server at http://{}:{}", ip, port);
            server::start(&site, &ip, port, r#static).await?;
        }

        Commands::Clean => {
            let site = LearnSite::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List { r#type } => {
            let site = LearnSite::new(&base_dir)?;
            commands::list::run(&site, &r#type).await?;
        }

        Commands::Show { r#type, route } => {
            let site = LearnSite::new(&base_dir)?;
            commands::show::run(&site, r#type, &route).await?;
        }

        Commands::Version => {
            println!("learnsite version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
