//! CLI entry point for plume

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "plume")]
#[command(version)]
#[command(about = "A small static blog generator", long_about = None)]
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

    /// Create a new post or draft
    New {
        /// Layout to use (post, draft)
        #[arg(short, long, default_value = "post")]
        layout: String,

        /// Title of the new post
        title: String,

        /// Filename for the new post (without extension)
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Generate static files
    #[command(alias = "g")]
    Generate,

    /// Clean the public folder
    Clean,

    /// List site information
    List {
        /// Type of content to list (post, route)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        "plume=debug,info"
    } else {
        "plume=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

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
            plume::commands::init::init_site(&target_dir)?;
            println!("Initialized empty site in {:?}", target_dir);
        }

        Commands::New {
            layout,
            title,
            path,
        } => {
            let plume = plume::Plume::new(&base_dir)?;
            tracing::info!("Creating new {} with title: {}", layout, title);
            plume::commands::new::create_post(&plume, &title, &layout, path.as_deref())?;
        }

        Commands::Generate => {
            let plume = plume::Plume::new(&base_dir)?;
            tracing::info!("Generating static files...");
            plume.generate()?;
            println!("Generated successfully!");
        }

        Commands::Clean => {
            let plume = plume::Plume::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            plume.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List { r#type } => {
            let plume = plume::Plume::new(&base_dir)?;
            plume::commands::list::run(&plume, &r#type)?;
        }

        Commands::Version => {
            println!("plume version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
