//! Local admin CLI for a Stickerbox data directory.
//!
//! Operates on the storage directory and tag store directly, without going
//! through the HTTP API. Useful for inspecting and repairing a library from
//! the machine it lives on.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use stickerbox_core::{load_or_create_config, CoreConfig, RegistryService};

#[derive(Parser)]
#[command(name = "stickerbox")]
#[command(about = "Stickerbox sticker library admin CLI")]
struct Cli {
    /// Sticker storage directory
    #[arg(long, default_value = "./stickers")]
    data_dir: PathBuf,

    /// Tag store file
    #[arg(long, default_value = "./tags.json")]
    tags_file: PathBuf,

    /// Config file (created with defaults if missing)
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all stickers with tags and pin state
    List,
    /// List every tag in use
    Tags,
    /// Attach a tag to a sticker
    Tag { filename: String, tag: String },
    /// Detach a tag from a sticker
    Untag { filename: String, tag: String },
    /// Toggle a sticker's pinned state
    Pin { filename: String },
    /// Delete a sticker (requires the delete password)
    Delete { filename: String, password: String },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    std::fs::create_dir_all(&cli.data_dir)?;
    let config_file = load_or_create_config(&cli.config)?;
    let cfg = Arc::new(CoreConfig::new(
        cli.data_dir,
        PathBuf::from("./public"),
        cli.tags_file,
        config_file.delete_password,
    )?);
    let service = RegistryService::new(cfg);

    match cli.command {
        Commands::List => {
            for file in service.list_files()? {
                let pin = if file.pinned { "*" } else { " " };
                println!(
                    "{pin} {:<40} {:>10} bytes  [{}]",
                    file.name,
                    file.size,
                    file.tags.join(", ")
                );
            }
        }
        Commands::Tags => {
            for tag in service.list_all_tags() {
                println!("{tag}");
            }
        }
        Commands::Tag { filename, tag } => {
            service.add_tag(&filename, &tag)?;
            println!("tagged {filename} with {tag}");
        }
        Commands::Untag { filename, tag } => {
            service.remove_tag(&filename, &tag)?;
            println!("removed {tag} from {filename}");
        }
        Commands::Pin { filename } => {
            let pinned = service.toggle_pin(&filename)?;
            println!(
                "{filename} is now {}",
                if pinned { "pinned" } else { "unpinned" }
            );
        }
        Commands::Delete { filename, password } => {
            service.delete_file(&filename, &password)?;
            println!("deleted {filename}");
        }
    }

    Ok(())
}
