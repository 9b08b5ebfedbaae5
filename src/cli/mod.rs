use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::parsers::DocumentParser;
use crate::services::{analyzer, ProviderDirectory};

/// Normalize domain/provider configuration into canonical service trees
#[derive(Parser)]
#[command(name = "domainstack")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a configuration file and print the normalized tree as JSON
    Parse {
        /// YAML configuration file
        file: PathBuf,

        /// Print compact JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,

        /// Alternative provider directory YAML (defaults to the bundled one)
        #[arg(long)]
        dictionary: Option<PathBuf>,
    },

    /// Report provider names that are missing from the directory
    Candidates {
        /// YAML configuration file
        file: PathBuf,

        /// Alternative provider directory YAML (defaults to the bundled one)
        #[arg(long)]
        dictionary: Option<PathBuf>,
    },

    /// Resolve a slug or URL against the provider directory
    Lookup {
        /// Provider slug, alias, or URL
        query: String,

        /// Alternative provider directory YAML (defaults to the bundled one)
        #[arg(long)]
        dictionary: Option<PathBuf>,
    },
}

fn load_directory(dictionary: Option<&PathBuf>) -> ProviderDirectory {
    match dictionary {
        Some(path) => ProviderDirectory::from_path(path),
        None => ProviderDirectory::bundled(),
    }
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Commands::Parse {
                file,
                compact,
                dictionary,
            } => {
                let directory = load_directory(dictionary.as_ref());
                let document = DocumentParser::new(&directory).parse_file(&file)?;
                let output = if compact {
                    serde_json::to_string(&document)?
                } else {
                    serde_json::to_string_pretty(&document)?
                };
                println!("{}", output);
                Ok(())
            }
            Commands::Candidates { file, dictionary } => {
                let directory = load_directory(dictionary.as_ref());
                let document = DocumentParser::new(&directory).parse_file(&file)?;
                println!("{}", analyzer::report(&document, &directory));
                Ok(())
            }
            Commands::Lookup { query, dictionary } => {
                let directory = load_directory(dictionary.as_ref());
                let entry = directory
                    .lookup(&query)
                    .or_else(|| directory.match_url(&query));
                match entry {
                    Some(entry) => {
                        println!("{}: {}", entry.key, entry.name);
                        if let Some(url) = &entry.url {
                            println!("  url: {}", url);
                        }
                        if let Some(image) = &entry.image_url {
                            println!("  image: {}", image);
                        }
                        Ok(())
                    }
                    None => anyhow::bail!("no provider found for '{}'", query),
                }
            }
        }
    }
}
