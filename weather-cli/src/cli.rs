use std::sync::Arc;

use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use inquire::{Password, Text};
use tracing::debug;
use weather_core::{Config, FileStorage, HistoryStore, SearchController, provider_from_config};

use crate::{interactive, output};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather search with history and suggestions")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the weatherapi.com API key and an optional start-up place.
    Configure,

    /// Show current weather for a place.
    Show {
        /// Place name, e.g. "Lusaka".
        place: String,
    },

    /// List suggestions for partial input.
    Suggest {
        /// Partial place name.
        #[arg(default_value = "")]
        text: String,
    },

    /// Inspect or edit the search history.
    History {
        #[command(subcommand)]
        action: Option<HistoryAction>,
    },

    /// Search repeatedly with autocomplete.
    Interactive,
}

#[derive(Debug, Subcommand)]
pub enum HistoryAction {
    /// Print remembered places, most recent first.
    List,
    /// Forget one place (exact spelling).
    Remove { place: String },
    /// Forget every place.
    Clear,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;

        match self.command {
            Command::Configure => configure(config),
            Command::Show { place } => {
                let controller = build_controller(&config)?;
                controller.set_input(&place);
                let snapshot = controller.submit().await?;
                output::print_snapshot(&snapshot, config.client.show_country);
                Ok(())
            }
            Command::Suggest { text } => {
                let controller = build_controller(&config)?;
                controller.on_input(&text).await;
                output::print_suggestions(&controller.visible_suggestions());
                Ok(())
            }
            Command::History { action } => {
                let mut history = load_history(&config)?;
                match action.unwrap_or(HistoryAction::List) {
                    HistoryAction::List => output::print_history(history.entries()),
                    HistoryAction::Remove { place } => {
                        if !history.remove(&place) {
                            return Err(anyhow!("'{place}' is not in the search history"));
                        }
                        println!("Removed {place}");
                    }
                    HistoryAction::Clear => {
                        history.clear();
                        println!("Search history cleared");
                    }
                }
                Ok(())
            }
            Command::Interactive => {
                let controller = build_controller(&config)?;
                interactive::run(controller, &config).await
            }
        }
    }
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let api_key = Password::new("weatherapi.com API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    config.set_api_key(api_key);

    let default_place = Text::new("Place to show on start-up (optional):")
        .with_default(config.default_place.as_deref().unwrap_or(""))
        .prompt()
        .context("Failed to read default place")?;
    let default_place = default_place.trim();
    config.default_place = (!default_place.is_empty()).then(|| default_place.to_string());

    config.require_api_key()?;
    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

fn load_history(config: &Config) -> anyhow::Result<HistoryStore> {
    let dir = config.history_dir()?;
    debug!(dir = %dir.display(), "loading search history");
    Ok(HistoryStore::load(FileStorage::new(dir)))
}

fn build_controller(config: &Config) -> anyhow::Result<Arc<SearchController>> {
    let provider = provider_from_config(config)?;
    let history = load_history(config)?;
    Ok(Arc::new(SearchController::new(Arc::from(provider), history)))
}
