//! Prompt loop with autocomplete backed by the search controller.

use std::sync::Arc;

use anyhow::Context;
use inquire::{Autocomplete, CustomUserError, InquireError, Text, autocompletion::Replacement};
use tokio::runtime::Handle;
use weather_core::{Config, PlaceQuery, SearchController};

use crate::output;

pub async fn run(controller: Arc<SearchController>, config: &Config) -> anyhow::Result<()> {
    let show_country = config.client.show_country;

    if let Some(place) = config.default_place.as_deref() {
        if let Ok(query) = PlaceQuery::parse(place) {
            controller.search(query).await.ok();
            output::print_state(&controller.ui_state(), show_country);
        }
    }

    let handle = Handle::current();
    tokio::task::spawn_blocking(move || prompt_loop(&controller, &handle, show_country))
        .await
        .context("Interactive prompt stopped unexpectedly")?
}

// Runs on a blocking thread, so it can drive async calls with `block_on`.
fn prompt_loop(
    controller: &Arc<SearchController>,
    handle: &Handle,
    show_country: bool,
) -> anyhow::Result<()> {
    loop {
        let completer = PlaceCompleter { controller: controller.clone(), handle: handle.clone() };
        let answer = Text::new("Place:")
            .with_autocomplete(completer)
            .with_help_message("↑↓ to pick a suggestion, Enter to search, Esc to quit")
            .prompt();

        let place = match answer {
            Ok(place) => place,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                controller.dismiss();
                return Ok(());
            }
            Err(err) => return Err(err).context("Failed to read place"),
        };

        controller.set_input(&place);
        // Failures are shown through the controller's error state.
        handle.block_on(controller.submit()).ok();
        output::print_state(&controller.ui_state(), show_country);
    }
}

#[derive(Debug, Clone)]
struct PlaceCompleter {
    controller: Arc<SearchController>,
    handle: Handle,
}

impl Autocomplete for PlaceCompleter {
    fn get_suggestions(&mut self, input: &str) -> Result<Vec<String>, CustomUserError> {
        self.handle.block_on(self.controller.on_input(input));
        Ok(self
            .controller
            .visible_suggestions()
            .iter()
            .filter_map(|item| item.place().map(str::to_string))
            .collect())
    }

    fn get_completion(
        &mut self,
        _input: &str,
        highlighted_suggestion: Option<String>,
    ) -> Result<Replacement, CustomUserError> {
        Ok(highlighted_suggestion)
    }
}
