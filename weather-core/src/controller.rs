//! Search box orchestration.
//!
//! [`SearchController`] turns input events into suggestion lookups and
//! weather fetches and keeps the visible [`UiState`]. State lives behind a
//! mutex that is never held across an `.await`, so several lookups may be in
//! flight at once. The suggestion panel and the result area each apply only
//! their latest issued request.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use crate::{
    HistoryStore, PlaceQuery, SuggestionItem, SuggestionPanel, SuggestionProvider, UiState,
    WeatherError, WeatherProvider, WeatherSnapshot, request::RequestRegion, suggest::combine,
};

/// Keys the search box reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
}

#[derive(Debug)]
struct ControllerState {
    input: String,
    panel: SuggestionPanel,
    ui: UiState,
    results: RequestRegion,
    history: HistoryStore,
}

#[derive(Debug)]
pub struct SearchController {
    provider: Arc<dyn WeatherProvider>,
    suggestions: SuggestionProvider,
    state: Mutex<ControllerState>,
}

impl SearchController {
    pub fn new(provider: Arc<dyn WeatherProvider>, history: HistoryStore) -> Self {
        Self {
            suggestions: SuggestionProvider::new(provider.clone()),
            provider,
            state: Mutex::new(ControllerState {
                input: String::new(),
                panel: SuggestionPanel::new(),
                ui: UiState::Idle,
                results: RequestRegion::new(),
                history,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn input(&self) -> String {
        self.lock().input.clone()
    }

    pub fn ui_state(&self) -> UiState {
        self.lock().ui.clone()
    }

    /// Items currently shown in the suggestion panel; empty while hidden.
    pub fn visible_suggestions(&self) -> Vec<SuggestionItem> {
        let state = self.lock();
        if state.panel.is_visible() { state.panel.items().to_vec() } else { Vec::new() }
    }

    pub fn selected_suggestion(&self) -> Option<usize> {
        self.lock().panel.cursor()
    }

    pub fn history(&self) -> Vec<String> {
        self.lock().history.entries().to_vec()
    }

    /// Run `f` against the history store.
    pub fn with_history<R>(&self, f: impl FnOnce(&mut HistoryStore) -> R) -> R {
        f(&mut self.lock().history)
    }

    /// Replace the input text without looking up suggestions.
    pub fn set_input(&self, text: &str) {
        self.lock().input = text.to_string();
    }

    /// Replace the input text and refresh suggestions for it.
    pub async fn on_input(&self, text: &str) {
        self.lock().input = text.to_string();
        self.refresh_suggestions().await;
    }

    pub async fn on_focus(&self) {
        self.refresh_suggestions().await;
    }

    /// Outside interaction: hide the panel.
    pub fn dismiss(&self) {
        self.lock().panel.hide();
    }

    pub async fn on_key(&self, key: Key) {
        match key {
            Key::ArrowDown => self.move_cursor(SuggestionPanel::move_down),
            Key::ArrowUp => self.move_cursor(SuggestionPanel::move_up),
            Key::Escape => self.dismiss(),
            Key::Enter => {
                let selected = self.lock().panel.activate_selected();
                match selected {
                    Some(place) => log_outcome(self.select(&place).await),
                    None => log_outcome(self.submit().await),
                }
            }
        }
    }

    /// Pointer activation of the suggestion at `index`.
    pub async fn click_suggestion(&self, index: usize) {
        let activated = self.lock().panel.activate(index);
        if let Some(place) = activated {
            log_outcome(self.select(&place).await);
        }
    }

    /// Delete the history entry shown at `index` and re-render from the current input.
    pub async fn delete_suggestion(&self, index: usize) -> bool {
        {
            let mut state = self.lock();
            let Some(place) = state.panel.delete(index) else {
                return false;
            };
            state.history.remove(&place);
        }
        self.refresh_suggestions().await;
        true
    }

    /// Submit the current input.
    pub async fn submit(&self) -> Result<WeatherSnapshot, WeatherError> {
        let query = {
            let mut state = self.lock();
            match PlaceQuery::parse(&state.input) {
                Ok(query) => {
                    state.input.clear();
                    state.panel.hide();
                    query
                }
                Err(err) => {
                    state.ui = UiState::Error(err.to_string());
                    return Err(err);
                }
            }
        };
        self.search(query).await
    }

    /// Fetch current conditions for `query` and update the result area.
    pub async fn search(&self, query: PlaceQuery) -> Result<WeatherSnapshot, WeatherError> {
        let id = {
            let mut state = self.lock();
            state.ui = UiState::Loading;
            state.results.issue()
        };

        let result = self.provider.fetch_current(&query).await;

        let mut state = self.lock();
        if result.is_ok() {
            state.history.record(query.as_str());
        }
        if state.results.is_latest(id) {
            state.ui = match &result {
                Ok(snapshot) => UiState::Success(snapshot.clone()),
                Err(err) => UiState::Error(err.to_string()),
            };
        } else {
            debug!(place = %query, "dropping stale weather response");
        }
        result
    }

    async fn select(&self, place: &str) -> Result<WeatherSnapshot, WeatherError> {
        self.lock().input = place.to_string();
        self.search(PlaceQuery::parse(place)?).await
    }

    fn move_cursor(&self, step: fn(&mut SuggestionPanel)) {
        let mut state = self.lock();
        if state.panel.is_visible() {
            step(&mut state.panel);
        }
    }

    async fn refresh_suggestions(&self) {
        let (id, text, local) = {
            let mut state = self.lock();
            let id = state.panel.begin_request();
            let local = state.history.matching(&state.input);
            (id, state.input.clone(), local)
        };

        let remote = self.suggestions.remote_matches(&text).await;

        if !self.lock().panel.render(id, combine(local, remote)) {
            debug!(text, "dropping stale suggestions");
        }
    }
}

// The outcome is already reflected in `UiState`.
fn log_outcome(result: Result<WeatherSnapshot, WeatherError>) {
    if let Err(err) = result {
        debug!(error = %err, "weather lookup failed");
    }
}
