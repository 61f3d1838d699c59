use std::sync::Arc;

use tracing::debug;

use crate::{HistoryStore, RemotePlace, SuggestionItem, WeatherProvider};

/// Shortest input, in characters, that triggers a remote place search.
pub const MIN_REMOTE_CHARS: usize = 2;

/// Builds the autocomplete list from history and remote place search.
#[derive(Debug, Clone)]
pub struct SuggestionProvider {
    provider: Arc<dyn WeatherProvider>,
}

impl SuggestionProvider {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider }
    }

    /// History matches followed by remote matches for `text`.
    pub async fn suggest(&self, history: &HistoryStore, text: &str) -> Vec<SuggestionItem> {
        let local = history.matching(text);
        let remote = self.remote_matches(text).await;
        combine(local, remote)
    }

    /// Remote place matches. Short input and any failure yield nothing.
    pub async fn remote_matches(&self, text: &str) -> Vec<RemotePlace> {
        if text.chars().count() < MIN_REMOTE_CHARS {
            return Vec::new();
        }
        match self.provider.search_places(text).await {
            Ok(places) => places,
            Err(err) => {
                debug!(error = %err, text, "place search failed, showing no remote matches");
                Vec::new()
            }
        }
    }
}

/// History items, a divider when both groups are present, then remote items.
pub fn combine(history: Vec<String>, remote: Vec<RemotePlace>) -> Vec<SuggestionItem> {
    let divider = !history.is_empty() && !remote.is_empty();
    let mut items = Vec::with_capacity(history.len() + remote.len() + usize::from(divider));

    items.extend(history.into_iter().map(SuggestionItem::History));
    if divider {
        items.push(SuggestionItem::Divider);
    }
    items.extend(remote.into_iter().map(SuggestionItem::Remote));
    items
}
