use chrono::Local;
use weather_core::{SuggestionItem, UiState, WeatherSnapshot};

pub fn print_snapshot(snapshot: &WeatherSnapshot, show_country: bool) {
    for line in snapshot_lines(snapshot, show_country) {
        println!("{line}");
    }
}

pub fn print_state(state: &UiState, show_country: bool) {
    match state {
        UiState::Idle => {}
        UiState::Loading => println!("Loading..."),
        UiState::Success(snapshot) => print_snapshot(snapshot, show_country),
        UiState::Error(message) => eprintln!("{message}"),
    }
}

pub fn print_suggestions(items: &[SuggestionItem]) {
    if items.is_empty() {
        println!("No suggestions.");
        return;
    }
    for item in items {
        match suggestion_label(item) {
            Some(label) => println!("  {label}"),
            None => println!("  ----"),
        }
    }
}

pub fn print_history(entries: &[String]) {
    if entries.is_empty() {
        println!("Search history is empty.");
        return;
    }
    for (i, entry) in entries.iter().enumerate() {
        println!("{:>2}. {entry}", i + 1);
    }
}

fn snapshot_lines(s: &WeatherSnapshot, show_country: bool) -> Vec<String> {
    let mut lines = vec![
        s.label(show_country),
        format!("  {}°C  {}", s.temperature_rounded(), s.condition),
        format!("  Feels like: {}°C", s.feels_like_c.round() as i64),
        format!("  Humidity:   {}%", s.humidity_pct),
        format!("  Wind:       {} km/h", s.wind_kph),
    ];
    if !s.icon_url.is_empty() {
        lines.push(format!("  Icon:       {}", s.icon_url));
    }
    if let Some(at) = s.observed_at {
        lines.push(format!("  Updated:    {}", at.with_timezone(&Local).format("%Y-%m-%d %H:%M")));
    }
    lines
}

/// Text for one suggestion row; `None` for the divider.
fn suggestion_label(item: &SuggestionItem) -> Option<String> {
    match item {
        SuggestionItem::History(place) => Some(format!("{place}  (recent)")),
        SuggestionItem::Remote(remote) => {
            let parts: Vec<&str> = [remote.name.as_str(), remote.region.as_str(), remote.country.as_str()]
                .into_iter()
                .filter(|p| !p.is_empty())
                .collect();
            Some(parts.join(", "))
        }
        SuggestionItem::Divider => None,
    }
}
