//! End-to-end search box flows against a mock weatherapi.com server.

use std::{sync::Arc, time::Duration};

use weather_core::{
    ClientConfig, FileStorage, HISTORY_KEY, HistoryStorage, HistoryStore, Key, MemoryStorage,
    SearchController, SuggestionItem, UiState, provider::weatherapi::WeatherApiProvider,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn current_response(name: &str, country: &str, temp_c: f64) -> serde_json::Value {
    serde_json::json!({
        "location": {"name": name, "country": country},
        "current": {
            "temp_c": temp_c,
            "feelslike_c": temp_c,
            "humidity": 41,
            "wind_kph": 9.4,
            "condition": {"text": "Sunny", "icon": "//cdn.weatherapi.com/weather/64x64/day/113.png"}
        }
    })
}

fn places(names: &[&str]) -> serde_json::Value {
    serde_json::Value::Array(
        names
            .iter()
            .map(|n| serde_json::json!({"name": n, "region": "", "country": "Testland"}))
            .collect(),
    )
}

fn controller(server: &MockServer, history: HistoryStore) -> SearchController {
    let config = ClientConfig { base_url: server.uri(), timeout_secs: 5, ..Default::default() };
    #[allow(clippy::expect_used)]
    let provider = WeatherApiProvider::new("TEST_KEY".into(), config).expect("client builds");
    SearchController::new(Arc::new(provider), history)
}

fn history_of(places: &[&str]) -> (HistoryStore, MemoryStorage) {
    let storage = MemoryStorage::new();
    let mut store = HistoryStore::load(storage.clone());
    for place in places.iter().rev() {
        store.record(place);
    }
    (store, storage)
}

async fn mount_current(server: &MockServer, q: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/current.json"))
        .and(query_param("q", q))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn mount_search(server: &MockServer, q: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .and(query_param("q", q))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn submit_success_updates_display_and_history() {
    let server = MockServer::start().await;
    mount_current(
        &server,
        "Lusaka",
        ResponseTemplate::new(200).set_body_json(current_response("Lusaka", "Zambia", 26.7)),
    )
    .await;
    mount_search(&server, "Lusaka", ResponseTemplate::new(200).set_body_json(places(&[]))).await;

    let (history, storage) = history_of(&[]);
    let c = controller(&server, history);
    c.on_input("Lusaka").await;
    c.submit().await.expect("lookup succeeds");

    let state = c.ui_state();
    let snap = state.result().expect("result panel is shown");
    assert_eq!(snap.temperature_rounded(), 27);
    assert_eq!(snap.label(true), "Lusaka, Zambia");
    assert_eq!(snap.humidity_pct, 41);
    assert!((snap.wind_kph - 9.4).abs() < f64::EPSILON);
    assert!(snap.icon_url.starts_with("https://"));
    assert!(state.error().is_none());

    assert_eq!(c.history(), ["Lusaka"]);
    assert_eq!(storage.get(HISTORY_KEY).as_deref(), Some(r#"["Lusaka"]"#));
}

#[tokio::test]
async fn submit_unknown_place_shows_not_found_and_keeps_history() {
    let server = MockServer::start().await;
    mount_current(&server, "Qwxyz123", ResponseTemplate::new(400)).await;
    mount_search(&server, "Qwxyz123", ResponseTemplate::new(200).set_body_json(places(&[]))).await;

    let (history, _) = history_of(&["Lusaka"]);
    let c = controller(&server, history);
    c.on_input("Qwxyz123").await;
    assert!(c.submit().await.is_err());

    assert_eq!(c.ui_state(), UiState::Error("City not found.".into()));
    assert_eq!(c.history(), ["Lusaka"]);
}

#[tokio::test]
async fn suggestions_combine_history_and_remote_with_divider() {
    let server = MockServer::start().await;
    mount_search(&server, "Lo", ResponseTemplate::new(200).set_body_json(places(&["Lome"]))).await;

    let (history, _) = history_of(&["Lusaka", "London"]);
    let c = controller(&server, history);

    c.on_input("L").await;
    assert_eq!(
        c.visible_suggestions(),
        vec![SuggestionItem::History("Lusaka".into()), SuggestionItem::History("London".into())]
    );

    c.on_input("Lo").await;
    let items = c.visible_suggestions();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0], SuggestionItem::History("London".into()));
    assert_eq!(items[1], SuggestionItem::Divider);
    assert_eq!(items[2].place(), Some("Lome"));
}

#[tokio::test]
async fn failing_place_search_degrades_silently() {
    let server = MockServer::start().await;
    mount_search(&server, "Lon", ResponseTemplate::new(500)).await;

    let (history, _) = history_of(&["London"]);
    let c = controller(&server, history);
    c.on_input("Lon").await;

    assert_eq!(c.visible_suggestions(), vec![SuggestionItem::History("London".into())]);
    assert_eq!(c.ui_state(), UiState::Idle);
}

#[tokio::test]
async fn stale_suggestions_are_discarded() {
    let server = MockServer::start().await;
    mount_search(
        &server,
        "Lu",
        ResponseTemplate::new(200)
            .set_body_json(places(&["Lucerne"]))
            .set_delay(Duration::from_millis(300)),
    )
    .await;
    mount_search(&server, "Lo", ResponseTemplate::new(200).set_body_json(places(&["Lome"]))).await;

    let (history, _) = history_of(&[]);
    let c = controller(&server, history);

    // "Lu" starts first and resolves last.
    tokio::join!(c.on_input("Lu"), c.on_input("Lo"));

    let items = c.visible_suggestions();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].place(), Some("Lome"));
}

#[tokio::test]
async fn stale_weather_response_does_not_overwrite_latest() {
    let server = MockServer::start().await;
    mount_current(
        &server,
        "Oslo",
        ResponseTemplate::new(200)
            .set_body_json(current_response("Oslo", "Norway", -2.0))
            .set_delay(Duration::from_millis(300)),
    )
    .await;
    mount_current(
        &server,
        "Accra",
        ResponseTemplate::new(200).set_body_json(current_response("Accra", "Ghana", 31.0)),
    )
    .await;

    let (history, _) = history_of(&[]);
    let c = controller(&server, history);

    let oslo = weather_core::PlaceQuery::parse("Oslo").expect("place");
    let accra = weather_core::PlaceQuery::parse("Accra").expect("place");
    let (slow, fast) = tokio::join!(c.search(oslo), c.search(accra));
    assert!(slow.is_ok() && fast.is_ok());

    let state = c.ui_state();
    assert_eq!(state.result().map(|s| s.location_name.as_str()), Some("Accra"));
    // Both lookups succeeded, so both are remembered.
    assert_eq!(c.history(), ["Oslo", "Accra"]);
}

#[tokio::test]
async fn deleted_entry_stays_gone_after_rerender() {
    let server = MockServer::start().await;
    mount_search(&server, "Lo", ResponseTemplate::new(200).set_body_json(places(&[]))).await;

    let (history, storage) = history_of(&["London", "Lome", "Lusaka"]);
    let c = controller(&server, history);

    c.on_input("Lo").await;
    assert_eq!(c.visible_suggestions().len(), 2);

    assert!(c.delete_suggestion(0).await);
    assert_eq!(c.visible_suggestions(), vec![SuggestionItem::History("Lome".into())]);
    assert_eq!(c.history(), ["Lome", "Lusaka"]);
    assert_eq!(storage.get(HISTORY_KEY).as_deref(), Some(r#"["Lome","Lusaka"]"#));
    assert_eq!(c.ui_state(), UiState::Idle);
}

#[tokio::test]
async fn keyboard_selection_fetches_and_hides_panel() {
    let server = MockServer::start().await;
    mount_search(&server, "Li", ResponseTemplate::new(200).set_body_json(places(&["Lima", "Lisbon"])))
        .await;
    mount_current(
        &server,
        "Lisbon",
        ResponseTemplate::new(200).set_body_json(current_response("Lisbon", "Portugal", 18.2)),
    )
    .await;

    let (history, _) = history_of(&[]);
    let c = controller(&server, history);
    c.on_input("Li").await;

    c.on_key(Key::ArrowUp).await;
    assert_eq!(c.selected_suggestion(), Some(1));
    c.on_key(Key::Enter).await;

    assert!(c.visible_suggestions().is_empty());
    assert_eq!(c.input(), "Lisbon");
    assert_eq!(c.ui_state().result().map(|s| s.label(false)), Some("Lisbon".to_string()));
    assert_eq!(c.history(), ["Lisbon"]);
}

#[tokio::test]
async fn history_survives_restart_in_file_storage() {
    let dir = tempfile::tempdir().expect("tempdir");
    let server = MockServer::start().await;
    mount_current(
        &server,
        "Kigali",
        ResponseTemplate::new(200).set_body_json(current_response("Kigali", "Rwanda", 22.0)),
    )
    .await;

    {
        let c = controller(&server, HistoryStore::load(FileStorage::new(dir.path())));
        let place = weather_core::PlaceQuery::parse("Kigali").expect("place");
        c.search(place).await.expect("lookup succeeds");
    }

    let reloaded = HistoryStore::load(FileStorage::new(dir.path()));
    assert_eq!(reloaded.entries(), ["Kigali"]);
}

#[tokio::test]
async fn corrupt_history_file_starts_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    let storage = FileStorage::new(dir.path());
    std::fs::write(storage.path_for(HISTORY_KEY), "[\"unterminated").expect("write");

    assert!(HistoryStore::load(storage).is_empty());
}

#[tokio::test]
async fn pending_suggestions_do_not_reopen_after_submit() {
    let server = MockServer::start().await;
    mount_search(
        &server,
        "Lome",
        ResponseTemplate::new(200)
            .set_body_json(places(&["Lome"]))
            .set_delay(Duration::from_millis(300)),
    )
    .await;
    mount_current(
        &server,
        "Lome",
        ResponseTemplate::new(200).set_body_json(current_response("Lome", "Togo", 29.0)),
    )
    .await;

    let (history, _) = history_of(&[]);
    let c = controller(&server, history);

    let (_, submitted) = tokio::join!(c.on_input("Lome"), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        c.submit().await
    });
    assert!(submitted.is_ok());

    assert!(c.visible_suggestions().is_empty());
    assert_eq!(c.input(), "");
    assert_eq!(c.history(), ["Lome"]);
}

#[tokio::test]
async fn pending_suggestions_do_not_reopen_after_dismiss() {
    let server = MockServer::start().await;
    mount_search(
        &server,
        "Lo",
        ResponseTemplate::new(200)
            .set_body_json(places(&["Lome"]))
            .set_delay(Duration::from_millis(300)),
    )
    .await;

    let (history, _) = history_of(&["London"]);
    let c = controller(&server, history);

    tokio::join!(c.on_input("Lo"), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        c.dismiss();
    });

    assert!(c.visible_suggestions().is_empty());
    assert_eq!(c.input(), "Lo");
}
