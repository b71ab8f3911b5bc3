use api_client::error::ApiError;
use api_client::{DataProvider, JolpicaClient, OpenF1Client, ProviderSet};
use configuration::{ProviderConfig, Providers};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider_config(base_url: &str, api_key: Option<&str>) -> ProviderConfig {
    ProviderConfig {
        base_url: base_url.to_string(),
        api_key: api_key.map(str::to_string),
        timeout: Duration::from_secs(5),
    }
}

fn envelope(data: serde_json::Value) -> serde_json::Value {
    let count = data.as_array().map(|a| a.len()).unwrap_or(0);
    json!({ "data": data, "meta": { "count": count, "offset": 0, "limit": 1000 } })
}

#[tokio::test]
async fn openf1_lap_times_are_normalized_to_milliseconds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/laps"))
        .and(query_param("session_id", "9158"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            { "session_key": 9158, "driver_number": 1, "lap_number": 1, "lap_duration": null },
            { "session_key": 9158, "driver_number": 1, "lap_number": 2, "lap_duration": 96.512,
              "duration_sector_1": 31.2, "duration_sector_2": 40.1, "duration_sector_3": 25.212 },
            { "session_key": 9158, "driver_number": 1, "lap_number": 3, "lap_duration": 96.1 },
            { "session_key": 9158, "driver_number": 16, "lap_number": 2, "lap_duration": 95.9 }
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let client = OpenF1Client::new(&provider_config(&server.uri(), None)).unwrap();
    let laps = client.fetch_lap_times("9158").await.unwrap();

    assert_eq!(laps.len(), 3);
    assert_eq!(laps[0].number, 2);
    assert!((laps[0].time - 96_512.0).abs() < 1e-6);
    assert_eq!(laps[2].driver_id, "16");
    assert!(laps[2].is_session_best);
    assert!(laps[1].is_personal_best);
    assert!(!laps[0].is_personal_best);
}

#[tokio::test]
async fn api_key_is_sent_as_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/drivers"))
        .and(query_param("year", "2024"))
        .and(header("X-API-Key", "paddock-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([{
            "driver_number": 4, "full_name": "Lando NORRIS", "first_name": "Lando",
            "last_name": "Norris", "team_name": "McLaren", "team_colour": "FF8000",
            "country_code": "GBR"
        }]))))
        .expect(1)
        .mount(&server)
        .await;

    let client = OpenF1Client::new(&provider_config(&server.uri(), Some("paddock-key"))).unwrap();
    let drivers = client.fetch_drivers(2024).await.unwrap();

    assert_eq!(drivers.len(), 1);
    assert_eq!(drivers[0].id, "4");
    assert_eq!(drivers[0].team_color, "#FF8000");
    assert_eq!(drivers[0].nationality, "GBR");
}

#[tokio::test]
async fn seasons_are_returned_newest_first() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/seasons"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            { "year": 2023 }, { "year": 2025 }, { "year": 2024 }
        ]))))
        .mount(&server)
        .await;

    let client = OpenF1Client::new(&provider_config(&server.uri(), None)).unwrap();
    assert_eq!(client.seasons().await.unwrap(), vec![2025, 2024, 2023]);
}

#[tokio::test]
async fn error_status_surfaces_as_upstream_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/races"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let client = OpenF1Client::new(&provider_config(&server.uri(), None)).unwrap();
    let err = client.fetch_races(2024).await.unwrap_err();
    assert!(matches!(err, ApiError::Upstream(503, body) if body == "maintenance"));
}

#[tokio::test]
async fn out_of_range_telemetry_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/telemetry"))
        .and(query_param("session_id", "9158"))
        .and(query_param("driver_id", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([{
            "timestamp": 0, "lap_number": 1, "distance": 10, "throttle": 0, "brake": 140,
            "speed": 280, "rpm": 11000, "n_gear": 7, "drs": 0, "brake_temp": 500
        }]))))
        .mount(&server)
        .await;

    let client = OpenF1Client::new(&provider_config(&server.uri(), None)).unwrap();
    let err = client.fetch_telemetry("9158", "1").await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidRecord(_)));
}

#[tokio::test]
async fn slow_provider_hits_the_request_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/races"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(json!([])))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let mut config = provider_config(&server.uri(), None);
    config.timeout = Duration::from_millis(200);
    let client = OpenF1Client::new(&config).unwrap();
    let err = client.fetch_races(2024).await.unwrap_err();
    assert!(matches!(err, ApiError::Request(e) if e.is_timeout()));
}

#[tokio::test]
async fn jolpica_races_and_telemetry_use_path_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/races/2021"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "timestamp": "2024-01-01T00:00:00Z",
            "data": [{
                "season": "2021", "round": "1", "raceName": "Bahrain Grand Prix",
                "Circuit": { "circuitId": "bahrain", "circuitName": "Bahrain International Circuit" },
                "date": "2021-03-28"
            }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/telemetry/2021/1/hamilton"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "timestamp": "2024-01-01T00:00:00Z",
            "data": [{
                "timestamp": 5, "lap_number": 1, "distance": 560, "throttle": 0, "brake": 92,
                "speed": 290, "rpm": 11200, "n_gear": 7, "brake_temp": 610
            }]
        })))
        .mount(&server)
        .await;

    let client = JolpicaClient::new(&provider_config(&server.uri(), None)).unwrap();
    let races = client.fetch_races(2021).await.unwrap();
    assert_eq!(races[0].id, "2021-1");

    let samples = client.fetch_telemetry(&races[0].id, "hamilton").await.unwrap();
    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].brake, 92.0);
    assert!(!samples[0].drs_active);
}

#[tokio::test]
async fn jolpica_does_not_offer_lap_times() {
    let client = JolpicaClient::new(&provider_config("http://127.0.0.1:9", None)).unwrap();
    let err = client.fetch_lap_times("2021-1").await.unwrap_err();
    assert!(matches!(err, ApiError::Unsupported { provider: "Jolpica", .. }));
}

#[test]
fn seasons_are_routed_by_cutoff_year() {
    let providers = Providers {
        openf1: provider_config("http://127.0.0.1:9", None),
        jolpica: provider_config("http://127.0.0.1:9", None),
        historical_cutoff_year: 2022,
    };
    let set = ProviderSet::new(&providers).unwrap();
    assert_eq!(set.for_season(2015).name(), "Jolpica");
    assert_eq!(set.for_season(2022).name(), "Jolpica");
    assert_eq!(set.for_season(2023).name(), "OpenF1");
}

#[tokio::test]
async fn sessions_are_queried_by_year_round_and_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sessions"))
        .and(query_param("year", "2023"))
        .and(query_param("round", "1"))
        .and(query_param("session_type", "Race"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([{
            "session_key": 7953, "session_type": "Race", "session_name": "Race",
            "date_start": "2023-03-05T15:00:00+00:00", "date_end": "2023-03-05T17:00:00+00:00"
        }]))))
        .mount(&server)
        .await;

    let client = OpenF1Client::new(&provider_config(&server.uri(), None)).unwrap();
    let sessions = client.sessions(2023, 1, "Race").await.unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].id, "7953");
    assert_eq!(sessions[0].session_type, core_types::SessionType::Race);
    assert_eq!(sessions[0].status, core_types::SessionStatus::Completed);
}

#[tokio::test]
async fn race_responses_are_stamped_as_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/races"))
        .and(query_param("year", "2024"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([{
            "meeting_key": 1229, "year": 2024, "round": 1, "meeting_name": "Bahrain Grand Prix",
            "circuit_short_name": "Sakhir", "date_start": "2024-02-29T11:30:00+00:00"
        }]))))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/races/2019/21"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "timestamp": "2024-01-01T00:00:00Z",
            "data": {
                "season": "2019", "round": "21", "raceName": "Abu Dhabi Grand Prix",
                "Circuit": { "circuitId": "yas_marina", "circuitName": "Yas Marina Circuit" },
                "date": "2019-12-01"
            }
        })))
        .mount(&server)
        .await;

    let live = OpenF1Client::new(&provider_config(&server.uri(), None)).unwrap();
    let response = live.races_response(2024).await.unwrap();
    assert_eq!(response.status, api_client::ResponseStatus::Success);
    assert_eq!(response.data[0].id, "1229");
    assert_eq!(response.data[0].circuit, "Sakhir");

    let historical = JolpicaClient::new(&provider_config(&server.uri(), None)).unwrap();
    let race = historical.race_data(2019, 21).await.unwrap();
    assert_eq!(race.data.id, "2019-21");
    assert_eq!(race.data.name, "Abu Dhabi Grand Prix");
}
