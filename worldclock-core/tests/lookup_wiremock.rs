//! Geocoding, timezone and country-image clients against a mock server.

use worldclock_core::{
    Coordinates, WorldClockError,
    country::CountryAssets,
    geocode::{Geocoder, NominatimGeocoder},
    timezone::{TimeApiLookup, TimezoneLookup},
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header_exists, method, path, query_param},
};

const TOKYO: Coordinates = Coordinates { latitude: 35.6769, longitude: 139.7639 };

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent("worldclock-tests")
        .build()
        .expect("client")
}

#[tokio::test]
async fn forward_geocode_parses_string_coordinates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Tokyo"))
        .and(query_param("limit", "1"))
        .and(header_exists("user-agent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"lat": "35.6769", "lon": "139.7639", "display_name": "Tokyo, Japan"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let geocoder = NominatimGeocoder::new(server.uri(), client());
    let hit = geocoder.forward("Tokyo").await.expect("forward");
    assert_eq!(hit, Some(TOKYO));
}

#[tokio::test]
async fn forward_geocode_without_match_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let geocoder = NominatimGeocoder::new(server.uri(), client());
    assert_eq!(geocoder.forward("Atlantis").await.expect("forward"), None);
}

#[tokio::test]
async fn reverse_geocode_reads_country_code() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .and(query_param("addressdetails", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "display_name": "Chiyoda, Tokyo, Japan",
            "address": {"city": "Chiyoda", "country": "Japan", "country_code": "JP"}
        })))
        .mount(&server)
        .await;

    let geocoder = NominatimGeocoder::new(server.uri(), client());
    let address = geocoder.reverse(TOKYO).await.expect("reverse").expect("address");

    assert_eq!(address.country_code.as_deref(), Some("jp"));
}

#[tokio::test]
async fn reverse_geocode_error_body_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"error": "Unable to geocode"})),
        )
        .mount(&server)
        .await;

    let geocoder = NominatimGeocoder::new(server.uri(), client());
    assert_eq!(geocoder.reverse(TOKYO).await.expect("reverse"), None);
}

#[tokio::test]
async fn timezone_lookup_returns_iana_zone() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/timezone/coordinate"))
        .and(query_param("latitude", "35.6769"))
        .and(query_param("longitude", "139.7639"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "timeZone": "Asia/Tokyo",
            "currentLocalTime": "2024-06-10T12:00:00",
            "currentUtcOffset": {"seconds": 32400}
        })))
        .mount(&server)
        .await;

    let lookup = TimeApiLookup::new(server.uri(), client());
    assert_eq!(lookup.timezone_at(TOKYO).await.expect("lookup"), Some(chrono_tz::Asia::Tokyo));
}

#[tokio::test]
async fn timezone_lookup_miss_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/timezone/coordinate"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Invalid coordinates"))
        .mount(&server)
        .await;

    let lookup = TimeApiLookup::new(server.uri(), client());
    assert_eq!(lookup.timezone_at(TOKYO).await.expect("lookup"), None);
}

#[tokio::test]
async fn timezone_lookup_unknown_zone_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/timezone/coordinate"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"timeZone": "Etc/Nowhere"})),
        )
        .mount(&server)
        .await;

    let lookup = TimeApiLookup::new(server.uri(), client());
    assert_eq!(lookup.timezone_at(TOKYO).await.expect("lookup"), None);
}

#[tokio::test]
async fn country_images_are_fetched_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/shapes/jp.svg"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<svg id=\"shape\"/>"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flags/jp.svg"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<svg id=\"flag\"/>"))
        .expect(1)
        .mount(&server)
        .await;

    let assets = CountryAssets::new(
        format!("{}/shapes", server.uri()),
        format!("{}/flags", server.uri()),
        client(),
    );

    let first = assets.fetch("JP").await.expect("images");
    let second = assets.fetch("jp").await.expect("images");

    assert_eq!(first.flag_svg, b"<svg id=\"flag\"/>");
    assert_eq!(first, second);
    assert!(assets.cached("jp").is_some());
}

#[tokio::test]
async fn missing_flag_fails_the_whole_fetch() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/shapes/xk.svg"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<svg/>"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flags/xk.svg"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let assets = CountryAssets::new(
        format!("{}/shapes", server.uri()),
        format!("{}/flags", server.uri()),
        client(),
    );

    let err = assets.fetch("xk").await.unwrap_err();
    assert!(matches!(err, WorldClockError::ImageFetchFailure { ref code, .. } if code == "xk"));
    assert!(assets.cached("xk").is_none());
}
