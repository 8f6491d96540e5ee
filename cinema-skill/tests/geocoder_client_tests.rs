use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cinema_skill::config::GeocoderConfig;
use cinema_skill::error::SkillError;
use cinema_skill::geocoding::{GeocoderClient, LocationResolver};

fn client(server: &MockServer, api_key: Option<&str>) -> GeocoderClient {
    GeocoderClient::new(&GeocoderConfig {
        base_url: format!("{}/1.x/", server.uri()),
        api_key: api_key.map(str::to_string),
        timeout_secs: 5,
    })
    .unwrap()
}

fn member(kind: &str, name: &str, city: &str) -> serde_json::Value {
    json!({
        "GeoObject": {
            "name": name,
            "metaDataProperty": {
                "GeocoderMetaData": {
                    "kind": kind,
                    "text": format!("Россия, {city}, {name}"),
                    "AddressDetails": {
                        "Country": {
                            "CountryName": "Россия",
                            "AdministrativeArea": {
                                "AdministrativeAreaName": city,
                                "Locality": { "LocalityName": city }
                            }
                        }
                    }
                }
            },
            "Point": { "pos": "37.5 55.6" }
        }
    })
}

fn collection(members: Vec<serde_json::Value>) -> serde_json::Value {
    json!({
        "response": {
            "GeoObjectCollection": {
                "metaDataProperty": { "GeocoderResponseMetaData": { "found": members.len().to_string() } },
                "featureMember": members
            }
        }
    })
}

#[tokio::test]
async fn resolves_city_and_station() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1.x/"))
        .and(query_param("format", "json"))
        .and(query_param("geocode", "москва теплый стан"))
        .and(query_param("apikey", "key-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(collection(vec![
            member("street", "Профсоюзная улица", "Москва"),
            member("metro", "метро Тёплый Стан", "Москва"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let location = client(&server, Some("key-1"))
        .resolve("москва теплый стан")
        .await
        .unwrap();

    assert_eq!(location.city, "Москва");
    assert_eq!(location.subway, "Тёплый Стан");
}

#[tokio::test]
async fn street_only_city_has_no_subway() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1.x/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(collection(vec![member(
            "street",
            "улица Ленина",
            "Абакан",
        )])))
        .mount(&server)
        .await;

    let location = client(&server, None).resolve("абакан ленина").await.unwrap();

    assert_eq!(location.city, "Абакан");
    assert_eq!(location.subway, "");
}

#[tokio::test]
async fn empty_collection_is_unknown_location() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(collection(vec![])))
        .mount(&server)
        .await;

    let err = client(&server, None).resolve("на луне").await.unwrap_err();

    assert!(matches!(err, SkillError::UnknownLocation(_)));
}

#[tokio::test]
async fn server_error_is_not_a_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client(&server, None).resolve("москва").await.unwrap_err();

    assert!(matches!(err, SkillError::Http(_)));
    assert!(!err.is_not_found());
}

#[tokio::test]
async fn garbage_body_is_a_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>captcha</html>"))
        .mount(&server)
        .await;

    let err = client(&server, None).resolve("москва").await.unwrap_err();

    assert!(!err.is_not_found());
}
