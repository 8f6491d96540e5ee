use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use crate::config::GeocoderConfig;
use crate::error::{Result, SkillError};
use crate::models::ResolvedLocation;

use super::provider::LocationResolver;

const METRO_KIND: &str = "metro";
const STREET_KIND: &str = "street";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct GeocoderResponse {
    response: GeocoderBody,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GeocoderBody {
    #[serde(rename = "GeoObjectCollection")]
    collection: GeoObjectCollection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GeoObjectCollection {
    #[serde(rename = "featureMember")]
    members: Vec<FeatureMember>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FeatureMember {
    #[serde(rename = "GeoObject")]
    geo_object: GeoObject,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GeoObject {
    name: String,
    #[serde(rename = "metaDataProperty")]
    meta: GeoObjectMeta,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GeoObjectMeta {
    #[serde(rename = "GeocoderMetaData")]
    geocoder: GeocoderMetaData,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GeocoderMetaData {
    kind: String,
    #[serde(rename = "AddressDetails")]
    address_details: AddressDetails,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AddressDetails {
    #[serde(rename = "Country")]
    country: Country,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Country {
    #[serde(rename = "AdministrativeArea")]
    area: AdministrativeArea,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AdministrativeArea {
    #[serde(rename = "Locality")]
    locality: Locality,
    #[serde(rename = "SubAdministrativeArea")]
    sub_area: SubAdministrativeArea,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SubAdministrativeArea {
    #[serde(rename = "Locality")]
    locality: Locality,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Locality {
    #[serde(rename = "LocalityName")]
    name: String,
}

impl GeoObject {
    /// Districts nest the city one level deeper than plain regions do.
    fn city(&self) -> &str {
        let area = &self.meta.geocoder.address_details.country.area;
        if area.sub_area.locality.name.is_empty() {
            &area.locality.name
        } else {
            &area.sub_area.locality.name
        }
    }

    fn station(&self) -> String {
        self.name.replace("метро", "").trim().to_string()
    }
}

/// Picks the first subway station among the geocoder hits. Without one, the
/// city of the last matched street is used and the subway stays empty.
pub(crate) fn location_from_response(
    phrase: &str,
    response: &GeocoderResponse,
) -> Result<ResolvedLocation> {
    let mut city = String::new();

    for member in &response.response.collection.members {
        let object = &member.geo_object;
        match object.meta.geocoder.kind.as_str() {
            METRO_KIND => {
                return Ok(ResolvedLocation {
                    city: object.city().to_string(),
                    subway: object.station(),
                });
            }
            STREET_KIND => city = object.city().to_string(),
            _ => {}
        }
    }

    if city.is_empty() {
        return Err(SkillError::UnknownLocation(phrase.to_string()));
    }

    Ok(ResolvedLocation {
        city,
        subway: String::new(),
    })
}

#[derive(Clone)]
pub struct GeocoderClient {
    client: Client,
    config: GeocoderConfig,
}

impl GeocoderClient {
    pub fn new(config: &GeocoderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SkillError::Internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    fn request_url(&self, phrase: &str) -> Result<Url> {
        let mut url = Url::parse(&self.config.base_url)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("format", "json");
            query.append_pair("geocode", phrase);
            if let Some(ref api_key) = self.config.api_key {
                query.append_pair("apikey", api_key);
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl LocationResolver for GeocoderClient {
    async fn resolve(&self, phrase: &str) -> Result<ResolvedLocation> {
        let url = self.request_url(phrase)?;
        tracing::debug!(phrase, "Geocoding address");

        let response: GeocoderResponse = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        location_from_response(phrase, &response)
    }
}
