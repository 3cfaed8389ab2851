use anyhow::Context as _;
use serde::Deserialize;
use url::Url;

use crate::domain::repository::PlacesSearch;
use crate::domain::types::NearbyDealership;

pub const DEFAULT_NEARBY_URL: &str =
    "https://maps.googleapis.com/maps/api/place/nearbysearch/json";
const DEALER_PLACE_TYPE: &str = "car_dealer";

/// Google Places nearby search restricted to car dealers.
///
/// Without an API key every lookup fails; the service still starts.
#[derive(Clone)]
pub struct GooglePlacesClient {
    client: reqwest::Client,
    api_key: Option<String>,
    nearby_url: String,
}

impl GooglePlacesClient {
    pub fn new(
        client: reqwest::Client,
        api_key: Option<String>,
        nearby_url: Option<String>,
    ) -> Self {
        if api_key.is_none() {
            tracing::warn!("Google Maps API key not configured, nearby dealer search disabled");
        }
        Self {
            client,
            api_key,
            nearby_url: nearby_url.unwrap_or_else(|| DEFAULT_NEARBY_URL.to_owned()),
        }
    }
}

impl PlacesSearch for GooglePlacesClient {
    async fn nearby_dealerships(
        &self,
        lat: f64,
        lng: f64,
        radius_m: u32,
    ) -> Result<Vec<NearbyDealership>, anyhow::Error> {
        let api_key = self
            .api_key
            .as_deref()
            .context("places search not configured")?;
        let mut url = Url::parse(&self.nearby_url).context("parse places search url")?;
        url.query_pairs_mut()
            .append_pair("key", api_key)
            .append_pair("location", &format!("{lat},{lng}"))
            .append_pair("radius", &radius_m.to_string())
            .append_pair("type", DEALER_PLACE_TYPE);

        let body: NearbyResponse = self
            .client
            .get(url)
            .send()
            .await
            .context("places nearby search")?
            .error_for_status()
            .context("places nearby search rejected")?
            .json()
            .await
            .context("decode places nearby search")?;
        Ok(body.results.into_iter().map(NearbyDealership::from).collect())
    }
}

// ── Wire format ──────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NearbyResponse {
    results: Vec<Place>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Place {
    name: Option<String>,
    vicinity: Option<String>,
    geometry: Option<Geometry>,
    place_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Geometry {
    location: Option<LatLng>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LatLng {
    lat: f64,
    lng: f64,
}

impl From<Place> for NearbyDealership {
    fn from(p: Place) -> Self {
        let loc = p.geometry.and_then(|g| g.location).unwrap_or_default();
        Self {
            name: p.name.unwrap_or_default(),
            address: p.vicinity,
            lat: loc.lat,
            lon: loc.lng,
            place_id: p.place_id,
        }
    }
}
