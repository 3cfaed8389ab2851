use anyhow::Context as _;
use serde::Deserialize;
use url::Url;

use crate::domain::de::{lenient_f64, lenient_i32, lenient_string};
use crate::domain::repository::ListingSource;
use crate::domain::types::{Dealer, VehicleDraft, VehicleSpecs};

pub const DEFAULT_SEARCH_URL: &str = "https://mc-api.marketcheck.com/v2/search/car/active";
pub const LISTING_SOURCE: &str = "marketcheck";

/// Client for the Marketcheck active-inventory search.
#[derive(Clone)]
pub struct MarketcheckClient {
    client: reqwest::Client,
    api_key: String,
    search_url: String,
}

impl MarketcheckClient {
    pub fn new(client: reqwest::Client, api_key: String, search_url: Option<String>) -> Self {
        Self {
            client,
            api_key,
            search_url: search_url.unwrap_or_else(|| DEFAULT_SEARCH_URL.to_owned()),
        }
    }
}

impl ListingSource for MarketcheckClient {
    async fn search(&self, make: &str, limit: u32) -> Result<Vec<VehicleDraft>, anyhow::Error> {
        let mut url = Url::parse(&self.search_url).context("parse listing search url")?;
        url.query_pairs_mut()
            .append_pair("api_key", &self.api_key)
            .append_pair("make", make)
            .append_pair("rows", &limit.to_string())
            .append_pair("include_relevant_links", "true");

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("search listings for {make}"))?
            .error_for_status()
            .with_context(|| format!("listing search for {make} rejected"))?;
        let body: SearchResponse = resp
            .json()
            .await
            .with_context(|| format!("decode listing search for {make}"))?;
        Ok(body.listings.into_iter().map(VehicleDraft::from).collect())
    }
}

// ── Wire format ──────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchResponse {
    listings: Vec<Listing>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Listing {
    vin: Option<String>,
    heading: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    price: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    msrp: Option<f64>,
    miles: Option<i64>,
    vdp_url: Option<String>,
    exterior_color: Option<String>,
    interior_color: Option<String>,
    inventory_type: Option<String>,
    seller_type: Option<String>,
    stock_no: Option<String>,
    #[serde(rename = "carfax_1_owner")]
    carfax_one_owner: Option<bool>,
    carfax_clean_title: Option<bool>,
    build: Option<Build>,
    media: Option<Media>,
    dealer: Option<ListingDealer>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Build {
    #[serde(deserialize_with = "lenient_i32")]
    year: Option<i32>,
    make: Option<String>,
    model: Option<String>,
    trim: Option<String>,
    version: Option<String>,
    body_type: Option<String>,
    vehicle_type: Option<String>,
    transmission: Option<String>,
    drivetrain: Option<String>,
    fuel_type: Option<String>,
    engine: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    engine_size: Option<f64>,
    #[serde(deserialize_with = "lenient_i32")]
    doors: Option<i32>,
    #[serde(deserialize_with = "lenient_i32")]
    cylinders: Option<i32>,
    #[serde(deserialize_with = "lenient_i32")]
    city_mpg: Option<i32>,
    #[serde(deserialize_with = "lenient_i32")]
    highway_mpg: Option<i32>,
    #[serde(deserialize_with = "lenient_i32")]
    std_seating: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Media {
    photo_links: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ListingDealer {
    #[serde(deserialize_with = "lenient_string")]
    id: Option<String>,
    name: Option<String>,
    website: Option<String>,
    dealer_type: Option<String>,
    street: Option<String>,
    city: Option<String>,
    state: Option<String>,
    zip: Option<String>,
    country: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    phone: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    latitude: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    longitude: Option<f64>,
}

impl From<Listing> for VehicleDraft {
    fn from(l: Listing) -> Self {
        let b = l.build.unwrap_or_default();
        Self {
            vin: l.vin,
            heading: l.heading,
            year: b.year,
            make: b.make,
            model: b.model,
            trim: b.trim,
            miles: l.miles,
            price: l.price.or(l.msrp),
            msrp: l.msrp,
            vdp_url: l.vdp_url,
            media: Some(l.media.and_then(|m| m.photo_links).unwrap_or_default()),
            specs: Some(VehicleSpecs {
                version: b.version,
                body_type: b.body_type,
                vehicle_type: b.vehicle_type,
                transmission: b.transmission,
                drivetrain: b.drivetrain,
                fuel_type: b.fuel_type,
                engine: b.engine,
                engine_size: b.engine_size,
                doors: b.doors,
                cylinders: b.cylinders,
                city_mpg: b.city_mpg,
                highway_mpg: b.highway_mpg,
                seating: b.std_seating,
                exterior_color: l.exterior_color,
                interior_color: l.interior_color,
                inventory_type: l.inventory_type,
                seller_type: l.seller_type,
                stock_no: l.stock_no,
                carfax_one_owner: l.carfax_one_owner,
                carfax_clean_title: l.carfax_clean_title,
            }),
            dealer: l.dealer.map(|d| Dealer {
                id: d.id,
                name: d.name,
                website: d.website,
                dealer_type: d.dealer_type,
                street: d.street,
                city: d.city,
                state: d.state,
                zip: d.zip,
                country: d.country,
                phone: d.phone,
                lat: d.latitude,
                lng: d.longitude,
            }),
            source: Some(LISTING_SOURCE.to_owned()),
        }
    }
}
