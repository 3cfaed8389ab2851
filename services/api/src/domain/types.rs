use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use autovault_domain::role::Role;

use crate::domain::de::{lenient_f64, lenient_string};

/// Account record. The id is the credential subject.
#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Identity resolved for the current request. Never cached across requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub uid: String,
    pub email: Option<String>,
    pub role: Role,
}

/// One-way message to an account.
///
/// Only the SMS outcome (written once by the send pipeline) and the read
/// state (written once by the recipient) change after creation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: Uuid,
    pub user_id: String,
    pub message: String,
    pub sent_by: String,
    #[serde(serialize_with = "autovault_core::serde::to_rfc3339_ms")]
    pub sent_at: DateTime<Utc>,
    pub read: bool,
    #[serde(serialize_with = "autovault_core::serde::to_rfc3339_ms_opt")]
    pub read_at: Option<DateTime<Utc>>,
    pub sms_sent: bool,
    pub sms_error: Option<String>,
}

/// Recipient details shown next to an alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recipient {
    pub email: String,
    pub name: String,
}

/// Accepted SMS, as reported by the gateway.
#[derive(Debug, Clone)]
pub struct SmsReceipt {
    pub message_id: String,
    pub to: String,
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SmsError {
    #[error("SMS service not configured")]
    NotConfigured,
    #[error("invalid phone number: {0}")]
    InvalidRecipient(String),
    #[error("phone number and message body are required")]
    EmptyMessage,
    #[error("{0}")]
    Rejected(String),
    #[error("SMS transport error: {0}")]
    Transport(String),
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("realtime broadcast failed: {0}")]
pub struct NotifyError(pub String);

/// Event fanned out to realtime listeners.
#[derive(Debug, Clone, Serialize)]
pub struct RealtimeEvent {
    pub event: String,
    pub data: serde_json::Value,
}

/// Inventory listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: Uuid,
    pub vin: String,
    pub heading: Option<String>,
    pub year: Option<i32>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub trim: Option<String>,
    pub miles: Option<i64>,
    pub price: Option<f64>,
    pub msrp: Option<f64>,
    pub vdp_url: Option<String>,
    pub media: Vec<String>,
    pub specs: VehicleSpecs,
    pub dealer: Option<Dealer>,
    pub source: Option<String>,
    #[serde(serialize_with = "autovault_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "autovault_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

/// Build and history details. Stored as one JSON document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VehicleSpecs {
    pub version: Option<String>,
    pub body_type: Option<String>,
    pub vehicle_type: Option<String>,
    pub transmission: Option<String>,
    pub drivetrain: Option<String>,
    pub fuel_type: Option<String>,
    pub engine: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    pub engine_size: Option<f64>,
    pub doors: Option<i32>,
    pub cylinders: Option<i32>,
    pub city_mpg: Option<i32>,
    pub highway_mpg: Option<i32>,
    pub seating: Option<i32>,
    pub exterior_color: Option<String>,
    pub interior_color: Option<String>,
    pub inventory_type: Option<String>,
    pub seller_type: Option<String>,
    pub stock_no: Option<String>,
    pub carfax_one_owner: Option<bool>,
    pub carfax_clean_title: Option<bool>,
}

/// Dealer sub-record, repeated on every listing it sells.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Dealer {
    #[serde(deserialize_with = "lenient_string")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub website: Option<String>,
    pub dealer_type: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub phone: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    pub lat: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub lng: Option<f64>,
}

/// Caller-supplied listing fields for create and merge-update.
///
/// Timestamps and ids are not part of the draft; they are always stamped
/// server-side.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VehicleDraft {
    pub vin: Option<String>,
    pub heading: Option<String>,
    pub year: Option<i32>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub trim: Option<String>,
    pub miles: Option<i64>,
    pub price: Option<f64>,
    pub msrp: Option<f64>,
    pub vdp_url: Option<String>,
    pub media: Option<Vec<String>>,
    pub specs: Option<VehicleSpecs>,
    pub dealer: Option<Dealer>,
    pub source: Option<String>,
}

impl Vehicle {
    pub fn from_draft(id: Uuid, vin: String, draft: VehicleDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            vin,
            heading: draft.heading,
            year: draft.year,
            make: draft.make,
            model: draft.model,
            trim: draft.trim,
            miles: draft.miles,
            price: draft.price,
            msrp: draft.msrp,
            vdp_url: draft.vdp_url,
            media: draft.media.unwrap_or_default(),
            specs: draft.specs.unwrap_or_default(),
            dealer: draft.dealer,
            source: draft.source,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge the present fields of `draft` over this listing.
    pub fn apply(&mut self, draft: VehicleDraft, now: DateTime<Utc>) {
        fn merge<T>(slot: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *slot = value;
            }
        }
        if let Some(vin) = draft.vin {
            self.vin = vin;
        }
        merge(&mut self.heading, draft.heading);
        merge(&mut self.year, draft.year);
        merge(&mut self.make, draft.make);
        merge(&mut self.model, draft.model);
        merge(&mut self.trim, draft.trim);
        merge(&mut self.miles, draft.miles);
        merge(&mut self.price, draft.price);
        merge(&mut self.msrp, draft.msrp);
        merge(&mut self.vdp_url, draft.vdp_url);
        if let Some(media) = draft.media {
            self.media = media;
        }
        if let Some(specs) = draft.specs {
            self.specs = specs;
        }
        merge(&mut self.dealer, draft.dealer);
        merge(&mut self.source, draft.source);
        self.updated_at = now;
    }
}

/// Distinct dealership derived from same-make inventory.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dealership {
    pub name: String,
    pub address: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: Option<String>,
    pub phone: String,
    pub website: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub vin: String,
    pub is_primary: bool,
}

/// A car dealer found by a places search around a coordinate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyDealership {
    pub name: String,
    pub address: Option<String>,
    pub lat: f64,
    pub lon: f64,
    pub place_id: Option<String>,
}
