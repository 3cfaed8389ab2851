use std::collections::HashSet;

use crate::domain::types::{Dealership, Vehicle};

pub const MAX_DEALERSHIPS: usize = 10;

const UNKNOWN_DEALER: &str = "Unknown Dealer";
const UNKNOWN_CITY: &str = "Unknown City";
const UNKNOWN_STATE: &str = "Unknown State";
const UNKNOWN_PHONE: &str = "Phone not available";

/// Distinct dealerships among `vehicles`, keyed by (name, city, state).
///
/// Listings with `target_vin` are considered first so the primary dealer
/// always wins its key. Result is primary first, then by name, at most
/// [`MAX_DEALERSHIPS`] entries.
pub fn distinct_dealerships(target_vin: &str, vehicles: &[Vehicle]) -> Vec<Dealership> {
    let ordered = vehicles
        .iter()
        .filter(|v| v.vin == target_vin)
        .chain(vehicles.iter().filter(|v| v.vin != target_vin));

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for vehicle in ordered {
        let Some(dealer) = &vehicle.dealer else {
            continue;
        };
        let entry = Dealership {
            name: or_placeholder(dealer.name.as_deref(), UNKNOWN_DEALER),
            address: dealer.street.clone(),
            city: or_placeholder(dealer.city.as_deref(), UNKNOWN_CITY),
            state: or_placeholder(dealer.state.as_deref(), UNKNOWN_STATE),
            zip: dealer.zip.clone(),
            phone: or_placeholder(dealer.phone.as_deref(), UNKNOWN_PHONE),
            website: dealer.website.clone(),
            lat: dealer.lat.unwrap_or(0.0),
            lng: dealer.lng.unwrap_or(0.0),
            vin: vehicle.vin.clone(),
            is_primary: vehicle.vin == target_vin,
        };
        if seen.insert((entry.name.clone(), entry.city.clone(), entry.state.clone())) {
            out.push(entry);
        }
    }

    out.sort_by(|a, b| {
        b.is_primary
            .cmp(&a.is_primary)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            .then_with(|| a.city.cmp(&b.city))
            .then_with(|| a.state.cmp(&b.state))
    });
    out.truncate(MAX_DEALERSHIPS);
    out
}

fn or_placeholder(value: Option<&str>, placeholder: &str) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_owned(),
        _ => placeholder.to_owned(),
    }
}
