use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::record::{LocationFields, LocationResolution};

pub(crate) use self::nominatim::NominatimGeocoder;

mod nominatim;


/// Address components from most to least preferred as the location of a posting.
const GRANULARITIES: [&str; 6] = ["place", "town", "city", "suburb", "region", "village"];
/// Granularities that name a city.
const CITY_GRANULARITIES: [&str; 3] = ["town", "city", "suburb"];


/// A single geocoding match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub(crate) struct GeoResult {
    #[serde(default)]
    pub(crate) display_name: String,
    /// Address components keyed by their kind, like `city`, `state` or `country_code`.
    #[serde(default)]
    pub(crate) address: HashMap<String, String>
}


/// Turns free text into an address.
#[async_trait]
pub(crate) trait Geocoder: Send + Sync {
    /// The best match for `query`. Failures are logged and treated as no match.
    async fn geocode(&self, query: &str) -> Option<GeoResult>;
}


/// Picks the record's location fields out of a geocoding match. Any subset may end up populated.
pub(crate) fn location_fields(result: &GeoResult) -> LocationFields {
    // Empty components count as missing.
    let get = |kind: &str| result.address.get(kind).filter(|value| !value.is_empty()).cloned();
    let mut fields = LocationFields::default();

    let mut location = GRANULARITIES
        .iter()
        .find_map(|&kind| get(kind).map(|value| (kind, value)))
        .map(|(kind, value)| {
            if CITY_GRANULARITIES.contains(&kind) {
                fields.city = Some(value.clone());
            }
            value
        });

    fields.locality = get("state");
    if let Some(country) = get("country") {
        fields.country = Some(country.clone());
        location = Some(country);
    }
    fields.country_code = get("country_code");

    fields.location_text = location.clone();
    fields.location = location;
    fields
}


/// Geocodes the location carried from a listing card.
pub(crate) async fn resolve_location(geocoder: &dyn Geocoder, query: &str) -> LocationResolution {
    match geocoder.geocode(query).await {
        Some(result) => {
            debug!(query, resolved = %result.display_name, "Geocoded location");
            LocationResolution::Resolved(location_fields(&result))
        }
        None => LocationResolution::NotFound
    }
}
