use serde::{Deserialize, Serialize};

const DETAIL_LINK_BASE: &str = "https://qasa.se/home";

/// Normalized snapshot of one rental ad at fetch time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Listing {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Monthly rent in `currency`
    pub rent: i64,
    pub currency: String,
    /// Upload with the lowest order, empty when the ad has no uploads
    pub image_url: String,
    pub link: String,
    pub location: String,
    pub room_count: f64,
    /// Raw ISO-8601 start date as reported by the source, possibly empty
    pub start_date: String,
    pub square_meters: i64,
}

/// Public page for a listing id
pub fn detail_link(id: &str) -> String {
    format!("{}/{}", DETAIL_LINK_BASE, id)
}

/// "Route, Locality" when the street is known, otherwise just the locality
pub fn location_label(route: &str, locality: &str) -> String {
    if route.is_empty() {
        locality.to_string()
    } else {
        format!("{}, {}", route, locality)
    }
}
