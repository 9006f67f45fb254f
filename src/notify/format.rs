use crate::models::Listing;
use crate::notify::{Embed, Notification};
use chrono::{DateTime, Datelike, NaiveDate, Utc};

pub const DESCRIPTION_LIMIT: usize = 500;

const NEW_PREFIX: &str = "🏠 **NEW Apartment for rent!**";
const EXISTING_PREFIX: &str = "🏠 **Apartment for rent**";
const EMBED_COLOR: u32 = 0x00FF00;
const DATE_PLACEHOLDER: &str = "Not specified";

/// Build the chat message for a listing
pub fn format_notification(listing: &Listing, is_new: bool, now: DateTime<Utc>) -> Notification {
    let prefix = if is_new { NEW_PREFIX } else { EXISTING_PREFIX };

    let description = format!(
        "**Rent:** {} {}/month\n**Location:** {}\n**Rooms:** {:.0}\n**Size:** {} m²\n**Available from:** {}\n\n{}",
        listing.rent,
        listing.currency,
        listing.location,
        listing.room_count,
        listing.square_meters,
        format_start_date(&listing.start_date),
        truncate_description(&listing.description),
    );

    Notification {
        content: prefix.to_string(),
        embed: Embed {
            title: listing.title.clone(),
            url: listing.link.clone(),
            description,
            color: EMBED_COLOR,
            image_url: listing.image_url.clone(),
            timestamp: now.to_rfc3339(),
        },
    }
}

/// Cut descriptions longer than 500 characters and mark the cut with "..."
pub fn truncate_description(description: &str) -> String {
    match description.char_indices().nth(DESCRIPTION_LIMIT) {
        Some((cut, _)) => format!("{}...", &description[..cut]),
        None => description.to_string(),
    }
}

/// "1st of March" style rendering of an ISO-8601 date or timestamp
pub fn format_start_date(raw: &str) -> String {
    let date = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"));

    match date {
        Ok(date) => format!(
            "{}{} of {}",
            date.day(),
            ordinal_suffix(date.day()),
            date.format("%B")
        ),
        Err(_) => DATE_PLACEHOLDER.to_string(),
    }
}

pub fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}
