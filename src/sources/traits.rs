use crate::error::FetchError;
use crate::models::Listing;
use async_trait::async_trait;

/// Anything that can produce the current page of listings
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetch the newest listings, most recent first
    async fn fetch(&self) -> Result<Vec<Listing>, FetchError>;

    /// Get the name of the listing source
    fn source_name(&self) -> &'static str;
}
