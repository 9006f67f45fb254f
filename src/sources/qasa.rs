use crate::error::FetchError;
use crate::models::{detail_link, location_label, Listing};
use crate::sources::traits::ListingSource;
use crate::sources::types::SearchParams;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info, warn};

const SEARCH_ENDPOINT: &str = "https://api.qasa.se/graphql";
const USER_AGENT: &str = "Qasa-Discord-Bot/1.0";

const HOME_SEARCH_QUERY: &str = r#"query HomeSearch($order: HomeIndexSearchOrderInput, $offset: Int, $limit: Int, $params: HomeSearchParamsInput) {
  homeIndexSearch(order: $order, params: $params) {
    documents(offset: $offset, limit: $limit) {
      hasNextPage
      nodes {
        id
        title
        description
        rent
        currency
        roomCount
        squareMeters
        startDate
        homeType
        publishedOrBumpedAt
        location {
          id
          locality
          route
          __typename
        }
        uploads {
          id
          order
          type
          url
          __typename
        }
        __typename
      }
      totalCount
      __typename
    }
    __typename
  }
}"#;

/// Qasa GraphQL search client
pub struct QasaSource {
    client: Client,
    params: SearchParams,
}

impl QasaSource {
    /// Create a Qasa source with custom search parameters
    pub fn with_params(params: SearchParams) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, params })
    }
}

#[async_trait]
impl ListingSource for QasaSource {
    async fn fetch(&self) -> Result<Vec<Listing>, FetchError> {
        debug!(
            "Querying {} for {:?} (limit {})",
            SEARCH_ENDPOINT, self.params.area_identifiers, self.params.limit
        );

        let response = self
            .client
            .post(SEARCH_ENDPOINT)
            .json(&request_body(&self.params))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Qasa returned status: {}", status);
            return Err(FetchError::Status(status));
        }

        let body = response.text().await?;
        debug!("Downloaded {} bytes of search results", body.len());

        let listings = parse_search_response(&body, &self.params.currency)?;
        info!("Fetched {} listings from Qasa", listings.len());
        Ok(listings)
    }

    fn source_name(&self) -> &'static str {
        "Qasa"
    }
}

/// Build the HomeSearch operation for the first page of results, newest first
pub fn request_body(params: &SearchParams) -> Value {
    json!({
        "operationName": "HomeSearch",
        "variables": {
            "limit": params.limit,
            "offset": 0,
            "order": {
                "direction": "descending",
                "orderBy": "published_or_bumped_at"
            },
            "params": {
                "homeType": params.home_types,
                "shared": params.shared,
                "maxMonthlyCost": params.max_monthly_cost,
                "currency": params.currency,
                "areaIdentifier": params.area_identifiers,
                "rentalType": params.rental_types,
                "markets": params.markets
            }
        },
        "query": HOME_SEARCH_QUERY
    })
}

/// Map a raw search response body into listings, in the order the API returned them.
///
/// Nodes without a currency inherit `fallback_currency`.
pub fn parse_search_response(body: &str, fallback_currency: &str) -> Result<Vec<Listing>, FetchError> {
    let response: SearchResponse = serde_json::from_str(body)?;

    let messages = response
        .errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ");

    let data = match response.data {
        Some(data) => {
            if !response.errors.is_empty() {
                warn!("Search API returned data alongside errors: {}", messages);
            }
            data
        }
        None if !response.errors.is_empty() => return Err(FetchError::Api(messages)),
        None => return Err(FetchError::Api("response carried no data".to_string())),
    };

    Ok(data
        .home_index_search
        .documents
        .nodes
        .into_iter()
        .map(|node| node.into_listing(fallback_currency))
        .collect())
}

/// URL of the upload with the lowest order; the first one wins on ties
pub fn pick_image(uploads: &[Upload]) -> String {
    uploads
        .iter()
        .min_by_key(|upload| upload.order)
        .map(|upload| upload.url.clone())
        .unwrap_or_default()
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    data: Option<SearchData>,
    #[serde(default, deserialize_with = "null_as_default")]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    #[serde(default, deserialize_with = "null_as_default")]
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchData {
    home_index_search: HomeIndexSearch,
}

#[derive(Debug, Deserialize)]
struct HomeIndexSearch {
    documents: Documents,
}

#[derive(Debug, Deserialize)]
struct Documents {
    nodes: Vec<HomeNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HomeNode {
    id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    rent: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    currency: String,
    #[serde(default, deserialize_with = "null_as_default")]
    room_count: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    square_meters: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    start_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    location: NodeLocation,
    #[serde(default, deserialize_with = "null_as_default")]
    uploads: Vec<Upload>,
}

#[derive(Debug, Default, Deserialize)]
struct NodeLocation {
    #[serde(default, deserialize_with = "null_as_default")]
    locality: String,
    #[serde(default, deserialize_with = "null_as_default")]
    route: String,
}

/// One picture attached to a listing
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Upload {
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub order: i64,
}

impl HomeNode {
    fn into_listing(self, fallback_currency: &str) -> Listing {
        let currency = if self.currency.is_empty() {
            fallback_currency.to_string()
        } else {
            self.currency
        };

        Listing {
            link: detail_link(&self.id),
            location: location_label(&self.location.route, &self.location.locality),
            image_url: pick_image(&self.uploads),
            id: self.id,
            title: self.title,
            description: self.description,
            rent: self.rent,
            currency,
            room_count: self.room_count,
            start_date: self.start_date,
            square_meters: self.square_meters.round() as i64,
        }
    }
}

// The search API sends `null` for absent scalars; treat them like missing fields.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = include_str!("../../tests/fixtures/home_search.json");

    fn upload(url: &str, order: i64) -> Upload {
        Upload {
            url: url.to_string(),
            order,
        }
    }

    #[test]
    fn parses_fixture_in_source_order() {
        let listings = parse_search_response(FIXTURE, "NOK").unwrap();
        let ids: Vec<&str> = listings.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["1188342", "1188101", "1187990"]);
    }

    #[test]
    fn maps_full_node() {
        let listings = parse_search_response(FIXTURE, "NOK").unwrap();
        let first = &listings[0];

        assert_eq!(first.title, "Lys 2-roms på Grünerløkka");
        assert_eq!(first.rent, 16500);
        assert_eq!(first.currency, "NOK");
        assert_eq!(first.room_count, 2.0);
        assert_eq!(first.square_meters, 48);
        assert_eq!(first.start_date, "2025-03-01T00:00:00+00:00");
        assert_eq!(first.location, "Thorvald Meyers gate, Oslo");
        assert_eq!(first.link, "https://qasa.se/home/1188342");
        assert_eq!(first.image_url, "https://img.qasa.se/1188342/a.jpg");
    }

    #[test]
    fn null_fields_fall_back_to_empty_values() {
        let listings = parse_search_response(FIXTURE, "SEK").unwrap();
        let loft = &listings[1];

        assert_eq!(loft.description, "");
        assert_eq!(loft.start_date, "");
        assert_eq!(loft.currency, "SEK");
        assert_eq!(loft.location, "Oslo");
        assert_eq!(loft.image_url, "");
        assert_eq!(loft.square_meters, 56);
        assert_eq!(loft.room_count, 1.5);
    }

    #[test]
    fn tied_upload_order_keeps_first() {
        let listings = parse_search_response(FIXTURE, "NOK").unwrap();
        assert_eq!(listings[2].image_url, "https://img.qasa.se/1187990/first.jpg");
    }

    #[test]
    fn pick_image_selects_lowest_order() {
        let uploads = vec![upload("c", 7), upload("a", -1), upload("b", 3)];
        assert_eq!(pick_image(&uploads), "a");

        let tied = vec![upload("x", 2), upload("y", 1), upload("z", 1)];
        assert_eq!(pick_image(&tied), "y");

        assert_eq!(pick_image(&[]), "");
    }

    #[test]
    fn graphql_errors_without_data_fail_fetch() {
        let body = r#"{"data":null,"errors":[{"message":"Variable $params is invalid"},{"message":"rate limited"}]}"#;
        match parse_search_response(body, "NOK") {
            Err(FetchError::Api(msg)) => {
                assert_eq!(msg, "Variable $params is invalid; rate limited")
            }
            other => panic!("expected api error, got {:?}", other),
        }
    }

    #[test]
    fn empty_response_is_an_error() {
        assert!(matches!(
            parse_search_response("{}", "NOK"),
            Err(FetchError::Api(_))
        ));
    }

    #[test]
    fn malformed_shape_is_a_decode_error() {
        let missing_nodes = r#"{"data":{"homeIndexSearch":{"documents":{}}}}"#;
        assert!(matches!(
            parse_search_response(missing_nodes, "NOK"),
            Err(FetchError::Decode(_))
        ));

        let missing_id = r#"{"data":{"homeIndexSearch":{"documents":{"nodes":[{"title":"x"}]}}}}"#;
        assert!(matches!(
            parse_search_response(missing_id, "NOK"),
            Err(FetchError::Decode(_))
        ));

        assert!(matches!(
            parse_search_response("<html>Bad gateway</html>", "NOK"),
            Err(FetchError::Decode(_))
        ));
    }

    #[test]
    fn empty_page_is_not_an_error() {
        let body = r#"{"data":{"homeIndexSearch":{"documents":{"nodes":[]}}}}"#;
        assert!(parse_search_response(body, "NOK").unwrap().is_empty());
    }

    #[test]
    fn request_body_carries_search_params() {
        let params = SearchParams {
            max_monthly_cost: 15_000,
            area_identifiers: vec!["no/bergen".to_string()],
            limit: 25,
            ..SearchParams::default()
        };
        let body = request_body(&params);

        assert_eq!(body["operationName"], "HomeSearch");
        assert_eq!(body["variables"]["offset"], 0);
        assert_eq!(body["variables"]["limit"], 25);
        assert_eq!(body["variables"]["order"]["direction"], "descending");
        assert_eq!(body["variables"]["order"]["orderBy"], "published_or_bumped_at");
        assert_eq!(body["variables"]["params"]["homeType"], json!(["apartment", "loft"]));
        assert_eq!(body["variables"]["params"]["shared"], false);
        assert_eq!(body["variables"]["params"]["maxMonthlyCost"], 15_000);
        assert_eq!(body["variables"]["params"]["currency"], "NOK");
        assert_eq!(body["variables"]["params"]["areaIdentifier"], json!(["no/bergen"]));
        assert_eq!(body["variables"]["params"]["rentalType"], json!(["long_term"]));
        assert!(body["query"].as_str().unwrap().starts_with("query HomeSearch"));
    }
}
