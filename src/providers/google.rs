use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use serde::Deserialize;

use crate::models::Position;

use super::{PointOfInterest, RouteEstimate, RouteStatus, RoutingProvider};

pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com";

const PLACES_PATH: &str = "/maps/api/place/nearbysearch/json";
const DIRECTIONS_PATH: &str = "/maps/api/directions/json";

/// Places + Directions client for the Google Maps web services.
#[derive(Clone)]
pub struct GoogleMapsClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct PlacesResponse {
    status: String,
    #[serde(default)]
    results: Vec<PlaceResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaceResult {
    #[serde(default)]
    name: String,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
struct Route {
    #[serde(default)]
    legs: Vec<Leg>,
}

#[derive(Debug, Deserialize)]
struct Leg {
    duration: TextValue,
    #[serde(default)]
    duration_in_traffic: Option<TextValue>,
    distance: TextValue,
    #[serde(default)]
    end_address: String,
}

#[derive(Debug, Clone, Deserialize)]
struct TextValue {
    text: String,
    value: i64,
}

impl GoogleMapsClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, api_key)
    }

    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<String> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .with_context(|| format!("request to {} failed", path))?;

        let status = response.status();
        let text = response.text().await.context("failed to read response body")?;
        if !status.is_success() {
            return Err(anyhow!("maps API error {}: {}", status, text));
        }
        Ok(text)
    }
}

fn parse_places(body: &str, timestamp: DateTime<Utc>) -> Result<Vec<PointOfInterest>> {
    let parsed: PlacesResponse =
        serde_json::from_str(body).context("invalid places response")?;

    match parsed.status.as_str() {
        "OK" => Ok(parsed
            .results
            .into_iter()
            .map(|place| PointOfInterest {
                name: place.name,
                position: Position::new(
                    place.geometry.location.lat,
                    place.geometry.location.lng,
                    timestamp,
                ),
            })
            .collect()),
        "ZERO_RESULTS" => Ok(Vec::new()),
        other => Err(anyhow!(
            "places search failed with status {}: {}",
            other,
            parsed.error_message.unwrap_or_default()
        )),
    }
}

fn parse_directions(body: &str) -> Result<RouteEstimate> {
    let parsed: DirectionsResponse =
        serde_json::from_str(body).context("invalid directions response")?;

    if parsed.status != "OK" {
        return Ok(RouteEstimate::failed(parsed.status));
    }

    let leg = parsed
        .routes
        .into_iter()
        .next()
        .and_then(|route| route.legs.into_iter().next());

    let Some(leg) = leg else {
        return Ok(RouteEstimate::failed("NO_LEGS"));
    };

    // Without live traffic data the API omits duration_in_traffic.
    let in_traffic = leg.duration_in_traffic.unwrap_or_else(|| leg.duration.clone());

    Ok(RouteEstimate {
        status: RouteStatus::Ok,
        normal_duration_secs: leg.duration.value,
        traffic_duration_secs: in_traffic.value,
        normal_duration_text: leg.duration.text,
        traffic_duration_text: in_traffic.text,
        distance_text: leg.distance.text,
        end_address: leg.end_address,
    })
}

#[async_trait]
impl RoutingProvider for GoogleMapsClient {
    async fn nearby_points_of_interest(
        &self,
        center: &Position,
        radius_meters: u32,
        category: &str,
    ) -> Result<Vec<PointOfInterest>> {
        let body = self
            .get_json(
                PLACES_PATH,
                &[
                    ("location", center.as_query()),
                    ("radius", radius_meters.to_string()),
                    ("type", category.to_string()),
                ],
            )
            .await?;
        let places = parse_places(&body, Utc::now())?;
        debug!("places search returned {} candidates", places.len());
        Ok(places)
    }

    async fn compute_route(
        &self,
        origin: &Position,
        destination: &Position,
        departure_time: DateTime<Utc>,
    ) -> Result<RouteEstimate> {
        // The API rejects departure times in the past.
        let departure = departure_time.timestamp().max(Utc::now().timestamp());
        let body = self
            .get_json(
                DIRECTIONS_PATH,
                &[
                    ("origin", origin.as_query()),
                    ("destination", destination.as_query()),
                    ("mode", "driving".to_string()),
                    ("departure_time", departure.to_string()),
                    ("traffic_model", "best_guess".to_string()),
                ],
            )
            .await?;
        parse_directions(&body)
    }
}
