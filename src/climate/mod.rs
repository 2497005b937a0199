//! Monthly climatology (temperature and humidity) for a district.
//!
//! Lookups never fail from the caller's point of view: any problem is logged
//! and the configured fallback values are returned instead.

mod coords;
mod month;

use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::config::ClimateConfig;
use crate::http_client::{self, HttpError, RetryConfig};

pub use coords::{Coordinates, CoordsError, DistrictCoords, normalize_district_key};
pub use month::Month;

const MAX_RESPONSE_BYTES: usize = 1024 * 1024;
const TEMPERATURE_PARAM: &str = "T2M";
const HUMIDITY_PARAM: &str = "RH2M";
/// Marker the service uses for missing data.
const FILL_VALUE: f64 = -999.0;

/// Where a [`Climate`] value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClimateOrigin {
    Fetched,
    Fallback,
}

/// Monthly average temperature and relative humidity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Climate {
    pub temperature_c: f32,
    pub humidity_pct: f32,
    pub origin: ClimateOrigin,
}

/// Anything that can answer "what is the climate in this district in this month".
pub trait ClimateLookup {
    fn monthly_averages(&self, district: &str, month: Month) -> Climate;
}

#[derive(Debug, Error)]
enum ClimateError {
    #[error("district {0:?} not found in coordinates")]
    UnknownDistrict(String),
    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),
    #[error(transparent)]
    Http(#[from] HttpError),
    #[error("malformed response: {0}")]
    Json(#[from] serde_json::Error),
    #[error("response has no {parameter}[{month}]")]
    MissingValue {
        parameter: &'static str,
        month: &'static str,
    },
}

#[derive(Debug, Deserialize)]
struct PowerResponse {
    properties: PowerProperties,
}

#[derive(Debug, Deserialize)]
struct PowerProperties {
    parameter: BTreeMap<String, BTreeMap<String, f64>>,
}

/// Client for a POWER-style climatology endpoint.
#[derive(Debug, Clone)]
pub struct PowerClimateClient {
    config: ClimateConfig,
    coords: DistrictCoords,
}

impl PowerClimateClient {
    pub fn new(config: ClimateConfig, coords: DistrictCoords) -> Self {
        Self { config, coords }
    }

    pub fn coords(&self) -> &DistrictCoords {
        &self.coords
    }

    /// The values substituted whenever a lookup fails.
    pub fn fallback(&self) -> Climate {
        Climate {
            temperature_c: self.config.fallback_temperature_c,
            humidity_pct: self.config.fallback_humidity_pct,
            origin: ClimateOrigin::Fallback,
        }
    }

    /// Climatology query for a point.
    pub fn request_url(&self, point: Coordinates) -> Result<Url, url::ParseError> {
        Url::parse_with_params(
            &self.config.base_url,
            &[
                ("parameters", format!("{TEMPERATURE_PARAM},{HUMIDITY_PARAM}")),
                ("community", self.config.community.clone()),
                ("longitude", point.lon.to_string()),
                ("latitude", point.lat.to_string()),
                ("format", "JSON".to_string()),
            ],
        )
    }

    fn fetch(&self, district: &str, month: Month) -> Result<Climate, ClimateError> {
        let point = self
            .coords
            .get(district)
            .ok_or_else(|| ClimateError::UnknownDistrict(district.to_string()))?;
        let url = self.request_url(point)?;
        tracing::info!("Fetching climatology from {url}");
        let retry = RetryConfig {
            max_attempts: self.config.max_attempts,
            ..RetryConfig::default()
        };
        let body = http_client::get_bytes(url.as_str(), MAX_RESPONSE_BYTES, retry)?;
        parse_monthly_averages(&body, month)
    }
}

impl ClimateLookup for PowerClimateClient {
    fn monthly_averages(&self, district: &str, month: Month) -> Climate {
        match self.fetch(district, month) {
            Ok(climate) => climate,
            Err(err) => {
                tracing::warn!(
                    "Climate lookup for {district} ({month}) failed: {err}; using defaults"
                );
                self.fallback()
            }
        }
    }
}

fn parse_monthly_averages(body: &[u8], month: Month) -> Result<Climate, ClimateError> {
    let response: PowerResponse = serde_json::from_slice(body)?;
    let parameters = &response.properties.parameter;
    tracing::debug!(
        "Climatology parameters available: {:?}",
        parameters.keys().collect::<Vec<_>>()
    );
    let value = |parameter: &'static str| {
        parameters
            .get(parameter)
            .and_then(|by_month| by_month.get(month.code()))
            .copied()
            .filter(|&v| v.is_finite() && v != FILL_VALUE)
            .map(round_one_decimal)
            .ok_or(ClimateError::MissingValue {
                parameter,
                month: month.code(),
            })
    };
    Ok(Climate {
        temperature_c: value(TEMPERATURE_PARAM)?,
        humidity_pct: value(HUMIDITY_PARAM)?,
        origin: ClimateOrigin::Fetched,
    })
}

fn round_one_decimal(value: f64) -> f32 {
    ((value * 10.0).round() / 10.0) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::test_server::{json_response, serve_once};

    const BODY: &str = r#"{
        "type": "Feature",
        "properties": {
            "parameter": {
                "T2M": {"JAN": 22.94, "JUN": 25.37, "ANN": 24.5},
                "RH2M": {"JAN": 61.12, "JUN": 80.06, "ANN": 70.0}
            }
        }
    }"#;

    fn client(base_url: &str) -> PowerClimateClient {
        let config = ClimateConfig {
            base_url: base_url.to_string(),
            ..ClimateConfig::default()
        };
        let coords = DistrictCoords::from_entries([(
            "Mandya".to_string(),
            Coordinates {
                lat: 12.52,
                lon: 76.9,
            },
        )]);
        PowerClimateClient::new(config, coords)
    }

    #[test]
    fn unknown_district_falls_back_without_network() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.set_nonblocking(true).unwrap();
        let url = format!("http://{}/power", listener.local_addr().unwrap());

        let climate = client(&url).monthly_averages("Atlantis", Month::June);
        assert_eq!(climate.temperature_c, 30.0);
        assert_eq!(climate.humidity_pct, 60.0);
        assert_eq!(climate.origin, ClimateOrigin::Fallback);

        let err = listener.accept().unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::WouldBlock, "no request is sent");
    }

    #[test]
    fn fetched_values_are_rounded() {
        let url = serve_once(json_response("200 OK", BODY));
        let climate = client(&format!("{url}/power")).monthly_averages(" mandya", Month::June);
        assert_eq!(
            climate,
            Climate {
                temperature_c: 25.4,
                humidity_pct: 80.1,
                origin: ClimateOrigin::Fetched,
            }
        );
    }

    #[test]
    fn server_error_falls_back() {
        let url = serve_once(json_response("500 Internal Server Error", "{}"));
        let climate = client(&url).monthly_averages("Mandya", Month::January);
        assert_eq!(climate, client(&url).fallback());
    }

    #[test]
    fn malformed_body_falls_back() {
        let url = serve_once(json_response("200 OK", "{\"properties\": 3}"));
        let climate = client(&url).monthly_averages("Mandya", Month::January);
        assert_eq!(climate.origin, ClimateOrigin::Fallback);
    }

    #[test]
    fn missing_month_or_fill_value_is_an_error() {
        assert!(matches!(
            parse_monthly_averages(BODY.as_bytes(), Month::March),
            Err(ClimateError::MissingValue { month: "MAR", .. })
        ));
        let filled = r#"{"properties":{"parameter":{"T2M":{"MAR":-999.0},"RH2M":{"MAR":55.0}}}}"#;
        assert!(matches!(
            parse_monthly_averages(filled.as_bytes(), Month::March),
            Err(ClimateError::MissingValue {
                parameter: "T2M",
                ..
            })
        ));
    }

    #[test]
    fn request_url_carries_query() {
        let url = client("https://power.example/api/point")
            .request_url(Coordinates {
                lat: 12.52,
                lon: 76.9,
            })
            .unwrap();
        let pairs: BTreeMap<String, String> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs["parameters"], "T2M,RH2M");
        assert_eq!(pairs["community"], "AG");
        assert_eq!(pairs["latitude"], "12.52");
        assert_eq!(pairs["longitude"], "76.9");
        assert_eq!(pairs["format"], "JSON");
    }
}
