use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub mod config;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Motion {
    pub shake: bool,
    pub fall: bool,
    pub speed_kmh: f64,
}

/// Free-form surroundings labels; the backend lower-cases and matches them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AmbientContext {
    pub lighting: String,
    pub crowd: String,
}

/// Body of `POST /predict`.
///
/// `location` is flattened so the wire form carries `lat`/`lon` at the top
/// level, which is what the scoring service reads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionRequest {
    #[serde(flatten)]
    pub location: GeoPoint,
    pub timestamp: String,
    pub heart_rate: u32,
    pub resting_bpm: u32,
    pub motion: Motion,
    pub context: AmbientContext,
    pub user_text: String,
    pub device: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionResponse {
    pub level: String,
    pub score: f64,
    #[serde(default)]
    pub reasons: Vec<String>,
    #[serde(default)]
    pub recommended_actions: Vec<String>,
    #[serde(default)]
    pub nearby_safe_zones: Vec<SafeZoneItem>,
}

/// Body of `POST /alert`. The schema is open: any caller field is forwarded.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct SosRequest(pub Map<String, Value>);

impl SosRequest {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Acknowledgement returned by `/alert`. Bindings display the raw JSON; this
/// is only a typed view over it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlertAck {
    pub status: String,
    #[serde(default)]
    pub echo: Value,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SafeZoneQuery {
    pub lat: f64,
    pub lon: f64,
    pub radius_km: f64,
}

impl SafeZoneQuery {
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }

    pub fn query_pairs(&self) -> [(&'static str, String); 3] {
        [
            ("lat", self.lat.to_string()),
            ("lon", self.lon.to_string()),
            ("radius_km", self.radius_km.to_string()),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SafeZoneItem {
    pub title: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

impl SafeZoneItem {
    pub fn tags(&self) -> &[String] {
        self.tags.as_deref().unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SafeZoneResponse {
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default)]
    pub items: Vec<SafeZoneItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthStatus {
    pub status: String,
    pub name: String,
    pub version: String,
    pub time_utc: String,
}
