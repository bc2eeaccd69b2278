use dpe_protocol::{AmbientContext, Motion, PredictionRequest, SafeZoneQuery, SosRequest};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::SystemTime;

use crate::location::{FixedLocation, LocationProvider};

pub const DEFAULT_RESTING_BPM: u32 = 70;
pub const DEFAULT_DEVICE: &str = "Unknown";
pub const DEFAULT_THRESHOLD: i32 = 0;
/// Minimum rise over resting used for the simulated elevated heart rate.
pub const HEART_RATE_FLOOR: i32 = 25;

pub const CHAT_HEART_RATE: u32 = 88;
pub const CHAT_RESTING_BPM: u32 = 72;
pub const CHAT_DEVICE: &str = "WebApp";

pub const SOS_REASON: &str = "manual_sos";

const SETTINGS_USER_TEXT: &str = "testing prediction from settings form";

/// Values from the settings form. `None` means the field was blank.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsForm {
    pub resting: Option<u32>,
    pub device: Option<String>,
    pub threshold: Option<i32>,
}

impl SettingsForm {
    /// Builds a form from raw field text. Blank or unparsable numbers count
    /// as missing.
    pub fn from_raw(resting: &str, device: &str, threshold: &str) -> Self {
        Self {
            resting: parse_field(resting),
            device: Some(device.trim().to_string()).filter(|value| !value.is_empty()),
            threshold: parse_field(threshold),
        }
    }
}

fn parse_field<T: std::str::FromStr>(raw: &str) -> Option<T> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::debug!(value = trimmed, "ignoring unparsable form field");
            None
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatInput {
    pub text: String,
    pub device: Option<String>,
}

impl ChatInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            device: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum PredictionSource<'a> {
    Settings(&'a SettingsForm),
    Chat(&'a ChatInput),
}

pub fn elevated_heart_rate(resting: u32, threshold: i32) -> u32 {
    // max(...) is at least HEART_RATE_FLOOR, so the cast never wraps.
    resting.saturating_add(threshold.max(HEART_RATE_FLOOR) as u32)
}

pub fn iso_timestamp(now: SystemTime) -> String {
    humantime::format_rfc3339_millis(now).to_string()
}

/// Assembles prediction payloads; the position comes from the injected
/// `LocationProvider` and the timestamp from the build instant.
#[derive(Clone)]
pub struct RequestBuilder {
    location: Arc<dyn LocationProvider>,
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new(Arc::new(FixedLocation::default()))
    }
}

impl RequestBuilder {
    pub fn new(location: Arc<dyn LocationProvider>) -> Self {
        Self { location }
    }

    /// Returns `None` only for a chat message that is empty after trimming.
    pub fn prediction(&self, source: PredictionSource<'_>) -> Option<PredictionRequest> {
        self.prediction_at(source, SystemTime::now())
    }

    pub fn prediction_at(
        &self,
        source: PredictionSource<'_>,
        now: SystemTime,
    ) -> Option<PredictionRequest> {
        let location = self.location.current_location();
        let timestamp = iso_timestamp(now);
        match source {
            PredictionSource::Settings(form) => {
                let resting = form.resting.unwrap_or(DEFAULT_RESTING_BPM);
                let threshold = form.threshold.unwrap_or(DEFAULT_THRESHOLD);
                let device = form
                    .device
                    .as_deref()
                    .map(str::trim)
                    .filter(|value| !value.is_empty())
                    .unwrap_or(DEFAULT_DEVICE);
                Some(PredictionRequest {
                    location,
                    timestamp,
                    heart_rate: elevated_heart_rate(resting, threshold),
                    resting_bpm: resting,
                    motion: Motion {
                        shake: false,
                        fall: false,
                        speed_kmh: 5.0,
                    },
                    context: AmbientContext {
                        lighting: "dark".to_string(),
                        crowd: "few".to_string(),
                    },
                    user_text: SETTINGS_USER_TEXT.to_string(),
                    device: device.to_string(),
                })
            }
            PredictionSource::Chat(input) => {
                let text = input.text.trim();
                if text.is_empty() {
                    return None;
                }
                let device = input
                    .device
                    .as_deref()
                    .map(str::trim)
                    .filter(|value| !value.is_empty())
                    .unwrap_or(CHAT_DEVICE);
                Some(PredictionRequest {
                    location,
                    timestamp,
                    heart_rate: CHAT_HEART_RATE,
                    resting_bpm: CHAT_RESTING_BPM,
                    motion: Motion {
                        shake: false,
                        fall: false,
                        speed_kmh: 4.0,
                    },
                    context: AmbientContext {
                        lighting: "dim".to_string(),
                        crowd: "few".to_string(),
                    },
                    user_text: text.to_string(),
                    device: device.to_string(),
                })
            }
        }
    }
}

/// `{reason: "manual_sos", when: now}` with `extra` layered on top.
pub fn build_sos_request(extra: Map<String, Value>) -> SosRequest {
    build_sos_request_at(extra, SystemTime::now())
}

pub fn build_sos_request_at(extra: Map<String, Value>, now: SystemTime) -> SosRequest {
    let mut fields = Map::new();
    fields.insert("reason".to_string(), Value::String(SOS_REASON.to_string()));
    fields.insert("when".to_string(), Value::String(iso_timestamp(now)));
    fields.extend(extra);
    SosRequest(fields)
}

pub fn build_safe_zone_query(lat: f64, lon: f64, radius_km: f64) -> SafeZoneQuery {
    SafeZoneQuery { lat, lon, radius_km }
}
