use dpe_protocol::{GeoPoint, PredictionResponse, SafeZoneItem};

/// Shown when the backend sends no recommended action.
pub const FALLBACK_ACTION: &str = "Stay aware of surroundings";

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionSummary {
    pub level_label: String,
    pub score: f64,
    pub reasons_joined: String,
    pub top_action: String,
}

impl PredictionSummary {
    /// Text for the settings-submit notice.
    pub fn notice_text(&self) -> String {
        format!(
            "Risk: {} ({})\nReasons: {}",
            self.level_label, self.score, self.reasons_joined
        )
    }

    /// One-line capsule appended to the chat log.
    pub fn capsule_text(&self) -> String {
        format!(
            "RISK: {} ({}) → {}",
            self.level_label, self.score, self.top_action
        )
    }
}

/// The level is an opaque label: it is upper-cased, never matched.
pub fn summarize_prediction(response: &PredictionResponse) -> PredictionSummary {
    PredictionSummary {
        level_label: response.level.to_uppercase(),
        score: response.score,
        reasons_joined: response.reasons.join(", "),
        top_action: response
            .recommended_actions
            .first()
            .cloned()
            .unwrap_or_else(|| FALLBACK_ACTION.to_string()),
    }
}

/// Presentation model shared by the map and list renderers.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderableZone {
    pub title: String,
    pub position: GeoPoint,
    pub tags: Vec<String>,
    pub distance_km: Option<f64>,
}

impl RenderableZone {
    pub fn tags_joined(&self) -> String {
        self.tags.join(", ")
    }

    pub fn distance_text(&self) -> Option<String> {
        self.distance_km.map(|km| format!("{km} km"))
    }
}

pub fn to_renderable_zones(items: &[SafeZoneItem]) -> Vec<RenderableZone> {
    items
        .iter()
        .map(|item| RenderableZone {
            title: item.title.clone(),
            position: GeoPoint::new(item.lat, item.lon),
            tags: item.tags().to_vec(),
            distance_km: item.distance_km,
        })
        .collect()
}
