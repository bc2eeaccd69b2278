use dpe_protocol::{
    HealthStatus, PredictionRequest, PredictionResponse, SafeZoneQuery, SafeZoneResponse,
    SosRequest,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::TransportError;
use crate::transport::{CallOptions, Transport};

pub const PREDICT_PATH: &str = "/predict";
pub const ALERT_PATH: &str = "/alert";
pub const HEALTH_PATH: &str = "/health";
/// Resolved against the origin, not the api base.
pub const SAFE_ZONES_PATH: &str = "/api/safe-zones";

/// Typed entry points over the backend contract.
pub struct DpeApi {
    transport: Transport,
}

impl DpeApi {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    pub fn from_config(config: ClientConfig) -> anyhow::Result<Self> {
        Ok(Self::new(Transport::new(config)?))
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub async fn predict(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResponse, TransportError> {
        let body = encode(PREDICT_PATH, request)?;
        let value = self
            .transport
            .call(PREDICT_PATH, CallOptions::post(body))
            .await?;
        decode(PREDICT_PATH, value)
    }

    /// Returns the acknowledgement exactly as the backend sent it.
    pub async fn alert_sos(&self, request: &SosRequest) -> Result<Value, TransportError> {
        let body = encode(ALERT_PATH, request)?;
        self.transport
            .call(ALERT_PATH, CallOptions::post(body))
            .await
    }

    pub async fn safe_zones(
        &self,
        query: &SafeZoneQuery,
    ) -> Result<SafeZoneResponse, TransportError> {
        let value = self
            .transport
            .call_origin(
                SAFE_ZONES_PATH,
                CallOptions::get().with_query(query.query_pairs()),
            )
            .await?;
        decode(SAFE_ZONES_PATH, value)
    }

    pub async fn health(&self) -> Result<HealthStatus, TransportError> {
        let value = self.transport.call(HEALTH_PATH, CallOptions::get()).await?;
        decode(HEALTH_PATH, value)
    }
}

fn encode<T: Serialize>(path: &str, payload: &T) -> Result<Value, TransportError> {
    serde_json::to_value(payload).map_err(|err| TransportError::Decode {
        path: path.to_string(),
        message: err.to_string(),
    })
}

fn decode<T: DeserializeOwned>(path: &str, value: Value) -> Result<T, TransportError> {
    serde_json::from_value(value).map_err(|err| TransportError::Decode {
        path: path.to_string(),
        message: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::{build_safe_zone_query, build_sos_request, RequestBuilder};
    use crate::builders::{PredictionSource, SettingsForm};
    use crate::test_utils::{canned, spawn_backend, Recorder};
    use axum::http::{Method, StatusCode};
    use axum::Router;
    use serde_json::{json, Map};

    fn api_for(origin: &str) -> DpeApi {
        DpeApi::from_config(ClientConfig {
            api_base: format!("{origin}/api"),
            api_key: "dev-key".to_string(),
            timeout: None,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn predict_posts_request_and_decodes_response() {
        let recorder = Recorder::default();
        let reply = json!({
            "score": 61.0,
            "level": "elevated",
            "reasons": ["late_night"],
            "recommended_actions": ["Head towards a safe zone"],
            "nearby_safe_zones": [{ "title": "Cafe", "lat": 22.5755, "lon": 88.3605, "tags": ["Crowded"], "distance_km": 0.37 }]
        });
        let app = Router::new().route(
            "/api/predict",
            canned(Method::POST, &recorder, StatusCode::OK, reply.to_string()),
        );
        let api = api_for(&spawn_backend(app).await);

        let request = RequestBuilder::default()
            .prediction(PredictionSource::Settings(&SettingsForm::default()))
            .unwrap();
        let response = api.predict(&request).await.unwrap();
        assert_eq!(response.level, "elevated");
        assert_eq!(response.nearby_safe_zones.len(), 1);

        let seen = recorder.take();
        let body: Value = serde_json::from_str(&seen[0].body).unwrap();
        assert_eq!(body["heart_rate"], json!(95));
        assert_eq!(body["lat"], json!(22.5726));
    }

    #[tokio::test]
    async fn alert_returns_raw_ack() {
        let recorder = Recorder::default();
        let ack = json!({ "status": "queued", "echo": { "reason": "manual_sos" }, "note": "demo" });
        let app = Router::new().route(
            "/api/alert",
            canned(Method::POST, &recorder, StatusCode::ACCEPTED, ack.to_string()),
        );
        let api = api_for(&spawn_backend(app).await);

        let value = api.alert_sos(&build_sos_request(Map::new())).await.unwrap();
        assert_eq!(value, ack);
        let body: Value = serde_json::from_str(&recorder.take()[0].body).unwrap();
        assert_eq!(body["reason"], json!("manual_sos"));
        assert!(body["when"].is_string());
    }

    #[tokio::test]
    async fn safe_zones_query_hits_origin_listing() {
        let recorder = Recorder::default();
        let app = Router::new().route(
            "/api/safe-zones",
            canned(
                Method::GET,
                &recorder,
                StatusCode::OK,
                r#"{"count":1,"items":[{"title":"Helpdesk","lat":22.5729,"lon":88.3639}]}"#,
            ),
        );
        let api = api_for(&spawn_backend(app).await);

        let response = api
            .safe_zones(&build_safe_zone_query(22.5726, 88.3639, 5.0))
            .await
            .unwrap();
        assert_eq!(response.count, Some(1));
        assert!(response.items[0].tags().is_empty());
        let seen = recorder.take();
        assert_eq!(
            seen[0].query.as_deref(),
            Some("lat=22.5726&lon=88.3639&radius_km=5")
        );
    }

    #[tokio::test]
    async fn health_decodes_status() {
        let recorder = Recorder::default();
        let app = Router::new().route(
            "/api/health",
            canned(
                Method::GET,
                &recorder,
                StatusCode::OK,
                r#"{"status":"ok","name":"Danger Prediction Engine","version":"1.0.0","time_utc":"2026-10-17T00:00:00+00:00"}"#,
            ),
        );
        let api = api_for(&spawn_backend(app).await);
        let health = api.health().await.unwrap();
        assert_eq!(health.status, "ok");
        assert_eq!(health.version, "1.0.0");
    }

    #[tokio::test]
    async fn malformed_prediction_is_decode_error() {
        let recorder = Recorder::default();
        let app = Router::new().route(
            "/api/predict",
            canned(Method::POST, &recorder, StatusCode::OK, r#"{"score":"high"}"#),
        );
        let api = api_for(&spawn_backend(app).await);
        let request = RequestBuilder::default()
            .prediction(PredictionSource::Settings(&SettingsForm::default()))
            .unwrap();
        let err = api.predict(&request).await.unwrap_err();
        assert!(matches!(err, TransportError::Decode { .. }));
    }
}
