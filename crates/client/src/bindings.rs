use dpe_protocol::{GeoPoint, SafeZoneItem, SafeZoneQuery};
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::api::DpeApi;
use crate::builders::{
    build_sos_request, ChatInput, PredictionSource, RequestBuilder, SettingsForm,
};
use crate::interpret::{summarize_prediction, to_renderable_zones};
use crate::render::ZoneRenderer;

pub const PREDICTION_FAILED_NOTICE: &str = "Prediction failed. Is the backend running?";
pub const SOS_FAILED_NOTICE: &str = "Could not send SOS.";
pub const SOS_QUEUED_NOTICE: &str = "SOS queued. Stay safe!";

/// Blocking, user-visible message channel.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Scrollable chat message list.
pub trait ChatLog: Send + Sync {
    fn append_capsule(&self, text: &str);
    fn scroll_to_bottom(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Completed,
    Failed,
    /// Nothing to do: empty input or no render target.
    Skipped,
    /// The same action already has a call in flight.
    Busy,
}

#[derive(Default)]
struct InFlight(AtomicBool);

struct InFlightGuard<'a>(&'a AtomicBool);

impl InFlight {
    fn begin(&self) -> Option<InFlightGuard<'_>> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard(&self.0))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Event handlers for the settings form, the SOS control, the chat box and
/// the safe-zone panel. Flows share no mutable state beyond their own
/// in-flight flag; the zone renderer is only touched by zone loads.
pub struct Bindings {
    api: Arc<DpeApi>,
    builder: RequestBuilder,
    notifier: Arc<dyn Notifier>,
    chat_log: Option<Arc<dyn ChatLog>>,
    zones: Option<Mutex<Box<dyn ZoneRenderer>>>,
    render_nearby: bool,
    settings_flight: InFlight,
    sos_flight: InFlight,
    chat_flight: InFlight,
    zones_flight: InFlight,
}

impl Bindings {
    pub fn new(api: Arc<DpeApi>, builder: RequestBuilder, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            builder,
            notifier,
            chat_log: None,
            zones: None,
            render_nearby: false,
            settings_flight: InFlight::default(),
            sos_flight: InFlight::default(),
            chat_flight: InFlight::default(),
            zones_flight: InFlight::default(),
        }
    }

    pub fn with_chat_log(mut self, chat_log: Arc<dyn ChatLog>) -> Self {
        self.chat_log = Some(chat_log);
        self
    }

    pub fn with_zone_renderer(mut self, renderer: Box<dyn ZoneRenderer>) -> Self {
        self.zones = Some(Mutex::new(renderer));
        self
    }

    /// Also render the zones a prediction response carries.
    pub fn with_nearby_zones(mut self, enabled: bool) -> Self {
        self.render_nearby = enabled;
        self
    }

    pub async fn submit_settings(&self, form: &SettingsForm) -> ActionOutcome {
        let Some(_guard) = self.settings_flight.begin() else {
            tracing::debug!("settings submit ignored, prediction in flight");
            return ActionOutcome::Busy;
        };
        let Some(request) = self.builder.prediction(PredictionSource::Settings(form)) else {
            return ActionOutcome::Skipped;
        };
        match self.api.predict(&request).await {
            Ok(response) => {
                let summary = summarize_prediction(&response);
                tracing::info!(
                    level = %summary.level_label,
                    score = summary.score,
                    "prediction received"
                );
                self.notifier.notify(&summary.notice_text());
                if self.render_nearby {
                    self.render_items(request.location, &response.nearby_safe_zones)
                        .await;
                }
                ActionOutcome::Completed
            }
            Err(err) => {
                tracing::error!(error = %err, "prediction failed");
                self.notifier.notify(PREDICTION_FAILED_NOTICE);
                ActionOutcome::Failed
            }
        }
    }

    pub async fn send_sos(&self, extra: Map<String, Value>) -> ActionOutcome {
        let Some(_guard) = self.sos_flight.begin() else {
            tracing::debug!("sos ignored, alert in flight");
            return ActionOutcome::Busy;
        };
        let request = build_sos_request(extra);
        match self.api.alert_sos(&request).await {
            Ok(ack) => {
                let shown = serde_json::to_string_pretty(&ack).unwrap_or_else(|_| ack.to_string());
                tracing::info!("sos acknowledged");
                self.notifier.notify(&format!("{SOS_QUEUED_NOTICE}\n{shown}"));
                ActionOutcome::Completed
            }
            Err(err) => {
                tracing::error!(error = %err, "sos failed");
                self.notifier.notify(SOS_FAILED_NOTICE);
                ActionOutcome::Failed
            }
        }
    }

    /// Chat failures are logged only; they never raise a notice.
    pub async fn send_chat(&self, input: &ChatInput) -> ActionOutcome {
        let Some(request) = self.builder.prediction(PredictionSource::Chat(input)) else {
            return ActionOutcome::Skipped;
        };
        let Some(_guard) = self.chat_flight.begin() else {
            tracing::debug!("chat send ignored, prediction in flight");
            return ActionOutcome::Busy;
        };
        match self.api.predict(&request).await {
            Ok(response) => {
                if let Some(chat_log) = &self.chat_log {
                    chat_log.append_capsule(&summarize_prediction(&response).capsule_text());
                    chat_log.scroll_to_bottom();
                }
                ActionOutcome::Completed
            }
            Err(err) => {
                tracing::error!(error = %err, "chat prediction failed");
                ActionOutcome::Failed
            }
        }
    }

    /// Fetches and renders safe zones. On failure the render target keeps
    /// whatever it showed before; no error is surfaced to the user.
    pub async fn load_zones(&self, query: &SafeZoneQuery) -> ActionOutcome {
        if self.zones.is_none() {
            return ActionOutcome::Skipped;
        }
        let Some(_guard) = self.zones_flight.begin() else {
            return ActionOutcome::Busy;
        };
        match self.api.safe_zones(query).await {
            Ok(response) => self.render_items(query.center(), &response.items).await,
            Err(err) => {
                tracing::warn!(error = %err, "safe zones failed");
                ActionOutcome::Failed
            }
        }
    }

    async fn render_items(&self, center: GeoPoint, items: &[SafeZoneItem]) -> ActionOutcome {
        let Some(zones) = &self.zones else {
            return ActionOutcome::Skipped;
        };
        let renderable = to_renderable_zones(items);
        let mut renderer = zones.lock().await;
        match renderer.render(center, &renderable) {
            Ok(()) => {
                tracing::debug!(
                    mode = renderer.mode().as_str(),
                    count = renderable.len(),
                    "safe zones rendered"
                );
                ActionOutcome::Completed
            }
            Err(err) => {
                tracing::warn!(error = %err, "safe zones render failed");
                ActionOutcome::Failed
            }
        }
    }
}
