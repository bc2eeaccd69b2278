//! Risk signal client for the Danger Prediction Engine backend.
//!
//! Input sources feed the request builders, requests go out through the
//! transport, and responses come back through the interpreters to the
//! renderers and interaction bindings.

pub mod api;
pub mod bindings;
pub mod builders;
pub mod config;
pub mod error;
pub mod http_utils;
pub mod interpret;
pub mod location;
pub mod render;
pub mod transport;

#[cfg(test)]
mod test_utils;

pub use api::DpeApi;
pub use bindings::{ActionOutcome, Bindings, ChatLog, Notifier};
pub use builders::{ChatInput, PredictionSource, RequestBuilder, SettingsForm};
pub use config::{ClientConfig, ConfigOverrides, ResolvedConfig};
pub use error::{ApiError, TransportError};
pub use interpret::{summarize_prediction, to_renderable_zones, PredictionSummary, RenderableZone};
pub use location::{FixedLocation, LocationProvider};
pub use transport::{CallOptions, Method, Transport};
