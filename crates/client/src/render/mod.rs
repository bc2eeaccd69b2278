//! Safe-zone presentation.
//!
//! The mode is chosen once from a capability probe and the resulting
//! renderer is injected into the bindings; both modes consume the same
//! `RenderableZone` sequence.

pub mod list;
pub mod map;

pub use list::{CardContainer, ListRenderer, ZoneCard};
pub use map::{MapRenderer, MapSurface, TileLayer};

use dpe_protocol::GeoPoint;

use crate::interpret::RenderableZone;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Map,
    List,
}

impl RenderMode {
    pub fn as_str(self) -> &'static str {
        match self {
            RenderMode::Map => "map",
            RenderMode::List => "list",
        }
    }
}

pub trait ZoneRenderer: Send {
    fn mode(&self) -> RenderMode;
    fn render(&mut self, center: GeoPoint, zones: &[RenderableZone]) -> anyhow::Result<()>;
}

/// Outcome of probing for an interactive map library.
pub enum MapCapability {
    Present(Box<dyn MapSurface>),
    Absent,
}

impl MapCapability {
    pub fn is_present(&self) -> bool {
        matches!(self, MapCapability::Present(_))
    }
}

pub fn select_renderer(
    capability: MapCapability,
    container: Box<dyn CardContainer>,
    zoom: u8,
) -> Box<dyn ZoneRenderer> {
    let renderer: Box<dyn ZoneRenderer> = match capability {
        MapCapability::Present(surface) => Box::new(MapRenderer::new(surface, zoom)),
        MapCapability::Absent => Box::new(ListRenderer::new(container)),
    };
    tracing::debug!(mode = renderer.mode().as_str(), "zone renderer selected");
    renderer
}
