use dpe_protocol::GeoPoint;

use super::{RenderMode, ZoneRenderer};
use crate::interpret::RenderableZone;

pub const OSM_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const OSM_ATTRIBUTION: &str = "&copy; OpenStreetMap contributors";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileLayer {
    pub url_template: String,
    pub attribution: String,
}

impl TileLayer {
    pub fn openstreetmap() -> Self {
        Self {
            url_template: OSM_TILE_URL.to_string(),
            attribution: OSM_ATTRIBUTION.to_string(),
        }
    }
}

/// Drawing surface of an interactive map library.
pub trait MapSurface: Send {
    fn set_view(&mut self, center: GeoPoint, zoom: u8) -> anyhow::Result<()>;
    fn add_tile_layer(&mut self, layer: &TileLayer) -> anyhow::Result<()>;
    fn add_marker(&mut self, position: GeoPoint, popup_html: &str) -> anyhow::Result<()>;

    /// Called once every marker is placed.
    fn present(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn popup_html(zone: &RenderableZone) -> String {
    format!(
        "<b>{}</b><br>{}",
        escape_html(&zone.title),
        escape_html(&zone.tags_joined())
    )
}

pub struct MapRenderer {
    surface: Box<dyn MapSurface>,
    zoom: u8,
    tiles: TileLayer,
}

impl MapRenderer {
    pub fn new(surface: Box<dyn MapSurface>, zoom: u8) -> Self {
        Self {
            surface,
            zoom,
            tiles: TileLayer::openstreetmap(),
        }
    }
}

impl ZoneRenderer for MapRenderer {
    fn mode(&self) -> RenderMode {
        RenderMode::Map
    }

    fn render(&mut self, center: GeoPoint, zones: &[RenderableZone]) -> anyhow::Result<()> {
        self.surface.set_view(center, self.zoom)?;
        self.surface.add_tile_layer(&self.tiles)?;
        for zone in zones {
            self.surface.add_marker(zone.position, &popup_html(zone))?;
        }
        self.surface.present()
    }
}
