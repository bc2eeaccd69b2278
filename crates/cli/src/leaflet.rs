use anyhow::Context;
use dpe_client::render::{MapSurface, TileLayer};
use dpe_protocol::GeoPoint;
use std::path::PathBuf;

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";

/// Map surface that emits a standalone Leaflet page on `present`.
pub(crate) struct LeafletPage {
    path: PathBuf,
    view: Option<(GeoPoint, u8)>,
    tiles: Vec<TileLayer>,
    markers: Vec<(GeoPoint, String)>,
}

impl LeafletPage {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self {
            path,
            view: None,
            tiles: Vec::new(),
            markers: Vec::new(),
        }
    }

    fn script(&self) -> anyhow::Result<String> {
        let (center, zoom) = self
            .view
            .context("map view must be set before presenting")?;
        let mut lines = vec![format!(
            "const map = L.map(\"map\").setView([{}, {}], {});",
            center.lat, center.lon, zoom
        )];
        for layer in &self.tiles {
            lines.push(format!(
                "L.tileLayer({}, {{ attribution: {} }}).addTo(map);",
                js_string(&layer.url_template),
                js_string(&layer.attribution)
            ));
        }
        for (position, popup) in &self.markers {
            lines.push(format!(
                "L.marker([{}, {}]).addTo(map).bindPopup({});",
                position.lat,
                position.lon,
                js_string(popup)
            ));
        }
        Ok(lines.join("\n"))
    }

    fn document(&self) -> anyhow::Result<String> {
        Ok(format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Safe zones</title>\n\
<link rel=\"stylesheet\" href=\"{LEAFLET_CSS}\">\n<script src=\"{LEAFLET_JS}\"></script>\n\
<style>html, body, #map {{ height: 100%; margin: 0; }}</style>\n</head>\n<body>\n\
<div id=\"map\"></div>\n<script>\n{}\n</script>\n</body>\n</html>\n",
            self.script()?
        ))
    }
}

fn js_string(value: &str) -> String {
    let quoted = serde_json::Value::String(value.to_string()).to_string();
    quoted.replace("</", "<\\/")
}

impl MapSurface for LeafletPage {
    fn set_view(&mut self, center: GeoPoint, zoom: u8) -> anyhow::Result<()> {
        self.view = Some((center, zoom));
        self.tiles.clear();
        self.markers.clear();
        Ok(())
    }

    fn add_tile_layer(&mut self, layer: &TileLayer) -> anyhow::Result<()> {
        self.tiles.push(layer.clone());
        Ok(())
    }

    fn add_marker(&mut self, position: GeoPoint, popup_html: &str) -> anyhow::Result<()> {
        self.markers.push((position, popup_html.to_string()));
        Ok(())
    }

    fn present(&mut self) -> anyhow::Result<()> {
        let document = self.document()?;
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        std::fs::write(&self.path, document)
            .with_context(|| format!("failed to write map page {}", self.path.display()))?;
        tracing::info!(
            path = %self.path.display(),
            markers = self.markers.len(),
            "map page written"
        );
        Ok(())
    }
}
