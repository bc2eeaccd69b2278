use dpe_protocol::GeoPoint;

use super::{RenderMode, ZoneRenderer};
use crate::interpret::RenderableZone;

/// Plain card: title, comma-joined tags, and distance when known.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneCard {
    pub title: String,
    pub tags: String,
    pub distance: Option<String>,
}

impl ZoneCard {
    pub fn from_zone(zone: &RenderableZone) -> Self {
        Self {
            title: zone.title.clone(),
            tags: zone.tags_joined(),
            distance: zone.distance_text(),
        }
    }
}

/// Target that owns the rendered cards.
pub trait CardContainer: Send {
    fn clear(&mut self);
    fn append(&mut self, card: ZoneCard);
}

pub struct ListRenderer {
    container: Box<dyn CardContainer>,
}

impl ListRenderer {
    pub fn new(container: Box<dyn CardContainer>) -> Self {
        Self { container }
    }
}

impl ZoneRenderer for ListRenderer {
    fn mode(&self) -> RenderMode {
        RenderMode::List
    }

    fn render(&mut self, _center: GeoPoint, zones: &[RenderableZone]) -> anyhow::Result<()> {
        self.container.clear();
        for zone in zones {
            self.container.append(ZoneCard::from_zone(zone));
        }
        Ok(())
    }
}
