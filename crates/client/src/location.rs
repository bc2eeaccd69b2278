use dpe_protocol::GeoPoint;

/// Demo coordinate (Kolkata) used when no live position source is wired in.
pub const DEMO_LOCATION: GeoPoint = GeoPoint::new(22.5726, 88.3639);

/// Source of the device position stamped onto prediction requests.
pub trait LocationProvider: Send + Sync {
    fn current_location(&self) -> GeoPoint;
}

/// Always reports the same point: the demo coordinate or a configured one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedLocation(pub GeoPoint);

impl Default for FixedLocation {
    fn default() -> Self {
        Self(DEMO_LOCATION)
    }
}

impl LocationProvider for FixedLocation {
    fn current_location(&self) -> GeoPoint {
        self.0
    }
}
