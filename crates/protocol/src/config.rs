use serde::Deserialize;

/// On-disk client configuration (`config/dpe-client.toml`). Every section is
/// optional; missing values fall back to built-in defaults at resolve time.
#[derive(Debug, Default, Deserialize)]
pub struct ClientFileConfig {
    pub api: Option<ApiSection>,
    pub device: Option<DeviceSection>,
    pub location: Option<LocationSection>,
    pub zones: Option<ZonesSection>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiSection {
    pub base_url: Option<String>,
    pub key: Option<String>,
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeviceSection {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LocationSection {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Default, Deserialize)]
pub struct ZonesSection {
    pub radius_km: Option<f64>,
    pub zoom: Option<u8>,
    pub map_html: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_parses() {
        let parsed: ClientFileConfig = toml::from_str("").unwrap();
        assert!(parsed.api.is_none());
        assert!(parsed.zones.is_none());
    }

    #[test]
    fn location_requires_both_coordinates() {
        let input = r#"
[location]
lat = 22.5
"#;
        let parsed: Result<ClientFileConfig, _> = toml::from_str(input);
        assert!(parsed.is_err());
    }

    #[test]
    fn full_file_parses() {
        let input = r#"
[api]
base_url = "https://dpe.example.org/api"
key = "prod-key"
timeout_ms = 8000

[device]
name = "Pixel Watch"

[location]
lat = 22.5726
lon = 88.3639

[zones]
radius_km = 2.5
zoom = 15
map_html = "out/zones.html"
"#;
        let parsed: ClientFileConfig = toml::from_str(input).unwrap();
        let api = parsed.api.unwrap();
        assert_eq!(api.key.as_deref(), Some("prod-key"));
        assert_eq!(api.timeout_ms, Some(8000));
        assert_eq!(parsed.device.unwrap().name.as_deref(), Some("Pixel Watch"));
        let zones = parsed.zones.unwrap();
        assert_eq!(zones.radius_km, Some(2.5));
        assert_eq!(zones.zoom, Some(15));
    }
}
