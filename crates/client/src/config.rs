use anyhow::Context;
use dpe_protocol::config::ClientFileConfig;
use dpe_protocol::GeoPoint;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000/api";
pub const DEFAULT_API_KEY: &str = "dev-key";
pub const DEFAULT_RADIUS_KM: f64 = 5.0;
pub const DEFAULT_ZOOM: u8 = 13;
const MAX_ZOOM: u8 = 19;

pub const ENV_API_BASE: &str = "DPE_API_BASE";
pub const ENV_API_KEY: &str = "DPE_API_KEY";

/// Connection settings handed to `Transport::new`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_base: String,
    pub api_key: String,
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            timeout: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ZoneSettings {
    pub radius_km: f64,
    pub zoom: u8,
    pub map_html: Option<PathBuf>,
}

impl Default for ZoneSettings {
    fn default() -> Self {
        Self {
            radius_km: DEFAULT_RADIUS_KM,
            zoom: DEFAULT_ZOOM,
            map_html: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedConfig {
    pub client: ClientConfig,
    pub device_name: Option<String>,
    pub location: Option<GeoPoint>,
    pub zones: ZoneSettings,
}

/// Values that take precedence over the file: environment first, then
/// explicit flags on top.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_base: Option<String>,
    pub api_key: Option<String>,
    pub map_html: Option<PathBuf>,
}

impl ConfigOverrides {
    pub fn from_env() -> Self {
        Self {
            api_base: non_empty_env(ENV_API_BASE),
            api_key: non_empty_env(ENV_API_KEY),
            map_html: None,
        }
    }

    pub fn merged_with(self, higher: ConfigOverrides) -> Self {
        Self {
            api_base: higher.api_base.or(self.api_base),
            api_key: higher.api_key.or(self.api_key),
            map_html: higher.map_html.or(self.map_html),
        }
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Reads the TOML file. A missing file is not an error; defaults apply.
pub fn load_file_config(path: &Path) -> anyhow::Result<ClientFileConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "config file absent, using defaults");
        return Ok(ClientFileConfig::default());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("failed to parse config {}", path.display()))
}

pub fn resolve_config(
    file: ClientFileConfig,
    overrides: ConfigOverrides,
) -> anyhow::Result<ResolvedConfig> {
    let api = file.api.unwrap_or_default();
    let zones = file.zones.unwrap_or_default();

    let api_base = overrides
        .api_base
        .or(api.base_url)
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    if api_base.trim().is_empty() {
        anyhow::bail!("api base_url must not be empty");
    }
    let api_key = overrides
        .api_key
        .or(api.key)
        .unwrap_or_else(|| DEFAULT_API_KEY.to_string());

    let radius_km = zones.radius_km.unwrap_or(DEFAULT_RADIUS_KM);
    if !radius_km.is_finite() || radius_km <= 0.0 {
        anyhow::bail!("zones radius_km must be a positive number");
    }
    let zoom = zones.zoom.unwrap_or(DEFAULT_ZOOM);
    if zoom > MAX_ZOOM {
        anyhow::bail!("zones zoom must be at most {MAX_ZOOM}");
    }

    Ok(ResolvedConfig {
        client: ClientConfig {
            api_base: api_base.trim().to_string(),
            api_key,
            timeout: api.timeout_ms.map(Duration::from_millis),
        },
        device_name: file
            .device
            .and_then(|device| device.name)
            .filter(|name| !name.trim().is_empty()),
        location: file
            .location
            .map(|location| GeoPoint::new(location.lat, location.lon)),
        zones: ZoneSettings {
            radius_km,
            zoom,
            map_html: overrides
                .map_html
                .or_else(|| zones.map_html.map(PathBuf::from)),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> ClientFileConfig {
        toml::from_str(input).unwrap()
    }

    #[test]
    fn defaults_apply_to_empty_file() {
        let resolved = resolve_config(ClientFileConfig::default(), ConfigOverrides::default())
            .unwrap();
        assert_eq!(resolved.client, ClientConfig::default());
        assert_eq!(resolved.zones, ZoneSettings::default());
        assert!(resolved.location.is_none());
        assert!(resolved.device_name.is_none());
    }

    #[test]
    fn overrides_beat_file_values() {
        let file = parse(
            r#"
[api]
base_url = "http://file/api"
key = "file-key"
"#,
        );
        let env = ConfigOverrides {
            api_base: Some("http://env/api".to_string()),
            api_key: Some("env-key".to_string()),
            map_html: None,
        };
        let flags = ConfigOverrides {
            api_key: Some("flag-key".to_string()),
            ..ConfigOverrides::default()
        };
        let resolved = resolve_config(file, env.merged_with(flags)).unwrap();
        assert_eq!(resolved.client.api_base, "http://env/api");
        assert_eq!(resolved.client.api_key, "flag-key");
    }

    #[test]
    fn timeout_is_unset_unless_configured() {
        let resolved = resolve_config(
            parse("[api]\ntimeout_ms = 1500\n"),
            ConfigOverrides::default(),
        )
        .unwrap();
        assert_eq!(resolved.client.timeout, Some(Duration::from_millis(1500)));
    }

    #[test]
    fn rejects_bad_zone_settings() {
        let zero_radius = parse("[zones]\nradius_km = 0.0\n");
        assert!(resolve_config(zero_radius, ConfigOverrides::default()).is_err());
        let deep_zoom = parse("[zones]\nzoom = 30\n");
        assert!(resolve_config(deep_zoom, ConfigOverrides::default()).is_err());
    }

    #[test]
    fn rejects_blank_base_url() {
        let overrides = ConfigOverrides {
            api_base: Some("   ".to_string()),
            ..ConfigOverrides::default()
        };
        assert!(resolve_config(ClientFileConfig::default(), overrides).is_err());
    }

    #[test]
    fn blank_device_name_is_ignored() {
        let file = parse("[device]\nname = \"  \"\n");
        let resolved = resolve_config(file, ConfigOverrides::default()).unwrap();
        assert!(resolved.device_name.is_none());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let path = std::env::temp_dir().join("dpe-client-config-does-not-exist.toml");
        let file = load_file_config(&path).unwrap();
        assert!(file.api.is_none());
    }
}
