use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "dpe",
    version,
    about = "Risk signal client for the Danger Prediction Engine"
)]
pub(crate) struct Args {
    #[arg(long, default_value = "config/dpe-client.toml")]
    pub(crate) config: PathBuf,
    /// Overrides DPE_API_BASE and the config file.
    #[arg(long)]
    pub(crate) api_base: Option<String>,
    /// Overrides DPE_API_KEY and the config file.
    #[arg(long)]
    pub(crate) api_key: Option<String>,
    /// Also write JSON logs to a daily file in this directory.
    #[arg(long)]
    pub(crate) log_dir: Option<PathBuf>,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Submit the settings form and show the risk summary.
    Predict {
        #[arg(long, default_value = "")]
        resting: String,
        #[arg(long, default_value = "")]
        device: String,
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        threshold: String,
        /// Render the safe zones attached to the prediction.
        #[arg(long, default_value_t = false)]
        zones: bool,
        #[arg(long)]
        map_html: Option<PathBuf>,
    },
    /// Send a manual SOS alert.
    Sos {
        /// Extra alert field as key=value; JSON values are kept typed.
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, Value)>,
    },
    /// Assess a chat message; reads lines from stdin when no text is given.
    Chat {
        text: Option<String>,
        #[arg(long)]
        device: Option<String>,
    },
    /// Load nearby safe zones.
    Zones {
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        lon: Option<f64>,
        #[arg(long)]
        radius_km: Option<f64>,
        /// Write an interactive map page instead of listing cards.
        #[arg(long)]
        map_html: Option<PathBuf>,
    },
    /// Check backend health.
    Health,
}

impl Command {
    pub(crate) fn map_html(&self) -> Option<PathBuf> {
        match self {
            Command::Predict { map_html, .. } | Command::Zones { map_html, .. } => map_html.clone(),
            _ => None,
        }
    }
}

pub(crate) fn parse_field(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got {raw}"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err("field key must not be empty".to_string());
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn field_values_keep_json_types() {
        assert_eq!(parse_field("count=3").unwrap(), ("count".to_string(), json!(3)));
        assert_eq!(
            parse_field("contact=+91 100").unwrap(),
            ("contact".to_string(), json!("+91 100"))
        );
        assert_eq!(
            parse_field("reason=\"fall\"").unwrap(),
            ("reason".to_string(), json!("fall"))
        );
    }

    #[test]
    fn field_requires_key() {
        assert!(parse_field("novalue").is_err());
        assert!(parse_field("=x").is_err());
    }

    #[test]
    fn parses_negative_threshold() {
        let args = Args::try_parse_from(["dpe", "predict", "--threshold", "-5"]).unwrap();
        match args.command {
            Command::Predict { threshold, .. } => assert_eq!(threshold, "-5"),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_sos_fields() {
        let args =
            Args::try_parse_from(["dpe", "sos", "--field", "reason=fall", "--field", "n=1"])
                .unwrap();
        match args.command {
            Command::Sos { fields } => assert_eq!(fields.len(), 2),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn map_html_comes_from_command() {
        let args =
            Args::try_parse_from(["dpe", "zones", "--map-html", "out/zones.html"]).unwrap();
        assert_eq!(args.command.map_html(), Some(PathBuf::from("out/zones.html")));
    }
}
