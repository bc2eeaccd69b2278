mod cli;
mod leaflet;
mod logging;
mod terminal;

use crate::cli::{Args, Command};
use crate::leaflet::LeafletPage;
use crate::logging::init_tracing;
use crate::terminal::{TerminalCards, TerminalChat, TerminalNotifier};
use clap::Parser;
use dpe_client::builders::build_safe_zone_query;
use dpe_client::config::{load_file_config, resolve_config, ZoneSettings};
use dpe_client::render::{select_renderer, MapCapability, ZoneRenderer};
use dpe_client::{
    ActionOutcome, Bindings, ChatInput, ConfigOverrides, DpeApi, FixedLocation,
    LocationProvider, RequestBuilder, SettingsForm,
};
use serde_json::Map;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    let _log_guard = init_tracing(args.log_dir.as_deref())?;

    let flags = ConfigOverrides {
        api_base: args.api_base.clone(),
        api_key: args.api_key.clone(),
        map_html: args.command.map_html(),
    };
    let file = load_file_config(&args.config)?;
    let config = resolve_config(file, ConfigOverrides::from_env().merged_with(flags))?;
    info!(api_base = %config.client.api_base, "dpe client starting");

    let api = Arc::new(DpeApi::from_config(config.client.clone())?);
    let location: Arc<dyn LocationProvider> =
        Arc::new(config.location.map(FixedLocation).unwrap_or_default());
    let builder = RequestBuilder::new(Arc::clone(&location));
    let bindings = Bindings::new(Arc::clone(&api), builder, Arc::new(TerminalNotifier));

    let outcome = match args.command {
        Command::Predict {
            resting,
            device,
            threshold,
            zones,
            ..
        } => {
            let form = SettingsForm::from_raw(&resting, &device, &threshold);
            let bindings = if zones {
                bindings
                    .with_zone_renderer(zone_renderer(&config.zones))
                    .with_nearby_zones(true)
            } else {
                bindings
            };
            bindings.submit_settings(&form).await
        }
        Command::Sos { fields } => {
            let extra: Map<_, _> = fields.into_iter().collect();
            bindings.send_sos(extra).await
        }
        Command::Chat { text, device } => {
            let bindings = bindings.with_chat_log(Arc::new(TerminalChat));
            let device = device.or_else(|| config.device_name.clone());
            match text {
                Some(text) => {
                    bindings
                        .send_chat(&ChatInput { text, device })
                        .await
                }
                None => run_chat_session(&bindings, device).await?,
            }
        }
        Command::Zones {
            lat,
            lon,
            radius_km,
            ..
        } => {
            let here = location.current_location();
            let query = build_safe_zone_query(
                lat.unwrap_or(here.lat),
                lon.unwrap_or(here.lon),
                radius_km.unwrap_or(config.zones.radius_km),
            );
            let bindings = bindings.with_zone_renderer(zone_renderer(&config.zones));
            bindings.load_zones(&query).await
        }
        Command::Health => match api.health().await {
            Ok(health) => {
                println!(
                    "{} {} {} ({})",
                    health.status, health.name, health.version, health.time_utc
                );
                ActionOutcome::Completed
            }
            Err(err) => {
                tracing::error!(error = %err, "health check failed");
                ActionOutcome::Failed
            }
        },
    };

    Ok(match outcome {
        ActionOutcome::Failed => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    })
}

/// Map mode when a page path is configured, card list on stdout otherwise.
fn zone_renderer(settings: &ZoneSettings) -> Box<dyn ZoneRenderer> {
    select_renderer(
        probe_map_capability(settings.map_html.clone()),
        Box::new(TerminalCards::new(io::stdout())),
        settings.zoom,
    )
}

fn probe_map_capability(map_html: Option<PathBuf>) -> MapCapability {
    match map_html {
        Some(path) => MapCapability::Present(Box::new(LeafletPage::new(path))),
        None => MapCapability::Absent,
    }
}

/// One prediction per stdin line. Blank lines are skipped by the binding.
async fn run_chat_session(
    bindings: &Bindings,
    device: Option<String>,
) -> anyhow::Result<ActionOutcome> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last = ActionOutcome::Skipped;
    while let Some(line) = lines.next_line().await? {
        let outcome = bindings
            .send_chat(&ChatInput {
                text: line,
                device: device.clone(),
            })
            .await;
        if outcome != ActionOutcome::Skipped {
            last = outcome;
        }
    }
    Ok(last)
}
