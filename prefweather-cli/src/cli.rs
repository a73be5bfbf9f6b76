use std::{
    fmt,
    path::{Path, PathBuf},
};

use anyhow::Context;
use arboard::Clipboard;
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, Select, Text};
use prefweather_core::{
    Config, ConnectorConfig, FetchOutcome, ForecastDay, Prefecture, UnitSystem, WeatherRequest,
    WeatherService, WeatherSnapshot, connector_from_config,
};

use crate::render::{NO_DATA, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "prefweather", version, about = "Prefecture weather for Japan (MSN Weather)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the connector and default selections.
    Configure,

    /// Show weather for a prefecture.
    Show {
        /// Prefecture name, e.g. "大阪府" or "大阪". Defaults to the configured one.
        prefecture: Option<String>,

        /// Unit system: Metric or Imperial.
        #[arg(long)]
        units: Option<String>,

        /// Use tomorrow's forecast instead of today's.
        #[arg(long)]
        tomorrow: bool,

        /// Also print the raw connector payloads.
        #[arg(long)]
        raw: bool,

        /// Copy the raw connector payloads as JSON to the clipboard.
        #[arg(long)]
        copy: bool,

        /// Write the raw connector payloads as JSON to this file.
        #[arg(long, value_name = "FILE")]
        export: Option<PathBuf>,
    },

    /// Pick prefecture and units interactively, refreshing on demand.
    Browse,

    /// List all prefecture names.
    Prefectures,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { prefecture, units, tomorrow, raw, copy, export } => {
                let config = Config::load()?;

                let prefecture = match prefecture {
                    Some(name) => Prefecture::try_from(name.as_str())?,
                    None => config.default_prefecture()?,
                };
                let units = match units {
                    Some(name) => UnitSystem::try_from(name.as_str())?,
                    None => config.default_units()?,
                };
                let day = if tomorrow { ForecastDay::Tomorrow } else { ForecastDay::Today };

                let service = WeatherService::new(connector_from_config(&config)?);
                let request = WeatherRequest::new(prefecture, units).with_day(day);

                print!("{}", show(&service, &request, &ShowOptions { raw, copy, export }).await?);
                Ok(())
            }
            Command::Browse => browse().await,
            Command::Prefectures => {
                for prefecture in Prefecture::all() {
                    println!("{prefecture}");
                }
                Ok(())
            }
        }
    }
}

/// Run one fetch cycle; failures were already logged by the service.
async fn fetch_snapshot(service: &WeatherService, request: &WeatherRequest) -> Option<WeatherSnapshot> {
    match service.fetch(request).await {
        Ok(FetchOutcome::Fresh(snapshot)) => Some(*snapshot),
        Ok(FetchOutcome::Superseded(stale)) => {
            tracing::debug!(prefecture = %stale.prefecture, "dropping superseded result");
            None
        }
        Err(_) => None,
    }
}

/// Replace `snapshot` with a fresh one; on failure the old one stays.
async fn refresh(
    service: &WeatherService,
    request: &WeatherRequest,
    snapshot: &mut Option<WeatherSnapshot>,
) -> bool {
    match fetch_snapshot(service, request).await {
        Some(fresh) => {
            *snapshot = Some(fresh);
            true
        }
        None => false,
    }
}

/// What `show` does with the raw payloads besides rendering.
#[derive(Debug, Default)]
struct ShowOptions {
    raw: bool,
    copy: bool,
    export: Option<PathBuf>,
}

/// One fetch cycle rendered as text. A failed cycle is not an error.
async fn show(
    service: &WeatherService,
    request: &WeatherRequest,
    opts: &ShowOptions,
) -> anyhow::Result<String> {
    let Some(snapshot) = fetch_snapshot(service, request).await else {
        return Ok(format!("{NO_DATA}\n"));
    };

    let mut out = render(&snapshot);
    if opts.raw {
        out.push_str(&format!("\n{}\n", snapshot.raw_json_pretty()?));
    }
    if opts.copy {
        copy_raw(&snapshot)?;
        out.push_str("Raw payloads copied to clipboard\n");
    }
    if let Some(path) = &opts.export {
        export_raw(&snapshot, path)?;
        out.push_str(&format!("Raw payloads written to {}\n", path.display()));
    }
    Ok(out)
}

fn copy_raw(snapshot: &WeatherSnapshot) -> anyhow::Result<()> {
    let json = snapshot.raw_json_pretty()?;
    Clipboard::new()
        .and_then(|mut clipboard| clipboard.set_text(json))
        .context("Failed to copy raw payloads to the clipboard")
}

fn export_raw(snapshot: &WeatherSnapshot, path: &Path) -> anyhow::Result<()> {
    std::fs::write(path, snapshot.raw_json_pretty()?)
        .with_context(|| format!("Failed to write raw payloads to {}", path.display()))
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;
    let existing = config.connector.clone();

    let base_url = Text::new("Connector base URL:")
        .with_default(existing.as_ref().map(|c| c.base_url.as_str()).unwrap_or_default())
        .with_help_message("e.g. https://<region>.azure-apim.net/apim/msnweather")
        .prompt()?;
    let connection_id = Text::new("Connection id:")
        .with_default(existing.as_ref().map(|c| c.connection_id.as_str()).unwrap_or_default())
        .prompt()?;
    let api_token = Password::new("API token (leave empty for none):")
        .without_confirmation()
        .prompt()?;

    config.set_connector(ConnectorConfig {
        base_url: base_url.trim().to_string(),
        connection_id: connection_id.trim().to_string(),
        api_token: Some(api_token).filter(|t| !t.trim().is_empty()),
    });

    // Validate before saving.
    connector_from_config(&config)?;

    let prefecture = select_prefecture(config.default_prefecture().unwrap_or_default())?;
    config.set_default_prefecture(prefecture);

    let units = select_units(config.default_units().unwrap_or_default())?;
    config.set_default_units(units);

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}

fn select_prefecture(current: Prefecture) -> Result<Prefecture, InquireError> {
    let options: Vec<Prefecture> = Prefecture::all().collect();
    let cursor = options.iter().position(|p| *p == current).unwrap_or(0);

    Select::new("Prefecture:", options).with_starting_cursor(cursor).prompt()
}

fn select_units(current: UnitSystem) -> Result<UnitSystem, InquireError> {
    let options = UnitSystem::all().to_vec();
    let cursor = options.iter().position(|u| *u == current).unwrap_or(0);

    Select::new("Units:", options).with_starting_cursor(cursor).prompt()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BrowseAction {
    Refresh,
    ChangePrefecture,
    ChangeUnits,
    ToggleRaw,
    CopyRaw,
    Export,
    Quit,
}

impl BrowseAction {
    const ALL: [BrowseAction; 7] = [
        BrowseAction::Refresh,
        BrowseAction::ChangePrefecture,
        BrowseAction::ChangeUnits,
        BrowseAction::ToggleRaw,
        BrowseAction::CopyRaw,
        BrowseAction::Export,
        BrowseAction::Quit,
    ];
}

impl fmt::Display for BrowseAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BrowseAction::Refresh => "Refresh",
            BrowseAction::ChangePrefecture => "Change prefecture",
            BrowseAction::ChangeUnits => "Change units",
            BrowseAction::ToggleRaw => "Toggle raw JSON",
            BrowseAction::CopyRaw => "Copy raw JSON",
            BrowseAction::Export => "Export raw JSON",
            BrowseAction::Quit => "Quit",
        })
    }
}

async fn browse() -> anyhow::Result<()> {
    let config = Config::load()?;
    let service = WeatherService::new(connector_from_config(&config)?);

    let mut request = WeatherRequest::new(config.default_prefecture()?, config.default_units()?);
    let mut snapshot: Option<WeatherSnapshot> = None;
    let mut show_raw = false;
    let mut stale = true;

    loop {
        if stale {
            refresh(&service, &request, &mut snapshot).await;
            stale = false;
        }

        match &snapshot {
            Some(s) => {
                println!("\n{}", render(s));
                if show_raw {
                    println!("{}", s.raw_json_pretty()?);
                }
            }
            None => println!("\n{NO_DATA}"),
        }

        let action = match Select::new("Next:", BrowseAction::ALL.to_vec()).prompt() {
            Ok(action) => action,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e.into()),
        };

        match action {
            BrowseAction::Refresh => stale = true,
            BrowseAction::ChangePrefecture => {
                let prefecture = select_prefecture(request.prefecture)?;
                stale = prefecture != request.prefecture;
                request.prefecture = prefecture;
            }
            BrowseAction::ChangeUnits => {
                let units = select_units(request.units)?;
                stale = units != request.units;
                request.units = units;
            }
            BrowseAction::ToggleRaw => show_raw = !show_raw,
            BrowseAction::CopyRaw => match &snapshot {
                Some(s) => match copy_raw(s) {
                    Ok(()) => println!("Raw payloads copied to clipboard"),
                    Err(e) => eprintln!("{e:#}"),
                },
                None => println!("{NO_DATA}"),
            },
            BrowseAction::Export => match &snapshot {
                Some(s) => {
                    let path = Text::new("Export to file:").with_default("prefweather-raw.json").prompt()?;
                    export_raw(s, Path::new(&path))?;
                    println!("Raw payloads written to {path}");
                }
                None => println!("{NO_DATA}"),
            },
            BrowseAction::Quit => break,
        }
    }

    Ok(())
}
