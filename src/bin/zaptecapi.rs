//! Zaptec API CLI binary.
//!
//! A command-line interface for inspecting Zaptec installations.

use chrono::Utc;
use clap::Parser;
use serde::Serialize;
use std::process::ExitCode;
use tabled::{Table, Tabled};
use tracing_subscriber::EnvFilter;
use zaptecapi::cli::{Cli, Command, RangeArgs};
use zaptecapi::{Charger, ChargingSession, Installation, PrettyPrint, ZaptecClient};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let client = match zaptecapi::config::from_env().and_then(ZaptecClient::new) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!(
                "Hint: Set ZAPTEC_USERNAME, ZAPTEC_PASSWORD and ZAPTEC_INSTALLATION_ID environment variables"
            );
            return ExitCode::FAILURE;
        }
    };

    let result = run(&client, cli).await;
    client.close();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, contract_change = e.is_contract_change(), "command failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(client: &ZaptecClient, cli: Cli) -> zaptecapi::Result<()> {
    match cli.command {
        Command::Sessions(range) => handle_sessions(client, &range, cli.json).await,
        Command::Report(range) => handle_report(client, &range, cli.json).await,
        Command::Chargers => {
            let chargers = client.chargers().await?;
            output_list(&chargers, cli.json, ChargerRow::from)
        }
        Command::Installations => {
            let installations = client.installations().await?;
            output_list(&installations, cli.json, InstallationRow::from)
        }
    }
}

async fn handle_sessions(
    client: &ZaptecClient,
    range: &RangeArgs,
    json: bool,
) -> zaptecapi::Result<()> {
    let range = range.resolve(Utc::now().date_naive())?;
    let sessions = client.charging_sessions(range.from(), range.to()).await?;

    output_list(&sessions, json, SessionRow::from)?;
    if !json {
        let energy: f64 = sessions.iter().map(|s| s.energy).sum();
        println!(
            "\n{} sessions, {:.2} kWh ({} to {})",
            sessions.len(),
            energy,
            range.from_local(),
            range.to_local()
        );
    }
    Ok(())
}

async fn handle_report(
    client: &ZaptecClient,
    range: &RangeArgs,
    json: bool,
) -> zaptecapi::Result<()> {
    let range = range.resolve(Utc::now().date_naive())?;
    let report = client.installation_report(range.from(), range.to()).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.pretty_print());
    }
    Ok(())
}

fn output_list<'a, T, R, F>(items: &'a [T], json: bool, to_row: F) -> zaptecapi::Result<()>
where
    T: Serialize,
    R: Tabled,
    F: Fn(&'a T) -> R,
{
    if json {
        println!("{}", serde_json::to_string_pretty(items)?);
    } else {
        let rows: Vec<R> = items.iter().map(to_row).collect();
        println!("{}", Table::new(rows));
    }
    Ok(())
}

// Table row types for non-JSON output

#[derive(Tabled)]
struct SessionRow {
    start: String,
    user: String,
    charger: String,
    #[tabled(rename = "kWh")]
    energy: String,
    duration: String,
}

impl From<&ChargingSession> for SessionRow {
    fn from(s: &ChargingSession) -> Self {
        let minutes = s.duration().num_minutes();
        Self {
            start: s.start_date_time.format("%Y-%m-%d %H:%M").to_string(),
            user: s.user_email.clone(),
            charger: s.device_name.clone(),
            energy: format!("{:.3}", s.energy),
            duration: format!("{}h{:02}m", minutes / 60, minutes % 60),
        }
    }
}

#[derive(Tabled)]
struct ChargerRow {
    name: String,
    device: String,
    online: String,
    installation: String,
}

impl From<&Charger> for ChargerRow {
    fn from(c: &Charger) -> Self {
        Self {
            name: c.name.clone(),
            device: c.device_id.clone(),
            online: if c.is_online { "yes" } else { "no" }.to_string(),
            installation: c.installation_name.clone(),
        }
    }
}

#[derive(Tabled)]
struct InstallationRow {
    id: String,
    name: String,
    city: String,
    chargers: String,
}

impl From<&Installation> for InstallationRow {
    fn from(i: &Installation) -> Self {
        Self {
            id: i.id.to_string(),
            name: i.name.clone(),
            city: i.city.clone(),
            chargers: i
                .active_charger_count
                .map(|n| n.to_string())
                .unwrap_or_default(),
        }
    }
}
