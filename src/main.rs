//! Booking Flow - Main entry point
//!
//! Thin command-line shell over the library: load a catalog, drive a session
//! from a scripted event list, and render customer messages.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use booking_flow::cli::{CatalogSource, Cli, Commands};
use booking_flow::delivery::{LogSender, notify};
use booking_flow::{
    BookingConfig, BookingSummary, Catalog, ConfirmationPayload, FlowEngine, FlowEvent,
    FlowSession, MessageComposer, MessageKind, OptionIndex, presets,
};

/// Initialize tracing on stderr; `RUST_LOG` overrides the configured level
fn init_logging(config: &BookingConfig) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| config.log_level.clone()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Main application entry point
fn main() {
    let cli = Cli::parse_args();

    let config = match BookingConfig::load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("✗ Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);
    debug!(currency = config.currency.as_str(), "Configuration loaded");

    if let Err(e) = run(cli.command, config) {
        error!("{:#}", e);
        eprintln!("✗ {:#}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands, config: BookingConfig) -> Result<()> {
    match command {
        Commands::Validate { catalog } => run_validate(&catalog),
        Commands::Preset { output } => run_preset(output.as_deref()),
        Commands::Replay {
            source,
            events,
            message,
            today,
        } => {
            let catalog = load_catalog(&source)?;
            let mut engine = FlowEngine::new(catalog, config)?;
            if let Some(today) = today {
                engine = engine.with_today(today);
            }
            run_replay(&engine, &events, message)
        }
        Commands::Compose {
            source,
            kind,
            payload,
        } => {
            let catalog = load_catalog(&source)?;
            run_compose(&catalog, &config, kind, &payload)
        }
    }
}

fn load_catalog(source: &CatalogSource) -> Result<Catalog> {
    match &source.catalog {
        Some(path) => {
            info!("Loading catalog from: {:?}", path);
            Catalog::load_from_file(path)
        }
        None => {
            debug!("Using built-in salon catalog");
            Ok(presets::salon())
        }
    }
}

fn run_validate(path: &Path) -> Result<()> {
    info!("Validating catalog file: {:?}", path);
    let catalog = Catalog::load_from_file(path)?;

    let warnings = catalog.validate()?;
    let index = OptionIndex::build(&catalog)?;

    for warning in &warnings {
        warn!(%warning, "Catalog data-integrity issue");
        println!("! {}", warning);
    }
    println!(
        "✓ Catalog is valid: {} steps, {} options, {} warning(s)",
        catalog.steps.len(),
        index.len(),
        warnings.len()
    );
    Ok(())
}

fn run_preset(output: Option<&Path>) -> Result<()> {
    let catalog = presets::salon();
    match output {
        Some(path) => {
            catalog.save_to_file(path)?;
            println!("✓ Salon catalog written to {}", path.display());
        }
        None => {
            let json = serde_json::to_string_pretty(&catalog)
                .context("Failed to serialize catalog to JSON")?;
            println!("{}", json);
        }
    }
    Ok(())
}

/// What a replay prints
#[derive(Serialize)]
struct ReplayReport<'a> {
    current_group: &'a [String],
    can_continue: bool,
    summary: BookingSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    confirmation: Option<ConfirmationPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

fn run_replay(engine: &FlowEngine, events_path: &Path, message: Option<MessageKind>) -> Result<()> {
    let content = std::fs::read_to_string(events_path)
        .with_context(|| format!("Failed to read events from {:?}", events_path))?;
    let events: Vec<FlowEvent> =
        serde_json::from_str(&content).context("Failed to parse events JSON")?;

    let mut session = FlowSession::new(engine);
    let mut confirmation = None;
    for (i, event) in events.into_iter().enumerate() {
        debug!(step = i, ?event, "Dispatching event");
        if let Some(payload) = session.dispatch(event) {
            confirmation = Some(payload);
        }
    }

    let rendered = match (&confirmation, message) {
        (Some(payload), Some(kind)) => {
            let composer = MessageComposer::new()?;
            let (sent, receipt) = notify(
                &composer,
                &mut LogSender::new(),
                kind,
                payload,
                engine.catalog(),
                &engine.config().currency,
            )?;
            info!(id = %receipt.id, "Message accepted");
            Some(sent.body)
        }
        (None, Some(kind)) => {
            warn!(%kind, "Session did not confirm; no message composed");
            None
        }
        _ => None,
    };

    let report = ReplayReport {
        current_group: session.current_group(),
        can_continue: session.can_continue(),
        summary: session.summary(),
        confirmation,
        message: rendered,
    };
    let json = serde_json::to_string_pretty(&report).context("Failed to serialize replay report")?;
    println!("{}", json);
    Ok(())
}

fn run_compose(
    catalog: &Catalog,
    config: &BookingConfig,
    kind: MessageKind,
    payload_path: &Path,
) -> Result<()> {
    let content = std::fs::read_to_string(payload_path)
        .with_context(|| format!("Failed to read payload from {:?}", payload_path))?;
    let payload: ConfirmationPayload =
        serde_json::from_str(&content).context("Failed to parse confirmation payload JSON")?;

    let composer = MessageComposer::new()?;
    let body = composer.compose_payload(kind, &payload, catalog, &config.currency)?;
    println!("{}", body);
    Ok(())
}
