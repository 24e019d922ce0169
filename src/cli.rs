use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::types::MessageKind;

/// Booking Flow - branching service-catalog booking engine
#[derive(Parser)]
#[command(name = "booking-flow")]
#[command(about = "Validate booking catalogs, replay booking sessions and compose customer messages")]
#[command(version)]
pub struct Cli {
    /// Runtime configuration file (currency, time slots, blocked dates, log level)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where the catalog comes from
#[derive(Args, Debug, Clone, PartialEq, Eq)]
#[group(required = true, multiple = false)]
pub struct CatalogSource {
    /// Catalog JSON file
    #[arg(short, long)]
    pub catalog: Option<PathBuf>,

    /// Use the built-in salon catalog
    #[arg(long)]
    pub preset: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a catalog file and report data-integrity warnings
    Validate {
        /// Path to the catalog JSON file
        catalog: PathBuf,
    },
    /// Write the built-in salon catalog as JSON
    Preset {
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replay a scripted list of events and print the resulting booking
    Replay {
        #[command(flatten)]
        source: CatalogSource,

        /// JSON array of flow events
        #[arg(short, long)]
        events: PathBuf,

        /// Compose and dry-run send a message of this kind on confirmation
        #[arg(short, long)]
        message: Option<MessageKind>,

        /// Date treated as today when validating appointment dates (YYYY-MM-DD)
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Render a customer message from a confirmation payload
    Compose {
        #[command(flatten)]
        source: CatalogSource,

        /// Message kind (confirmation, reminder, thank-you)
        #[arg(short, long, default_value = "confirmation")]
        kind: MessageKind,

        /// Confirmation payload JSON file
        #[arg(short, long)]
        payload: PathBuf,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }
}
