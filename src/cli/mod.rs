//! Command-line parsing for the exchange-rate dashboard.
//!
//! Argument parsing and command dispatch stay separate from the analytics code;
//! the only bridge is [`SelectionArgs::to_query`].

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::Settings;
use crate::domain::SelectionQuery;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "fxdash", version, about = "Exchange rate and inflation analytics dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the interactive dashboard over HTTP.
    Serve(ServeArgs),
    /// Print statistics, insights and the forecast for one selection.
    Report(ReportArgs),
    /// Write every chart specification for one selection as JSON.
    Export(ExportArgs),
}

/// Input file overrides shared by every command.
#[derive(Debug, Args, Clone, Default)]
pub struct DataArgs {
    /// Exchange-rate CSV (overrides FX_RATES_CSV).
    #[arg(long, value_name = "CSV")]
    pub rates: Option<PathBuf>,

    /// Inflation CSV (overrides FX_INFLATION_CSV).
    #[arg(long, value_name = "CSV")]
    pub inflation: Option<PathBuf>,
}

impl DataArgs {
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(path) = &self.rates {
            settings.rates_path = path.clone();
        }
        if let Some(path) = &self.inflation {
            settings.inflation_path = path.clone();
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Port to listen on (overrides PORT).
    #[arg(short = 'p', long)]
    pub port: Option<u16>,
}

/// The Selection Snapshot as flags.
#[derive(Debug, Args, Clone, Default)]
pub struct SelectionArgs {
    /// Currency column to include; repeat to select several (order is kept).
    #[arg(short = 'c', long = "currency", value_name = "CODE")]
    pub currencies: Vec<String>,

    /// First row index of the date range.
    #[arg(long)]
    pub start: Option<usize>,

    /// Last row index of the date range (inclusive).
    #[arg(long)]
    pub end: Option<usize>,

    /// Inflation series name.
    #[arg(long)]
    pub series: Option<String>,

    /// Forecast target; pass an empty string for none.
    #[arg(long)]
    pub forecast: Option<String>,
}

impl SelectionArgs {
    pub fn to_query(&self) -> SelectionQuery {
        SelectionQuery {
            currencies: self.currencies.clone(),
            start: self.start,
            end: self.end,
            series: self.series.clone(),
            forecast: self.forecast.clone(),
            previous: None,
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub selection: SelectionArgs,
}

#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Output JSON file.
    #[arg(short = 'o', long, value_name = "JSON")]
    pub out: PathBuf,
}
