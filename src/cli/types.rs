//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "rsywx-gateway")]
#[command(about = "Query the RSYWX book collection API", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Skip cached responses and ask the upstream to refresh
    #[arg(short, long, global = true)]
    pub refresh: bool,

    /// Configuration file (defaults to .rsywx/config.yaml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Collection statistics
    Status,

    /// Details of one book
    Book {
        /// Catalogue number, e.g. 00666
        book_id: String,
    },

    /// Most recently acquired books
    Latest {
        /// Number of books
        #[arg(short = 'n', long, default_value = "5")]
        count: u32,
    },

    /// Random picks from the collection
    Random {
        /// Number of books
        #[arg(short = 'n', long, default_value = "4")]
        count: u32,
    },

    /// Books acquired on this day in earlier years
    Today {
        /// Month (1-12); requires --day
        #[arg(short, long, requires = "day", value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,

        /// Day of month (1-31); requires --month
        #[arg(short, long, requires = "month", value_parser = clap::value_parser!(u32).range(1..=31))]
        day: Option<u32>,
    },

    /// Word of the day
    Wotd,

    /// Quote of the day
    Qotd,

    /// Everything on the home page, fetched concurrently
    Home,
}
