use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod utils;

#[derive(Parser)]
#[command(name = "viewbuf-cmd")]
#[command(about = "Command-line utility for decoding captured lookup buffers")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v for debug, -vv for trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a lookup buffer and print its entries as JSON
    Decode {
        /// Read mask: flag names separated by '|' or ',' (e.g. NOTE_ID|SUMMARY),
        /// or a numeric value (decimal or 0x-prefixed hex)
        #[arg(short, long)]
        mask: String,

        /// Number of entries in the buffer
        #[arg(short, long)]
        count: usize,

        /// Defer text conversion until values are read
        #[arg(long)]
        lazy_text: bool,

        /// Standard offset from UTC in minutes applied to date/time values
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        utc_offset_minutes: i32,

        /// Daylight-saving time is in effect
        #[arg(long)]
        dst: bool,

        /// Decode text as ISO-8859-1 instead of UTF-8
        #[arg(long)]
        latin1: bool,

        /// Programmatic name of the column of a single-column lookup
        #[arg(long)]
        lookup_name: Option<String>,

        /// Output file for the JSON (defaults to stdout if not specified)
        #[arg(short, long)]
        output: Option<String>,

        /// Captured buffer file
        file: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    utils::init_logging(cli.verbose);

    match cli.command {
        Commands::Decode {
            mask,
            count,
            lazy_text,
            utc_offset_minutes,
            dst,
            latin1,
            lookup_name,
            output,
            file,
        } => commands::decode::run(commands::decode::DecodeArgs {
            mask,
            count,
            lazy_text,
            utc_offset_minutes,
            dst,
            latin1,
            lookup_name,
            output,
            file,
        }),
    }
}
