use clap::{Parser, Subcommand, ValueEnum};

/// Look up the next bin collection days for a Guildford address.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Log output format
    #[arg(long, value_enum, default_value_t = default_tracing_format(), global = true)]
    pub tracing: TracingFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the next collection date for each bin type
    Lookup {
        /// Postcode, e.g. "GU1 3LN"
        postcode: String,
        /// House number or name as shown on the council site, e.g. "26"
        house: String,
        /// Skip the on-disk address cache
        #[arg(long)]
        no_cache: bool,
        /// Print the schedule as JSON
        #[arg(long)]
        json: bool,
    },
    /// Serve lookups over HTTP
    Serve {
        /// Listen port (overrides configuration)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TracingFormat {
    /// Human-readable output for terminals
    Pretty,
    /// Structured output for log aggregation
    Json,
}

/// Pretty output in debug builds, JSON in release builds.
fn default_tracing_format() -> TracingFormat {
    if cfg!(debug_assertions) {
        TracingFormat::Pretty
    } else {
        TracingFormat::Json
    }
}
