//! telnorm - device telemetry normalizer.
//!
//! Loads a device profile, reads a retrieved NETCONF reply or `snmpwalk -On`
//! dump from disk, and prints discovery or collection output on stdout.
//! Logs go to stderr.

use std::error::Error;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;

use telnorm_core::adapter::{DocumentSource, FileSource, load_document};
use telnorm_core::collector::Collector;
use telnorm_core::config::Profile;
use telnorm_core::output::{
    ChassisEmission, collection_json, collection_lines, collection_table, discovery_json,
    discovery_lines, discovery_table,
};
use telnorm_core::trace::TracingTrace;

/// Device telemetry normalizer.
#[derive(Parser, Debug)]
#[command(name = "telnorm", about = "Device telemetry normalizer", version)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print one discovery line per instance.
    Discover {
        #[command(flatten)]
        input: InputArgs,

        /// Only report instances of this interface type.
        #[arg(long, value_name = "TYPE")]
        interface: Option<String>,

        /// Output encoding.
        #[arg(long, value_enum, default_value_t = Format::Line)]
        format: Format,

        /// Add a properties column to table output.
        #[arg(long)]
        properties: bool,
    },
    /// Print the metrics of every instance and the chassis.
    Collect {
        #[command(flatten)]
        input: InputArgs,

        /// Output encoding.
        #[arg(long, value_enum, default_value_t = Format::Line)]
        format: Format,

        /// How metrics without an instance are encoded.
        #[arg(long, value_enum, default_value_t = ChassisMode::Instance)]
        chassis: ChassisMode,

        /// Pseudo-instance id used with `--chassis instance`.
        #[arg(long, default_value = telnorm_core::output::CHASSIS_INSTANCE_ID)]
        chassis_id: String,
    },
}

#[derive(ClapArgs, Debug)]
struct InputArgs {
    /// Device profile (YAML, or JSON with a `.json` extension).
    #[arg(short, long, value_name = "PATH")]
    profile: PathBuf,

    /// Retrieved document: NETCONF reply or `snmpwalk -On` output.
    #[arg(short, long, value_name = "PATH")]
    input: PathBuf,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Line,
    Json,
    /// Aligned columns for reading in a terminal.
    Table,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ChassisMode {
    Instance,
    Bare,
    Omit,
}

impl ChassisMode {
    fn emission(self, chassis_id: &str) -> ChassisEmission {
        match self {
            ChassisMode::Instance => ChassisEmission::Instance(chassis_id.to_string()),
            ChassisMode::Bare => ChassisEmission::Bare,
            ChassisMode::Omit => ChassisEmission::Omit,
        }
    }
}

/// Initializes the tracing subscriber on stderr.
/// Default level is WARN so stdout stays the wire format; -v for debug, -q for errors only.
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::WARN,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let mut filter = EnvFilter::from_default_env();
    for target in ["telnorm", "telnorm_core"] {
        if let Ok(directive) = format!("{target}={level}").parse() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Executes one subcommand, writing the wire format to `out`.
fn execute(command: &Command, out: &mut impl Write) -> Result<(), Box<dyn Error>> {
    let trace = TracingTrace;
    let collector = Collector::new(&trace);

    match command {
        Command::Discover {
            input,
            interface,
            format,
            properties,
        } => {
            let profile = Profile::load(&input.profile)?;
            let text = FileSource::new(&input.input).fetch()?;
            let doc = load_document(&text, profile.protocol())?;

            let grouped = collector.discover_raw(&doc, &profile)?;
            let instances: Vec<_> = grouped
                .into_iter()
                .filter(|(name, _)| interface.as_ref().is_none_or(|wanted| wanted == name))
                .flat_map(|(_, instances)| instances)
                .collect();
            info!(instances = instances.len(), "Discovery finished");
            let encoded = match format {
                Format::Line => discovery_lines(&instances),
                Format::Json => discovery_json(&instances),
                Format::Table => discovery_table(&instances, *properties),
            };
            out.write_all(encoded.as_bytes())?;
        }
        Command::Collect {
            input,
            format,
            chassis,
            chassis_id,
        } => {
            let profile = Profile::load(&input.profile)?;
            let text = FileSource::new(&input.input).fetch()?;
            let doc = load_document(&text, profile.protocol())?;

            let run = collector.run_raw(&doc, &profile)?;
            info!(
                elapsed_us = run.timing.total.as_micros() as u64,
                "Collected {}", run.stats
            );

            let emission = chassis.emission(chassis_id);
            let encoded = match format {
                Format::Line => collection_lines(&run.metrics, &emission),
                Format::Json => collection_json(&run.metrics, &emission),
                Format::Table => collection_table(&run.metrics, &emission),
            };
            out.write_all(encoded.as_bytes())?;
        }
    }
    out.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    let stdout = std::io::stdout();
    match execute(&args.command, &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::from(1)
        }
    }
}
