//! CLI frontend for Yardwatch, a 2D simulator of material flow and camera
//! detections.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "yw",
    about = "Yardwatch: simulate processes, movers, and the cameras watching them",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a layout and its definitions without running anything
    Check {
        /// Layout file (.yaml, .yml, .json, .drawio or .xml)
        #[arg(short, long)]
        layout: PathBuf,

        /// Definitions file (.yaml)
        #[arg(short, long)]
        defs: PathBuf,
    },

    /// Write a definitions skeleton for every type used in a layout
    Template {
        /// Layout file (.yaml, .yml, .json, .drawio or .xml)
        #[arg(short, long)]
        layout: PathBuf,

        /// Output file (default: `<layout>.defs.yaml`)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite the output file if it exists
        #[arg(short, long)]
        force: bool,
    },

    /// Run the simulation, ending at the current time
    Run {
        /// Layout file (.yaml, .yml, .json, .drawio or .xml)
        #[arg(short, long)]
        layout: PathBuf,

        /// Definitions file (.yaml)
        #[arg(short, long)]
        defs: PathBuf,

        /// Simulated minutes (one tick per second)
        #[arg(short = 't', long, default_value = "60")]
        minutes: u64,

        /// RNG seed for deterministic simulation
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Write camera detections as an ELK dump
        #[arg(short, long)]
        analytics: bool,

        /// ELK dump path, used with --analytics
        #[arg(short, long, default_value = "mdx_elk.json")]
        output: PathBuf,

        /// Events kept in memory for --verbose (0 keeps all of them)
        #[arg(long, default_value_t = yw_simulation::DEFAULT_EVENT_LIMIT)]
        keep_events: usize,

        /// Print the retained event log
        #[arg(short, long)]
        verbose: bool,
    },

    /// Swap object classes in existing ELK dumps for weighted random ones
    Replace {
        /// ELK dump files to rewrite
        #[arg(short, long = "files", num_args = 1.., required = true)]
        files: Vec<PathBuf>,

        /// Classes to put in
        #[arg(short, long, num_args = 1.., required = true)]
        objects: Vec<String>,

        /// Relative weight of each class, in the order given
        #[arg(short, long, num_args = 1.., required = true)]
        probabilities: Vec<f64>,

        /// Classes to take out
        #[arg(
            short,
            long,
            visible_alias = "eo",
            num_args = 1..,
            default_value = yw_report::replace::DEFAULT_EXISTING
        )]
        existing_objects: Vec<String>,

        /// Output files are named `<prefix>_<file>`
        #[arg(long, visible_alias = "op", default_value = yw_report::replace::DEFAULT_PREFIX)]
        output_prefix: String,

        /// RNG seed (default: from the OS)
        #[arg(short, long)]
        seed: Option<u64>,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check { layout, defs } => commands::check::run(&layout, &defs),
        Commands::Template {
            layout,
            output,
            force,
        } => commands::template::run(&layout, output.as_deref(), force),
        Commands::Run {
            layout,
            defs,
            minutes,
            seed,
            analytics,
            output,
            keep_events,
            verbose,
        } => commands::run::run(&commands::run::RunArgs {
            layout: &layout,
            defs: &defs,
            minutes,
            seed,
            analytics: analytics.then_some(output.as_path()),
            keep_events,
            verbose,
        }),
        Commands::Replace {
            files,
            objects,
            probabilities,
            existing_objects,
            output_prefix,
            seed,
        } => commands::replace::run(&commands::replace::ReplaceArgs {
            files: &files,
            objects: &objects,
            probabilities: &probabilities,
            existing: &existing_objects,
            prefix: &output_prefix,
            seed,
        }),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
