//! friendly-numbers CLI
//!
//! Practice arithmetic with multiple-choice questions in the terminal.

use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use friendly_numbers::error::QuizError;
use friendly_numbers::report::{build_drill, format_drill};
use friendly_numbers::tui::run::run;
use friendly_numbers::types::{
    DrillConfig, OperandSet, Operation, OutputFormat, PlayConfig, DEFAULT_AUTO_ADVANCE_MS,
};

#[derive(Parser)]
#[command(name = "friendly-numbers")]
#[command(about = "Multiple-choice arithmetic drills in the terminal")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Practice interactively (default)
    Play(PlayArgs),

    /// Print a batch of generated questions (no interaction)
    Drill {
        /// Operation: multiply (x, *), divide (/), add (+) or subtract (-)
        #[arg(long, value_parser = parse_operation)]
        operation: Operation,

        /// Comma-separated operands 0-9 to practice (multiply/divide only)
        #[arg(long, value_delimiter = ',', value_parser = clap::value_parser!(u8).range(0..=9))]
        numbers: Vec<u8>,

        /// Number of questions
        #[arg(long, default_value_t = 10)]
        count: usize,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Output format
        #[arg(long, value_enum, default_value = "human")]
        format: OutputFormatArg,

        /// Mark the correct choice in human output
        #[arg(long)]
        answers: bool,
    },
}

#[derive(Args)]
struct PlayArgs {
    /// Skip the start screen: multiply (x, *), divide (/), add (+) or subtract (-)
    #[arg(long, value_parser = parse_operation)]
    operation: Option<Operation>,

    /// Comma-separated operands 0-9; with multiply/divide, starts practice at once
    #[arg(long, value_delimiter = ',', value_parser = clap::value_parser!(u8).range(0..=9))]
    numbers: Vec<u8>,

    /// Delay before a correct answer moves on (0 = immediately)
    #[arg(long, default_value_t = DEFAULT_AUTO_ADVANCE_MS, conflicts_with = "manual")]
    auto_advance_ms: u64,

    /// Never advance automatically; press Enter for the next question
    #[arg(long)]
    manual: bool,

    /// Seed for a reproducible session
    #[arg(long)]
    seed: Option<u64>,
}

impl Default for PlayArgs {
    fn default() -> Self {
        Self {
            operation: None,
            numbers: Vec::new(),
            auto_advance_ms: DEFAULT_AUTO_ADVANCE_MS,
            manual: false,
            seed: None,
        }
    }
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormatArg {
    Human,
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

fn parse_operation(s: &str) -> Result<Operation, String> {
    s.parse().map_err(|e: QuizError| e.to_string())
}

fn main() -> ExitCode {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command.unwrap_or(Commands::Play(PlayArgs::default())) {
        Commands::Play(args) => cmd_play(args),
        Commands::Drill {
            operation,
            numbers,
            count,
            seed,
            format,
            answers,
        } => cmd_drill(operation, numbers, count, seed, format.into(), answers),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

// ============================================================================
// COMMAND HANDLERS
// ============================================================================

fn cmd_play(args: PlayArgs) -> Result<(), String> {
    let operands = OperandSet::from_operands(args.numbers).map_err(|e| e.to_string())?;

    if !operands.is_empty() && !args.operation.is_some_and(Operation::uses_operands) {
        return Err("--numbers needs --operation multiply or divide".to_string());
    }

    let config = PlayConfig {
        auto_advance: if args.manual {
            None
        } else {
            Some(Duration::from_millis(args.auto_advance_ms))
        },
        seed: args.seed,
        operation: args.operation,
        operands,
    };

    run(config).map_err(|e| e.to_string())
}

fn cmd_drill(
    operation: Operation,
    numbers: Vec<u8>,
    count: usize,
    seed: Option<u64>,
    format: OutputFormat,
    show_answers: bool,
) -> Result<(), String> {
    let config = DrillConfig {
        operation,
        operands: OperandSet::from_operands(numbers).map_err(|e| e.to_string())?,
        count,
        seed,
        show_answers,
    };

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let report = build_drill(&config, &mut rng).map_err(|e| e.to_string())?;
    info!("generated {} {} questions", report.questions.len(), operation.name());

    print!("{}", format_drill(&report, format, config.show_answers));

    Ok(())
}
