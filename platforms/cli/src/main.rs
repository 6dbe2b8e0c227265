mod printer;

use clap::Parser;
use printer::{render_illegal_input, render_result, render_start, VerbosePrinter};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use turing::{analyze, trace, validate_input, DefinitionLoader, Step, TuringMachine};

/// Runs a Turing machine definition against an input string.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
#[clap(after_help = "EXAMPLES:
  turing programs/binary-successor.tm 011
  turing -v programs/palindrome.tm 1001")]
struct Cli {
    /// Path to the Turing machine definition file
    tm: PathBuf,

    /// The input placed on the first tape
    #[clap(required_unless_present = "dump")]
    input: Option<String>,

    /// Print every step of the execution
    #[clap(short, long)]
    verbose: bool,

    /// Give up after this many steps
    #[clap(long)]
    max_steps: Option<usize>,

    /// Print the parsed definition as JSON and exit
    #[clap(long)]
    dump: bool,

    /// Log filter for diagnostics on stderr (overrides RUST_LOG)
    #[clap(long)]
    log_level: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            if let Some(message) = message {
                eprintln!("{message}");
            }
            ExitCode::FAILURE
        }
    }
}

/// Installs a stderr subscriber. `--log-level` wins over `RUST_LOG`, which wins over `warn`.
fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads, validates and runs the machine.
///
/// On failure returns the message to print on stderr, if any is left to print.
fn run(cli: &Cli) -> Result<(), Option<String>> {
    let definition = DefinitionLoader::load(&cli.tm).map_err(|e| Some(e.to_string()))?;

    for diagnostic in analyze(&definition) {
        warn!("{diagnostic}");
    }

    if cli.dump {
        let json = serde_json::to_string_pretty(&definition)
            .map_err(|e| Some(format!("Failed to serialize definition: {e}")))?;
        println!("{json}");
        return Ok(());
    }

    let input = cli.input.as_deref().unwrap_or_default();
    if let Err(e) = validate_input(&definition, input) {
        if cli.verbose {
            print!("{}", render_illegal_input(input, &e));
            return Err(None);
        }
        return Err(Some("illegal input".to_string()));
    }

    let mut machine = TuringMachine::new(&definition, input);
    let outcome = if cli.verbose {
        print!("{}", render_start(input));
        trace(&mut machine, &mut VerbosePrinter, cli.max_steps)
    } else {
        match cli.max_steps {
            Some(max_steps) => machine.run_for(max_steps),
            None => machine.run(),
        }
    };

    if outcome == Step::Continue {
        return Err(Some(format!(
            "step limit exceeded: machine still running after {} steps",
            machine.step_count()
        )));
    }

    debug!(
        steps = machine.step_count(),
        accepted = machine.is_final(),
        "simulation finished"
    );

    if !cli.verbose {
        println!("{}", render_result(machine.configuration()));
    }

    Ok(())
}
