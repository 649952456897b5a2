use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use clap::{Parser as ClapParser, Subcommand, ValueEnum};
use log::LevelFilter;
use specl::cli::{self, CheckOptions, CheckResult, CliError, InputFormat};

#[derive(ClapParser)]
#[command(name = "specl")]
#[command(about = "Specl - assertions over XML, JSON and key/value documents")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate Specl assertions against an input document
    Check {
        /// The Specl source (use --file to read it from a file)
        source: Option<String>,

        /// File holding the Specl source
        #[arg(short, long, conflicts_with = "source")]
        file: Option<PathBuf>,

        /// Input document (reads from stdin if neither this nor --input-file is given)
        #[arg(short, long)]
        input: Option<String>,

        /// File holding the input document
        #[arg(long, conflicts_with = "input")]
        input_file: Option<PathBuf>,

        /// Shape of the input document
        #[arg(long, value_enum, default_value_t = CliInputFormat::Json)]
        format: CliInputFormat,

        /// Only validate syntax, don't evaluate
        #[arg(long)]
        syntax_only: bool,

        /// Print the declared variables after evaluation
        #[arg(long)]
        show_variables: bool,

        /// Log pipeline progress to stderr
        #[arg(long, value_enum, default_value_t = CliLogLevel::Off)]
        log_level: CliLogLevel,
    },

    /// List the assertion forms
    Forms,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliInputFormat {
    Json,
    Xml,
    Map,
}

impl From<CliInputFormat> for InputFormat {
    fn from(value: CliInputFormat) -> Self {
        match value {
            CliInputFormat::Json => Self::Json,
            CliInputFormat::Xml => Self::Xml,
            CliInputFormat::Map => Self::Map,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
}

impl From<CliLogLevel> for LevelFilter {
    fn from(value: CliLogLevel) -> Self {
        match value {
            CliLogLevel::Off => Self::Off,
            CliLogLevel::Error => Self::Error,
            CliLogLevel::Warn => Self::Warn,
            CliLogLevel::Info => Self::Info,
            CliLogLevel::Debug => Self::Debug,
        }
    }
}

fn main() {
    process::exit(run());
}

fn run() -> i32 {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            source,
            file,
            input,
            input_file,
            format,
            syntax_only,
            show_variables,
            log_level,
        } => {
            if let Err(e) = cli::logger::init(log_level.into()) {
                eprintln!("cannot install logger: {}", e);
            }
            let result = read_input(input, input_file, syntax_only).and_then(|input| {
                let options = CheckOptions {
                    source,
                    source_file: file,
                    input,
                    format: format.into(),
                    syntax_only,
                };
                cli::execute_check(&options)
            });
            match result {
                Ok(result) => report(result, show_variables),
                Err(e) => {
                    eprintln!("{}", e);
                    if let CliError::Specl(error) = &e {
                        for diagnostic in error.diagnostics() {
                            eprintln!("{}", diagnostic);
                        }
                    }
                    e.exit_code()
                }
            }
        }
        Commands::Forms => {
            print!("{}", cli::get_forms_overview());
            cli::EXIT_PASS
        }
    }
}

fn read_input(input: Option<String>, input_file: Option<PathBuf>, syntax_only: bool) -> Result<Option<String>, CliError> {
    match (input, input_file) {
        (Some(text), _) => Ok(Some(text)),
        (None, Some(path)) => Ok(Some(fs::read_to_string(path)?)),
        (None, None) if !syntax_only && !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(Some(buffer))
        }
        (None, None) => Ok(None),
    }
}

fn report(result: CheckResult, show_variables: bool) -> i32 {
    match result {
        CheckResult::SyntaxValid {
            declarations,
            assertions,
        } => {
            println!(
                "Syntax is valid ({} declarations, {} assertions)",
                declarations, assertions
            );
            cli::EXIT_PASS
        }
        CheckResult::Evaluated { passed, variables } => {
            if show_variables {
                for (name, binding) in variables.iter() {
                    println!("{} = {}", name, binding.clone().into_value());
                }
            }
            if passed {
                println!("PASS");
                cli::EXIT_PASS
            } else {
                println!("FAIL");
                cli::EXIT_FAIL
            }
        }
    }
}
