use clap::{Parser as ClapParser, Subcommand};
use pointer_filter::cli::{self, CheckOptions, CheckResult, CliError, FormatOptions};
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "pfilter")]
#[command(about = "pfilter - evaluate infix filter expressions over JSON records")]
#[command(version)]
struct Cli {
    /// Log progress to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true, env = "PFILTER_VERBOSE")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a filter and print the records it matches
    Check {
        /// The filter expression
        query: String,

        /// JSON input, one document or JSON Lines (reads from stdin if not provided)
        #[arg(short, long, env = "PFILTER_INPUT")]
        input: Option<String>,

        /// Only validate syntax, don't evaluate
        #[arg(long)]
        syntax_only: bool,
    },

    /// Print the canonical form of a filter
    Format {
        /// The filter expression
        query: String,

        /// Percent-encode the output for use in a URL
        #[arg(short, long)]
        url_encode: bool,
    },

    /// Show the language reference
    Docs,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Check {
            query,
            input,
            syntax_only,
        } => run_check(query, input, syntax_only),
        Commands::Format { query, url_encode } => {
            cli::execute_format(&FormatOptions { query, url_encode }).map(|text| println!("{}", text))
        }
        Commands::Docs => {
            print!("{}", cli::get_docs_overview());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_check(query: String, input: Option<String>, syntax_only: bool) -> Result<(), CliError> {
    let input = match input {
        Some(s) => Some(s),
        None if !syntax_only && !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Some(buffer)
        }
        None => None,
    };

    let options = CheckOptions {
        query,
        input,
        syntax_only,
    };

    match cli::execute_check(&options)? {
        CheckResult::SyntaxValid(canonical) => println!("Syntax is valid: {}", canonical),
        CheckResult::Matches(records) => {
            for record in records {
                println!("{}", serde_json::to_string(&record)?);
            }
        }
    }
    Ok(())
}
