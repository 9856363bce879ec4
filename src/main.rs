use clap::{Parser as ClapParser, Subcommand};
use dotquery::cli::{self, CheckOptions, CheckResult, CliError};
use std::io::{self, Read};
use std::path::PathBuf;

#[derive(ClapParser)]
#[command(name = "dotq")]
#[command(about = "dotq - resolve query expressions against JSON data")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a query against JSON input
    Eval {
        /// The query expression
        query: String,

        /// JSON input (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// JSON file with default entries
        #[arg(short, long)]
        defaults: Option<PathBuf>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Validate the syntax of a query without resolving it
    Check {
        /// The query expression
        query: String,
    },

    /// List documentation categories
    Docs,

    /// Show documentation for a specific category
    Doc {
        /// Category name (use 'dotq docs' to list categories)
        category: String,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Eval {
            query,
            input,
            defaults,
            pretty,
        } => run_eval(query, input, defaults, pretty),
        Commands::Check { query } => run_check(query),
        Commands::Docs => {
            print!("{}", cli::get_docs_overview());
            Ok(())
        }
        Commands::Doc { category } => cli::get_doc_category(&category).map(|content| {
            print!("{}", content);
        }),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_eval(
    query: String,
    input: Option<String>,
    defaults: Option<PathBuf>,
    pretty: bool,
) -> Result<(), CliError> {
    let input = match input {
        Some(s) => Some(s),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Some(buffer)
        }
        None => None,
    };
    let defaults = defaults.map(std::fs::read_to_string).transpose()?;

    let options = CheckOptions {
        query,
        input,
        defaults,
        syntax_only: false,
    };

    if let CheckResult::Success(output) = cli::execute_check(&options)? {
        let json = if pretty {
            serde_json::to_string_pretty(&output)
        } else {
            serde_json::to_string(&output)
        }?;
        println!("{}", json);
    }
    Ok(())
}

fn run_check(query: String) -> Result<(), CliError> {
    let options = CheckOptions {
        query,
        syntax_only: true,
        ..CheckOptions::default()
    };
    cli::execute_check(&options)?;
    println!("Syntax is valid");
    Ok(())
}
