use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use formcheck::{read_payload, render_forms, render_text, run_check, CheckOptions};

#[derive(Parser)]
#[command(name = "formcheck")]
#[command(about = "Validate form payloads against the built-in form schemas", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a JSON payload against a form
    Check {
        /// Form name (see `formcheck forms`)
        #[arg(short, long)]
        form: String,

        /// Payload file, or `-` for stdin
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// TOML file with localized messages
        #[arg(long, env = "FORMCHECK_LOCALE")]
        locale: Option<PathBuf>,

        /// Language used to pick localized messages
        #[arg(long, env = "FORMCHECK_LANG")]
        lang: Option<String>,

        /// Stop at the first failing field
        #[arg(long)]
        abort_early: bool,

        /// Report every issue, not only the first per field
        #[arg(long)]
        all_issues: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the available forms
    Forms,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.debug {
        tracing::Level::TRACE
    } else if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    // Logs go to stderr so reports on stdout stay machine-readable.
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(cli.debug)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check {
            form,
            input,
            locale,
            lang,
            abort_early,
            all_issues,
            json,
        } => {
            let options = CheckOptions {
                form,
                input,
                locale,
                lang,
                abort_early,
                all_issues,
            };
            let valid = handle_check(&options, json).await?;
            if !valid {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Forms => {
            print!("{}", render_forms());
            Ok(())
        }
    }
}

async fn handle_check(options: &CheckOptions, json: bool) -> Result<bool> {
    let payload = read_payload(options.input.as_deref())?;
    let report = run_check(options, payload).await?;

    if json {
        let rendered =
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{}", rendered);
    } else {
        print!("{}", render_text(&report));
    }
    Ok(report.valid)
}
