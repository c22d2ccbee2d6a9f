//! Infopages CLI - manage and preview configurable info pages.

use clap::Parser;
use infopages::cli::{Cli, Commands};
use infopages::commands::{self, EditArgs, Output};
use infopages::config::resolve_data_dir;
use infopages::service::InfoService;
use std::process;
use tracing_subscriber::EnvFilter;

/// Environment variable selecting the log filter.
const LOG_ENV: &str = "INFOPAGES_LOG";

fn main() {
    let cli = Cli::parse();
    let human = cli.human_readable;
    init_logging();

    let data_dir = resolve_data_dir(cli.data_dir);
    tracing::debug!(
        data_dir = %data_dir.value.display(),
        source = %data_dir.source,
        "Resolved data directory"
    );

    let mut service = InfoService::open(&data_dir.value);
    let result = run_command(cli.command, &mut service, human);
    service.shutdown();

    if let Err(e) = result {
        if human {
            eprintln!("Error: {}", e);
        } else {
            eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
        }
        process::exit(1);
    }
}

/// Log to stderr, filtered by `INFOPAGES_LOG` (default `warn`).
fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run_command(
    command: Commands,
    service: &mut InfoService,
    human: bool,
) -> Result<(), infopages::Error> {
    match command {
        Commands::Show { code, page } => {
            let result = commands::show(service, code.as_deref(), page)?;
            output(&result, human);
        }
        Commands::List => {
            let result = commands::list(service)?;
            output(&result, human);
        }
        Commands::Set { line, text } => {
            let result = commands::set_line(service, line, &text)?;
            output(&result, human);
        }
        Commands::Add { text } => {
            let result = commands::add_line(service, &text)?;
            output(&result, human);
        }
        Commands::Remove { line } => {
            let result = commands::remove_line(service, line)?;
            output(&result, human);
        }
        Commands::Edit {
            page,
            title,
            title_color,
            lines,
            line_colors,
            header,
            footer,
            button,
            command,
            next,
            no_save,
        } => {
            let args = EditArgs {
                title,
                title_color,
                lines,
                line_colors,
                header,
                footer,
                button,
                command,
                next,
                save: !no_save,
            };
            let result = commands::edit(service, page, args)?;
            output(&result, human);
        }
        Commands::Pages => {
            let result = commands::pages(service)?;
            output(&result, human);
        }
        Commands::Save => {
            let result = commands::save(service)?;
            output(&result, human);
        }
        Commands::Reload => {
            let result = commands::reload(service)?;
            output(&result, human);
        }
        Commands::Shortcuts => {
            let result = commands::shortcuts(service)?;
            output(&result, human);
        }
        Commands::Ready { user } => {
            let result = commands::ready(service, &user)?;
            output(&result, human);
        }
        Commands::Activate { page, user } => {
            let result = commands::activate(service, page, &user)?;
            output(&result, human);
        }
    }

    Ok(())
}

/// Print output in JSON or human-readable format.
fn output<T: Output>(result: &T, human: bool) {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}
