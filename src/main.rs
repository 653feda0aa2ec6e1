use clap::Parser;
use caseguard::cli::{Cli, Commands};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    init_tracing();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => caseguard::cli::commands::init::execute(&cli),
        Commands::Status => caseguard::cli::commands::status::execute(&cli),
        Commands::Add { ref file } => caseguard::cli::commands::add::execute(&cli, file),
        Commands::List { ref status } => {
            caseguard::cli::commands::list::execute(&cli, status.as_deref())
        }
        Commands::Show { ref case_number } => {
            caseguard::cli::commands::show::execute(&cli, case_number)
        }
        Commands::Delete {
            ref case_number,
            force,
        } => caseguard::cli::commands::delete::execute(&cli, case_number, force),
        Commands::SetStatus {
            ref case_number,
            ref status,
        } => caseguard::cli::commands::set_status::execute(&cli, case_number, status),
        Commands::AutoStatus { ref case_number } => {
            caseguard::cli::commands::set_status::execute_auto(&cli, case_number)
        }
        Commands::Export { ref output } => {
            caseguard::cli::commands::export::execute(&cli, output.as_deref())
        }
        #[cfg(feature = "audit-log")]
        Commands::Audit { last, ref since } => {
            caseguard::cli::commands::audit_cmd::execute(&cli, last, since.as_deref())
        }
    };

    if let Err(e) = result {
        tracing::debug!(error = %e, "command failed");
        caseguard::cli::output::error(&e.user_message());
        std::process::exit(1);
    }
}

/// Log to stderr, filtered by `CASEGUARD_LOG` (default: warnings only).
fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_env("CASEGUARD_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
