use std::process::ExitCode;

use clap::Parser;
use spjp::config::{Args, Command};
use spjp::{Application, Config, Output, Schedule, client, i18n, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Install rustls crypto provider before anything else that might build a TLS client
    client::install_crypto_provider();

    // Parse CLI args
    let args = Args::parse();

    // Load configuration
    let config = Config::load(&args)?;

    // If --validate flag is set, exit successfully after config and schedule validation
    if args.validate {
        let schedule = Schedule::load(config.schedule_file.as_deref())?;
        println!("Configuration is valid ({} schedule entries).", schedule.len());
        return Ok(ExitCode::SUCCESS);
    }

    telemetry::init_telemetry()?;

    tracing::debug!("{:?}", args);

    let command = args.command.unwrap_or(Command::Badges {
        sort: Default::default(),
    });
    let output = if args.json { Output::Json } else { Output::Text };

    let app = Application::new(config)?;
    let lang = app.language();
    match app.run(&command, output, chrono::Utc::now()).await {
        Ok(rendered) => {
            println!("{rendered}");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            e.log();
            let prefix = match command {
                Command::Emotes { .. } => i18n::t(lang, "error.loading.emotes"),
                _ => i18n::t(lang, "error.loading"),
            };
            eprintln!("{prefix}: {}", e.user_message());
            Ok(ExitCode::FAILURE)
        }
    }
}
