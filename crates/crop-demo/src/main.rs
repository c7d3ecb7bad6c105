pub mod replay;

use crop_config::CropConfig;
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let Some(script_path) = std::env::args().nth(1).map(PathBuf::from) else {
        eprintln!("usage: crop-replay <script.json> [config.json]");
        return ExitCode::from(2);
    };

    let config = match std::env::args().nth(2).map(PathBuf::from) {
        Some(path) => match CropConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                tracing::error!("Failed to load config {}: {err}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => CropConfig::default(),
    };

    let outcome = replay::Script::load(&script_path).and_then(|script| replay::run(&script, &config));

    match outcome {
        Ok(outcome) => {
            for notification in &outcome.notifications {
                match serde_json::to_string(notification) {
                    Ok(line) => println!("{line}"),
                    Err(err) => tracing::warn!("Could not serialize {notification:?}: {err}"),
                }
            }

            tracing::info!(
                "Replay finished at {:?}: {} notifications, {} listener pairs still attached",
                outcome.final_rect,
                outcome.notifications.len(),
                outcome.listeners_active
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!("Replay of {} failed: {err}", script_path.display());
            ExitCode::FAILURE
        }
    }
}
