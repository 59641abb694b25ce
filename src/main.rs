use clap::Parser;
use ht_triad::cli::{Cli, Commands};
use ht_triad::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
        eprintln!("Using default configuration");
        toml::from_str(include_str!("../config.toml.example")).expect("Invalid default config")
    });

    // Initialize telemetry
    let _guard = ht_triad::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Extract(args) => {
            tracing::info!("Starting extraction");
            args.execute(config).await?;
        }
        Commands::Inspect(args) => {
            args.execute(config).await?;
        }
        Commands::Config => {
            println!("Current configuration:");
            println!("  Input: {}", config.input.dir.display());
            println!(
                "  Window: +{} to +{} min, tolerance {}s",
                config.window.time_from_min, config.window.time_to_min, config.window.tolerance_secs
            );
            if config.relaxed.enabled {
                println!(
                    "  Relaxed: +{} to +{} min, tolerance {}s",
                    config.relaxed.time_from_min,
                    config.relaxed.time_to_min,
                    config.relaxed.tolerance_secs
                );
            } else {
                println!("  Relaxed: disabled");
            }
            println!("  Output: {}", config.report.output_dir.display());
            println!("  Debug artifacts: {}", config.report.debug_artifacts);
        }
    }

    Ok(())
}
