use fx_bias_lib::analysis::scorecard::Scorecard;
use fx_bias_lib::config::{Config, OutputFormat};
use fx_bias_lib::error::Result;
use fx_bias_lib::{refresh, refresh_until, report, setup};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // .env is optional; real environment variables win.
    let _ = dotenvy::dotenv();

    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    let (profile, accessor) = setup(&cfg)?;
    info!("Profile '{}' loaded: {} ({} indicators)", profile.slug, profile.name, profile.indicators.len());

    let Some(interval) = cfg.refresh_interval else {
        let card = refresh(profile, &accessor).await;
        return print(&card, cfg.output);
    };

    info!("Refreshing every {}s (Ctrl-C to stop)", interval.as_secs());
    let output = cfg.output;
    refresh_until(profile, &accessor, interval, tokio::signal::ctrl_c(), |card| print(card, output)).await?;

    info!("Stopping");
    Ok(())
}

fn print(card: &Scorecard, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => println!("{}", report::to_text(card)),
        OutputFormat::Json => println!("{}", report::to_json(card)?),
    }
    Ok(())
}
