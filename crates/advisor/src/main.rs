use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agrochar_core::advisory::AdvisoryEngine;
use agrochar_core::config::Settings;
use agrochar_core::domain::advisory::AdvisoryRequest;

#[derive(Debug, Parser)]
#[command(name = "agrochar_advisor")]
struct Args {
    /// Field size in acres.
    #[arg(long)]
    field_size_acres: f64,

    /// Crop grown on the field (must be present in the crop table).
    #[arg(long)]
    crop_type: String,

    /// District used for the demand signal.
    #[arg(long)]
    district: String,

    /// Optional state, echoed back in the advisory.
    #[arg(long)]
    state: Option<String>,

    /// Print compact JSON instead of pretty-printed.
    #[arg(long)]
    compact: bool,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let result = run(&args, &settings);
    if let Err(err) = &result {
        sentry_anyhow::capture_anyhow(err);
        tracing::error!(error = %err, "advisory run failed");
    }
    result
}

fn run(args: &Args, settings: &Settings) -> anyhow::Result<()> {
    let engine = AdvisoryEngine::from_settings(settings)?;

    let request = AdvisoryRequest::try_new(
        args.field_size_acres,
        &args.crop_type,
        &args.district,
        args.state.as_deref(),
    )?;

    let snapshot = engine.advise(&request, chrono::Utc::now())?;

    let json = if args.compact {
        serde_json::to_string(&snapshot)?
    } else {
        serde_json::to_string_pretty(&snapshot)?
    };
    println!("{json}");

    tracing::info!(
        advisory_id = %snapshot.advisory_id,
        district = %snapshot.district,
        residue_tons = snapshot.residue_estimate_tons,
        "advisory generated"
    );

    Ok(())
}

fn init_sentry(settings: &Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
