use anyhow::{bail, Result};
use shield_scan_client::dashboard::{FileSnapshot, ReportFilter, SummaryPoller};
use shield_scan_client::presenter::{BannerView, DashboardView};
use shield_scan_client::{HttpBackend, ScanRequestor, Settings};
use std::env;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "usage: shield-scan <url URL | content TEXT | report ID | dashboard [TICKS]>";

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shield_scan_client=info,shield_scan=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let settings = Settings::from_env();
    let backend = Arc::new(HttpBackend::from_settings(&settings));

    let args: Vec<String> = env::args().skip(1).collect();
    let command = args.first().map(String::as_str).unwrap_or_default();
    let operand = args.get(1).cloned().unwrap_or_default();

    match command {
        "url" | "content" | "report" => {
            let requestor = ScanRequestor::new(backend);
            let state = match command {
                "url" => requestor.scan_url(&operand).await,
                "content" => requestor.scan_content(&operand).await,
                _ => requestor.report(&operand).await,
            };
            let view = BannerView::from_state(&state);
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        "dashboard" => {
            let ticks: usize = if operand.is_empty() { 1 } else { operand.parse()? };
            run_dashboard(backend, &settings, ticks).await?;
        }
        _ => bail!(USAGE),
    }

    Ok(())
}

async fn run_dashboard(backend: Arc<HttpBackend>, settings: &Settings, ticks: usize) -> Result<()> {
    let snapshot = Arc::new(FileSnapshot::new(settings.snapshot_path.clone()));
    let mut poller = SummaryPoller::new(backend, snapshot);
    let mut updates = poller.subscribe();

    if ticks <= 1 {
        poller.refresh_once().await;
    } else {
        poller.start(settings.poll_interval());
        // A tick where every source failed publishes nothing; print the
        // retained summary once the interval has passed anyway.
        for _ in 0..ticks {
            let _ = tokio::time::timeout(settings.poll_interval(), updates.changed()).await;
            print_dashboard(&poller)?;
        }
        poller.stop();
        return Ok(());
    }

    print_dashboard(&poller)
}

fn print_dashboard<B, S>(poller: &SummaryPoller<B, S>) -> Result<()>
where
    B: shield_scan_client::ScanBackend + 'static,
    S: shield_scan_client::dashboard::SnapshotSource + 'static,
{
    let latest = poller.latest();
    let view = DashboardView::project(latest.as_ref(), &ReportFilter::all());
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}
