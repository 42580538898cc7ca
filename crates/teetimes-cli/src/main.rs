use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use teetimes_catalog::CourseCatalog;
use teetimes_resolver::{fetch_availability, resolve_all, CancelFlag, Resolver, RunSummary};

#[derive(Debug, Parser)]
#[command(name = "teetimes-cli")]
#[command(about = "Golf course booking-URL resolution and tee-time availability")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve booking URLs for all courses, or a selected subset.
    Resolve {
        /// Course key(s) to resolve; omit to resolve the whole catalog.
        #[arg(long = "course")]
        courses: Vec<String>,
    },
    /// Fetch and print normalized tee-time availability for one course.
    Availability {
        /// Course key.
        key: String,
        /// Only print slots on this date (YYYY-MM-DD).
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = teetimes_core::load_app_config()?;
    init_tracing(&config.log_level);

    let cli = Cli::parse();
    let catalog = CourseCatalog::open(&config.catalog_path)?;
    let resolver = Resolver::new(&config)?;

    match cli.command {
        Commands::Resolve { courses } => {
            let keys = if courses.is_empty() {
                catalog.keys()?
            } else {
                courses
            };

            let cancel = CancelFlag::new();
            let ctrlc_flag = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::warn!("interrupt received, finishing in-flight courses");
                    ctrlc_flag.cancel();
                }
            });

            let summary = resolve_all(
                &resolver,
                &catalog,
                &keys,
                config.max_concurrent_courses,
                config.failure_alert_threshold,
                &cancel,
            )
            .await?;

            print_summary(&summary);
            std::process::exit(exit_code(&summary));
        }
        Commands::Availability { key, date } => {
            let record = catalog
                .get(&key)?
                .ok_or_else(|| anyhow::anyhow!("no course with key '{key}' in catalog"))?;
            let booking_url = record.booking_url.as_deref().ok_or_else(|| {
                anyhow::anyhow!(
                    "course '{}' has no verified booking URL; run `resolve` first",
                    record.name
                )
            })?;

            let slots = fetch_availability(&resolver, &record.key, booking_url).await?;
            let slots: Vec<_> = match date {
                Some(date) => slots.into_iter().filter(|s| s.date == date).collect(),
                None => slots,
            };

            if slots.is_empty() {
                println!("no bookable tee times found for {}", record.name);
            } else {
                for slot in &slots {
                    println!("{}", serde_json::to_string(slot)?);
                }
            }
        }
    }

    Ok(())
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn print_summary(summary: &RunSummary) {
    println!(
        "resolution run: {} verified, {} unchanged, {} failed, {} skipped",
        summary.verified,
        summary.unchanged,
        summary.failed.len(),
        summary.skipped,
    );
    for (key, reason) in &summary.failed {
        println!("  failed {key}: {reason}");
    }
}

/// Exit 0 only on full success, 2 when any course failed to resolve.
fn exit_code(summary: &RunSummary) -> i32 {
    if summary.has_failures() {
        2
    } else {
        0
    }
}
