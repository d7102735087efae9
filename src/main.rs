use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

use exam_prep_insights::import::ImportKind;
use exam_prep_insights::models::{DailyStats, Insights, SoftSkillStats};
use exam_prep_insights::window::DateWindow;
use exam_prep_insights::{db, insights, report, stats};

#[derive(Parser)]
#[command(name = "exam-prep-insights")]
#[command(about = "Study-progress analytics for exam preparation", long_about = None)]
struct Cli {
    /// Postgres connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load a demo user with realistic history
    Seed,
    /// Import records for a user from a CSV file
    Import {
        #[arg(long, value_enum)]
        kind: ImportKind,
        #[arg(long)]
        user: Uuid,
        #[arg(long)]
        csv: PathBuf,
    },
    /// Compute dashboard insights for a user
    Insights {
        #[arg(long)]
        user: Uuid,
        #[arg(long, default_value_t = 30)]
        days: i64,
        /// Print the raw insights as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate a markdown progress report
    Report {
        #[arg(long)]
        user: Uuid,
        #[arg(long, default_value_t = 30)]
        days: i64,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Summarize mocks, daily habits and soft-skill practice
    Stats {
        #[arg(long)]
        user: Uuid,
        #[arg(long, default_value_t = 30)]
        days: i64,
        /// How many recent mocks to summarize
        #[arg(long, default_value_t = 10)]
        limit: i64,
    },
    /// Question-level breakdown of one mock
    MockStats {
        #[arg(long)]
        user: Uuid,
        #[arg(long)]
        mock: Uuid,
    },
}

async fn load_insights(
    pool: &PgPool,
    user: Uuid,
    window: &DateWindow,
) -> anyhow::Result<(Insights, DailyStats, SoftSkillStats)> {
    let (mocks, analyses, daily, soft_skills) = tokio::try_join!(
        db::fetch_mocks(pool, user, window),
        db::fetch_all_analyses(pool, user),
        db::fetch_windowed_daily(pool, user, window),
        db::fetch_windowed_soft_skills(pool, user, window),
    )?;

    let insights = insights::compute_insights(&mocks, &analyses, &daily, &soft_skills);
    Ok((
        insights,
        stats::daily_stats(&daily),
        stats::soft_skill_stats(&soft_skills),
    ))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&cli.database_url)
        .await
        .context("failed to connect to Postgres")?;

    let today = Utc::now().date_naive();

    match cli.command {
        Commands::InitDb => {
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            let user = db::seed(&pool, today).await?;
            println!("Seed data inserted for user {user}.");
        }
        Commands::Import { kind, user, csv } => {
            let written = db::import_csv(&pool, kind, user, &csv, today).await?;
            println!("Wrote {written} records from {}.", csv.display());
        }
        Commands::Insights { user, days, json } => {
            let window = DateWindow::last_days(days, today);
            let (insights, _, _) = load_insights(&pool, user, &window).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&insights)?);
                return Ok(());
            }

            let overview = &insights.overview;
            println!("{} ({} to {})", window.label(), window.start, window.end);
            println!(
                "- {} mocks, average percentile {:.2}, average total {:.2}",
                overview.total_mocks, overview.average_percentile, overview.average_total
            );
            println!("- {}", insights.weakest_section.message);
            println!("- {}", insights.most_common_error.message);
            println!("- {}", insights.accuracy_trend.message);
            if let (Some(best), Some(worst)) = (
                insights.performance_patterns.best_slot,
                insights.performance_patterns.worst_slot,
            ) {
                println!("- Best slot {best}, weakest slot {worst}");
            }
            for rec in insights.recommendations.iter() {
                println!("! [{}] {}", rec.priority.as_str(), rec.message);
            }
        }
        Commands::Report { user, days, out } => {
            let window = DateWindow::last_days(days, today);
            let (insights, daily, soft_skills) = load_insights(&pool, user, &window).await?;
            let report = report::build_report(
                &user.to_string(),
                &window,
                &insights,
                &daily,
                &soft_skills,
            );
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            info!(path = %out.display(), "report written");
            println!("Report written to {}.", out.display());
        }
        Commands::Stats { user, days, limit } => {
            let window = DateWindow::last_days(days, today);
            let (mocks, daily, soft_skills) = tokio::try_join!(
                db::fetch_recent_mocks(&pool, user, limit),
                db::fetch_windowed_daily(&pool, user, &window),
                db::fetch_windowed_soft_skills(&pool, user, &window),
            )?;

            let summary = serde_json::json!({
                "period": window.label(),
                "mocks": stats::mock_stats(&mocks),
                "daily": stats::daily_stats(&daily),
                "softSkills": stats::soft_skill_stats(&soft_skills),
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::MockStats { user, mock } => {
            let record = db::fetch_mock(&pool, user, mock)
                .await?
                .with_context(|| format!("mock {mock} not found for user {user}"))?;
            let analyses = db::fetch_mock_analyses(&pool, user, mock).await?;

            let summary = serde_json::json!({
                "mockName": record.name,
                "data": stats::mock_analysis_stats(&analyses),
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}
