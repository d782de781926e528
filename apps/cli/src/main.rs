#![deny(warnings)]

//! Headless studio runner: opens a persisted session, autoplays a number of
//! weeks and prints the studio's KPIs.

use anyhow::{anyhow, Context, Result};
use persistence::{
    default_sqlite_url, FileStore, MemoryStore, SnapshotFormat, SnapshotStore, SqliteStore,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use studio_ai::{Autopilot, AutopilotPolicy};
use studio_content::ContentPack;
use studio_core::StudioConfig;
use studio_runtime::{load_config, Session};
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

struct Args {
    weeks: u32,
    seed: Option<u64>,
    config: Option<PathBuf>,
    content: Option<PathBuf>,
    policy: Option<PathBuf>,
    save: Option<PathBuf>,
    format: SnapshotFormat,
    sqlite: Option<String>,
    slot: String,
    json: bool,
    version: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        weeks: 52,
        seed: None,
        config: None,
        content: None,
        policy: None,
        save: None,
        format: SnapshotFormat::Json,
        sqlite: None,
        slot: "default".to_string(),
        json: false,
        version: false,
    };
    let mut it = std::env::args().skip(1).peekable();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--weeks" => {
                args.weeks = it
                    .next()
                    .and_then(|s| s.parse().ok())
                    .ok_or_else(|| anyhow!("--weeks needs a number"))?
            }
            "--seed" => args.seed = it.next().and_then(|s| s.parse().ok()),
            "--config" => args.config = it.next().map(PathBuf::from),
            "--content" => args.content = it.next().map(PathBuf::from),
            "--policy" => args.policy = it.next().map(PathBuf::from),
            "--save" => args.save = it.next().map(PathBuf::from),
            "--format" => {
                let value = it.next().unwrap_or_default();
                args.format = SnapshotFormat::parse(&value)
                    .ok_or_else(|| anyhow!("unknown snapshot format '{value}'"))?;
            }
            "--sqlite" => {
                let url = match it.peek() {
                    Some(next) if !next.starts_with("--") => it.next(),
                    _ => None,
                };
                args.sqlite = Some(url.unwrap_or_else(|| default_sqlite_url().to_string()));
            }
            "--slot" => {
                if let Some(slot) = it.next() {
                    args.slot = slot;
                }
            }
            "--json" => args.json = true,
            "--version" => args.version = true,
            other => warn!(arg = other, "ignoring unknown argument"),
        }
    }
    Ok(args)
}

/// End-of-run numbers.
#[derive(Debug, Serialize)]
struct Kpi {
    studio: String,
    week: u32,
    tier: String,
    cash: String,
    heat: f32,
    releases: u32,
    total_revenue: String,
    total_spend: String,
    chronicle_entries: usize,
    bankrupt: bool,
    save_ok: bool,
    saves_completed: u64,
}

fn ensure_sqlite_dir(url: &str) -> Result<()> {
    let Some(path) = url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    Ok(())
}

async fn run<S: SnapshotStore>(
    store: Arc<S>,
    args: &Args,
    config: StudioConfig,
    content: ContentPack,
    pilot: &Autopilot,
) -> Result<()> {
    let mut session = Session::open(store, config, content).await;
    if let Some(warning) = session.load_warning() {
        warn!(%warning, "previous save could not be used");
    }
    info!(week = session.studio().week(), resumed = session.resumed(), "session ready");

    let turns = pilot.play(&mut session, args.weeks);
    for turn in &turns {
        for release in &turn.releases {
            info!(
                outcome = %release.outcome,
                box_office = %release.final_box_office,
                profit = %release.profit,
                "release"
            );
        }
        if let Some(reason) = &turn.stalled {
            warn!(%reason, "autoplay stopped");
        }
    }

    let studio = session.studio();
    let state = studio.state();
    let recent: Vec<String> = state
        .chronicle
        .entries()
        .iter()
        .rev()
        .take(5)
        .map(|e| format!("  wk {:>3} [{:?}] {}", e.week, e.category, e.description))
        .collect();
    let mut kpi = Kpi {
        studio: state.studio_name.clone(),
        week: studio.week(),
        tier: studio.tier().to_string(),
        cash: studio.cash().round_dp(0).to_string(),
        heat: studio.heat(),
        releases: state.releases,
        total_revenue: state.ledger.total_revenue().round_dp(0).to_string(),
        total_spend: state.ledger.total_spend().round_dp(0).to_string(),
        chronicle_entries: state.chronicle.len(),
        bankrupt: studio.is_bankrupt(),
        save_ok: true,
        saves_completed: 0,
    };
    let status = session.close().await;
    kpi.save_ok = status.last_ok;
    kpi.saves_completed = status.saves_completed;
    if let Some(err) = &status.last_error {
        warn!(%err, "last save failed");
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&kpi)?);
    } else {
        println!(
            "KPI | {} | week: {} | tier: {} | cash: ${} | heat: {:.1} | releases: {} | revenue: ${} | spend: ${} | bankrupt: {} | saves: {} ({})",
            kpi.studio,
            kpi.week,
            kpi.tier,
            kpi.cash,
            kpi.heat,
            kpi.releases,
            kpi.total_revenue,
            kpi.total_spend,
            kpi.bankrupt,
            kpi.saves_completed,
            if kpi.save_ok { "ok" } else { "failing" },
        );
        if !recent.is_empty() {
            println!("Recent chronicle:");
            for line in recent {
                println!("{line}");
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::INFO)
        .init();

    let args = parse_args()?;
    if args.version {
        println!(
            "studio {} ({} built {})",
            env!("CARGO_PKG_VERSION"),
            env!("GIT_SHA"),
            env!("BUILD_DATE")
        );
        return Ok(());
    }
    info!(weeks = args.weeks, seed = ?args.seed, "starting studio run");

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => StudioConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.rng_seed = seed;
    }
    let content = match &args.content {
        Some(dir) => ContentPack::load_dir(dir)?,
        None => ContentPack::builtin()?,
    };
    let policy = match &args.policy {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            AutopilotPolicy::from_yaml(&text)?
        }
        None => AutopilotPolicy::default(),
    };
    let pilot = Autopilot::new(policy);

    if let Some(url) = &args.sqlite {
        ensure_sqlite_dir(url)?;
        let store = SqliteStore::open(url, &args.slot).await?;
        info!(%url, slot = store.slot(), "using sqlite saves");
        run(Arc::new(store), &args, config, content, &pilot).await
    } else if let Some(path) = &args.save {
        info!(path = %path.display(), format = ?args.format, "using file saves");
        run(
            Arc::new(FileStore::new(path.clone(), args.format)),
            &args,
            config,
            content,
            &pilot,
        )
        .await
    } else {
        run(Arc::new(MemoryStore::new()), &args, config, content, &pilot).await
    }
}
