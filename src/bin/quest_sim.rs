//! Quest Simulator
//!
//! Runs the recommendation engine against a JSON snapshot (or a built-in
//! demo) and prints the result as JSON.

use chrono::{DateTime, Duration, TimeZone, Utc};
use clap::{Parser, Subcommand};
use questforge::activity::{ActivityMetrics, ActivityRecord, QuestLogEntry, Skill, UserSnapshot};
use questforge::core::{Cadence, EngineConfig, QuestId, Result};
use questforge::group::{generate_group_quests, GroupProfile, Member, Tradition};
use questforge::quest::{Quest, QuestGenerator, QuestKind};
use questforge::rewards::RewardTemplate;
use questforge::templates::TemplateCatalog;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Quest Simulator - generate and rank quests from activity history
#[derive(Parser, Debug)]
#[command(name = "quest_sim")]
#[command(about = "Generate, rank and group quests from activity snapshots")]
struct Args {
    /// Random seed for deterministic runs
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Extra quest templates (TOML) added to the built-in catalog
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Engine tuning overrides (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate one personal quest from a user snapshot
    Recommend {
        /// User snapshot JSON; demo user when omitted
        input: Option<PathBuf>,
    },
    /// Rank a user's existing quests by predicted interest
    Rank {
        /// JSON with `user`, `candidates` and `now`; demo data when omitted
        input: Option<PathBuf>,
    },
    /// Generate quests for a family group
    Group {
        /// Group profile JSON; demo family when omitted
        input: Option<PathBuf>,
    },
}

#[derive(Debug, Serialize, Deserialize)]
struct RankInput {
    user: UserSnapshot,
    candidates: Vec<Quest>,
    now: DateTime<Utc>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "questforge=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        tracing::error!(error = %e, "quest_sim failed");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    tracing::info!(seed, "starting quest_sim");

    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let mut catalog = TemplateCatalog::with_defaults();
    if let Some(path) = &args.catalog {
        catalog.extend(TemplateCatalog::load_from_toml(path)?)?;
        tracing::info!(templates = catalog.len(), "loaded extra templates");
    }
    let generator = QuestGenerator::new(catalog, config)?;

    let output = match args.command {
        Command::Recommend { input } => {
            let user = load_or(input.as_deref(), demo_user)?;
            serde_json::to_string_pretty(&generator.generate(&user, &mut rng)?)?
        }
        Command::Rank { input } => {
            let data = match input.as_deref() {
                Some(path) => read_json(path)?,
                None => demo_rank_input(&generator, &mut rng),
            };
            let suggestions = generator.suggest(&data.user, &data.candidates, data.now)?;
            serde_json::to_string_pretty(&suggestions)?
        }
        Command::Group { input } => {
            let group = load_or(input.as_deref(), demo_group)?;
            let quests =
                generate_group_quests(&group, generator.catalog(), generator.config(), &mut rng)?;
            serde_json::to_string_pretty(&quests)?
        }
    };

    println!("{}", output);
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn load_or<T: DeserializeOwned>(path: Option<&Path>, demo: fn() -> T) -> Result<T> {
    match path {
        Some(path) => read_json(path),
        None => Ok(demo()),
    }
}

fn demo_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 10, 14, 19, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

/// Two weeks of evening runs and a few meditation sessions
fn demo_user() -> UserSnapshot {
    let start = demo_now() - Duration::days(14);

    let mut running = Skill::new("running", "Running").with_focus(65.0);
    for day in (0..14).step_by(2) {
        let minutes = 20 + day as u32 * 2;
        running.log_activity(
            ActivityRecord::new(start + Duration::days(day), minutes)
                .with_description("Evening run")
                .with_metrics(ActivityMetrics::Fitness {
                    distance_km: minutes as f64 / 6.0,
                    repetitions: 0,
                }),
        );
    }

    let mut meditation = Skill::new("meditation", "Meditation").with_focus(35.0);
    for day in [1, 5, 12] {
        meditation.log_activity(
            ActivityRecord::new(start + Duration::days(day) - Duration::hours(12), 10)
                .with_description("Guided sit")
                .with_metrics(ActivityMetrics::Mindfulness { calm_rating: 6 }),
        );
    }

    let log = [("fitness", true), ("fitness", true), ("mindfulness", false), ("fitness", true)];
    log.iter()
        .enumerate()
        .fold(
            UserSnapshot::new("demo-user").with_level(8),
            |user, (i, (category, completed))| {
                user.with_quest(QuestLogEntry {
                    quest_id: format!("past-{}", i),
                    category: category.to_string(),
                    completed: *completed,
                    finished_at: None,
                })
            },
        )
        .with_skill(running)
        .with_skill(meditation)
        .with_as_of(demo_now())
}

fn demo_rank_input(generator: &QuestGenerator, rng: &mut ChaCha8Rng) -> RankInput {
    let user = demo_user();
    let mut candidates = Vec::new();
    for (id, progress) in [("interval_run", 0.0), ("mindful_breathing", 0.4), ("free_writing", 0.0)] {
        if let Some(template) = generator.catalog().get(id) {
            let quest = Quest::from_template(
                QuestId::generate(rng),
                template,
                QuestKind::Personal,
                RewardTemplate::for_difficulty(template.difficulty),
                user.level,
            );
            candidates.push(quest.with_progress(progress));
        }
    }
    RankInput {
        user,
        candidates,
        now: demo_now(),
    }
}

fn demo_group() -> GroupProfile {
    GroupProfile::new("demo-family", demo_now())
        .with_member(Member::new("alex", "Alex").teaching("cooking").learning("guitar"))
        .with_member(Member::new("sam", "Sam").learning("cooking"))
        .with_member(Member::new("jo", "Jo").teaching("guitar"))
        .with_tradition(Tradition::new("pizza", "Friday pizza night", Cadence::Weekly))
        .with_tradition(
            Tradition::new("hike", "Autumn hike", Cadence::Yearly)
                .celebrated_at(demo_now() - Duration::days(40)),
        )
}
