mod config;
mod metrics;
mod routes;
mod server;

use answer_flow::plugin::{new_backends, BackendConfig, BackendKind};
use answer_flow::{AnswerFlow, Language, SystemInstructions};
use anyhow::{Context, Result};
use clap::Parser;
use command_classifier::{load_phrase_file, AnswerStore, CommandClassifier, PhraseTable};
use config::GatewayConfig;
use field_planner::PlanStore;
use metrics::MetricsHub;
use server::AppState;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "rover-gateway")]
#[command(about = "Voice assistant and field-plan gateway for the farm rover")]
struct Args {
    /// Address to listen on
    #[arg(long)]
    bind: Option<String>,

    /// YAML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// YAML phrase overrides for command classification
    #[arg(long)]
    phrases: Option<PathBuf>,

    /// Directory for synthesized audio
    #[arg(long)]
    audio_dir: Option<PathBuf>,

    /// Answer backend: mock or gemini
    #[arg(long)]
    answer_backend: Option<String>,

    #[arg(long)]
    gemini_model: Option<String>,

    /// Language used when a question has no `lang` (bn or en)
    #[arg(long)]
    default_lang: Option<String>,
}

impl Args {
    fn apply(self, mut cfg: GatewayConfig) -> GatewayConfig {
        if let Some(bind) = self.bind {
            cfg.bind = bind;
        }
        if let Some(phrases) = self.phrases {
            cfg.phrases = Some(phrases);
        }
        if let Some(dir) = self.audio_dir {
            cfg.flow.audio_dir = dir;
        }
        if let Some(backend) = self.answer_backend {
            cfg.answer_backend = backend;
        }
        if let Some(model) = self.gemini_model {
            cfg.gemini_model = model;
        }
        if let Some(lang) = self.default_lang {
            cfg.default_lang = Language::from_query(Some(&lang));
        }
        cfg
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_tracing();

    let args = Args::parse();
    let file_cfg = match &args.config {
        Some(path) => GatewayConfig::load(path)?,
        None => GatewayConfig::default(),
    };
    let cfg = args.apply(file_cfg);

    info!("Rover gateway starting");
    info!("Answer backend: {} ({})", cfg.answer_backend, cfg.gemini_model);
    info!("Audio directory: {}", cfg.flow.audio_dir.display());

    command_classifier::init();
    field_planner::init();

    let table = match &cfg.phrases {
        Some(path) => load_phrase_file(path)?,
        None => PhraseTable::default(),
    };
    info!("Phrase table: {} commands", table.len());

    let kind: BackendKind = cfg
        .answer_backend
        .parse()
        .context("selecting answer backend")?;
    let backends = new_backends(
        kind,
        &BackendConfig {
            model: cfg.gemini_model.clone(),
            api_key: None,
        },
    )
    .context("creating answer backends")?;

    std::fs::create_dir_all(&cfg.flow.audio_dir).with_context(|| {
        format!("creating audio directory: {}", cfg.flow.audio_dir.display())
    })?;

    let instructions = SystemInstructions::load(&cfg.instructions_bn, &cfg.instructions_en);
    let flow = AnswerFlow::new(
        backends,
        Arc::new(AnswerStore::new()),
        instructions,
        cfg.flow.clone(),
    );
    let metrics = MetricsHub::new().map_err(anyhow::Error::msg)?;

    let state = AppState {
        classifier: CommandClassifier::new(table),
        plans: PlanStore::new(),
        flow,
        metrics,
        default_lang: cfg.default_lang,
        public_url: cfg.public_url.clone(),
    };

    server::run(state, &cfg.bind).await
}

fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
