use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use scenario_planner::{
    Account, AppConfig, Counter, DeckExportOpts, Exporter, ExportContext, GateDecision,
    HelpTurn, HistoryStore, HttpGenerationClient, JsonFileHistoryStore, JsonFileUsageStore,
    MemoryUsageStore, Outcome, PlanGate, Planner, QuadrantId, UsageStore, User, Workspace,
    export::pipeline::{save_project, write_atomic},
    load_project,
    media::wav::{DEFAULT_SAMPLE_RATE, pcm_base64_to_wav, parse_wav},
    model::scenario::{Axis, CustomAxes},
    project::codec::{export_file_name, project_file_name},
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "scenario-planner", version)]
struct Cli {
    /// JSON config file; missing fields use built-in defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG is set.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a scenario set and save it as a project file.
    Generate(GenerateArgs),
    /// Generate the illustration for one scenario of a project.
    Image(MediaArgs),
    /// Generate narration for one scenario of a project.
    Speech(MediaArgs),
    /// Export a project as a slide deck.
    Deck(DeckArgs),
    /// Export a project as a self-contained HTML page.
    Html(HtmlArgs),
    /// Wrap base64 PCM16 mono in a WAV container.
    Wav(WavArgs),
    /// Show plan, usage and remaining quota for a user.
    Usage(UsageArgs),
    /// Browse and restore recorded generations.
    History(HistoryArgs),
    /// Ask the help assistant a usage question.
    Ask(AskArgs),
}

#[derive(Args, Debug)]
struct AccountArgs {
    /// User id charged for the operation.
    #[arg(long, default_value = "local")]
    user: String,

    /// Account email (used for the developer override).
    #[arg(long)]
    email: Option<String>,

    /// JSON usage database. Without it, a throwaway in-memory account is used.
    #[arg(long)]
    usage_db: Option<PathBuf>,

    /// Plan of the throwaway account when no usage database is given.
    #[arg(long, default_value = "free")]
    plan: String,
}

impl AccountArgs {
    fn user(&self) -> User<'_> {
        User {
            id: &self.user,
            email: self.email.as_deref(),
        }
    }

    fn store(&self) -> Box<dyn UsageStore> {
        match &self.usage_db {
            Some(path) => Box::new(JsonFileUsageStore::new(path)),
            None => Box::new(
                MemoryUsageStore::new()
                    .with_account(&self.user, Account::new(&self.plan, self.email.clone())),
            ),
        }
    }
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Theme to analyze.
    #[arg(long)]
    theme: String,

    /// Background details.
    #[arg(long, conflicts_with = "details_file")]
    details: Option<String>,

    /// Read background details from a file.
    #[arg(long)]
    details_file: Option<PathBuf>,

    /// Fixed X axis as `LABEL,MIN,MAX`.
    #[arg(long, value_parser = parse_axis)]
    axis_x: Option<Axis>,

    /// Fixed Y axis as `LABEL,MIN,MAX`.
    #[arg(long, value_parser = parse_axis)]
    axis_y: Option<Axis>,

    /// Output project path (default: `{theme}_project.json`).
    #[arg(long)]
    out: Option<PathBuf>,

    /// JSON history database to record the generation in.
    #[arg(long)]
    history_db: Option<PathBuf>,

    #[command(flatten)]
    account: AccountArgs,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum QuadrantArg {
    A,
    B,
    C,
    D,
}

impl From<QuadrantArg> for QuadrantId {
    fn from(value: QuadrantArg) -> Self {
        match value {
            QuadrantArg::A => Self::A,
            QuadrantArg::B => Self::B,
            QuadrantArg::C => Self::C,
            QuadrantArg::D => Self::D,
        }
    }
}

#[derive(Parser, Debug)]
struct MediaArgs {
    /// Project file; updated in place.
    #[arg(long)]
    project: PathBuf,

    #[arg(long, value_enum)]
    scenario: QuadrantArg,

    /// Regenerate narration even when the scenario already has one.
    #[arg(long)]
    force: bool,

    #[command(flatten)]
    account: AccountArgs,
}

#[derive(Parser, Debug)]
struct DeckArgs {
    #[arg(long)]
    project: PathBuf,

    /// Output path (default: `{theme}_ScenarioReport.pptx`).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Also write one PNG per slide here.
    #[arg(long)]
    preview_dir: Option<PathBuf>,

    /// Raster density for previews and chart pictures.
    #[arg(long)]
    ppi: Option<f64>,

    #[command(flatten)]
    account: AccountArgs,
}

#[derive(Parser, Debug)]
struct HtmlArgs {
    #[arg(long)]
    project: PathBuf,

    /// Output path (default: `{theme}_view.html`).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct WavArgs {
    /// File holding base64 PCM16 little-endian mono samples.
    #[arg(long)]
    pcm: PathBuf,

    #[arg(long)]
    out: PathBuf,

    #[arg(long, default_value_t = DEFAULT_SAMPLE_RATE)]
    sample_rate: u32,
}

#[derive(Parser, Debug)]
struct UsageArgs {
    #[arg(long)]
    user: String,

    #[arg(long)]
    usage_db: PathBuf,
}

#[derive(Parser, Debug)]
struct AskArgs {
    question: String,

    /// JSON chat transcript; earlier turns are sent as context and the new turns appended.
    #[arg(long)]
    transcript: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct HistoryArgs {
    #[command(subcommand)]
    cmd: HistoryCommand,
}

#[derive(Subcommand, Debug)]
enum HistoryCommand {
    /// List a user's generations, newest first.
    List {
        #[arg(long)]
        user: String,
        #[arg(long)]
        history_db: PathBuf,
    },
    /// Restore one generation as a project file.
    Load {
        #[arg(long)]
        user: String,
        #[arg(long)]
        history_db: PathBuf,
        #[arg(long)]
        id: String,
        /// Output project path (default: `{theme}_project.json`).
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn parse_axis(raw: &str) -> Result<Axis, String> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    match parts.as_slice() {
        [label, min, max] => Ok(Axis::new(*label, *min, *max)),
        _ => Err(format!("expected LABEL,MIN,MAX, got '{raw}'")),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let cfg = match &cli.config {
        Some(path) => AppConfig::from_path(path)?,
        None => AppConfig::default(),
    }
    .with_env_overrides();
    cfg.validate().context("invalid configuration")?;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("start async runtime")?;

    match cli.cmd {
        Command::Generate(args) => rt.block_on(cmd_generate(&cfg, args)),
        Command::Image(args) => rt.block_on(cmd_media(&cfg, args, false)),
        Command::Speech(args) => rt.block_on(cmd_media(&cfg, args, true)),
        Command::Deck(args) => rt.block_on(cmd_deck(&cfg, args)),
        Command::Html(args) => cmd_html(&cfg, args),
        Command::Wav(args) => cmd_wav(args),
        Command::Usage(args) => rt.block_on(cmd_usage(&cfg, args)),
        Command::History(args) => rt.block_on(cmd_history(&cfg, args)),
        Command::Ask(args) => rt.block_on(cmd_ask(&cfg, args)),
    }
}

fn denied(decision: &GateDecision) -> anyhow::Error {
    anyhow::anyhow!("{}", decision.message())
}

fn today() -> time::Date {
    time::OffsetDateTime::now_utc().date()
}

fn open_workspace(path: &Path) -> anyhow::Result<Workspace> {
    Ok(load_project(path)
        .with_context(|| format!("load project '{}'", path.display()))?
        .into_workspace())
}

async fn cmd_generate(cfg: &AppConfig, args: GenerateArgs) -> anyhow::Result<()> {
    let details = match (&args.details, &args.details_file) {
        (Some(d), _) => d.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("read details '{}'", path.display()))?,
        (None, None) => String::new(),
    };
    let mut ws = Workspace::new(args.theme.clone(), details);
    if args.axis_x.is_some() || args.axis_y.is_some() {
        ws.custom_axes = Some(CustomAxes {
            x: args.axis_x.clone().unwrap_or_default(),
            y: args.axis_y.clone().unwrap_or_default(),
        });
    }

    let client = HttpGenerationClient::from_config(cfg)?;
    let store = args.account.store();
    let history = args.history_db.as_ref().map(JsonFileHistoryStore::new);
    let mut planner = Planner::new(cfg, &client, store.as_ref());
    if let Some(history) = &history {
        planner = planner.with_history(history);
    }

    match planner
        .generate_scenarios(&mut ws, Some(args.account.user()))
        .await
        .map_err(|e| anyhow::anyhow!("生成エラー: {}", e.user_message()))?
    {
        None => anyhow::bail!("theme must not be empty"),
        Some(Outcome::Denied(d)) => return Err(denied(&d)),
        Some(Outcome::Done(())) => {}
    }

    let out = args
        .out
        .unwrap_or_else(|| PathBuf::from(project_file_name(&ws.theme)));
    save_project(&ws, cfg, &out, time::OffsetDateTime::now_utc())?;
    eprintln!("wrote {}", out.display());
    Ok(())
}

async fn cmd_media(cfg: &AppConfig, args: MediaArgs, speech: bool) -> anyhow::Result<()> {
    let mut ws = open_workspace(&args.project)?;
    let client = HttpGenerationClient::from_config(cfg)?;
    let store = args.account.store();
    let planner = Planner::new(cfg, &client, store.as_ref());
    let quadrant = QuadrantId::from(args.scenario);
    let user = Some(args.account.user());

    let outcome = if speech {
        planner
            .generate_speech(&mut ws, quadrant, user, args.force)
            .await
            .map_err(|e| anyhow::anyhow!("音声生成エラー: {}", e.user_message()))?
    } else {
        planner
            .generate_image(&mut ws, quadrant, user)
            .await
            .map_err(|e| anyhow::anyhow!("{}", e.user_message()))?
    };
    match outcome {
        Outcome::Denied(d) => return Err(denied(&d)),
        Outcome::Done(false) => anyhow::bail!("result was superseded before it arrived"),
        Outcome::Done(true) => {}
    }

    save_project(&ws, cfg, &args.project, time::OffsetDateTime::now_utc())?;
    eprintln!("updated {}", args.project.display());
    Ok(())
}

async fn cmd_deck(cfg: &AppConfig, args: DeckArgs) -> anyhow::Result<()> {
    let ws = open_workspace(&args.project)?;
    let client = HttpGenerationClient::from_config(cfg)?;
    let store = args.account.store();
    let planner = Planner::new(cfg, &client, store.as_ref());

    let out = args
        .out
        .unwrap_or_else(|| PathBuf::from(export_file_name(&ws.theme, "_ScenarioReport.pptx")));
    let opts = DeckExportOpts {
        preview_dir: args.preview_dir,
        px_per_inch: args.ppi,
    };
    let stats = match planner
        .export_deck(&ws, Some(args.account.user()), &out, &opts, today())
        .await?
    {
        Outcome::Denied(d) => return Err(denied(&d)),
        Outcome::Done(stats) => stats,
    };

    eprintln!(
        "wrote {} ({} slides, {} bytes, {} images, {} audio clips)",
        out.display(),
        stats.slides,
        stats.bytes,
        stats.images,
        stats.audio_clips
    );
    for preview in &stats.previews {
        eprintln!("wrote {}", preview.display());
    }
    Ok(())
}

fn cmd_html(cfg: &AppConfig, args: HtmlArgs) -> anyhow::Result<()> {
    let ws = open_workspace(&args.project)?;
    let out = args
        .out
        .unwrap_or_else(|| PathBuf::from(export_file_name(&ws.theme, "_view.html")));
    let ctx = ExportContext::from_workspace(&ws, cfg, today())?;
    let bytes = Exporter::new().export_html(&ctx, &out)?;
    eprintln!("wrote {} ({bytes} bytes)", out.display());
    Ok(())
}

fn cmd_wav(args: WavArgs) -> anyhow::Result<()> {
    let b64 = std::fs::read_to_string(&args.pcm)
        .with_context(|| format!("read pcm '{}'", args.pcm.display()))?;
    let wav = pcm_base64_to_wav(&b64, args.sample_rate)?;
    let info = parse_wav(wav.bytes())?;
    write_atomic(&args.out, wav.bytes())?;
    eprintln!(
        "wrote {} ({} samples, {:.2}s)",
        args.out.display(),
        info.samples.len(),
        info.duration_secs()
    );
    Ok(())
}

async fn cmd_usage(cfg: &AppConfig, args: UsageArgs) -> anyhow::Result<()> {
    let store = JsonFileUsageStore::new(&args.usage_db);
    let account = store
        .load(&args.user)
        .await?
        .with_context(|| format!("no account for user '{}'", args.user))?;
    let gate = PlanGate::from_config(cfg);

    println!("user: {}", args.user);
    println!("plan: {}", scenario_planner::Plan::normalize(&account.plan).as_str());
    for counter in Counter::ALL {
        let remaining = gate
            .remaining(&account, counter)
            .map_or_else(|| "unlimited".to_string(), |n| n.to_string());
        println!(
            "{}: used {}, remaining {remaining}",
            counter.as_str(),
            account.usage.get(counter)
        );
    }
    Ok(())
}

async fn cmd_history(cfg: &AppConfig, args: HistoryArgs) -> anyhow::Result<()> {
    match args.cmd {
        HistoryCommand::List { user, history_db } => {
            let store = JsonFileHistoryStore::new(&history_db);
            for entry in store.list(&user).await? {
                let when = entry
                    .created_at
                    .format(&time::format_description::well_known::Rfc3339)
                    .unwrap_or_default();
                let axes = if entry.custom_axes.is_some() { " [fixed axes]" } else { "" };
                println!("{}\t{when}\t{}{axes}", entry.id, entry.theme);
            }
            Ok(())
        }
        HistoryCommand::Load {
            user,
            history_db,
            id,
            out,
        } => {
            let store = JsonFileHistoryStore::new(&history_db);
            let entry = store
                .load(&user, &id)
                .await?
                .with_context(|| format!("no history entry '{id}' for user '{user}'"))?;
            let ws = entry.into_workspace();
            let out = out.unwrap_or_else(|| PathBuf::from(project_file_name(&ws.theme)));
            save_project(&ws, cfg, &out, time::OffsetDateTime::now_utc())?;
            eprintln!("wrote {}", out.display());
            Ok(())
        }
    }
}

async fn cmd_ask(cfg: &AppConfig, args: AskArgs) -> anyhow::Result<()> {
    let mut chat: Vec<HelpTurn> = match &args.transcript {
        Some(path) if path.exists() => {
            let raw = std::fs::read(path)
                .with_context(|| format!("read transcript '{}'", path.display()))?;
            serde_json::from_slice(&raw)
                .with_context(|| format!("parse transcript '{}'", path.display()))?
        }
        _ => Vec::new(),
    };
    let client = HttpGenerationClient::from_config(cfg)?;
    let store = MemoryUsageStore::new();
    let planner = Planner::new(cfg, &client, &store);

    let answer = planner
        .help(&args.question, &mut chat)
        .await
        .context("question must not be empty")?;
    println!("{answer}");

    if let Some(path) = &args.transcript {
        write_atomic(path, &serde_json::to_vec_pretty(&chat)?)?;
    }
    Ok(())
}
