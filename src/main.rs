mod api;
mod server;

use chrono::{Local, Utc};
use clap::{Args, Parser, Subcommand};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use tracing_subscriber::EnvFilter;

use skywatch::assistant::{Assistant, GeminiClient, TextCompletionService, Unconfigured};
use skywatch::catalog::{self, Dataset};
use skywatch::config::SkywatchConfig;
use skywatch::feed::{FeedTimer, SimulatedFeed, SystemClock};
use skywatch::forecast::generate_forecast;
use skywatch::map;
use skywatch::scoring::RecommendationScorer;
use skywatch::shell::{render_dashboard, render_forecast, DashboardView};
use skywatch::state::DashboardState;
use skywatch::{format_percent, format_time, SharedDashboard};

#[derive(Parser)]
#[command(name = "skywatch", about = "Night-sky viewing conditions simulator")]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    dataset: Option<String>,
    #[arg(long, global = true)]
    seed: Option<u64>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    Dashboard(DashboardArgs),
    Watch(WatchArgs),
    Forecast(ForecastArgs),
    Ask(AskArgs),
    Plan(PlanArgs),
    Serve(ServeArgs),
}

#[derive(Args, Debug, Clone, Default)]
struct DashboardArgs {
    #[arg(long)]
    filter: Option<String>,
    #[arg(long)]
    select: Option<String>,
    #[arg(long, value_name = "LAT,LNG", num_args = 0..=1, default_missing_value = "")]
    near: Option<String>,
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug, Clone)]
struct WatchArgs {
    #[arg(long, default_value_t = 3)]
    ticks: u32,
    #[arg(long)]
    tick_secs: Option<u64>,
}

#[derive(Args, Debug, Clone)]
struct ForecastArgs {
    #[arg(long)]
    id: Option<String>,
}

#[derive(Args, Debug, Clone)]
struct AskArgs {
    #[arg(long)]
    question: Option<String>,
    #[arg(long)]
    location: Option<String>,
}

#[derive(Args, Debug, Clone)]
struct PlanArgs {
    #[arg(long)]
    location: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(long)]
    host: Option<String>,
    #[arg(long)]
    port: Option<u16>,
    #[arg(long)]
    web_root: Option<String>,
}

#[tokio::main]
async fn main() {
    load_dotenv();
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let cli = Cli::parse();
    let (mut config, config_path) = SkywatchConfig::load(cli.config)?;
    if let Some(path) = config_path.as_ref() {
        info!(path = %path.display(), exists = path.exists(), "configuration resolved");
    }
    if let Some(dataset) = cli.dataset {
        config.dashboard.dataset = dataset;
    }
    if let Some(seed) = cli.seed {
        config.feed.seed = Some(seed);
    }

    let command = cli
        .command
        .unwrap_or(Command::Dashboard(DashboardArgs::default()));

    match command {
        Command::Dashboard(args) => run_dashboard(&config, args),
        Command::Watch(args) => run_watch(&config, args).await,
        Command::Forecast(args) => run_forecast(&config, args),
        Command::Ask(args) => run_ask(&config, args).await,
        Command::Plan(args) => run_plan(&config, args).await,
        Command::Serve(args) => server::serve(config, args).await,
    }
}

fn seeded_state(config: &SkywatchConfig) -> Result<DashboardState, String> {
    let dataset: Dataset = config.dashboard.dataset()?;
    DashboardState::new(catalog::seed(dataset, Utc::now()))
}

fn feed_for(config: &SkywatchConfig) -> SimulatedFeed {
    match config.feed.seed {
        Some(seed) => SimulatedFeed::seeded(config.feed.jitter.clone(), seed),
        None => SimulatedFeed::new(config.feed.jitter.clone()),
    }
}

fn run_dashboard(config: &SkywatchConfig, args: DashboardArgs) -> Result<(), String> {
    let mut state = seeded_state(config)?;
    if let Some(filter) = args.filter {
        state.set_filter(filter);
    }
    if let Some(id) = args.select.as_deref() {
        state.select(id)?;
    }

    let scorer = RecommendationScorer::new(config.weights.clone());
    let view = DashboardView::build(
        &state,
        &scorer,
        &config.dashboard.region,
        config.dashboard.top_picks,
        &Local::now(),
    );

    let nearby = args
        .near
        .as_deref()
        .map(|near| map::locate(state.locations(), near));

    if args.json {
        if let Some(Err(message)) = nearby.as_ref() {
            eprintln!("{}", message);
        }
        let payload = serde_json::to_string_pretty(&view)
            .map_err(|err| format!("failed to serialize dashboard: {}", err))?;
        println!("{}", payload);
    } else {
        match nearby {
            Some(Ok(nearby)) => println!(
                "Nearest to {:.4}, {:.4}: {} ({:.1} km)\n",
                nearby.position.lat, nearby.position.lng, nearby.name, nearby.distance_km
            ),
            Some(Err(message)) => println!("{}\n", message),
            None => {}
        }
        print!("{}", render_dashboard(&view));
    }
    Ok(())
}

async fn run_watch(config: &SkywatchConfig, args: WatchArgs) -> Result<(), String> {
    let dashboard: SharedDashboard = Arc::new(RwLock::new(seeded_state(config)?));
    let mut feed_config = config.feed.clone();
    if let Some(tick_secs) = args.tick_secs {
        feed_config.tick_secs = tick_secs;
    }

    let mut timer = FeedTimer::new(feed_config.tick(), Arc::new(SystemClock));
    let mut updates = timer.subscribe();
    timer.start(dashboard.clone(), feed_for(config));
    println!(
        "Watching {} locations every {}s",
        dashboard.read().await.locations().len(),
        timer.interval().as_secs()
    );

    for _ in 0..args.ticks {
        let update = updates
            .recv()
            .await
            .map_err(|err| format!("feed stopped: {}", err))?;
        println!(
            "\nTick {} at {}",
            update.tick,
            format_time(&update.at.with_timezone(&Local))
        );
        for location in &update.locations {
            println!(
                "  {:<20} stars {:>3} | cloud {:>4} | light {:>4}",
                location.name,
                location.star_score,
                format_percent(location.cloud_cover),
                format_percent(location.light_pollution)
            );
        }
    }

    timer.stop();
    Ok(())
}

fn run_forecast(config: &SkywatchConfig, args: ForecastArgs) -> Result<(), String> {
    let mut state = seeded_state(config)?;
    if let Some(id) = args.id.as_deref() {
        state.select(id)?;
    }
    let location = state.selected();
    println!("Forecast for {}", location.name);
    print!(
        "{}",
        render_forecast(&generate_forecast(&location.conditions(), &Local::now()))
    );
    Ok(())
}

async fn run_ask(config: &SkywatchConfig, args: AskArgs) -> Result<(), String> {
    let mut state = seeded_state(config)?;
    if let Some(id) = args.location.as_deref() {
        state.select(id)?;
    }
    let question = read_question(args.question)?;
    let (service, _) = completion_service(config)?;
    let assistant = Assistant::new(service, &config.dashboard.region);
    let reply = assistant
        .ask(&question, state.selected())
        .await
        .unwrap_or_default();
    println!("{}", reply);
    Ok(())
}

async fn run_plan(config: &SkywatchConfig, args: PlanArgs) -> Result<(), String> {
    let mut state = seeded_state(config)?;
    if let Some(id) = args.location.as_deref() {
        state.select(id)?;
    }
    let (service, _) = completion_service(config)?;
    let assistant = Assistant::new(service, &config.dashboard.region);
    println!("{}", assistant.itinerary(state.selected()).await);
    Ok(())
}

pub(crate) fn completion_service(
    config: &SkywatchConfig,
) -> Result<(Arc<dyn TextCompletionService>, bool), String> {
    match GeminiClient::from_config(&config.assistant)? {
        Some(client) => {
            info!(model = client.model(), "AI assistant enabled");
            Ok((Arc::new(client), true))
        }
        None => {
            info!("AI assistant not configured: set GEMINI_API_KEY");
            Ok((Arc::new(Unconfigured), false))
        }
    }
}

fn read_question(arg: Option<String>) -> Result<String, String> {
    if let Some(text) = arg {
        if !text.trim().is_empty() {
            return Ok(text);
        }
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|err| format!("failed reading stdin: {}", err))?;
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Err("missing question: pass --question or pipe stdin".to_string());
    }
    Ok(trimmed.to_string())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn load_dotenv() {
    let _ = dotenvy::dotenv();
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let manifest_path = Path::new(manifest_dir).join(".env");
    let _ = dotenvy::from_path(manifest_path);
}
