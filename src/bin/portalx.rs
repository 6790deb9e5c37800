// Terminal client for the developer-portal backend.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use futures::FutureExt;
use std::io::Write as _;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tokio::io::AsyncBufReadExt;

use portalx::animate::AnimatedValue;
use portalx::api;
use portalx::config::{load, CliArgs};
use portalx::job_watch::JobWatcher;
use portalx::poll::Poller;
use portalx::query::QueryController;
use portalx::state::Observed;
use portalx::types::{
    ContractMeta, JobStatus, NetworkStats, ResourceQuery, ScaffoldRequest, SubmitDeployRequest,
};
use portalx::{ApiClient, Config};

#[derive(Parser)]
#[command(name = "portalx")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Blockchain developer-portal terminal client", long_about = None)]
struct Cli {
    #[command(flatten)]
    args: CliArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Browse the contract registry
    Contracts {
        #[command(subcommand)]
        cmd: ContractsCmd,
    },
    /// Submit and track deployment jobs
    Deploy {
        #[command(subcommand)]
        cmd: DeployCmd,
    },
    /// Scaffold starter projects
    Scaffold {
        #[command(subcommand)]
        cmd: ScaffoldCmd,
    },
    /// Issue allow-listed JSON-RPC calls through the portal proxy
    Rpc {
        #[command(subcommand)]
        cmd: RpcCmd,
    },
    /// Chain metadata and liveness
    Network {
        #[command(subcommand)]
        cmd: NetworkCmd,
    },
}

#[derive(Subcommand)]
enum ContractsCmd {
    /// One-shot filtered listing
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        protocol: Option<String>,
        #[arg(long = "type")]
        kind: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Interactive search: type a query per line, results follow debounced
    Search,
    /// Full contract detail including source
    Show { id: String },
    /// Registry-wide counts
    Summary,
}

#[derive(Subcommand)]
enum DeployCmd {
    /// Deployable contract templates with constructor parameters
    Templates,
    Search { q: String },
    /// Queue a deployment job
    Submit {
        contract: String,
        /// Constructor argument, JSON or bare string; repeatable in order
        #[arg(long = "arg")]
        args: Vec<String>,
        /// Poll the job until it completes or fails
        #[arg(long)]
        watch: bool,
    },
    Status {
        job_id: String,
        #[arg(long)]
        watch: bool,
    },
    History,
}

#[derive(Subcommand)]
enum ScaffoldCmd {
    Templates,
    Search { q: String },
    /// Dry-run: list the files a template would generate
    Preview { template: String, name: String },
    /// Generate the project archive and print its download URL
    Generate { template: String, name: String },
}

#[derive(Subcommand)]
enum RpcCmd {
    /// Allow-listed method catalog
    Methods,
    Call {
        method: String,
        /// Params as a JSON array or object; empty means no params
        params: Option<String>,
    },
}

#[derive(Subcommand)]
enum NetworkCmd {
    Status {
        /// Keep polling and render an animated block-height counter
        #[arg(long)]
        watch: bool,
    },
    Info,
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (safe to ignore if not found)
    let _ = dotenvy::dotenv();
    env_logger::init();

    let cli = Cli::parse();
    let cfg = load(&cli.args).context("Failed to load configuration")?;
    let client = ApiClient::from_config(&cfg).context("Failed to build HTTP client")?;

    match cli.command {
        Command::Contracts { cmd } => contracts(&client, &cfg, cmd).await,
        Command::Deploy { cmd } => deploy(&client, &cfg, cmd).await,
        Command::Scaffold { cmd } => scaffold(&client, cmd).await,
        Command::Rpc { cmd } => rpc(&client, cmd).await,
        Command::Network { cmd } => network(&client, &cfg, cmd).await,
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn contracts(client: &ApiClient, cfg: &Config, cmd: ContractsCmd) -> Result<()> {
    match cmd {
        ContractsCmd::List {
            search,
            category,
            protocol,
            kind,
            page,
            limit,
        } => {
            let query = ResourceQuery {
                search: search.unwrap_or_default(),
                category,
                protocol,
                kind,
                page,
                limit: limit.unwrap_or(cfg.page_limit),
            };
            let page = api::contracts::list(client, &query)
                .await
                .context("Failed to list contracts")?;
            print_json(&page)
        }
        ContractsCmd::Search => interactive_search(client, cfg).await,
        ContractsCmd::Show { id } => {
            let detail = api::contracts::get(client, &id)
                .await
                .with_context(|| format!("Failed to fetch contract {id}"))?;
            print_json(&detail)
        }
        ContractsCmd::Summary => {
            let summary = api::contracts::summary(client)
                .await
                .context("Failed to fetch registry summary")?;
            print_json(&summary)
        }
    }
}

/// Read search text line by line and drive a debounced query controller,
/// the same flow the portal's registry page uses.
async fn interactive_search(client: &ApiClient, cfg: &Config) -> Result<()> {
    let fetch_client = client.clone();
    let limit = cfg.page_limit;
    let mut controller = QueryController::<ContractMeta>::new(
        Duration::from_millis(cfg.debounce_ms),
        move |query| {
            let client = fetch_client.clone();
            async move { api::contracts::list(&client, &query).await }.boxed()
        },
    );
    controller.set_limit(limit);
    // initial unfiltered page, the same fetch the registry view does on mount
    controller.refresh();

    controller.results().subscribe(|page| {
        if let Some(p) = page {
            println!("-- {} match(es), page {}/{}", p.total, p.page, p.total_pages);
            for item in &p.items {
                println!(
                    "   {}  [{}]",
                    item.name,
                    item.category.as_deref().unwrap_or("-")
                );
            }
        }
    });
    controller.last_error().subscribe(|err| {
        if let Some(msg) = err {
            eprintln!("search failed: {msg}");
        }
    });

    eprintln!("type to search the registry (Ctrl-D to exit)");
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        controller.set_search(line.trim().to_string());
    }
    controller.detach();
    Ok(())
}

async fn deploy(client: &ApiClient, cfg: &Config, cmd: DeployCmd) -> Result<()> {
    match cmd {
        DeployCmd::Templates => {
            let templates = api::deploy::templates(client)
                .await
                .context("Failed to fetch deployable contracts")?;
            print_json(&templates)
        }
        DeployCmd::Search { q } => {
            let hits = api::deploy::search(client, &q)
                .await
                .context("Deploy search failed")?;
            print_json(&hits)
        }
        DeployCmd::Submit {
            contract,
            args,
            watch,
        } => {
            // each --arg is JSON if it parses, a plain string otherwise
            let constructor_args = args
                .iter()
                .map(|a| {
                    serde_json::from_str(a)
                        .unwrap_or_else(|_| serde_json::Value::String(a.clone()))
                })
                .collect();
            let receipt = api::deploy::submit(
                client,
                &SubmitDeployRequest {
                    contract,
                    constructor_args,
                },
            )
            .await
            .context("Failed to submit deployment")?;
            println!("job {} queued ({})", receipt.job_id, receipt.status);
            if watch {
                watch_job(client, cfg, receipt.job_id).await?;
            }
            Ok(())
        }
        DeployCmd::Status { job_id, watch } => {
            if watch {
                watch_job(client, cfg, job_id).await
            } else {
                let job = api::deploy::status(client, &job_id)
                    .await
                    .with_context(|| format!("Failed to fetch job {job_id}"))?;
                print_json(&job)
            }
        }
        DeployCmd::History => {
            let records = api::deploy::history(client)
                .await
                .context("Failed to fetch deployment history")?;
            for r in &records {
                let when = r
                    .submitted_at
                    .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                    .unwrap_or_else(|| "-".into());
                println!(
                    "{}  {:<10}  {}  {}",
                    when,
                    r.status.to_string(),
                    r.contract,
                    r.contract_address.as_deref().unwrap_or("")
                );
            }
            Ok(())
        }
    }
}

/// Poll a job to its terminal state, printing each status transition, then
/// refresh the history list.
async fn watch_job(client: &ApiClient, cfg: &Config, job_id: String) -> Result<()> {
    let fetch_client = client.clone();
    let fetch_id = job_id.clone();
    let watcher = JobWatcher::watch(
        Duration::from_millis(cfg.job_poll_interval_ms),
        move || {
            let client = fetch_client.clone();
            let id = fetch_id.clone();
            async move { api::deploy::status(&client, &id).await }.boxed()
        },
        |job| match job.status {
            JobStatus::Complete => {
                println!(
                    "deployed: address={} tx={}",
                    job.contract_address.as_deref().unwrap_or("?"),
                    job.tx_hash.as_deref().unwrap_or("?")
                );
            }
            _ => {
                println!(
                    "deployment failed: {}",
                    job.error.as_deref().unwrap_or("no error detail")
                );
            }
        },
    );

    let last_seen = Mutex::new(None::<JobStatus>);
    watcher.job().subscribe(move |job| {
        if let Some(j) = job {
            let mut last = last_seen.lock().expect("status lock");
            if *last != Some(j.status) {
                *last = Some(j.status);
                eprintln!("[{}] {}", j.id, j.status);
            }
        }
    });

    watcher.wait().await;

    // dependent refresh once the job settles
    let recent = api::deploy::history(client)
        .await
        .context("Failed to refresh deployment history")?;
    println!("-- recent deployments --");
    for r in recent.iter().take(5) {
        println!("{:<10}  {}", r.status.to_string(), r.contract);
    }
    Ok(())
}

async fn scaffold(client: &ApiClient, cmd: ScaffoldCmd) -> Result<()> {
    match cmd {
        ScaffoldCmd::Templates => {
            let templates = api::scaffold::templates(client)
                .await
                .context("Failed to fetch scaffold templates")?;
            print_json(&templates)
        }
        ScaffoldCmd::Search { q } => {
            let hits = api::scaffold::search(client, &q)
                .await
                .context("Scaffold search failed")?;
            print_json(&hits)
        }
        ScaffoldCmd::Preview { template, name } => {
            let preview = api::scaffold::preview(
                client,
                &ScaffoldRequest {
                    template,
                    project_name: name,
                    options: None,
                },
            )
            .await
            .context("Scaffold preview failed")?;
            println!(
                "{} file(s), {} bytes total",
                preview.file_count, preview.total_size
            );
            for f in &preview.files {
                println!("  {}  ({} bytes)", f.path, f.size);
            }
            Ok(())
        }
        ScaffoldCmd::Generate { template, name } => {
            let generated = api::scaffold::generate(
                client,
                &ScaffoldRequest {
                    template,
                    project_name: name,
                    options: None,
                },
            )
            .await
            .context("Scaffold generation failed")?;
            println!("download: {}", generated.download_url);
            Ok(())
        }
    }
}

async fn rpc(client: &ApiClient, cmd: RpcCmd) -> Result<()> {
    match cmd {
        RpcCmd::Methods => {
            let methods = api::rpc::methods(client)
                .await
                .context("Failed to fetch RPC method catalog")?;
            for m in &methods {
                println!("{:<40} {}", m.method, m.description.as_deref().unwrap_or(""));
            }
            Ok(())
        }
        RpcCmd::Call { method, params } => {
            // validation errors surface here, before any request goes out
            let params = api::rpc::parse_params(params.as_deref().unwrap_or(""))?;
            let result = api::rpc::call(client, &method, params)
                .await
                .with_context(|| format!("RPC call {method} failed"))?;
            print_json(&result)
        }
    }
}

async fn network(client: &ApiClient, cfg: &Config, cmd: NetworkCmd) -> Result<()> {
    match cmd {
        NetworkCmd::Info => {
            let info = api::network::info(client)
                .await
                .context("Failed to fetch network info")?;
            print_json(&info)
        }
        NetworkCmd::Health => {
            let health = api::network::health(client)
                .await
                .context("Failed to fetch network health")?;
            print_json(&health)
        }
        NetworkCmd::Status { watch } => {
            if !watch {
                let stats = api::network::stats(client)
                    .await
                    .context("Failed to fetch network stats")?;
                return print_json(&stats);
            }
            watch_network(client, cfg).await
        }
    }
}

/// Poll network stats on the configured interval and render the block
/// height through the easing animation at ~30fps until Ctrl-C.
async fn watch_network(client: &ApiClient, cfg: &Config) -> Result<()> {
    let stats = Observed::<Option<NetworkStats>>::new(None);
    let mut poller = Poller::new(Duration::from_millis(cfg.poll_interval_ms));

    let slot = stats.clone();
    let fetch_client = client.clone();
    poller.start("network-stats", move || {
        let client = fetch_client.clone();
        let slot = slot.clone();
        async move {
            let s = api::network::stats(&client).await?;
            slot.set(Some(s));
            Ok(())
        }
        .boxed()
    });

    let mut height: Option<AnimatedValue> = None;
    let mut frames = tokio::time::interval(Duration::from_millis(33));
    loop {
        tokio::select! {
            _ = frames.tick() => {
                let now = Instant::now();
                if let Some(s) = stats.get() {
                    let av = height.get_or_insert_with(|| AnimatedValue::new(s.block_height as f64));
                    if (s.block_height as f64 - av.target()).abs() > f64::EPSILON {
                        av.retarget(s.block_height as f64, now);
                    }
                    print!(
                        "\rblock height: {:>12}   gas: {:<14}   peers: {:<4}",
                        av.display(now),
                        s.gas_price.as_deref().unwrap_or("-"),
                        s.peers.map(|p| p.to_string()).unwrap_or_else(|| "-".into()),
                    );
                    std::io::stdout().flush()?;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                poller.stop();
                println!();
                break;
            }
        }
    }
    Ok(())
}
