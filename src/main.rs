use clap::Parser;
use gridiron_agent::cli::Args;
use gridiron_agent::config::AppConfig;
use gridiron_agent::core::llm::llm_client_factory;
use gridiron_agent::core::orchestrator::Orchestrator;
use gridiron_agent::core::stats::{LiveData, client::StatsClient};
use gridiron_agent::interfaces::repl::Repl;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    // Logs go to stderr so they never interleave with the chat on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real environment variables still apply.
    dotenvy::dotenv().ok();
    init_tracing();

    let args = Args::parse();
    let config = AppConfig::load(&args)?;

    let llm = llm_client_factory(&config.llm)?;
    let live = LiveData::new(StatsClient::new(&config.stats));

    let (to_core_tx, to_core_rx) = mpsc::channel(32);
    let (from_core_tx, from_core_rx) = mpsc::channel(256);

    let orchestrator = Orchestrator::from_config(&config, llm, live, from_core_tx, to_core_rx);
    let core = tokio::spawn(orchestrator.run());

    let mut repl = Repl::new(to_core_tx, from_core_rx, config.mode);
    let stdin = BufReader::new(tokio::io::stdin());
    let result = repl.run(stdin, &mut std::io::stdout()).await;

    // Dropping the REPL closes the input channel and lets the orchestrator finish.
    drop(repl);
    core.await??;
    result
}
