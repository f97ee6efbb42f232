use std::fs::OpenOptions;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use graft::util::DataDir;
use graft::{App, Config};

#[derive(Parser, Debug)]
#[command(author, version, about = "Interactive superstep debugger for graph jobs")]
struct Args {
    /// Debugger server root URL (overrides the config file)
    #[arg(long)]
    server: Option<String>,
    /// Data directory for config, logs and captures (default: ~/.graft)
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Start debugging this job immediately
    #[arg(long)]
    job: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let data_dir = DataDir::resolve(args.data_dir);

    // Log to <data dir>/logs/graft.log; stdout belongs to the console
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(data_dir.prepare_log_file()?)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .init();

    let mut config = Config::load(data_dir);
    if let Some(server) = args.server {
        config = config.with_server_root(server);
    }

    let mut app = App::new(config)?;
    app.run(args.job).await
}
