use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use switchboard_core::config::{ConfigSource, FileConfig, SwitchboardConfig};
use switchboard_core::tool::{to_definitions, Tool};
use switchboard_slack::{dispatch, SlackTool, SlackWebClient};
use switchboard_stream::{resolve_chunking, BlockChunker};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(
    name = "switchboard",
    version,
    about = "Dispatch Slack actions and resolve streaming chunk bounds"
)]
struct Cli {
    /// Config file (defaults to $SWITCHBOARD_CONFIG or ~/.switchboard/switchboard.toml)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one slack action, e.g. '{"action":"listPins","channelId":"C1"}'
    Action {
        /// Flat JSON object with an `action` key plus its parameters
        request: String,
    },
    /// Print block-streaming chunk bounds for a surface
    Chunking {
        /// Target surface (slack, discord, telegram, ...)
        #[arg(long)]
        surface: Option<String>,
        /// Also split this file's contents with the resolved bounds
        #[arg(long)]
        text_file: Option<String>,
    },
    /// Print the slack tool definition (name, description, input JSON schema)
    Schema,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "switchboard=info,switchboard_slack=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let source = FileConfig::new(cli.config.clone());

    match cli.command {
        Commands::Action { request } => run_action(&source, &request).await,
        Commands::Chunking { surface, text_file } => {
            run_chunking(&source, surface.as_deref(), text_file.as_deref())
        }
        Commands::Schema => {
            // schema output never calls Slack, so no token is needed
            let client = Arc::new(SlackWebClient::with_token(None));
            let tool = SlackTool::new(client, Arc::new(source));
            let tools: Vec<Box<dyn Tool>> = vec![Box::new(tool)];
            println!("{}", serde_json::to_string_pretty(&to_definitions(&tools))?);
            Ok(())
        }
    }
}

async fn run_action(source: &dyn ConfigSource, request: &str) -> anyhow::Result<()> {
    let params: serde_json::Value =
        serde_json::from_str(request).context("request is not valid JSON")?;
    let serde_json::Value::Object(params) = params else {
        bail!("request must be a JSON object");
    };

    let config = source.snapshot()?;
    // a missing token only surfaces once the request passes validation
    let client = build_client(&config);

    info!(action = ?params.get("action"), "running slack action");
    let envelope = dispatch(&params, &config, &client).await?;
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

fn run_chunking(
    source: &dyn ConfigSource,
    surface: Option<&str>,
    text_file: Option<&str>,
) -> anyhow::Result<()> {
    let config = source.snapshot()?;
    let bounds = resolve_chunking(&config, surface);
    println!("{}", serde_json::to_string_pretty(&bounds)?);

    if let Some(path) = text_file {
        let text = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
        let chunks = BlockChunker::split(bounds, &text);
        debug!(chunks = chunks.len(), "split text file");
        println!("{}", serde_json::to_string_pretty(&chunks)?);
    }
    Ok(())
}

/// Token from `[slack] bot_token`, else `SLACK_BOT_TOKEN`.
fn build_client(config: &SwitchboardConfig) -> SlackWebClient {
    let token = config
        .slack
        .as_ref()
        .and_then(|s| s.bot_token.clone())
        .or_else(|| std::env::var("SLACK_BOT_TOKEN").ok());
    SlackWebClient::with_token(token)
}
