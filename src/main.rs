use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use chatline::connector::api::{Container, ContainerConfig, Router};
use chatline::connector::{expand_tilde, DEFAULT_BASE_URL, DEFAULT_SECRETS_FILE};
use chatline::domain::{
    ProfileChoice, DEFAULT_REASONING_MODEL, DEFAULT_STANDARD_MODEL, DEFAULT_SYSTEM_INSTRUCTION,
};
use chatline::{Commands, WebServer};

#[derive(Parser)]
#[command(name = "chatline")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Model profile to start with: standard or reasoning
    #[arg(short, long, global = true, default_value = "standard")]
    profile: String,

    /// Answer offline with an echo model; no API key needed
    #[arg(long, global = true)]
    mock: bool,

    /// JSON file holding OPENAI_API_KEY
    #[arg(long, global = true, default_value = DEFAULT_SECRETS_FILE)]
    secrets_file: String,

    /// Completion API base URL [env: OPENAI_BASE_URL]
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Model behind the standard profile [env: CHATLINE_STANDARD_MODEL]
    #[arg(long, global = true)]
    standard_model: Option<String>,

    /// Model behind the reasoning profile [env: CHATLINE_REASONING_MODEL]
    #[arg(long, global = true)]
    reasoning_model: Option<String>,

    #[arg(long, global = true)]
    system_prompt: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn container_config(&self) -> Result<ContainerConfig> {
        Ok(ContainerConfig {
            mock: self.mock,
            base_url: flag_or_env(&self.base_url, "OPENAI_BASE_URL", DEFAULT_BASE_URL),
            secrets_file: PathBuf::from(expand_tilde(&self.secrets_file)),
            standard_model: flag_or_env(
                &self.standard_model,
                "CHATLINE_STANDARD_MODEL",
                DEFAULT_STANDARD_MODEL,
            ),
            reasoning_model: flag_or_env(
                &self.reasoning_model,
                "CHATLINE_REASONING_MODEL",
                DEFAULT_REASONING_MODEL,
            ),
            system_instruction: self
                .system_prompt
                .clone()
                .unwrap_or_else(|| DEFAULT_SYSTEM_INSTRUCTION.to_string()),
            profile: self.profile.parse::<ProfileChoice>()?,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = cli.container_config()?;
    let container = Container::new(config)?;

    match cli.command {
        Commands::Serve {
            port,
            public,
            idle_timeout,
        } => {
            let server = WebServer::new(Arc::new(container), port, public)
                .with_idle_timeout(Duration::from_secs(idle_timeout));
            server.run().await?;
        }
        command => {
            let router = Router::new(&container);
            let output = router.route(command).await?;
            println!("{}", output);
        }
    }

    Ok(())
}

fn flag_or_env(flag: &Option<String>, var: &str, default: &str) -> String {
    flag.clone()
        .or_else(|| std::env::var(var).ok().filter(|v| !v.trim().is_empty()))
        .unwrap_or_else(|| default.to_string())
}
