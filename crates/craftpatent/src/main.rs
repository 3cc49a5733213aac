use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use craftpatent::commands::{self, InputSource};
use craftpatent::config::{ClientConfig, TimeoutPolicy, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};

#[derive(Parser)]
#[command(name = "craftpatent")]
#[command(about = "CraftPatent - AI patent assessment")]
#[command(
  long_about = "Scores a patent disclosure for novelty, clarity, claims and industrial applicability"
)]
#[command(version)]
struct Cli {
  /// Base URL of the assessment service
  #[arg(long, global = true, env = "CRAFTPATENT_API_URL", default_value = DEFAULT_API_URL)]
  api_url: String,

  /// Per-request timeout in seconds
  #[arg(
    long,
    global = true,
    env = "CRAFTPATENT_TIMEOUT_SECS",
    default_value_t = DEFAULT_TIMEOUT_SECS
  )]
  timeout_secs: u64,

  /// Log request and poll details to stderr
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Submit a disclosure for assessment and print the results
  Assess {
    /// File containing the disclosure ("-" reads stdin)
    #[arg(conflicts_with_all = ["text", "sample"])]
    file: Option<PathBuf>,
    /// Disclosure text given inline
    #[arg(long, conflicts_with = "sample")]
    text: Option<String>,
    /// Assess the bundled sample disclosure
    #[arg(long)]
    sample: bool,
    /// User the session is created under
    #[arg(long, env = "CRAFTPATENT_USER", default_value = "user")]
    user: String,
    /// What to do when the service does not answer in time
    #[arg(long, value_enum, default_value_t = TimeoutPolicy::Error)]
    on_timeout: TimeoutPolicy,
    /// Print the result as JSON
    #[arg(long)]
    json: bool,
  },
  /// Print the raw state of an existing session
  Status {
    /// Session identifier returned by a previous submission
    session_id: String,
    /// User the session belongs to
    #[arg(long, env = "CRAFTPATENT_USER", default_value = "user")]
    user: String,
  },
  /// Print a sample disclosure
  Sample,
}

fn init_tracing(verbose: bool) {
  let default_level = if verbose { "craftpatent=debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
  tracing_subscriber::registry()
    .with(fmt::layer().with_writer(std::io::stderr))
    .with(filter)
    .init();
}

fn input_source(file: Option<PathBuf>, text: Option<String>, sample: bool) -> InputSource {
  match (file, text, sample) {
    (_, _, true) => InputSource::Sample,
    (_, Some(text), _) => InputSource::Text(text),
    (Some(path), _, _) if path.as_os_str() != "-" => InputSource::File(path),
    _ => InputSource::Stdin,
  }
}

async fn handle(cli: Cli) -> Result<()> {
  let base = ClientConfig {
    base_url: cli.api_url,
    timeout_secs: cli.timeout_secs,
    ..ClientConfig::from_env()
  };

  match cli.command {
    Command::Assess { file, text, sample, user, on_timeout, json } => {
      let config = ClientConfig { user_id: user, ..base }.with_timeout_policy(on_timeout);
      commands::assess(config, input_source(file, text, sample), json).await
    }
    Command::Status { session_id, user } => {
      commands::status(ClientConfig { user_id: user, ..base }, &session_id).await
    }
    Command::Sample => {
      commands::sample();
      Ok(())
    }
  }
}

#[tokio::main]
async fn main() {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  if let Err(e) = handle(cli).await {
    bentley::error(&format!("{e:#}"));
    process::exit(1);
  }
}
