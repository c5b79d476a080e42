//! `lew`: terminal front end for the LEW estimator.

mod terminal;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use lew_estimator::credentials::DEFAULT_SECRETS_PATH;
use lew_estimator::providers::openai::DEFAULT_BASE_URL;
use lew_estimator::{
    advice, AdviceSettings, AdvisorConfig, CredentialSource, ErrorDetail, Inputs, Page,
};
use tracing_subscriber::EnvFilter;

use crate::terminal::TerminalSurface;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Credentials {
    /// TOML secrets file
    Secrets,
    /// .env file and process environment
    Dotenv,
}

#[derive(Parser, Debug)]
#[command(name = "lew", version, about = "Estimate your LEW (Life-Enhanced Wellbeing) and get guidance to improve it")]
struct Cli {
    /// Estimated remaining life expectancy in years (0-120)
    #[arg(long, default_value_t = 40.0, allow_negative_numbers = true)]
    life_expectancy: f64,

    /// WELLBY score (0-10)
    #[arg(long, default_value_t = 7.0, allow_negative_numbers = true)]
    wellby: f64,

    /// Risk adjustment factor (0.0-1.0)
    #[arg(long, default_value_t = 0.85, allow_negative_numbers = true)]
    risk: f64,

    /// Prompt for each input and re-render after every change
    #[arg(short, long)]
    interactive: bool,

    /// Where to read OPENAI_API_KEY from
    #[arg(long, value_enum, default_value = "secrets")]
    credentials: Credentials,

    /// Secrets file used with `--credentials secrets`
    #[arg(long, default_value = DEFAULT_SECRETS_PATH)]
    secrets_file: PathBuf,

    /// .env file used with `--credentials dotenv` (defaults to the nearest .env)
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Chat model identifier
    #[arg(long, env = "LEW_MODEL", default_value = advice::DEFAULT_MODEL)]
    model: String,

    /// Sampling temperature
    #[arg(long, default_value_t = advice::DEFAULT_TEMPERATURE)]
    temperature: f32,

    /// OpenAI-compatible API base URL
    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// HTTP timeout for the advice request, in seconds
    #[arg(long, default_value_t = 60)]
    timeout_secs: u64,

    /// Show only the generic banner when advice generation fails
    #[arg(long)]
    hide_error_details: bool,
}

impl Cli {
    fn advisor_config(&self) -> AdvisorConfig {
        let source = match self.credentials {
            Credentials::Secrets => CredentialSource::Secrets {
                path: self.secrets_file.clone(),
            },
            Credentials::Dotenv => CredentialSource::DotEnv {
                path: self.env_file.clone(),
            },
        };

        AdvisorConfig {
            settings: AdviceSettings {
                model: self.model.clone(),
                temperature: self.temperature,
            },
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            source,
        }
    }

    fn page(&self) -> Page {
        if self.hide_error_details {
            Page::new(ErrorDetail::Hidden)
        } else {
            Page::new(ErrorDetail::Shown)
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let advisor = cli.advisor_config().advisor()?;
    let page = cli.page();
    let mut surface = TerminalSurface::new();
    let mut inputs = Inputs::with_values(cli.life_expectancy, cli.wellby, cli.risk);

    if !cli.interactive {
        page.render(&inputs, advisor.as_ref(), &mut surface).await;
        return Ok(());
    }

    loop {
        terminal::prompt_inputs(&mut inputs)?;
        page.render(&inputs, advisor.as_ref(), &mut surface).await;
        if !terminal::confirm_adjust()? {
            return Ok(());
        }
    }
}
