// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use serde_json::Value;
use std::io::Write;
use std::path::PathBuf;

use podenhance::app_config::{Config, LogLevel};
use podenhance::captions::{entries_from_json, to_subtitle_track};
use podenhance::catalog::StaticDisciplineCatalog;
use podenhance::enhancement::{EnhancementApi, EnhancementClient, EnhancementRequest};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List all enhancements
    List,

    /// Show one enhancement
    Get {
        /// Enhancement identifier
        id: String,
    },

    /// Request an enhancement for a media URL
    Create {
        /// Publicly reachable media URL
        #[arg(long)]
        url: String,

        /// Media type to process (repeatable)
        #[arg(long = "media-type", required = true)]
        media_types: Vec<String>,

        /// End user identifier
        #[arg(long)]
        user: String,

        /// Webhook called when the enhancement is ready
        #[arg(long)]
        webhook: String,
    },

    /// Show the latest version of an enhancement
    Latest {
        id: String,
    },

    /// List the versions of an enhancement
    Versions {
        id: String,

        /// Leave transcripts out of the listing
        #[arg(long)]
        without_transcript: bool,
    },

    /// Show one version of an enhancement
    Version {
        id: String,
        version_id: String,
    },

    /// Build a subtitle track from the latest version of an enhancement
    Captions {
        id: String,

        /// Video duration in seconds; later captions are dropped or clipped
        #[arg(long)]
        duration: f64,

        /// Write the track to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate shell completions for podenhance
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// podenhance - AI enhancement client for a video platform
///
/// Requests AI transcriptions of videos and converts them to subtitle tracks.
#[derive(Parser, Debug)]
#[command(name = "podenhance")]
#[command(version)]
#[command(about = "AI enhancement service client")]
#[command(long_about = "podenhance talks to the AI enhancement service and converts transcripts to subtitles.

EXAMPLES:
    podenhance list                                   # List enhancements
    podenhance get 42                                 # Show one enhancement
    podenhance versions 42 --without-transcript       # List versions without transcripts
    podenhance captions 42 --duration 600 -o out.vtt  # Write subtitles for a 10 minute video
    podenhance completions bash > podenhance.bash     # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Enhancement service base URL
    #[arg(long, env = "PODENHANCE_API_URL")]
    api_url: Option<String>,

    /// Client id for the token exchange
    #[arg(long, env = "PODENHANCE_CLIENT_ID")]
    client_id: Option<String>,

    /// Client secret for the token exchange
    #[arg(long, env = "PODENHANCE_CLIENT_SECRET", hide_env_values = true)]
    client_secret: Option<String>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger { level: LevelFilter::Trace }))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour and tag for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (colour, tag) = Self::style_for_level(record.level());
            let _ = writeln!(
                std::io::stderr(),
                "{}{} {} {}\x1B[0m",
                colour, now, tag, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn print_json(value: &Value) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to format JSON output")?;
    println!("{}", text);
    Ok(())
}

fn load_config(options: &CommandLineOptions) -> Result<Config> {
    let mut config = Config::load_or_create(&options.config_path)?;

    if let Some(level) = &options.log_level {
        config.log_level = level.clone().into();
    }
    if let Some(api_url) = &options.api_url {
        config.api.base_url = api_url.clone();
    }
    if let Some(client_id) = &options.client_id {
        config.credentials.client_id = client_id.clone();
    }
    if let Some(client_secret) = &options.client_secret {
        config.credentials.client_secret = client_secret.clone();
    }

    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    CustomLogger::init(LevelFilter::Info)?;

    let options = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &options.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "podenhance", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&options)?;
    log::set_max_level((&config.log_level).into());

    let catalog = StaticDisciplineCatalog::new(config.disciplines.clone());
    let client = EnhancementClient::new(config.api.clone(), config.credentials.clone());

    match options.command {
        Commands::List => print_json(&client.list_enhancements().await?)?,
        Commands::Get { id } => print_json(&client.get_enhancement(&id).await?)?,
        Commands::Create { url, media_types, user, webhook } => {
            let request = media_types
                .into_iter()
                .fold(EnhancementRequest::new(url, user, webhook), |request, media_type| {
                    request.media_type(media_type)
                });
            match client.create_from_url(&request, &catalog).await? {
                Some(answer) => print_json(&answer)?,
                None => info!("Enhancement requested, the service returned no body"),
            }
        }
        Commands::Latest { id } => print_json(&client.get_latest_version(&id).await?)?,
        Commands::Versions { id, without_transcript } => {
            print_json(&client.list_versions(&id, !without_transcript).await?)?
        }
        Commands::Version { id, version_id } => {
            print_json(&client.get_version(&id, &version_id).await?)?
        }
        Commands::Captions { id, duration, output } => {
            if !(duration.is_finite() && duration > 0.0) {
                return Err(anyhow!("Duration must be a positive number of seconds"));
            }
            let version = client.get_latest_version(&id).await?;
            let entries = entries_from_json(&version)?;
            let track = to_subtitle_track(&entries, duration);
            match output {
                Some(path) => {
                    track.save(&path)?;
                    info!("Wrote {} captions to {}", track.len(), path.display());
                }
                None => print!("{}", track),
            }
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}
