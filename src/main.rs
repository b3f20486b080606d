use std::path::PathBuf;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use spotify_current_playing::{cli, config, error, poller::OutputOptions, warning};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// Print each change as a JSON object
    #[clap(long, global = true)]
    json: bool,

    /// Exit after the first change
    #[clap(long, global = true)]
    oneshot: bool,

    /// Log every poll, not just changes
    #[clap(short, long, global = true)]
    verbose: bool,

    /// Credential file to use instead of the default location
    #[clap(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify again and store the new token
    Auth,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        warning!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    let mut settings = config::Settings::from_env();
    if let Some(path) = cli.config {
        settings.config_file = path;
    }

    match cli.command {
        None => {
            let options = OutputOptions {
                json: cli.json,
                oneshot: cli.oneshot,
                verbose: cli.verbose,
            };
            cli::watch(settings, options).await
        }
        Some(Command::Auth) => {
            if let Err(e) = cli::auth(&settings).await {
                error!("Authorization failed: {}", e);
            }
        }
        Some(Command::Completions(opt)) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
