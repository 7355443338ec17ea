use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use release_herald::{Action, ProjectInfo, Settings};

#[derive(Parser, Debug)]
#[command(name = "herald", version, about = "Announce a release on Twitter")]
pub struct Cli {
    /// JSON settings file; flags and environment variables override its values.
    #[arg(long, short = 'c', global = true, env = "HERALD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(flatten)]
    pub settings: SettingsArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Post a status update.
    Tweet,
    /// Send a direct message.
    Dm {
        /// Screen name of the recipient.
        #[arg(long, env = "HERALD_RECIPIENT_SCREEN_NAME")]
        recipient: Option<String>,
    },
}

#[derive(Args, Debug, Default)]
pub struct SettingsArgs {
    #[arg(long, global = true, env = "HERALD_CONSUMER_KEY", hide_env_values = true)]
    pub consumer_key: Option<String>,
    #[arg(long, global = true, env = "HERALD_CONSUMER_SECRET", hide_env_values = true)]
    pub consumer_secret: Option<String>,
    #[arg(long, global = true, env = "HERALD_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,
    #[arg(long, global = true, env = "HERALD_ACCESS_TOKEN_SECRET", hide_env_values = true)]
    pub access_token_secret: Option<String>,
    /// Text to send. Defaults to "<artifact>:<version> released! [url]".
    #[arg(long, short = 'm', global = true, env = "HERALD_MESSAGE")]
    pub message: Option<String>,
    /// Where the access token and send logs are kept.
    #[arg(long, global = true, env = "HERALD_WORK_DIRECTORY")]
    pub work_directory: Option<PathBuf>,
    /// Base URL of the API, for proxies and test servers.
    #[arg(long, global = true, env = "HERALD_API_BASE")]
    pub api_base: Option<String>,
    #[arg(long, global = true, env = "HERALD_ARTIFACT_ID")]
    pub artifact_id: Option<String>,
    #[arg(long = "project-version", global = true, env = "HERALD_PROJECT_VERSION")]
    pub project_version: Option<String>,
    #[arg(long, global = true, env = "HERALD_PROJECT_URL")]
    pub project_url: Option<String>,
}

impl Cli {
    pub fn action(&self) -> Action {
        match self.command {
            Command::Tweet => Action::PostStatus,
            Command::Dm { .. } => Action::DirectMessage,
        }
    }

    /// Settings given on the command line or through the environment.
    pub fn overrides(&self) -> Settings {
        let args = &self.settings;
        let recipient_screen_name = match &self.command {
            Command::Dm { recipient } => recipient.clone(),
            Command::Tweet => None,
        };
        Settings {
            consumer_key: args.consumer_key.clone(),
            consumer_secret: args.consumer_secret.clone(),
            access_token: args.access_token.clone(),
            access_token_secret: args.access_token_secret.clone(),
            message: args.message.clone(),
            recipient_screen_name,
            work_directory: args.work_directory.clone(),
            api_base: args.api_base.clone(),
            project: ProjectInfo {
                artifact_id: args.artifact_id.clone(),
                version: args.project_version.clone(),
                url: args.project_url.clone(),
            },
        }
    }
}
