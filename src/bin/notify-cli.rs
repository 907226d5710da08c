use std::time::Duration;

use agent_notify_sdk::{NotifyClient, Priority, DEFAULT_URL};
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "notify-cli")]
#[command(about = "Send notifications to a running agent-notify server", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = DEFAULT_URL)]
    url: String,

    /// Bearer token, when the server requires one
    #[arg(short, long, env = "AGENT_NOTIFY_TOKEN")]
    token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 5)]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Speak a message (and show a popup, if enabled on the server)
    Send {
        message: String,

        #[arg(short, long, value_enum, default_value_t = PriorityArg::Normal)]
        priority: PriorityArg,

        /// Who is sending the notification
        #[arg(short, long)]
        source: Option<String>,
    },
    /// Check that the server is up
    Health,
}

#[derive(Clone, Copy, ValueEnum)]
enum PriorityArg {
    Low,
    Normal,
    High,
}

impl From<PriorityArg> for Priority {
    fn from(arg: PriorityArg) -> Self {
        match arg {
            PriorityArg::Low => Priority::Low,
            PriorityArg::Normal => Priority::Normal,
            PriorityArg::High => Priority::High,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut client = NotifyClient::new(&cli.url).with_timeout(Duration::from_secs(cli.timeout));
    if let Some(token) = cli.token {
        client = client.with_auth_token(token);
    }

    match cli.command {
        Commands::Send {
            message,
            priority,
            source,
        } => {
            let resp = client
                .send_notification(&message, priority.into(), source.as_deref())
                .await?;
            println!("{}", resp.message);
        }
        Commands::Health => {
            let health = client.health().await?;
            println!("{} ({})", health.status, cli.url);
        }
    }

    Ok(())
}
