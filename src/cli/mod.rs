use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod chat;
pub mod recommend;
pub mod serve;

#[derive(Subcommand)]
enum Command {
    /// Run the API server
    Serve {
        /// Set the server host address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Set the server port
        #[arg(long, default_value = "3001")]
        port: String,
    },
    /// Start an interactive chat session about a video
    Chat {
        /// URL of the video whose transcript to load
        #[arg(long)]
        video_url: String,
    },
    /// Print an AI-curated playlist for a topic
    Recommend {
        #[arg(long)]
        topic: String,
    },
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();

    // Handle each sub command
    match args.command {
        Some(Command::Serve { host, port }) => {
            serve::run(host, port).await;
        }
        Some(Command::Chat { video_url }) => {
            chat::run(&video_url).await?;
        }
        Some(Command::Recommend { topic }) => {
            recommend::run(&topic).await?;
        }
        None => {}
    }

    Ok(())
}
