use std::env;

use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::chat::{SessionStore, engine};
use crate::core::DEFAULT_SYSTEM_MESSAGE;
use crate::openai::OpenAiCompletions;
use crate::transcript::{TranscriptProvider, chunk_transcript};
use crate::youtube::YouTubeTranscripts;

pub async fn run(video_url: &str) -> Result<()> {
    // Get OpenAI API configuration from environment variables
    // (similar to AppConfig)
    let openai_api_hostname =
        env::var("RECAP_LLM_HOST").unwrap_or_else(|_| "https://api.openai.com".to_string());
    let openai_api_key =
        env::var("OPENAI_API_KEY").unwrap_or_else(|_| "thiswontworkforopenai".to_string());
    let openai_model =
        env::var("RECAP_LLM_MODEL").unwrap_or_else(|_| "gpt-4.1-mini".to_string());
    let max_chunk_chars = env::var("RECAP_MAX_CHUNK_CHARS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8000);

    let completions = OpenAiCompletions::new(&openai_api_hostname, &openai_api_key, &openai_model);

    println!("Fetching transcript for {}...", video_url);
    let items = YouTubeTranscripts::new().fetch(video_url).await?;
    let chunks = chunk_transcript(items, max_chunk_chars);

    let store = SessionStore::new();
    let (session_id, total_chunks) = store.create(chunks, DEFAULT_SYSTEM_MESSAGE)?;
    println!("Loaded {} transcript chunk(s). Ask away.", total_chunks);

    let mut rl = DefaultEditor::new().expect("Editor failed");

    loop {
        let readline = rl.readline(">>> ");
        match readline {
            Ok(line) => {
                let turn = engine::ask(&store, &session_id, &line, &completions).await?;
                println!(
                    "{}\n(chunk {}/{})",
                    turn.reply, turn.chunk_index, turn.total_chunks
                );
            }
            Err(ReadlineError::Interrupted) => break,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    Ok(())
}
