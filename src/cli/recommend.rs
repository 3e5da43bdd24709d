use std::env;

use anyhow::Result;

use crate::openai::OpenAiCompletions;
use crate::recommend::recommend_playlist;
use crate::youtube::YouTubeSearch;

pub async fn run(topic: &str) -> Result<()> {
    let openai_api_hostname =
        env::var("RECAP_LLM_HOST").unwrap_or_else(|_| "https://api.openai.com".to_string());
    let openai_api_key =
        env::var("OPENAI_API_KEY").unwrap_or_else(|_| "thiswontworkforopenai".to_string());
    let openai_model =
        env::var("RECAP_LLM_MODEL").unwrap_or_else(|_| "gpt-4.1-mini".to_string());
    let youtube_api_key =
        env::var("RECAP_YOUTUBE_API_KEY").expect("Missing env var RECAP_YOUTUBE_API_KEY");

    let completions = OpenAiCompletions::new(&openai_api_hostname, &openai_api_key, &openai_model);
    let search = YouTubeSearch::new(&youtube_api_key);

    let recommendation = recommend_playlist(topic, &completions, &search).await?;

    println!("{}\n", recommendation.explanation);
    for video in recommendation.videos {
        println!(
            "- {} ({}) https://www.youtube.com/watch?v={}",
            video.title, video.channel_title, video.id
        );
    }

    Ok(())
}
