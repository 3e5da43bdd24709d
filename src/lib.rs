//! recap — a backend for multi-turn conversations about long video
//! transcripts, plus AI-curated playlist recommendations.

pub mod api;
pub mod chat;
pub mod cli;
pub mod core;
pub mod jobs;
pub mod openai;
pub mod ratelimit;
pub mod recommend;
pub mod transcript;
pub mod youtube;
