//! AI operations for diary insights.
//!
//! This module provides integration with a remote chat-completion API for
//! the diary analyses: encouragement feedback, weekly happiness scores,
//! emotion proportions, frequent words, and the most-positive-entry pick.
//!
//! # Module Structure
//!
//! - `client`: HTTP client for the chat-completion API
//! - `prompts`: System prompt and message builders
//! - `parse`: Defensive parsers for the model's free-text replies
//!
//! # Example
//!
//! ```no_run
//! use riji::ai::{ChatClient, Message};
//!
//! # async fn demo() -> riji::AppResult<()> {
//! let client = ChatClient::new(
//!     "https://api.openai.com/v1",
//!     Some("sk-...".to_string()),
//!     "gpt-4",
//!     20,
//! )?;
//! let messages = vec![Message::system("你是誰？"), Message::user("你好")];
//! let reply = client.complete(&messages, 50, 0.7).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod parse;
pub mod prompts;

// Re-export commonly used types
pub use client::{ChatClient, Message};
pub use parse::{DailyHappiness, Emotion, EmotionData, WordCount};
