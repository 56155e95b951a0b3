//! The standalone daily encouragement message.

use crate::ai::client::ChatClient;
use crate::ai::prompts;
use crate::constants::ANALYSIS_TEMPERATURE;
use crate::errors::AppResult;
use tracing::info;

/// Fetches a short encouraging line for today.
///
/// This is a one-shot call independent of the daily snapshot; the caller
/// decides how to present a failure (the CLI falls back to the fixed
/// placeholder text).
///
/// # Errors
///
/// Returns an error if the remote call fails.
pub async fn daily_message(client: &ChatClient) -> AppResult<String> {
    info!("Fetching daily encouragement message");

    let messages = prompts::daily_message_prompt();
    client
        .complete(
            &messages,
            prompts::MAX_TOKENS_DAILY_MESSAGE,
            ANALYSIS_TEMPERATURE,
        )
        .await
}
