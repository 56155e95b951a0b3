/*!
# riji

riji (日記) is a personal diary with AI-generated insights. Users write
dated entries (text + optional photo), browse them, and view a
daily-refreshed analysis snapshot: encouragement feedback, per-day
happiness scores, emotion proportions, frequent words, and a
"most positive entry" pick, all produced by a remote chat-completion API.

## Architecture

The codebase follows a modular architecture with clear separation of concerns:

- `cli`: Command-line interface handling using clap
- `config`: Configuration loading and validation
- `errors`: Error handling infrastructure
- `dates`: Compact `yyyyMMdd` date handling and analysis windows
- `db`: SQLite storage for entries, snapshots, and scheduler state
- `ai`: Chat-completion client, prompt builders, and reply parsers
- `ops`: High-level operations (the analysis barrier, refresh, messages)
- `scheduler`: Background daily trigger loops

## Usage Example

```rust,no_run
use riji::db::Database;
use riji::Config;

fn main() -> riji::AppResult<()> {
    // Load configuration and open the diary database
    let config = Config::load()?;
    config.ensure_data_dir()?;

    let db = Database::open(&config.db_path())?;
    db.initialize_schema()?;
    Ok(())
}
```
*/

/// Chat-completion client, prompts, and reply parsers
pub mod ai;
/// Command-line interface for parsing and handling user arguments
pub mod cli;
/// Configuration loading and management
pub mod config;
/// Centralized application constants
pub mod constants;
/// Compact date handling and analysis windows
pub mod dates;
/// SQLite storage for entries, snapshots, and scheduler state
pub mod db;
/// Error types and utilities for error handling
pub mod errors;
/// High-level diary-insight operations
pub mod ops;
/// Background daily trigger loops
pub mod scheduler;

// Re-export important types for convenience
pub use cli::Cli;
pub use config::{Config, RefreshPolicy};
pub use errors::{AppError, AppResult};
