//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `session` - Shared utilities (snapshot loading, resolving today, JSON output)
//! - `reports` - Analytics commands (summary, trend, categories, buckets, upcoming)
//! - `reminders` - Reminder dispatch command
//! - `export` - ICS calendar export
//! - `settings` - Snapshot validation and config display

pub mod export;
pub mod reminders;
pub mod reports;
pub mod session;
pub mod settings;

// Re-export command functions for main.rs
pub use export::*;
pub use reminders::*;
pub use reports::*;
pub use session::*;
pub use settings::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
