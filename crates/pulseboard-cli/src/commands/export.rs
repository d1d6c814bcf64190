//! Export command implementations

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use pulseboard_core::ics::subscription_to_ics;
use pulseboard_core::Error;
use tempfile::NamedTempFile;

use super::Session;

/// Write `id`'s renewal schedule as iCalendar to `output`, or stdout
pub fn cmd_ics(session: &Session, id: &str, output: Option<&Path>) -> Result<()> {
    let subscription = session
        .snapshot
        .find(id)
        .ok_or_else(|| Error::NotFound(id.to_string()))?;

    let ics = subscription_to_ics(subscription, Utc::now());

    match output {
        Some(path) => {
            write_atomically(path, ics.as_bytes())?;
            println!(
                "📅 Exported {} renewal calendar to {}",
                subscription.name,
                path.display()
            );
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(ics.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}

/// Write through a temp file in the target directory, then rename into place
fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
    file.write_all(bytes).context("Failed to write calendar")?;
    file.persist(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
