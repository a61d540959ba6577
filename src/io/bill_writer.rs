//! Billing output - writes one `user_id,amount` row per rider
//!
//! No header row. Rows follow the ascending user id order of `Bills` and
//! amounts always carry two decimal places. Rows are staged in a temporary
//! file next to the destination and renamed over it only once fully flushed,
//! so a failed run never leaves a partial file and never clobbers the
//! previous one. Rerunning over the same input reproduces it byte for byte.

use crate::domain::{Bills, Money};
use anyhow::Context;
use csv::{Writer, WriterBuilder};
use std::fs::File;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Render an amount the way it appears in the billing file
pub fn format_amount(amount: Money) -> String {
    format!("{:.2}", amount.round_dp(2))
}

/// Replace `path` with whatever `write_rows` produces, or leave it untouched
///
/// The staged file is removed when `write_rows`, the flush, or the rename
/// fails.
fn replace_file<F>(path: &Path, write_rows: F) -> anyhow::Result<()>
where
    F: FnOnce(&mut Writer<&mut File>) -> anyhow::Result<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    // Create parent directories if they don't exist
    if !dir.exists() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    }

    let mut staged = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to stage output file in {}", dir.display()))?;

    {
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(staged.as_file_mut());
        write_rows(&mut writer)?;
        writer.flush().with_context(|| format!("Failed to flush output file {}", path.display()))?;
    }
    staged
        .as_file()
        .sync_all()
        .with_context(|| format!("Failed to sync output file {}", path.display()))?;

    staged
        .persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to replace output file {}", path.display()))?;
    Ok(())
}

/// Writer for the billing CSV
pub struct BillWriter {
    file_path: String,
}

impl BillWriter {
    pub fn new(file_path: &str) -> Self {
        Self { file_path: file_path.to_string() }
    }

    /// Write all bills, returning the number of rows written
    pub fn write_bills(&self, bills: &Bills) -> anyhow::Result<usize> {
        let path = Path::new(&self.file_path);

        replace_file(path, |writer| {
            for (user, amount) in bills {
                let amount = format_amount(*amount);
                debug!(user = %user, amount = %amount, "bill_row");
                writer
                    .write_record([user.as_str(), amount.as_str()])
                    .with_context(|| format!("Failed to write output file {}", path.display()))?;
            }
            Ok(())
        })?;

        info!(file = %self.file_path, rows = %bills.len(), "bills_written");
        Ok(bills.len())
    }
}
