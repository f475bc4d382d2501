//! NDJSON (Newline Delimited JSON) row output

use crate::etl::Loader;

use eyre::{Context, Result};
use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
enum Target {
    File(PathBuf),
    Stdout,
}

/// Write rows as NDJSON to a file or stdout
#[derive(Debug, Clone)]
pub struct NdjsonWriter {
    target: Target,
}

impl NdjsonWriter {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            target: Target::File(path.as_ref().to_path_buf()),
        }
    }

    pub fn stdout() -> Self {
        Self {
            target: Target::Stdout,
        }
    }

    /// Render rows as NDJSON text with a trailing newline
    fn render(items: &[Value]) -> Result<String> {
        let ndjson = items
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<Vec<_>, _>>()?
            .join("\n");

        Ok(if ndjson.is_empty() {
            String::new()
        } else {
            format!("{}\n", ndjson)
        })
    }

    /// Write rows, replacing any existing file
    pub fn write(&self, items: &[Value]) -> Result<()> {
        let content = Self::render(items)?;

        match &self.target {
            Target::File(path) => std::fs::write(path, content)
                .with_context(|| format!("Failed to write NDJSON file: {}", path.display())),
            Target::Stdout => {
                let mut stdout = std::io::stdout().lock();
                stdout
                    .write_all(content.as_bytes())
                    .and_then(|_| stdout.flush())
                    .context("Failed to write NDJSON to stdout")
            }
        }
    }
}

impl Loader for NdjsonWriter {
    type Item = Value;

    async fn load(&self, items: Vec<Self::Item>) -> Result<usize> {
        self.write(&items)?;
        Ok(items.len())
    }
}
