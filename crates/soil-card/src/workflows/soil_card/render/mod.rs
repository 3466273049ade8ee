mod json;
mod pdf;

pub use json::JsonRenderer;
pub use pdf::PdfRenderer;

use super::document::ReportDocument;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::io::Write;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("unable to encode card: {0}")]
    Encode(String),
    #[error("unable to write card to {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Turns an assembled card into bytes on disk. Implementations only encode;
/// the default `render` owns the all-or-nothing write.
pub trait DocumentRenderer: Debug {
    fn file_extension(&self) -> &'static str;

    fn encode(&self, document: &ReportDocument) -> Result<Vec<u8>, RenderError>;

    fn render(&self, document: &ReportDocument, path: &Path) -> Result<(), RenderError> {
        let bytes = self.encode(document)?;
        write_atomically(path, &bytes)
    }
}

/// Output backends selectable from configuration and the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Pdf,
    Json,
}

impl OutputFormat {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    pub fn renderer(self) -> Box<dyn DocumentRenderer> {
        match self {
            Self::Pdf => Box::new(PdfRenderer::new()),
            Self::Json => Box::new(JsonRenderer),
        }
    }
}

/// Writes `bytes` to a temporary file beside `path` and renames it into
/// place, so the target is either complete or absent.
pub fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), RenderError> {
    let write_error = |source: std::io::Error| RenderError::Write {
        path: path.display().to_string(),
        source,
    };

    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = tempfile::NamedTempFile::new_in(directory).map_err(write_error)?;
    staged.write_all(bytes).map_err(write_error)?;
    staged.as_file().sync_all().map_err(write_error)?;
    staged
        .persist(path)
        .map_err(|err| write_error(err.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atomic_write_replaces_existing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let target = dir.path().join("card.pdf");
        std::fs::write(&target, b"stale").expect("seed file");

        write_atomically(&target, b"fresh").expect("write succeeds");

        assert_eq!(std::fs::read(&target).expect("read back"), b"fresh");
        let leftovers = std::fs::read_dir(dir.path()).expect("list dir").count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn failed_write_creates_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let target = dir.path().join("missing").join("card.pdf");

        let error = write_atomically(&target, b"data").expect_err("parent is missing");

        assert!(matches!(error, RenderError::Write { .. }));
        assert!(!target.exists());
    }

    #[test]
    fn output_format_parses_case_insensitively() {
        assert_eq!(OutputFormat::parse(" PDF "), Some(OutputFormat::Pdf));
        assert_eq!(OutputFormat::parse("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("docx"), None);
        assert_eq!(OutputFormat::Json.renderer().file_extension(), "json");
    }
}
