// Rust guideline compliant 2026-02-09

//! File kind detection and opening.

use crate::error::{AppError, Result};
use ediel_core::{
    detect_export, match_filename, Config, ExportKind, Frame, MeteringParser, MigFile,
    SeriesOptions, TimeSeries, TwoWireMmr, UniDocument,
};
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

const FORMAT_KEY: &str = "Format";
const TWO_WIRE_FORMAT_PREFIX: &str = "MMR";

/// Which parser to use for a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    /// Decide from the file name and header.
    #[default]
    Auto,
    /// MIG 3.0 export, selected by file name.
    Mig,
    /// Two-wire MMR file.
    TwoWire,
}

impl FromStr for FileKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "auto" => Ok(FileKind::Auto),
            "mig" => Ok(FileKind::Mig),
            "two_wire" | "two-wire" | "twowire" => Ok(FileKind::TwoWire),
            _ => Err(AppError::InvalidInput(format!(
                "Invalid file kind: {} (expected auto, mig, or two_wire)",
                value
            ))),
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileKind::Auto => "auto",
            FileKind::Mig => "mig",
            FileKind::TwoWire => "two_wire",
        };
        f.write_str(name)
    }
}

/// A parsed metering file of either family.
#[derive(Debug, Clone)]
pub enum MeteringFile {
    /// MIG 3.0 export.
    Mig(MigFile),
    /// Two-wire MMR file.
    TwoWire(TwoWireMmr),
}

impl MeteringFile {
    /// Returns the concrete kind of the file.
    #[must_use]
    pub fn kind(&self) -> FileKind {
        match self {
            MeteringFile::Mig(_) => FileKind::Mig,
            MeteringFile::TwoWire(_) => FileKind::TwoWire,
        }
    }

    /// Returns the MIG export kind, if this is a MIG file.
    #[must_use]
    pub fn export(&self) -> Option<ExportKind> {
        match self {
            MeteringFile::Mig(file) => Some(file.kind()),
            MeteringFile::TwoWire(_) => None,
        }
    }

    fn parser(&self) -> &dyn MeteringParser {
        match self {
            MeteringFile::Mig(file) => file,
            MeteringFile::TwoWire(file) => file,
        }
    }
}

impl MeteringParser for MeteringFile {
    fn layout_name(&self) -> String {
        self.parser().layout_name()
    }

    fn document(&self) -> &UniDocument {
        self.parser().document()
    }

    fn record_count(&self) -> usize {
        self.parser().record_count()
    }

    fn frame(&self) -> ediel_core::Result<Frame> {
        self.parser().frame()
    }

    fn timeseries(&self, options: &SeriesOptions) -> ediel_core::Result<Vec<TimeSeries>> {
        self.parser().timeseries(options)
    }

    fn metadata(&self, allow_duplicate_names: bool) -> ediel_core::Result<Frame> {
        self.parser().metadata(allow_duplicate_names)
    }
}

fn path_text(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Determines the kind of an already-read document.
///
/// # Arguments
///
/// * `path` - Path the document was read from
/// * `document` - The parsed document
///
/// # Returns
///
/// `FileKind::Mig` when the path follows the MIG naming pattern,
/// `FileKind::TwoWire` when the `Format` property starts with `MMR`.
///
/// # Errors
///
/// Returns `AppError::UnknownKind` when neither applies.
pub fn detect_kind(path: &Path, document: &UniDocument) -> Result<FileKind> {
    if match_filename(&path_text(path)).is_some() {
        return Ok(FileKind::Mig);
    }
    let is_two_wire = document
        .property(FORMAT_KEY)
        .is_some_and(|format| format.first().starts_with(TWO_WIRE_FORMAT_PREFIX));
    if is_two_wire {
        return Ok(FileKind::TwoWire);
    }
    Err(AppError::UnknownKind {
        path: path.to_path_buf(),
    })
}

/// Reads and parses a metering file.
///
/// # Arguments
///
/// * `path` - File to open
/// * `kind` - Parser selection; `Auto` detects it
/// * `config` - Parse settings
///
/// # Returns
///
/// The parsed file.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be read or is not a UNIFORMAT document
/// - The kind cannot be detected
/// - The body does not fit the selected layout
pub fn open_file(path: &Path, kind: FileKind, config: &Config) -> Result<MeteringFile> {
    let document = UniDocument::open(path, &config.parse_options())?;
    let kind = match kind {
        FileKind::Auto => detect_kind(path, &document)?,
        explicit => explicit,
    };
    tracing::debug!(path = %path.display(), %kind, "opening metering file");

    match kind {
        FileKind::TwoWire => Ok(MeteringFile::TwoWire(TwoWireMmr::from_document(document)?)),
        _ => {
            let export = detect_export(&path_text(path))?;
            Ok(MeteringFile::Mig(MigFile::from_document(export, document)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_kind_from_str() {
        assert_eq!("auto".parse::<FileKind>().unwrap(), FileKind::Auto);
        assert_eq!("MIG".parse::<FileKind>().unwrap(), FileKind::Mig);
        assert_eq!("two-wire".parse::<FileKind>().unwrap(), FileKind::TwoWire);
        assert!(matches!(
            "csv".parse::<FileKind>(),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_file_kind_display_round_trip() {
        for kind in [FileKind::Auto, FileKind::Mig, FileKind::TwoWire] {
            assert_eq!(kind.to_string().parse::<FileKind>().unwrap(), kind);
        }
    }
}
