// Rust guideline compliant 2026-02-06

//! Common interface of the metering file parsers.

use crate::series::SeriesOptions;
use crate::{Error, Frame, Result, TimeSeries, UniDocument};

/// Views every metering file parser can offer.
///
/// `frame` is always available; the time-series and metadata views exist only
/// for layouts that carry enough structure and return `Error::Unsupported`
/// otherwise.
pub trait MeteringParser {
    /// Short human-readable name of the layout, e.g. `MIG 3.0 export 91`.
    fn layout_name(&self) -> String;

    /// Returns the underlying document.
    fn document(&self) -> &UniDocument;

    /// Returns the number of parsed body records.
    fn record_count(&self) -> usize;

    /// Returns the parsed body as a table.
    ///
    /// # Errors
    ///
    /// Returns an error if the records cannot be tabulated.
    fn frame(&self) -> Result<Frame>;

    /// Returns the body as time series.
    ///
    /// # Errors
    ///
    /// Returns `Error::Unsupported` unless the layout implements it.
    fn timeseries(&self, options: &SeriesOptions) -> Result<Vec<TimeSeries>> {
        let _ = options;
        Err(Error::Unsupported(format!(
            "No timeseries method implemented for {}",
            self.layout_name()
        )))
    }

    /// Returns per-channel metadata as a table.
    ///
    /// # Errors
    ///
    /// Returns `Error::Unsupported` unless the layout implements it.
    fn metadata(&self, allow_duplicate_names: bool) -> Result<Frame> {
        let _ = allow_duplicate_names;
        Err(Error::Unsupported(format!(
            "No metadata method implemented for {}",
            self.layout_name()
        )))
    }
}
