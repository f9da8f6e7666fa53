//! sheetread-core: Excel/ODS worksheet extraction
//!
//! This library reads spreadsheet containers and turns every worksheet into
//! an ordered list of records, keyed either by column label or by the names
//! found in a header row.

pub mod config;
pub mod error;
pub mod normalize;
pub mod plugin;
pub mod reader;
pub mod reference;
pub mod value;

use reader::Workbook;
use std::path::Path;
use tracing::debug;

pub use config::ReaderConfig;
pub use error::{CellError, ReadError, Result};
pub use normalize::{HeaderAlignment, HeaderSpec, Record, SheetRecords};
pub use plugin::{HostContext, ReadOptions, ReaderPlugin};
pub use value::Value;

/// Reader plugin turning spreadsheet payloads into worksheet records
#[derive(Debug, Clone)]
pub struct ExcelReader {
    name: String,
    config: ReaderConfig,
}

impl ExcelReader {
    /// Create a reader with default configuration
    pub fn new() -> Self {
        Self::activate(HostContext::default())
    }

    /// Create a reader with custom configuration
    pub fn with_config(config: ReaderConfig) -> Self {
        Self::activate(HostContext::new(config))
    }

    /// Initialize the plugin from the context the host provides
    pub fn activate(context: HostContext) -> Self {
        debug!(plugin = %context.plugin_name, "activating reader");
        Self {
            name: context.plugin_name,
            config: context.config,
        }
    }

    /// Header in effect for a worksheet: call options -> sheet -> global
    pub fn header_for(&self, sheet_name: &str, options: &ReadOptions) -> Option<HeaderSpec> {
        let row = options
            .header_row
            .or_else(|| self.config.header_row_for(sheet_name))?;
        let alignment = options
            .header_alignment
            .unwrap_or(self.config.global.header_alignment);
        HeaderSpec::new(row, alignment)
    }

    /// Read a spreadsheet file and return its worksheet records
    pub fn read_file<P: AsRef<Path>>(
        &self,
        path: P,
        options: &ReadOptions,
    ) -> Result<SheetRecords> {
        let workbook = reader::read_workbook(path)?;
        Ok(self.normalize(&workbook, options))
    }

    fn normalize(&self, workbook: &Workbook, options: &ReadOptions) -> SheetRecords {
        let records =
            normalize::normalize_workbook(workbook, |sheet| self.header_for(sheet, options));
        debug!(
            sheets = workbook.sheets.len(),
            with_records = records.len(),
            "read workbook"
        );
        records
    }
}

impl ReaderPlugin for ExcelReader {
    fn name(&self) -> &str {
        &self.name
    }

    fn read(&self, payload: &[u8], options: &ReadOptions) -> Result<SheetRecords> {
        let workbook = reader::read_workbook_from_bytes(payload)?;
        Ok(self.normalize(&workbook, options))
    }
}

impl Default for ExcelReader {
    fn default() -> Self {
        Self::new()
    }
}
