//! Configuration system for the reader

use crate::normalize::HeaderAlignment;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Last row index a worksheet can have
pub const MAX_ROWS: u32 = 1_048_576;

/// Main reader configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReaderConfig {
    #[serde(default)]
    pub global: GlobalConfig,
    #[serde(default)]
    pub sheets: HashMap<String, SheetConfig>,
}

/// Settings applied to every worksheet
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// 1-based header row; 0 or absent reads without a header
    #[serde(default)]
    pub header_row: Option<u32>,
    #[serde(default)]
    pub header_alignment: HeaderAlignment,
}

/// Per-worksheet overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SheetConfig {
    /// Overrides the global header row; 0 disables the header for this sheet
    #[serde(default)]
    pub header_row: Option<u32>,
}

impl ReaderConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let config: ReaderConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Validate header rows against the worksheet row limit
    pub fn validate(&self) -> Result<()> {
        if let Some(row) = self.global.header_row {
            if row > MAX_ROWS {
                anyhow::bail!(
                    "Configuration error: global header_row {} exceeds the {} row limit",
                    row,
                    MAX_ROWS
                );
            }
        }

        for (sheet_name, sheet_config) in &self.sheets {
            if let Some(row) = sheet_config.header_row {
                if row > MAX_ROWS {
                    anyhow::bail!(
                        "Configuration error: header_row {} in sheet '{}' exceeds the {} row limit",
                        row,
                        sheet_name,
                        MAX_ROWS
                    );
                }
            }
        }

        Ok(())
    }

    /// Header row for a sheet with fallback chain: sheet -> global
    pub fn header_row_for(&self, sheet_name: &str) -> Option<u32> {
        self.sheets
            .get(sheet_name)
            .and_then(|sheet| sheet.header_row)
            .or(self.global.header_row)
    }
}
