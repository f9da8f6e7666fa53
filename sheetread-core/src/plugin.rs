//! Host pipeline plugin interface

use crate::config::ReaderConfig;
use crate::error::{ReadError, Result};
use crate::normalize::{HeaderAlignment, SheetRecords};
use serde_json::{Map, Value as JsonValue};

/// Trait that all reader plugins must implement
pub trait ReaderPlugin: Send + Sync {
    /// Name the host registered the plugin under
    fn name(&self) -> &str;

    /// Extract structured content from a payload
    fn read(&self, payload: &[u8], options: &ReadOptions) -> Result<SheetRecords>;
}

/// What the host hands a plugin when activating it
#[derive(Debug, Clone)]
pub struct HostContext {
    pub plugin_name: String,
    pub config: ReaderConfig,
}

impl HostContext {
    pub fn new(config: ReaderConfig) -> Self {
        Self {
            plugin_name: "excel".to_string(),
            config,
        }
    }
}

impl Default for HostContext {
    fn default() -> Self {
        Self::new(ReaderConfig::default())
    }
}

/// Per-call options. Unset fields fall back to the reader configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadOptions {
    /// Header row for every worksheet of this call; `Some(0)` reads without
    /// a header regardless of configuration
    pub header_row: Option<u32>,
    pub header_alignment: Option<HeaderAlignment>,
}

impl ReadOptions {
    pub fn with_header_row(row: u32) -> Self {
        Self {
            header_row: Some(row),
            ..Self::default()
        }
    }

    /// Interpret keyword arguments passed by the host. `header_row` may be a
    /// non-negative integer, a boolean (`true` is row 1, `false` no header)
    /// or `null` (no header). Unknown keys belong to other plugins and are
    /// ignored.
    pub fn from_kwargs(kwargs: &Map<String, JsonValue>) -> Result<Self> {
        let header_row = match kwargs.get("header_row") {
            None => None,
            Some(JsonValue::Null) | Some(JsonValue::Bool(false)) => Some(0),
            Some(JsonValue::Bool(true)) => Some(1),
            Some(JsonValue::Number(n)) => {
                let row = n
                    .as_u64()
                    .and_then(|n| u32::try_from(n).ok())
                    .ok_or_else(|| {
                        ReadError::InvalidOption(format!(
                            "header_row must be a row number, got {}",
                            n
                        ))
                    })?;
                Some(row)
            }
            Some(other) => {
                return Err(ReadError::InvalidOption(format!(
                    "header_row must be a row number, got {}",
                    other
                )));
            }
        };

        let header_alignment = match kwargs.get("header_alignment") {
            None | Some(JsonValue::Null) => None,
            Some(value) => Some(serde_json::from_value(value.clone()).map_err(|e| {
                ReadError::InvalidOption(format!("header_alignment: {}", e))
            })?),
        };

        Ok(Self {
            header_row,
            header_alignment,
        })
    }
}
