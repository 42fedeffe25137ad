//! Domain types shared between the services and the web layer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A background-removal output persisted under the output directory.
///
/// Written once, never updated; retention is an operator concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredCutout {
    pub id: Uuid,
    pub file_name: String,
    pub relative_path: String,
    pub file_size: i64,
    pub mime_type: String,
    pub width: u32,
    pub height: u32,
    pub created_at: DateTime<Utc>,
}

/// Outcome of recompressing one upload at reduced quality.
///
/// Exists only for the duration of one response; never persisted.
#[derive(Debug, Clone)]
pub struct CompareReport {
    pub original_size: u64,
    pub recompressed_size: u64,
    /// Encoded format of the recompressed bytes, e.g. `"jpeg"`.
    pub format: String,
    pub recompressed: Vec<u8>,
}

impl CompareReport {
    /// Relative size reduction in percent. Negative when recompression grew
    /// the payload.
    pub fn saved_percent(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        (1.0 - self.recompressed_size as f64 / self.original_size as f64) * 100.0
    }
}
