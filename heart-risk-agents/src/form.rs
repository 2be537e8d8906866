//! The single-page Heart Risk Calculator form served at `/`.

use crate::contracts::FEATURE_NAMES;

/// Inline HTML/JS page. The script posts the seven fields as numbers to `/predict`.
pub const INDEX_HTML: &str = include_str!("../assets/index.html");
