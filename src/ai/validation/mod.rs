//! Model Output Extraction
//!
//! Turns raw model text into a JSON value before schema validation:
//! - Markdown code fence and BOM stripping
//! - Trailing comma cleanup
//! - JSON object embedded in explanatory text
//!
//! Truncated or otherwise broken output is never patched up. It is reported
//! as a malformed response so it cannot masquerade as a schema failure.

mod json_extract;

pub use json_extract::{JsonExtractor, extract_json_from_response};
