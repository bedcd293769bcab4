pub mod error;
pub mod utils;

pub use error::{DrillError, ErrorCategory, LlmError, Result, ResultExt};
pub use utils::{is_missing_value, json_positive_numbers, json_string, preview};
