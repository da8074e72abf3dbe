pub mod forecast;
pub mod lending;
pub mod planning;
pub mod ratios;

use serde::de::DeserializeOwned;

use crate::input;

/// Structured input from `--input` when given, otherwise from piped stdin.
/// `None` means the caller should fall back to individual flags.
pub(crate) fn structured_input<T: DeserializeOwned>(
    path: Option<&str>,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return Ok(Some(input::file::read_json(path)?));
    }
    input::stdin::read_stdin()
}
