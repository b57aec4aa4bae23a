//! Option loading for gridflip.
//!
//! Option files support JSONC format (JSON with comments). Both single-line
//! (`//`) and multi-line (`/* */`) comments are allowed.

pub mod types;

use std::fs;
use std::io::Read;
use std::path::Path;

pub use types::{DEFAULT_DURATION_MS, EasingType, GridOptions, Stagger};

use crate::error::{GridError, GridResult};

/// Parses engine options from a JSONC string.
///
/// # Errors
///
/// Returns [`GridError::Parse`] if the text is not valid JSON, names an
/// unknown easing curve, or has fields of the wrong type.
pub fn parse_options(source: &str) -> GridResult<GridOptions> {
    parse_reader(source.as_bytes())
}

/// Loads engine options from a JSONC file.
///
/// # Errors
///
/// Returns [`GridError::Config`] if the file does not exist,
/// [`GridError::Io`] if it cannot be read and [`GridError::Parse`] if its
/// contents are invalid.
pub fn load_options_from_path(path: &Path) -> GridResult<GridOptions> {
    if !path.exists() {
        return Err(GridError::Config(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let file = fs::File::open(path)?;
    let options = parse_reader(file)?;
    tracing::debug!(path = %path.display(), ?options, "loaded grid options");
    Ok(options)
}

fn parse_reader<R: Read>(reader: R) -> GridResult<GridOptions> {
    // Strip comments from JSONC before parsing
    let reader = json_comments::StripComments::new(reader);
    Ok(serde_json::from_reader(reader)?)
}

/// Generates a JSON Schema for [`GridOptions`].
#[must_use]
pub fn generate_schema() -> schemars::Schema { schemars::schema_for!(GridOptions) }

/// Generates a pretty-printed JSON Schema string for [`GridOptions`].
#[must_use]
pub fn generate_schema_json() -> String {
    serde_json::to_string_pretty(&generate_schema()).unwrap_or_default()
}
