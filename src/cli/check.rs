//! Validate or resolve queries against JSON input

use super::{CliError, json_to_value, value_to_json};
use crate::{Defaults, Query, Value};

/// Options for the eval and check commands
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The query expression
    pub query: String,
    /// JSON input string
    pub input: Option<String>,
    /// JSON object of default entries
    pub defaults: Option<String>,
    /// Only validate syntax, don't resolve
    pub syntax_only: bool,
}

/// Result of a check operation
#[derive(Debug)]
pub enum CheckResult {
    /// Syntax validation passed
    SyntaxValid,
    /// Query resolved successfully with JSON output
    Success(serde_json::Value),
}

/// Parse a JSON object into a defaults table
pub fn load_defaults(json: &str) -> Result<Defaults, CliError> {
    match json_to_value(serde_json::from_str(json)?) {
        Value::Map(map) => Ok(Defaults::from_map(map)),
        other => Err(CliError::InvalidDefaults(other.type_name())),
    }
}

/// Execute a check operation
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let mut query = Query::new(&options.query);

    if options.syntax_only {
        query.validate()?;
        return Ok(CheckResult::SyntaxValid);
    }

    if let Some(defaults) = &options.defaults {
        query = query.with_defaults(load_defaults(defaults)?);
    }

    let json_str = options.input.as_ref().ok_or(CliError::NoInput)?;
    let json_value: serde_json::Value = serde_json::from_str(json_str)?;

    let result = query.resolve(json_to_value(json_value))?;
    Ok(CheckResult::Success(value_to_json(result)))
}
