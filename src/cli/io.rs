//! JSON output for CLI commands
//!
//! One JSON object per line on stdout.

use std::io::{self, Write};

use serde::Serialize;
use serde_json::Value;

use super::errors::CliResult;

/// Wrap `data` as a success response
pub fn success(data: Value) -> Value {
    serde_json::json!({
        "status": "ok",
        "data": data
    })
}

/// Write a success response to stdout
pub fn write_response<T: Serialize>(data: &T) -> CliResult<()> {
    let response = success(serde_json::to_value(data)?);

    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, &response)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}
