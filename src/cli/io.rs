//! JSON output for CLI commands
//!
//! Results are written to stdout as a single pretty-printed JSON document.

use std::io::{self, Write};

use serde::Serialize;

use super::errors::CliResult;

/// Write `value` as pretty JSON followed by a newline
pub fn write_json_to<W: Write, T: Serialize>(out: &mut W, value: &T) -> CliResult<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

/// Write `value` as pretty JSON to stdout
pub fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    write_json_to(&mut lock, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_write_json_to_buffer() {
        let mut buf = Vec::new();
        write_json_to(&mut buf, &json!({"records": 3})).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert!(text.ends_with('\n'));
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["records"], 3);
    }

    #[test]
    fn test_null_is_written() {
        let mut buf = Vec::new();
        write_json_to(&mut buf, &Option::<u8>::None).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "null\n");
    }
}
