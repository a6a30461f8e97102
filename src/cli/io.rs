//! JSON I/O handling for CLI
//!
//! - Input: one JSON request object on a single stdin line
//! - Output: one JSON object on stdout
//! - Logs go to stderr

use std::io::{self, BufRead, Write};

use serde_json::Value;

use super::errors::{CliError, CliResult};
use crate::request::ODataRequest;

/// Read a parsed request from stdin
pub fn read_request() -> CliResult<ODataRequest> {
    let stdin = io::stdin();
    let mut line = String::new();

    stdin.lock().read_line(&mut line)?;
    parse_request(&line)
}

fn parse_request(line: &str) -> CliResult<ODataRequest> {
    if line.trim().is_empty() {
        return Err(CliError::io_error("Empty input"));
    }
    Ok(serde_json::from_str(line)?)
}

/// Write a response body to stdout
pub fn write_response(body: &Value) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, body)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str, status: u16) -> CliResult<()> {
    write_response(&serde_json::json!({
        "status": "error",
        "code": code,
        "message": message,
        "http_status": status
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::ResourceSegment;

    #[test]
    fn test_parse_request() {
        let request =
            parse_request(r#"{"path": [{"kind": "entity_set", "name": "Books"}]}"#).unwrap();
        assert_eq!(request.path, vec![ResourceSegment::entity_set("Books")]);
    }

    #[test]
    fn test_parse_empty_request() {
        let err = parse_request("  \n").unwrap_err();
        assert_eq!(err.message(), "Empty input");
    }
}
