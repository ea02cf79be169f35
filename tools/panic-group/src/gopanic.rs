//! Parse a Go panic dump into the crashing goroutine's frames.
//!
//! Expected shape:
//!
//! ```text
//! panic: runtime error: index out of range [3] with length 3
//!
//! goroutine 1 [running]:
//! main.(*Server).lookup(0xc000010000, 0x3)
//!         /home/app/server.go:114 +0x1d
//! main.main()
//!         /home/app/main.go:12 +0x25
//! exit status 2
//! ```

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFrame {
    pub function: String,
    pub file: String,
    pub line: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPanic {
    pub message: String,
    /// Crash point first.
    pub frames: Vec<ParsedFrame>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PanicParseError {
    #[error("no `panic:` or `fatal error:` header")]
    NoHeader,

    #[error("no goroutine header after the panic message")]
    NoGoroutine,

    #[error("line {line}: `{function}` has no location line")]
    MissingLocation { line: usize, function: String },

    #[error("line {line}: malformed location `{text}`")]
    BadLocation { line: usize, text: String },
}

const HEADERS: [&str; 2] = ["panic: ", "fatal error: "];

pub fn parse(text: &str) -> Result<ParsedPanic, PanicParseError> {
    let lines: Vec<&str> = text.lines().collect();

    let (header_idx, message) = lines
        .iter()
        .enumerate()
        .find_map(|(i, l)| {
            HEADERS
                .iter()
                .find_map(|h| l.strip_prefix(h))
                .map(|msg| (i, msg.trim().to_string()))
        })
        .ok_or(PanicParseError::NoHeader)?;

    let goroutine_idx = lines[header_idx + 1..]
        .iter()
        .position(|l| l.starts_with("goroutine ") && l.trim_end().ends_with(':'))
        .map(|p| header_idx + 1 + p)
        .ok_or(PanicParseError::NoGoroutine)?;

    let mut frames = Vec::new();
    let mut i = goroutine_idx + 1;
    while i < lines.len() {
        let line = lines[i];
        if line.trim().is_empty() {
            break;
        }
        if line.trim_start().starts_with("...") {
            // "...additional frames elided..."
            i += 1;
            continue;
        }

        let function = function_name(line);
        let location = match lines.get(i + 1) {
            Some(l) if l.starts_with('\t') || l.starts_with(' ') => *l,
            // Trailing output such as `exit status 2` ends the trace.
            _ if !frames.is_empty() => break,
            _ => {
                return Err(PanicParseError::MissingLocation {
                    line: i + 1,
                    function,
                })
            }
        };
        let (file, line_no) = parse_location(location).ok_or_else(|| PanicParseError::BadLocation {
            line: i + 2,
            text: location.trim().to_string(),
        })?;

        frames.push(ParsedFrame {
            function,
            file,
            line: line_no,
        });
        i += 2;
    }

    Ok(ParsedPanic { message, frames })
}

/// `main.(*T).run(0xc000010000, 0x3)` -> `main.(*T).run`;
/// `created by main.main in goroutine 1` -> `main.main`.
fn function_name(line: &str) -> String {
    let s = line.trim();
    let s = s.strip_prefix("created by ").unwrap_or(s);
    let s = s.split_once(" in goroutine ").map(|(f, _)| f).unwrap_or(s);
    let s = if s.ends_with(')') {
        s.rfind('(').map(|p| &s[..p]).unwrap_or(s)
    } else {
        s
    };
    s.to_string()
}

/// `\t/src/main.go:12 +0x25` -> (`/src/main.go`, Some(12)).
fn parse_location(line: &str) -> Option<(String, Option<u32>)> {
    let s = line.trim();
    let s = s.split_once(" +").map(|(loc, _)| loc).unwrap_or(s);
    let (file, line_no) = s.rsplit_once(':')?;
    if file.is_empty() {
        return None;
    }
    let line_no = line_no.parse::<u32>().ok()?;
    Some((file.to_string(), Some(line_no)))
}
