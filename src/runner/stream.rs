//! Line-oriented output streaming

use std::io::{self, BufRead, Write};

use crate::config::Keywords;
use crate::style::highlight_keywords;

/// Copy `reader` to `console` one line at a time, highlighting keywords.
///
/// Each line is written and flushed as soon as it is read. Returns the
/// uncolored text of everything read. Invalid UTF-8 is replaced rather than
/// treated as an error, since simulators echo arbitrary testbench output.
pub fn stream_lines<R: BufRead>(
    mut reader: R,
    console: &mut dyn Write,
    keywords: &Keywords,
    color: bool,
) -> io::Result<String> {
    let mut captured = String::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        console.write_all(highlight_keywords(&line, keywords, color).as_bytes())?;
        console.flush()?;
        captured.push_str(&line);
    }
    Ok(captured)
}
