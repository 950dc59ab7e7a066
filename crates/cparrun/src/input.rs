use std::io::{self, BufRead};

/// Read one command per line.
///
/// Lines are trimmed and blank lines skipped; with `filter_comments`, lines
/// starting with `#` are skipped too.
pub fn read_commands<R: BufRead>(reader: R, filter_comments: bool) -> io::Result<Vec<String>> {
    let mut commands = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || (filter_comments && line.starts_with('#')) {
            continue;
        }
        tracing::trace!(command = line, "stdin command");
        commands.push(line.to_string());
    }
    Ok(commands)
}
