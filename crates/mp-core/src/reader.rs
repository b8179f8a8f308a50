//! Line-oriented SQL statement splitting.
//!
//! Scripts are plain UTF-8 text. Comment lines start with `--`, statements
//! terminate with `;` at end of line and may span multiple lines. The final
//! statement may omit its terminator.

/// Split a script body into discrete statements.
///
/// Each line is stripped of surrounding whitespace; blank lines and comment
/// lines are discarded. Non-terminal lines accumulate into a pending buffer
/// joined by `" \n"`. A line whose stripped form ends with `;` closes the
/// pending statement (terminator removed, buffer re-stripped). A non-empty
/// buffer at end of input is flushed as a final statement, tolerating a
/// missing trailing terminator on the last statement only.
pub fn split_statements(script: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut buf = String::new();
    for line in script.lines() {
        let stripped = line.trim();
        if stripped.is_empty() || stripped.starts_with("--") {
            continue;
        }
        match stripped.strip_suffix(';') {
            Some(body) => {
                buf.push_str(body);
                buf.push_str(" \n");
                statements.push(buf.trim().to_string());
                buf.clear();
            }
            None => {
                buf.push_str(stripped);
                buf.push_str(" \n");
            }
        }
    }
    if !buf.is_empty() {
        statements.push(buf.trim().to_string());
    }
    statements
}

#[cfg(test)]
#[path = "reader_test.rs"]
mod tests;
