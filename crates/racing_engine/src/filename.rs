use std::path::{Path, PathBuf};

pub const WORKBOOK_EXTENSION: &str = "xlsx";
const MAX_COMPONENT_LEN: usize = 80;

/// Deterministic workbook path: `{output_dir}/{prefix}_{sanitized identifier}.xlsx`.
pub fn destination_for(output_dir: &Path, prefix: &str, identifier: &str) -> PathBuf {
    let name = format!(
        "{}_{}.{WORKBOOK_EXTENSION}",
        sanitize_component(prefix),
        sanitize_component(identifier)
    );
    output_dir.join(name)
}

/// Windows-safe file name component: separators, spaces and other forbidden
/// characters become `_`, runs of `_` collapse, reserved device names get a suffix.
pub fn sanitize_component(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .map(|c| if is_forbidden(c) || c.is_whitespace() { '_' } else { c })
        .collect();
    let cleaned = cleaned.trim_matches(&['_', '.'][..]);

    let mut compacted = String::with_capacity(cleaned.len());
    let mut prev_underscore = false;
    for c in cleaned.chars() {
        if c == '_' {
            if !prev_underscore {
                compacted.push(c);
            }
            prev_underscore = true;
        } else {
            compacted.push(c);
            prev_underscore = false;
        }
    }

    if compacted.is_empty() {
        compacted = "unnamed".to_string();
    }
    if compacted.len() > MAX_COMPONENT_LEN {
        let mut end = MAX_COMPONENT_LEN;
        while !compacted.is_char_boundary(end) {
            end -= 1;
        }
        compacted.truncate(end);
    }
    if is_reserved_windows_name(&compacted) {
        compacted.push('_');
    }
    compacted
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}
