//! Raw text normalization
//!
//! Collectors hand over text with mixed line endings, fenced-code noise,
//! and exotic whitespace (NBSP, zero-width characters, tabs). Everything
//! downstream works on the normalized line list produced here; provenance
//! line indices refer to this list, so fence lines are blanked in place
//! rather than removed.

/// Characters rewritten to an ordinary space.
const SPACE_EQUIVALENTS: &[char] = &[
    '\t', '\u{00A0}', '\u{200B}', '\u{200C}', '\u{200D}', '\u{FEFF}',
];

/// Normalize raw transcript text into a stable line list.
pub fn normalize_lines(raw: &str) -> Vec<String> {
    let unified = raw.replace("\r\n", "\n").replace('\r', "\n");

    unified
        .split('\n')
        .map(|line| {
            let trimmed = line.trim_start();
            if trimmed.starts_with("```") {
                return String::new();
            }
            line.chars()
                .map(|c| {
                    if SPACE_EQUIVALENTS.contains(&c) {
                        ' '
                    } else {
                        c
                    }
                })
                .collect()
        })
        .collect()
}
