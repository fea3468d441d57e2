use crate::snippet::Snippet;

pub const MAX_LINE_LENGTH: usize = 100;

/// Returned when the snippet cannot be read back.
pub const READABILITY_SENTINEL: u32 = 5;

/// Number of lines longer than [`MAX_LINE_LENGTH`] characters.
///
/// A line's length includes its terminator, counted as one character (`\r\n`
/// included), so a terminated line is flagged from 100 visible characters and
/// an unterminated last line only past 100.
pub fn count_long_lines(source: &str) -> u32 {
    source
        .split_inclusive('\n')
        .filter(|line| line_length(line) > MAX_LINE_LENGTH)
        .count() as u32
}

fn line_length(line: &str) -> usize {
    match line.strip_suffix('\n') {
        Some(text) => text.strip_suffix('\r').unwrap_or(text).chars().count() + 1,
        None => line.chars().count(),
    }
}

pub async fn evaluate_readability(snippet: &Snippet) -> u32 {
    match snippet.read_source().await {
        Ok(source) => count_long_lines(&source),
        Err(e) => {
            tracing::warn!("Could not read snippet for readability check: {}", e);
            READABILITY_SENTINEL
        }
    }
}
