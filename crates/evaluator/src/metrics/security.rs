use crate::snippet::Snippet;

/// Substrings treated as dangerous. Each one counts at most once.
pub const DENYLIST: [&str; 4] = ["os.system", "subprocess", "eval", "exec"];

/// Returned when the snippet cannot be read back.
pub const SECURITY_SENTINEL: u32 = 5;

pub fn count_denylisted(source: &str) -> u32 {
    DENYLIST.iter().filter(|term| source.contains(*term)).count() as u32
}

pub async fn evaluate_security(snippet: &Snippet) -> u32 {
    match snippet.read_source().await {
        Ok(source) => count_denylisted(&source),
        Err(e) => {
            tracing::warn!("Could not read snippet for security check: {}", e);
            SECURITY_SENTINEL
        }
    }
}
