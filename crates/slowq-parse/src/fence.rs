//! Triple-backtick fencing for fixed-width display in Slack.

const FENCE: &str = "```";

/// Wraps `text` in a triple-backtick fence.
pub fn fence(text: &str) -> String {
    format!("{FENCE}{text}{FENCE}")
}

/// Removes a surrounding fence if present; returns the input unchanged
/// otherwise.
pub fn unfence(text: &str) -> &str {
    text.strip_prefix(FENCE)
        .and_then(|inner| inner.strip_suffix(FENCE))
        .unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unfence_inverts_fence() {
        let original = "SELECT *\nFROM \"TEST\"";
        assert_eq!(unfence(&fence(original)), original);
    }

    #[test]
    fn unfence_leaves_unfenced_text_alone() {
        assert_eq!(unfence("plain"), "plain");
    }
}
