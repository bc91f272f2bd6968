//! Shared response sanitization for all backend adapters.

/// Strip markdown code-fence markers from a backend response.
///
/// Models sometimes wrap structured output in ``` fences, optionally tagged
/// with a format name (```srt, ```text). Fence lines are dropped wherever
/// they appear; everything else is kept and the result is trimmed.
pub fn strip_code_fences(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(strip_code_fences("Hello\nWorld"), "Hello\nWorld");
    }

    #[test]
    fn test_bare_fences() {
        assert_eq!(strip_code_fences("```\n1\n00:00 --> 00:01\nHi\n```"), "1\n00:00 --> 00:01\nHi");
    }

    #[test]
    fn test_tagged_fence() {
        assert_eq!(strip_code_fences("```srt\nHello\n```"), "Hello");
        assert_eq!(strip_code_fences("```text\nHello\n```\n"), "Hello");
    }

    #[test]
    fn test_indented_fence() {
        assert_eq!(strip_code_fences("  ```\nHello\n  ```"), "Hello");
    }

    #[test]
    fn test_trims_surrounding_whitespace() {
        assert_eq!(strip_code_fences("\n\n  Hello  \n\n"), "Hello");
    }
}
