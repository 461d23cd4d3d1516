use regex::Regex;

/// Extract the inner content of the first fenced block in a model response.
///
/// A fence is a triple-backtick opening, an optional language tag, an
/// optional newline, any content (including newlines), and a triple-backtick
/// closing. When a fence is found only its inner content is returned,
/// trimmed. When no fence is found the response passes through unchanged,
/// which makes the operation idempotent on already-unfenced text. Only the
/// first fence is honored.
pub fn extract_fenced(response: &str) -> String {
    let fence = Regex::new(r"(?s)```[A-Za-z0-9_+.-]*\n?(.*?)```").unwrap();

    match fence.captures(response) {
        Some(caps) => caps[1].trim().to_string(),
        None => response.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unfenced_text_passes_through() {
        let text = "fn add(a: i32, b: i32) -> i32 {\n    a + b\n}";
        assert_eq!(extract_fenced(text), text);
    }

    #[test]
    fn test_tagged_fence() {
        let response = "```js\nconsole.log(1)\n```";
        assert_eq!(extract_fenced(response), "console.log(1)");
    }

    #[test]
    fn test_plain_fence() {
        let response = "```\nlet x = 1;\nlet y = 2;\n```";
        assert_eq!(extract_fenced(response), "let x = 1;\nlet y = 2;");
    }

    #[test]
    fn test_idempotent_on_unfenced_output() {
        let response = "```rust\nfn main() {}\n```";
        let once = extract_fenced(response);
        assert_eq!(extract_fenced(&once), once);
    }

    #[test]
    fn test_surrounding_commentary_is_dropped() {
        let response = "Here is the code:\n```rust\nfn main() {}\n```\nHope that helps!";
        assert_eq!(extract_fenced(response), "fn main() {}");
    }

    #[test]
    fn test_first_fence_wins() {
        let response = "```\nfirst\n```\n\n```\nsecond\n```";
        assert_eq!(extract_fenced(response), "first");
    }

    #[test]
    fn test_empty_response() {
        assert_eq!(extract_fenced(""), "");
    }

    #[test]
    fn test_empty_fence() {
        assert_eq!(extract_fenced("```\n```"), "");
    }
}
