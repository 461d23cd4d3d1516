use serde::Deserialize;

use crate::fence::extract_fenced;

/// One suggestion produced by the completion-assist prompt.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CompletionChoice {
    /// Short label shown in the completion list.
    pub label: String,
    /// Optional one-line description.
    #[serde(default)]
    pub detail: Option<String>,
    /// Text to insert; the label is inserted when absent.
    #[serde(default, rename = "insertText")]
    pub insert_text: Option<String>,
}

/// Decode a model response into completion choices.
///
/// Models tend to fence JSON output, so the response is run through fence
/// extraction first. A response that does not decode as a JSON array is an
/// error for the caller to absorb, never a panic.
pub fn parse_completion_list(response: &str) -> Result<Vec<CompletionChoice>, serde_json::Error> {
    serde_json::from_str(&extract_fenced(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_json_array() {
        let response = r#"[{"label": "push", "detail": "append an element"}]"#;
        let choices = parse_completion_list(response).unwrap();
        assert_eq!(choices.len(), 1);
        assert_eq!(choices[0].label, "push");
        assert_eq!(choices[0].detail.as_deref(), Some("append an element"));
        assert_eq!(choices[0].insert_text, None);
    }

    #[test]
    fn test_fenced_json_array() {
        let response = "```json\n[{\"label\": \"pop\", \"insertText\": \"pop()\"}]\n```";
        let choices = parse_completion_list(response).unwrap();
        assert_eq!(choices[0].label, "pop");
        assert_eq!(choices[0].insert_text.as_deref(), Some("pop()"));
    }

    #[test]
    fn test_empty_array() {
        assert_eq!(parse_completion_list("[]").unwrap(), vec![]);
    }

    #[test]
    fn test_malformed_response_is_an_error() {
        assert!(parse_completion_list("Sorry, I cannot help with that.").is_err());
        assert!(parse_completion_list("{\"label\": \"not an array\"}").is_err());
        assert!(parse_completion_list("[{\"label\": 42}]").is_err());
    }
}
