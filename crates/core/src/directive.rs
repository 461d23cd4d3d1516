const MODEL_DIRECTIVE: &str = "// model:";
const TEMPERATURE_DIRECTIVE: &str = "// temperature:";
const PROMPT_DIRECTIVE: &str = "// prompt:";
const SHORT_PROMPT_DIRECTIVE: &str = "//%";

/// Instructions embedded in a selected text range.
///
/// Directive lines carry configuration for the generation call; every other
/// line is context, the text the model is asked to act on. A field is `None`
/// when no directive for it was present (or, for temperature, when the
/// directive did not parse as a number).
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedInstructions {
    /// Identifier of the generation model to use.
    pub model: Option<String>,
    /// Sampling temperature for the generation call.
    pub temperature: Option<f64>,
    /// Natural-language instruction driving the rewrite.
    pub prompt: Option<String>,
    /// All non-directive lines, trimmed, rejoined with newlines in order.
    pub context: String,
}

/// Parse embedded instructions and context out of raw text.
///
/// Each line is trimmed and tested against the directive prefixes in a fixed
/// order; the first matching prefix wins and the last occurrence of a
/// directive overwrites earlier ones. Lines matching no prefix are pushed
/// trimmed to the context, so leading indentation of context lines is not
/// preserved. Malformed temperature values are ignored rather than rejected.
pub fn parse(input: &str) -> ParsedInstructions {
    let mut model = None;
    let mut temperature = None;
    let mut prompt = None;
    let mut context = Vec::new();

    for line in input.split('\n') {
        let trimmed = line.trim();
        if let Some(rest) = trimmed.strip_prefix(MODEL_DIRECTIVE) {
            model = Some(rest.trim().to_string());
        } else if let Some(rest) = trimmed.strip_prefix(TEMPERATURE_DIRECTIVE) {
            temperature = rest.trim().parse::<f64>().ok().filter(|t| t.is_finite());
        } else if let Some(rest) = trimmed.strip_prefix(PROMPT_DIRECTIVE) {
            prompt = Some(rest.trim().to_string());
        } else if let Some(rest) = trimmed.strip_prefix(SHORT_PROMPT_DIRECTIVE) {
            prompt = Some(rest.trim().to_string());
        } else {
            context.push(trimmed);
        }
    }

    ParsedInstructions {
        model,
        temperature,
        prompt,
        context: context.join("\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_directives_passes_everything_to_context() {
        let input = "fn main() {\nprintln!(\"hi\");\n}";
        let parsed = parse(input);
        assert_eq!(parsed.model, None);
        assert_eq!(parsed.temperature, None);
        assert_eq!(parsed.prompt, None);
        assert_eq!(parsed.context, input);
    }

    #[test]
    fn test_model_directive() {
        let parsed = parse("// model: foo\ntext");
        assert_eq!(parsed.model, Some("foo".to_string()));
        assert_eq!(parsed.context, "text");
    }

    #[test]
    fn test_temperature_directive() {
        let parsed = parse("// temperature: 0.7\ncode");
        assert_eq!(parsed.temperature, Some(0.7));
        assert_eq!(parsed.context, "code");
    }

    #[test]
    fn test_malformed_temperature_is_absent() {
        let parsed = parse("// temperature: notanumber");
        assert_eq!(parsed.temperature, None);
        assert_eq!(parsed.context, "");
    }

    #[test]
    fn test_non_finite_temperature_is_absent() {
        assert_eq!(parse("// temperature: NaN").temperature, None);
        assert_eq!(parse("// temperature: inf").temperature, None);
    }

    #[test]
    fn test_explicit_zero_temperature_is_kept() {
        assert_eq!(parse("// temperature: 0").temperature, Some(0.0));
    }

    #[test]
    fn test_short_prompt_directive() {
        let parsed = parse("//% do X\ncode here");
        assert_eq!(parsed.prompt, Some("do X".to_string()));
        assert_eq!(parsed.context, "code here");
    }

    #[test]
    fn test_long_prompt_directive() {
        let parsed = parse("// prompt: rewrite this\nlet x = 1;");
        assert_eq!(parsed.prompt, Some("rewrite this".to_string()));
        assert_eq!(parsed.context, "let x = 1;");
    }

    #[test]
    fn test_last_directive_wins() {
        let parsed = parse("// model: a\n// model: b");
        assert_eq!(parsed.model, Some("b".to_string()));
        let parsed = parse("//% first\n// prompt: second");
        assert_eq!(parsed.prompt, Some("second".to_string()));
    }

    #[test]
    fn test_indented_directive_is_recognized() {
        let parsed = parse("    // model: indented\n    let y = 2;");
        assert_eq!(parsed.model, Some("indented".to_string()));
        assert_eq!(parsed.context, "let y = 2;");
    }

    #[test]
    fn test_every_line_classified_exactly_once() {
        let input = "// model: m\nline one\n// temperature: 0.5\nline two\n//% fix\nline three";
        let parsed = parse(input);
        assert_eq!(parsed.model, Some("m".to_string()));
        assert_eq!(parsed.temperature, Some(0.5));
        assert_eq!(parsed.prompt, Some("fix".to_string()));
        assert_eq!(parsed.context, "line one\nline two\nline three");
    }

    #[test]
    fn test_directive_without_space_after_prefix() {
        let parsed = parse("// model:tight");
        assert_eq!(parsed.model, Some("tight".to_string()));
    }

    #[test]
    fn test_empty_input() {
        let parsed = parse("");
        assert_eq!(parsed.model, None);
        assert_eq!(parsed.context, "");
    }
}
