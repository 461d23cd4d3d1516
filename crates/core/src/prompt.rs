use crate::directive::ParsedInstructions;

/// Caller-supplied fallbacks applied when a directive is absent.
#[derive(Debug, Clone)]
pub struct RequestDefaults {
    /// Model used when the selection has no model directive.
    pub model: String,
    /// Temperature used when the selection has no temperature directive.
    pub temperature: f64,
    /// Fixed instruction describing the assistant's role and output format.
    pub system: String,
}

/// A single generation call, ready for a backend.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub model: String,
    pub system: String,
    pub temperature: f64,
    pub prompt: String,
}

/// Wrap the context in a fenced block and append the instruction.
pub fn build_user_prompt(context: &str, instruction: &str) -> String {
    format!("```\n{context}\n```\n\n{instruction}")
        .trim()
        .to_string()
}

/// Assemble a generation request from parsed instructions and defaults.
///
/// An absent prompt directive yields an empty instruction; the request still
/// proceeds rather than failing fast.
pub fn build_request(parsed: &ParsedInstructions, defaults: &RequestDefaults) -> GenerationRequest {
    GenerationRequest {
        model: parsed
            .model
            .clone()
            .unwrap_or_else(|| defaults.model.clone()),
        system: defaults.system.clone(),
        temperature: parsed.temperature.unwrap_or(defaults.temperature),
        prompt: build_user_prompt(&parsed.context, parsed.prompt.as_deref().unwrap_or("")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directive::parse;

    fn defaults() -> RequestDefaults {
        RequestDefaults {
            model: "default-model".to_string(),
            temperature: 0.3,
            system: "system instruction".to_string(),
        }
    }

    #[test]
    fn test_user_prompt_shape() {
        let prompt = build_user_prompt("let x = 1;", "rename x to count");
        assert_eq!(prompt, "```\nlet x = 1;\n```\n\nrename x to count");
    }

    #[test]
    fn test_user_prompt_is_trimmed() {
        let prompt = build_user_prompt("code", "");
        assert_eq!(prompt, "```\ncode\n```");
    }

    #[test]
    fn test_defaults_apply_when_directives_absent() {
        let parsed = parse("just code");
        let request = build_request(&parsed, &defaults());
        assert_eq!(request.model, "default-model");
        assert_eq!(request.temperature, 0.3);
        assert_eq!(request.system, "system instruction");
    }

    #[test]
    fn test_directives_override_defaults() {
        let parsed = parse("// model: other\n// temperature: 0.9\n//% reformat\ncode");
        let request = build_request(&parsed, &defaults());
        assert_eq!(request.model, "other");
        assert_eq!(request.temperature, 0.9);
        assert!(request.prompt.ends_with("reformat"));
        assert!(request.prompt.starts_with("```\ncode\n```"));
    }

    #[test]
    fn test_missing_prompt_still_builds_a_request() {
        let parsed = parse("code without instruction");
        let request = build_request(&parsed, &defaults());
        assert_eq!(request.prompt, "```\ncode without instruction\n```");
    }
}
