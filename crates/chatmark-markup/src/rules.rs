use serde::{Deserialize, Serialize};

/// How a rule matches its pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleType {
    /// Global regex replace; replacement may reference capture groups
    Regex,
    /// Literal substring replace
    Literal,
}

/// One substitution step of the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkupRule {
    pub name: String,
    pub rule_type: RuleType,
    pub pattern: String,
    pub replacement: String,
    /// Regex rules only: matches that also match this pattern are left as-is
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reject: Option<String>,
}

impl MarkupRule {
    pub fn regex(
        name: impl Into<String>,
        pattern: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            rule_type: RuleType::Regex,
            pattern: pattern.into(),
            replacement: replacement.into(),
            reject: None,
        }
    }

    pub fn literal(
        name: impl Into<String>,
        pattern: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            rule_type: RuleType::Literal,
            pattern: pattern.into(),
            replacement: replacement.into(),
            reject: None,
        }
    }

    pub fn with_reject(mut self, pattern: impl Into<String>) -> Self {
        self.reject = Some(pattern.into());
        self
    }
}

/// Link target: no whitespace, quotes or closing parenthesis.
pub const LINK_URL_PATTERN: &str = r#"[^)\s"]+"#;

/// Links whose target uses a script-capable scheme stay as escaped text.
/// Leading control characters are skipped by browsers, so they are skipped here too.
pub const UNSAFE_LINK_PATTERN: &str =
    r"^\[[^\]]+\]\([\x00-\x20]*(?i:javascript|vbscript|data):";

/// HTML escaping; must run before any rule that emits tags.
pub fn escape_rules() -> Vec<MarkupRule> {
    vec![
        MarkupRule::literal("escape_amp", "&", "&amp;"),
        MarkupRule::literal("escape_lt", "<", "&lt;"),
        MarkupRule::literal("escape_gt", ">", "&gt;"),
    ]
}

/// The four whitelisted inline constructs, in application order.
pub fn inline_rules() -> Vec<MarkupRule> {
    vec![
        MarkupRule::regex("bold", r"\*\*(.*?)\*\*", "<strong>${1}</strong>"),
        MarkupRule::regex("italic", r"\*(.*?)\*", "<em>${1}</em>"),
        MarkupRule::regex("code", r"`([^`]+)`", "<code>${1}</code>"),
        MarkupRule::regex(
            "link",
            format!(r"\[([^\]]+)\]\(({})\)", LINK_URL_PATTERN),
            r#"<a href="${2}" target="_blank" rel="noopener noreferrer">${1}</a>"#,
        )
        .with_reject(UNSAFE_LINK_PATTERN),
    ]
}

/// Full ordered pipeline: escape, inline constructs, line breaks.
pub fn default_rules() -> Vec<MarkupRule> {
    let mut rules = escape_rules();
    rules.extend(inline_rules());
    rules.push(MarkupRule::literal("line_break", "\n", "<br/>"));
    rules
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rule_order() {
        let names: Vec<String> = default_rules().into_iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec![
                "escape_amp",
                "escape_lt",
                "escape_gt",
                "bold",
                "italic",
                "code",
                "link",
                "line_break"
            ]
        );
    }

    #[test]
    fn test_ampersand_escaped_first() {
        assert_eq!(escape_rules()[0].pattern, "&");
    }

    #[test]
    fn test_only_link_rule_rejects() {
        let rejecting: Vec<String> = default_rules()
            .into_iter()
            .filter(|r| r.reject.is_some())
            .map(|r| r.name)
            .collect();
        assert_eq!(rejecting, vec!["link"]);
    }

    #[test]
    fn test_rules_round_trip_as_data() {
        let json = serde_json::to_string(&default_rules()).unwrap();
        let parsed: Vec<MarkupRule> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, default_rules());
    }
}
