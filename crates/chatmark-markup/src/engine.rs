use crate::rules::{default_rules, MarkupRule, RuleType};
use crate::{MarkupError, MarkupResult};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static DEFAULT_RENDERER: Lazy<MarkupRenderer> = Lazy::new(|| {
    MarkupRenderer::new(default_rules()).expect("built-in markup rules must compile")
});

/// A rule with its pattern compiled.
#[derive(Debug, Clone)]
enum CompiledRule {
    Regex {
        regex: Regex,
        replacement: String,
        reject: Option<Regex>,
    },
    Literal { pattern: String, replacement: String },
}

impl CompiledRule {
    fn compile(rule: &MarkupRule) -> MarkupResult<Self> {
        match rule.rule_type {
            RuleType::Regex => {
                let compile = |pattern: &str| {
                    Regex::new(pattern).map_err(|e| MarkupError::InvalidRegex {
                        rule: rule.name.clone(),
                        error: e.to_string(),
                    })
                };
                Ok(Self::Regex {
                    regex: compile(&rule.pattern)?,
                    replacement: rule.replacement.clone(),
                    reject: rule.reject.as_deref().map(compile).transpose()?,
                })
            }
            RuleType::Literal => {
                if rule.pattern.is_empty() {
                    return Err(MarkupError::EmptyPattern(rule.name.clone()));
                }
                Ok(Self::Literal {
                    pattern: rule.pattern.clone(),
                    replacement: rule.replacement.clone(),
                })
            }
        }
    }

    fn apply(&self, text: &str) -> String {
        match self {
            Self::Regex {
                regex,
                replacement,
                reject: None,
            } => regex.replace_all(text, replacement.as_str()).into_owned(),
            Self::Regex {
                regex,
                replacement,
                reject: Some(reject),
            } => regex
                .replace_all(text, |caps: &Captures| {
                    if reject.is_match(&caps[0]) {
                        caps[0].to_string()
                    } else {
                        let mut out = String::new();
                        caps.expand(replacement, &mut out);
                        out
                    }
                })
                .into_owned(),
            Self::Literal { pattern, replacement } => text.replace(pattern.as_str(), replacement),
        }
    }
}

/// Applies an ordered list of markup rules, each as one global pass.
#[derive(Debug, Clone)]
pub struct MarkupRenderer {
    rules: Vec<MarkupRule>,
    compiled: Vec<CompiledRule>,
}

impl MarkupRenderer {
    pub fn new(rules: Vec<MarkupRule>) -> MarkupResult<Self> {
        let compiled = rules
            .iter()
            .map(CompiledRule::compile)
            .collect::<MarkupResult<Vec<_>>>()?;
        Ok(Self { rules, compiled })
    }

    pub fn rules(&self) -> &[MarkupRule] {
        &self.rules
    }

    pub fn render(&self, text: &str) -> String {
        self.compiled.iter().fold(text.to_string(), |acc, rule| rule.apply(&acc))
    }

    pub fn render_all<'a>(&self, texts: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        texts.into_iter().map(|t| self.render(t)).collect()
    }
}

impl Default for MarkupRenderer {
    fn default() -> Self {
        DEFAULT_RENDERER.clone()
    }
}

/// Render untrusted text with the built-in rule set.
pub fn render(text: &str) -> String {
    DEFAULT_RENDERER.render(text)
}
