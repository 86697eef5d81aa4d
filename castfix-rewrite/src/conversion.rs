//! `str(d.get("k"))`-style conversions rewritten into typed accessor calls.
//!
//! ```text
//! str(cfg.get("name"))     -> DictUtils.get_string(cfg, "name", "")
//! int(cfg.get("hp", 10))   -> DictUtils.get_int(cfg, "hp", 10)
//! ```

use crate::error::{RewriteError, RewriteResult};
use crate::rule::{Rewritten, Rule};
use regex::{Captures, Regex};

/// The primitive a dictionary lookup is coerced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConversionKind {
    String,
    Int,
    Bool,
    Float,
}

impl ConversionKind {
    /// Application order within the conversion pass.
    pub const ALL: [ConversionKind; 4] = [
        ConversionKind::String,
        ConversionKind::Int,
        ConversionKind::Bool,
        ConversionKind::Float,
    ];

    /// Builtin wrapped around the `.get` call in the source.
    pub fn wrapper(self) -> &'static str {
        match self {
            ConversionKind::String => "str",
            ConversionKind::Int => "int",
            ConversionKind::Bool => "bool",
            ConversionKind::Float => "float",
        }
    }

    pub fn accessor(self) -> &'static str {
        match self {
            ConversionKind::String => "get_string",
            ConversionKind::Int => "get_int",
            ConversionKind::Bool => "get_bool",
            ConversionKind::Float => "get_float",
        }
    }

    /// Literal emitted when the source call has no default.
    pub fn fallback(self) -> &'static str {
        match self {
            ConversionKind::String => "\"\"",
            ConversionKind::Int => "0",
            ConversionKind::Bool => "false",
            ConversionKind::Float => "0.0",
        }
    }

    pub fn rule_id(self) -> &'static str {
        match self {
            ConversionKind::String => "conversion.str",
            ConversionKind::Int => "conversion.int",
            ConversionKind::Bool => "conversion.bool",
            ConversionKind::Float => "conversion.float",
        }
    }

    /// Preferred shape of the default argument; any run without parentheses is accepted as well.
    fn default_pattern(self) -> &'static str {
        match self {
            ConversionKind::String => r#""[^"]*"|[^()]*"#,
            ConversionKind::Int => r"\d+|[^()]*",
            ConversionKind::Bool => r"true|false|[^()]*",
            ConversionKind::Float => r"[\d.]+|[^()]*",
        }
    }

    fn pattern(self) -> String {
        format!(
            r#"\b{wrapper}\((\w+(?:\.\w+)*)\.get\("([^"]+)"(?:,\s*({default}))?\)\)"#,
            wrapper = self.wrapper(),
            default = self.default_pattern(),
        )
    }
}

/// Rewrites one conversion kind.
#[derive(Debug, Clone)]
pub struct ConversionRule {
    kind: ConversionKind,
    namespace: String,
    pattern: Regex,
}

impl ConversionRule {
    pub fn new(kind: ConversionKind, namespace: &str) -> RewriteResult<Self> {
        let pattern = Regex::new(&kind.pattern()).map_err(|source| RewriteError::Pattern {
            rule: kind.rule_id(),
            source,
        })?;
        Ok(Self {
            kind,
            namespace: namespace.to_string(),
            pattern,
        })
    }

    #[cfg(test)]
    fn kind(&self) -> ConversionKind {
        self.kind
    }

    fn replacement(&self, caps: &Captures<'_>) -> String {
        let container = &caps[1];
        let key = &caps[2];
        let default = caps
            .get(3)
            .map(|m| m.as_str())
            .filter(|d| !d.is_empty())
            .unwrap_or(self.kind.fallback());
        format!(
            "{}.{}({}, \"{}\", {})",
            self.namespace,
            self.kind.accessor(),
            container,
            key,
            default
        )
    }
}

impl Rule for ConversionRule {
    fn id(&self) -> &'static str {
        self.kind.rule_id()
    }

    fn apply(&self, text: &str) -> Rewritten {
        let mut fixes = 0;
        let out = self.pattern.replace_all(text, |caps: &Captures<'_>| {
            fixes += 1;
            self.replacement(caps)
        });
        Rewritten {
            text: out.into_owned(),
            fixes,
        }
    }
}

/// One rule per kind, in application order.
pub fn conversion_rules(namespace: &str) -> RewriteResult<Vec<ConversionRule>> {
    ConversionKind::ALL
        .iter()
        .map(|&kind| ConversionRule::new(kind, namespace))
        .collect()
}
