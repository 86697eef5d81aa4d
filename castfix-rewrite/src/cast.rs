//! Single-line `as <Type>` casts rewritten into a checked two-line form.
//!
//! ```text
//! var tex: Texture2D = res.load(path) as Texture2D
//! ```
//! becomes
//! ```text
//! var _tex_res: Resource = res.load(path)
//! var tex: Texture2D = _tex_res if _tex_res is Texture2D else null
//! ```
//!
//! Each shape is one matcher over the whole known-type alternation. The cast must be the last
//! token on its line, so at most one known type can satisfy a given line and one pass per shape
//! is enough.

use crate::config::RewriteConfig;
use crate::error::{RewriteError, RewriteResult};
use crate::rule::{Rewritten, Rule};
use regex::{Captures, Regex};

/// Temporary used by every return-position rewrite.
pub const RETURN_TEMP: &str = "_return_res";

/// Temporary used by every assignment-position rewrite.
pub const ASSIGNMENT_TEMP: &str = "_loaded_res";

/// Syntactic context a cast appears in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CastShape {
    /// `var <name>: <Type> = <expr> as <Type>`
    Declaration,
    /// `return <expr> as <Type>`
    Return,
    /// `<target> = <expr> as <Type>`
    Assignment,
}

impl CastShape {
    /// Application order within the cast pass.
    pub const ALL: [CastShape; 3] = [
        CastShape::Declaration,
        CastShape::Return,
        CastShape::Assignment,
    ];

    pub fn rule_id(self) -> &'static str {
        match self {
            CastShape::Declaration => "cast.declaration",
            CastShape::Return => "cast.return",
            CastShape::Assignment => "cast.assignment",
        }
    }

    /// Name of the raw-value holder.
    ///
    /// Declarations derive it from the declared name; the other shapes share one fixed name
    /// each, so two rewrites of the same shape in one scope reuse (and redeclare) it.
    pub fn temp_name(self, declared: Option<&str>) -> String {
        match (self, declared) {
            (CastShape::Declaration, Some(name)) => format!("_{name}_res"),
            (CastShape::Declaration, None) => "_result_res".to_string(),
            (CastShape::Return, _) => RETURN_TEMP.to_string(),
            (CastShape::Assignment, _) => ASSIGNMENT_TEMP.to_string(),
        }
    }

    // Group layout is shared across shapes: indent, head, expr, type, trailing.
    // `head` is the declared name, empty for return, or the assignment target.
    fn pattern(self, types: &str) -> String {
        match self {
            CastShape::Declaration => format!(
                r"(?m)^([ \t]*)var (\w+): ({types}) = (.+?) as ({types})([ \t\r]*)$"
            ),
            CastShape::Return => {
                format!(r"(?m)^([ \t]*)return ()()(.+?) as ({types})([ \t\r]*)$")
            }
            CastShape::Assignment => {
                format!(r"(?m)^([ \t]*)(\w+(?:\.\w+)*) = ()(.+?) as ({types})([ \t\r]*)$")
            }
        }
    }
}

/// Rewrites one cast shape for every known type.
#[derive(Debug, Clone)]
pub struct CastRule {
    shape: CastShape,
    holder_type: String,
    null_literal: String,
    pattern: Regex,
}

impl CastRule {
    pub fn new(shape: CastShape, config: &RewriteConfig) -> RewriteResult<Self> {
        let types = type_alternation(&config.known_types);
        let pattern =
            Regex::new(&shape.pattern(&types)).map_err(|source| RewriteError::Pattern {
                rule: shape.rule_id(),
                source,
            })?;
        Ok(Self {
            shape,
            holder_type: config.holder_type.clone(),
            null_literal: config.null_literal.clone(),
            pattern,
        })
    }

    /// `None` means the match must be left as-is.
    fn replacement(&self, caps: &Captures<'_>) -> Option<String> {
        let indent = &caps[1];
        let head = &caps[2];
        let declared_type = &caps[3];
        let expr = caps[4].trim();
        let type_name = &caps[5];
        let trailing = &caps[6];

        let (temp, destination) = match self.shape {
            CastShape::Declaration => {
                if declared_type != type_name {
                    return None;
                }
                (
                    self.shape.temp_name(Some(head)),
                    format!("var {head}: {type_name} ="),
                )
            }
            CastShape::Return => (self.shape.temp_name(None), "return".to_string()),
            CastShape::Assignment => (self.shape.temp_name(None), format!("{head} =")),
        };

        let eol = if trailing.ends_with('\r') { "\r\n" } else { "\n" };
        Some(format!(
            "{indent}var {temp}: {holder} = {expr}{eol}{indent}{destination} {temp} if {temp} is {type_name} else {null}{trailing}",
            holder = self.holder_type,
            null = self.null_literal,
        ))
    }
}

impl Rule for CastRule {
    fn id(&self) -> &'static str {
        self.shape.rule_id()
    }

    fn apply(&self, text: &str) -> Rewritten {
        let mut fixes = 0;
        let out = self.pattern.replace_all(text, |caps: &Captures<'_>| {
            match self.replacement(caps) {
                Some(replaced) => {
                    fixes += 1;
                    replaced
                }
                None => caps[0].to_string(),
            }
        });
        Rewritten {
            text: out.into_owned(),
            fixes,
        }
    }
}

/// One rule per shape, in application order. Empty when no type is known.
pub fn cast_rules(config: &RewriteConfig) -> RewriteResult<Vec<CastRule>> {
    if config.known_types.is_empty() {
        return Ok(Vec::new());
    }
    CastShape::ALL
        .iter()
        .map(|&shape| CastRule::new(shape, config))
        .collect()
}

fn type_alternation(types: &[String]) -> String {
    types
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|")
}
