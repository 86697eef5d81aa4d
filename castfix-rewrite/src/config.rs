use crate::error::{RewriteError, RewriteResult};

/// Resource types whose casts are eligible for rewriting.
///
/// Casts to any other type are never touched.
pub const DEFAULT_KNOWN_TYPES: &[&str] = &[
    "CharacterData",
    "SpriteFrames",
    "Texture2D",
    "PackedScene",
    "BattleData",
    "CampaignData",
    "ItemData",
    "NPCData",
    "DialogueData",
    "MapMetadata",
    "ClassData",
    "CaravanData",
    "InteractableData",
    "ShopData",
    "SpellData",
    "AIBehaviorData",
];

/// Identifier of the typed-accessor facility that conversion rewrites call into.
pub const DEFAULT_NAMESPACE: &str = "DictUtils";

/// Supertype used for the intermediate holder in cast rewrites.
pub const DEFAULT_HOLDER_TYPE: &str = "Resource";

pub const DEFAULT_NULL_LITERAL: &str = "null";

/// Names and type sets the rules are generated from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteConfig {
    /// Emitted as `<namespace>.get_<kind>(...)`. May be dotted.
    pub namespace: String,
    /// Declared type of the temporary that holds the raw cast value.
    pub holder_type: String,
    /// Value yielded when the runtime type check fails.
    pub null_literal: String,
    /// Closed set of cast targets eligible for rewriting.
    pub known_types: Vec<String>,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            holder_type: DEFAULT_HOLDER_TYPE.to_string(),
            null_literal: DEFAULT_NULL_LITERAL.to_string(),
            known_types: DEFAULT_KNOWN_TYPES.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl RewriteConfig {
    /// Append extra known types, skipping ones already present.
    pub fn with_extra_types<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for ty in extra {
            let ty = ty.into();
            if !self.known_types.contains(&ty) {
                self.known_types.push(ty);
            }
        }
        self
    }

    pub fn validate(&self) -> RewriteResult<()> {
        if !self.namespace.split('.').all(is_identifier) {
            return Err(RewriteError::InvalidIdentifier {
                field: "namespace",
                value: self.namespace.clone(),
            });
        }
        if !is_identifier(&self.holder_type) {
            return Err(RewriteError::InvalidIdentifier {
                field: "holder_type",
                value: self.holder_type.clone(),
            });
        }
        if self.null_literal.trim().is_empty() {
            return Err(RewriteError::EmptyNullLiteral);
        }
        if self.known_types.contains(&self.holder_type) {
            return Err(RewriteError::HolderIsKnownType {
                holder: self.holder_type.clone(),
            });
        }
        if let Some(bad) = self.known_types.iter().find(|t| !is_identifier(t)) {
            return Err(RewriteError::InvalidIdentifier {
                field: "known_types",
                value: bad.clone(),
            });
        }
        Ok(())
    }
}

pub(crate) fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = RewriteConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.known_types.len(), DEFAULT_KNOWN_TYPES.len());
        assert_eq!(cfg.namespace, "DictUtils");
    }

    #[test]
    fn extra_types_are_deduplicated() {
        let cfg = RewriteConfig::default().with_extra_types(["Texture2D", "AudioStream"]);
        assert_eq!(cfg.known_types.len(), DEFAULT_KNOWN_TYPES.len() + 1);
        assert_eq!(cfg.known_types.last().map(String::as_str), Some("AudioStream"));
    }

    #[test]
    fn dotted_namespace_is_accepted() {
        let cfg = RewriteConfig {
            namespace: "Utils.Dict".to_string(),
            ..RewriteConfig::default()
        };
        cfg.validate().unwrap();
    }

    #[test]
    fn rejects_bad_names() {
        let cfg = RewriteConfig {
            namespace: "Dict Utils".to_string(),
            ..RewriteConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(RewriteError::InvalidIdentifier { field: "namespace", .. })
        ));

        let cfg = RewriteConfig::default().with_extra_types(["Array[int]"]);
        assert!(matches!(
            cfg.validate(),
            Err(RewriteError::InvalidIdentifier { field: "known_types", .. })
        ));

        let cfg = RewriteConfig {
            null_literal: "  ".to_string(),
            ..RewriteConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(RewriteError::EmptyNullLiteral)));
    }

    #[test]
    fn holder_type_cannot_be_a_known_type() {
        let cfg = RewriteConfig::default().with_extra_types(["Resource"]);
        assert!(matches!(
            cfg.validate(),
            Err(RewriteError::HolderIsKnownType { holder }) if holder == "Resource"
        ));

        let cfg = RewriteConfig {
            holder_type: "Texture2D".to_string(),
            ..RewriteConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn identifier_rules() {
        assert!(is_identifier("_tex"));
        assert!(is_identifier("Texture2D"));
        assert!(!is_identifier("2D"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("a-b"));
    }
}
