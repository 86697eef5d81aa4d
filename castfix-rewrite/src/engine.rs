//! The two-pass rewriter: conversion rules first, then cast rules, with per-rule counts.

use crate::cast::{cast_rules, CastRule};
use crate::config::RewriteConfig;
use crate::conversion::{conversion_rules, ConversionRule};
use crate::error::RewriteResult;
use crate::rule::{Rewritten, Rule};
use std::collections::BTreeMap;
use tracing::trace;

/// Result of running the full rewriter over one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteOutcome {
    pub text: String,
    /// Total replacements across both passes.
    pub fixes: usize,
    /// Replacements per rule id; rules with zero hits are omitted.
    pub by_rule: BTreeMap<&'static str, usize>,
}

impl RewriteOutcome {
    pub fn changed(&self, original: &str) -> bool {
        self.text != original
    }
}

/// Compiled conversion and cast rules for one configuration.
///
/// Build once per run and share; rewriting is a pure function of the input text.
#[derive(Debug, Clone)]
pub struct Rewriter {
    conversions: Vec<ConversionRule>,
    casts: Vec<CastRule>,
}

impl Rewriter {
    pub fn new(config: &RewriteConfig) -> RewriteResult<Self> {
        config.validate()?;
        Ok(Self {
            conversions: conversion_rules(&config.namespace)?,
            casts: cast_rules(config)?,
        })
    }

    /// Conversion pass, then cast pass.
    pub fn rewrite(&self, text: &str) -> RewriteOutcome {
        let mut by_rule = BTreeMap::new();
        let converted = run_pass(&self.conversions, text, &mut by_rule);
        let cast = run_pass(&self.casts, &converted.text, &mut by_rule);
        RewriteOutcome {
            text: cast.text,
            fixes: converted.fixes + cast.fixes,
            by_rule,
        }
    }

    pub fn rule_ids(&self) -> Vec<&'static str> {
        self.conversions
            .iter()
            .map(|r| r.id())
            .chain(self.casts.iter().map(|r| r.id()))
            .collect()
    }
}

fn run_pass<R: Rule>(
    rules: &[R],
    text: &str,
    by_rule: &mut BTreeMap<&'static str, usize>,
) -> Rewritten {
    let mut current = Rewritten::unchanged(text);
    for rule in rules {
        let step = rule.apply(&current.text);
        if step.fixes > 0 {
            trace!(rule = rule.id(), fixes = step.fixes, "rule matched");
            *by_rule.entry(rule.id()).or_insert(0) += step.fixes;
        }
        current = Rewritten {
            text: step.text,
            fixes: current.fixes + step.fixes,
        };
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RewriteError;
    use pretty_assertions::assert_eq;

    #[test]
    fn both_passes_run_in_order() {
        let rw = Rewriter::new(&RewriteConfig::default()).unwrap();
        let input = concat!(
            "func load_unit(cfg: Dictionary) -> CharacterData:\n",
            "\tvar name := str(cfg.get(\"name\"))\n",
            "\tvar frames: SpriteFrames = load(cfg.path) as SpriteFrames\n",
            "\treturn cache.get(name) as CharacterData\n",
        );
        let out = rw.rewrite(input);
        assert_eq!(
            out.text,
            concat!(
                "func load_unit(cfg: Dictionary) -> CharacterData:\n",
                "\tvar name := DictUtils.get_string(cfg, \"name\", \"\")\n",
                "\tvar _frames_res: Resource = load(cfg.path)\n",
                "\tvar frames: SpriteFrames = _frames_res if _frames_res is SpriteFrames else null\n",
                "\tvar _return_res: Resource = cache.get(name)\n",
                "\treturn _return_res if _return_res is CharacterData else null\n",
            )
        );
        assert_eq!(out.fixes, 3);
        assert_eq!(out.by_rule.get("conversion.str"), Some(&1));
        assert_eq!(out.by_rule.get("cast.declaration"), Some(&1));
        assert_eq!(out.by_rule.get("cast.return"), Some(&1));
        assert!(!out.by_rule.contains_key("cast.assignment"));
        assert!(out.changed(input));
    }

    #[test]
    fn holder_line_is_not_rewritten_again() {
        let rw = Rewriter::new(&RewriteConfig::default()).unwrap();
        let input = "var t: Texture2D = a as Resource as Texture2D\n";
        let first = rw.rewrite(input);
        assert_eq!(
            first.text,
            "var _t_res: Resource = a as Resource\nvar t: Texture2D = _t_res if _t_res is Texture2D else null\n"
        );
        assert_eq!(rw.rewrite(&first.text).fixes, 0);
    }

    #[test]
    fn holder_type_among_known_types_is_rejected() {
        let cfg = RewriteConfig::default().with_extra_types(["Resource"]);
        assert!(matches!(
            Rewriter::new(&cfg),
            Err(RewriteError::HolderIsKnownType { .. })
        ));
    }

    #[test]
    fn rule_ids_cover_both_passes() {
        let rw = Rewriter::new(&RewriteConfig::default()).unwrap();
        assert_eq!(
            rw.rule_ids(),
            vec![
                "conversion.str",
                "conversion.int",
                "conversion.bool",
                "conversion.float",
                "cast.declaration",
                "cast.return",
                "cast.assignment",
            ]
        );
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = RewriteConfig {
            holder_type: String::new(),
            ..RewriteConfig::default()
        };
        assert!(Rewriter::new(&cfg).is_err());
    }
}
