/// Result of running one rule (or a whole pass) over a piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
    pub text: String,
    /// Number of replacements applied.
    pub fixes: usize,
}

impl Rewritten {
    pub fn unchanged(text: &str) -> Self {
        Self {
            text: text.to_string(),
            fixes: 0,
        }
    }
}

/// A stateless text rewrite: a pattern plus a replacement generator.
///
/// Implementations must be pure. Text that does not match in full is returned byte-identical.
pub trait Rule: Send + Sync {
    /// Stable identifier, used for per-rule counts.
    fn id(&self) -> &'static str;

    fn apply(&self, text: &str) -> Rewritten;
}
