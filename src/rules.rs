use crate::model::Rule;
use std::sync::LazyLock;

/// Source of architectural rules. Ordering is the compiler's job.
pub trait RuleProvider: Send + Sync {
    fn get_all(&self) -> &[Rule];
}

static BUILTIN_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule::new(
            "R01",
            0.9,
            "Services must not access DB directly. Use repositories.",
        ),
        Rule::new("R02", 0.6, "Validation logic belongs to the Domain layer."),
    ]
});

/// The fixed built-in rule set.
#[derive(Debug, Clone, Copy, Default)]
pub struct InMemoryRuleProvider;

impl InMemoryRuleProvider {
    pub fn new() -> Self {
        Self
    }
}

impl RuleProvider for InMemoryRuleProvider {
    fn get_all(&self) -> &[Rule] {
        &BUILTIN_RULES
    }
}
