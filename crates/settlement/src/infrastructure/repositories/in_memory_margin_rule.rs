use async_trait::async_trait;
use bourse_core::MarginRule;
use bourse_ports::MarginRuleRepository;
use dashmap::DashMap;
use std::sync::Arc;

/// In-memory margin rules keyed by scope
#[derive(Default)]
pub struct InMemoryMarginRuleRepository {
    rules: Arc<DashMap<String, MarginRule>>,
}

impl InMemoryMarginRuleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rules(rules: impl IntoIterator<Item = MarginRule>) -> Self {
        let repo = Self::new();
        for rule in rules {
            repo.rules.insert(rule.scope.clone(), rule);
        }
        repo
    }
}

impl Clone for InMemoryMarginRuleRepository {
    fn clone(&self) -> Self {
        Self {
            rules: Arc::clone(&self.rules),
        }
    }
}

#[async_trait]
impl MarginRuleRepository for InMemoryMarginRuleRepository {
    async fn find(&self, scope: &str) -> Option<MarginRule> {
        self.rules.get(scope).map(|r| r.clone())
    }

    async fn save(&self, rule: MarginRule) {
        self.rules.insert(rule.scope.clone(), rule);
    }
}
