use std::collections::HashMap;

use serde_json::Value;

use super::models::{Platform, PolicyStatus};
use super::stream_selector::{Picks, rank_streams};

pub type RankFn = for<'a> fn(&'a [Value]) -> Picks<'a>;

// 平台的选择策略
#[derive(Clone, Copy)]
pub enum SelectionPolicy {
    Ranked(RankFn),
    // 平台已知但还没有实现策略
    Undefined,
}

impl std::fmt::Debug for SelectionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ranked(_) => write!(f, "Ranked"),
            Self::Undefined => write!(f, "Undefined"),
        }
    }
}

/// 平台 -> 选择策略的映射表。
///
/// 未登记的平台视为 `Undefined`。开启 `fallback_to_default` 后，
/// `Undefined` 平台会退回默认的排序策略，并以 `PolicyStatus::Fallback` 标记。
#[derive(Debug, Clone)]
pub struct PolicyRegistry {
    policies: HashMap<Platform, SelectionPolicy>,
    fallback_to_default: bool,
}

impl Default for PolicyRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Platform::Youtube, SelectionPolicy::Ranked(rank_streams));
        registry.register(Platform::Tiktok, SelectionPolicy::Undefined);
        registry.register(Platform::Douyin, SelectionPolicy::Undefined);
        registry.register(Platform::Facebook, SelectionPolicy::Undefined);
        registry
    }
}

impl PolicyRegistry {
    pub fn empty() -> Self {
        Self {
            policies: HashMap::new(),
            fallback_to_default: false,
        }
    }

    pub fn with_fallback(mut self, enabled: bool) -> Self {
        self.fallback_to_default = enabled;
        self
    }

    pub fn register(&mut self, platform: Platform, policy: SelectionPolicy) {
        self.policies.insert(platform, policy);
    }

    pub fn lookup(&self, platform: &Platform) -> SelectionPolicy {
        self.policies
            .get(platform)
            .copied()
            .unwrap_or(SelectionPolicy::Undefined)
    }

    pub fn resolve(&self, platform: &Platform) -> (SelectionPolicy, PolicyStatus) {
        match self.lookup(platform) {
            SelectionPolicy::Ranked(rank) => (SelectionPolicy::Ranked(rank), PolicyStatus::Applied),
            SelectionPolicy::Undefined if self.fallback_to_default => {
                (SelectionPolicy::Ranked(rank_streams), PolicyStatus::Fallback)
            }
            SelectionPolicy::Undefined => (SelectionPolicy::Undefined, PolicyStatus::Undefined),
        }
    }
}
