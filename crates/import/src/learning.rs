//! Import Learning Store: user corrections keyed by merchant key.
//!
//! The host owns the store and persists it; a mapping call only reads a
//! snapshot. On disk it is a TOML file of `[[rule]]` tables:
//!
//! ```toml
//! [[rule]]
//! merchant_key = "ARCO"
//! preferred_display_name = "Arco"
//! preferred_category = 12
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sift_core::{normalize_key, CategoryId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LearningError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse rule file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to write rule file: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerchantRule {
    pub merchant_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_category: Option<CategoryId>,
}

impl MerchantRule {
    pub fn new(merchant_key: &str) -> Self {
        Self {
            merchant_key: normalize_key(merchant_key),
            preferred_display_name: None,
            preferred_category: None,
        }
    }

    /// The rule a host stores after a user corrects a row during review.
    /// A display name equal to the raw description is not a correction.
    pub fn from_correction(
        raw_description: &str,
        display_name: Option<&str>,
        category: Option<CategoryId>,
    ) -> Self {
        let display_name = display_name
            .map(str::trim)
            .filter(|n| !n.is_empty() && *n != raw_description.trim());
        Self {
            merchant_key: normalize_key(raw_description),
            preferred_display_name: display_name.map(str::to_string),
            preferred_category: category,
        }
    }

    pub fn with_display_name(mut self, name: &str) -> Self {
        self.preferred_display_name = Some(name.to_string());
        self
    }

    pub fn with_category(mut self, category: CategoryId) -> Self {
        self.preferred_category = Some(category);
        self
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RuleFile {
    #[serde(default)]
    rule: Vec<MerchantRule>,
}

/// Mapping from merchant key to [`MerchantRule`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LearnedRules {
    rules: BTreeMap<String, MerchantRule>,
}

impl LearnedRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the store, re-normalizing every key. Later rules for the same
    /// key are merged over earlier ones.
    pub fn from_rules(rules: impl IntoIterator<Item = MerchantRule>) -> Self {
        let mut store = Self::new();
        for rule in rules {
            store.upsert(rule);
        }
        store
    }

    pub fn from_toml(toml_content: &str) -> Result<Self, LearningError> {
        let file: RuleFile = toml::from_str(toml_content)?;
        Ok(Self::from_rules(file.rule))
    }

    pub fn to_toml(&self) -> Result<String, LearningError> {
        let file = RuleFile { rule: self.rules.values().cloned().collect() };
        Ok(toml::to_string(&file)?)
    }

    pub fn load(path: &Path) -> Result<Self, LearningError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn save(&self, path: &Path) -> Result<(), LearningError> {
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn get(&self, merchant_key: &str) -> Option<&MerchantRule> {
        self.rules.get(merchant_key)
    }

    /// Inserts a rule, or merges it into the existing one: fields the new
    /// rule sets win, fields it leaves unset keep their old value.
    pub fn upsert(&mut self, rule: MerchantRule) {
        let key = normalize_key(&rule.merchant_key);
        if key.is_empty() {
            tracing::warn!(
                merchant_key = %rule.merchant_key,
                "ignoring rule with empty merchant key"
            );
            return;
        }
        let entry = self.rules.entry(key.clone()).or_insert_with(|| MerchantRule {
            merchant_key: key,
            preferred_display_name: None,
            preferred_category: None,
        });
        if rule.preferred_display_name.is_some() {
            entry.preferred_display_name = rule.preferred_display_name;
        }
        if rule.preferred_category.is_some() {
            entry.preferred_category = rule.preferred_category;
        }
    }

    pub fn remove(&mut self, merchant_key: &str) -> Option<MerchantRule> {
        self.rules.remove(merchant_key)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MerchantRule> {
        self.rules.values()
    }
}
