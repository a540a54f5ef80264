//! Accounting categories and their in-memory cache

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::de::string_or_number;
use crate::errors::{FreeAgentError, Result};

/// One accounting category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub url: String,
    #[serde(default)]
    pub description: String,
    #[serde(deserialize_with = "string_or_number")]
    pub nominal_code: String,
    #[serde(default)]
    pub allowable_for_tax: Option<bool>,
    #[serde(default)]
    pub tax_reporting_name: Option<String>,
}

impl Category {
    /// Flatten the grouped `GET categories` body in API order
    ///
    /// The body maps group names (`admin_expenses_categories`,
    /// `income_categories`, ...) to arrays of categories. Non-array members
    /// are ignored.
    ///
    /// # Errors
    /// Returns `FreeAgentError::Serialization` when a category is malformed
    pub fn from_groups(groups: &Map<String, Value>) -> Result<Vec<Self>> {
        let mut categories = Vec::new();
        for (group, members) in groups {
            let Value::Array(members) = members else { continue };
            for member in members {
                let category = Self::deserialize(member).map_err(|e| {
                    FreeAgentError::Serialization(format!("invalid category in {group}: {e}"))
                })?;
                categories.push(category);
            }
        }
        Ok(categories)
    }
}

/// Categories fetched once per cache lifetime
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryCache {
    pub loaded: bool,
    pub data: Vec<Category>,
}

impl CategoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cached categories and mark the cache loaded
    pub fn fill(&mut self, categories: Vec<Category>) {
        self.data = categories;
        self.loaded = true;
    }

    /// Forget cached categories; the next lookup fetches again
    pub fn reset(&mut self) {
        self.data.clear();
        self.loaded = false;
    }

    /// First category whose description contains `needle`, ignoring case
    #[must_use]
    pub fn find_by_description(&self, needle: &str) -> Option<&Category> {
        let needle = needle.to_lowercase();
        self.data.iter().find(|category| category.description.to_lowercase().contains(&needle))
    }

    /// Category with exactly this nominal code
    #[must_use]
    pub fn find_by_nominal_code(&self, code: &str) -> Option<&Category> {
        self.data.iter().find(|category| category.nominal_code == code)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn groups() -> Map<String, Value> {
        let Value::Object(map) = json!({
            "admin_expenses_categories": [
                {"url": "https://api.freeagent.com/v2/categories/101", "description": "Office Costs", "nominal_code": "101"},
                {"url": "https://api.freeagent.com/v2/categories/202", "description": "Travel", "nominal_code": 202}
            ],
            "general_categories": [
                {"url": "https://api.freeagent.com/v2/categories/303", "description": "Old Office", "nominal_code": "303"}
            ],
            "count": 3
        }) else {
            unreachable!()
        };
        map
    }

    #[test]
    fn from_groups_preserves_api_order() {
        let categories = Category::from_groups(&groups()).unwrap();
        let codes: Vec<&str> = categories.iter().map(|c| c.nominal_code.as_str()).collect();

        assert_eq!(codes, ["101", "202", "303"]);
    }

    #[test]
    fn from_groups_rejects_malformed_member() {
        let Value::Object(map) = json!({"income_categories": [{"description": "no url"}]}) else {
            unreachable!()
        };

        assert!(matches!(Category::from_groups(&map), Err(FreeAgentError::Serialization(_))));
    }

    #[test]
    fn description_search_is_case_insensitive_substring() {
        let mut cache = CategoryCache::new();
        cache.fill(Category::from_groups(&groups()).unwrap());

        let office = cache.find_by_description("office").unwrap();
        assert_eq!(office.nominal_code, "101");
        assert_eq!(cache.find_by_description("TRAV").unwrap().nominal_code, "202");
        assert!(cache.find_by_description("Rent").is_none());
    }

    #[test]
    fn nominal_code_lookup_is_exact() {
        let mut cache = CategoryCache::new();
        cache.fill(Category::from_groups(&groups()).unwrap());

        assert!(cache.find_by_nominal_code("303").is_some());
        assert!(cache.find_by_nominal_code("30").is_none());
    }

    #[test]
    fn reset_clears_loaded_flag() {
        let mut cache = CategoryCache::new();
        cache.fill(Category::from_groups(&groups()).unwrap());

        cache.reset();

        assert!(!cache.loaded);
        assert!(cache.data.is_empty());
    }
}
