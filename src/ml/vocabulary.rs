//! Categorical vocabulary bundled with source-keyed artifacts
//!
//! Stored as the ordered list of classes seen during training; a class's code
//! is its position in that list.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct CategoricalVocabulary {
    classes: Vec<String>,
    codes: HashMap<String, i64>,
}

impl CategoricalVocabulary {
    pub fn new(classes: Vec<String>) -> Result<Self, String> {
        let mut codes = HashMap::with_capacity(classes.len());
        for (code, class) in classes.iter().enumerate() {
            if class.is_empty() {
                return Err(format!("vocabulary entry {} is empty", code));
            }
            if codes.insert(class.clone(), code as i64).is_some() {
                return Err(format!("duplicate vocabulary entry '{}'", class));
            }
        }
        Ok(Self { classes, codes })
    }

    /// Code assigned to `key` at training time, if the key was seen
    pub fn lookup(&self, key: &str) -> Option<i64> {
        self.codes.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.codes.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

impl TryFrom<Vec<String>> for CategoricalVocabulary {
    type Error = String;

    fn try_from(classes: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(classes)
    }
}

impl From<CategoricalVocabulary> for Vec<String> {
    fn from(vocabulary: CategoricalVocabulary) -> Self {
        vocabulary.classes
    }
}
