//! Weighted rubric selection.

use evaluator_client::RubricPayload;
use serde::{Deserialize, Serialize};

use crate::catalog::RubricDescriptor;

/// Highest weight a single rubric can carry.
pub const MAX_WEIGHT: u32 = 100;

/// Weights of the selected rubrics must add up to exactly this.
pub const REQUIRED_TOTAL_WEIGHT: u32 = 100;

/// A rubric selected for the evaluation, with its weight in percent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rubric {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub weight: u32,
}

impl Rubric {
    /// A freshly added rubric starts at weight 0.
    pub fn from_descriptor(descriptor: &RubricDescriptor) -> Self {
        Self {
            id: descriptor.id.to_string(),
            name: descriptor.name.to_string(),
            description: Some(descriptor.description.to_string()),
            weight: 0,
        }
    }

    /// Set the weight, clamped to `MAX_WEIGHT`.
    pub fn set_weight(&mut self, weight: u32) {
        self.weight = weight.min(MAX_WEIGHT);
    }

    pub fn to_payload(&self) -> RubricPayload {
        RubricPayload {
            id: self.id.clone(),
            name: self.name.clone(),
            weight: self.weight,
            description: self.description.clone().unwrap_or_default(),
        }
    }
}

/// Sum of all rubric weights.
pub fn total_weight(rubrics: &[Rubric]) -> u32 {
    rubrics.iter().map(|r| r.weight).sum()
}
