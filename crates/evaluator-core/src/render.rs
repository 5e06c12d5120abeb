//! Score presentation: colour tiers, badge variants and row expansion.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Four-tier colour scale for scores in 0–100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTier {
    Good,
    Fair,
    Poor,
    Bad,
}

impl ScoreTier {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            ScoreTier::Good
        } else if score >= 60.0 {
            ScoreTier::Fair
        } else if score >= 40.0 {
            ScoreTier::Poor
        } else {
            ScoreTier::Bad
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            ScoreTier::Good => "green",
            ScoreTier::Fair => "yellow",
            ScoreTier::Poor => "orange",
            ScoreTier::Bad => "red",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreTier::Good => "good",
            ScoreTier::Fair => "fair",
            ScoreTier::Poor => "poor",
            ScoreTier::Bad => "bad",
        }
    }
}

/// Three-tier badge scale. Thresholds differ from [`ScoreTier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeVariant {
    Default,
    Secondary,
    Destructive,
}

impl BadgeVariant {
    pub fn from_score(score: f64) -> Self {
        if score >= 70.0 {
            BadgeVariant::Default
        } else if score >= 40.0 {
            BadgeVariant::Secondary
        } else {
            BadgeVariant::Destructive
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BadgeVariant::Default => "default",
            BadgeVariant::Secondary => "secondary",
            BadgeVariant::Destructive => "destructive",
        }
    }
}

/// Score rounded for display, e.g. `"73/100"`.
pub fn score_badge(score: f64) -> String {
    format!("{}/100", score.round() as i64)
}

/// Test-case rows currently expanded, keyed by test-case index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandedRows {
    indices: BTreeSet<u32>,
}

impl ExpandedRows {
    /// Flip one row; returns whether it is now expanded.
    pub fn toggle(&mut self, index: u32) -> bool {
        if self.indices.remove(&index) {
            false
        } else {
            self.indices.insert(index);
            true
        }
    }

    pub fn is_expanded(&self, index: u32) -> bool {
        self.indices.contains(&index)
    }

    pub fn expand_all(&mut self, indices: impl IntoIterator<Item = u32>) {
        self.indices.extend(indices);
    }

    pub fn clear(&mut self) {
        self.indices.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}
