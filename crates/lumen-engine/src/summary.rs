use std::fmt;

use lumen_model::{ChainId, Interval};
use serde::Serialize;

/// Range figures for one chain.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainSummary {
    pub chain_id: ChainId,
    pub label: String,
    pub source_lumens: f64,
    pub efficiency: Interval,
    pub final_lumens: Interval,
}

/// System-wide aggregate over every chain.
///
/// `system_efficiency` is weighted by source lumens: chains that emit more
/// dominate the aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemSummary {
    pub chains: Vec<ChainSummary>,
    pub total_source_lumens: f64,
    pub total_lumens: Interval,
    pub system_efficiency: Interval,
}

impl SystemSummary {
    pub fn chain(&self, chain_id: &ChainId) -> Option<&ChainSummary> {
        self.chains.iter().find(|c| &c.chain_id == chain_id)
    }
}

/// Where a final lumen range sits relative to a required output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetStatus {
    /// Even the best case misses the target.
    Below,
    /// The target falls inside the tolerance range.
    Within,
    /// Even the worst case exceeds the target.
    Above,
}

impl TargetStatus {
    pub fn classify(range: Interval, target_lumens: f64) -> Self {
        if range.max < target_lumens {
            TargetStatus::Below
        } else if range.min > target_lumens {
            TargetStatus::Above
        } else {
            TargetStatus::Within
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetStatus::Below => "below",
            TargetStatus::Within => "within",
            TargetStatus::Above => "above",
        }
    }
}

impl fmt::Display for TargetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_against_target() {
        let range = Interval { min: 235.2, max: 321.75 };
        assert_eq!(TargetStatus::classify(range, 400.0), TargetStatus::Below);
        assert_eq!(TargetStatus::classify(range, 300.0), TargetStatus::Within);
        assert_eq!(TargetStatus::classify(range, 321.75), TargetStatus::Within);
        assert_eq!(TargetStatus::classify(range, 200.0), TargetStatus::Above);
    }
}
