use serde::{Deserialize, Serialize};

use crate::ids::ChainId;
use crate::lenient;

/// One light source plus its attenuating components.
///
/// The LED output itself carries no modeled tolerance, so source lumens are a
/// plain number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chain {
    pub id: ChainId,
    #[serde(default)]
    pub label: String,
    #[serde(default, deserialize_with = "lenient::count")]
    pub led_count: u32,
    #[serde(default, deserialize_with = "lenient::non_negative")]
    pub lm_per_led: f64,
}

impl Chain {
    pub fn new(id: ChainId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            led_count: 0,
            lm_per_led: 0.0,
        }
    }

    pub fn source_lumens(&self) -> f64 {
        f64::from(self.led_count) * self.lm_per_led
    }
}

/// Shallow patch applied by `update_chain`.
///
/// Numeric fields take raw `f64` input and are coerced on apply, so NaN or
/// negative editor values land as `0`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChainPatch {
    pub label: Option<String>,
    pub led_count: Option<f64>,
    pub lm_per_led: Option<f64>,
}

impl ChainPatch {
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn led_count(mut self, count: f64) -> Self {
        self.led_count = Some(count);
        self
    }

    pub fn lm_per_led(mut self, lumens: f64) -> Self {
        self.lm_per_led = Some(lumens);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.label.is_none() && self.led_count.is_none() && self.lm_per_led.is_none()
    }

    /// Merge into `chain`; returns whether anything changed.
    pub fn apply(&self, chain: &mut Chain) -> bool {
        let before = chain.clone();
        if let Some(label) = &self.label {
            chain.label.clone_from(label);
        }
        if let Some(count) = self.led_count {
            chain.led_count = lenient::coerce_count(count);
        }
        if let Some(lumens) = self.lm_per_led {
            chain.lm_per_led = lenient::coerce_number(lumens);
        }
        *chain != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> Chain {
        Chain::new(ChainId::new("c1").unwrap(), "Group 1")
    }

    #[test]
    fn source_lumens_multiplies_count_and_output() {
        let mut c = chain();
        c.led_count = 10;
        c.lm_per_led = 100.0;
        assert_eq!(c.source_lumens(), 1000.0);
    }

    #[test]
    fn patch_coerces_bad_numbers() {
        let mut c = chain();
        let changed = ChainPatch::default()
            .led_count(f64::NAN)
            .lm_per_led(-5.0)
            .apply(&mut c);
        assert!(!changed);
        assert_eq!(c.led_count, 0);
        assert_eq!(c.lm_per_led, 0.0);
    }

    #[test]
    fn patch_reports_changes() {
        let mut c = chain();
        assert!(ChainPatch::default().led_count(4.0).apply(&mut c));
        assert_eq!(c.led_count, 4);
        assert!(!ChainPatch::default().led_count(4.0).apply(&mut c));
    }
}
