use serde::{Deserialize, Serialize};

use crate::error::GachaError;
use crate::pity::HARD_PITY;

/// One basis point is 0.01%; all probabilities are exact integers out
/// of 10_000 so that millions of draws accumulate no floating drift.
pub const BASIS_POINTS: i64 = 10_000;

/// Probability table for one pool. The defaults are the rates the
/// client documents: 0.6% legendary, 5.5% rare, 93.9% common (the
/// remainder), soft pity from the 74th pull, hard pity on the 90th.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DrawProbability {
    pub legendary_base_bp: i64,
    pub rare_base_bp: i64,

    /// `pulls_since_legendary` value at which the ramp begins (73 means
    /// the 74th pull is the first boosted one).
    pub soft_pity_start: i64,
    /// Linear ramp: each pull past the start adds this many basis
    /// points to the legendary rate, clamped at 100%.
    pub soft_pity_step_bp: i64,
}

impl Default for DrawProbability {
    fn default() -> Self {
        Self {
            legendary_base_bp: 60,
            rare_base_bp: 550,
            soft_pity_start: 73,
            soft_pity_step_bp: 620,
        }
    }
}

impl DrawProbability {
    pub fn validate(&self) -> Result<(), GachaError> {
        if self.legendary_base_bp <= 0 || self.rare_base_bp <= 0 {
            return Err(GachaError::configuration(
                "base probabilities must be positive".to_string(),
            ));
        }
        if self.legendary_base_bp + self.rare_base_bp >= BASIS_POINTS {
            return Err(GachaError::configuration(
                "no probability mass left for common cards".to_string(),
            ));
        }
        if self.soft_pity_start <= 0 || self.soft_pity_start >= HARD_PITY {
            return Err(GachaError::configuration(format!(
                "soft pity must start inside (0, {HARD_PITY})"
            )));
        }
        if self.soft_pity_step_bp <= 0 {
            return Err(GachaError::configuration(
                "soft pity step must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Legendary rate in basis points given the pulls since the last
    /// legendary, i.e. the state *before* the draw being resolved.
    ///
    /// p(n) = base                                   for n <= start - 1
    /// p(n) = min(10000, base + (n - start + 1) * step)  otherwise
    ///
    /// The hard-pity force at n = 89 is handled by the roller on top of
    /// this curve.
    pub fn legendary_bp(&self, pulls_since_legendary: i64) -> i64 {
        if pulls_since_legendary < self.soft_pity_start {
            return self.legendary_base_bp;
        }
        let ramped = self.legendary_base_bp
            + (pulls_since_legendary - self.soft_pity_start + 1) * self.soft_pity_step_bp;
        ramped.min(BASIS_POINTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_rate_until_soft_pity() {
        let prob = DrawProbability::default();
        assert_eq!(prob.legendary_bp(0), 60);
        assert_eq!(prob.legendary_bp(72), 60);
    }

    #[test]
    fn ramp_is_linear_and_clamped() {
        let prob = DrawProbability::default();
        // 74th pull: first boosted one
        assert_eq!(prob.legendary_bp(73), 60 + 620);
        assert_eq!(prob.legendary_bp(74), 60 + 2 * 620);
        assert_eq!(prob.legendary_bp(88), 60 + 16 * 620);
        // the curve itself reaches 100% on the hard-pity pull
        assert_eq!(prob.legendary_bp(89), BASIS_POINTS);
    }

    #[test]
    fn defaults_are_valid_and_exhaustive() {
        let prob = DrawProbability::default();
        prob.validate().unwrap();
        // 0.6% + 5.5% + 93.9% == 100% exactly
        assert_eq!(
            BASIS_POINTS - prob.legendary_base_bp - prob.rare_base_bp,
            9390
        );
    }
}
