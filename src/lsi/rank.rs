use serde::{Deserialize, Serialize};

use crate::config::{LsiConfig, RankMode};

/// Low-rank approximation policy: (mode, value) -> k
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankPolicy {
    pub mode: RankMode,
    pub value: f64,
}

impl RankPolicy {
    pub fn new(mode: RankMode, value: f64) -> Self {
        Self { mode, value }
    }

    pub fn full() -> Self {
        Self::new(RankMode::Full, 0.0)
    }

    /// k for a decomposition holding `rank_s` singular values.
    /// Never more than `rank_s`; zero when the policy asks for k <= 0.
    pub fn effective_rank(&self, rank_s: usize) -> usize {
        let k = match self.mode {
            RankMode::Fixed => self.value.floor(),
            RankMode::Percentage => (self.value * rank_s as f64).floor(),
            RankMode::Full => rank_s as f64,
        };
        if !(k > 0.0) {
            return 0;
        }
        (k as usize).min(rank_s)
    }
}

impl From<&LsiConfig> for RankPolicy {
    fn from(config: &LsiConfig) -> Self {
        Self::new(config.rank_mode, config.rank_value)
    }
}
