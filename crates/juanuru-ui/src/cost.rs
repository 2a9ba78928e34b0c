use std::sync::Arc;

use crate::devices::TextSink;

/// Linear monthly cost estimate from system size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostEstimator {
    rate_per_kw: f64,
}

impl Default for CostEstimator {
    fn default() -> Self {
        Self::new(5.0)
    }
}

impl CostEstimator {
    pub fn new(rate_per_kw: f64) -> Self {
        Self { rate_per_kw }
    }

    pub fn rate_per_kw(&self) -> f64 {
        self.rate_per_kw
    }

    pub fn estimate(&self, size: f64) -> f64 {
        size * self.rate_per_kw
    }
}

/// Recomputes the monthly cost output on every change of the size input.
pub struct CostBinding {
    estimator: CostEstimator,
    output: Arc<dyn TextSink>,
}

impl CostBinding {
    pub fn new(estimator: CostEstimator, output: Arc<dyn TextSink>) -> Self {
        Self { estimator, output }
    }

    /// Handle a new raw value of the system-size input.
    ///
    /// An empty input counts as 0; anything unparseable clears the output.
    pub fn on_input(&self, raw: &str) -> Option<f64> {
        let raw = raw.trim();
        let size = if raw.is_empty() {
            Some(0.0)
        } else {
            raw.parse::<f64>().ok().filter(|s| s.is_finite())
        };

        match size {
            Some(size) => {
                let cost = self.estimator.estimate(size);
                self.output.set_text(&cost.to_string());
                Some(cost)
            }
            None => {
                tracing::debug!("Ignoring non-numeric system size {:?}", raw);
                self.output.set_text("");
                None
            }
        }
    }
}
