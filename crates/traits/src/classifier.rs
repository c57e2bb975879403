//! Regime classification trait definitions.

use quadrant_primitives::Regime;

/// Maps smoothed component scores to a regime label.
pub trait RegimeClassifier: Send + Sync {
    /// Classify one period.
    ///
    /// # Arguments
    /// * `risk_appetite` - Smoothed PC1 score, `None` when undefined
    /// * `duration_demand` - Smoothed PC2 score, `None` when undefined
    ///
    /// # Returns
    /// The regime, or `None` if either input is undefined.
    fn classify(&self, risk_appetite: Option<f64>, duration_demand: Option<f64>)
    -> Option<Regime>;

    /// Returns the name of this classifier.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysGoldilocks;

    impl RegimeClassifier for AlwaysGoldilocks {
        fn classify(&self, a: Option<f64>, b: Option<f64>) -> Option<Regime> {
            a.zip(b).map(|_| Regime::Goldilocks)
        }

        fn name(&self) -> &str {
            "always_goldilocks"
        }
    }

    #[test]
    fn classifier_is_object_safe() {
        let c: Box<dyn RegimeClassifier> = Box::new(AlwaysGoldilocks);
        assert_eq!(c.classify(Some(1.0), Some(1.0)), Some(Regime::Goldilocks));
        assert_eq!(c.classify(None, Some(1.0)), None);
        assert_eq!(c.name(), "always_goldilocks");
    }
}
