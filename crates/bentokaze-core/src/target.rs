use std::collections::BTreeMap;

use crate::error::ConfigurationError;

/// Direction of a nutrient bound.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    /// The total must reach at least the target
    #[cfg_attr(feature = "serde", serde(rename = ">="))]
    Ge,
    /// The total must stay at or below the target
    #[cfg_attr(feature = "serde", serde(rename = "<="))]
    Le,
}

impl ComparisonOp {
    pub fn parse(s: &str) -> Result<Self, ConfigurationError> {
        match s {
            ">=" => Ok(ComparisonOp::Ge),
            "<=" => Ok(ComparisonOp::Le),
            other => Err(ConfigurationError::UnsupportedOperator(other.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ComparisonOp::Ge => ">=",
            ComparisonOp::Le => "<=",
        }
    }
}

/// What the optimized bento must achieve.
///
/// `targets` and `operators` must cover the same nutrient keys; sorted
/// maps give the builder a deterministic constraint emission order.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct TargetSpec {
    /// Nutrient name to target value
    pub targets: BTreeMap<String, f64>,
    /// Nutrient name to bound direction, same key set as `targets`
    pub operators: BTreeMap<String, ComparisonOp>,
    /// Packaging volume limit
    pub max_volume: f64,
    /// Minimum mass required from every category present in the catalog
    pub min_mass_per_category: f64,
}

impl TargetSpec {
    /// Checks the key-set and sign invariants that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for nutrient in self.targets.keys() {
            if !self.operators.contains_key(nutrient) {
                return Err(ConfigurationError::MissingOperator(nutrient.clone()));
            }
        }
        for nutrient in self.operators.keys() {
            if !self.targets.contains_key(nutrient) {
                return Err(ConfigurationError::MissingTarget(nutrient.clone()));
            }
        }
        if self.max_volume < 0.0 {
            return Err(ConfigurationError::NegativeVolume(self.max_volume));
        }
        if self.min_mass_per_category < 0.0 {
            return Err(ConfigurationError::NegativeMass(self.min_mass_per_category));
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn spec(
        bounds: &[(&str, f64, ComparisonOp)],
        max_volume: f64,
        min_mass_per_category: f64,
    ) -> TargetSpec {
        TargetSpec {
            targets: bounds
                .iter()
                .map(|(n, v, _)| (n.to_string(), *v))
                .collect(),
            operators: bounds
                .iter()
                .map(|(n, _, op)| (n.to_string(), *op))
                .collect(),
            max_volume,
            min_mass_per_category,
        }
    }

    #[test]
    fn parse_operators() {
        assert_eq!(ComparisonOp::parse(">=").unwrap(), ComparisonOp::Ge);
        assert_eq!(ComparisonOp::parse("<=").unwrap(), ComparisonOp::Le);
        assert_eq!(
            ComparisonOp::parse("==").unwrap_err(),
            ConfigurationError::UnsupportedOperator("==".to_string())
        );
    }

    #[test]
    fn validate_requires_matching_key_sets() {
        let mut s = spec(&[("fat", 2.0, ComparisonOp::Ge)], 10.0, 0.5);
        s.operators.remove("fat");
        assert_eq!(
            s.validate().unwrap_err(),
            ConfigurationError::MissingOperator("fat".to_string())
        );

        let mut s = spec(&[("fat", 2.0, ComparisonOp::Ge)], 10.0, 0.5);
        s.targets.remove("fat");
        assert_eq!(
            s.validate().unwrap_err(),
            ConfigurationError::MissingTarget("fat".to_string())
        );
    }

    #[test]
    fn validate_rejects_negative_limits() {
        let s = spec(&[], -1.0, 0.0);
        assert_eq!(
            s.validate().unwrap_err(),
            ConfigurationError::NegativeVolume(-1.0)
        );

        let s = spec(&[], 1.0, -0.5);
        assert_eq!(
            s.validate().unwrap_err(),
            ConfigurationError::NegativeMass(-0.5)
        );
    }
}
