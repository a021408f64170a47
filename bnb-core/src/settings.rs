//! Configuration settings for the branch-and-bound engine.

use crate::error::{MipError, MipResult};

/// How the depth-first search is driven.
///
/// Both modes visit nodes in the same order and produce the same node log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Traversal {
    /// Recursive calls, one stack frame per tree level.
    #[default]
    Recursive,

    /// Explicit LIFO stack of pending nodes.
    ExplicitStack,
}

/// Branch-and-bound settings.
#[derive(Debug, Clone)]
pub struct MipSettings {
    /// Integer feasibility and bound comparison tolerance.
    /// A variable is considered integer if |x - round(x)| <= int_feas_tol.
    pub int_feas_tol: f64,

    /// Search driver.
    pub traversal: Traversal,

    // === Output ===
    /// Log progress and incumbent updates at info level.
    pub verbose: bool,

    /// Log frequency (print every N nodes).
    pub log_freq: u64,
}

impl Default for MipSettings {
    fn default() -> Self {
        Self {
            int_feas_tol: 1e-6,
            traversal: Traversal::default(),
            verbose: false,
            log_freq: 100,
        }
    }
}

impl MipSettings {
    /// Create settings with verbose output enabled.
    pub fn verbose() -> Self {
        Self {
            verbose: true,
            log_freq: 1,
            ..Self::default()
        }
    }

    /// Set the integrality tolerance.
    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.int_feas_tol = tol;
        self
    }

    /// Set the search driver.
    pub fn with_traversal(mut self, traversal: Traversal) -> Self {
        self.traversal = traversal;
        self
    }

    /// Validates the settings.
    pub fn validate(&self) -> MipResult<()> {
        if !self.int_feas_tol.is_finite() || self.int_feas_tol <= 0.0 {
            return Err(MipError::InvalidSettings(format!(
                "int_feas_tol must be positive and finite, got {}",
                self.int_feas_tol
            )));
        }
        if self.int_feas_tol >= 0.5 {
            return Err(MipError::InvalidSettings(format!(
                "int_feas_tol must be below 0.5, got {}",
                self.int_feas_tol
            )));
        }
        if self.log_freq == 0 {
            return Err(MipError::InvalidSettings("log_freq must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = MipSettings::default();
        assert!((settings.int_feas_tol - 1e-6).abs() < 1e-15);
        assert_eq!(settings.traversal, Traversal::Recursive);
        assert!(!settings.verbose);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_verbose_settings() {
        let settings = MipSettings::verbose();
        assert!(settings.verbose);
        assert_eq!(settings.log_freq, 1);
    }

    #[test]
    fn test_validate_bad_tolerance() {
        assert!(MipSettings::default().with_tolerance(0.0).validate().is_err());
        assert!(MipSettings::default().with_tolerance(-1e-6).validate().is_err());
        assert!(MipSettings::default().with_tolerance(f64::NAN).validate().is_err());
        assert!(MipSettings::default().with_tolerance(0.5).validate().is_err());
    }

    #[test]
    fn test_validate_zero_log_freq() {
        let settings = MipSettings {
            log_freq: 0,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(MipError::InvalidSettings(_))
        ));
    }
}
