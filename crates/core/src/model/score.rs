use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ScoreError {
    #[error("correct ({correct}) + wrong ({wrong}) does not equal total ({total})")]
    CountMismatch { correct: u32, wrong: u32, total: u32 },

    #[error("score percent {0} is outside 0..=100")]
    PercentOutOfRange(f64),
}

/// Grading outcome reported by the remote scorer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreResult {
    correct: u32,
    wrong: u32,
    total: u32,
    percent: f64,
}

impl ScoreResult {
    /// Validate a scorer response.
    ///
    /// # Errors
    ///
    /// Returns `ScoreError::CountMismatch` if the counts do not add up and
    /// `ScoreError::PercentOutOfRange` for a percent outside `0..=100` (or NaN).
    pub fn new(correct: u32, wrong: u32, total: u32, percent: f64) -> Result<Self, ScoreError> {
        if correct.checked_add(wrong) != Some(total) {
            return Err(ScoreError::CountMismatch {
                correct,
                wrong,
                total,
            });
        }
        if !(0.0..=100.0).contains(&percent) {
            return Err(ScoreError::PercentOutOfRange(percent));
        }
        Ok(Self {
            correct,
            wrong,
            total,
            percent,
        })
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn wrong(&self) -> u32 {
        self.wrong
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn percent(&self) -> f64 {
        self.percent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_consistent_counts() {
        let score = ScoreResult::new(7, 3, 10, 70.0).unwrap();
        assert_eq!(score.total(), 10);
        assert!((score.percent() - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_count_mismatch() {
        let err = ScoreResult::new(7, 2, 10, 70.0).unwrap_err();
        assert!(matches!(err, ScoreError::CountMismatch { total: 10, .. }));
    }

    #[test]
    fn rejects_out_of_range_and_nan_percent() {
        assert!(ScoreResult::new(1, 0, 1, 100.5).is_err());
        assert!(ScoreResult::new(1, 0, 1, f64::NAN).is_err());
    }
}
