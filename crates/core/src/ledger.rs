use thiserror::Error;

/// Wire value for a question the user left blank.
pub const UNANSWERED: i64 = -1;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LedgerError {
    #[error("question {index} is out of range (ledger has {len} entries)")]
    OutOfRange { index: usize, len: usize },
}

/// Selected option per question position; `None` means unanswered.
///
/// The ledger does not know option counts. Callers validate option indices
/// against the question before writing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerLedger {
    entries: Vec<Option<usize>>,
}

impl AnswerLedger {
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            entries: vec![None; len],
        }
    }

    /// Reinitialize to `len` unanswered entries.
    pub fn reset(&mut self, len: usize) {
        self.entries.clear();
        self.entries.resize(len, None);
    }

    /// # Errors
    ///
    /// Returns `LedgerError::OutOfRange` if `index` is not a question position.
    pub fn set(&mut self, index: usize, option: usize) -> Result<(), LedgerError> {
        let len = self.entries.len();
        let slot = self
            .entries
            .get_mut(index)
            .ok_or(LedgerError::OutOfRange { index, len })?;
        *slot = Some(option);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `LedgerError::OutOfRange` if `index` is not a question position.
    pub fn clear(&mut self, index: usize) -> Result<(), LedgerError> {
        let len = self.entries.len();
        let slot = self
            .entries
            .get_mut(index)
            .ok_or(LedgerError::OutOfRange { index, len })?;
        *slot = None;
        Ok(())
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<usize> {
        self.entries.get(index).copied().flatten()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn count_unanswered(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_none()).count()
    }

    /// Detached copy for submission; later ledger writes do not affect it.
    #[must_use]
    pub fn snapshot(&self) -> AnswerSnapshot {
        AnswerSnapshot {
            entries: self.entries.clone().into_boxed_slice(),
        }
    }
}

/// Frozen answers captured at submit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerSnapshot {
    entries: Box<[Option<usize>]>,
}

impl AnswerSnapshot {
    #[must_use]
    pub fn get(&self, index: usize) -> Option<usize> {
        self.entries.get(index).copied().flatten()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Option<usize>] {
        &self.entries
    }

    #[must_use]
    pub fn count_unanswered(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_none()).count()
    }

    /// Scorer payload: option indices with `-1` for unanswered entries.
    #[must_use]
    pub fn to_wire(&self) -> Vec<i64> {
        self.entries
            .iter()
            .map(|entry| entry.map_or(UNANSWERED, |option| option as i64))
            .collect()
    }
}
