use serde::Serialize;

use crate::error::MetricsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub code: u16,
    pub count: u64,
}

/// Status code counters with a hard slot limit.
///
/// Codes keep the slot they were first seen in, so reports list them in
/// arrival order.
#[derive(Debug, Clone)]
pub struct StatusHistogram {
    capacity: usize,
    slots: Vec<StatusCount>,
}

impl StatusHistogram {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            slots: Vec::with_capacity(capacity),
        }
    }

    /// Counts one response with `code`.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::HistogramOverflow`] when `code` is new and every
    /// slot is already taken; the histogram is left unchanged.
    pub fn record(&mut self, code: u16) -> Result<(), MetricsError> {
        if let Some(slot) = self.slots.iter_mut().find(|slot| slot.code == code) {
            slot.count = slot.count.saturating_add(1);
            return Ok(());
        }
        if self.slots.len() >= self.capacity {
            return Err(MetricsError::HistogramOverflow {
                code,
                capacity: self.capacity,
            });
        }
        self.slots.push(StatusCount { code, count: 1 });
        Ok(())
    }

    #[must_use]
    pub fn get(&self, code: u16) -> Option<u64> {
        self.slots
            .iter()
            .find(|slot| slot.code == code)
            .map(|slot| slot.count)
    }

    #[must_use]
    pub fn entries(&self) -> &[StatusCount] {
        &self.slots
    }

    #[must_use]
    pub const fn distinct(&self) -> usize {
        self.slots.len()
    }
}
