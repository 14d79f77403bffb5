use std::fmt;

use serde::Deserialize;

use crate::data::dose::DoseEvent;

/// A dosing schedule: every intake of one substance across the simulated day
///
/// Entries keep the order they were added in; they are not required to be
/// sorted by time. Anything that needs chronology (the first-dose anchor,
/// stop-after truncation) derives it on demand, so two schedules listing the
/// same events in different orders describe the same regimen.
#[derive(serde::Serialize, Debug, Clone, Default, Deserialize)]
pub struct Schedule {
    pub(crate) events: Vec<DoseEvent>,
}

impl Schedule {
    /// Create an empty schedule
    pub(crate) fn new() -> Self {
        Schedule { events: Vec::new() }
    }

    /// Add an event to the schedule
    pub(crate) fn add_event(&mut self, event: DoseEvent) {
        self.events.push(event);
    }

    /// Get a vector of references to all events in this schedule
    pub fn events(&self) -> Vec<&DoseEvent> {
        self.events.iter().collect()
    }

    /// Get the earliest event time, or `None` for an empty schedule
    ///
    /// This is a minimum over all entries, not the first entry, so unsorted
    /// schedules anchor the sampling window correctly.
    pub fn first_dose_time(&self) -> Option<f64> {
        self.events
            .iter()
            .map(|event| event.time())
            .fold(None, |min, t| match min {
                Some(m) if m <= t => Some(m),
                _ => Some(t),
            })
    }

    /// Get event indices in chronological order
    ///
    /// The sort is stable, so events sharing a time keep their insertion
    /// order. Stop-after projections truncate along this ordering.
    pub fn time_ordered_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.events.len()).collect();
        indices.sort_by(|&a, &b| {
            self.events[a]
                .time()
                .partial_cmp(&self.events[b].time())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        indices
    }

    /// Get an iterator over all events
    pub fn iter(&'_ self) -> std::slice::Iter<'_, DoseEvent> {
        self.events.iter()
    }

    /// Get the number of events in this schedule
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the schedule has any events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl IntoIterator for Schedule {
    type Item = DoseEvent;
    type IntoIter = std::vec::IntoIter<DoseEvent>;
    /// Consumes the schedule and yields owned events
    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}

impl<'a> IntoIterator for &'a Schedule {
    type Item = &'a DoseEvent;
    type IntoIter = std::slice::Iter<'a, DoseEvent>;
    /// Iterate immutably over all events in the schedule
    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Schedule with {} events:", self.events.len())?;
        for event in &self.events {
            writeln!(f, "  {}", event)?;
        }
        Ok(())
    }
}
