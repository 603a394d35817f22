use farmsense_common::types::EnrichedAnimal;
use std::collections::HashSet;

/// Remembers which animals were critical at the previous poll.
#[derive(Debug, Default)]
pub struct CriticalTracker {
    previous: HashSet<String>,
}

impl CriticalTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the critical set of this poll and returns the animals that
    /// were not critical at the previous one, in list order.
    pub fn observe<'a>(&mut self, animals: &'a [EnrichedAnimal]) -> Vec<&'a EnrichedAnimal> {
        let current: HashSet<String> = animals
            .iter()
            .filter(|a| a.is_critical)
            .map(|a| a.record.id.clone())
            .collect();

        let newly: Vec<&EnrichedAnimal> = animals
            .iter()
            .filter(|a| a.is_critical && !self.previous.contains(&a.record.id))
            .collect();

        self.previous = current;
        newly
    }

    pub fn critical_ids(&self) -> &HashSet<String> {
        &self.previous
    }
}
