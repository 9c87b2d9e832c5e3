use std::collections::{HashMap, VecDeque};

use crate::ids::{CombatantId, SourceId};

/// Per-combatant FIFO of declarations waiting to be superseded by a reroll.
#[derive(Clone, Debug, Default)]
pub struct RerollQueues {
    queues: HashMap<CombatantId, VecDeque<SourceId>>,
}

impl RerollQueues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if `source` was already queued.
    pub fn enqueue(&mut self, combatant: CombatantId, source: SourceId) -> bool {
        let queue = self.queues.entry(combatant).or_default();
        if queue.contains(&source) {
            return false;
        }
        queue.push_back(source);
        true
    }

    /// Oldest pending id for `combatant`. Empty queues are removed.
    pub fn dequeue(&mut self, combatant: &CombatantId) -> Option<SourceId> {
        let queue = self.queues.get_mut(combatant)?;
        let source = queue.pop_front();
        if queue.is_empty() {
            self.queues.remove(combatant);
        }
        source
    }

    pub fn contains(&self, combatant: &CombatantId, source: &SourceId) -> bool {
        self.queues
            .get(combatant)
            .is_some_and(|queue| queue.contains(source))
    }

    pub fn depth(&self, combatant: &CombatantId) -> usize {
        self.queues.get(combatant).map_or(0, VecDeque::len)
    }

    /// Clears one combatant's queue, or every queue when `combatant` is `None`.
    pub fn clear(&mut self, combatant: Option<&CombatantId>) {
        match combatant {
            Some(combatant) => {
                self.queues.remove(combatant);
            }
            None => self.queues.clear(),
        }
    }
}
