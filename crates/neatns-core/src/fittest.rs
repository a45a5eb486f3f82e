use std::cmp::Ordering;

use crate::item::NoveltyItem;

/// Bounded list of the fittest behaviors seen so far, best first.
#[derive(Debug, Clone)]
pub struct FittestTracker {
    items: Vec<NoveltyItem>,
    capacity: usize,
}

impl FittestTracker {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity.saturating_add(1)),
            capacity,
        }
    }

    pub fn items(&self) -> &[NoveltyItem] {
        &self.items
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn best(&self) -> Option<&NoveltyItem> {
        self.items.first()
    }

    /// Stores a copy of `candidate` if it belongs in the list. Returns whether
    /// the list changed.
    pub fn offer(&mut self, candidate: &NoveltyItem) -> bool {
        if self.items.len() < self.capacity {
            self.items.push(candidate.clone());
            self.sort_by_fitness_desc();
            return true;
        }

        let Some(least) = self.items.last() else {
            return false;
        };
        if candidate.fitness <= least.fitness {
            return false;
        }

        log::trace!(
            "fittest list: replacing fitness {} with {} (individual {})",
            least.fitness,
            candidate.fitness,
            candidate.individual_id
        );
        self.items.push(candidate.clone());
        self.sort_by_fitness_desc();
        if self.items.len() > self.capacity {
            self.items.truncate(self.capacity);
        }
        true
    }

    fn sort_by_fitness_desc(&mut self) {
        self.items.sort_by(by_fitness_desc);
    }
}

fn by_fitness_desc(a: &NoveltyItem, b: &NoveltyItem) -> Ordering {
    b.fitness.total_cmp(&a.fitness)
}
