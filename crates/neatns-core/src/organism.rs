use std::sync::Arc;

use crate::item::NoveltyItem;

/// Access to the behavior record an organism carries between evaluations.
pub trait HasBehaviorItem {
    fn behavior(&self) -> Option<&Arc<NoveltyItem>>;

    fn behavior_mut(&mut self) -> Option<&mut Arc<NoveltyItem>>;
}

pub trait HasFitness {
    fn fitness(&self) -> f64;

    fn set_fitness(&mut self, fitness: f64);
}

/// What the archive needs from a population member.
pub trait Organism: HasBehaviorItem + HasFitness {}

impl<T: HasBehaviorItem + HasFitness + ?Sized> Organism for T {}

// Lets a plain list of behavior records stand in for a population.
impl HasBehaviorItem for Arc<NoveltyItem> {
    fn behavior(&self) -> Option<&Arc<NoveltyItem>> {
        Some(self)
    }

    fn behavior_mut(&mut self) -> Option<&mut Arc<NoveltyItem>> {
        Some(self)
    }
}
