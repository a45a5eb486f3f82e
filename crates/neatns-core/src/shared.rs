use std::sync::Arc;

use parking_lot::Mutex;

use crate::archive::{ArchiveSummary, NoveltyArchive};
use crate::error::NoveltyError;
use crate::organism::{HasBehaviorItem, Organism};

/// Cloneable handle that serializes every archive mutation behind one lock,
/// for drivers that evaluate organisms on several threads.
#[derive(Clone)]
pub struct SharedNoveltyArchive {
    inner: Arc<Mutex<NoveltyArchive>>,
}

impl SharedNoveltyArchive {
    pub fn new(archive: NoveltyArchive) -> Self {
        Self {
            inner: Arc::new(Mutex::new(archive)),
        }
    }

    pub fn evaluate_individual<O, P>(
        &self,
        organism: &mut O,
        population: &[P],
        only_fitness: bool,
    ) -> Result<f64, NoveltyError>
    where
        O: Organism + ?Sized,
        P: HasBehaviorItem,
    {
        self.inner
            .lock()
            .evaluate_individual(organism, population, only_fitness)
    }

    pub fn update_fittest_with_organism<O>(&self, organism: &O) -> Result<(), NoveltyError>
    where
        O: HasBehaviorItem + ?Sized,
    {
        self.inner.lock().update_fittest_with_organism(organism)
    }

    pub fn end_of_generation(&self) {
        self.inner.lock().end_of_generation();
    }

    pub fn summary(&self) -> ArchiveSummary {
        self.inner.lock().summary()
    }

    /// Runs `f` with shared access to the archive while holding the lock.
    pub fn with<R>(&self, f: impl FnOnce(&NoveltyArchive) -> R) -> R {
        f(&self.inner.lock())
    }

    /// Returns the archive if this is the last handle.
    pub fn into_inner(self) -> Option<NoveltyArchive> {
        Arc::try_unwrap(self.inner).ok().map(Mutex::into_inner)
    }
}
