use std::sync::Arc;

use serde::Serialize;

use crate::config::ArchiveConfig;
use crate::error::NoveltyError;
use crate::fittest::FittestTracker;
use crate::item::NoveltyItem;
use crate::metric::{build_distance_metric, DistanceMetric};
use crate::organism::{HasBehaviorItem, Organism};
use crate::ranking::{average_knn, nearest};

const STAGNATION_GENERATIONS: usize = 10;
const THRESHOLD_DECAY: f64 = 0.95;
const THRESHOLD_GROWTH: f64 = 1.2;
const GROWTH_TRIGGER_ADDS: usize = 4;

/// Every novel behavior found so far, plus the fittest ones and the adaptive
/// admission threshold.
pub struct NoveltyArchive {
    novel_items: Vec<Arc<NoveltyItem>>,
    fittest: FittestTracker,
    generation: usize,
    metric: Arc<dyn DistanceMetric>,
    config: ArchiveConfig,
    novelty_threshold: f64,
    items_added_in_generation: usize,
    generation_index: usize,
    time_out: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArchiveSummary {
    pub generation: usize,
    pub novelty_threshold: f64,
    pub archive_size: usize,
    pub fittest: Vec<f64>,
    pub time_out: usize,
    pub metric: &'static str,
}

impl NoveltyArchive {
    pub fn new(config: ArchiveConfig, metric: Arc<dyn DistanceMetric>) -> Self {
        log::debug!(
            "novelty archive: metric={} threshold={} floor={} neighbors={}",
            metric.name(),
            config.novelty_threshold,
            config.novelty_floor,
            config.neighbors
        );
        Self {
            novel_items: Vec::new(),
            fittest: FittestTracker::new(config.fittest_allowed_size),
            generation: 0,
            metric,
            novelty_threshold: config.novelty_threshold,
            items_added_in_generation: 0,
            generation_index: config.archive_seed_amount,
            time_out: 0,
            config,
        }
    }

    pub fn from_config(config: ArchiveConfig) -> Self {
        let metric = build_distance_metric(config.metric);
        Self::new(config, metric)
    }

    /// Scores one organism's behavior.
    ///
    /// With `only_fitness` the K-nearest-neighbor density against archive and
    /// population becomes the organism's fitness and the archive is left
    /// alone. Otherwise the distance to the nearest archived item decides
    /// admission. Either way the item's novelty and generation are updated.
    pub fn evaluate_individual<O, P>(
        &mut self,
        organism: &mut O,
        population: &[P],
        only_fitness: bool,
    ) -> Result<f64, NoveltyError>
    where
        O: Organism + ?Sized,
        P: HasBehaviorItem,
    {
        let (density, admit) = {
            let item = organism
                .behavior()
                .ok_or(NoveltyError::MissingBehaviorData {
                    context: "evaluate_individual",
                })?;
            if only_fitness {
                let candidates = self
                    .novel_items
                    .iter()
                    .map(Arc::as_ref)
                    .chain(population.iter().filter_map(|o| o.behavior().map(Arc::as_ref)));
                let density =
                    average_knn(item, self.config.neighbors, candidates, self.metric.as_ref());
                (density, false)
            } else {
                let density = average_knn(
                    item,
                    1,
                    self.novel_items.iter().map(Arc::as_ref),
                    self.metric.as_ref(),
                );
                let admit = !item.is_added()
                    && (density > self.novelty_threshold
                        || self.novel_items.len() < self.config.archive_seed_amount);
                (density, admit)
            }
        };

        let generation = self.generation;
        let slot = organism
            .behavior_mut()
            .ok_or(NoveltyError::MissingBehaviorData {
                context: "evaluate_individual",
            })?;
        // Archived items are shared and frozen; make_mut copies them first.
        let item = Arc::make_mut(slot);
        item.novelty = density;
        item.generation = generation;
        if admit {
            item.added = true;
            item.age = 1.0;
            self.add_novelty_item(Arc::clone(slot));
        }

        if only_fitness {
            organism.set_fitness(density);
        }
        Ok(density)
    }

    /// Evaluates a whole population in order against a snapshot of its
    /// behaviors taken before the pass.
    pub fn evaluate_population<O: Organism>(
        &mut self,
        population: &mut [O],
        only_fitness: bool,
    ) -> Result<Vec<f64>, NoveltyError> {
        let snapshot: Vec<Arc<NoveltyItem>> = population
            .iter()
            .filter_map(|o| o.behavior().cloned())
            .collect();
        population
            .iter_mut()
            .map(|organism| self.evaluate_individual(organism, &snapshot, only_fitness))
            .collect()
    }

    pub fn update_fittest_with_organism<O>(&mut self, organism: &O) -> Result<(), NoveltyError>
    where
        O: HasBehaviorItem + ?Sized,
    {
        let item = organism
            .behavior()
            .ok_or(NoveltyError::MissingBehaviorData {
                context: "update_fittest_with_organism",
            })?;
        self.fittest.offer(item);
        Ok(())
    }

    pub fn end_of_generation(&mut self) {
        self.generation += 1;
        self.adjust_archive_settings();
    }

    pub fn novel_items(&self) -> &[Arc<NoveltyItem>] {
        &self.novel_items
    }

    pub fn fittest_items(&self) -> &[NoveltyItem] {
        self.fittest.items()
    }

    pub const fn generation(&self) -> usize {
        self.generation
    }

    pub const fn novelty_threshold(&self) -> f64 {
        self.novelty_threshold
    }

    pub const fn novelty_floor(&self) -> f64 {
        self.config.novelty_floor
    }

    pub const fn time_out(&self) -> usize {
        self.time_out
    }

    pub const fn items_added_in_generation(&self) -> usize {
        self.items_added_in_generation
    }

    pub const fn generation_index(&self) -> usize {
        self.generation_index
    }

    pub const fn config(&self) -> &ArchiveConfig {
        &self.config
    }

    pub fn metric(&self) -> &dyn DistanceMetric {
        self.metric.as_ref()
    }

    pub fn summary(&self) -> ArchiveSummary {
        ArchiveSummary {
            generation: self.generation,
            novelty_threshold: self.novelty_threshold,
            archive_size: self.novel_items.len(),
            fittest: self.fittest.items().iter().map(|i| i.fitness).collect(),
            time_out: self.time_out,
            metric: self.metric.name(),
        }
    }

    /// Individual id of the archived item closest to `item`.
    pub fn nearest_archived(&self, item: &NoveltyItem) -> Option<usize> {
        nearest(
            item,
            self.novel_items.iter().map(Arc::as_ref),
            self.metric.as_ref(),
        )
        .map(|record| record.from.individual_id)
    }

    fn add_novelty_item(&mut self, item: Arc<NoveltyItem>) {
        if log::log_enabled!(log::Level::Debug) {
            log::debug!(
                "archive admit: generation={} individual={} novelty={:.4} nearest={:?} size={}",
                self.generation,
                item.individual_id,
                item.novelty,
                self.nearest_archived(&item),
                self.novel_items.len() + 1
            );
        }
        self.novel_items.push(item);
        self.items_added_in_generation += 1;
    }

    fn adjust_archive_settings(&mut self) {
        if self.items_added_in_generation == 0 {
            self.time_out += 1;
        } else {
            self.time_out = 0;
        }

        if self.time_out == STAGNATION_GENERATIONS {
            let previous = self.novelty_threshold;
            self.novelty_threshold *= THRESHOLD_DECAY;
            if self.novelty_threshold < self.config.novelty_floor {
                self.novelty_threshold = self.config.novelty_floor;
            }
            self.time_out = 0;
            log::info!(
                "novelty threshold lowered {previous} -> {} after {STAGNATION_GENERATIONS} stagnant generations",
                self.novelty_threshold
            );
        }

        // No ceiling on growth.
        if self.items_added_in_generation >= GROWTH_TRIGGER_ADDS {
            let previous = self.novelty_threshold;
            self.novelty_threshold *= THRESHOLD_GROWTH;
            log::info!(
                "novelty threshold raised {previous} -> {} after {} additions",
                self.novelty_threshold,
                self.items_added_in_generation
            );
        }

        self.items_added_in_generation = 0;
        self.generation_index = self.novel_items.len();
    }
}
