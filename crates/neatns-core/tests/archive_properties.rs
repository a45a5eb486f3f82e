use std::sync::Arc;

use neatns_core::{
    average_knn, ArchiveConfig, EuclideanDistance, FittestTracker, HasBehaviorItem, HasFitness,
    NoveltyArchive, NoveltyItem,
};
use proptest::prelude::*;

struct Agent {
    fitness: f64,
    behavior: Option<Arc<NoveltyItem>>,
}

impl Agent {
    fn at(id: usize, data: Vec<f64>, fitness: f64) -> Self {
        Self {
            fitness: 0.0,
            behavior: Some(Arc::new(NoveltyItem::new(id, data).with_fitness(fitness))),
        }
    }
}

impl HasBehaviorItem for Agent {
    fn behavior(&self) -> Option<&Arc<NoveltyItem>> {
        self.behavior.as_ref()
    }

    fn behavior_mut(&mut self) -> Option<&mut Arc<NoveltyItem>> {
        self.behavior.as_mut()
    }
}

impl HasFitness for Agent {
    fn fitness(&self) -> f64 {
        self.fitness
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }
}

fn behavior() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-50.0_f64..50.0, 1..4)
}

// One generation: behaviors to evaluate, then whether to use fitness mode.
fn generations() -> impl Strategy<Value = Vec<(Vec<Vec<f64>>, bool)>> {
    prop::collection::vec(
        (prop::collection::vec(behavior(), 0..8), any::<bool>()),
        1..30,
    )
}

proptest! {
    #[test]
    fn empty_candidates_score_zero(data in behavior(), k in 0_usize..20) {
        let query = NoveltyItem::new(0, data);
        let none: Vec<NoveltyItem> = Vec::new();
        prop_assert_eq!(average_knn(&query, k, &none, &EuclideanDistance), 0.0);
    }

    #[test]
    fn density_never_exceeds_mean_of_all_distances(
        data in behavior(),
        others in prop::collection::vec(behavior(), 1..12),
        k in 1_usize..20,
    ) {
        let query = NoveltyItem::new(0, data);
        let candidates: Vec<NoveltyItem> = others
            .into_iter()
            .enumerate()
            .map(|(i, d)| NoveltyItem::new(i + 1, d))
            .collect();
        let all = average_knn(&query, candidates.len(), &candidates, &EuclideanDistance);
        let knn = average_knn(&query, k, &candidates, &EuclideanDistance);
        prop_assert!(knn >= 0.0);
        prop_assert!(knn <= all + 1e-9);
    }

    #[test]
    fn archive_only_grows(history in generations(), threshold in 0.25_f64..20.0) {
        let mut archive = NoveltyArchive::from_config(ArchiveConfig::new(threshold));
        let mut previous = 0;
        let mut next_id = 0;

        for (behaviors, only_fitness) in history {
            let mut population: Vec<Agent> = behaviors
                .into_iter()
                .map(|data| {
                    next_id += 1;
                    Agent::at(next_id, data, 0.0)
                })
                .collect();
            let before = archive.novel_items().len();
            archive.evaluate_population(&mut population, only_fitness).expect("evaluate");

            let size = archive.novel_items().len();
            prop_assert!(size >= previous);
            if only_fitness {
                prop_assert_eq!(size, before);
            }
            previous = size;
            archive.end_of_generation();
        }

        let ids: std::collections::HashSet<usize> =
            archive.novel_items().iter().map(|i| i.individual_id).collect();
        prop_assert_eq!(ids.len(), archive.novel_items().len());
    }

    #[test]
    fn threshold_stays_above_floor(
        adds_per_generation in prop::collection::vec(0_usize..6, 1..120),
        threshold in 0.25_f64..3.0,
    ) {
        let mut archive = NoveltyArchive::from_config(ArchiveConfig::new(threshold));
        let mut x = 0.0;

        for adds in adds_per_generation {
            for _ in 0..adds {
                // Far enough apart to always clear the threshold.
                x += 1.0e6;
                let mut agent = Agent::at(0, vec![x], 0.0);
                archive.evaluate_individual(&mut agent, &[] as &[Agent], false).expect("evaluate");
            }
            archive.end_of_generation();
            prop_assert!(archive.novelty_threshold() >= archive.novelty_floor());
            prop_assert!(archive.time_out() < 10);
        }
    }

    #[test]
    fn fittest_tracker_is_bounded_and_sorted(
        fitness in prop::collection::vec(-100.0_f64..100.0, 0..60),
    ) {
        let mut tracker = FittestTracker::new(5);
        for (id, f) in fitness.iter().enumerate() {
            tracker.offer(&NoveltyItem::new(id, vec![]).with_fitness(*f));
            prop_assert!(tracker.len() <= 5);
            let values: Vec<f64> = tracker.items().iter().map(|i| i.fitness).collect();
            prop_assert!(values.windows(2).all(|w| w[0] >= w[1]));
        }

        let mut sorted = fitness.clone();
        sorted.sort_by(|a, b| b.total_cmp(a));
        sorted.truncate(5);
        let kept: Vec<f64> = tracker.items().iter().map(|i| i.fitness).collect();
        prop_assert_eq!(kept, sorted);
    }
}

#[test]
fn ten_stagnant_generations_lower_threshold_once() {
    let mut archive = NoveltyArchive::from_config(ArchiveConfig::new(6.0));
    let mut agent = Agent::at(0, vec![0.0], 0.0);
    archive
        .evaluate_individual(&mut agent, &[] as &[Agent], false)
        .expect("evaluate");
    archive.end_of_generation();

    let mut changes = 0;
    let mut last = archive.novelty_threshold();
    for _ in 0..10 {
        archive.end_of_generation();
        if archive.novelty_threshold() != last {
            changes += 1;
            last = archive.novelty_threshold();
        }
    }
    assert_eq!(changes, 1);
    assert!((archive.novelty_threshold() - 6.0 * 0.95).abs() < 1e-12);
    assert_eq!(archive.time_out(), 0);
}

#[test]
fn fittest_updates_follow_item_fitness() {
    let mut archive = NoveltyArchive::from_config(ArchiveConfig::new(6.0));
    for (id, f) in [4.0, 11.0, 2.0, 7.0, 9.0, 1.0, 12.0].into_iter().enumerate() {
        let agent = Agent::at(id, vec![f], f);
        archive.update_fittest_with_organism(&agent).expect("update");
    }
    let ids: Vec<usize> = archive.fittest_items().iter().map(|i| i.individual_id).collect();
    assert_eq!(ids, vec![6, 1, 4, 3, 0]);
}
