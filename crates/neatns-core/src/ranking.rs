use crate::item::NoveltyItem;
use crate::metric::DistanceMetric;

/// Distance from one candidate (`from`) to the query item (`to`).
#[derive(Debug, Clone, Copy)]
pub struct DistanceRecord<'a> {
    pub distance: f64,
    pub from: &'a NoveltyItem,
    pub to: &'a NoveltyItem,
}

pub fn compute_distances<'a, I>(
    query: &'a NoveltyItem,
    candidates: I,
    metric: &dyn DistanceMetric,
) -> Vec<DistanceRecord<'a>>
where
    I: IntoIterator<Item = &'a NoveltyItem>,
{
    candidates
        .into_iter()
        .map(|candidate| DistanceRecord {
            distance: metric.distance(candidate, query),
            from: candidate,
            to: query,
        })
        .collect()
}

pub fn sort_ascending_by_distance(records: &mut [DistanceRecord<'_>]) {
    records.sort_by(|a, b| a.distance.total_cmp(&b.distance));
}

/// Mean distance from `query` to its `k` nearest candidates.
///
/// Fewer than `k` candidates averages over all of them; no candidates gives 0.
pub fn average_knn<'a, I>(
    query: &'a NoveltyItem,
    k: usize,
    candidates: I,
    metric: &dyn DistanceMetric,
) -> f64
where
    I: IntoIterator<Item = &'a NoveltyItem>,
{
    let mut records = compute_distances(query, candidates, metric);
    sort_ascending_by_distance(&mut records);

    let count = k.min(records.len());
    if count == 0 {
        return 0.0;
    }
    let sum: f64 = records.iter().take(count).map(|r| r.distance).sum();
    sum / count as f64
}

pub fn nearest<'a, I>(
    query: &'a NoveltyItem,
    candidates: I,
    metric: &dyn DistanceMetric,
) -> Option<DistanceRecord<'a>>
where
    I: IntoIterator<Item = &'a NoveltyItem>,
{
    compute_distances(query, candidates, metric)
        .into_iter()
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}
