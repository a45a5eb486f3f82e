use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::item::NoveltyItem;

/// Distance between two behavior records.
///
/// Implementations are expected to be symmetric and non-negative; the
/// archive never checks either.
pub trait DistanceMetric: Send + Sync {
    fn name(&self) -> &'static str;

    fn distance(&self, a: &NoveltyItem, b: &NoveltyItem) -> f64;
}

impl<F> DistanceMetric for F
where
    F: Fn(&NoveltyItem, &NoveltyItem) -> f64 + Send + Sync,
{
    fn name(&self) -> &'static str {
        "custom"
    }

    fn distance(&self, a: &NoveltyItem, b: &NoveltyItem) -> f64 {
        self(a, b)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MetricConfig {
    #[default]
    Euclidean,
    Manhattan,
    Hamming {
        tolerance: f64,
    },
}

impl MetricConfig {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "euclidean" | "l2" => Some(Self::Euclidean),
            "manhattan" | "l1" => Some(Self::Manhattan),
            "hamming" => Some(Self::Hamming { tolerance: 0.0 }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EuclideanDistance;

impl DistanceMetric for EuclideanDistance {
    fn name(&self) -> &'static str {
        "euclidean"
    }

    fn distance(&self, a: &NoveltyItem, b: &NoveltyItem) -> f64 {
        paired(&a.data, &b.data)
            .map(|(x, y)| (x - y) * (x - y))
            .sum::<f64>()
            .sqrt()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ManhattanDistance;

impl DistanceMetric for ManhattanDistance {
    fn name(&self) -> &'static str {
        "manhattan"
    }

    fn distance(&self, a: &NoveltyItem, b: &NoveltyItem) -> f64 {
        paired(&a.data, &b.data).map(|(x, y)| (x - y).abs()).sum()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HammingDistance {
    pub tolerance: f64,
}

impl DistanceMetric for HammingDistance {
    fn name(&self) -> &'static str {
        "hamming"
    }

    fn distance(&self, a: &NoveltyItem, b: &NoveltyItem) -> f64 {
        let tolerance = self.tolerance.abs();
        paired(&a.data, &b.data)
            .filter(|(x, y)| (x - y).abs() > tolerance)
            .count() as f64
    }
}

pub fn build_distance_metric(cfg: MetricConfig) -> Arc<dyn DistanceMetric> {
    match cfg {
        MetricConfig::Euclidean => Arc::new(EuclideanDistance),
        MetricConfig::Manhattan => Arc::new(ManhattanDistance),
        MetricConfig::Hamming { tolerance } => Arc::new(HammingDistance { tolerance }),
    }
}

// Shorter vectors are padded with zeros.
fn paired<'a>(a: &'a [f64], b: &'a [f64]) -> impl Iterator<Item = (f64, f64)> + 'a {
    let len = a.len().max(b.len());
    (0..len).map(move |i| {
        (
            a.get(i).copied().unwrap_or(0.0),
            b.get(i).copied().unwrap_or(0.0),
        )
    })
}
