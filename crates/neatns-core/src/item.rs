use serde::{Deserialize, Serialize};

/// Behavior record produced by one organism evaluation.
///
/// `data` is opaque to the archive; only the distance metric reads it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoveltyItem {
    pub individual_id: usize,
    pub data: Vec<f64>,
    pub fitness: f64,
    pub novelty: f64,
    pub age: f64,
    pub generation: usize,
    #[serde(default)]
    pub(crate) added: bool,
}

impl NoveltyItem {
    pub fn new(individual_id: usize, data: Vec<f64>) -> Self {
        Self {
            individual_id,
            data,
            ..Self::default()
        }
    }

    pub fn with_fitness(mut self, fitness: f64) -> Self {
        self.fitness = fitness;
        self
    }

    /// True once the item has been admitted to a novelty archive.
    pub fn is_added(&self) -> bool {
        self.added
    }
}
