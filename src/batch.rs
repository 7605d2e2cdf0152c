use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    canvas::Canvas,
    error::FlowerError,
    flower::{CompactRecord, FlowerDescriptor},
    render::draw,
    rng::RngManager,
};

pub const DEFAULT_BATCH_SIZE: usize = 12;

/// One generation of flowers. Regenerating builds a new `Batch`; existing
/// ones are never edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    serial: u64,
    flowers: Vec<FlowerDescriptor>,
}

impl Batch {
    /// Independent draws; duplicates are allowed.
    pub fn sample<R: Rng>(serial: u64, size: usize, rng: &mut R) -> Self {
        let flowers = (0..size).map(|_| FlowerDescriptor::sample(rng)).collect();
        Self { serial, flowers }
    }

    pub fn from_records(serial: u64, records: &[CompactRecord]) -> Result<Self, FlowerError> {
        let flowers = records
            .iter()
            .map(CompactRecord::decode)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { serial, flowers })
    }

    pub fn serial(&self) -> u64 {
        self.serial
    }

    pub fn len(&self) -> usize {
        self.flowers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flowers.is_empty()
    }

    pub fn flowers(&self) -> &[FlowerDescriptor] {
        &self.flowers
    }

    pub fn get(&self, index: usize) -> Option<&FlowerDescriptor> {
        self.flowers.get(index)
    }

    pub fn records(&self) -> Vec<CompactRecord> {
        self.flowers.iter().map(FlowerDescriptor::encode).collect()
    }

    pub fn render_all(&self) -> Vec<Canvas> {
        self.flowers.iter().map(draw).collect()
    }

    /// Pretty-printed array of compact records.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.records())
    }

    pub fn summary(&self) -> BatchSummary {
        BatchSummary {
            serial: self.serial,
            flowers: self.records(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub serial: u64,
    pub flowers: Vec<CompactRecord>,
}

/// Owns the random streams and the current batch.
pub struct Garden {
    rng: RngManager,
    batch_size: usize,
    current: Batch,
}

impl Garden {
    pub fn new(seed: u64, batch_size: usize) -> Self {
        let mut rng = RngManager::new(seed);
        let current = Batch::sample(1, batch_size, &mut rng.next_batch());
        Self {
            rng,
            batch_size,
            current,
        }
    }

    pub fn current(&self) -> &Batch {
        &self.current
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn seed(&self) -> u64 {
        self.rng.master_seed()
    }

    /// Replaces the working set wholesale.
    pub fn regenerate(&mut self) -> &Batch {
        let mut stream = self.rng.next_batch();
        self.current = Batch::sample(self.rng.current_batch(), self.batch_size, &mut stream);
        tracing::debug!(
            serial = self.current.serial(),
            size = self.batch_size,
            "regenerated batch"
        );
        &self.current
    }
}
