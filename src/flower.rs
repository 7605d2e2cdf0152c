use std::ops::RangeInclusive;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    error::FlowerError,
    palette::{ColorPair, Template, COLOR_PAIRS, LEAVES, PETALS},
};

pub const STEM_HEIGHT: RangeInclusive<u32> = 8..=15;
pub const LEAF_BANDS: [RangeInclusive<u32>; 2] = [4..=7, 8..=11];

/// Everything needed to draw one flower. Fields are validated on
/// construction and never change afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlowerDescriptor {
    petal_type: usize,
    leaf_type: usize,
    color_pair: usize,
    stem_height: u32,
    leaf_positions: [u32; 2],
}

impl FlowerDescriptor {
    pub fn new(
        petal_type: usize,
        leaf_type: usize,
        color_pair: usize,
        stem_height: u32,
        leaf_positions: [u32; 2],
    ) -> Result<Self, FlowerError> {
        if petal_type >= PETALS.len() {
            return Err(FlowerError::PetalType(petal_type));
        }
        if leaf_type >= LEAVES.len() {
            return Err(FlowerError::LeafType(leaf_type));
        }
        if color_pair >= COLOR_PAIRS.len() {
            return Err(FlowerError::ColorPair(color_pair));
        }
        if !STEM_HEIGHT.contains(&stem_height) {
            return Err(FlowerError::StemHeight(stem_height));
        }
        for (index, (value, band)) in leaf_positions.iter().zip(LEAF_BANDS.iter()).enumerate() {
            if !band.contains(value) {
                return Err(FlowerError::LeafPosition {
                    index,
                    value: *value,
                });
            }
        }
        Ok(Self {
            petal_type,
            leaf_type,
            color_pair,
            stem_height,
            leaf_positions,
        })
    }

    /// Draws every field independently and uniformly from its domain.
    pub fn sample<R: Rng>(rng: &mut R) -> Self {
        Self {
            petal_type: rng.gen_range(0..PETALS.len()),
            leaf_type: rng.gen_range(0..LEAVES.len()),
            color_pair: rng.gen_range(0..COLOR_PAIRS.len()),
            stem_height: rng.gen_range(STEM_HEIGHT),
            leaf_positions: [
                rng.gen_range(LEAF_BANDS[0].clone()),
                rng.gen_range(LEAF_BANDS[1].clone()),
            ],
        }
    }

    pub fn petal_type(&self) -> usize {
        self.petal_type
    }

    pub fn leaf_type(&self) -> usize {
        self.leaf_type
    }

    pub fn color_pair(&self) -> usize {
        self.color_pair
    }

    pub fn stem_height(&self) -> u32 {
        self.stem_height
    }

    pub fn leaf_positions(&self) -> [u32; 2] {
        self.leaf_positions
    }

    pub fn petal(&self) -> &'static Template {
        &PETALS[self.petal_type]
    }

    pub fn leaf(&self) -> &'static Template {
        &LEAVES[self.leaf_type]
    }

    pub fn colors(&self) -> &'static ColorPair {
        &COLOR_PAIRS[self.color_pair]
    }

    pub fn encode(&self) -> CompactRecord {
        CompactRecord {
            p: self.petal_type,
            l: self.leaf_type,
            c: self.color_pair,
            s: self.stem_height,
            lp: self.leaf_positions,
        }
    }
}

/// Short-key wire form of a descriptor: `{"p":0,"l":1,"c":2,"s":9,"lp":[5,10]}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompactRecord {
    pub p: usize,
    pub l: usize,
    pub c: usize,
    pub s: u32,
    pub lp: [u32; 2],
}

impl CompactRecord {
    pub fn decode(&self) -> Result<FlowerDescriptor, FlowerError> {
        FlowerDescriptor::new(self.p, self.l, self.c, self.s, self.lp)
    }
}

impl From<FlowerDescriptor> for CompactRecord {
    fn from(descriptor: FlowerDescriptor) -> Self {
        descriptor.encode()
    }
}

impl TryFrom<CompactRecord> for FlowerDescriptor {
    type Error = FlowerError;

    fn try_from(record: CompactRecord) -> Result<Self, Self::Error> {
        record.decode()
    }
}

pub fn encode(descriptor: &FlowerDescriptor) -> CompactRecord {
    descriptor.encode()
}

pub fn decode(record: &CompactRecord) -> Result<FlowerDescriptor, FlowerError> {
    record.decode()
}
