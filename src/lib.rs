pub mod batch;
pub mod canvas;
pub mod config;
pub mod error;
pub mod flower;
pub mod palette;
pub mod render;
pub mod rng;
pub mod snapshot;
pub mod web;

pub use batch::{Batch, Garden};
pub use error::FlowerError;
pub use flower::{decode, encode, CompactRecord, FlowerDescriptor};
pub use render::render;
