use thiserror::Error;

/// Rejected descriptor fields. Every variant is an invalid-argument signal;
/// sampling and rendering never produce these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FlowerError {
    #[error("petal type {0} is out of range")]
    PetalType(usize),

    #[error("leaf type {0} is out of range")]
    LeafType(usize),

    #[error("color pair {0} is out of range")]
    ColorPair(usize),

    #[error("stem height {0} is outside 8..=15")]
    StemHeight(u32),

    #[error("leaf position {index} = {value} is outside its band")]
    LeafPosition { index: usize, value: u32 },
}
