pub mod boxes;

pub use boxes::{BoxPair, BoxPairs, FallingBoxesPlugin, ResetBoxes};
