pub mod boxes;
pub mod rapier;
