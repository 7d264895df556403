pub mod engine;
pub mod teams;
pub mod weights;
