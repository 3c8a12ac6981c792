pub mod data;
pub mod error;
pub mod export;
pub mod geometry;
pub mod processing;
pub mod render;
pub mod state;
