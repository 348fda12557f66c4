mod component;
mod panel;
pub mod physics;
mod render;
pub mod seed;
pub mod simulation;
pub mod types;

pub use component::EntityGraphCanvas;
