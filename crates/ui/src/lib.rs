#![forbid(unsafe_code)]

pub mod screen;
pub mod vm;

pub use screen::{Screen, screen_for};
