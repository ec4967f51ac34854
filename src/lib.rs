//! Shipwright - procedural ship construct engine
//!
//! Places axis-aligned blocks one request at a time on an integer grid,
//! enforcing non-overlap, optional X/Y mirror symmetry and reserved zones.
//! What to place, and in which order, is up to the caller.

pub mod catalog;
pub mod construct;
pub mod core;
pub mod grid;
pub mod symmetry;
