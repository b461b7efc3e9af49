#![forbid(unsafe_code)]

//! Core: geometry primitives and time-based interpolation shared by the
//! layout, style, and chart crates.

pub mod animation;
pub mod geometry;
