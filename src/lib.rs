//! Wayfinder - a technology knowledge graph and learning-path engine.
//!
//! This crate provides the core library functionality for Wayfinder.

pub mod core;

pub use crate::core::engine::Wayfinder;
