//! Pinboard: draw shapes on a triangular pin grid and hear them as music.
//!
//! A shape is a set of unit edges on a fixed hexagonal lattice ([`grid`]).
//! Graph analysis ([`graph`]) finds its longest trail and how busy each pin
//! is; the generators ([`generate`]) turn that, plus each pin's pitch
//! ([`notes`]), into a rhythm, a melodic phrase, or a chord progression.
//! [`event`] loops the result against a transport for playback.

pub mod board;
pub mod config;
pub mod error;
pub mod event;
pub mod generate;
pub mod graph;
pub mod grid;
pub mod notes;
pub mod track;

pub use error::{GestureRejection, PinboardError, Result};
