//! Core types and definitions for the Proxemy simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! spherical math, the spatial frame every entity moves with, life and
//! weapon-pattern capabilities, the generic state machine, components,
//! commands, events, snapshots, configuration and the narrow traits the
//! simulation uses to talk to rendering and detection collaborators.

pub mod callbacks;
pub mod cannon;
pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod fsm;
pub mod interfaces;
pub mod life;
pub mod pattern;
pub mod spatial;
pub mod state;
pub mod types;

pub use error::{Error, Result};
