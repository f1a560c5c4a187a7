//! Proxemy runner.
//!
//! Hosts the simulation engine on a game loop thread and drives it from
//! the command line, either in real time or as fast as possible.

pub mod control;
pub mod game_loop;
pub mod pilot;
pub mod state;

pub use proxemy_core as core;
