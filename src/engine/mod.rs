// src/engine/mod.rs

//! End-to-end supervised run.
//!
//! [`Session`] owns the resolved settings, the clock and the three sinks,
//! writes the header, hands the child to the [`crate::exec`] core, and
//! writes the footer once the exit disposition is known.

pub mod session;

pub use session::{Session, Terminal};
