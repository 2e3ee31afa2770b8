//! Tessera engine crate.
//!
//! Owns the platform + GPU runtime pieces and the immediate-mode batch
//! renderer that collects quads and boxes into as few draw calls as possible.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
pub mod paint;
