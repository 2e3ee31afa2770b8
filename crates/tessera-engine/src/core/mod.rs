//! Core engine-facing contracts.
//!
//! The interface between the runtime (platform loop) and applications: the
//! `App` trait and the per-frame context it receives.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
