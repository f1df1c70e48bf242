//! Input mapping: raw keys become [`Action`]s, held actions become a movement
//! intent, and mouse motion is accumulated until the frame consumes it.
//!
//! Consumers never look at key codes directly, so rebinding only touches
//! [`KeyBindings`].

pub mod action;
mod state;

pub use action::{Action, KeyBindings};
pub use state::{InputState, MoveIntent};

pub fn crate_info() -> &'static str {
    "walksim-input v0.1.0"
}
