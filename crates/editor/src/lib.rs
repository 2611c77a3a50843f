// Library crate: scene core, undo history and the headless command interface.
// The binary is a thin CLI over `command`.

pub mod command;
pub mod fixtures;
pub mod harness;
pub mod history;
pub mod mesh;
pub mod state;
