pub mod context;
pub mod keymap;
pub mod logger;
pub mod rom;

pub use context::HostContext;
pub use keymap::{KeyHold, KeyScript};
