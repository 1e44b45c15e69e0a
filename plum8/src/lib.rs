#![cfg_attr(not(test), no_std)]
pub mod builder;
pub mod context;
pub mod error;
pub mod frame;
pub mod keypad;
pub mod memory;
pub mod opcode;
pub mod plum;
pub mod stack;
pub mod timer;
pub mod utils;

pub use builder::Builder;
pub use context::Context;
pub use error::{DecodeError, Error};
pub use frame::Frame;
pub use keypad::{Keypad, WaitState};
pub use memory::Memory;
pub use opcode::OpCode;
pub use plum::Plum8;
