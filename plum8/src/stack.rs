use heapless::Vec;

use crate::error::Error;

/// Number of return addresses the stack can hold
pub const STACK_DEPTH: usize = 16;

/// Call stack of subroutine return addresses
///
/// The stack pointer is the number of addresses on the stack, so it always
/// stays within `0..=STACK_DEPTH`.
#[derive(Debug, Default)]
pub struct Stack(Vec<u16, STACK_DEPTH>);

impl Stack {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, addr: u16) -> Result<(), Error> {
        self.0.push(addr).or(Err(Error::StackOverflow))
    }

    pub fn pop(&mut self) -> Result<u16, Error> {
        self.0.pop().ok_or(Error::StackUnderflow)
    }

    /// Stack pointer
    pub fn sp(&self) -> u8 {
        self.0.len() as u8
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.0
    }
}
