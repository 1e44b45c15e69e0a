use core::fmt;

/// Raw instruction word which doesn't match any CHIP-8 opcode
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DecodeError(pub u16);

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid or unsupported opcode {:04X}", self.0)
    }
}

/// Everything `Plum8` may report while running a program
///
/// None of the variants is fatal for the interpreter itself, the caller decides
/// whether to carry on.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Error {
    /// Instruction word at `addr` could not be decoded
    Decode { addr: u16, opcode: u16 },
    /// Subroutine call with all 16 stack slots in use
    StackOverflow,
    /// Return with no subroutine on the stack
    StackUnderflow,
    /// Key index outside of 0x0..=0xF
    InvalidKey(u8),
    /// `Builder` was not given a context
    MissingContext,
    /// `Builder` was given a setting it can't work with
    InvalidConfig(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::Decode { addr, opcode } => {
                write!(f, "invalid or unsupported opcode {:04X} at {:03X}", opcode, addr)
            }
            Error::StackOverflow => write!(f, "cannot enter subroutine, stack is full"),
            Error::StackUnderflow => write!(f, "cannot return, not in subroutine"),
            Error::InvalidKey(key) => write!(f, "key {:#04X} is not on the keypad", key),
            Error::MissingContext => write!(f, "context not provided"),
            Error::InvalidConfig(what) => write!(f, "invalid configuration: {}", what),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_reports_address_and_opcode() {
        let err = Error::Decode {
            addr: 0x2A4,
            opcode: 0x5AB1,
        };
        assert_eq!(
            err.to_string(),
            "invalid or unsupported opcode 5AB1 at 2A4",
        );
        assert_eq!(
            DecodeError(0xE0FF).to_string(),
            "invalid or unsupported opcode E0FF",
        );
    }
}
