//! Flat 4K address space of the machine.
//!
//! Memory map:
//!   0x000-0x1ff  interpreter area, hex digit sprites live at `FONT_ADDR`
//!   0x200-0xfff  program
//!
//! Every address handed to `Memory` is reduced modulo `MEM_SIZE`, so no access
//! can ever leave the address space.

use core::fmt;

use log::warn;

/// How much RAM we have
pub const MEM_SIZE: usize = 0x1000;

/// Where programs are loaded, and the initial value of pc
pub const PROGRAM_START: u16 = 0x200;

/// Longest program image that fits into memory
pub const MAX_PROGRAM_SIZE: usize = MEM_SIZE - PROGRAM_START as usize;

/// Where the hex digit sprites start
pub const FONT_ADDR: u16 = 0x010;

/// Height in bytes of a single digit sprite
pub const FONT_SPRITE_HEIGHT: u16 = 5;

const ADDR_MASK: u16 = (MEM_SIZE - 1) as u16;

#[rustfmt::skip]
const FONT: [u8; 16 * FONT_SPRITE_HEIGHT as usize] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

pub struct Memory([u8; MEM_SIZE]);

impl Memory {
    /// Zeroed memory with the digit sprites baked in
    pub fn new() -> Self {
        let mut bytes = [0; MEM_SIZE];
        let font = FONT_ADDR as usize;
        bytes[font..font + FONT.len()].copy_from_slice(&FONT);
        Self(bytes)
    }

    /// Address of the sprite for hex `digit` (low nibble only)
    pub fn font_sprite_addr(digit: u8) -> u16 {
        FONT_ADDR + (digit & 0x0F) as u16 * FONT_SPRITE_HEIGHT
    }

    #[inline]
    pub fn read(&self, addr: u16) -> u8 {
        self.0[(addr & ADDR_MASK) as usize]
    }

    #[inline]
    pub fn write(&mut self, addr: u16, value: u8) {
        self.0[(addr & ADDR_MASK) as usize] = value;
    }

    /// Big-endian instruction word at `addr`
    pub fn fetch(&self, addr: u16) -> u16 {
        (self.read(addr) as u16) << 8 | self.read(addr.wrapping_add(1)) as u16
    }

    /// Copy `buf.len()` bytes starting at `addr` into `buf`
    pub fn read_into(&self, addr: u16, buf: &mut [u8]) {
        buf.iter_mut()
            .zip(0u16..)
            .for_each(|(byte, offset)| *byte = self.read(addr.wrapping_add(offset)));
    }

    /// Load program image at `PROGRAM_START`, returns number of bytes loaded
    ///
    /// Images longer than `MAX_PROGRAM_SIZE` are truncated.
    pub fn load_program(&mut self, prog: &[u8]) -> usize {
        if prog.len() > MAX_PROGRAM_SIZE {
            warn!(
                "program is too large ({} bytes), reading up to {:#X} bytes",
                prog.len(),
                MAX_PROGRAM_SIZE
            );
        }
        let start = PROGRAM_START as usize;
        self.0[start..]
            .iter_mut()
            .zip(prog)
            .for_each(|(mem, &byte)| *mem = byte);
        prog.len().min(MAX_PROGRAM_SIZE)
    }

    /// Hex dump of `len` bytes starting at `PROGRAM_START`
    pub fn dump(&self, len: usize) -> MemoryDump<'_> {
        let start = PROGRAM_START as usize;
        let end = (start + len).min(MEM_SIZE);
        MemoryDump {
            start,
            bytes: &self.0[start..end],
        }
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.0
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

/// Debugging view of memory, 16 bytes per line grouped in 2-byte words
///
/// ```
/// use plum8::Memory;
///
/// let mut memory = Memory::new();
/// memory.load_program(&[0x60, 0x01, 0x61, 0x02, 0x80, 0x14]);
///
/// assert_eq!(memory.dump(6).to_string(), "0200: 6001 6102 8014");
/// ```
pub struct MemoryDump<'a> {
    start: usize,
    bytes: &'a [u8],
}

impl fmt::Display for MemoryDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (n, line) in self.bytes.chunks(16).enumerate() {
            if n > 0 {
                writeln!(f)?;
            }
            write!(f, "{:04X}:", self.start + n * 16)?;
            for word in line.chunks(2) {
                write!(f, " ")?;
                for byte in word {
                    write!(f, "{:02X}", byte)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_zeroed_past_font() {
        let memory = Memory::new();
        let font_end = FONT_ADDR as usize + FONT.len();
        assert!(memory.as_raw()[..FONT_ADDR as usize].iter().all(|&b| b == 0));
        assert!(memory.as_raw()[font_end..].iter().all(|&b| b == 0));
        assert_eq!(memory.as_raw()[FONT_ADDR as usize..font_end], FONT[..]);
    }

    #[test]
    fn font_sprite_addresses() {
        assert_eq!(Memory::font_sprite_addr(0x0), FONT_ADDR);
        assert_eq!(Memory::font_sprite_addr(0xA), FONT_ADDR + 50);
        assert_eq!(Memory::font_sprite_addr(0x1F), FONT_ADDR + 75);

        let memory = Memory::new();
        let mut sprite = [0u8; 5];
        memory.read_into(Memory::font_sprite_addr(0x7), &mut sprite);
        assert_eq!(sprite, [0xF0, 0x10, 0x20, 0x40, 0x40]);
    }

    #[test]
    fn fetch_is_big_endian() {
        let mut memory = Memory::new();
        memory.write(0x300, 0xAB);
        memory.write(0x301, 0xCD);
        assert_eq!(memory.fetch(0x300), 0xABCD);
    }

    #[test]
    fn addresses_wrap_around_address_space() {
        let mut memory = Memory::new();
        memory.write(0x1000, 0x12);
        assert_eq!(memory.read(0x000), 0x12);
        memory.write(0xFFF, 0x34);
        assert_eq!(memory.fetch(0xFFF), 0x3412);
    }

    #[test]
    fn program_load() {
        let mut memory = Memory::new();
        assert_eq!(memory.load_program(&[0x00, 0xE0]), 2);
        assert_eq!(memory.fetch(PROGRAM_START), 0x00E0);
    }

    #[test]
    fn oversized_program_is_truncated() {
        let mut memory = Memory::new();
        let prog = [0xAAu8; 3600];
        assert_eq!(memory.load_program(&prog), MAX_PROGRAM_SIZE);
        assert_eq!(MAX_PROGRAM_SIZE, 3584);
        assert!(memory.as_raw()[PROGRAM_START as usize..].iter().all(|&b| b == 0xAA));
        // nothing spilled over into the interpreter area
        assert_eq!(memory.read(0x000), 0x00);
        assert_eq!(memory.read(FONT_ADDR), 0xF0);
    }

    #[test]
    fn dump_lines_and_words() {
        let mut memory = Memory::new();
        let prog: [u8; 18] = [
            0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D,
            0x0E, 0x0F, 0x10, 0x11,
        ];
        memory.load_program(&prog);
        assert_eq!(
            memory.dump(18).to_string(),
            "0200: 0001 0203 0405 0607 0809 0A0B 0C0D 0E0F\n0210: 1011",
        );
        assert_eq!(memory.dump(3).to_string(), "0200: 0001 02");
    }

    #[test]
    fn dump_is_clamped_to_memory() {
        let memory = Memory::new();
        let dump = memory.dump(0x2000).to_string();
        assert_eq!(dump.lines().count(), MAX_PROGRAM_SIZE / 16);
        assert!(dump.lines().last().unwrap().starts_with("0FF0:"));
    }
}
