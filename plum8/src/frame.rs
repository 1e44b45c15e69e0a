use core::fmt;

use bitvec::prelude::*;

pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;
pub(crate) const MEM_LENGTH: usize = WIDTH * HEIGHT / 8;

const SPRITE_WIDTH: usize = 8;

/// Monochrome 64x32 display bitmap
///
/// Internally, the data is stored in a form of concatenating rows from top to
/// bottom of the frame. Rows are represented as individual bits of continuous
/// memory, matching the state of pixels from left to right.
///
/// Hosts can use it as the backing store of `Context::draw_sprite`:
///
/// ```
/// use plum8::Frame;
///
/// let mut frame = Frame::new();
/// assert!(!frame.draw_sprite(62, 0, &[0b1110_0000]));
/// assert!(frame.get(62, 0) && frame.get(63, 0));
/// // sprite rows are clipped at the right edge
/// assert!(!frame.get(0, 0));
/// assert!(frame.draw_sprite(62, 0, &[0b1000_0000]));
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Frame([u8; MEM_LENGTH]);

impl Frame {
    pub fn new() -> Self {
        Self([0; MEM_LENGTH])
    }

    pub fn clear(&mut self) {
        self.0 = [0; MEM_LENGTH];
    }

    /// View the raw memory of a frame
    pub fn as_raw(&self) -> &[u8] {
        &self.0
    }

    /// State of pixel at `x`, `y`; pixels outside the frame are always off
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.iter_rows_as_bitslices()
            .nth(y)
            .and_then(|row| row.get(x).map(|bit| *bit))
            .unwrap_or(false)
    }

    /// XOR sprite onto the frame, returns whether any set pixel got cleared
    ///
    /// Origin is wrapped to the frame, sprite rows and columns past the right
    /// and bottom edges are not drawn.
    pub fn draw_sprite(&mut self, x: u8, y: u8, bytes: &[u8]) -> bool {
        let x = x as usize % WIDTH;
        let y = y as usize % HEIGHT;
        let mut collision = false;
        for (row, byte) in self
            .iter_rows_as_bitslices_mut()
            .skip(y)
            .zip(bytes.iter())
        {
            let columns = (WIDTH - x).min(SPRITE_WIDTH);
            let sprite = &byte.view_bits::<Msb0>()[..columns];
            for (mut pixel, sprite_bit) in row[x..x + columns].iter_mut().zip(sprite.iter()) {
                if *sprite_bit {
                    collision |= *pixel;
                    *pixel = !*pixel;
                }
            }
        }
        collision
    }

    /// Get iterator over rows in a form of a `BitSlice`s
    pub fn iter_rows_as_bitslices(&self) -> impl Iterator<Item = &BitSlice<u8, Msb0>> {
        self.0.chunks(WIDTH / 8).map(|row| row.view_bits::<Msb0>())
    }

    pub(crate) fn iter_rows_as_bitslices_mut(
        &mut self,
    ) -> impl Iterator<Item = &mut BitSlice<u8, Msb0>> {
        self.0
            .chunks_mut(WIDTH / 8)
            .map(|row| row.view_bits_mut::<Msb0>())
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

/// Rows of `#` for lit and `.` for dark pixels, one line per row
impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.iter_rows_as_bitslices() {
            for bit in row.iter() {
                write!(f, "{}", if *bit { '#' } else { '.' })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
impl Frame {
    pub(crate) fn as_raw_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }
}
