//! Context for accessing functionalities of platform that `Plum8` is
//! emulated on.
//!
//! The interpreter only ever calls into the context synchronously from
//! `step`/`frame`, implementors must not call back into `Plum8`.

/// Trait aggregating platform functionalities
pub trait Context {
    /// Turn every pixel of the display off
    ///
    /// Called by `step` on `00E0`
    fn clear(&mut self);
    /// XOR sprite `bytes` onto the display with origin at `x`, `y`
    ///
    /// Each byte is one 8 pixel wide row, most significant bit on the left.
    /// Origin is already wrapped to the 64x32 display. Must return `true` if
    /// any lit pixel was turned off.
    ///
    /// Called by `step` on `DXYN`
    fn draw_sprite(&mut self, x: u8, y: u8, bytes: &[u8]) -> bool;
    /// Turn sound on
    ///
    /// Called by `step` when sound timer is activated
    fn sound_on(&mut self);
    /// Turn sound off
    ///
    /// Called by `frame` when sound timer runs out
    fn sound_off(&mut self);
    /// Generate random 8-bit number
    ///
    /// Called by `step` whenever requested by executing program
    fn gen_random(&mut self) -> u8;
}
