//! Headless platform for `Plum8`: frame kept in memory, tone reported to the log.

use log::info;
use nanorand::{Pcg64, Rng};

use plum8::{Context, Frame};

pub struct HostContext {
    frame: Frame,
    rng: Pcg64,
    sound: bool,
}

impl HostContext {
    pub fn new(seed: u128) -> Self {
        Self {
            frame: Frame::new(),
            rng: Pcg64::new_seed(seed),
            sound: false,
        }
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn is_sound_on(&self) -> bool {
        self.sound
    }
}

impl Context for HostContext {
    fn clear(&mut self) {
        self.frame.clear();
    }

    fn draw_sprite(&mut self, x: u8, y: u8, bytes: &[u8]) -> bool {
        self.frame.draw_sprite(x, y, bytes)
    }

    fn sound_on(&mut self) {
        if !self.sound {
            info!("tone on");
        }
        self.sound = true;
    }

    fn sound_off(&mut self) {
        if self.sound {
            info!("tone off");
        }
        self.sound = false;
    }

    fn gen_random(&mut self) -> u8 {
        self.rng.generate::<u8>()
    }
}
