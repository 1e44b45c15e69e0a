use core::convert::{Infallible, TryFrom};

use log::{error, trace};

use crate::context::Context;
use crate::error::{DecodeError, Error};
use crate::frame::{HEIGHT, WIDTH};
use crate::keypad::Keypad;
use crate::memory::{Memory, MemoryDump, PROGRAM_START};
use crate::opcode::OpCode;
use crate::stack::Stack;
use crate::timer::{Timer, TimerState};

/// Instructions executed per 60Hz frame unless configured otherwise
pub const CYCLES_PER_FRAME: usize = 10;

/// Flag register
const VF: usize = 0xF;

const MAX_SPRITE_HEIGHT: usize = 15;

pub struct Plum8<C: Context> {
    ctx: C,
    v: [u8; 16],
    i: u16,
    pc: u16,
    memory: Memory,
    stack: Stack,
    keypad: Keypad,
    delay_timer: Timer,
    sound_timer: Timer,
    cycles_per_frame: usize,
}

impl<C: Context> Plum8<C> {
    pub fn new(ctx: C) -> Self {
        Self {
            ctx,
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START,
            memory: Memory::new(),
            stack: Stack::new(),
            keypad: Keypad::new(),
            delay_timer: Timer::new(),
            sound_timer: Timer::new(),
            cycles_per_frame: CYCLES_PER_FRAME,
        }
    }

    /// Create machine with program loaded at 0x200 (_start address)
    pub fn load(ctx: C, prog: &[u8]) -> Self {
        let mut plum = Self::new(ctx);
        plum.memory.load_program(prog);
        plum
    }

    pub(crate) fn set_cycles_per_frame(&mut self, cycles: usize) {
        self.cycles_per_frame = cycles;
    }

    /// Run one 60Hz frame
    ///
    /// Executes up to `cycles_per_frame` instructions and then ticks both timers
    /// once. Errors reported by single steps don't stop the frame. A step blocked
    /// on `FX0A` ends the frame early, as nothing can unblock it before the host
    /// gets to deliver new key events, and `WouldBlock` is returned.
    pub fn frame(&mut self) -> nb::Result<(), Infallible> {
        let mut blocked = false;
        for _ in 0..self.cycles_per_frame {
            match self.step() {
                Ok(()) | Err(nb::Error::Other(_)) => {}
                Err(nb::Error::WouldBlock) => {
                    blocked = true;
                    break;
                }
            }
        }
        self.tick_timers();
        if blocked {
            Err(nb::Error::WouldBlock)
        } else {
            Ok(())
        }
    }

    /// Fetch, decode and execute a single instruction
    ///
    /// pc is moved past the instruction before it gets executed. Errors are
    /// logged here and handed back, the machine stays usable after any of them.
    /// `WouldBlock` means the instruction is waiting for a key and pc still
    /// points at it.
    pub fn step(&mut self) -> nb::Result<(), Error> {
        let addr = self.pc;
        let raw = self.memory.fetch(addr);
        self.pc = self.pc.wrapping_add(2);

        let opcode = OpCode::try_from(raw).map_err(|DecodeError(opcode)| {
            error!("{:03X}: invalid or unsupported opcode {:04X}", addr, opcode);
            nb::Error::Other(Error::Decode { addr, opcode })
        })?;
        trace!("{:03X}: {}", addr, opcode);

        self.execute(opcode).map_err(|err| {
            if let nb::Error::Other(err) = err {
                error!("{:03X}: {}: {}", addr, opcode, err);
            }
            err
        })
    }

    fn tick_timers(&mut self) {
        self.delay_timer.decrement();
        if self.sound_timer.decrement() == TimerState::Finished {
            self.ctx.sound_off();
        }
    }

    #[inline]
    fn skip_next_if(&mut self, condition: bool) -> Result<(), Error> {
        if condition {
            self.pc = self.pc.wrapping_add(2);
        }
        Ok(())
    }

    pub fn context(&self) -> &C {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.ctx
    }

    pub fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    /// Keypad handle for the host's input device
    pub fn keypad_mut(&mut self) -> &mut Keypad {
        &mut self.keypad
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Value of register V`idx`, panics for `idx` past VF
    pub fn v(&self, idx: usize) -> u8 {
        self.v[idx]
    }

    pub fn i(&self) -> u16 {
        self.i
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn sp(&self) -> u8 {
        self.stack.sp()
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer.load()
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer.load()
    }

    pub fn cycles_per_frame(&self) -> usize {
        self.cycles_per_frame
    }

    /// Hex dump of `len` bytes of the loaded program
    pub fn dump(&self, len: usize) -> MemoryDump<'_> {
        self.memory.dump(len)
    }
}

// OpCodes impls
impl<C: Context> Plum8<C> {
    #[rustfmt::skip]
    fn execute(&mut self, opcode: OpCode) -> nb::Result<(), Error> {
        match opcode {
            OpCode::_00E0             => self.clear_screen(),
            OpCode::_00EE             => self.subroutine_return(),
            OpCode::_1NNN { nnn }     => self.jump_to(nnn),
            OpCode::_2NNN { nnn }     => self.exec_subroutine_at(nnn),
            OpCode::_3XNN { x, nn }   => self.skip_if_vx_eq_nn(x, nn),
            OpCode::_4XNN { x, nn }   => self.skip_if_vx_ne_nn(x, nn),
            OpCode::_5XY0 { x, y }    => self.skip_if_vx_eq_vy(x, y),
            OpCode::_6XNN { x, nn }   => self.assign_vx_nn(x, nn),
            OpCode::_7XNN { x, nn }   => self.assign_add_vx_nn(x, nn),
            OpCode::_8XY0 { x, y }    => self.assign_vx_vy(x, y),
            OpCode::_8XY1 { x, y }    => self.assign_or_vx_vy(x, y),
            OpCode::_8XY2 { x, y }    => self.assign_and_vx_vy(x, y),
            OpCode::_8XY3 { x, y }    => self.assign_xor_vx_vy(x, y),
            OpCode::_8XY4 { x, y }    => self.assign_add_vx_vy(x, y),
            OpCode::_8XY5 { x, y }    => self.assign_sub_vx_vy(x, y),
            OpCode::_8XY6 { x, .. }   => self.assign_vx_shifted_r(x),
            OpCode::_8XY7 { x, y }    => self.assign_vx_vy_sub_vx(x, y),
            OpCode::_8XYE { x, .. }   => self.assign_vx_shifted_l(x),
            OpCode::_9XY0 { x, y }    => self.skip_if_vx_ne_vy(x, y),
            OpCode::_ANNN { nnn }     => self.assign_i_nnn(nnn),
            OpCode::_BNNN { nnn }     => self.jump_to_nnn_add_v0(nnn),
            OpCode::_CXNN { x, nn }   => self.assign_vx_random_and_nn(x, nn),
            OpCode::_DXYN { x, y, n } => self.draw_n_at_vx_vy(x, y, n),
            OpCode::_EX9E { x }       => self.skip_if_vx_in_keys(x),
            OpCode::_EXA1 { x }       => self.skip_if_vx_not_in_keys(x),
            OpCode::_FX07 { x }       => self.assign_vx_delay_t(x),
            OpCode::_FX0A { x }       => return self.assign_vx_wait_for_key(x),
            OpCode::_FX15 { x }       => self.assign_delay_t_vx(x),
            OpCode::_FX18 { x }       => self.assign_sound_t_vx(x),
            OpCode::_FX1E { x }       => self.assign_add_i_vx(x),
            OpCode::_FX29 { x }       => self.assign_i_addr_of_sprite_vx(x),
            OpCode::_FX33 { x }       => self.assign_mem_at_i_bcd_of_vx(x),
            OpCode::_FX55 { x }       => self.assign_mem_at_i_v0_to_vx(x),
            OpCode::_FX65 { x }       => self.assign_v0_to_vx_mem_at_i(x),
        }
        .map_err(nb::Error::Other)
    }

    /// Clear the screen
    /// 00E0
    fn clear_screen(&mut self) -> Result<(), Error> {
        self.ctx.clear();
        Ok(())
    }

    /// Return from a subroutine, pc is left alone when not in one
    /// 00EE
    fn subroutine_return(&mut self) -> Result<(), Error> {
        self.stack.pop().map(|addr| self.pc = addr)
    }

    /// Jump to address NNN
    /// 1NNN { nnn: u16 },
    fn jump_to(&mut self, nnn: u16) -> Result<(), Error> {
        self.pc = nnn;
        Ok(())
    }

    /// Execute subroutine starting at address NNN, no jump happens if stack is full
    /// 2NNN { nnn: u16 },
    fn exec_subroutine_at(&mut self, nnn: u16) -> Result<(), Error> {
        self.stack.push(self.pc).map(|_| self.pc = nnn)
    }

    /// Skip the following instruction if the value of register VX equals NN
    /// 3XNN { x: u8, nn: u8 },
    fn skip_if_vx_eq_nn(&mut self, x: u8, nn: u8) -> Result<(), Error> {
        self.skip_next_if(self.v[x as usize] == nn)
    }

    /// Skip the following instruction if the value of register VX is not equal to NN
    /// 4XNN { x: u8, nn: u8 },
    fn skip_if_vx_ne_nn(&mut self, x: u8, nn: u8) -> Result<(), Error> {
        self.skip_next_if(self.v[x as usize] != nn)
    }

    /// Skip the following instruction if the value of register VX is equal to the value of register VY
    /// 5XY0 { x: u8, y: u8 },
    fn skip_if_vx_eq_vy(&mut self, x: u8, y: u8) -> Result<(), Error> {
        self.skip_next_if(self.v[x as usize] == self.v[y as usize])
    }

    /// Store number NN in register VX
    /// 6XNN { x: u8, nn: u8 },
    fn assign_vx_nn(&mut self, x: u8, nn: u8) -> Result<(), Error> {
        self.v[x as usize] = nn;
        Ok(())
    }

    /// Add the value NN to register VX
    /// 7XNN { x: u8, nn: u8 },
    fn assign_add_vx_nn(&mut self, x: u8, nn: u8) -> Result<(), Error> {
        self.v[x as usize] = self.v[x as usize].wrapping_add(nn);
        Ok(())
    }

    /// Store the value of register VY in register VX
    /// 8XY0 { x: u8, y: u8 },
    fn assign_vx_vy(&mut self, x: u8, y: u8) -> Result<(), Error> {
        self.v[x as usize] = self.v[y as usize];
        Ok(())
    }

    /// Set VX to VX OR VY
    /// 8XY1 { x: u8, y: u8 },
    fn assign_or_vx_vy(&mut self, x: u8, y: u8) -> Result<(), Error> {
        self.v[x as usize] |= self.v[y as usize];
        self.v[VF] = 0x00u8;
        Ok(())
    }

    /// Set VX to VX AND VY
    /// 8XY2 { x: u8, y: u8 },
    fn assign_and_vx_vy(&mut self, x: u8, y: u8) -> Result<(), Error> {
        self.v[x as usize] &= self.v[y as usize];
        self.v[VF] = 0x00u8;
        Ok(())
    }

    /// Set VX to VX XOR VY
    /// 8XY3 { x: u8, y: u8 },
    fn assign_xor_vx_vy(&mut self, x: u8, y: u8) -> Result<(), Error> {
        self.v[x as usize] ^= self.v[y as usize];
        self.v[VF] = 0x00u8;
        Ok(())
    }

    /// Add the value of register VY to register VX, Set VF to 01 if a carry occurs, Set VF to 00 if a carry does not occur
    /// 8XY4 { x: u8, y: u8 },
    fn assign_add_vx_vy(&mut self, x: u8, y: u8) -> Result<(), Error> {
        let sum = self.v[x as usize] as u16 + self.v[y as usize] as u16;
        self.v[x as usize] = (sum & 0x00FF) as u8;
        self.v[VF] = if sum > 0x00FF { 0x01u8 } else { 0x00u8 };
        Ok(())
    }

    /// Subtract the value of register VY from register VX, Set VF to 00 if a borrow occurs, Set VF to 01 if a borrow does not occur
    /// 8XY5 { x: u8, y: u8 },
    fn assign_sub_vx_vy(&mut self, x: u8, y: u8) -> Result<(), Error> {
        let (vx, vy) = (self.v[x as usize], self.v[y as usize]);
        self.v[x as usize] = vx.wrapping_sub(vy);
        self.v[VF] = if vx >= vy { 0x01u8 } else { 0x00u8 };
        Ok(())
    }

    /// Shift VX right one bit, Set register VF to the least significant bit prior to the shift
    /// 8XY6 { x: u8, y: u8 },
    fn assign_vx_shifted_r(&mut self, x: u8) -> Result<(), Error> {
        let vx = self.v[x as usize];
        self.v[x as usize] = vx >> 1;
        self.v[VF] = vx & 0x01u8;
        Ok(())
    }

    /// Set register VX to the value of VY minus VX, Set VF to 00 if a borrow occurs, Set VF to 01 if a borrow does not occur
    /// 8XY7 { x: u8, y: u8 },
    fn assign_vx_vy_sub_vx(&mut self, x: u8, y: u8) -> Result<(), Error> {
        let (vx, vy) = (self.v[x as usize], self.v[y as usize]);
        self.v[x as usize] = vy.wrapping_sub(vx);
        self.v[VF] = if vy >= vx { 0x01u8 } else { 0x00u8 };
        Ok(())
    }

    /// Shift VX left one bit, Set register VF to the most significant bit prior to the shift
    /// 8XYE { x: u8, y: u8 },
    fn assign_vx_shifted_l(&mut self, x: u8) -> Result<(), Error> {
        let vx = self.v[x as usize];
        self.v[x as usize] = vx << 1;
        self.v[VF] = vx >> 7;
        Ok(())
    }

    /// Skip the following instruction if the value of register VX is not equal to the value of register VY
    /// 9XY0 { x: u8, y: u8 },
    fn skip_if_vx_ne_vy(&mut self, x: u8, y: u8) -> Result<(), Error> {
        self.skip_next_if(self.v[x as usize] != self.v[y as usize])
    }

    /// Store memory address NNN in register I
    /// ANNN { nnn: u16 },
    fn assign_i_nnn(&mut self, nnn: u16) -> Result<(), Error> {
        self.i = nnn;
        Ok(())
    }

    /// Jump to address NNN + V0
    /// BNNN { nnn: u16 },
    fn jump_to_nnn_add_v0(&mut self, nnn: u16) -> Result<(), Error> {
        self.pc = nnn + self.v[0] as u16;
        Ok(())
    }

    /// Set VX to a random number with a mask of NN
    /// CXNN { x: u8, nn: u8 },
    fn assign_vx_random_and_nn(&mut self, x: u8, nn: u8) -> Result<(), Error> {
        self.v[x as usize] = self.ctx.gen_random() & nn;
        Ok(())
    }

    /// Draw a sprite at position VX, VY with N bytes of sprite data starting at the address stored in I, Set VF to 01 if any set pixels are changed to unset, and 00 otherwise
    /// DXYN { x: u8, y: u8, n: u8 },
    fn draw_n_at_vx_vy(&mut self, x: u8, y: u8, n: u8) -> Result<(), Error> {
        let mut sprite = [0u8; MAX_SPRITE_HEIGHT];
        let sprite = &mut sprite[..n as usize];
        self.memory.read_into(self.i, sprite);
        let x = self.v[x as usize] % WIDTH as u8;
        let y = self.v[y as usize] % HEIGHT as u8;
        let collision = self.ctx.draw_sprite(x, y, sprite);
        self.v[VF] = if collision { 0x01u8 } else { 0x00u8 };
        Ok(())
    }

    /// Skip the following instruction if the key corresponding to the hex value currently stored in register VX is pressed
    /// EX9E { x: u8 },
    fn skip_if_vx_in_keys(&mut self, x: u8) -> Result<(), Error> {
        self.skip_next_if(self.keypad.is_held(self.v[x as usize]))
    }

    /// Skip the following instruction if the key corresponding to the hex value currently stored in register VX is not pressed
    /// EXA1 { x: u8 },
    fn skip_if_vx_not_in_keys(&mut self, x: u8) -> Result<(), Error> {
        self.skip_next_if(!self.keypad.is_held(self.v[x as usize]))
    }

    /// Store the current value of the delay timer in register VX
    /// FX07 { x: u8 },
    fn assign_vx_delay_t(&mut self, x: u8) -> Result<(), Error> {
        self.v[x as usize] = self.delay_timer.load();
        Ok(())
    }

    /// Wait for a key release and store the result in register VX
    ///
    /// To not block the whole routine pc is moved back onto this instruction
    /// until a key gets captured by the keypad.
    /// FX0A { x: u8 },
    fn assign_vx_wait_for_key(&mut self, x: u8) -> nb::Result<(), Error> {
        match self.keypad.take_captured() {
            Some(key) => {
                self.v[x as usize] = key;
                Ok(())
            }
            None => {
                self.keypad.begin_wait();
                self.pc = self.pc.wrapping_sub(2);
                Err(nb::Error::WouldBlock)
            }
        }
    }

    /// Set the delay timer to the value of register VX
    /// FX15 { x: u8 },
    fn assign_delay_t_vx(&mut self, x: u8) -> Result<(), Error> {
        self.delay_timer.store(self.v[x as usize]);
        Ok(())
    }

    /// Set the sound timer to the value of register VX
    /// FX18 { x: u8 },
    fn assign_sound_t_vx(&mut self, x: u8) -> Result<(), Error> {
        let value = self.v[x as usize];
        self.sound_timer.store(value);
        if value > 0 {
            self.ctx.sound_on();
        } else {
            self.ctx.sound_off();
        }
        Ok(())
    }

    /// Add the value stored in register VX to register I
    /// FX1E { x: u8 },
    fn assign_add_i_vx(&mut self, x: u8) -> Result<(), Error> {
        self.i = self.i.wrapping_add(self.v[x as usize] as u16) & 0x0FFFu16;
        Ok(())
    }

    /// Set I to the memory address of the sprite data corresponding to the hexadecimal digit stored in register VX
    /// FX29 { x: u8 },
    fn assign_i_addr_of_sprite_vx(&mut self, x: u8) -> Result<(), Error> {
        self.i = Memory::font_sprite_addr(self.v[x as usize]);
        Ok(())
    }

    /// Store the binary-coded decimal equivalent of the value stored in register VX at addresses I, I+1, and I+2
    /// FX33 { x: u8 },
    fn assign_mem_at_i_bcd_of_vx(&mut self, x: u8) -> Result<(), Error> {
        let value = self.v[x as usize];
        self.memory.write(self.i, value / 100u8);
        self.memory.write(self.i.wrapping_add(1), (value % 100) / 10u8);
        self.memory.write(self.i.wrapping_add(2), value % 10u8);
        Ok(())
    }

    /// Store the values of registers V0 to VX inclusive in memory starting at address I
    /// FX55 { x: u8 },
    fn assign_mem_at_i_v0_to_vx(&mut self, x: u8) -> Result<(), Error> {
        for idx in 0..=x {
            self.memory
                .write(self.i.wrapping_add(idx as u16), self.v[idx as usize]);
        }
        Ok(())
    }

    /// Fill registers V0 to VX inclusive with the values stored in memory starting at address I
    /// FX65 { x: u8 },
    fn assign_v0_to_vx_mem_at_i(&mut self, x: u8) -> Result<(), Error> {
        for idx in 0..=x {
            self.v[idx as usize] = self.memory.read(self.i.wrapping_add(idx as u16));
        }
        Ok(())
    }
}
