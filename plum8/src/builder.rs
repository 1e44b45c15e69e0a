use crate::context::Context;
use crate::error::Error;
use crate::plum::{Plum8, CYCLES_PER_FRAME};

/// Step by step configuration of a `Plum8` machine
///
/// ```
/// # use plum8::{Builder, Context};
/// # struct Headless;
/// # impl Context for Headless {
/// #     fn clear(&mut self) {}
/// #     fn draw_sprite(&mut self, _: u8, _: u8, _: &[u8]) -> bool { false }
/// #     fn sound_on(&mut self) {}
/// #     fn sound_off(&mut self) {}
/// #     fn gen_random(&mut self) -> u8 { 4 }
/// # }
/// let plum = Builder::new()
///     .with_context(Headless)
///     .with_program(&[0x60, 0x01])
///     .with_cycles_per_frame(20)
///     .build()
///     .unwrap();
/// assert_eq!(plum.cycles_per_frame(), 20);
/// ```
pub struct Builder<'a, C: Context> {
    context: Option<C>,
    program: Option<&'a [u8]>,
    cycles_per_frame: usize,
}

impl<'a, C: Context> Builder<'a, C> {
    pub fn new() -> Self {
        Self {
            context: None,
            program: None,
            cycles_per_frame: CYCLES_PER_FRAME,
        }
    }

    pub fn with_context(mut self, ctx: C) -> Self {
        self.context = Some(ctx);
        self
    }

    pub fn with_program(mut self, prog: &'a [u8]) -> Self {
        self.program = Some(prog);
        self
    }

    pub fn with_cycles_per_frame(mut self, cycles: usize) -> Self {
        self.cycles_per_frame = cycles;
        self
    }

    pub fn build(self) -> Result<Plum8<C>, Error> {
        let context = self.context.ok_or(Error::MissingContext)?;
        if self.cycles_per_frame == 0 {
            return Err(Error::InvalidConfig("cycles per frame must be nonzero"));
        }
        let mut plum = match self.program {
            Some(prog) => Plum8::load(context, prog),
            None => Plum8::new(context),
        };
        plum.set_cycles_per_frame(self.cycles_per_frame);
        Ok(plum)
    }
}

impl<'a, C: Context> Default for Builder<'a, C> {
    fn default() -> Self {
        Self::new()
    }
}
