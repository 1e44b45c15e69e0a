use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::anyhow;
use clap::Parser;
use log::{debug, info, trace};

use chip8_host::{logger, rom, HostContext, KeyHold, KeyScript};
use plum8::Builder;

const FRAME_PERIOD: Duration = Duration::from_nanos(1_000_000_000 / 60);

#[derive(Parser, Debug)]
#[command(version, about = "Headless CHIP-8 interpreter", long_about = None)]
struct Args {
    /// Path to the ROM file to run
    rom: PathBuf,

    /// Number of 60Hz frames to run before printing the display
    #[arg(short, long, default_value_t = 600)]
    frames: usize,

    /// Instructions executed per frame
    #[arg(short, long, default_value_t = plum8::plum::CYCLES_PER_FRAME)]
    cycles: usize,

    /// Seed for the random number generator, time based if not given
    #[arg(short, long)]
    seed: Option<u128>,

    /// Print hex dump of the first N bytes of the program before running
    #[arg(short, long, value_name = "N")]
    dump: Option<usize>,

    /// Don't wait between frames
    #[arg(short, long)]
    turbo: bool,

    /// Hold a key for a range of frames, e.g. `q@30..45`
    #[arg(long = "hold", value_name = "KEY@FROM..TO")]
    holds: Vec<KeyHold>,
}

fn time_seed() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default()
}

fn main() -> anyhow::Result<()> {
    logger::init();
    let args = Args::parse();

    let rom = rom::read_rom(&args.rom)?;
    let seed = args.seed.unwrap_or_else(time_seed);
    debug!("random seed: {}", seed);

    let mut plum = Builder::new()
        .with_context(HostContext::new(seed))
        .with_program(&rom)
        .with_cycles_per_frame(args.cycles)
        .build()
        .map_err(|err| anyhow!("failed to set up interpreter: {}", err))?;

    if let Some(len) = args.dump {
        println!("{}", plum.dump(len));
    }

    let script = KeyScript::new(args.holds);
    info!(
        "running {} for {} frames",
        args.rom.display(),
        args.frames
    );
    for frame in 0..args.frames {
        let started = Instant::now();
        script.apply(frame, plum.keypad_mut());
        if plum.frame().is_err() {
            trace!("frame {}: waiting for key", frame);
        }
        if !args.turbo {
            thread::sleep(FRAME_PERIOD.saturating_sub(started.elapsed()));
        }
    }

    print!("{}", plum.context().frame());
    Ok(())
}
