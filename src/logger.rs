//! Host side of the `log` facade.
//!
//! Lines look like `[LEVEL][module::path] message`, level filter comes from
//! `RUST_LOG` and defaults to `info`. Instruction traces of the interpreter
//! show up with `RUST_LOG=plum8=trace`.

use std::io::Write;

use env_logger::{Builder, Env};
use log::Record;

pub const DEFAULT_FILTER: &str = "info";

fn format_record(buf: &mut impl Write, record: &Record<'_>) -> std::io::Result<()> {
    writeln!(
        buf,
        "[{:5}][{}] {}",
        record.level(),
        record.module_path().unwrap_or("?"),
        record.args()
    )
}

/// Install the logger, a second call leaves the first one in place
pub fn init() {
    let _ = Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER))
        .format(|buf, record| format_record(buf, record))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;

    #[test]
    fn line_format() {
        let mut buf = Vec::new();
        format_record(
            &mut buf,
            &Record::builder()
                .args(format_args!("Heap Overflow; pc:={:#x}", 0x2a))
                .level(Level::Warn)
                .module_path(Some("plum8::plum"))
                .build(),
        )
        .unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "[WARN ][plum8::plum] Heap Overflow; pc:=0x2a\n"
        );
    }

    #[test]
    fn init_twice() {
        init();
        init();
        log::info!("still logging");
    }
}
