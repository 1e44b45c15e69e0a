use std::fs;
use std::path::Path;

use anyhow::Context;
use log::{info, warn};

/// Read whole ROM image from `path`
///
/// Size is not checked here, oversized images get truncated when loaded.
pub fn read_rom<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<u8>> {
    let path = path.as_ref();
    let rom = fs::read(path).with_context(|| format!("failed to read ROM {}", path.display()))?;
    if rom.is_empty() {
        warn!("ROM {} is empty", path.display());
    }
    info!("read {} bytes from {}", rom.len(), path.display());
    Ok(rom)
}
