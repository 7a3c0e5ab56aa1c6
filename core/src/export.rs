use std::path::Path;

use log::info;
use palette::LinSrgb;

use crate::error::Result;
use crate::state::TerrainState;

// Quantize the whole colored grid into an RGB8 buffer, row-major
pub fn to_rgb_bytes(state: &TerrainState) -> Vec<u8> {
    let grid = state.grid();
    let mut buf = Vec::with_capacity(grid.len() * 3);
    for &h in grid.as_slice() {
        let [r, g, b] = state.color_of(h);
        let rgb = LinSrgb::new(r.clamp(0.0, 1.0), g.clamp(0.0, 1.0), b.clamp(0.0, 1.0))
            .into_format::<u8>();
        buf.extend_from_slice(&[rgb.red, rgb.green, rgb.blue]);
    }
    buf
}

// Write the colored grid as a size×size PNG using the active scheme
pub fn save_png(state: &TerrainState, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let size = state.grid().size() as u32;
    let buf = to_rgb_bytes(state);
    image::save_buffer(path, &buf, size, size, image::ExtendedColorType::Rgb8)?;
    info!("saved {} ({} scheme) to {:?}", size, state.scheme(), path);
    Ok(())
}
