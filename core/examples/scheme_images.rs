use terrain_core::{ColorScheme, TerrainConfig, TerrainState, export::save_png};

// Writes one PNG per color scheme for the reference 1025×1025 terrain
fn main() -> terrain_core::Result<()> {
    let mut state = TerrainState::new(TerrainConfig::default())?;

    for scheme in ColorScheme::ALL {
        state.set_scheme(scheme);
        let filename = format!("terrain_{:?}.png", scheme).to_lowercase();
        save_png(&state, &filename)?;
        println!("Saved {} scheme to {}", scheme, filename);
    }

    Ok(())
}
