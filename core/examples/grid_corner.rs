use terrain_core::generate;

fn main() {
    // Generate a 129×129 terrain with seed 2025, roughness 0.5
    let terrain = match generate(129, 0.5, 2025) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("generation failed: {e}");
            return;
        }
    };

    println!("max height: {:.3}", terrain.max_height);

    // Print the top-left 16×16 corner of the grid
    for row in terrain.grid.rows().take(16) {
        for h in &row[..16] {
            print!("{:>8.3} ", h);
        }
        println!();
    }
}
