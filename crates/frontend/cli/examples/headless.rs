use std::env;

use pal_core::{PaletteLoader, RegisterBank, Rgb444};
use pal_resources::CompiledPalette;

/// Loads a generated gray ramp into a register bank and prints the bank.
/// Usage: `cargo run --example headless [entries] [offset]`
fn main() {
    let args: Vec<String> = env::args().collect();
    let entries: u8 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(16);
    let offset: u8 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(0);

    let ramp: Vec<Rgb444> = (0..entries)
        .map(|i| {
            let level = ((i as u32 * 255) / entries.max(1) as u32) as u8;
            Rgb444::from_rgb888(level, level, level)
        })
        .collect();
    let palette = CompiledPalette::from_colors("RAMP", &ramp);

    let mut loader = PaletteLoader::new(RegisterBank::new());
    match loader.try_load_palette(&palette.as_resource(), offset) {
        Ok(()) => println!(
            "Bank: {}",
            serde_json::to_string_pretty(&loader.transfer().snapshot()).unwrap()
        ),
        Err(e) => eprintln!("Load failed: {}", e),
    }
}
