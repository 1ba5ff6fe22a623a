use pixtrace::palette::Palette;
use pixtrace::svg::hex_color;
use pixtrace::{ColorMode, PixtraceResult};

use crate::cli::PaletteCommand;

use super::utils::build_pixtrace;

/// The main function to run the palette command.
pub fn run(cmd: PaletteCommand) -> PixtraceResult<()> {
    let pixtrace = build_pixtrace(&cmd.settings)?;
    if pixtrace.settings().color_mode != ColorMode::FullColor {
        eprintln!("Warning: the palette is only used in full-color mode; showing it anyway.");
    }
    let prepared = pixtrace.for_image(&cmd.input)?;
    let palette = Palette::from_settings(prepared.image(), pixtrace.settings());

    if palette.is_empty() {
        println!("No visible pixels; the palette is empty.");
        return Ok(());
    }

    let total: u64 = palette.entries().iter().map(|e| e.weight).sum();
    for entry in palette.entries() {
        let share = entry.weight as f64 * 100.0 / total as f64;
        println!("{}  {:>8}  {share:5.1}%", hex_color(entry.color), entry.weight);
    }
    Ok(())
}
