use std::fs;

use pixtrace::PixtraceResult;

use crate::cli::ConvertCommand;

use super::utils::{build_pixtrace, derive_output_path, resolve_export_path};

/// The main function to run the convert command.
pub fn run(cmd: ConvertCommand) -> PixtraceResult<()> {
    let pixtrace = build_pixtrace(&cmd.settings)?;
    let prepared = pixtrace.for_image(&cmd.input)?;
    let extension = if cmd.json { "json" } else { "svg" };
    let output_path = cmd
        .output
        .clone()
        .unwrap_or_else(|| derive_output_path(&cmd.input, extension));

    if let Some(path) = resolve_export_path(&cmd.export_prepared, &cmd.input, "prepared") {
        prepared.save(&path)?;
        println!("Prepared PNG saved to {}", path.display());
    }

    let conversion = prepared.convert()?;
    let (width, height) = prepared.dimensions();
    let (original_width, original_height) = prepared.original_dimensions();
    log::info!("Traced {original_width}x{original_height} input on a {width}x{height} canvas");

    if cmd.json {
        let json = serde_json::to_string_pretty(&conversion).map_err(std::io::Error::other)?;
        fs::write(&output_path, json)?;
        println!("Conversion JSON saved to {}", output_path.display());
    } else {
        fs::write(&output_path, &conversion.svg)?;
        println!("SVG saved to {}", output_path.display());
    }

    Ok(())
}
