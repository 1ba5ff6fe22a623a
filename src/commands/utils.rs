use std::path::{Path, PathBuf};

use pixtrace::{Pixtrace, PixtraceResult};

use crate::cli::SettingsArgs;

/// The convenience function to build a Pixtrace instance from the settings flags.
pub fn build_pixtrace(args: &SettingsArgs) -> PixtraceResult<Pixtrace> {
    Ok(Pixtrace::new(args.resolve()?))
}

/// Derive a variant file path by appending a suffix before the extension.
pub fn derive_variant_path(input: &Path, suffix: &str, extension: &str) -> PathBuf {
    let mut derived = input.to_path_buf();
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| suffix.to_string());
    let filename = format!("{}-{}.{}", stem, suffix, extension);
    derived.set_file_name(filename);
    derived
}

/// Derive an output file path by changing the extension.
pub fn derive_output_path(input: &Path, extension: &str) -> PathBuf {
    let mut path = input.to_path_buf();
    path.set_extension(extension);
    path
}

/// Resolve an optional export flag: explicit path, derived default, or nothing.
pub fn resolve_export_path(
    flag: &Option<Option<PathBuf>>,
    input: &Path,
    suffix: &str,
) -> Option<PathBuf> {
    match flag {
        Some(Some(path)) => Some(path.clone()),
        Some(None) => Some(derive_variant_path(input, suffix, "png")),
        None => None,
    }
}
