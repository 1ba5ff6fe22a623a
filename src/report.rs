use pixtrace::PixtraceError;
use pixtrace::prepare::MAX_PAYLOAD_BYTES;

pub fn report_error(err: &PixtraceError) {
    match err {
        PixtraceError::Settings(inner) => {
            eprintln!("Invalid settings JSON: {inner}");
            eprintln!();
            eprintln!("Settings use camelCase keys and kebab-case values, for example:");
            eprintln!(r#"  --settings '{{"colorMode":"black-white","detailLevel":90}}'"#);
        }
        PixtraceError::PayloadTooLarge { size, .. } => {
            eprintln!(
                "Input is {:.1} MiB; at most {} MiB is accepted.",
                *size as f64 / (1024.0 * 1024.0),
                MAX_PAYLOAD_BYTES / (1024 * 1024)
            );
        }
        PixtraceError::UnsupportedMediaType { mime } => {
            eprintln!("Input does not look like an image (detected `{mime}`).");
            eprintln!("Supported inputs are the raster formats the `image` crate decodes, e.g. PNG, JPEG, GIF, WebP.");
        }
        _ => {
            eprintln!("{err}");
        }
    }
}
