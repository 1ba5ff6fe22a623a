mod convert;
mod palette;
mod utils;

use crate::cli::{Cli, Commands};
use pixtrace::PixtraceResult;

/// The main function to run the command based on CLI input.
pub fn run(cli: Cli) -> PixtraceResult<()> {
    dispatch(cli.command)
}

/// Dispatch the command to the appropriate handler.
fn dispatch(command: Commands) -> PixtraceResult<()> {
    match command {
        Commands::Convert(cmd) => convert::run(cmd),
        Commands::Palette(cmd) => palette::run(cmd),
    }
}
