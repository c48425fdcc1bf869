//! Replay a gesture script and write the resulting drawing as PNG.

use inkboard_app::{AppError, GestureScript, replay};
use std::path::PathBuf;
use std::process::ExitCode;

fn run() -> Result<(), AppError> {
    let mut args = std::env::args_os().skip(1);
    let (Some(script_path), Some(output_path)) = (args.next(), args.next()) else {
        return Err(AppError::Usage);
    };
    let (script_path, output_path) = (PathBuf::from(script_path), PathBuf::from(output_path));

    let script = GestureScript::load(&script_path)?;
    let board = replay(&script)?;
    let png = board.export_png()?;

    std::fs::write(&output_path, &png)
        .map_err(|e| AppError::Io(format!("Failed to write {}: {}", output_path.display(), e)))?;
    log::info!("Wrote {} ({} bytes)", output_path.display(), png.len());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Starting Inkboard");

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
