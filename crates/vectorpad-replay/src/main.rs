//! Headless replay entry point.
//!
//! Loads a document and a gesture script, replays the script through the
//! canvas and prints the resulting document as JSON.

mod script;

use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Starting VectorPad replay");

    let args: Vec<String> = std::env::args().skip(1).collect();
    match script::replay_files(&args) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("replay failed: {e}");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
