//! # Voxel World Entry Point
//!
//! This is the main entry point of the headless demo.
//! It simply calls into the library's `run()` function to initialize and start the engine.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release
//! ```

fn main() {
    if let Err(err) = voxel_world::run() {
        log::error!("{}", err);
        eprintln!("voxel-world: {}", err);
        std::process::exit(1);
    }
}
