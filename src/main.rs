//! # Voxel World Entry Point
//!
//! Runs a headless session: generates a world, plays a short scripted walk with
//! block edits and logs what happened.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- [config.json]
//! ```

fn main() {
    if voxel_world::run().is_err() {
        std::process::exit(1);
    }
}
