//! fiterior CLI binary
//!
//! All logic is in the library; main.rs only invokes `cli::run()`.

fn main() {
    // cli::run() prints everything, including errors; main only maps the exit code.
    if let Err(code) = fiterior::cli::run() {
        std::process::exit(code.as_i32());
    }
}
