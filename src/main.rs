//! ruffwrap binary entry point.

fn main() {
    std::process::exit(ruffwrap::cli::run());
}
