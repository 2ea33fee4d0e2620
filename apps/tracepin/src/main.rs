//! tracepin command line entry point

mod cli;

use std::process;
use tracepin_foundation::TracepinError;

fn main() {
    if let Err(err) = cli::run() {
        match err.downcast_ref::<TracepinError>() {
            // Problems in the document itself are reported without a chain
            Some(inner) if inner.is_user_facing() => eprintln!("error: {inner}"),
            _ => eprintln!("error: {err:#}"),
        }
        process::exit(1);
    }
}
