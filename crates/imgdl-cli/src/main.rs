use clap::Parser;
use imgdl_core::logging;

mod cli;

use crate::cli::Cli;

fn main() {
    let cli = Cli::parse();

    // Log to the state file; stderr if it cannot be opened.
    if logging::init_logging(cli.verbose).is_err() {
        logging::init_logging_stderr(cli.verbose);
    }

    match cli.run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("imgdl error: {:#}", err);
            std::process::exit(1);
        }
    }
}
