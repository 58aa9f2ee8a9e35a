//! Output directory checks and scoped output files.

mod output_dir;
mod partial;

pub use output_dir::{ensure_output_dir, SetupError};
pub use partial::PartialFile;
