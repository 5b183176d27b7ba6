pub mod constants;
pub mod logging;
pub mod progress;
pub mod values;

pub use constants::*;
pub use logging::init_logging;
pub use progress::ProgressReporter;
pub use values::{clean_text, parse_integer, parse_timestamp};
