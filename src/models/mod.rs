pub mod binary;
pub mod convolution;
pub mod table;

pub use binary::{binary_outcome, BinaryOutcome};
pub use convolution::cumulative_path;
pub use table::RateExpectations;
