mod burn_executor;
mod fine_trim;

pub use burn_executor::{BurnExecutor, BurnReport};
pub use fine_trim::{FineTrim, TrimCommand};
