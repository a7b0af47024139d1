pub mod prediction;

pub use prediction::{inverse_log10, PredictionService};
