mod analysis_pass;

pub use analysis_pass::{AnalysisPass, AnalysisReport};
