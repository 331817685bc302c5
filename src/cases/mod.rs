pub mod case;

pub use case::{load_cases, parse_cases, presets, Case, CaseBuilder, CaseSpec};
