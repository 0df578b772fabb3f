pub mod data;
pub mod vocab;

pub use data::*;
pub use vocab::ExtractionVocabulary;
