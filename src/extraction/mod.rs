pub mod admission;
pub mod age;
pub mod amount;
pub mod clinical;
pub mod labels;
pub mod medication;
pub mod name;
pub mod patterns;
pub mod segment;
pub mod select;

pub use admission::{AdmissionExtractor, AdmissionInfo};
pub use age::AgeExtractor;
pub use amount::AmountExtractor;
pub use clinical::{DiagnosisExtractor, ProcedureExtractor};
pub use labels::{LabelIndex, LabelScanner};
pub use medication::MedicationExtractor;
pub use name::NameExtractor;
pub use segment::TextSegmenter;
pub use select::select_preferred;
