pub mod competition;
pub mod structure;

pub use competition::CompetitionChart;
pub use structure::{StructureChart, StructureSummary};
