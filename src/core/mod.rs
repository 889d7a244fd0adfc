pub mod errors;
pub mod models;
pub mod state;

pub use errors::ScanError;
pub use models::{
    AnalysisResult, EngineResult, EngineVerdict, GroundingSource, Location, ScanOutcome,
    SecurityReport, ThreatStatus, WebSource,
};
pub use state::ScanState;
