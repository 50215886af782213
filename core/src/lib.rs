pub mod context;
pub mod error;
pub mod events;
pub mod processor;
pub mod reader;
pub mod record;
pub mod state;
pub mod unit_id;
pub mod version;

// Re-exports for convenience
pub use error::{Result, TrackerError};
pub use events::{EventKind, Location, ResolveState, TrackerEvent, UnresolvedRef};
pub use processor::{ProcessorStats, TrackerProcessor};
pub use record::{Blob, TrackerRecord, Value};
pub use state::{Player, ReplayState, WorkerOutput};
pub use unit_id::UnitId;
pub use version::VersionPolicy;
