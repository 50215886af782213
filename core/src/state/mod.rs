mod cache;
mod entity;
pub mod ipc;
mod registry;
pub mod unit_class;

pub use cache::ReplayState;
pub use entity::{Player, PlayerHandle, PlayerType, Unit, UnitHandle};
pub use ipc::{WorkerOutput, WorkerPlayerSummary};
pub use registry::{EmptyRegistry, Registry};
pub use unit_class::UnitClass;
