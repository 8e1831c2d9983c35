//! World state: missions, targets, injected payloads

pub mod injection;
pub mod mission;
pub mod store;
pub mod target;

pub use injection::{Injection, PayloadKind};
pub use mission::{Mission, MissionDraft, MissionLogEntry, MissionStatus, MissionType};
pub use store::{HackRecord, MissionCompletion, WorldSnapshot, WorldStore};
pub use target::{Target, TargetKind, TargetStatus};
