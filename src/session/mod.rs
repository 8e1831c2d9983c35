//! Session shell and save games

pub mod persistence;
pub mod shell;

pub use persistence::{JsonFileStore, MemoryStore, SaveGame, SaveStore};
pub use shell::{LineSource, LogLine, Session, SessionHandle, BOOT_BANNER};
