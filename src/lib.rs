//! RogueCode - command engine for a terminal hacking simulator
//!
//! Free-text input is parsed into a [`command::Command`], resolved against
//! the player's progression and the world store, and answered with a
//! [`command::Response`]. Narration can optionally be enriched by an LLM;
//! every command also works fully offline.

pub mod command;
pub mod content;
pub mod core;
pub mod llm;
pub mod progression;
pub mod session;
pub mod world;
