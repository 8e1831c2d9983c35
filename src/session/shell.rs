//! Session shell - turn-taking around the resolver
//!
//! Owns the display log, command history and optional save store. One
//! command is resolved at a time; `SessionHandle` rejects input that arrives
//! while a command is still in flight.

use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::command::parser::parse;
use crate::command::resolver::CommandResolver;
use crate::command::response::{Response, ResponseKind, ShellAction};
use crate::core::error::{Result, RogueError};
use crate::session::persistence::{SaveGame, SaveStore};

pub const BOOT_BANNER: [&str; 4] = [
    "RogueCode OS v1.0.3 [Build 20771225]",
    "Initializing secure connection...",
    "Connection established. Welcome back, Rogue.",
    "Type \"help\" to see available commands.",
];

/// Who produced a log line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSource {
    /// Echo of what the player typed
    Input,
    Output(ResponseKind),
}

/// An entry in the display log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub source: LineSource,
    pub text: String,
}

pub struct Session {
    resolver: CommandResolver,
    log: VecDeque<LogLine>,
    history: Vec<String>,
    max_log_entries: usize,
    actions: Vec<ShellAction>,
    store: Option<Box<dyn SaveStore>>,
}

impl Session {
    pub fn new(resolver: CommandResolver) -> Self {
        let max_log_entries = resolver.config().max_log_entries.max(1);
        let mut session = Self {
            resolver,
            log: VecDeque::with_capacity(max_log_entries),
            history: Vec::new(),
            max_log_entries,
            actions: Vec::new(),
            store: None,
        };
        for line in BOOT_BANNER {
            session.push(LineSource::Output(ResponseKind::System), line.to_string());
        }
        session
    }

    /// Attach a save store; every resolved command autosaves through it
    pub fn with_store(mut self, store: Box<dyn SaveStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Restore player and world from the store. Returns false when there is
    /// no store or nothing saved.
    pub fn load_saved(&mut self) -> Result<bool> {
        let Some(store) = &self.store else {
            return Ok(false);
        };
        let Some(game) = store.load()? else {
            return Ok(false);
        };

        self.resolver.progression_mut().restore(game.player);
        self.resolver.world_mut().restore(game.world);
        tracing::info!("Restored save from {}", game.saved_at);
        Ok(true)
    }

    /// Resolve one line of input and record it
    pub async fn submit(&mut self, input: &str) -> Response {
        let line = input.trim();
        if !line.is_empty() {
            self.history.push(line.to_string());
        }
        self.push(LineSource::Input, format!("> {}", line));

        let command = parse(line);
        let response = self.resolver.resolve(&command).await;

        if response.action == Some(ShellAction::ClearTerminal) {
            self.log.clear();
        }
        if let Some(action) = response.action {
            self.actions.push(action);
        }
        self.push(LineSource::Output(response.kind), response.text.clone());

        if let Err(e) = self.autosave() {
            tracing::warn!("Autosave failed: {}", e);
        }

        response
    }

    /// Save now, if a store is attached
    pub fn autosave(&mut self) -> Result<()> {
        let Some(store) = self.store.as_mut() else {
            return Ok(());
        };
        let game = SaveGame::new(
            self.resolver.progression().snapshot(),
            self.resolver.world().snapshot(),
        );
        store.save(&game)
    }

    fn push(&mut self, source: LineSource, text: String) {
        while self.log.len() >= self.max_log_entries {
            self.log.pop_front();
        }
        self.log.push_back(LogLine { source, text });
    }

    pub fn log(&self) -> impl Iterator<Item = &LogLine> {
        self.log.iter()
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// UI actions raised since the last call, oldest first
    pub fn take_actions(&mut self) -> Vec<ShellAction> {
        std::mem::take(&mut self.actions)
    }

    pub fn resolver(&self) -> &CommandResolver {
        &self.resolver
    }

    pub fn resolver_mut(&mut self) -> &mut CommandResolver {
        &mut self.resolver
    }
}

/// Shareable session front door with a processing gate
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<Mutex<Session>>,
}

impl SessionHandle {
    pub fn new(session: Session) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Submit input, or `Err(Busy)` if a command is still being resolved
    pub async fn submit(&self, input: &str) -> Result<Response> {
        let mut session = self.inner.try_lock().map_err(|_| RogueError::Busy)?;
        Ok(session.submit(input).await)
    }

    pub fn is_processing(&self) -> bool {
        self.inner.try_lock().is_err()
    }

    /// Wait for any in-flight command and borrow the session
    pub async fn lock(&self) -> tokio::sync::MutexGuard<'_, Session> {
        self.inner.lock().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::GameConfig;
    use crate::session::persistence::MemoryStore;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn session() -> Session {
        let resolver = CommandResolver::with_rng(GameConfig::default(), Box::new(ChaCha8Rng::seed_from_u64(5)));
        Session::new(resolver)
    }

    #[test]
    fn test_boot_banner() {
        let session = session();
        let lines: Vec<_> = session.log().map(|l| l.text.as_str()).collect();
        assert_eq!(lines, BOOT_BANNER);
    }

    #[tokio::test]
    async fn test_submit_echoes_and_records_history() {
        let mut session = session();
        session.submit("  status ").await;
        session.submit("").await;
        assert_eq!(session.history(), ["status"]);

        let last_two: Vec<_> = session.log().skip(BOOT_BANNER.len()).take(2).collect();
        assert_eq!(last_two[0].source, LineSource::Input);
        assert_eq!(last_two[0].text, "> status");
        assert_eq!(last_two[1].source, LineSource::Output(ResponseKind::Info));
    }

    #[tokio::test]
    async fn test_clear_leaves_single_line() {
        let mut session = session();
        session.submit("status").await;
        session.submit("clear").await;
        let lines: Vec<_> = session.log().collect();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "Terminal cleared.");
        assert_eq!(session.take_actions(), vec![ShellAction::ClearTerminal]);
        assert!(session.take_actions().is_empty());
    }

    #[tokio::test]
    async fn test_log_is_bounded() {
        let config = GameConfig {
            max_log_entries: 5,
            ..GameConfig::default()
        };
        let mut session = Session::new(CommandResolver::new(config));
        for _ in 0..10 {
            session.submit("status").await;
        }
        assert_eq!(session.log().count(), 5);
    }

    #[tokio::test]
    async fn test_autosave_and_reload() {
        let mut session = session().with_store(Box::new(MemoryStore::new()));
        session.submit("upgrade toolkit").await;
        session.submit("connect nexus").await;
        let saved = session.store.as_ref().unwrap().load().unwrap().unwrap();
        assert!(saved.player.skills.contains("toolkit"));
        assert_eq!(saved.world.current_system.as_deref(), Some("nexus"));

        let mut fresh = session_with(saved);
        assert!(fresh.load_saved().unwrap());
        assert!(fresh.resolver().progression().player().skills.contains("toolkit"));
        assert_eq!(fresh.resolver().world().current_system(), Some("nexus"));
    }

    fn session_with(game: SaveGame) -> Session {
        let mut store = MemoryStore::new();
        store.save(&game).unwrap();
        session().with_store(Box::new(store))
    }

    #[tokio::test]
    async fn test_handle_rejects_input_while_busy() {
        let handle = SessionHandle::new(session());
        let guard = handle.lock().await;
        assert!(handle.is_processing());
        assert!(matches!(handle.submit("status").await, Err(RogueError::Busy)));
        drop(guard);

        assert!(!handle.is_processing());
        let response = handle.submit("status").await.unwrap();
        assert_eq!(response.kind, ResponseKind::Info);
    }
}
