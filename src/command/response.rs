//! Narrated command outcomes handed back to the session shell

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::world::injection::Injection;
use crate::world::mission::Mission;
use crate::world::target::Target;

/// Severity of a response, used by the UI for styling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseKind {
    Info,
    Success,
    Error,
    Warning,
    System,
}

/// Side-effect tags the shell interprets; the resolver never touches UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShellAction {
    OpenHelpPanel,
    OpenSettingsPanel,
    OpenSkillTree,
    OpenInventory,
    ClearTerminal,
    ConnectSystem,
    ExitSystem,
    HackSuccess,
    HackFailure,
    DecryptSuccess,
    AnalyzeComplete,
    UpgradeAi,
    UpgradeFirewall,
    UpgradeToolkit,
    ListMissions,
    MissionGenerated,
    MissionAccepted,
    MissionCompleted,
}

impl fmt::Display for ShellAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            ShellAction::OpenHelpPanel => "OPEN_HELP_PANEL",
            ShellAction::OpenSettingsPanel => "OPEN_SETTINGS_PANEL",
            ShellAction::OpenSkillTree => "OPEN_SKILL_TREE",
            ShellAction::OpenInventory => "OPEN_INVENTORY",
            ShellAction::ClearTerminal => "CLEAR_TERMINAL",
            ShellAction::ConnectSystem => "CONNECT_SYSTEM",
            ShellAction::ExitSystem => "EXIT_SYSTEM",
            ShellAction::HackSuccess => "HACK_SUCCESS",
            ShellAction::HackFailure => "HACK_FAILURE",
            ShellAction::DecryptSuccess => "DECRYPT_SUCCESS",
            ShellAction::AnalyzeComplete => "ANALYZE_COMPLETE",
            ShellAction::UpgradeAi => "UPGRADE_AI",
            ShellAction::UpgradeFirewall => "UPGRADE_FIREWALL",
            ShellAction::UpgradeToolkit => "UPGRADE_TOOLKIT",
            ShellAction::ListMissions => "LIST_MISSIONS",
            ShellAction::MissionGenerated => "MISSION_GENERATED",
            ShellAction::MissionAccepted => "MISSION_ACCEPTED",
            ShellAction::MissionCompleted => "MISSION_COMPLETED",
        };
        f.write_str(tag)
    }
}

/// Auxiliary data attached to a response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum ResponsePayload {
    Mission(Mission),
    Missions(Vec<Mission>),
    Target(Target),
    Injection(Injection),
}

/// The result of resolving one command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub text: String,
    pub kind: ResponseKind,
    pub action: Option<ShellAction>,
    pub payload: Option<ResponsePayload>,
}

impl Response {
    pub fn new(kind: ResponseKind, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind,
            action: None,
            payload: None,
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(ResponseKind::Info, text)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(ResponseKind::Success, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(ResponseKind::Error, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(ResponseKind::Warning, text)
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(ResponseKind::System, text)
    }

    pub fn with_action(mut self, action: ShellAction) -> Self {
        self.action = Some(action);
        self
    }

    pub fn with_payload(mut self, payload: ResponsePayload) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn is_error(&self) -> bool {
        self.kind == ResponseKind::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let response = Response::system("Opening skill tree...").with_action(ShellAction::OpenSkillTree);
        assert_eq!(response.kind, ResponseKind::System);
        assert_eq!(response.action, Some(ShellAction::OpenSkillTree));
        assert!(response.payload.is_none());
        assert!(!response.is_error());
    }

    #[test]
    fn test_action_tag_serialization_matches_display() {
        for action in [
            ShellAction::OpenHelpPanel,
            ShellAction::ClearTerminal,
            ShellAction::MissionGenerated,
            ShellAction::UpgradeAi,
        ] {
            let json = serde_json::to_string(&action).unwrap();
            assert_eq!(json, format!("\"{}\"", action));
        }
    }

    #[test]
    fn test_kind_serialization() {
        assert_eq!(serde_json::to_string(&ResponseKind::Warning).unwrap(), "\"warning\"");
    }
}
