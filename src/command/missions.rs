//! mission generate | list | accept | info | complete

use crate::command::parser::Command;
use crate::command::resolver::CommandResolver;
use crate::command::response::{Response, ResponsePayload, ShellAction};
use crate::content::missions::generate_mission;
use crate::core::error::{Result, RogueError};
use crate::core::types::MissionId;
use crate::progression::XpGain;
use crate::world::mission::MissionStatus;

const MISSION_USAGE: &str = "mission generate|list [status]|accept <id>|info <id>|complete <id>";

impl CommandResolver {
    pub(crate) async fn mission(&mut self, command: &Command) -> Result<Response> {
        let sub = Self::required_arg(command, 0, "No mission subcommand given.", MISSION_USAGE)?;

        match sub.to_lowercase().as_str() {
            "generate" | "new" => self.mission_generate().await,
            "list" => self.mission_list(command.arg(1)),
            "accept" => {
                let id = Self::mission_id(command, "mission accept <id>")?;
                self.mission_accept(&id)
            }
            "info" => {
                let id = Self::mission_id(command, "mission info <id>")?;
                self.mission_info(&id)
            }
            "complete" => {
                let id = Self::mission_id(command, "mission complete <id>")?;
                self.mission_complete(&id)
            }
            other => Err(RogueError::InvalidArgument(format!(
                "Unknown mission subcommand '{}'. Usage: {}",
                other, MISSION_USAGE
            ))),
        }
    }

    fn mission_id(command: &Command, usage: &str) -> Result<MissionId> {
        Self::required_arg(command, 1, "No mission id specified.", usage).map(MissionId::from)
    }

    async fn mission_generate(&mut self) -> Result<Response> {
        let level = self.progression.player().level;
        let draft = generate_mission(&mut *self.rng, level);
        let intel = self
            .briefing_enrichment(draft.mission_type, draft.difficulty)
            .await;

        let id = self.world.add_mission(draft)?;
        let mission = self
            .world
            .get_mission(&id)
            .cloned()
            .ok_or_else(|| RogueError::MissionNotFound(id.clone()))?;

        let mut text = format!("New mission available!\n\n{}", mission.briefing());
        if let Some(intel) = intel {
            text.push_str("\n\nIntel:\n");
            text.push_str(&intel);
        }
        text.push_str(&format!("\n\nType 'mission accept {}' to accept.", id));

        Ok(Response::success(text)
            .with_action(ShellAction::MissionGenerated)
            .with_payload(ResponsePayload::Mission(mission)))
    }

    pub(crate) fn mission_list(&self, filter: Option<&str>) -> Result<Response> {
        let status = match filter {
            Some(raw) => Some(MissionStatus::parse(raw).ok_or_else(|| {
                RogueError::InvalidArgument(format!(
                    "Unknown mission status '{}'. Use available, active or completed.",
                    raw
                ))
            })?),
            None => None,
        };

        let missions: Vec<_> = self.world.list_missions(status).into_iter().cloned().collect();
        if missions.is_empty() {
            return Ok(Response::info(
                "No missions found. Type 'mission generate' to get a new mission.",
            )
            .with_action(ShellAction::ListMissions));
        }

        let heading = match status {
            Some(s) => format!("Missions ({}):", s),
            None => "Missions:".to_string(),
        };
        let lines: Vec<String> = missions.iter().map(|m| m.summary_line()).collect();

        Ok(Response::info(format!("{}\n{}", heading, lines.join("\n")))
            .with_action(ShellAction::ListMissions)
            .with_payload(ResponsePayload::Missions(missions)))
    }

    fn mission_accept(&mut self, id: &MissionId) -> Result<Response> {
        let mission = self.world.set_mission_status(id, MissionStatus::Active)?.clone();
        let text = format!(
            "Mission accepted: {}\nObjective: {}\nTarget: {}\nTime limit: {} min\n\nGood luck, Rogue.",
            mission.title,
            mission.objective,
            mission.target,
            mission.time_limit_secs / 60
        );
        Ok(Response::success(text)
            .with_action(ShellAction::MissionAccepted)
            .with_payload(ResponsePayload::Mission(mission)))
    }

    fn mission_info(&self, id: &MissionId) -> Result<Response> {
        let mission = self
            .world
            .get_mission(id)
            .ok_or_else(|| RogueError::MissionNotFound(id.clone()))?;
        Ok(Response::info(mission.briefing()).with_payload(ResponsePayload::Mission(mission.clone())))
    }

    fn mission_complete(&mut self, id: &MissionId) -> Result<Response> {
        let done = self.world.complete_mission(id, &mut self.progression)?;

        let mut text = format!(
            "Mission complete: {}\n\nRewards:\n+{} XP ({})\nCredits: {} → {}\nReputation: {} → {}",
            done.mission.title,
            done.mission.xp_reward,
            done.xp.describe(),
            done.credits.before,
            done.credits.after,
            done.reputation.before,
            done.reputation.after
        );
        text.push_str(&level_up_note(&done.xp));

        Ok(Response::success(text)
            .with_action(ShellAction::MissionCompleted)
            .with_payload(ResponsePayload::Mission(done.mission)))
    }
}

fn level_up_note(gain: &XpGain) -> String {
    match gain.levels_gained {
        0 => String::new(),
        1 => format!("\n\nLEVEL UP! You are now level {}.", gain.level),
        n => format!("\n\nLEVEL UP x{}! You are now level {}.", n, gain.level),
    }
}

#[cfg(test)]
mod tests {
    use crate::command::parser::parse;
    use crate::command::resolver::CommandResolver;
    use crate::command::response::{ResponseKind, ResponsePayload, ShellAction};
    use crate::core::config::GameConfig;
    use crate::world::mission::{Mission, MissionStatus};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn resolver() -> CommandResolver {
        CommandResolver::with_rng(GameConfig::default(), Box::new(ChaCha8Rng::seed_from_u64(21)))
    }

    async fn generate(resolver: &mut CommandResolver) -> Mission {
        let response = resolver.resolve(&parse("mission generate")).await;
        assert_eq!(response.action, Some(ShellAction::MissionGenerated));
        match response.payload {
            Some(ResponsePayload::Mission(m)) => m,
            other => panic!("expected mission payload, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_generate_creates_available_mission() {
        let mut resolver = resolver();
        let mission = generate(&mut resolver).await;
        assert_eq!(mission.status, MissionStatus::Available);
        assert_eq!(mission.id.as_str(), "mission-1");
        assert_eq!(resolver.world().mission_count(), 1);
    }

    #[tokio::test]
    async fn test_complete_without_accept_is_rejected() {
        let mut resolver = resolver();
        let mission = generate(&mut resolver).await;
        let before = resolver.progression().player().clone();

        let response = resolver
            .resolve(&parse(&format!("mission complete {}", mission.id)))
            .await;
        assert!(response.is_error());
        assert_eq!(resolver.progression().player(), &before);
    }

    #[tokio::test]
    async fn test_accept_twice_errors() {
        let mut resolver = resolver();
        let mission = generate(&mut resolver).await;
        let accept = format!("mission accept {}", mission.id);
        assert_eq!(
            resolver.resolve(&parse(&accept)).await.action,
            Some(ShellAction::MissionAccepted)
        );
        assert!(resolver.resolve(&parse(&accept)).await.is_error());
    }

    #[tokio::test]
    async fn test_list_and_filter() {
        let mut resolver = resolver();
        let first = generate(&mut resolver).await;
        generate(&mut resolver).await;
        resolver
            .resolve(&parse(&format!("mission accept {}", first.id)))
            .await;

        let all = resolver.resolve(&parse("missions")).await;
        assert_eq!(all.kind, ResponseKind::Info);
        assert!(matches!(all.payload, Some(ResponsePayload::Missions(ref v)) if v.len() == 2));

        let active = resolver.resolve(&parse("mission list active")).await;
        assert!(matches!(active.payload, Some(ResponsePayload::Missions(ref v)) if v.len() == 1));

        assert!(resolver.resolve(&parse("mission list pending")).await.is_error());
    }

    #[tokio::test]
    async fn test_info_unknown_id() {
        let mut resolver = resolver();
        let response = resolver.resolve(&parse("mission info mission-99")).await;
        assert!(response.is_error());
        assert!(response.text.contains("mission-99"));
    }

    #[tokio::test]
    async fn test_unknown_subcommand() {
        let mut resolver = resolver();
        let response = resolver.resolve(&parse("mission abandon mission-1")).await;
        assert!(response.is_error());
        assert!(response.text.contains("Unknown mission subcommand"));
    }
}
