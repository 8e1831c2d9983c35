//! debug, fix and reset: direct access to the progression invariants

use serde_json::json;

use crate::command::parser::Command;
use crate::command::resolver::CommandResolver;
use crate::command::response::Response;
use crate::core::error::{Result, RogueError};

const DEBUG_USAGE: &str = "debug xp|state";
const FIX_USAGE: &str = "fix stats";
const RESET_USAGE: &str = "reset stats|all";

impl CommandResolver {
    pub(crate) fn debug(&self, command: &Command) -> Result<Response> {
        let topic = Self::required_arg(command, 0, "No debug topic specified.", DEBUG_USAGE)?;
        let player = self.progression.player();

        match topic.to_lowercase().as_str() {
            "xp" => {
                let curve = self.progression.curve();
                let mut threshold = player.xp_to_next_level;
                let mut upcoming = Vec::new();
                for _ in 0..3 {
                    threshold = curve.next_threshold(threshold);
                    upcoming.push(threshold.to_string());
                }

                Ok(Response::info(format!(
                    "XP diagnostics:\nLevel: {}\nXP: {}/{}\nLifetime XP: {}\nConsistent: {}\nNext thresholds: {}",
                    player.level,
                    player.xp,
                    player.xp_to_next_level,
                    self.progression.lifetime_xp(),
                    if player.is_consistent() { "yes" } else { "NO (run 'fix stats')" },
                    upcoming.join(", ")
                )))
            }
            "state" => {
                let state = json!({
                    "player": player,
                    "world": {
                        "missions": self.world.mission_count(),
                        "targets": self.world.list_targets().len(),
                        "injections": self.world.list_injections().len(),
                        "current_system": self.world.current_system(),
                        "mission_log": self.world.mission_log().len(),
                    },
                    "enrichment": self.enrichment.name(),
                });
                Ok(Response::info(format!(
                    "Game state:\n{}",
                    serde_json::to_string_pretty(&state)?
                )))
            }
            other => Err(RogueError::InvalidArgument(format!(
                "Unknown debug topic '{}'. Usage: {}",
                other, DEBUG_USAGE
            ))),
        }
    }

    pub(crate) fn fix(&mut self, command: &Command) -> Result<Response> {
        let topic = Self::required_arg(command, 0, "Nothing to fix specified.", FIX_USAGE)?;
        if !topic.eq_ignore_ascii_case("stats") {
            return Err(RogueError::InvalidArgument(format!(
                "Cannot fix '{}'. Usage: {}",
                topic, FIX_USAGE
            )));
        }

        let repair = self.progression.repair_consistency();
        let unchanged = repair.level_before == repair.level
            && repair.xp_before == repair.xp
            && repair.threshold_before == repair.xp_to_next_level;

        if unchanged {
            return Ok(Response::info(format!(
                "Stats are consistent. Level {}, XP {}/{}.",
                repair.level, repair.xp, repair.xp_to_next_level
            )));
        }

        Ok(Response::success(format!(
            "Stats repaired from {} lifetime XP.\nLevel {} → {} | XP {}/{} → {}/{}",
            repair.amount,
            repair.level_before,
            repair.level,
            repair.xp_before,
            repair.threshold_before,
            repair.xp,
            repair.xp_to_next_level
        )))
    }

    pub(crate) fn reset(&mut self, command: &Command) -> Result<Response> {
        let scope = Self::required_arg(command, 0, "No reset scope specified.", RESET_USAGE)?;

        match scope.to_lowercase().as_str() {
            "stats" => {
                self.progression.reset();
                let p = self.progression.player();
                Ok(Response::success(format!(
                    "Player stats reset.\nLevel: {}\nXP: {}/{}\nCredits: {}\nReputation: {}\n\nSkills, inventory and missions were kept.",
                    p.level, p.xp, p.xp_to_next_level, p.credits, p.reputation
                )))
            }
            "all" => {
                self.progression.reset_all();
                self.world.clear();
                Ok(Response::success(
                    "All game data wiped. Missions, targets, payloads and progress are gone.\nWelcome to your first day, Rogue.",
                ))
            }
            other => Err(RogueError::InvalidArgument(format!(
                "Unknown reset scope '{}'. Usage: {}",
                other, RESET_USAGE
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::command::parser::parse;
    use crate::command::resolver::CommandResolver;
    use crate::command::response::ResponseKind;
    use crate::core::config::GameConfig;
    use rand::rngs::mock::StepRng;

    fn resolver() -> CommandResolver {
        CommandResolver::with_rng(GameConfig::default(), Box::new(StepRng::new(0, 0)))
    }

    #[tokio::test]
    async fn test_fix_stats_repairs_broken_state() {
        let mut resolver = resolver();
        {
            let p = resolver.progression_mut().player_mut_unchecked();
            p.xp = 260;
        }
        let response = resolver.resolve(&parse("fix stats")).await;
        assert_eq!(response.kind, ResponseKind::Success);

        let p = resolver.progression().player();
        assert!(p.is_consistent());
        assert_eq!((p.level, p.xp, p.xp_to_next_level), (3, 10, 225));

        let again = resolver.resolve(&parse("fix stats")).await;
        assert_eq!(again.kind, ResponseKind::Info);
    }

    #[tokio::test]
    async fn test_reset_stats_keeps_world_and_skills() {
        let mut resolver = resolver();
        resolver.resolve(&parse("hack mainframe")).await;
        resolver.resolve(&parse("upgrade toolkit")).await;
        resolver.resolve(&parse("reset stats")).await;

        let p = resolver.progression().player();
        assert_eq!((p.level, p.xp, p.xp_to_next_level, p.credits, p.reputation), (1, 0, 100, 1000, 0));
        assert!(p.skills.contains("toolkit"));
        assert_eq!(resolver.world().list_targets().len(), 1);
    }

    #[tokio::test]
    async fn test_reset_all_wipes_everything() {
        let mut resolver = resolver();
        resolver.resolve(&parse("hack mainframe")).await;
        resolver.resolve(&parse("mission generate")).await;
        resolver.resolve(&parse("upgrade ai")).await;
        resolver.resolve(&parse("reset all")).await;

        assert!(resolver.world().list_targets().is_empty());
        assert_eq!(resolver.world().mission_count(), 0);
        assert!(resolver.progression().player().skills.is_empty());
        assert_eq!(resolver.progression().player().inventory.len(), 3);
    }

    #[tokio::test]
    async fn test_debug_topics() {
        let mut resolver = resolver();
        let xp = resolver.resolve(&parse("debug xp")).await;
        assert!(xp.text.contains("XP: 0/100"));
        assert!(xp.text.contains("Next thresholds: 150, 225, 337"));

        let state = resolver.resolve(&parse("debug state")).await;
        assert!(state.text.contains("\"credits\": 1000"));

        assert!(resolver.resolve(&parse("debug")).await.is_error());
        assert!(resolver.resolve(&parse("reset everything")).await.is_error());
        assert!(resolver.resolve(&parse("fix wifi")).await.is_error());
    }
}
