//! WorldStore - missions, targets, injections and the current system
//!
//! The store is the only mutator of these records. Records live in
//! insertion-ordered vectors with id -> index maps alongside.

use ahash::AHashMap;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::core::error::{Result, RogueError};
use crate::core::types::{InjectionId, MissionId, TargetId, Timestamp};
use crate::progression::{Grant, Progression, XpGain};
use crate::world::injection::Injection;
use crate::world::mission::{Mission, MissionDraft, MissionLogEntry, MissionStatus};
use crate::world::target::Target;

/// Serializable image of the whole store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub missions: Vec<Mission>,
    pub targets: Vec<Target>,
    pub injections: Vec<Injection>,
    pub current_system: Option<String>,
    pub mission_log: Vec<MissionLogEntry>,
    pub next_mission_seq: u32,
}

/// Everything a completed mission paid out
#[derive(Debug, Clone)]
pub struct MissionCompletion {
    pub mission: Mission,
    pub xp: XpGain,
    pub credits: Grant,
    pub reputation: Grant,
}

/// Result of marking a target hacked
#[derive(Debug, Clone)]
pub struct HackRecord {
    pub target: Target,
    /// False when the target was already compromised
    pub newly_hacked: bool,
}

#[derive(Debug, Default)]
pub struct WorldStore {
    missions: Vec<Mission>,
    mission_index: AHashMap<MissionId, usize>,
    targets: Vec<Target>,
    target_index: AHashMap<TargetId, usize>,
    injections: Vec<Injection>,
    current_system: Option<String>,
    mission_log: Vec<MissionLogEntry>,
    next_mission_seq: u32,
}

impl WorldStore {
    pub fn new() -> Self {
        Self {
            next_mission_seq: 1,
            ..Self::default()
        }
    }

    // === MISSIONS ===

    /// Store a mission, assigning `mission-<n>` when the draft has no id.
    /// New missions always start `available`.
    pub fn add_mission(&mut self, mut draft: MissionDraft) -> Result<MissionId> {
        let id = match draft.id.take() {
            Some(id) => {
                if self.mission_index.contains_key(&id) {
                    return Err(RogueError::InvalidArgument(format!(
                        "Mission id {} is already taken.",
                        id
                    )));
                }
                id
            }
            None => self.next_free_mission_id()?,
        };

        let mission = Mission::from_draft(id.clone(), draft, Utc::now());
        tracing::debug!("Mission added: {} ({})", id, mission.title);
        self.mission_index.insert(id.clone(), self.missions.len());
        self.missions.push(mission);
        Ok(id)
    }

    fn next_free_mission_id(&mut self) -> Result<MissionId> {
        loop {
            let seq = self.next_mission_seq;
            self.next_mission_seq = seq.checked_add(1).ok_or_else(|| {
                RogueError::InvalidArgument(
                    "Mission ids exhausted. Run 'reset all' to start a new career.".into(),
                )
            })?;
            let id = MissionId::from_sequence(seq);
            if !self.mission_index.contains_key(&id) {
                return Ok(id);
            }
        }
    }

    pub fn get_mission(&self, id: &MissionId) -> Option<&Mission> {
        self.mission_index.get(id).map(|&i| &self.missions[i])
    }

    /// Missions in insertion order, optionally filtered by status
    pub fn list_missions(&self, status: Option<MissionStatus>) -> Vec<&Mission> {
        self.missions
            .iter()
            .filter(|m| status.map_or(true, |s| m.status == s))
            .collect()
    }

    /// Move a mission one step along its lifecycle.
    ///
    /// Completion pays rewards and must go through [`complete_mission`](Self::complete_mission).
    pub fn set_mission_status(&mut self, id: &MissionId, status: MissionStatus) -> Result<&Mission> {
        if status == MissionStatus::Completed {
            return Err(RogueError::InvalidArgument(format!(
                "Mission {} can only be completed through mission complete.",
                id
            )));
        }

        let idx = self.checked_transition(id, status)?;
        let now = Utc::now();
        let mission = &mut self.missions[idx];
        mission.status = status;
        if status == MissionStatus::Active {
            mission.accepted_at = Some(now);
        }

        let event = format!("Mission accepted: {}", mission.title);
        tracing::info!("{} -> {}", id, status);
        self.mission_log.push(MissionLogEntry {
            timestamp: now,
            mission: id.clone(),
            event,
        });

        Ok(&self.missions[idx])
    }

    /// Complete an active mission and pay its rewards into `progression`.
    ///
    /// Nothing is mutated unless the mission exists and is active.
    pub fn complete_mission(
        &mut self,
        id: &MissionId,
        progression: &mut Progression,
    ) -> Result<MissionCompletion> {
        let idx = self.checked_transition(id, MissionStatus::Completed)?;
        let now = Utc::now();

        let mission = &mut self.missions[idx];
        mission.status = MissionStatus::Completed;
        mission.completed_at = Some(now);
        let mission = mission.clone();

        let xp = progression.add_xp(mission.xp_reward);
        let credits = progression.grant_credits(mission.credit_reward);
        let reputation = progression.grant_reputation(mission.reputation_reward);
        progression.record_completed_mission(mission.id.clone());

        tracing::info!(
            "{} completed: +{} XP, +{} credits, +{} reputation",
            id,
            mission.xp_reward,
            mission.credit_reward,
            mission.reputation_reward
        );
        self.mission_log.push(MissionLogEntry {
            timestamp: now,
            mission: id.clone(),
            event: format!("Mission completed: {}", mission.title),
        });

        Ok(MissionCompletion {
            mission,
            xp,
            credits,
            reputation,
        })
    }

    fn checked_transition(&self, id: &MissionId, to: MissionStatus) -> Result<usize> {
        let idx = *self
            .mission_index
            .get(id)
            .ok_or_else(|| RogueError::MissionNotFound(id.clone()))?;
        let from = self.missions[idx].status;
        if !from.can_transition_to(to) {
            return Err(RogueError::IllegalTransition {
                id: id.clone(),
                from,
                to,
            });
        }
        Ok(idx)
    }

    pub fn mission_log(&self) -> &[MissionLogEntry] {
        &self.mission_log
    }

    // === TARGETS ===

    /// Insert a target or merge a new scan into the existing record
    pub fn upsert_target(&mut self, target: Target) -> &Target {
        match self.target_index.get(&target.id) {
            Some(&idx) => {
                self.targets[idx].absorb_scan(target);
                &self.targets[idx]
            }
            None => {
                let idx = self.targets.len();
                self.target_index.insert(target.id.clone(), idx);
                self.targets.push(target);
                &self.targets[idx]
            }
        }
    }

    pub fn get_target(&self, id: &TargetId) -> Option<&Target> {
        self.target_index.get(id).map(|&i| &self.targets[i])
    }

    pub fn list_targets(&self) -> &[Target] {
        &self.targets
    }

    /// Flag a target as hacked, creating an unscanned record if needed
    pub fn mark_target_hacked(&mut self, name: &str, now: Timestamp) -> HackRecord {
        let id = TargetId::new(name);
        let idx = match self.target_index.get(&id) {
            Some(&idx) => idx,
            None => {
                let idx = self.targets.len();
                self.target_index.insert(id, idx);
                self.targets.push(Target::unscanned(name, now));
                idx
            }
        };

        let target = &mut self.targets[idx];
        let newly_hacked = !target.hacked;
        target.mark_hacked(now);
        HackRecord {
            target: target.clone(),
            newly_hacked,
        }
    }

    // === INJECTIONS ===

    pub fn add_injection(&mut self, injection: Injection) -> InjectionId {
        let id = injection.id.clone();
        tracing::debug!("Injection {} ({}) on {}", id, injection.payload, injection.target);
        self.injections.push(injection);
        id
    }

    pub fn list_injections(&self) -> &[Injection] {
        &self.injections
    }

    pub fn has_injection_for(&self, target: &TargetId) -> bool {
        self.injections.iter().any(|inj| &inj.target == target)
    }

    // === CURRENT SYSTEM ===

    pub fn current_system(&self) -> Option<&str> {
        self.current_system.as_deref()
    }

    pub fn set_current_system(&mut self, system: Option<String>) -> Option<String> {
        std::mem::replace(&mut self.current_system, system)
    }

    // === WHOLE STORE ===

    /// Drop every record and restart id sequences
    pub fn clear(&mut self) {
        *self = Self::new();
        tracing::info!("World store cleared");
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            missions: self.missions.clone(),
            targets: self.targets.clone(),
            injections: self.injections.clone(),
            current_system: self.current_system.clone(),
            mission_log: self.mission_log.clone(),
            next_mission_seq: self.next_mission_seq,
        }
    }

    pub fn restore(&mut self, snapshot: WorldSnapshot) {
        let mission_index = snapshot
            .missions
            .iter()
            .enumerate()
            .map(|(i, m)| (m.id.clone(), i))
            .collect();
        let target_index = snapshot
            .targets
            .iter()
            .enumerate()
            .map(|(i, t)| (t.id.clone(), i))
            .collect();

        // Never hand out an id at or below one already stored
        let after_highest = snapshot
            .missions
            .iter()
            .filter_map(|m| m.id.sequence())
            .max()
            .map_or(1, |n| n.saturating_add(1));

        *self = Self {
            missions: snapshot.missions,
            mission_index,
            targets: snapshot.targets,
            target_index,
            injections: snapshot.injections,
            current_system: snapshot.current_system,
            mission_log: snapshot.mission_log,
            next_mission_seq: snapshot.next_mission_seq.max(after_highest),
        };
    }

    pub fn mission_count(&self) -> usize {
        self.missions.len()
    }
}
