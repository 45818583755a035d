//! JSON-described level and its fixed-step runner.
use std::cell::RefCell;
use std::fmt;
use std::path::Path;
use std::rc::Rc;

use glam::Vec3;
use hashbrown::HashSet;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::{KinematicAgent, SandboxWorld};
use crate::agent::{AgentId, Body, BodyHandle};
use crate::alert::{AlertDisplay, Marker};
use crate::behavior::{AgentWiring, Camper, CamperConfig, Ranger, RangerConfig};
use crate::config::{ensure_non_negative, ConfigError};
use crate::directory::RangerDirectory;
use crate::distraction::Distraction;
use crate::emitter::SoundEmitter;
use crate::layers::Layers;
use crate::npc::Npc;
use crate::outcome::{FailureCause, OutcomeSink};
use crate::sensor::SensorConfig;
use crate::spatial::ColliderId;

/// The player's scripted walk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Starting position.
    pub start: Vec3,
    /// Points walked in order; the player stops at the last one.
    pub route: Vec<Vec3>,
    /// Walking speed.
    pub speed: f32,
    /// Radius of the player's collider.
    pub radius: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            start: Vec3::ZERO,
            route: Vec::new(),
            speed: 1.5,
            radius: 0.3,
        }
    }
}

/// A static obstacle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleSpawn {
    /// Centre of the obstacle.
    pub position: Vec3,
    /// Radius of the obstacle.
    pub radius: f32,
    /// Category string.
    pub tag: String,
}

impl Default for ObstacleSpawn {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            radius: 1.0,
            tag: "Tree".to_owned(),
        }
    }
}

/// A camper placed in the level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CamperSpawn {
    /// Spawn position, also the camper's home.
    pub position: Vec3,
    /// Initial heading in degrees.
    pub yaw: f32,
    /// Perception tunables.
    pub sensor: SensorConfig,
    /// Behaviour tunables.
    pub behavior: CamperConfig,
    /// Whether the camper has alert markers.
    pub markers: bool,
}

impl Default for CamperSpawn {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: 0.0,
            sensor: SensorConfig::default(),
            behavior: CamperConfig::default(),
            markers: true,
        }
    }
}

/// A ranger placed in the level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangerSpawn {
    /// Spawn position.
    pub position: Vec3,
    /// Initial heading in degrees.
    pub yaw: f32,
    /// Perception tunables.
    pub sensor: SensorConfig,
    /// Behaviour tunables, including the patrol route.
    pub behavior: RangerConfig,
    /// Whether the ranger has alert markers.
    pub markers: bool,
}

impl Default for RangerSpawn {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: 0.0,
            sensor: SensorConfig::default(),
            behavior: RangerConfig::default(),
            markers: true,
        }
    }
}

/// A noisy prop set off when the player walks into it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterSpawn {
    /// The noise itself.
    #[serde(flatten)]
    pub emitter: SoundEmitter,
    /// Radius of the prop's trigger volume.
    pub trigger_radius: f32,
}

impl Default for EmitterSpawn {
    fn default() -> Self {
        Self {
            emitter: SoundEmitter::default(),
            trigger_radius: 0.5,
        }
    }
}

/// An item the player throws, landing at a fixed time in the round.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrowSpawn {
    /// Seconds into the round at which the item lands.
    pub at_seconds: f32,
    /// Where it lands.
    pub landing: Vec3,
    /// The item itself.
    #[serde(flatten)]
    pub item: Distraction,
}

/// Everything needed to build a [`Level`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// The player's walk.
    pub player: PlayerConfig,
    /// Static obstacles.
    pub obstacles: Vec<ObstacleSpawn>,
    /// Campers.
    pub campers: Vec<CamperSpawn>,
    /// Rangers.
    pub rangers: Vec<RangerSpawn>,
    /// Noisy props.
    pub emitters: Vec<EmitterSpawn>,
    /// Scripted throws.
    pub throws: Vec<ThrowSpawn>,
    /// Radius of every NPC's trigger volume.
    pub contact_radius: f32,
    /// Stopping distance of every NPC's path agent.
    pub stopping_distance: f32,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            player: PlayerConfig::default(),
            obstacles: Vec::new(),
            campers: Vec::new(),
            rangers: Vec::new(),
            emitters: Vec::new(),
            throws: Vec::new(),
            contact_radius: 0.5,
            stopping_distance: 0.2,
        }
    }
}

impl LevelConfig {
    /// Parses and validates a JSON level description.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON level file.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] when the file cannot be read, otherwise as
    /// [`LevelConfig::from_json`].
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Checks every nested section.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] for the first field out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_non_negative("level.player.speed", self.player.speed)?;
        ensure_non_negative("level.player.radius", self.player.radius)?;
        ensure_non_negative("level.contact_radius", self.contact_radius)?;
        ensure_non_negative("level.stopping_distance", self.stopping_distance)?;
        for obstacle in &self.obstacles {
            ensure_non_negative("level.obstacles.radius", obstacle.radius)?;
        }
        for camper in &self.campers {
            camper.sensor.validate()?;
            camper.behavior.validate()?;
        }
        for ranger in &self.rangers {
            ranger.sensor.validate()?;
            ranger.behavior.validate()?;
        }
        for spawn in &self.emitters {
            ensure_non_negative("level.emitters.radius", spawn.emitter.radius)?;
            ensure_non_negative("level.emitters.trigger_radius", spawn.trigger_radius)?;
        }
        for throw in &self.throws {
            ensure_non_negative("level.throws.at_seconds", throw.at_seconds)?;
            throw.item.validate()?;
        }
        Ok(())
    }

    /// A small clearing with one camper, one ranger and a dry branch.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            player: PlayerConfig {
                start: Vec3::new(-12.0, 0.0, 0.0),
                route: vec![Vec3::new(-4.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 2.0)],
                ..PlayerConfig::default()
            },
            obstacles: vec![
                ObstacleSpawn {
                    position: Vec3::new(3.0, 0.0, -3.0),
                    ..ObstacleSpawn::default()
                },
                ObstacleSpawn {
                    position: Vec3::new(-4.0, 0.0, 6.0),
                    radius: 1.5,
                    tag: "Boulder".to_owned(),
                },
            ],
            campers: vec![CamperSpawn {
                position: Vec3::new(0.0, 0.0, 5.0),
                yaw: 180.0,
                ..CamperSpawn::default()
            }],
            rangers: vec![RangerSpawn {
                position: Vec3::new(8.0, 0.0, 8.0),
                behavior: RangerConfig {
                    waypoints: vec![Vec3::new(8.0, 0.0, 8.0), Vec3::new(8.0, 0.0, -8.0)],
                    ..RangerConfig::default()
                },
                ..RangerSpawn::default()
            }],
            emitters: vec![EmitterSpawn {
                emitter: SoundEmitter::new(Vec3::new(-6.0, 0.0, 0.0), 10.0, "Branch"),
                ..EmitterSpawn::default()
            }],
            ..Self::default()
        }
    }
}

/// [`OutcomeSink`] that records every failure of a run.
#[derive(Clone, Debug, Default)]
pub struct Scoreboard(Rc<RefCell<Vec<FailureCause>>>);

impl Scoreboard {
    /// First failure reported, if any.
    #[must_use]
    pub fn first(&self) -> Option<FailureCause> {
        self.0.try_borrow().ok()?.first().copied()
    }

    /// Every failure reported so far.
    #[must_use]
    pub fn failures(&self) -> Vec<FailureCause> {
        self.0
            .try_borrow()
            .map(|failures| failures.clone())
            .unwrap_or_default()
    }
}

impl OutcomeSink for Scoreboard {
    fn notify_failure(&self, cause: FailureCause) {
        info!("round lost: {} ({})", cause.agent, cause.reason);
        match self.0.try_borrow_mut() {
            Ok(mut failures) => failures.push(cause),
            Err(_) => warn!("scoreboard busy; dropped failure from {}", cause.agent),
        }
    }
}

struct MarkerLog(AgentId);

impl AlertDisplay for MarkerLog {
    fn show(&mut self, marker: Marker, visible: bool) {
        debug!("{}: {marker:?} marker {}", self.0, if visible { "on" } else { "off" });
    }
}

struct Player {
    body: BodyHandle,
    collider: ColliderId,
    route: Vec<Vec3>,
    next: usize,
    speed: f32,
    radius: f32,
}

impl Player {
    fn advance(&mut self, dt: f32) {
        let Some(target) = self.route.get(self.next).copied() else {
            return;
        };
        let position = self.body.position();
        let offset = target - position;
        let reach = self.speed * dt;
        if offset.length() <= reach {
            self.body.set_position(target);
            self.next += 1;
        } else {
            self.body
                .set_position(position + offset.normalize_or_zero() * reach);
        }
    }
}

/// Summary of [`Level::run`].
#[derive(Clone, Debug, PartialEq)]
pub struct RunReport {
    /// Simulated seconds.
    pub elapsed: f32,
    /// First failure, if the round was lost.
    pub failure: Option<FailureCause>,
    /// Final state of every NPC.
    pub agents: Vec<(AgentId, String)>,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.failure {
            Some(cause) => write!(
                f,
                "lost after {:.1}s: {} ({})",
                self.elapsed, cause.agent, cause.reason
            )?,
            None => write!(f, "survived {:.1}s", self.elapsed)?,
        }
        for (id, state) in &self.agents {
            write!(f, "; {id}={state}")?;
        }
        Ok(())
    }
}

/// A running level.
pub struct Level {
    world: Rc<SandboxWorld>,
    directory: Rc<RangerDirectory>,
    scoreboard: Scoreboard,
    player: Player,
    npcs: Vec<Npc>,
    movers: Vec<KinematicAgent>,
    emitters: Vec<EmitterSpawn>,
    throws: Vec<ThrowSpawn>,
    touching: HashSet<AgentId>,
    sounding: HashSet<usize>,
    contact_radius: f32,
    now: f32,
}

impl Level {
    /// Builds the world and spawns every agent at time zero.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] when `config` fails validation.
    pub fn new(config: &LevelConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let world = Rc::new(SandboxWorld::new());
        for obstacle in &config.obstacles {
            world.add_sphere(obstacle.position, obstacle.radius, Layers::OBSTACLE, &obstacle.tag);
        }
        let player_body = BodyHandle::new(Body::new(config.player.start, 0.0));
        let collider = world.add_sphere(
            config.player.start,
            config.player.radius,
            Layers::PLAYER,
            "Player",
        );

        let mut level = Self {
            world,
            directory: Rc::new(RangerDirectory::new()),
            scoreboard: Scoreboard::default(),
            player: Player {
                body: player_body,
                collider,
                route: config.player.route.clone(),
                next: 0,
                speed: config.player.speed,
                radius: config.player.radius,
            },
            npcs: Vec::new(),
            movers: Vec::new(),
            emitters: config.emitters.clone(),
            throws: config.throws.clone(),
            touching: HashSet::new(),
            sounding: HashSet::new(),
            contact_radius: config.contact_radius,
            now: 0.0,
        };

        for spawn in &config.rangers {
            let (wiring, mover) =
                level.wiring(spawn.position, spawn.yaw, spawn.markers, config.stopping_distance);
            let role = Ranger::new(spawn.behavior.clone());
            let npc = Npc::ranger(wiring, spawn.sensor.clone(), role, level.directory.clone(), 0.0);
            level.push(npc, mover);
        }
        for spawn in &config.campers {
            let (wiring, mover) =
                level.wiring(spawn.position, spawn.yaw, spawn.markers, config.stopping_distance);
            let role = Camper::new(
                spawn.behavior.clone(),
                level.world.clone(),
                level.directory.clone(),
            );
            let npc = Npc::camper(wiring, spawn.sensor.clone(), role, 0.0);
            level.push(npc, mover);
        }
        info!(
            "level ready: {} camper(s), {} ranger(s), {} obstacle(s)",
            config.campers.len(),
            config.rangers.len(),
            config.obstacles.len()
        );
        Ok(level)
    }

    fn wiring(
        &self,
        position: Vec3,
        yaw: f32,
        markers: bool,
        stopping_distance: f32,
    ) -> (AgentWiring, KinematicAgent) {
        let next = u32::try_from(self.npcs.len()).unwrap_or(u32::MAX).saturating_add(1);
        let id = AgentId(next);
        let body = BodyHandle::new(Body::new(position, yaw));
        let mover = KinematicAgent::new(body.clone(), stopping_distance);
        let alert_display: Option<Box<dyn AlertDisplay>> = if markers {
            Some(Box::new(MarkerLog(id)))
        } else {
            None
        };
        let wiring = AgentWiring {
            id,
            body,
            path: Box::new(mover.clone()),
            outcome: Rc::new(self.scoreboard.clone()),
            alert_display,
        };
        (wiring, mover)
    }

    fn push(&mut self, npc: Npc, mover: KinematicAgent) {
        self.npcs.push(npc);
        self.movers.push(mover);
    }

    /// Simulation time in seconds.
    #[must_use]
    pub const fn now(&self) -> f32 {
        self.now
    }

    /// Every NPC, rangers first.
    #[must_use]
    pub fn npcs(&self) -> &[Npc] {
        &self.npcs
    }

    /// Looks up an NPC by id.
    #[must_use]
    pub fn npc(&self, id: AgentId) -> Option<&Npc> {
        self.npcs.iter().find(|npc| npc.id() == id)
    }

    /// The spatial world.
    #[must_use]
    pub fn world(&self) -> &SandboxWorld {
        &self.world
    }

    /// The ranger directory shared by every camper.
    #[must_use]
    pub fn directory(&self) -> &RangerDirectory {
        &self.directory
    }

    /// Failures reported so far.
    #[must_use]
    pub const fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    /// Current player position.
    #[must_use]
    pub fn player_position(&self) -> Vec3 {
        self.player.body.position()
    }

    /// Advances the level by `dt` seconds and returns the first failure, if
    /// the round has been lost.
    pub fn step(&mut self, dt: f32) -> Option<FailureCause> {
        self.now += dt;
        let now = self.now;

        self.player.advance(dt);
        let player = self.player.body.position();
        self.world.move_collider(self.player.collider, player);

        self.trigger_emitters(now, player);
        self.detect_contacts(now, player);
        self.land_throws(now);

        for npc in &mut self.npcs {
            npc.update(now, self.world.as_ref());
        }
        for mover in &self.movers {
            mover.step(dt);
        }
        self.scoreboard.first()
    }

    fn trigger_emitters(&mut self, now: f32, player: Vec3) {
        for (index, spawn) in self.emitters.iter().enumerate() {
            let inside =
                spawn.emitter.position.distance(player) < spawn.trigger_radius + self.player.radius;
            if !inside {
                self.sounding.remove(&index);
                continue;
            }
            if !self.sounding.insert(index) {
                continue;
            }
            spawn.emitter.emit(
                now,
                player,
                self.npcs.iter_mut().map(Npc::sensor_mut),
                self.world.as_ref(),
            );
        }
    }

    fn land_throws(&mut self, now: f32) {
        let (due, pending): (Vec<_>, Vec<_>) = self
            .throws
            .drain(..)
            .partition(|throw| throw.at_seconds <= now);
        self.throws = pending;
        for throw in due {
            if let Some(ranger) = throw.item.land(throw.landing, now, &self.directory) {
                debug!("{ranger} drawn to the {} at {}", throw.item.tag, throw.landing);
            }
        }
    }

    fn detect_contacts(&mut self, now: f32, player: Vec3) {
        let reach = self.contact_radius + self.player.radius;
        for npc in &mut self.npcs {
            let id = npc.id();
            if npc.position().distance(player) >= reach {
                self.touching.remove(&id);
                continue;
            }
            if self.touching.insert(id) {
                npc.on_contact(now, player, Layers::PLAYER);
            }
        }
    }

    /// Steps until `seconds` have elapsed or the round is lost.
    pub fn run(&mut self, seconds: f32, dt: f32) -> RunReport {
        if dt > 0.0 {
            while self.now + dt * 0.5 < seconds {
                if self.step(dt).is_some() {
                    break;
                }
            }
        } else {
            warn!("refusing to run with non-positive step {dt}");
        }
        RunReport {
            elapsed: self.now,
            failure: self.scoreboard.first(),
            agents: self
                .npcs
                .iter()
                .map(|npc| (npc.id(), npc.state_label()))
                .collect(),
        }
    }
}
