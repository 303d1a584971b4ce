#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Orchestrator that turns one world snapshot into one bot command.
//!
//! Every tick the engine records the bot's position with the stall detector
//! and then walks [`Rule::PRIORITY`] from top to bottom. The first rule that
//! yields a command wins and the remaining rules are skipped. When none fires,
//! the externally configured default command is sent unchanged.
//!
//! The engine owns all state for exactly one bot. Controlling several bots
//! from the same process requires one [`Engine`] per bot identity.

mod state;
mod tuning;

pub use state::EngineState;
pub use tuning::Tuning;

use tracing::{debug, info, info_span, warn};
use zooscape_core::{Animal, AnimalId, CellCoord, Command, WorldSnapshot};
use zooscape_system_escape::{emergency_escape, RandomEscape};
use zooscape_system_hazard::{Focus, HazardField, Hazards};
use zooscape_system_movement::{Movement, PathConstraints, StallState};
use zooscape_system_stall_detection::StallTrigger;
use zooscape_system_targeting::{nearest_power_up, Target, Targeting};
use zooscape_world::{query, Arena};

/// Guarded stages of the tick pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rule {
    /// Random step that breaks a detected movement loop.
    OscillationEscape,
    /// Step away from the zookeepers after standing still too long.
    StuckEscape,
    /// Activate the held item.
    UseItem,
    /// First step of the shortest safe path to the chosen target.
    FollowPath,
    /// Best single step when no safe path exists.
    GreedyStep,
}

impl Rule {
    /// Evaluation order. The first rule producing a command ends the tick.
    pub const PRIORITY: [Rule; 5] = [
        Rule::OscillationEscape,
        Rule::StuckEscape,
        Rule::UseItem,
        Rule::FollowPath,
        Rule::GreedyStep,
    ];
}

/// Command chosen for a tick together with the rule that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decision {
    /// Command to send to the game server.
    pub command: Command,
    /// Rule that fired, or `None` when the default command was used.
    pub rule: Option<Rule>,
}

/// Target and hazard field, resolved at most once per tick.
struct Plan {
    target: Option<Target>,
    hazards: HazardField,
}

struct Tick<'a> {
    arena: Arena,
    bot: &'a Animal,
    plan: Option<Plan>,
}

impl Tick<'_> {
    fn prepare(
        &mut self,
        hazards: &Hazards,
        targeting: &Targeting,
        remembered: Option<CellCoord>,
    ) -> (&Arena, &Plan) {
        let position = self.bot.coord;
        let plan = self.plan.get_or_insert_with(|| {
            let target = targeting.select(&self.arena, position, remembered);
            let focus = if target.is_some_and(|target| target.is_pellet()) {
                Focus::Pellet
            } else {
                Focus::Other
            };
            debug!(?target, ?focus, "target resolved");
            Plan {
                target,
                hazards: hazards.build(&self.arena, position, focus),
            }
        });
        (&self.arena, &*plan)
    }
}

/// Decision engine for a single bot.
#[derive(Debug)]
pub struct Engine {
    bot_id: AnimalId,
    tuning: Tuning,
    default_command: Command,
    state: EngineState,
    hazards: Hazards,
    targeting: Targeting,
    movement: Movement,
    random_escape: RandomEscape,
}

impl Engine {
    /// Creates an engine for the bot with the given identity.
    ///
    /// Uses the default tuning and an entropy-seeded random escape.
    #[must_use]
    pub fn new(bot_id: AnimalId) -> Self {
        Self::assemble(
            bot_id,
            Tuning::default(),
            Command::Right,
            RandomEscape::from_entropy(),
        )
    }

    /// Replaces the tuning. Accumulated state is discarded.
    #[must_use]
    pub fn with_tuning(self, tuning: Tuning) -> Self {
        Self::assemble(
            self.bot_id,
            tuning,
            self.default_command,
            self.random_escape,
        )
    }

    /// Seeds the random escape so runs can be replayed exactly.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_escape = RandomEscape::from_seed(seed);
        self
    }

    fn assemble(
        bot_id: AnimalId,
        tuning: Tuning,
        default_command: Command,
        random_escape: RandomEscape,
    ) -> Self {
        Self {
            bot_id,
            state: EngineState::new(&tuning),
            hazards: Hazards::new(tuning.hazard.clone()),
            targeting: Targeting::new(tuning.targeting.clone()),
            movement: Movement::new(tuning.movement.clone()),
            tuning,
            default_command,
            random_escape,
        }
    }

    /// Sets the command returned when no rule produces one.
    pub fn set_default_command(&mut self, command: Command) {
        self.default_command = command;
    }

    /// Command returned when no rule produces one.
    #[must_use]
    pub fn default_command(&self) -> Command {
        self.default_command
    }

    /// Identity of the controlled bot.
    #[must_use]
    pub fn bot_id(&self) -> AnimalId {
        self.bot_id
    }

    /// Tuning in effect.
    #[must_use]
    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// State carried between ticks.
    #[must_use]
    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// Chooses the command for a snapshot.
    pub fn decide(&mut self, snapshot: &WorldSnapshot) -> Command {
        self.decide_with_rule(snapshot).command
    }

    /// Chooses the command for a snapshot and reports which rule fired.
    ///
    /// A snapshot that does not contain the bot, or whose grid cannot be
    /// indexed, yields the default command and leaves the state untouched.
    pub fn decide_with_rule(&mut self, snapshot: &WorldSnapshot) -> Decision {
        let span = info_span!("tick", tick = snapshot.tick, bot = %self.bot_id);
        let _entered = span.enter();

        let Some(bot) = snapshot.animal(self.bot_id) else {
            warn!("bot not present in snapshot, sending default command");
            return self.fallback();
        };
        let arena = match Arena::from_snapshot(snapshot) {
            Ok(arena) => arena,
            Err(error) => {
                warn!(%error, "snapshot grid unusable, sending default command");
                return self.fallback();
            }
        };

        self.state.last_tick = Some(snapshot.tick);
        let position = bot.coord;
        debug!(position = %position, held = ?bot.held_item, "bot located");
        if query::near_edge(&arena, position) {
            debug!(position = %position, "bot is next to a wrapping edge");
        }

        let report = self.state.stall.observe(position);
        debug!(
            stuck_counter = report.stuck_counter,
            oscillation_counter = report.oscillation_counter,
            pattern = ?report.pattern,
            "stall check"
        );

        let mut tick = Tick {
            arena,
            bot,
            plan: None,
        };
        let decision = Rule::PRIORITY
            .into_iter()
            .find_map(|rule| {
                self.apply(rule, &mut tick).map(|command| Decision {
                    command,
                    rule: Some(rule),
                })
            })
            .unwrap_or_else(|| {
                debug!("no rule fired");
                self.fallback()
            });

        self.commit(&tick, decision);
        debug!(
            command = %decision.command,
            rule = ?decision.rule,
            history = ?self.state.stall.history().iter().collect::<Vec<_>>(),
            stuck_counter = self.state.stall.stuck_counter(),
            oscillation_counter = self.state.stall.oscillation_counter(),
            "tick decided"
        );
        decision
    }

    fn apply(&mut self, rule: Rule, tick: &mut Tick<'_>) -> Option<Command> {
        let position = tick.bot.coord;
        match rule {
            Rule::OscillationEscape => self.escape(StallTrigger::Oscillating, tick),
            Rule::StuckEscape => self.escape(StallTrigger::Stuck, tick),
            Rule::UseItem => {
                let item = tick.bot.held_item.as_ref()?;
                if !self.targeting.should_use_item(&tick.arena, position, item) {
                    debug!(item = %item, "holding item for later");
                    return None;
                }
                info!(item = %item, "using held item");
                Some(Command::UseItem)
            }
            Rule::FollowPath => {
                let (arena, plan) = tick.prepare(
                    &self.hazards,
                    &self.targeting,
                    self.state.last_known_power_up,
                );
                let target = plan.target?;
                let stall = StallState {
                    stuck_counter: self.state.stall.stuck_counter(),
                    oscillation_counter: self.state.stall.oscillation_counter(),
                };
                let path = self.movement.plan_path(
                    arena,
                    position,
                    target.coord,
                    PathConstraints {
                        hazards: &plan.hazards,
                        recent_positions: &self.state.recent_positions,
                        stall,
                    },
                );
                let direction = self.movement.first_step(arena.bounds(), &path)?;
                debug!(?direction, target = %target.coord, kind = ?target.kind, "following path");
                Some(direction.into())
            }
            Rule::GreedyStep => {
                let (arena, plan) = tick.prepare(
                    &self.hazards,
                    &self.targeting,
                    self.state.last_known_power_up,
                );
                let target = plan.target?;
                let step = self.movement.greedy_step(
                    arena,
                    position,
                    target.coord,
                    &plan.hazards,
                    self.state.stall.stuck_counter(),
                )?;
                debug!(direction = ?step.direction, improves = step.improves, "greedy step");
                Some(step.direction.into())
            }
        }
    }

    fn escape(&mut self, trigger: StallTrigger, tick: &Tick<'_>) -> Option<Command> {
        if !self.state.stall.pending_triggers().contains(&trigger) {
            return None;
        }

        let position = tick.bot.coord;
        let history = self.state.stall.history();
        let step = match trigger {
            StallTrigger::Oscillating => self.random_escape.plan(&tick.arena, position, history),
            StallTrigger::Stuck => emergency_escape(&tick.arena, position, history),
        };
        let Some(step) = step else {
            warn!(?trigger, "no escape move available");
            return None;
        };

        self.state.stall.acknowledge(trigger);
        Some(step.direction.into())
    }

    fn commit(&mut self, tick: &Tick<'_>, decision: Decision) {
        let untargeted = tick
            .plan
            .as_ref()
            .is_some_and(|plan| plan.target.is_none());
        if decision.rule.is_none() && untargeted {
            debug!("nothing to target, movement planning skipped");
            return;
        }

        if decision.rule == Some(Rule::UseItem) {
            self.state.power_ups_used = self.state.power_ups_used.saturating_add(1);
            info!(total = self.state.power_ups_used, "item activated");
        } else if decision.command.is_movement() {
            let position = tick.bot.coord;
            self.state.recent_positions.push(position);
            if let Some(power_up) = nearest_power_up(&tick.arena, position) {
                self.state.last_known_power_up = Some(power_up);
            }
        }
    }

    fn fallback(&self) -> Decision {
        Decision {
            command: self.default_command,
            rule: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn escapes_outrank_everything_else() {
        assert_eq!(Rule::PRIORITY[0], Rule::OscillationEscape);
        assert_eq!(Rule::PRIORITY[1], Rule::StuckEscape);
        assert_eq!(Rule::PRIORITY[4], Rule::GreedyStep);
    }

    #[test]
    fn new_engine_starts_empty() {
        let engine = Engine::new(AnimalId::new(Uuid::from_u128(7)));

        assert_eq!(engine.default_command(), Command::Right);
        assert_eq!(engine.state().power_ups_used(), 0);
        assert_eq!(engine.state().last_tick(), None);
        assert!(engine.state().recent_positions().is_empty());
        assert_eq!(engine.state().recent_positions().capacity(), 5);
    }

    #[test]
    fn retuning_resizes_the_histories() {
        let tuning = Tuning {
            recent_positions_capacity: 2,
            ..Tuning::default()
        };
        let engine = Engine::new(AnimalId::new(Uuid::from_u128(7))).with_tuning(tuning);

        assert_eq!(engine.state().recent_positions().capacity(), 2);
        assert_eq!(engine.tuning().recent_positions_capacity, 2);
    }
}
