use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::geometry::{self, Zone};
use crate::runtime::Clock;
use crate::settings::{GameMode, GameSettings};
use crate::spawner::{Spawner, Target, Viewport};
use crate::stats::{GameStats, ShotRecord};

/// Cadence the countdown expects to be polled at.
pub const COUNTDOWN_TICK_MS: u64 = 100;
/// Cadence of the tracking-mode target cycler.
const CYCLE_INTERVAL_MS: f64 = 200.0;
/// Default lifetime for cycled targets that carry no shrink duration.
const DEFAULT_CYCLE_LIFETIME_MS: f64 = 1500.0;

/// Mouse-path buffer cap; on overflow the oldest samples are dropped in one
/// block down to `PATH_KEEP` to bound reallocation cost.
const PATH_CAP: usize = 500;
const PATH_KEEP: usize = 400;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Menu,
    Playing,
    Results,
}

/// Read-only view handed to the presentation layer once per render.
#[derive(Debug)]
pub struct Snapshot<'a> {
    pub phase: Phase,
    pub targets: &'a [Target],
    pub stats: &'a GameStats,
    pub time_left_secs: u64,
    pub settings: &'a GameSettings,
    pub mouse_path: &'a [(f64, f64)],
    pub path_start: Option<(f64, f64)>,
}

/// The session state machine: menu -> playing -> results. Owns every piece of
/// mutable session state; input events and timer ticks are dispatched into it
/// synchronously and out-of-phase commands are silent no-ops.
pub struct Engine<C: Clock> {
    phase: Phase,
    settings: GameSettings,
    viewport: Viewport,
    targets: Vec<Target>,
    stats: GameStats,
    spawner: Spawner,
    time_left_secs: u64,
    /// Absolute countdown deadline on the session clock; `None` whenever the
    /// session is not playing, which is what makes cancellation idempotent.
    deadline_ms: Option<f64>,
    /// Next due time of the tracking-mode cycler; `None` outside tracking play.
    next_cycle_ms: Option<f64>,
    last_hit_ms: Option<f64>,
    mouse_path: Vec<(f64, f64)>,
    path_start: Option<(f64, f64)>,
    clock: C,
    rng: StdRng,
}

impl<C: Clock> Engine<C> {
    pub fn new(clock: C, viewport: Viewport) -> Self {
        Self::with_rng(clock, viewport, StdRng::from_entropy())
    }

    /// Deterministic target placement for tests and replayable drills.
    pub fn with_seed(clock: C, viewport: Viewport, seed: u64) -> Self {
        Self::with_rng(clock, viewport, StdRng::seed_from_u64(seed))
    }

    fn with_rng(clock: C, viewport: Viewport, rng: StdRng) -> Self {
        Self {
            phase: Phase::Menu,
            settings: GameSettings::default(),
            viewport,
            targets: Vec::new(),
            stats: GameStats::new(),
            spawner: Spawner::new(),
            time_left_secs: 0,
            deadline_ms: None,
            next_cycle_ms: None,
            last_hit_ms: None,
            mouse_path: Vec::new(),
            path_start: None,
            clock,
            rng,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    pub fn time_left_secs(&self) -> u64 {
        self.time_left_secs
    }

    pub fn mouse_path(&self) -> &[(f64, f64)] {
        &self.mouse_path
    }

    pub fn path_start(&self) -> Option<(f64, f64)> {
        self.path_start
    }

    pub fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            phase: self.phase,
            targets: &self.targets,
            stats: &self.stats,
            time_left_secs: self.time_left_secs,
            settings: &self.settings,
            mouse_path: &self.mouse_path,
            path_start: self.path_start,
        }
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = Viewport::new(width, height);
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Begin a session. Valid from menu or results; malformed settings
    /// (zero duration or size) are ignored per the caller contract.
    ///
    /// Every piece of mutable session state is reset here, before any tick or
    /// input for the new session can be observed.
    pub fn start(&mut self, settings: GameSettings) {
        if self.phase == Phase::Playing || !settings.is_valid() {
            return;
        }
        let now = self.clock.now_ms();

        self.settings = settings;
        self.spawner.reset();
        self.stats = GameStats::started(now);
        self.last_hit_ms = None;
        self.mouse_path.clear();
        self.path_start = None;
        self.time_left_secs = settings.duration_secs;

        self.targets.clear();
        for _ in 0..settings.required_targets() {
            self.spawn_target(now);
        }

        self.deadline_ms = Some(now + settings.duration_secs as f64 * 1000.0);
        self.next_cycle_ms = if settings.mode == GameMode::Tracking {
            Some(now + CYCLE_INTERVAL_MS)
        } else {
            None
        };
        self.phase = Phase::Playing;
    }

    /// Finish the session: stop both timers, stamp the end time, drop live
    /// targets and the path buffer. Playing -> results only.
    pub fn end(&mut self) {
        if self.phase != Phase::Playing {
            return;
        }
        self.deadline_ms = None;
        self.next_cycle_ms = None;
        self.stats.finalize(self.clock.now_ms());
        self.targets.clear();
        self.mouse_path.clear();
        self.path_start = None;
        self.phase = Phase::Results;
    }

    /// Abandon the session or leave the results screen. Stats reset to an
    /// empty ledger.
    pub fn reset_to_menu(&mut self) {
        if self.phase == Phase::Menu {
            return;
        }
        self.deadline_ms = None;
        self.next_cycle_ms = None;
        self.targets.clear();
        self.mouse_path.clear();
        self.path_start = None;
        self.stats = GameStats::new();
        self.phase = Phase::Menu;
    }

    /// A click resolved onto a target. The caller classifies the zone against
    /// the target's current rendered size; a `Miss` routed here is forwarded
    /// to [`Engine::on_miss`].
    pub fn on_target_hit(&mut self, target_id: u64, zone: Zone, click_x: f64, click_y: f64) {
        if self.phase != Phase::Playing {
            return;
        }
        if zone == Zone::Miss {
            self.on_miss();
            return;
        }
        let now = self.clock.now_ms();

        let reaction_ms = self.last_hit_ms.map_or(0.0, |last| now - last);
        self.last_hit_ms = Some(now);

        let linearity = geometry::path_linearity(&self.mouse_path, self.path_start);
        self.stats.record_hit(ShotRecord {
            timestamp: now,
            reaction_ms,
            zone,
            score: zone.score(),
            linearity,
            target_id,
        });

        // the next path segment is measured from the hit point
        self.path_start = Some((click_x, click_y));
        self.mouse_path.clear();
        self.mouse_path.push((click_x, click_y));

        self.targets.retain(|t| t.id != target_id);
        let needed = self.settings.required_targets();
        while self.targets.len() < needed {
            self.spawn_target(now);
        }
    }

    /// A click that resolved onto empty arena.
    pub fn on_miss(&mut self) {
        if self.phase != Phase::Playing {
            return;
        }
        self.stats.record_miss();
    }

    /// Cursor sample. Gated on phase here rather than at the caller, so stray
    /// events outside play never pollute the next session's path.
    pub fn on_pointer_move(&mut self, x: f64, y: f64) {
        if self.phase != Phase::Playing {
            return;
        }
        if self.mouse_path.len() > PATH_CAP {
            let excess = self.mouse_path.len() - PATH_KEEP;
            self.mouse_path.drain(..excess);
        }
        self.mouse_path.push((x, y));
    }

    /// Timer tick. Updates the countdown and, in tracking mode, runs the
    /// target cycler once its cadence comes due. No-op outside play, so a
    /// tick that races a transition can never resurrect a finished session.
    pub fn on_tick(&mut self) {
        if self.phase != Phase::Playing {
            return;
        }
        let now = self.clock.now_ms();

        if let Some(deadline) = self.deadline_ms {
            let remaining = ((deadline - now) / 1000.0).ceil().max(0.0) as u64;
            self.time_left_secs = remaining;
            if remaining == 0 {
                self.end();
                return;
            }
        }

        if let Some(due) = self.next_cycle_ms {
            if now >= due {
                self.cycle_targets(now);
                self.next_cycle_ms = Some(now + CYCLE_INTERVAL_MS);
            }
        }
    }

    /// Whack-a-mole cadence for tracking mode: expire targets past their
    /// lifetime and keep exactly one on screen, independent of hits.
    fn cycle_targets(&mut self, now: f64) {
        self.targets.retain(|t| {
            t.age_ms(now) < t.shrink_duration.unwrap_or(DEFAULT_CYCLE_LIFETIME_MS)
        });
        if self.targets.is_empty() {
            self.spawn_target(now);
        }
    }

    fn spawn_target(&mut self, now: f64) {
        let target = self
            .spawner
            .spawn(&self.settings, self.viewport, now, &mut self.rng);
        self.targets.push(target);
    }
}
