use rand::Rng;

use crate::geometry;
use crate::settings::{GameMode, GameSettings};

/// Keep-out distance from every viewport edge, in pixels.
pub const MARGIN: f64 = 20.0;
/// Top-left rectangle reserved for the live-stats HUD.
pub const HUD_RESERVED_W: f64 = 280.0;
pub const HUD_RESERVED_H: f64 = 160.0;
const MAX_PLACEMENT_TRIES: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// A live hit object. Position is the top-left corner of the target's
/// bounding box, in viewport pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    /// Base diameter in pixels.
    pub size: f64,
    /// Spawn timestamp, ms on the session clock.
    pub created_at: f64,
    pub shrinking: bool,
    pub shrink_duration: Option<f64>,
}

impl Target {
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.size / 2.0, self.y + self.size / 2.0)
    }

    pub fn age_ms(&self, now_ms: f64) -> f64 {
        now_ms - self.created_at
    }

    /// Current rendered diameter, after shrink.
    pub fn effective_size(&self, now_ms: f64) -> f64 {
        match (self.shrinking, self.shrink_duration) {
            (true, Some(duration)) => {
                self.size * geometry::shrink_progress(now_ms, self.created_at, duration)
            }
            _ => self.size,
        }
    }

    /// Zone a click at `(x, y)` lands in, against the current rendered size.
    pub fn classify_click(&self, x: f64, y: f64, now_ms: f64) -> geometry::Zone {
        let dist = geometry::distance(self.center(), (x, y));
        geometry::classify(dist, self.effective_size(now_ms))
    }
}

/// Produces target placements. Owns the per-session monotonic id sequence,
/// reset on every session start so ids never leak across sessions.
#[derive(Debug, Default)]
pub struct Spawner {
    next_id: u64,
}

impl Spawner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.next_id = 0;
    }

    /// Place one target uniformly inside the viewport minus the edge margin.
    ///
    /// Placement retries up to 50 times to keep clear of the HUD rectangle in
    /// the top-left; past that the last sample is accepted as-is. Best-effort
    /// avoidance, not a guarantee.
    pub fn spawn<R: Rng>(
        &mut self,
        settings: &GameSettings,
        viewport: Viewport,
        now_ms: f64,
        rng: &mut R,
    ) -> Target {
        let size = if settings.mode == GameMode::Precision {
            settings.target_size * 1.3
        } else {
            settings.target_size
        };

        let span_x = (viewport.width - size - MARGIN * 2.0).max(0.0);
        let span_y = (viewport.height - size - MARGIN * 2.0).max(0.0);

        let mut x;
        let mut y;
        let mut tries = 0;
        loop {
            x = MARGIN + rng.gen::<f64>() * span_x;
            y = MARGIN + rng.gen::<f64>() * span_y;
            tries += 1;
            let in_hud = x < HUD_RESERVED_W + MARGIN && y < HUD_RESERVED_H + MARGIN;
            if tries >= MAX_PLACEMENT_TRIES || !in_hud {
                break;
            }
        }

        self.next_id += 1;
        Target {
            id: self.next_id,
            x,
            y,
            size,
            created_at: now_ms,
            shrinking: settings.shrink_targets || settings.mode == GameMode::Precision,
            shrink_duration: Some(settings.mode.shrink_duration_ms()),
        }
    }
}
