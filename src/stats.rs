use crate::geometry::Zone;
use crate::util::{mean, std_dev};

/// One resolved click. Append-only; never mutated after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct ShotRecord {
    /// Session-clock timestamp of the click, ms.
    pub timestamp: f64,
    /// Time since the previous hit, ms. 0 for the first hit of a session.
    pub reaction_ms: f64,
    pub zone: Zone,
    pub score: u32,
    /// Cursor path efficiency at the moment of the hit, 0..=100.
    pub linearity: f64,
    pub target_id: u64,
}

/// The running session ledger. Owned by the engine and mutated only through
/// the record methods; everything else is derived on demand.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameStats {
    pub shots: Vec<ShotRecord>,
    pub total_clicks: u32,
    pub hits: u32,
    pub misses: u32,
    pub score: u32,
    pub start_time: Option<f64>,
    pub end_time: Option<f64>,
}

impl GameStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn started(now_ms: f64) -> Self {
        Self {
            start_time: Some(now_ms),
            ..Self::default()
        }
    }

    /// Stamp the end of the session. Idempotent; the first stamp wins.
    pub fn finalize(&mut self, now_ms: f64) {
        if self.end_time.is_none() {
            self.end_time = Some(now_ms);
        }
    }

    pub fn record_hit(&mut self, shot: ShotRecord) {
        self.total_clicks += 1;
        self.hits += 1;
        self.score += shot.score;
        self.shots.push(shot);
    }

    pub fn record_miss(&mut self) {
        self.total_clicks += 1;
        self.misses += 1;
    }

    /// Hit percentage over all clicks; 0 before the first click.
    pub fn accuracy(&self) -> f64 {
        if self.total_clicks == 0 {
            return 0.0;
        }
        self.hits as f64 / self.total_clicks as f64 * 100.0
    }

    fn reaction_samples(&self) -> Vec<f64> {
        // the first hit has no predecessor, so its reaction time is excluded
        self.shots.iter().skip(1).map(|s| s.reaction_ms).collect()
    }

    pub fn avg_reaction_ms(&self) -> Option<f64> {
        mean(&self.reaction_samples())
    }

    pub fn best_reaction_ms(&self) -> Option<f64> {
        self.reaction_samples()
            .into_iter()
            .min_by(|a, b| a.total_cmp(b))
    }

    /// Spread of reaction times; a consistency measure for the results screen.
    pub fn reaction_std_dev(&self) -> Option<f64> {
        std_dev(&self.reaction_samples())
    }

    pub fn avg_linearity(&self) -> Option<f64> {
        mean(&self.shots.iter().map(|s| s.linearity).collect::<Vec<_>>())
    }

    /// Hit counts per scoring zone: [outer, middle, inner].
    pub fn zone_hits(&self) -> [u32; 3] {
        let mut counts = [0u32; 3];
        for shot in &self.shots {
            match shot.zone {
                Zone::Outer => counts[0] += 1,
                Zone::Middle => counts[1] += 1,
                Zone::Inner => counts[2] += 1,
                Zone::Miss => {}
            }
        }
        counts
    }

    pub fn elapsed_secs(&self) -> f64 {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => (end - start) / 1000.0,
            _ => 0.0,
        }
    }

    pub fn hits_per_sec(&self) -> f64 {
        let elapsed = self.elapsed_secs();
        if elapsed > 0.0 {
            self.hits as f64 / elapsed
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    SPlus,
    S,
    A,
    B,
    C,
    D,
}

impl Grade {
    pub fn letter(self) -> &'static str {
        match self {
            Grade::SPlus => "S+",
            Grade::S => "S",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Grade::SPlus => "LEGENDARY",
            Grade::S => "EXCELLENT",
            Grade::A => "GREAT",
            Grade::B => "GOOD",
            Grade::C => "DECENT",
            Grade::D => "KEEP PRACTICING",
        }
    }
}

/// Letter grade for a finished session, from final score and accuracy.
pub fn rating(stats: &GameStats) -> Grade {
    let score = stats.score;
    let accuracy = stats.accuracy().round();
    if score >= 100 && accuracy >= 90.0 {
        Grade::SPlus
    } else if score >= 70 && accuracy >= 80.0 {
        Grade::S
    } else if score >= 50 && accuracy >= 70.0 {
        Grade::A
    } else if score >= 30 && accuracy >= 60.0 {
        Grade::B
    } else if score >= 15 && accuracy >= 40.0 {
        Grade::C
    } else {
        Grade::D
    }
}
