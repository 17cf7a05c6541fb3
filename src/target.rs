use crate::model::{Grid, Vec2};
use rand::Rng;
use tracing::debug;

/// Seconds between wander waypoints.
pub(crate) const WAYPOINT_INTERVAL: f32 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Mode {
    FollowPointer,
    Wander,
}

impl Mode {
    pub(crate) fn toggled(self) -> Self {
        match self {
            Mode::FollowPointer => Mode::Wander,
            Mode::Wander => Mode::FollowPointer,
        }
    }
    pub(crate) fn name(self) -> &'static str {
        match self {
            Mode::FollowPointer => "follow",
            Mode::Wander => "wander",
        }
    }
}

/// Decides what the head of the body chases this tick.
#[derive(Clone, Debug)]
pub(crate) struct TargetController {
    mode: Mode,
    waypoint: Option<Vec2>,
    last_generated: f32,
    interval: f32,
}

impl Default for TargetController {
    fn default() -> Self {
        Self::new(WAYPOINT_INTERVAL)
    }
}

impl TargetController {
    pub(crate) fn new(interval: f32) -> Self {
        Self {
            mode: Mode::FollowPointer,
            waypoint: None,
            last_generated: 0.0,
            interval,
        }
    }

    pub(crate) fn mode(&self) -> Mode {
        self.mode
    }

    #[cfg(test)]
    pub(crate) fn waypoint(&self) -> Option<Vec2> {
        self.waypoint
    }

    #[cfg(test)]
    pub(crate) fn last_generated(&self) -> f32 {
        self.last_generated
    }

    /// Flip between following the pointer and wandering. Entering wander
    /// back-dates the generation time so the next resolve picks a new point.
    pub(crate) fn toggle(&mut self, now: f32) -> Mode {
        self.mode = self.mode.toggled();
        self.waypoint = None;
        if self.mode == Mode::Wander {
            self.last_generated = now - self.interval;
        }
        debug!(mode = self.mode.name(), "target mode toggled");
        self.mode
    }

    pub(crate) fn resolve<R: Rng>(
        &mut self,
        now: f32,
        pointer: Vec2,
        grid: &Grid,
        rng: &mut R,
    ) -> Option<Vec2> {
        match self.mode {
            Mode::FollowPointer => Some(pointer),
            Mode::Wander => {
                let stale = now - self.last_generated >= self.interval;
                if self.waypoint.is_none() || stale {
                    if let Some(p) = grid.random_cell_center(rng) {
                        debug!(x = p.x, y = p.y, "new waypoint");
                        self.waypoint = Some(p);
                        self.last_generated = now;
                    }
                }
                self.waypoint
            }
        }
    }
}
