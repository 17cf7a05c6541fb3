use crate::model::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct RippleParams {
    /// pixels per second
    pub(crate) speed: f32,
    pub(crate) wavelength: f32,
    /// radial band around the wavefront that contributes amplitude
    pub(crate) thickness: f32,
    pub(crate) height: f32,
}

impl Default for RippleParams {
    fn default() -> Self {
        Self {
            speed: 100.0,
            wavelength: 50.0,
            thickness: 50.0,
            height: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct WaveSource {
    pub(crate) origin: Vec2,
    pub(crate) born: f32,
    pub(crate) params: RippleParams,
}

impl WaveSource {
    /// Seconds since the click, never negative.
    fn age(&self, now: f32) -> f32 {
        (now - self.born).max(0.0)
    }

    fn radius(&self, now: f32) -> f32 {
        self.params.speed * self.age(now)
    }

    /// Damped cosine contribution, zero outside the expanding wavefront band.
    pub(crate) fn contribution(&self, p: Vec2, now: f32) -> f32 {
        let elapsed = self.age(now);
        let offset = p.dist(self.origin) - self.params.speed * elapsed;
        if offset.abs() >= self.params.thickness {
            return 0.0;
        }
        let phase = offset * TAU / self.params.wavelength;
        self.params.height * phase.cos() / (1.0 + elapsed)
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct WaveField {
    sources: Vec<WaveSource>,
}

impl WaveField {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&mut self, origin: Vec2, params: RippleParams, now: f32) {
        self.sources.push(WaveSource {
            origin,
            born: now,
            params,
        });
    }

    pub(crate) fn amplitude_at(&self, p: Vec2, now: f32) -> f32 {
        self.sources.iter().map(|s| s.contribution(p, now)).sum()
    }

    /// Drops sources whose radius reached `bound`. Returns how many were removed.
    pub(crate) fn prune(&mut self, now: f32, bound: f32) -> usize {
        let before = self.sources.len();
        self.sources.retain(|s| s.radius(now) < bound);
        before - self.sources.len()
    }

    pub(crate) fn clear(&mut self) {
        self.sources.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.sources.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
