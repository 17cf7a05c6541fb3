use crate::model::Rgb;
use crate::target::WAYPOINT_INTERVAL;
use crate::wave::RippleParams;
use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Parser, Debug)]
#[command(name = "ripplefish")]
#[command(about = "Click the terminal to drop ripples; a fish chases the mouse", long_about = None)]
pub(crate) struct Args {
    /// ms per frame (lower = faster)
    #[arg(long)]
    pub(crate) ms: Option<u64>,

    /// JSON settings file; flags below override it
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,

    /// number of body segments
    #[arg(long)]
    pub(crate) segments: Option<usize>,

    /// rest distance between segments, in pixels
    #[arg(long)]
    pub(crate) segment_length: Option<f32>,

    /// ripples only, no fish
    #[arg(long, default_value_t = false)]
    pub(crate) no_fish: bool,

    /// hide the pointer marker in follow mode
    #[arg(long, default_value_t = false)]
    pub(crate) no_cursor: bool,

    /// start with the HUD hidden
    #[arg(long, default_value_t = false)]
    pub(crate) no_hud: bool,

    /// RNG seed for wander waypoints
    #[arg(long)]
    pub(crate) seed: Option<u64>,

    /// write tracing output here (the terminal itself is taken)
    #[arg(long)]
    pub(crate) log_file: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct FishSettings {
    pub(crate) enabled: bool,
    pub(crate) segments: usize,
    pub(crate) segment_length: f32,
    pub(crate) hit_radius: f32,
    pub(crate) waypoint_interval: f32,
    pub(crate) color: [u8; 3],
}

impl Default for FishSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            segments: 10,
            segment_length: 15.0,
            hit_radius: 10.0,
            waypoint_interval: WAYPOINT_INTERVAL,
            color: [0x66, 0x99, 0xCC],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub(crate) tick_ms: u64,
    pub(crate) ripple: RippleParams,
    pub(crate) fish: FishSettings,
    pub(crate) show_cursor: bool,
    pub(crate) show_hud: bool,
    pub(crate) background: [u8; 3],
    pub(crate) seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_ms: 30,
            ripple: RippleParams::default(),
            fish: FishSettings::default(),
            show_cursor: true,
            show_hud: true,
            background: [0xAD, 0xD8, 0xE6],
            seed: None,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub(crate) enum ConfigError {
    #[error("{field} must be positive and finite (got {value})")]
    NotPositive { field: &'static str, value: f32 },
    #[error("fish needs at least 2 segments (got {0})")]
    TooFewSegments(usize),
    #[error("tick_ms must be within 10..=250 (got {0})")]
    TickOutOfRange(u64),
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

impl Settings {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !(10..=250).contains(&self.tick_ms) {
            return Err(ConfigError::TickOutOfRange(self.tick_ms));
        }
        positive("ripple.speed", self.ripple.speed)?;
        positive("ripple.wavelength", self.ripple.wavelength)?;
        positive("ripple.thickness", self.ripple.thickness)?;
        if self.fish.enabled {
            if self.fish.segments < 2 {
                return Err(ConfigError::TooFewSegments(self.fish.segments));
            }
            positive("fish.segment_length", self.fish.segment_length)?;
            positive("fish.hit_radius", self.fish.hit_radius)?;
            positive("fish.waypoint_interval", self.fish.waypoint_interval)?;
        }
        Ok(())
    }

    pub(crate) fn apply_args(&mut self, args: &Args) {
        if let Some(ms) = args.ms {
            self.tick_ms = ms;
        }
        if let Some(n) = args.segments {
            self.fish.segments = n;
        }
        if let Some(l) = args.segment_length {
            self.fish.segment_length = l;
        }
        if args.no_fish {
            self.fish.enabled = false;
        }
        if args.no_cursor {
            self.show_cursor = false;
        }
        if args.no_hud {
            self.show_hud = false;
        }
        if args.seed.is_some() {
            self.seed = args.seed;
        }
    }

    pub(crate) fn background(&self) -> Rgb {
        let [r, g, b] = self.background;
        Rgb::new(r, g, b)
    }

    pub(crate) fn fish_color(&self) -> Rgb {
        let [r, g, b] = self.fish.color;
        Rgb::new(r, g, b)
    }
}

pub(crate) fn load_settings(path: &Path) -> Result<Settings> {
    let s = fs::read_to_string(path)
        .with_context(|| format!("could not read settings file {}", path.display()))?;
    let v = serde_json::from_str::<Settings>(&s)
        .with_context(|| format!("invalid settings in {}", path.display()))?;
    Ok(v)
}

/// File (if any), then flags, then validation.
pub(crate) fn resolve_settings(args: &Args) -> Result<Settings> {
    let mut settings = match &args.config {
        Some(path) => load_settings(path)?,
        None => Settings::default(),
    };
    settings.apply_args(args);
    settings.validate()?;
    Ok(settings)
}
