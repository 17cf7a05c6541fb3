use crate::chain::ChainBody;
use crate::config::Settings;
use crate::glyph;
use crate::model::{Grid, Rgb, Vec2};
use crate::target::{Mode, TargetController};
use crate::wave::{RippleParams, WaveField};
use rand::rngs::StdRng;
use tracing::debug;

const CURSOR_GLYPH: char = '◓';
const CURSOR_COLOR: Rgb = Rgb::new(255, 0, 0);

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct DrawCommand {
    /// pixel centre of the cell
    pub(crate) at: Vec2,
    pub(crate) glyph: char,
    pub(crate) color: Rgb,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Frame {
    pub(crate) commands: Vec<DrawCommand>,
}

impl Frame {
    #[cfg(test)]
    pub(crate) fn at(&self, p: Vec2) -> Option<&DrawCommand> {
        self.commands.iter().find(|c| c.at == p)
    }
}

struct Fish {
    body: ChainBody,
    target: TargetController,
    hit_radius: f32,
    color: Rgb,
}

/// Whole simulation state. The host feeds it clicks, pointer moves and ticks.
pub(crate) struct Simulation {
    field: WaveField,
    fish: Option<Fish>,
    ripple: RippleParams,
    pointer: Vec2,
    show_cursor: bool,
    rng: StdRng,
}

impl Simulation {
    pub(crate) fn new(settings: &Settings, grid: Grid, rng: StdRng) -> Self {
        let fish = settings.fish.enabled.then(|| Fish {
            body: ChainBody::new(
                settings.fish.segments,
                settings.fish.segment_length,
                grid.center(),
            ),
            target: TargetController::new(settings.fish.waypoint_interval),
            hit_radius: settings.fish.hit_radius,
            color: settings.fish_color(),
        });
        Self {
            field: WaveField::new(),
            fish,
            ripple: settings.ripple,
            pointer: grid.center(),
            show_cursor: settings.show_cursor,
            rng,
        }
    }

    pub(crate) fn set_pointer(&mut self, p: Vec2) {
        self.pointer = p;
    }

    pub(crate) fn mode(&self) -> Option<Mode> {
        self.fish.as_ref().map(|f| f.target.mode())
    }

    pub(crate) fn ripple_count(&self) -> usize {
        self.field.len()
    }

    #[cfg(test)]
    pub(crate) fn body(&self) -> Option<&ChainBody> {
        self.fish.as_ref().map(|f| &f.body)
    }

    /// Drop a ripple at `p` and flip the fish between follow and wander.
    pub(crate) fn click(&mut self, p: Vec2, now: f32) {
        self.field.add(p, self.ripple, now);
        debug!(x = p.x, y = p.y, ripples = self.field.len(), "ripple added");
        self.toggle_mode(now);
    }

    pub(crate) fn toggle_mode(&mut self, now: f32) {
        if let Some(fish) = self.fish.as_mut() {
            fish.target.toggle(now);
        }
    }

    pub(crate) fn clear_ripples(&mut self) {
        self.field.clear();
    }

    /// Advance one tick and compose the frame for `grid`.
    pub(crate) fn step(&mut self, now: f32, grid: Grid) -> Frame {
        if let Some(fish) = self.fish.as_mut() {
            let target = fish.target.resolve(now, self.pointer, &grid, &mut self.rng);
            if let Some(t) = target {
                fish.body.advance(t);
            }
        }

        let pruned = self.field.prune(now, grid.bound_radius());
        if pruned > 0 {
            debug!(pruned, left = self.field.len(), "ripples expired");
        }

        self.render(now, grid)
    }

    fn cursor_cell(&self, grid: &Grid) -> Option<(u32, u32)> {
        let fish = self.fish.as_ref()?;
        if !self.show_cursor || fish.target.mode() != Mode::FollowPointer {
            return None;
        }
        grid.cell_of(self.pointer)
    }

    /// Per cell: body first, then the pointer marker, then the wave field.
    fn render(&self, now: f32, grid: Grid) -> Frame {
        let cursor = self.cursor_cell(&grid);
        let mut commands = Vec::new();

        for col in 0..grid.cols {
            for row in 0..grid.rows {
                let at = grid.cell_center(col, row);

                if let Some(fish) = &self.fish {
                    if let Some(glyph) = fish.body.occlusion_at(at, fish.hit_radius) {
                        commands.push(DrawCommand {
                            at,
                            glyph,
                            color: fish.color,
                        });
                        continue;
                    }
                }

                if cursor == Some((col, row)) {
                    commands.push(DrawCommand {
                        at,
                        glyph: CURSOR_GLYPH,
                        color: CURSOR_COLOR,
                    });
                    continue;
                }

                if self.field.is_empty() {
                    continue;
                }
                let amplitude = self.field.amplitude_at(at, now);
                if let Some((glyph, color)) = glyph::map(amplitude) {
                    commands.push(DrawCommand { at, glyph, color });
                }
            }
        }

        Frame { commands }
    }
}
