use rand::Rng;
use std::ops::{Add, AddAssign, Mul, Sub};

/// Pixel footprint of one grid cell. One terminal cell maps to one grid cell.
pub(crate) const CELL_W: u32 = 10;
pub(crate) const CELL_H: u32 = 20;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Vec2 {
    pub(crate) x: f32,
    pub(crate) y: f32,
}

impl Vec2 {
    pub(crate) fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
    pub(crate) fn len(self) -> f32 {
        self.x.hypot(self.y)
    }
    pub(crate) fn dist(self, other: Vec2) -> f32 {
        (self - other).len()
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}
impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}
impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}
impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Rgb {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
}

impl Rgb {
    pub(crate) const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
    pub(crate) fn to_color(self) -> crossterm::style::Color {
        crossterm::style::Color::Rgb {
            r: self.r,
            g: self.g,
            b: self.b,
        }
    }
}

/// Grid layout derived from the surface size in pixels. Recomputed every tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Grid {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) cols: u32,
    pub(crate) rows: u32,
}

impl Grid {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cols: width / CELL_W,
            rows: height / CELL_H,
        }
    }

    pub(crate) fn cell_center(&self, col: u32, row: u32) -> Vec2 {
        Vec2::new(
            (col * CELL_W + CELL_W / 2) as f32,
            (row * CELL_H + CELL_H / 2) as f32,
        )
    }

    pub(crate) fn cell_of(&self, p: Vec2) -> Option<(u32, u32)> {
        if p.x < 0.0 || p.y < 0.0 {
            return None;
        }
        let col = (p.x / CELL_W as f32) as u32;
        let row = (p.y / CELL_H as f32) as u32;
        if col < self.cols && row < self.rows {
            Some((col, row))
        } else {
            None
        }
    }

    pub(crate) fn center(&self) -> Vec2 {
        Vec2::new((self.width / 2) as f32, (self.height / 2) as f32)
    }

    /// Sources expanding past this radius can no longer touch the grid.
    pub(crate) fn bound_radius(&self) -> f32 {
        self.width.max(self.height) as f32 * 1.5
    }

    /// Uniform pick over all cell centres; `None` on an empty grid.
    pub(crate) fn random_cell_center<R: Rng>(&self, rng: &mut R) -> Option<Vec2> {
        if self.cols == 0 || self.rows == 0 {
            return None;
        }
        let col = rng.gen_range(0..self.cols);
        let row = rng.gen_range(0..self.rows);
        Some(self.cell_center(col, row))
    }
}
