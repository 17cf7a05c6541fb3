use crate::model::Rgb;

/// Below this magnitude a cell is left as background.
pub(crate) const VISIBILITY_THRESHOLD: f32 = 0.01;

const RIPPLE_GLYPHS: [char; 10] = ['-', '∘', '◦', '•', '○', '◎', '◍', '●', '◉', '⬤'];
const BODY_GLYPHS: [char; 5] = [' ', '░', '▒', '▓', '█'];

const WAVE_BLUE: u8 = 220;
const WAVE_MIN: f32 = 127.0;
const WAVE_MAX: f32 = 255.0;

/// Symbol tables, emptiest to densest. Wave cells and body cells never share one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Ramp {
    Ripple,
    Body,
}

impl Ramp {
    pub(crate) fn glyphs(self) -> &'static [char] {
        match self {
            Ramp::Ripple => &RIPPLE_GLYPHS,
            Ramp::Body => &BODY_GLYPHS,
        }
    }

    pub(crate) fn len(self) -> usize {
        self.glyphs().len()
    }

    /// Out-of-range indices clamp to the densest glyph.
    pub(crate) fn glyph(self, index: usize) -> char {
        let g = self.glyphs();
        g[index.min(g.len() - 1)]
    }
}

/// tanh squashes the amplitude into 0..1 before picking a ramp slot.
pub(crate) fn ripple_index(amplitude: f32) -> usize {
    let k = Ramp::Ripple.len();
    let n = (amplitude.tanh() + 1.0) / 2.0;
    // NaN and negatives saturate to 0 on the cast
    let idx = (n * (k - 1) as f32).floor() as usize;
    idx.min(k - 1)
}

/// Colour follows the raw amplitude linearly, not the squashed one.
pub(crate) fn amplitude_color(amplitude: f32) -> Rgb {
    let v = ((amplitude + 1.0) / 2.0 * 255.0).round();
    let v = if v.is_nan() {
        WAVE_MIN
    } else {
        v.clamp(WAVE_MIN, WAVE_MAX)
    };
    let v = v as u8;
    Rgb::new(v, v, WAVE_BLUE)
}

/// `None` means the cell stays background.
pub(crate) fn map(amplitude: f32) -> Option<(char, Rgb)> {
    if amplitude.abs() < VISIBILITY_THRESHOLD || amplitude.is_nan() {
        return None;
    }
    let ch = Ramp::Ripple.glyph(ripple_index(amplitude));
    Some((ch, amplitude_color(amplitude)))
}
