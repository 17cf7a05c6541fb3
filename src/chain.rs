use crate::glyph::Ramp;
use crate::model::Vec2;

/// Follow-the-leader body. Segment 0 is the head.
#[derive(Clone, Debug)]
pub(crate) struct ChainBody {
    segments: Vec<Vec2>,
    sizes: Vec<usize>,
    segment_length: f32,
}

/// Body thickness per segment: thin at both ends, widest in the middle.
pub(crate) fn size_ramp(n: usize, k: usize) -> Vec<usize> {
    let half = n.saturating_sub(1) as f32 / 2.0;
    if half <= 0.0 || k == 0 {
        return vec![0; n];
    }
    let top = (k - 1) as f32;
    (0..n)
        .map(|i| {
            let i = i as f32;
            let along = if i <= half { i } else { (n - 1) as f32 - i };
            (along / half * top) as usize
        })
        .collect()
}

impl ChainBody {
    /// All segments start collapsed onto `at`.
    pub(crate) fn new(n: usize, segment_length: f32, at: Vec2) -> Self {
        Self {
            segments: vec![at; n],
            sizes: size_ramp(n, Ramp::Body.len()),
            segment_length,
        }
    }

    #[cfg(test)]
    pub(crate) fn segments(&self) -> &[Vec2] {
        &self.segments
    }

    #[cfg(test)]
    pub(crate) fn head(&self) -> Option<Vec2> {
        self.segments.first().copied()
    }

    /// One tick: the head steps toward `target` by at most one segment length,
    /// then a single relaxation pass pulls each segment toward its predecessor.
    /// The pass is not iterated, so the body trails and settles over later ticks.
    pub(crate) fn advance(&mut self, target: Vec2) {
        let l = self.segment_length;
        let Some(head) = self.segments.first_mut() else {
            return;
        };

        let to_target = target - *head;
        let d = to_target.len();
        if d <= l {
            *head = target;
        } else {
            *head += Vec2::new(to_target.x / d * l, to_target.y / d * l);
        }

        for i in 1..self.segments.len() {
            let prev = self.segments[i - 1];
            let cur = self.segments[i];
            let v = prev - cur;
            let d = v.len();
            if d > 0.0 {
                self.segments[i] = cur + v * ((d - l) / d);
            }
        }
    }

    /// Body glyph of the first segment (head to tail) within `hit_radius` of `p`.
    pub(crate) fn occlusion_at(&self, p: Vec2, hit_radius: f32) -> Option<char> {
        self.segments
            .iter()
            .zip(&self.sizes)
            .find(|(s, _)| s.dist(p) < hit_radius)
            .map(|(_, &size)| Ramp::Body.glyph(size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn link_lengths(c: &ChainBody) -> Vec<f32> {
        c.segments().windows(2).map(|w| w[0].dist(w[1])).collect()
    }

    #[test]
    fn ten_segment_ramp_tapers_both_ways() {
        assert_eq!(size_ramp(10, 5), vec![0, 0, 1, 2, 3, 3, 2, 1, 0, 0]);
        assert_eq!(size_ramp(5, 5), vec![0, 2, 4, 2, 0]);
        assert_eq!(size_ramp(1, 5), vec![0]);
    }

    #[test]
    fn head_never_overshoots_or_exceeds_segment_length() {
        let mut c = ChainBody::new(10, 15.0, Vec2::new(400.0, 300.0));
        let target = Vec2::new(10.0, 20.0);
        for _ in 0..100 {
            let before = c.head().unwrap();
            c.advance(target);
            let after = c.head().unwrap();
            assert!(before.dist(after) <= 15.0 + 1e-3);
            assert!(after.dist(target) <= before.dist(target) + 1e-3);
        }
        assert!(c.head().unwrap().dist(target) < 1e-3);
    }

    #[test]
    fn short_hop_lands_on_target() {
        let mut c = ChainBody::new(3, 15.0, Vec2::new(0.0, 0.0));
        c.advance(Vec2::new(3.0, 4.0));
        assert_eq!(c.head().unwrap(), Vec2::new(3.0, 4.0));
    }

    #[test]
    fn long_axis_hop_moves_exactly_one_segment_length() {
        let mut c = ChainBody::new(1, 15.0, Vec2::new(0.0, 0.0));
        c.advance(Vec2::new(100.0, 0.0));
        assert_eq!(c.head().unwrap(), Vec2::new(15.0, 0.0));
        c.advance(Vec2::new(15.0, -300.0));
        assert_eq!(c.head().unwrap(), Vec2::new(15.0, -15.0));

        // diagonal hops stay on the unit step within rounding
        let mut c = ChainBody::new(1, 15.0, Vec2::new(0.0, 0.0));
        c.advance(Vec2::new(300.0, 400.0));
        let h = c.head().unwrap();
        assert!((h.x - 9.0).abs() < 1e-5 && (h.y - 12.0).abs() < 1e-5, "{h:?}");
    }

    #[test]
    fn collapsed_body_with_target_on_head_stays_put() {
        let at = Vec2::new(50.0, 50.0);
        let mut c = ChainBody::new(6, 15.0, at);
        c.advance(at);
        assert!(c.segments().iter().all(|&s| s == at));
    }

    #[test]
    fn coincident_segments_are_skipped() {
        let mut c = ChainBody::new(4, 15.0, Vec2::new(0.0, 0.0));
        c.advance(Vec2::new(100.0, 0.0));
        // head moved 15, segment 1 sat exactly 15 behind: no pull; 2 and 3 coincide with 1
        let s = c.segments();
        assert_eq!(s[0], Vec2::new(15.0, 0.0));
        assert_eq!(s[1], Vec2::new(0.0, 0.0));
        assert_eq!(s[2], Vec2::new(0.0, 0.0));
        assert_eq!(s[3], Vec2::new(0.0, 0.0));
    }

    #[test]
    fn links_relax_toward_rest_length() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut c = ChainBody::new(10, 15.0, Vec2::new(0.0, 0.0));
        for s in c.segments.iter_mut() {
            *s = Vec2::new(rng.gen_range(0.0..800.0), rng.gen_range(0.0..600.0));
        }
        let target = Vec2::new(400.0, 300.0);
        let err = |c: &ChainBody| -> Vec<f32> {
            link_lengths(c).iter().map(|d| (d - 15.0).abs()).collect()
        };
        let mut last = err(&c);
        for _ in 0..200 {
            c.advance(target);
            let now = err(&c);
            for (a, b) in now.iter().zip(&last) {
                assert!(*a <= *b + 1e-3, "link error grew: {a} > {b}");
            }
            last = now;
        }
        assert!(last.iter().all(|e| *e < 1e-2));
    }

    #[test]
    fn trailing_body_lags_a_moving_head() {
        let mut c = ChainBody::new(10, 15.0, Vec2::new(0.0, 0.0));
        for i in 0..40 {
            c.advance(Vec2::new(1000.0, (i as f32 * 0.3).sin() * 40.0));
        }
        let s = c.segments();
        assert!(s[0].x > s[9].x);
        for w in s.windows(2) {
            assert!((w[0].dist(w[1]) - 15.0).abs() < 1e-2);
        }
    }

    #[test]
    fn occlusion_prefers_the_head() {
        let mut c = ChainBody::new(10, 15.0, Vec2::new(0.0, 0.0));
        // all segments overlap: the head wins, and the head glyph is the empty body slot
        assert_eq!(c.occlusion_at(Vec2::new(1.0, 1.0), 10.0), Some(' '));
        c.segments[4] = Vec2::new(200.0, 200.0);
        assert_eq!(c.occlusion_at(Vec2::new(205.0, 200.0), 10.0), Some('▓'));
        assert_eq!(c.occlusion_at(Vec2::new(210.0, 200.0), 10.0), None);
        assert_eq!(c.occlusion_at(Vec2::new(500.0, 500.0), 10.0), None);
    }
}
