use crate::config::Settings;
use crate::input::{collect_actions_nonblocking, Action};
use crate::model::Grid;
use crate::render::{draw_text, paint, Surface, Terminal};
use crate::sim::{Frame, Simulation};
use crossterm::style::Color;
use rand::{rngs::StdRng, SeedableRng};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tracing::info;

/// Wall clock in seconds that stops while paused.
pub(crate) struct SimClock {
    start: Instant,
    paused_at: Option<Instant>,
    paused_total: Duration,
}

impl SimClock {
    pub(crate) fn new(start: Instant) -> Self {
        Self {
            start,
            paused_at: None,
            paused_total: Duration::ZERO,
        }
    }

    pub(crate) fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    pub(crate) fn toggle_pause(&mut self, at: Instant) {
        match self.paused_at.take() {
            Some(since) => self.paused_total += at.saturating_duration_since(since),
            None => self.paused_at = Some(at),
        }
    }

    pub(crate) fn now_at(&self, at: Instant) -> f32 {
        let at = self.paused_at.unwrap_or(at);
        at.saturating_duration_since(self.start)
            .saturating_sub(self.paused_total)
            .as_secs_f32()
    }
}

pub(crate) struct App {
    sim: Simulation,
    term: Terminal,
    clock: SimClock,
    frame: Frame,
    tick: Duration,
    show_hud: bool,
    should_quit: bool,
    fps_est: f32,
}

impl App {
    fn init(settings: Settings) -> anyhow::Result<Self> {
        let seed = settings.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or(Duration::from_secs(0))
                .as_secs()
        });
        let term = Terminal::begin(settings.background())?;
        let (w, h) = term.cur.size();
        let sim = Simulation::new(&settings, Grid::new(w, h), StdRng::seed_from_u64(seed));

        info!(
            cols = term.cols,
            rows = term.rows,
            tick_ms = settings.tick_ms,
            seed,
            fish = settings.fish.enabled,
            "ripplefish started"
        );

        Ok(Self {
            sim,
            term,
            clock: SimClock::new(Instant::now()),
            frame: Frame::default(),
            tick: Duration::from_millis(settings.tick_ms),
            show_hud: settings.show_hud,
            should_quit: false,
            fps_est: 0.0,
        })
    }

    fn grid(&self) -> Grid {
        let (w, h) = self.term.cur.size();
        Grid::new(w, h)
    }

    /// `at` is the frame start; every action in a frame shares its timestamp.
    fn handle(&mut self, action: Action, at: Instant) {
        let now = self.clock.now_at(at);
        match action {
            Action::Quit => self.should_quit = true,
            Action::Click { col, row } => {
                let p = self.grid().cell_center(col as u32, row as u32);
                self.sim.set_pointer(p);
                self.sim.click(p, now);
            }
            Action::PointerMoved { col, row } => {
                let p = self.grid().cell_center(col as u32, row as u32);
                self.sim.set_pointer(p);
            }
            Action::Resize(w, h) => self.term.resize(w, h),
            Action::ToggleHud => self.show_hud = !self.show_hud,
            Action::TogglePause => self.clock.toggle_pause(at),
            Action::ToggleMode => self.sim.toggle_mode(now),
            Action::ClearRipples => self.sim.clear_ripples(),
        }
    }

    fn run(&mut self) -> anyhow::Result<()> {
        let mut last = Instant::now();
        let mut fps_acc = 0.0f32;
        let mut fps_frames = 0u32;

        while !self.should_quit {
            let frame_start = Instant::now();

            for action in collect_actions_nonblocking(self.tick)? {
                self.handle(action, frame_start);
                if self.should_quit {
                    break;
                }
            }
            if self.should_quit {
                break;
            }

            if !self.clock.is_paused() {
                let now = self.clock.now_at(frame_start);
                let grid = self.grid();
                self.frame = self.sim.step(now, grid);
            }
            self.render_frame()?;

            let dt = frame_start.saturating_duration_since(last).as_secs_f32();
            last = frame_start;
            fps_acc += dt;
            fps_frames += 1;
            if fps_acc >= 0.5 {
                self.fps_est = fps_frames as f32 / fps_acc;
                fps_acc = 0.0;
                fps_frames = 0;
            }

            // no catch-up: a late frame just starts the next one late
            spin_sleep(self.tick, frame_start);
        }

        info!(ripples = self.sim.ripple_count(), "ripplefish exiting");
        self.term.end()?;
        Ok(())
    }

    fn render_frame(&mut self) -> anyhow::Result<()> {
        paint(&self.frame, &mut self.term.cur);
        if self.show_hud {
            self.draw_hud();
        }
        self.term.present()
    }

    fn draw_hud(&mut self) {
        let mode = self.sim.mode().map(|m| m.name()).unwrap_or("ripples");
        let paused = if self.clock.is_paused() { " PAUSED |" } else { "" };
        let line = format!(
            " ripplefish | mode:{mode} | ripples:{} | fps:{:.0} |{paused} click ripple  m mode  c clear  space pause  h hud  q quit ",
            self.sim.ripple_count(),
            self.fps_est,
        );
        draw_text(&mut self.term.cur, 0, 0, &line, Color::White, Color::DarkBlue);
    }
}

pub(crate) fn run(settings: Settings) -> anyhow::Result<()> {
    let mut app = App::init(settings)?;
    app.run()
}

/* -----------------------------
   Frame pacing helper
------------------------------ */

fn spin_sleep(target: Duration, start: Instant) {
    let end = start + target;
    loop {
        let t = Instant::now();
        if t >= end {
            break;
        }
        let left = end - t;
        if left > Duration::from_millis(2) {
            std::thread::sleep(Duration::from_millis(1));
        } else {
            std::hint::spin_loop();
        }
    }
}
