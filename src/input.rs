use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Action {
    Quit,
    /// left press on a terminal cell
    Click { col: u16, row: u16 },
    PointerMoved { col: u16, row: u16 },
    Resize(u16, u16),
    ToggleHud,
    TogglePause,
    ToggleMode,
    ClearRipples,
}

pub(crate) fn collect_actions_nonblocking(max_frame_time: Duration) -> anyhow::Result<Vec<Action>> {
    let mut out = Vec::new();

    // poll with a tiny timeout so we stay responsive
    let timeout = std::cmp::min(Duration::from_millis(1), max_frame_time);
    while event::poll(timeout)? {
        if let Some(a) = map_event(event::read()?) {
            out.push(a);
            // mouse motion floods the queue; leave the rest for the next frame
            if out.len() >= 64 {
                break;
            }
        }
    }
    Ok(out)
}

pub(crate) fn map_event(ev: Event) -> Option<Action> {
    match ev {
        Event::Key(k) => map_key(k),
        Event::Mouse(m) => map_mouse(m),
        Event::Resize(w, h) => Some(Action::Resize(w, h)),
        _ => None,
    }
}

fn map_key(k: KeyEvent) -> Option<Action> {
    if k.kind != KeyEventKind::Press {
        return None;
    }
    if k.code == KeyCode::Char('c') && k.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Action::Quit);
    }
    match k.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('h') | KeyCode::Char('H') => Some(Action::ToggleHud),
        KeyCode::Char(' ') => Some(Action::TogglePause),
        KeyCode::Char('m') | KeyCode::Char('M') => Some(Action::ToggleMode),
        KeyCode::Char('c') | KeyCode::Char('C') => Some(Action::ClearRipples),
        _ => None,
    }
}

fn map_mouse(m: MouseEvent) -> Option<Action> {
    let (col, row) = (m.column, m.row);
    match m.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(Action::Click { col, row }),
        MouseEventKind::Moved | MouseEventKind::Drag(_) => Some(Action::PointerMoved { col, row }),
        _ => None,
    }
}
