//! Input handling: maps key/mouse/frame events to scroll state mutations.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::config::Action;
use crate::core::{
    drag::ClickDisposition,
    geometry::{Axis, Vec2},
    target::ScrollTarget,
    wheel::{WheelDelta, WheelOutcome},
};

use super::state::{AppState, Pane};

// ── Keyboard ────────────────────────────────────────────────────

/// Process a key event.  Keyboard scrolling feeds the focused pane's wheel
/// animator with line and page deltas.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    if key.kind == KeyEventKind::Release {
        return;
    }
    // Ctrl+c always quits.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    let Some(action) = state.config.match_key(key) else {
        return;
    };

    let focus = state.focus;
    match action {
        Action::Quit => state.should_quit = true,
        Action::NextPane => {
            if !state.panes.is_empty() {
                state.focus = (state.focus + 1) % state.panes.len();
            }
        }
        Action::LineUp => wheel(state, focus, WheelDelta::lines(0.0, -1.0)),
        Action::LineDown => wheel(state, focus, WheelDelta::lines(0.0, 1.0)),
        Action::ColumnLeft => wheel(state, focus, WheelDelta::lines(-1.0, 0.0)),
        Action::ColumnRight => wheel(state, focus, WheelDelta::lines(1.0, 0.0)),
        Action::PageUp => wheel(state, focus, WheelDelta::pages(-1.0)),
        Action::PageDown => wheel(state, focus, WheelDelta::pages(1.0)),
        Action::Top | Action::Bottom => {
            let AppState { panes, frames, .. } = state;
            let Some(pane) = panes.get_mut(focus) else {
                return;
            };
            pane.drag.cancel(frames);
            pane.wheel.cancel(frames);
            let mut offset = pane.viewport.scroll_offset();
            offset.y = if action == Action::Top {
                0.0
            } else {
                pane.viewport.max_scroll().y
            };
            pane.viewport.set_scroll_offset(offset);
        }
    }
}

// ── Mouse ───────────────────────────────────────────────────────

/// Process a mouse event received at `at`.
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent, at: Instant) {
    let (column, row) = (mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            // The scroll target is resolved once, at press time.
            let Some(idx) = state.pane_at(column, row) else {
                return;
            };
            // A press without a matching release (lost outside the
            // terminal) must not leave the old pane mid-gesture.
            if let Some(prev) = state.pressed_pane.take() {
                state.panes[prev].drag.pointer_leave(&mut state.frames);
            }
            state.focus = idx;
            state.pressed_pane = Some(idx);

            let AppState { panes, frames, .. } = state;
            let pane = &mut panes[idx];
            let pos = pane.cell_to_px(column, row);
            // A fresh gesture must not stack on any glide still running.
            pane.wheel.cancel(frames);
            pane.drag.pointer_down(pos, at, &pane.viewport, frames);
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            let Some(idx) = state.pressed_pane else {
                return;
            };
            let pane = &mut state.panes[idx];
            let pos = pane.cell_to_px(column, row);
            pane.drag.pointer_move(pos, at, &mut pane.viewport);
        }
        MouseEventKind::Up(MouseButton::Left) => {
            let Some(idx) = state.pressed_pane.take() else {
                return;
            };
            state.panes[idx].drag.pointer_up(&mut state.frames);

            // The host only fires a click when press and release hit the
            // same pane.
            if state.pane_at(column, row) == Some(idx) {
                click(state, idx, row);
            }
        }
        MouseEventKind::ScrollUp => notch(state, column, row, 0.0, -1.0),
        MouseEventKind::ScrollDown => notch(state, column, row, 0.0, 1.0),
        MouseEventKind::ScrollLeft => notch(state, column, row, -1.0, 0.0),
        MouseEventKind::ScrollRight => notch(state, column, row, 1.0, 0.0),
        _ => {}
    }
}

/// The terminal lost focus mid-gesture: release the pressed pane.
pub fn handle_focus_lost(state: &mut AppState) {
    if let Some(idx) = state.pressed_pane.take() {
        state.panes[idx].drag.pointer_leave(&mut state.frames);
    }
}

fn click(state: &mut AppState, idx: usize, row: u16) {
    let pane = &mut state.panes[idx];
    match pane.drag.click() {
        ClickDisposition::Suppress => {
            tracing::debug!(pane = idx, "click after drag suppressed");
        }
        ClickDisposition::Deliver => {
            pane.selected_line = pane.line_at_row(row);
            if let Some(line) = pane.selected_line {
                state.status_message = Some(format!("{}:{}", pane.document.name, line + 1));
            }
        }
    }
}

fn notch(state: &mut AppState, column: u16, row: u16, dx: f64, dy: f64) {
    let idx = state.pane_at(column, row).unwrap_or(state.focus);
    let lines = state.config.wheel_lines_per_notch;
    wheel(state, idx, WheelDelta::lines(dx * lines, dy * lines));
}

fn wheel(state: &mut AppState, idx: usize, delta: WheelDelta) {
    let AppState { panes, frames, .. } = state;
    let Some(pane) = panes.get_mut(idx) else {
        return;
    };
    let visible = pane.viewport.visible();
    if pane.wheel.handle(delta, visible, frames) == WheelOutcome::Passthrough {
        native_scroll(pane, delta);
    }
}

/// Immediate, unanimated scroll for deltas the wheel animator declines.
fn native_scroll(pane: &mut Pane, delta: WheelDelta) {
    let cfg = *pane.wheel.config();
    let visible = pane.viewport.visible();
    let step = Vec2::new(
        cfg.normalize(delta.x, delta.mode, visible[Axis::X]),
        cfg.normalize(delta.y, delta.mode, visible[Axis::Y]),
    );
    let offset = pane.viewport.scroll_offset() + step;
    pane.viewport.set_scroll_offset(offset);
}

// ── Frames ──────────────────────────────────────────────────────

/// Fire every frame due at this refresh.  Each frame belongs to at most one
/// animator; all others see it as stale and ignore it.
pub fn handle_frame(state: &mut AppState, now: Instant) {
    let AppState { panes, frames, .. } = state;
    for frame in frames.take_due(now) {
        for pane in panes.iter_mut() {
            let Pane {
                viewport,
                drag,
                wheel,
                ..
            } = pane;
            drag.tick(&frame, viewport, frames);
            wheel.tick(&frame, viewport, frames);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::core::document::Document;
    use crossterm::event::KeyEventState;
    use ratatui::layout::Rect;
    use std::time::Duration;

    fn app() -> AppState {
        let text: String = (0..500).map(|i| format!("{i:>4} {}\n", "x".repeat(i % 200))).collect();
        let mut state = AppState::new(
            vec![Document::from_text("a", &text), Document::from_text("b", &text)],
            AppConfig::default(),
        );
        state.panes[0].set_area(Rect::new(0, 0, 40, 22));
        state.panes[1].set_area(Rect::new(40, 0, 40, 22));
        state
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn settle(state: &mut AppState) {
        let mut guard = 0;
        while state.frames.has_pending() {
            handle_frame(state, Instant::now());
            guard += 1;
            assert!(guard < 10_000);
        }
    }

    #[test]
    fn wheel_glides_only_the_pane_under_the_pointer() {
        let mut state = app();
        handle_mouse(&mut state, mouse(MouseEventKind::ScrollDown, 50, 5), Instant::now());
        assert!(state.panes[1].is_animating());
        assert!(!state.panes[0].is_animating());

        settle(&mut state);
        assert!(state.panes[1].viewport.scroll_offset().y > 0.0);
        assert_eq!(state.panes[0].viewport.scroll_offset().y, 0.0);
    }

    #[test]
    fn fling_then_click_is_swallowed_once() {
        let mut state = app();
        let t0 = Instant::now();
        // 5 rows * 18px = 90px of travel, past the 20px threshold.
        handle_mouse(&mut state, mouse(MouseEventKind::Down(MouseButton::Left), 5, 15), t0);
        handle_mouse(
            &mut state,
            mouse(MouseEventKind::Drag(MouseButton::Left), 5, 10),
            t0 + Duration::from_millis(30),
        );
        handle_mouse(
            &mut state,
            mouse(MouseEventKind::Up(MouseButton::Left), 5, 10),
            t0 + Duration::from_millis(40),
        );

        assert!(state.panes[0].is_animating());
        assert_eq!(state.panes[0].selected_line, None);

        // Next plain click lands.
        let t1 = t0 + Duration::from_millis(500);
        handle_mouse(&mut state, mouse(MouseEventKind::Down(MouseButton::Left), 5, 3), t1);
        handle_mouse(&mut state, mouse(MouseEventKind::Up(MouseButton::Left), 5, 3), t1);
        assert!(state.panes[0].selected_line.is_some());
        assert!(!state.panes[0].is_animating());
    }

    #[test]
    fn press_cancels_wheel_glide_on_that_pane() {
        let mut state = app();
        handle_mouse(&mut state, mouse(MouseEventKind::ScrollDown, 5, 5), Instant::now());
        assert!(state.panes[0].is_animating());

        handle_mouse(&mut state, mouse(MouseEventKind::Down(MouseButton::Left), 5, 5), Instant::now());
        assert!(!state.panes[0].is_animating());
        assert!(!state.frames.has_pending());
    }

    #[test]
    fn focus_lost_releases_the_gesture() {
        let mut state = app();
        let t0 = Instant::now();
        handle_mouse(&mut state, mouse(MouseEventKind::Down(MouseButton::Left), 5, 2), t0);
        handle_mouse(
            &mut state,
            mouse(MouseEventKind::Drag(MouseButton::Left), 5, 12),
            t0 + Duration::from_millis(20),
        );
        // Dragged down from the top: content would go negative, clamps at 0.
        assert_eq!(state.panes[0].viewport.scroll_offset().y, 0.0);

        handle_focus_lost(&mut state);
        assert_eq!(state.pressed_pane, None);
        assert!(!state.panes[0].drag.is_dragging());
    }

    #[test]
    fn press_on_another_pane_releases_a_lost_gesture() {
        let mut state = app();
        let t0 = Instant::now();
        handle_mouse(&mut state, mouse(MouseEventKind::Down(MouseButton::Left), 5, 5), t0);
        assert!(state.panes[0].drag.is_dragging());

        // The release never arrives; the next press lands on pane 1.
        handle_mouse(
            &mut state,
            mouse(MouseEventKind::Down(MouseButton::Left), 50, 5),
            t0 + Duration::from_millis(100),
        );
        assert!(!state.panes[0].drag.is_dragging());
        assert!(state.panes[1].drag.is_dragging());
        assert_eq!(state.pressed_pane, Some(1));
        assert_eq!(state.focus, 1);
    }

    #[test]
    fn horizontal_notch_scrolls_natively() {
        let mut state = app();
        handle_mouse(&mut state, mouse(MouseEventKind::ScrollRight, 5, 5), Instant::now());
        assert!(!state.panes[0].is_animating());
        // 3 lines * 18px
        assert_eq!(state.panes[0].viewport.scroll_offset().x, 54.0);
    }

    #[test]
    fn keys_drive_focused_pane() {
        let mut state = app();
        handle_key(&mut state, key(KeyCode::Tab));
        assert_eq!(state.focus, 1);

        handle_key(&mut state, key(KeyCode::PageDown));
        assert!(state.panes[1].is_animating());

        handle_key(&mut state, key(KeyCode::End));
        assert!(!state.panes[1].is_animating());
        assert_eq!(
            state.panes[1].viewport.scroll_offset().y,
            state.panes[1].viewport.max_scroll().y
        );

        handle_key(&mut state, key(KeyCode::Char('q')));
        assert!(state.should_quit);
    }
}
