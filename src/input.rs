//! Pointer gestures to game commands.
//!
//! The window forwards primary-button presses, drags and releases as
//! [`PointerEvent`]s; an [`InputInterpreter`] turns them into [`Command`]s.
//! Which gesture set is used comes from [`InputConfig::strategy`].

use crate::config::{InputConfig, InputStrategy};
use crate::game::Command;
use crate::pos::Dir;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { x: f32, y: f32, at: Instant },
    Move { x: f32, y: f32, at: Instant },
    Up { x: f32, y: f32, at: Instant },
}

pub trait InputInterpreter: Send {
    fn interpret(&mut self, event: &PointerEvent) -> Option<Command>;
}

#[derive(Debug, Clone, Copy)]
struct Press {
    x: f32,
    y: f32,
    at: Instant,
}

/// Dragging away from the press point steers; holding for `long_press`
/// before releasing starts a game.
pub struct DragInterpreter {
    long_press: Duration,
    dead_zone: f32,
    press: Option<Press>,
}

impl DragInterpreter {
    pub fn new(long_press: Duration, dead_zone: f32) -> Self {
        Self { long_press, dead_zone, press: None }
    }
}

impl InputInterpreter for DragInterpreter {
    fn interpret(&mut self, event: &PointerEvent) -> Option<Command> {
        match *event {
            PointerEvent::Down { x, y, at } => {
                self.press = Some(Press { x, y, at });
                None
            }
            PointerEvent::Move { x, y, .. } => {
                let press = self.press?;
                let (dx, dy) = (x - press.x, y - press.y);
                if dx.abs().max(dy.abs()) < self.dead_zone {
                    return None;
                }
                Some(Command::Steer(Dir::from_delta(dx, dy)))
            }
            PointerEvent::Up { at, .. } => {
                let press = self.press.take()?;
                (at.saturating_duration_since(press.at) >= self.long_press)
                    .then_some(Command::StartOrRestart)
            }
        }
    }
}

/// A short tap starts a game; a fast swipe steers toward its dominant axis.
pub struct FlingInterpreter {
    min_distance: f32,
    min_velocity: f32,
    press: Option<Press>,
}

impl FlingInterpreter {
    pub fn new(min_distance: f32, min_velocity: f32) -> Self {
        Self { min_distance, min_velocity, press: None }
    }
}

impl InputInterpreter for FlingInterpreter {
    fn interpret(&mut self, event: &PointerEvent) -> Option<Command> {
        match *event {
            PointerEvent::Down { x, y, at } => {
                self.press = Some(Press { x, y, at });
                None
            }
            PointerEvent::Move { .. } => None,
            PointerEvent::Up { x, y, at } => {
                let press = self.press.take()?;
                let (dx, dy) = (x - press.x, y - press.y);
                let distance = dx.hypot(dy);
                if distance < self.min_distance {
                    return Some(Command::StartOrRestart);
                }
                // a zero-length press can't be timed; treat it as instant
                let secs = at.saturating_duration_since(press.at).as_secs_f32().max(f32::EPSILON);
                (distance / secs >= self.min_velocity).then(|| Command::Steer(Dir::from_delta(dx, dy)))
            }
        }
    }
}

impl InputConfig {
    pub fn interpreter(&self) -> Box<dyn InputInterpreter> {
        match self.strategy {
            InputStrategy::Drag => Box::new(DragInterpreter::new(
                Duration::from_millis(self.long_press_ms),
                self.drag_dead_zone,
            )),
            InputStrategy::Fling => {
                Box::new(FlingInterpreter::new(self.fling_min_distance, self.fling_min_velocity))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(base: Instant, n: u64) -> Instant {
        base + Duration::from_millis(n)
    }

    #[test]
    fn drag_steers_by_dominant_axis() {
        let t = Instant::now();
        let mut drag = DragInterpreter::new(Duration::from_millis(1000), 8.0);
        assert_eq!(drag.interpret(&PointerEvent::Down { x: 100.0, y: 100.0, at: t }), None);
        assert_eq!(
            drag.interpret(&PointerEvent::Move { x: 140.0, y: 110.0, at: ms(t, 50) }),
            Some(Command::Steer(Dir::Right))
        );
        // deltas are measured from the press point, not the last sample
        assert_eq!(
            drag.interpret(&PointerEvent::Move { x: 130.0, y: 170.0, at: ms(t, 80) }),
            Some(Command::Steer(Dir::Down))
        );
        assert_eq!(
            drag.interpret(&PointerEvent::Move { x: 100.0, y: 40.0, at: ms(t, 90) }),
            Some(Command::Steer(Dir::Up))
        );
        assert_eq!(
            drag.interpret(&PointerEvent::Move { x: 20.0, y: 100.0, at: ms(t, 95) }),
            Some(Command::Steer(Dir::Left))
        );
    }

    #[test]
    fn drag_ignores_jitter_inside_dead_zone() {
        let t = Instant::now();
        let mut drag = DragInterpreter::new(Duration::from_millis(1000), 8.0);
        drag.interpret(&PointerEvent::Down { x: 100.0, y: 100.0, at: t });
        assert_eq!(drag.interpret(&PointerEvent::Move { x: 103.0, y: 98.0, at: ms(t, 10) }), None);
    }

    #[test]
    fn drag_needs_a_press_first() {
        let mut drag = DragInterpreter::new(Duration::from_millis(1000), 8.0);
        let t = Instant::now();
        assert_eq!(drag.interpret(&PointerEvent::Move { x: 300.0, y: 0.0, at: t }), None);
        assert_eq!(drag.interpret(&PointerEvent::Up { x: 300.0, y: 0.0, at: t }), None);
    }

    #[test]
    fn long_press_starts_short_press_does_not() {
        let t = Instant::now();
        let mut drag = DragInterpreter::new(Duration::from_millis(1000), 8.0);

        drag.interpret(&PointerEvent::Down { x: 10.0, y: 10.0, at: t });
        assert_eq!(drag.interpret(&PointerEvent::Up { x: 10.0, y: 10.0, at: ms(t, 999) }), None);

        drag.interpret(&PointerEvent::Down { x: 10.0, y: 10.0, at: t });
        assert_eq!(
            drag.interpret(&PointerEvent::Up { x: 10.0, y: 10.0, at: ms(t, 1000) }),
            Some(Command::StartOrRestart)
        );
    }

    #[test]
    fn tap_starts_with_fling() {
        let t = Instant::now();
        let mut fling = FlingInterpreter::new(40.0, 300.0);
        fling.interpret(&PointerEvent::Down { x: 50.0, y: 50.0, at: t });
        assert_eq!(
            fling.interpret(&PointerEvent::Up { x: 55.0, y: 52.0, at: ms(t, 120) }),
            Some(Command::StartOrRestart)
        );
    }

    #[test]
    fn fast_swipe_steers() {
        let t = Instant::now();
        let mut fling = FlingInterpreter::new(40.0, 300.0);
        fling.interpret(&PointerEvent::Down { x: 200.0, y: 200.0, at: t });
        assert_eq!(fling.interpret(&PointerEvent::Move { x: 200.0, y: 150.0, at: ms(t, 40) }), None);
        // 120 px in 100 ms = 1200 px/s
        assert_eq!(
            fling.interpret(&PointerEvent::Up { x: 205.0, y: 80.0, at: ms(t, 100) }),
            Some(Command::Steer(Dir::Up))
        );
    }

    #[test]
    fn slow_drag_is_ignored_by_fling() {
        let t = Instant::now();
        let mut fling = FlingInterpreter::new(40.0, 300.0);
        fling.interpret(&PointerEvent::Down { x: 0.0, y: 0.0, at: t });
        // 100 px over 2 s = 50 px/s
        assert_eq!(fling.interpret(&PointerEvent::Up { x: 100.0, y: 0.0, at: ms(t, 2000) }), None);
    }

    #[test]
    fn config_picks_strategy() {
        let t = Instant::now();
        let config = InputConfig { strategy: InputStrategy::Fling, ..Default::default() };
        let mut interp = config.interpreter();
        interp.interpret(&PointerEvent::Down { x: 0.0, y: 0.0, at: t });
        // a quick tap starts under fling; under drag it would be too short
        assert_eq!(
            interp.interpret(&PointerEvent::Up { x: 0.0, y: 0.0, at: ms(t, 50) }),
            Some(Command::StartOrRestart)
        );

        let mut interp = InputConfig::default().interpreter();
        interp.interpret(&PointerEvent::Down { x: 0.0, y: 0.0, at: t });
        assert_eq!(interp.interpret(&PointerEvent::Up { x: 0.0, y: 0.0, at: ms(t, 50) }), None);
    }
}
