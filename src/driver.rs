use crate::game::{Game, GameState};
use crate::render::Renderer;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Food visibility toggle, flipped whenever more than `interval` has passed
/// since the last flip.
#[derive(Debug, Clone)]
pub struct Blink {
    interval: Duration,
    last_toggle: Instant,
    visible: bool,
}

impl Blink {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self { interval, last_toggle: now, visible: true }
    }

    pub fn tick(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last_toggle) > self.interval {
            self.visible = !self.visible;
            self.last_toggle = now;
        }
        self.visible
    }
}

/// A running game loop: one worker thread ticking `game` and rendering
/// every `tick`. Dropping it stops the thread too.
pub struct GameLoop {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl GameLoop {
    pub fn start(
        game: Arc<Mutex<Game>>,
        mut renderer: Box<dyn Renderer>,
        tick: Duration,
        blink: Duration,
    ) -> std::io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = stop.clone();
        let handle = thread::Builder::new().name("game-loop".into()).spawn(move || {
            info!(?tick, "game loop started");
            let mut blink = Blink::new(blink, Instant::now());
            while !flag.load(Ordering::Acquire) {
                let snapshot = {
                    let mut game = game.lock().unwrap_or_else(PoisonError::into_inner);
                    if game.state() == GameState::Running {
                        game.update();
                    }
                    game.snapshot(blink.tick(Instant::now()))
                };
                renderer.render(&snapshot);
                sleep_unless_stopped(&flag, tick);
            }
            info!("game loop stopped");
        })?;
        Ok(Self { stop, handle: Some(handle) })
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Signal the worker and block until it has exited.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        self.stop.store(true, Ordering::Release);
        handle.thread().unpark();
        debug!("joining game loop");
        if handle.join().is_err() {
            error!("game loop thread panicked");
        }
    }
}

impl Drop for GameLoop {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Fixed delay that ends early once the stop flag is raised. Parking can
/// wake spuriously, so the deadline is re-checked.
fn sleep_unless_stopped(stop: &AtomicBool, delay: Duration) {
    let deadline = Instant::now() + delay;
    loop {
        if stop.load(Ordering::Acquire) {
            return;
        }
        let now = Instant::now();
        if now >= deadline {
            return;
        }
        thread::park_timeout(deadline - now);
    }
}
