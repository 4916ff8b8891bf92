use crate::draw::{Canvas, GLYPH_H, Rgba, frame_len};
use crate::game::{GameState, Snapshot};
use crate::pos::Dir;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::trace;

pub trait Renderer: Send {
    /// Paint one frame. Must not fail: a frame that cannot be shown is
    /// skipped.
    fn render(&mut self, snapshot: &Snapshot);
}

/// Frame buffer shared between the loop thread, which publishes finished
/// frames, and the window thread, which presents them. `None` while no
/// window surface exists.
#[derive(Clone, Default)]
pub struct Surface {
    frame: Arc<Mutex<Option<Vec<u8>>>>,
}

impl Surface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&self, width: u32, height: u32) {
        let mut frame = self.frame.lock().unwrap_or_else(PoisonError::into_inner);
        *frame = Some(vec![0; frame_len(width, height)]);
    }

    pub fn detach(&self) {
        let mut frame = self.frame.lock().unwrap_or_else(PoisonError::into_inner);
        *frame = None;
    }

    pub fn is_attached(&self) -> bool {
        self.frame.lock().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    /// Returns false when detached or the sizes differ.
    pub fn publish(&self, src: &[u8]) -> bool {
        let mut frame = self.frame.lock().unwrap_or_else(PoisonError::into_inner);
        match frame.as_mut() {
            Some(dst) if dst.len() == src.len() => {
                dst.copy_from_slice(src);
                true
            }
            _ => false,
        }
    }

    /// Copy the latest frame into `dst`; false when there is nothing to show.
    pub fn present(&self, dst: &mut [u8]) -> bool {
        let frame = self.frame.lock().unwrap_or_else(PoisonError::into_inner);
        match frame.as_ref() {
            Some(src) if src.len() == dst.len() => {
                dst.copy_from_slice(src);
                true
            }
            _ => false,
        }
    }
}

const BACKGROUND: Rgba = (0, 0, 0, 255);
const SNAKE: Rgba = (0, 255, 0, 255);
const EYE: Rgba = (0, 0, 0, 255);
const FOOD: Rgba = (255, 0, 0, 255);
const TEXT: Rgba = (255, 255, 255, 255);
const CELL_PADDING: u32 = 2;
const TEXT_SCALE: u32 = 3;
const HUD_SCALE: u32 = 2;

/// Draws snapshots into a private buffer and publishes them to a [`Surface`].
pub struct CanvasRenderer {
    width: u32,
    height: u32,
    scratch: Vec<u8>,
    surface: Surface,
    on_frame: Option<Box<dyn Fn() + Send>>,
}

impl CanvasRenderer {
    pub fn new(width: u32, height: u32, surface: Surface) -> Self {
        Self {
            width,
            height,
            scratch: vec![0; frame_len(width, height)],
            surface,
            on_frame: None,
        }
    }

    /// Called after every published frame, e.g. to wake the window thread.
    pub fn on_frame(mut self, notify: impl Fn() + Send + 'static) -> Self {
        self.on_frame = Some(Box::new(notify));
        self
    }

    fn paint(&mut self, snap: &Snapshot) {
        let mut canvas = Canvas::new(&mut self.scratch, self.width, self.height);
        canvas.clear(BACKGROUND);

        let cell = snap.grid.cell_size;
        let inner = cell.saturating_sub(2 * CELL_PADDING).max(1);
        for &p in &snap.snake {
            let (x, y) = snap.grid.to_pixels(p);
            canvas.fill_rect(x + CELL_PADDING as i64, y + CELL_PADDING as i64, inner, inner, SNAKE);
        }
        if let Some(&head) = snap.snake.first() {
            let (x, y) = snap.grid.to_pixels(head);
            draw_eyes(&mut canvas, x, y, cell, snap.dir);
        }

        if snap.food_visible && snap.state == GameState::Running {
            let (x, y) = snap.grid.to_pixels(snap.food);
            canvas.fill_rect(x, y, cell, cell, FOOD);
        }

        let mid = canvas.height() as i64 / 2;
        match snap.state {
            GameState::Initial => {
                canvas.draw_text_centered("HOLD TO START GAME", mid, TEXT_SCALE, TEXT);
            }
            GameState::GameOver => {
                let line = format!("GAME OVER. SCORE: {}. HIGH SCORE: {}", snap.score, snap.high_score);
                let scale = if crate::draw::text_width(&line, TEXT_SCALE) > canvas.width() {
                    HUD_SCALE
                } else {
                    TEXT_SCALE
                };
                canvas.draw_text_centered(&line, mid, scale, TEXT);
                let below = mid + (GLYPH_H * scale) as i64 + 14;
                canvas.draw_text_centered("TOUCH TO RESTART", below, scale, TEXT);
            }
            GameState::Running => {
                let hud = format!("SCORE: {}  HIGH: {}", snap.score, snap.high_score);
                canvas.draw_text(&hud, 8, 8, HUD_SCALE, TEXT);
            }
        }
    }
}

fn draw_eyes(canvas: &mut Canvas<'_>, x: i64, y: i64, cell: u32, dir: Dir) {
    let near = cell as i64 / 4;
    let far = cell as i64 * 3 / 4 - 1;
    let eyes = match dir {
        Dir::Right => [(far, near), (far, far)],
        Dir::Left => [(near, near), (near, far)],
        Dir::Up => [(near, near), (far, near)],
        Dir::Down => [(near, far), (far, far)],
    };
    for (ex, ey) in eyes {
        canvas.fill_rect(x + ex, y + ey, 2, 2, EYE);
    }
}

impl Renderer for CanvasRenderer {
    fn render(&mut self, snap: &Snapshot) {
        if !self.surface.is_attached() {
            trace!("no surface, frame skipped");
            return;
        }
        self.paint(snap);
        if self.surface.publish(&self.scratch) {
            if let Some(notify) = &self.on_frame {
                notify();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::pos::Pos;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn snapshot(state: GameState, food_visible: bool) -> Snapshot {
        Snapshot {
            snake: vec![Pos::new(5, 5)],
            food: Pos::new(3, 3),
            food_visible,
            dir: Dir::Right,
            score: 4,
            high_score: 9,
            state,
            grid: Grid::with_cells(8, 8, 10),
        }
    }

    fn pixel(frame: &[u8], x: u32, y: u32) -> [u8; 4] {
        let i = ((y * 80 + x) * 4) as usize;
        [frame[i], frame[i + 1], frame[i + 2], frame[i + 3]]
    }

    fn rendered(snap: &Snapshot) -> Vec<u8> {
        let surface = Surface::new();
        surface.attach(80, 80);
        let mut renderer = CanvasRenderer::new(80, 80, surface.clone());
        renderer.render(snap);
        let mut out = vec![0; 80 * 80 * 4];
        assert!(surface.present(&mut out));
        out
    }

    #[test]
    fn snake_cells_are_padded() {
        let frame = rendered(&snapshot(GameState::Running, true));
        assert_eq!(pixel(&frame, 55, 55), [0, 255, 0, 255]);
        assert_eq!(pixel(&frame, 50, 50), [0, 0, 0, 255]);
        // heading right: eyes on the right half of the head
        assert_eq!(pixel(&frame, 56, 52), [0, 0, 0, 255]);
    }

    #[test]
    fn food_blinks_only_while_running() {
        let frame = rendered(&snapshot(GameState::Running, true));
        assert_eq!(pixel(&frame, 35, 35), [255, 0, 0, 255]);
        let frame = rendered(&snapshot(GameState::Running, false));
        assert_eq!(pixel(&frame, 35, 35), [0, 0, 0, 255]);
        let frame = rendered(&snapshot(GameState::GameOver, true));
        assert_ne!(pixel(&frame, 35, 35), [255, 0, 0, 255]);
    }

    #[test]
    fn detached_surface_skips_frame() {
        let surface = Surface::new();
        let frames = Arc::new(AtomicUsize::new(0));
        let counter = frames.clone();
        let mut renderer = CanvasRenderer::new(80, 80, surface.clone()).on_frame(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        renderer.render(&snapshot(GameState::Running, true));
        assert_eq!(frames.load(Ordering::SeqCst), 0);

        surface.attach(80, 80);
        renderer.render(&snapshot(GameState::Running, true));
        assert_eq!(frames.load(Ordering::SeqCst), 1);

        surface.detach();
        let mut out = vec![0; 80 * 80 * 4];
        assert!(!surface.present(&mut out));
    }

    #[test]
    fn size_mismatch_is_not_published() {
        let surface = Surface::new();
        surface.attach(10, 10);
        assert!(!surface.publish(&[0; 16]));
    }
}
