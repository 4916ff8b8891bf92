//! Mini Snake: a single-screen snake game.
//!
//! The core ([`game`]) is a small state machine driven by a worker thread
//! ([`driver`]); pointer gestures ([`input`]), drawing ([`render`], [`draw`])
//! and high-score storage ([`prefs`]) are adapters around it, wired together
//! per window surface by [`session`].

pub mod config;
pub mod draw;
pub mod driver;
pub mod food;
pub mod game;
pub mod grid;
pub mod input;
pub mod pos;
pub mod prefs;
pub mod render;
pub mod score;
pub mod session;
pub mod snake;
