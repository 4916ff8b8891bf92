use anyhow::{Context, Result};
use minisnake::config::Config;
use minisnake::game::Command;
use minisnake::input::{InputInterpreter, PointerEvent};
use minisnake::pos::Dir;
use minisnake::prefs::JsonFileStore;
use minisnake::render::{CanvasRenderer, Surface};
use minisnake::session::Session;
use pixels::{Pixels, SurfaceTexture};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use winit::dpi::LogicalSize;
use winit::event::{Event, VirtualKeyCode};
use winit::event_loop::{ControlFlow, EventLoopBuilder};
use winit::window::WindowBuilder;
use winit_input_helper::WinitInputHelper;

/// Sent by the loop thread when a new frame is ready.
#[derive(Debug, Clone, Copy)]
struct FrameReady;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = Config::load(config_path.as_deref())?;
    let (width, height) = (config.window.width, config.window.height);

    let store = JsonFileStore::open(&config.prefs_path).unwrap_or_else(|e| {
        warn!("starting with empty preferences: {e:#}");
        JsonFileStore::empty(&config.prefs_path)
    });
    let mut session = Session::new(&config, Box::new(store));
    let mut interpreter = config.input.interpreter();

    let event_loop = EventLoopBuilder::<FrameReady>::with_user_event().build();
    let proxy = event_loop.create_proxy();
    let mut input = WinitInputHelper::new();

    let window = WindowBuilder::new()
        .with_title(config.window.title.as_str())
        .with_inner_size(LogicalSize::new(width, height))
        .with_resizable(false)
        .build(&event_loop)
        .context("Failed to create window")?;

    let mut pixels = {
        let window_size = window.inner_size();
        let surface_texture = SurfaceTexture::new(window_size.width, window_size.height, &window);
        Pixels::new(width, height, surface_texture).context("Failed to create pixel surface")?
    };

    let surface = Surface::new();
    surface.attach(width, height);
    let renderer = CanvasRenderer::new(width, height, surface.clone()).on_frame(move || {
        // fails only once the event loop is gone
        let _ = proxy.send_event(FrameReady);
    });
    session.surface_created(width, height, Box::new(renderer))?;
    info!(strategy = ?config.input.strategy, "window open");

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match &event {
            Event::UserEvent(FrameReady) => window.request_redraw(),
            Event::RedrawRequested(_) => {
                if surface.present(pixels.frame_mut()) {
                    if let Err(e) = pixels.render() {
                        error!("render failed: {e}");
                        shutdown(&mut session, &surface);
                        *control_flow = ControlFlow::Exit;
                        return;
                    }
                }
            }
            Event::LoopDestroyed => shutdown(&mut session, &surface),
            _ => {}
        }

        if input.update(&event) {
            if input.key_pressed(VirtualKeyCode::Escape) || input.close_requested() || input.destroyed() {
                shutdown(&mut session, &surface);
                *control_flow = ControlFlow::Exit;
                return;
            }

            if let Some(size) = input.window_resized() {
                if let Err(e) = pixels.resize_surface(size.width, size.height) {
                    error!("resize failed: {e}");
                    shutdown(&mut session, &surface);
                    *control_flow = ControlFlow::Exit;
                    return;
                }
            }

            for cmd in keyboard_commands(&input) {
                session.dispatch(cmd);
            }

            for raw in pointer_events(&input, &pixels) {
                if let Some(cmd) = interpreter.interpret(&raw) {
                    session.dispatch(cmd);
                }
            }
        }
    });
}

/// Stop the loop before the surface goes away so no frame is published
/// into a dead window.
fn shutdown(session: &mut Session, surface: &Surface) {
    session.surface_destroyed();
    surface.detach();
}

fn keyboard_commands(input: &WinitInputHelper) -> Vec<Command> {
    let mut cmds = Vec::new();
    if input.key_pressed(VirtualKeyCode::Up) || input.key_pressed(VirtualKeyCode::W) {
        cmds.push(Command::Steer(Dir::Up));
    }
    if input.key_pressed(VirtualKeyCode::Down) || input.key_pressed(VirtualKeyCode::S) {
        cmds.push(Command::Steer(Dir::Down));
    }
    if input.key_pressed(VirtualKeyCode::Left) || input.key_pressed(VirtualKeyCode::A) {
        cmds.push(Command::Steer(Dir::Left));
    }
    if input.key_pressed(VirtualKeyCode::Right) || input.key_pressed(VirtualKeyCode::D) {
        cmds.push(Command::Steer(Dir::Right));
    }
    if input.key_pressed(VirtualKeyCode::Space) || input.key_pressed(VirtualKeyCode::Return) {
        cmds.push(Command::StartOrRestart);
    }
    cmds
}

/// Primary mouse button as a touch pointer, in frame-buffer pixels.
fn pointer_events(input: &WinitInputHelper, pixels: &Pixels) -> Vec<PointerEvent> {
    let Some(pos) = input.mouse() else {
        return Vec::new();
    };
    let (x, y) = pixels
        .window_pos_to_pixel(pos)
        .unwrap_or_else(|outside| pixels.clamp_pixel_pos(outside));
    let (x, y) = (x as f32, y as f32);
    let at = Instant::now();

    let mut events = Vec::new();
    if input.mouse_pressed(0) {
        events.push(PointerEvent::Down { x, y, at });
    } else if input.mouse_held(0) && input.mouse_diff() != (0.0, 0.0) {
        events.push(PointerEvent::Move { x, y, at });
    }
    if input.mouse_released(0) {
        events.push(PointerEvent::Up { x, y, at });
    }
    events
}
