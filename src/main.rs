#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use squaremap_rs::app::{App, AppConfig};
use squaremap_rs::render::RenderState;
use squaremap_rs::ui::{editor, input, tooltip};

const WINDOW_TITLE: &str = "Squaremap";

/// Main application handler for winit's event loop.
struct SquaremapApp {
    app: App,
    render_state: Option<RenderState>,
    window: Option<Arc<Window>>,
}

impl SquaremapApp {
    fn new(config: AppConfig) -> Self {
        Self {
            app: App::new(config),
            render_state: None,
            window: None,
        }
    }

    fn update_window_title(&self) {
        let Some(window) = &self.window else {
            return;
        };
        match self.app.hover.and_then(|id| tooltip::build_tooltip(&self.app.items, id)) {
            Some(info) => window.set_title(&format!("{} | {}", WINDOW_TITLE, info.summary())),
            None => window.set_title(WINDOW_TITLE),
        }
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn handle_action(&mut self, action: input::InputAction) {
        match action {
            input::InputAction::EditItems => match editor::edit_in_child(self.app.items.items()) {
                Ok(Some(edits)) => {
                    tracing::info!("Editor returned {} items", edits.len());
                    self.app.apply_edits(edits);
                }
                Ok(None) => tracing::info!("Item editor cancelled"),
                Err(e) => tracing::error!("Item editor failed: {}", e),
            },
            input::InputAction::RemoveItem { id } => self.app.remove_item(id),
            input::InputAction::ResetItems => {
                tracing::info!("Restoring sample items");
                self.app.reset_items();
            }
            input::InputAction::None => return,
        }
        self.update_window_title();
        self.request_redraw();
    }
}

impl ApplicationHandler for SquaremapApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.app.config.viewport_width,
                self.app.config.viewport_height,
            ));

        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                tracing::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());

        // Initialize GPU rendering
        match pollster::block_on(RenderState::new(window.clone())) {
            Ok(state) => {
                let size = window.inner_size();
                tracing::info!(
                    "Window initialized: scale_factor={:.3}, physical_size={}x{}",
                    window.scale_factor(),
                    size.width,
                    size.height
                );
                self.app.resize(size.width, size.height);
                self.render_state = Some(state);
                window.request_redraw();
            }
            Err(e) => {
                tracing::error!("Failed to initialize GPU: {}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                // The surface follows the window at once; the layout waits for the drag to settle.
                if let Some(render) = &mut self.render_state {
                    render.resize(size.width, size.height);
                }
                self.app.resize.schedule(size.width, size.height, Instant::now());
                self.request_redraw();
            }

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                tracing::info!("Scale factor changed: {:.3}", scale_factor);
                if let (Some(render), Some(window)) = (&mut self.render_state, &self.window) {
                    let size = window.inner_size();
                    render.resize(size.width, size.height);
                    self.app.resize(size.width, size.height);
                    window.request_redraw();
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.app.mouse.x = position.x;
                self.app.mouse.y = position.y;
                if self.app.update_hover() {
                    self.update_window_title();
                    self.request_redraw();
                }
            }

            WindowEvent::CursorLeft { .. } => {
                if self.app.hover.take().is_some() {
                    self.update_window_title();
                    self.request_redraw();
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let action = input::process_mouse_button(button, state, self.app.hover);
                self.handle_action(action);
            }

            WindowEvent::KeyboardInput { event, .. } => {
                let action = input::process_key(event.logical_key, event.state, self.app.hover);
                self.handle_action(action);
            }

            WindowEvent::RedrawRequested => {
                if self.app.needs_relayout {
                    self.app.relayout();
                    if self.app.update_hover() {
                        self.update_window_title();
                    }
                }

                self.app.rebuild_scene();

                if let Some(render) = &mut self.render_state {
                    if let Err(e) = render.render(&self.app.scene) {
                        tracing::error!("Render error: {}", e);
                    }
                }
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        if let Some((width, height)) = self.app.resize.poll(now) {
            tracing::debug!("Resize settled at {}x{}", width, height);
            self.app.resize(width, height);
            self.request_redraw();
        }

        match self.app.resize.deadline() {
            Some(deadline) => event_loop.set_control_flow(ControlFlow::WaitUntil(deadline)),
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("squaremap_rs=info".parse()?),
        )
        .init();

    // The item editor runs as a child process of the main window.
    let first_arg = std::env::args().nth(1);
    if first_arg.as_deref() == Some(editor::EDITOR_FLAG) {
        return editor::run_editor_stdio();
    }

    // Optional argument: label font file
    let config = AppConfig {
        font_path: first_arg.map(PathBuf::from),
        ..AppConfig::default()
    };

    tracing::info!("Squaremap starting, label font: {:?}", config.font_path);

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = SquaremapApp::new(config);
    event_loop.run_app(&mut app)?;

    Ok(())
}
