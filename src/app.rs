use std::path::PathBuf;
use std::time::{Duration, Instant};

use vello::Scene;

use crate::data::store::{ItemEdit, ItemStore};
use crate::data::{sample_items, ItemId};
use crate::layout::{self, Layout, LayoutError};
use crate::render::scene::build_scene;
use crate::render::shape::ShapeStyle;
use crate::render::text::{TextRenderer, DEFAULT_FONT};
use crate::ui::input::{self, MouseState};

/// Startup configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Initial window size (logical px)
    pub viewport_width: f64,
    pub viewport_height: f64,
    /// Quiet period before a resize triggers a relayout
    pub resize_debounce: Duration,
    pub style: ShapeStyle,
    /// Label font; system fonts are probed when unset
    pub font_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1280.0,
            viewport_height: 800.0,
            resize_debounce: Duration::from_millis(150),
            style: ShapeStyle::default(),
            font_path: None,
        }
    }
}

/// Coalesces bursts of resize events into one, `delay` after the last.
#[derive(Debug)]
pub struct ResizeDebouncer {
    delay: Duration,
    pending: Option<((u32, u32), Instant)>,
}

impl ResizeDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }

    /// Record a new size; restarts the quiet period.
    pub fn schedule(&mut self, width: u32, height: u32, now: Instant) {
        self.pending = Some(((width, height), now + self.delay));
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|(_, deadline)| deadline)
    }

    /// The latest size, once its quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<(u32, u32)> {
        match self.pending {
            Some((size, deadline)) if now >= deadline => {
                self.pending = None;
                Some(size)
            }
            _ => None,
        }
    }
}

/// Top-level application state.
pub struct App {
    pub config: AppConfig,

    // Data
    pub items: ItemStore,
    pub layout: Option<Layout>,
    pub last_error: Option<LayoutError>,
    pub text_renderer: TextRenderer,

    // UI state
    pub mouse: MouseState,
    pub hover: Option<ItemId>,
    pub resize: ResizeDebouncer,

    // Rendering
    pub scene: Scene,
    pub needs_relayout: bool,
    pub viewport_width: f64,
    pub viewport_height: f64,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let mut text_renderer = TextRenderer::new();
        let loaded = match &config.font_path {
            Some(path) => text_renderer.load_font_from_path(DEFAULT_FONT, path),
            None => text_renderer.load_system_font(DEFAULT_FONT),
        };
        if let Err(e) = loaded {
            tracing::warn!("Failed to load label font ({}), labels will not be drawn", e);
        }

        Self {
            items: ItemStore::from_items(sample_items()),
            layout: None,
            last_error: None,
            text_renderer,
            mouse: MouseState::default(),
            hover: None,
            resize: ResizeDebouncer::new(config.resize_debounce),
            scene: Scene::new(),
            needs_relayout: true,
            viewport_width: config.viewport_width,
            viewport_height: config.viewport_height,
            config,
        }
    }

    /// Recompute the layout for the current items and viewport.
    /// On failure nothing is kept, so nothing is drawn.
    pub fn relayout(&mut self) {
        self.needs_relayout = false;

        if self.items.is_empty() {
            self.layout = Some(Layout::default());
            self.last_error = None;
            return;
        }

        match layout::compute_layout(self.items.items(), self.viewport_width, self.viewport_height) {
            Ok(computed) => {
                tracing::info!(
                    "Layout computed: {} placements in {:.0}x{:.0}",
                    computed.len(),
                    self.viewport_width,
                    self.viewport_height
                );
                self.layout = Some(computed);
                self.last_error = None;
            }
            Err(e) => {
                tracing::error!("Layout failed: {}", e);
                self.layout = None;
                self.last_error = Some(e);
            }
        }
    }

    /// Rebuild the Vello scene from the current layout.
    pub fn rebuild_scene(&mut self) {
        let placements = self
            .layout
            .as_ref()
            .map(|l| l.placements.as_slice())
            .unwrap_or(&[]);
        let hover = match (self.hover, &self.layout) {
            (Some(id), Some(layout)) => layout.get(id),
            _ => None,
        };
        build_scene(
            &mut self.scene,
            placements,
            &self.config.style,
            hover,
            &mut self.text_renderer,
        );
    }

    /// Apply a new viewport size immediately.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport_width = width as f64;
        self.viewport_height = height as f64;
        self.needs_relayout = true;
    }

    /// Update hover from the current mouse position. Returns true if it changed.
    pub fn update_hover(&mut self) -> bool {
        let new_hover = self
            .layout
            .as_ref()
            .and_then(|l| input::hit_test(&l.placements, self.mouse.x, self.mouse.y));
        if new_hover == self.hover {
            return false;
        }
        self.hover = new_hover;
        true
    }

    pub fn remove_item(&mut self, id: ItemId) {
        if let Some(item) = self.items.remove(id) {
            tracing::info!("Removed item {} '{}'", id, item.name);
            if self.hover == Some(id) {
                self.hover = None;
            }
            self.needs_relayout = true;
        }
    }

    pub fn apply_edits(&mut self, edits: Vec<ItemEdit>) {
        self.items.apply_edits(edits);
        self.hover = None;
        self.needs_relayout = true;
    }

    pub fn reset_items(&mut self) {
        self.items = ItemStore::from_items(sample_items());
        self.hover = None;
        self.needs_relayout = true;
    }
}
