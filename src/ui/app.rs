//! Explorer session state and per-tick logic

use super::layout::Layout;
use super::navigation::{hit_test, NavigationState};
use super::panes::{self, StackRenderData, StatusRenderData, VariablesRenderData};
use super::theme::DEFAULT_THEME;
use crate::config::ExplorerConfig;
use crate::host::{Button, Canvas, Host};
use crate::model::source::{SourceCache, SourceView};
use crate::model::stack::{build_stack, StackFrame};
use crate::model::variables::VariableTree;
use crate::snapshot::ErrorSnapshot;
use tracing::debug;

/// Everything shown while a failure is being explored
///
/// A session is created from an [`ErrorSnapshot`] and then driven by the host
/// tick: [`update`](Self::update) consumes input, [`draw`](Self::draw) renders.
#[derive(Debug)]
pub struct ExplorerSession {
    snapshot: ErrorSnapshot,
    config: ExplorerConfig,
    frames: Vec<StackFrame>,
    variables: VariableTree,
    source: SourceView,
    sources: SourceCache,
    nav: NavigationState,
}

impl ExplorerSession {
    /// An unpopulated session: no frames until [`populate`](Self::populate)
    pub fn new(snapshot: ErrorSnapshot, config: ExplorerConfig) -> Self {
        let nav = NavigationState::new(config.initial_font);
        ExplorerSession {
            snapshot,
            config,
            frames: Vec::new(),
            variables: VariableTree::empty(),
            source: SourceView::empty(),
            sources: SourceCache::new(),
            nav,
        }
    }

    /// Build the stack model and select the frame the failure points at
    pub fn populate<H: Host + ?Sized>(&mut self, host: &mut H) {
        self.frames = match self.snapshot.context() {
            Some(context) => build_stack(context, self.config.max_frames),
            None => Vec::new(),
        };

        let initial = self.initial_selection();
        debug!(frames = self.frames.len(), initial, "session populated");
        self.select_frame(initial, host);

        let layout = self.layout(&*host);
        self.refresh_bounds(&layout);
        self.nav.stack_scroll.ensure_visible(
            self.nav.selected,
            layout.stack.visible_rows(layout.line_height()),
        );
    }

    /// Frame whose source and line match the message location, else the innermost
    pub fn initial_selection(&self) -> usize {
        self.snapshot
            .location()
            .and_then(|location| {
                self.frames
                    .iter()
                    .position(|frame| frame.is_at(&location.path, location.line))
            })
            .unwrap_or(0)
    }

    /// Select a frame and rebuild its variables and source; false if out of range
    pub fn select_frame<H: Host + ?Sized>(&mut self, index: usize, host: &mut H) -> bool {
        let Some(frame) = self.frames.get(index) else {
            return false;
        };

        // Both go through the host; commit only once each has been built
        let variables = match self.snapshot.context() {
            Some(context) => VariableTree::for_frame(context, frame.depth),
            None => VariableTree::empty(),
        };
        let source = SourceView::for_frame(frame, &mut self.sources, host);

        self.nav.selected = index;
        self.variables = variables;
        self.source = source;
        self.nav.variable_scroll = Default::default();
        self.nav.hovered_variable = None;

        debug!(index, function = %frame.function, "frame selected");
        true
    }

    /// Consume this tick's input
    pub fn update<H: Host + ?Sized>(&mut self, host: &mut H) {
        if host.just_pressed(Button::ToggleFont) {
            self.nav.font = self.nav.font.toggled();
            debug!(font = ?self.nav.font, "font toggled");
        }

        let layout = self.layout(&*host);
        let line_height = layout.line_height();
        let stack_rows = layout.stack.visible_rows(line_height);
        self.refresh_bounds(&layout);

        let mut delta = 0;
        if host.just_pressed(Button::Up) {
            delta -= 1;
        }
        if host.just_pressed(Button::Down) {
            delta += 1;
        }
        if delta != 0 {
            if let Some(index) = self.nav.step_target(delta, self.frames.len()) {
                if index != self.nav.selected {
                    self.select_frame(index, host);
                    self.refresh_bounds(&layout);
                }
                self.nav.stack_scroll.ensure_visible(index, stack_rows);
            }
        }

        let pointer = host.pointer();
        if pointer.wheel != 0 {
            let rows = -(pointer.wheel as isize) * self.config.wheel_step as isize;
            if layout.stack.content.contains(pointer.x, pointer.y) {
                self.nav.stack_scroll.scroll_by(rows);
            } else if layout.variables.content.contains(pointer.x, pointer.y) {
                self.nav.variable_scroll.scroll_by(rows);
            }
        }

        self.nav.clear_hover();
        self.nav.hovered_frame = hit_test(
            &layout.stack,
            self.frames.len(),
            &self.nav.stack_scroll,
            line_height,
            pointer.x,
            pointer.y,
        );
        if self.nav.hovered_frame.is_none() {
            let rows = self.variables.rows();
            self.nav.hovered_variable = hit_test(
                &layout.variables,
                rows.len(),
                &self.nav.variable_scroll,
                line_height,
                pointer.x,
                pointer.y,
            )
            .and_then(|row| rows.get(row).map(|row| row.path.clone()));
        }

        if self.nav.click_edge(pointer.pressed) {
            if let Some(index) = self.nav.hovered_frame {
                if index != self.nav.selected {
                    self.select_frame(index, host);
                    self.refresh_bounds(&layout);
                }
            } else if let Some(path) = self.nav.hovered_variable.clone() {
                if self.variables.toggle(&path) {
                    self.refresh_bounds(&layout);
                }
            }
        }

        let smoothing = self.config.scroll_smoothing;
        self.nav.stack_scroll.animate(smoothing);
        self.nav.variable_scroll.animate(smoothing);
    }

    /// Render the explorer over the whole screen
    pub fn draw<H: Host + ?Sized>(&self, host: &mut H) {
        let layout = self.layout(&*host);
        let line_height = layout.line_height();
        let theme = &DEFAULT_THEME;

        host.set_font(self.nav.font);
        host.clip(None);
        host.clear(theme.bg);

        panes::render_header(host, layout.header, &self.snapshot, line_height);
        panes::render_stack_pane(
            host,
            &layout.stack,
            StackRenderData {
                frames: &self.frames,
                selected: self.nav.selected,
                hovered: self.nav.hovered_frame,
                has_context: self.snapshot.context().is_some(),
            },
            &self.nav.stack_scroll,
            line_height,
        );
        panes::render_variables_pane(
            host,
            &layout.variables,
            VariablesRenderData {
                tree: &self.variables,
                hovered: self.nav.hovered_variable.as_deref(),
                glyph_width: layout.metrics.glyph_width,
            },
            &self.nav.variable_scroll,
            line_height,
        );
        panes::render_source_pane(
            host,
            &layout.source,
            &self.source,
            self.config.source_context(self.nav.font),
            line_height,
        );
        panes::render_status_bar(
            host,
            layout.status,
            StatusRenderData {
                selected: self.nav.selected,
                frame_count: self.frames.len(),
                font: self.nav.font,
            },
        );
        host.clip(None);
    }

    /// Layout for the current screen size and font
    pub fn layout<C: Canvas + ?Sized>(&self, canvas: &C) -> Layout {
        Layout::compute(canvas.screen_size(), canvas.metrics(self.nav.font))
    }

    fn refresh_bounds(&mut self, layout: &Layout) {
        let line_height = layout.line_height();
        self.nav
            .stack_scroll
            .set_bounds(self.frames.len(), layout.stack.visible_rows(line_height));
        self.nav.variable_scroll.set_bounds(
            self.variables.row_count(),
            layout.variables.visible_rows(line_height),
        );
    }

    pub fn snapshot(&self) -> &ErrorSnapshot {
        &self.snapshot
    }

    pub fn frames(&self) -> &[StackFrame] {
        &self.frames
    }

    pub fn selected(&self) -> usize {
        self.nav.selected
    }

    pub fn variables(&self) -> &VariableTree {
        &self.variables
    }

    pub fn source(&self) -> &SourceView {
        &self.source
    }

    pub fn sources(&self) -> &SourceCache {
        &self.sources
    }

    pub fn navigation(&self) -> &NavigationState {
        &self.nav
    }
}
