use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::bandplan::{BandColorTable, BandPlan, BandPlanPosition};
use crate::config::WaterfallConfig;
use crate::dsp::{DecimationMode, SignalInfo};
use crate::error::Result;
use crate::geom::{Rect, Vec2};
use crate::interaction::{DragMode, InteractionContext, InteractionController, WaterfallEvent};
use crate::palette::ColorPoint;
use crate::render::scale::format_frequency_long;
use crate::render::{Layout, LayoutMetrics, Surface, TextureBuffer, Theme};
use crate::vfo::{Vfo, VfoSet};
use crate::view::ViewState;

use super::overlay::{PlotGeometry, WaterfallOverlay};
use super::{draw, lock, SpectrumWriter, WaterfallCore};

/// What one frame draws over, supplied by the host each time.
pub struct FrameContext<'a> {
    widget: Rect,
    vfos: &'a mut VfoSet,
    band_plan: Option<(&'a BandPlan, &'a BandColorTable)>,
    overlay: Option<&'a mut dyn WaterfallOverlay>,
    input_locked: bool,
}

impl<'a> FrameContext<'a> {
    pub fn new(widget: Rect, vfos: &'a mut VfoSet) -> Self {
        Self {
            widget,
            vfos,
            band_plan: None,
            overlay: None,
            input_locked: false,
        }
    }

    pub fn band_plan(mut self, plan: &'a BandPlan, colors: &'a BandColorTable) -> Self {
        self.band_plan = Some((plan, colors));
        self
    }

    pub fn overlay(mut self, overlay: &'a mut dyn WaterfallOverlay) -> Self {
        self.overlay = Some(overlay);
        self
    }

    /// Ignore pointer and keys this frame, e.g. while a popup is open.
    pub fn input_locked(mut self, locked: bool) -> Self {
        self.input_locked = locked;
        self
    }
}

/// UI-thread side of the waterfall widget.
pub struct WaterfallRenderer {
    core: Arc<Mutex<WaterfallCore>>,
    /// Linear copy of the frame buffer awaiting upload.
    texture: TextureBuffer,
    interaction: InteractionController,
    layout: Option<Layout>,
    last_widget: Option<Rect>,
    layout_dirty: bool,
    /// VFO geometry or placement must be refreshed on the next frame.
    vfos_dirty: bool,
    /// VFOs must be pulled back inside a changed acquisition band.
    reclamp_vfos: bool,
    fft_area_height: f32,
    metrics: LayoutMetrics,
    theme: Theme,
    band_plan_visible: bool,
    band_plan_position: BandPlanPosition,
    single_click_move: bool,
    center_locked: bool,
    tooltips: bool,
}

impl WaterfallRenderer {
    /// Create the widget for lines of `raw_line_width` bins, returning the
    /// renderer for the UI thread and the writer for the producer.
    pub fn new(
        config: &WaterfallConfig,
        view: ViewState,
        raw_line_width: usize,
    ) -> Result<(Self, SpectrumWriter)> {
        let core = Arc::new(Mutex::new(WaterfallCore::new(config, view, raw_line_width)?));
        let writer = SpectrumWriter::new(Arc::clone(&core));
        let renderer = Self {
            core,
            texture: TextureBuffer::default(),
            interaction: InteractionController::new(),
            layout: None,
            last_widget: None,
            layout_dirty: true,
            vfos_dirty: true,
            reclamp_vfos: false,
            fft_area_height: config.fft_area_height,
            metrics: config.scaled_metrics(),
            theme: config.theme,
            band_plan_visible: config.band_plan_visible,
            band_plan_position: config.band_plan_position,
            single_click_move: config.vfo_move_single_click,
            center_locked: config.center_frequency_locked,
            tooltips: config.tooltips,
        };
        Ok((renderer, writer))
    }

    /// Draw one frame and run input handling. Returns what the user changed.
    pub fn render(
        &mut self,
        surface: &mut dyn Surface,
        frame: FrameContext<'_>,
    ) -> Vec<WaterfallEvent> {
        let FrameContext {
            widget,
            vfos,
            band_plan,
            mut overlay,
            input_locked,
        } = frame;
        let mut events = Vec::new();
        let shared = Arc::clone(&self.core);
        let mut guard = lock(&shared);
        let core = &mut *guard;

        vfos.select_first();
        if self.layout_dirty || self.last_widget != Some(widget) {
            self.relayout(core, widget);
            self.vfos_dirty = true;
        }
        let Some(mut layout) = self.layout.clone() else {
            surface.rect_filled(widget, self.theme.background);
            return events;
        };
        if self.reclamp_vfos {
            vfos.keep_in_band(core.view.whole_bandwidth());
            self.reclamp_vfos = false;
        }
        if std::mem::take(&mut self.vfos_dirty) {
            vfos.mark_all_dirty();
        }
        refresh_geometry(vfos, &core.view, &layout);

        let input = surface.input();
        let consumed = !input_locked
            && overlay.as_deref_mut().is_some_and(|overlay| {
                overlay.input(&input, &PlotGeometry::new(&core.view, &layout))
            });
        if input_locked || consumed {
            self.interaction.cancel();
        } else {
            let outcome = self.interaction.process(
                &input,
                InteractionContext {
                    view: &mut core.view,
                    layout: &layout,
                    vfos: &mut *vfos,
                    single_click_move: self.single_click_move,
                    center_locked: self.center_locked,
                },
            );
            if outcome.view_changed {
                core.on_view_changed();
                vfos.mark_all_dirty();
            }
            if let Some(height) = outcome.split {
                self.fft_area_height = height;
                self.relayout(core, widget);
                vfos.mark_all_dirty();
                match &self.layout {
                    Some(new_layout) => layout = new_layout.clone(),
                    None => return outcome.events,
                }
            }
            events = outcome.events;
        }

        core.set_signal_span(vfos.selected().map(Vfo::span));
        refresh_geometry(vfos, &core.view, &layout);

        draw::chrome(surface, &layout, &self.theme);
        draw::spectrum(surface, core, &layout, &self.theme);
        if let Some(area) = layout.waterfall_area {
            self.draw_waterfall(surface, core, area);
            if input.pointer.is_some_and(|p| area.contains(p)) {
                draw::waterfall_vfos(surface, vfos, &self.theme);
            }
        }
        draw::vfos(surface, vfos, &self.theme);
        if let Some((plan, colors)) = band_plan.filter(|_| self.band_plan_visible) {
            draw::band_plan(
                surface,
                plan,
                colors,
                self.band_plan_position,
                &core.view,
                &layout,
                &self.theme,
            );
        }
        if let Some(overlay) = overlay.as_deref_mut() {
            overlay.draw(surface, &PlotGeometry::new(&core.view, &layout));
        }

        if let Some(height) = self.interaction.split_preview() {
            let y = widget.min.y + height;
            surface.line(
                Vec2::new(widget.min.x, y),
                Vec2::new(widget.max.x, y),
                self.theme.split_drag,
            );
        }

        if let Some(pointer) = input.pointer.filter(|p| widget.contains(*p)) {
            if !input_locked && !consumed {
                surface.set_cursor(self.interaction.cursor(pointer, &layout, vfos));
                if self.tooltips && *self.interaction.mode() == DragMode::Idle {
                    let lines = tooltip_lines(pointer, core, &layout, vfos);
                    if !lines.is_empty() {
                        surface.tooltip(pointer, &lines, &self.theme);
                    }
                }
            }
        }

        events
    }

    fn relayout(&mut self, core: &mut WaterfallCore, widget: Rect) {
        self.last_widget = Some(widget);
        self.layout_dirty = false;
        self.layout = Layout::compute(
            widget,
            self.fft_area_height,
            core.waterfall_visible,
            self.metrics,
        );
        let Some(layout) = &self.layout else {
            debug!(width = widget.width(), height = widget.height(), "widget too small to draw");
            return;
        };
        debug!(
            data_width = layout.data_width,
            waterfall_height = layout.waterfall_height,
            split = layout.split,
            "layout changed"
        );
        if let Err(err) = core.resize(layout.data_width, layout.waterfall_height) {
            warn!(%err, "display resize rejected");
        }
    }

    /// Copy a dirty image into the texture buffer and upload it if due.
    fn draw_waterfall(
        &mut self,
        surface: &mut dyn Surface,
        core: &mut WaterfallCore,
        area: Rect,
    ) {
        if std::mem::take(&mut core.fb_dirty) {
            self.texture.fill_from(&core.framebuffer);
        }
        let texture = &mut self.texture;
        if texture.take_pending() {
            surface.upload_texture(texture.width(), texture.height(), texture.pixels());
        }
        surface.draw_texture(area);
    }

    /// Direct access to the shared state. Holding the guard stalls the
    /// producer.
    pub fn lock_core(&self) -> MutexGuard<'_, WaterfallCore> {
        lock(&self.core)
    }

    pub fn layout(&self) -> Option<&Layout> {
        self.layout.as_ref()
    }

    pub fn drag_mode(&self) -> &DragMode {
        self.interaction.mode()
    }

    pub fn view(&self) -> ViewState {
        lock(&self.core).view.clone()
    }

    pub fn signal_info(&self) -> Option<SignalInfo> {
        lock(&self.core).signal()
    }

    pub fn fft_area_height(&self) -> f32 {
        self.fft_area_height
    }

    pub fn set_fft_area_height(&mut self, height: f32) {
        self.fft_area_height = height;
        self.layout_dirty = true;
    }

    pub fn waterfall_visible(&self) -> bool {
        lock(&self.core).waterfall_visible
    }

    pub fn set_waterfall_visible(&mut self, visible: bool) {
        lock(&self.core).set_waterfall_visible(visible);
        self.layout_dirty = true;
    }

    pub fn set_ui_scale(&mut self, metrics: LayoutMetrics, scale: f32) {
        self.metrics = metrics.scaled(scale);
        self.layout_dirty = true;
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn set_band_plan_visible(&mut self, visible: bool) {
        self.band_plan_visible = visible;
    }

    pub fn set_band_plan_position(&mut self, position: BandPlanPosition) {
        self.band_plan_position = position;
    }

    pub fn set_single_click_move(&mut self, enabled: bool) {
        self.single_click_move = enabled;
    }

    pub fn set_center_locked(&mut self, locked: bool) {
        self.center_locked = locked;
    }

    pub fn set_tooltips(&mut self, enabled: bool) {
        self.tooltips = enabled;
    }

    pub fn set_palette(&self, points: &[ColorPoint]) -> Result<()> {
        lock(&self.core).set_palette(points)
    }

    pub fn set_fft_range(&self, min: f32, max: f32) -> Result<()> {
        lock(&self.core).set_fft_range(min, max)
    }

    pub fn set_waterfall_range(&self, min: f32, max: f32) -> Result<()> {
        lock(&self.core).set_waterfall_range(min, max)
    }

    pub fn auto_range(&self) -> bool {
        lock(&self.core).auto_range()
    }

    pub fn set_hold(&self, enabled: bool, decay: f32) {
        lock(&self.core).set_hold(enabled, decay);
    }

    pub fn set_decimation(&self, mode: DecimationMode) {
        lock(&self.core).set_decimation(mode);
    }

    pub fn set_full_update(&self, full_update: bool) {
        lock(&self.core).set_full_update(full_update);
    }

    /// Retune. VFOs are offsets from the center so they ride along.
    pub fn set_center_freq(&self, freq: f64) {
        lock(&self.core).view.set_center_freq(freq);
    }

    /// New acquisition bandwidth. The zoom ratio is kept and VFOs left
    /// outside the band are pulled back in on the next frame.
    pub fn set_whole_bandwidth(&mut self, bandwidth: f64) -> Result<()> {
        let mut core = lock(&self.core);
        core.view.set_whole_bandwidth(bandwidth)?;
        core.on_view_changed();
        self.vfos_dirty = true;
        self.reclamp_vfos = true;
        Ok(())
    }

    pub fn set_view_bandwidth(&mut self, bandwidth: f64) -> Result<()> {
        let mut core = lock(&self.core);
        if core.view.set_view_bandwidth(bandwidth)? {
            core.on_view_changed();
            self.vfos_dirty = true;
        }
        Ok(())
    }

    pub fn set_view_offset(&mut self, offset: f64) {
        let mut core = lock(&self.core);
        if core.view.set_view_offset(offset) {
            core.on_view_changed();
            self.vfos_dirty = true;
        }
    }
}

fn refresh_geometry(vfos: &mut VfoSet, view: &ViewState, layout: &Layout) {
    for (_, vfo) in vfos.iter_mut() {
        vfo.update_geometry(view, layout);
    }
}

/// Hover text: the VFO under the pointer, or the frequency there.
fn tooltip_lines(
    pointer: Vec2,
    core: &WaterfallCore,
    layout: &Layout,
    vfos: &VfoSet,
) -> Vec<String> {
    let over_data = layout.fft_area.contains(pointer)
        || layout.waterfall_area.is_some_and(|wf| wf.contains(pointer));
    if !over_data {
        return Vec::new();
    }
    let view = &core.view;

    let hovered = vfos
        .iter()
        .find(|(_, vfo)| vfo.geometry().is_some_and(|g| g.hit_body(pointer)));
    if let Some((name, vfo)) = hovered {
        let mut lines = vec![
            name.to_owned(),
            format_frequency_long(view.center_freq() + vfo.center_offset()),
            format!("BW: {}", format_frequency_long(vfo.bandwidth())),
        ];
        if vfos.selected_name() == Some(name) {
            if let Some(info) = core.signal() {
                lines.push(format!("Strength: {:.1} dBFS", info.strength));
                lines.push(format!("SNR: {:.1} dB", info.snr));
            }
        }
        return lines;
    }

    match layout.column_at(pointer.x) {
        Some(column) => {
            let freq = view.x_to_freq(column as f64, layout.data_width as f64);
            vec![format_frequency_long(freq)]
        }
        None => Vec::new(),
    }
}
