//! Pointer and keyboard handling over the plot, scale strip and waterfall.
//!
//! One drag operation is active at a time. A button press picks the target
//! by priority (split hot zone, bandwidth grip, VFO body, frequency strip,
//! free plot area) and the mode sticks until release, so sweeping across
//! another element mid-drag never changes what is being dragged.

use tracing::debug;

use crate::geom::Vec2;
use crate::render::{CursorShape, InputState, Layout};
use crate::vfo::{keep_vfo_in_band, Reference, Vfo, VfoSet};
use crate::view::ViewState;

/// Fraction of the view span moved per wheel notch or arrow press.
const PAN_STEP_DIVISOR: f64 = 20.0;

/// Things the host application may want to react to.
#[derive(Debug, Clone, PartialEq)]
pub enum WaterfallEvent {
    SelectedVfoChanged { name: String },
    VfoMoved { name: String, offset: f64 },
    /// The user dragged a bandwidth edge. The owning demodulator should
    /// follow the new bandwidth.
    VfoBandwidthChanged { name: String, bandwidth: f64 },
    CenterFrequencyMoved { center_freq: f64 },
    SplitResized { fft_area_height: f32 },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragMode {
    #[default]
    Idle,
    ResizingSplit { height: f32 },
    ResizingVfoBand { vfo: String },
    PanningFreqAxis { last_x: f32 },
    MovingVfo,
}

/// Everything one input pass may read or change.
pub struct InteractionContext<'a> {
    pub view: &'a mut ViewState,
    pub layout: &'a Layout,
    pub vfos: &'a mut VfoSet,
    pub single_click_move: bool,
    pub center_locked: bool,
}

#[derive(Debug, Default)]
pub struct InteractionOutcome {
    pub events: Vec<WaterfallEvent>,
    /// View offset or zoom changed; derived buffers need a refresh.
    pub view_changed: bool,
    /// The split drag ended at this height.
    pub split: Option<f32>,
}

#[derive(Debug, Default)]
pub struct InteractionController {
    mode: DragMode,
    press_origin: Option<Vec2>,
    dragging: bool,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> &DragMode {
        &self.mode
    }

    /// Split height while the split is being dragged.
    pub fn split_preview(&self) -> Option<f32> {
        match self.mode {
            DragMode::ResizingSplit { height } => Some(height),
            _ => None,
        }
    }

    /// Drop any drag in progress, e.g. when a popup grabs input.
    pub fn cancel(&mut self) {
        self.mode = DragMode::Idle;
        self.press_origin = None;
        self.dragging = false;
    }

    pub fn process(
        &mut self,
        input: &InputState,
        mut ctx: InteractionContext<'_>,
    ) -> InteractionOutcome {
        let mut out = InteractionOutcome::default();

        if !input.primary_down && !input.primary_pressed {
            if self.mode != DragMode::Idle || self.press_origin.is_some() {
                self.finish(&mut out);
            }
            if let Some(pos) = input.pointer {
                self.scroll(pos, input, &mut ctx, &mut out);
            }
            return out;
        }

        let Some(pos) = input.pointer else {
            return out;
        };

        if input.primary_pressed {
            self.begin(pos, &mut ctx, &mut out);
        } else {
            self.drag(pos, &mut ctx, &mut out);
        }
        out
    }

    /// Cursor shape for the element under `pos`.
    pub fn cursor(&self, pos: Vec2, layout: &Layout, vfos: &VfoSet) -> CursorShape {
        match self.mode {
            DragMode::ResizingSplit { .. } => return CursorShape::ResizeVertical,
            DragMode::ResizingVfoBand { .. } => return CursorShape::ResizeHorizontal,
            _ => {}
        }
        if in_split_zone(pos, layout) {
            CursorShape::ResizeVertical
        } else if grip_under(pos, vfos).is_some() {
            CursorShape::ResizeHorizontal
        } else {
            CursorShape::Arrow
        }
    }

    fn begin(&mut self, pos: Vec2, ctx: &mut InteractionContext<'_>, out: &mut InteractionOutcome) {
        self.press_origin = Some(pos);
        self.dragging = false;
        let layout = ctx.layout;

        if in_split_zone(pos, layout) {
            self.mode = DragMode::ResizingSplit {
                height: layout.split,
            };
            return;
        }

        if let Some(name) = grip_under(pos, ctx.vfos) {
            debug!(vfo = %name, "bandwidth drag started");
            self.mode = DragMode::ResizingVfoBand { vfo: name };
            return;
        }

        let clicked = ctx
            .vfos
            .iter()
            .filter(|(name, _)| Some(*name) != ctx.vfos.selected_name())
            .find(|(_, vfo)| vfo.geometry().is_some_and(|g| g.hit_body(pos)))
            .map(|(name, _)| name.to_owned());
        if let Some(name) = clicked {
            ctx.vfos.select(&name);
            out.events.push(WaterfallEvent::SelectedVfoChanged { name });
            self.mode = DragMode::MovingVfo;
            return;
        }

        if layout.freq_area.contains(pos) {
            self.mode = DragMode::PanningFreqAxis { last_x: pos.x };
            return;
        }

        let over_data = layout.fft_area.contains(pos)
            || layout.waterfall_area.is_some_and(|wf| wf.contains(pos));
        if over_data && ctx.vfos.selected().is_some() {
            self.mode = DragMode::MovingVfo;
            if ctx.single_click_move {
                move_selected(pos, ctx, out);
            }
            return;
        }

        self.mode = DragMode::Idle;
    }

    fn drag(&mut self, pos: Vec2, ctx: &mut InteractionContext<'_>, out: &mut InteractionOutcome) {
        if !self.dragging {
            let origin = self.press_origin.unwrap_or(pos);
            let travel = (pos.x - origin.x).abs().max((pos.y - origin.y).abs());
            self.dragging = travel > ctx.layout.metrics.drag_threshold;
        }

        match &mut self.mode {
            DragMode::Idle => {}
            DragMode::ResizingSplit { height } => {
                let layout = ctx.layout;
                let lo = layout.metrics.min_fft_area_height;
                let hi = (layout.widget.height() - layout.metrics.bottom_reserve).max(lo);
                *height = (pos.y - layout.widget.min.y).clamp(lo, hi);
            }
            DragMode::ResizingVfoBand { vfo } => {
                let name = vfo.clone();
                resize_band(&name, pos, ctx, out);
            }
            DragMode::PanningFreqAxis { last_x } => {
                let dx = (pos.x - *last_x) as f64;
                *last_x = pos.x;
                if dx != 0.0 {
                    let hz = dx * ctx.view.hz_per_pixel(ctx.layout.data_width as f64);
                    pan(-hz, ctx, out);
                }
            }
            DragMode::MovingVfo => {
                if self.dragging {
                    move_selected(pos, ctx, out);
                }
            }
        }
    }

    fn finish(&mut self, out: &mut InteractionOutcome) {
        if let DragMode::ResizingSplit { height } = self.mode {
            debug!(height, "split drag committed");
            out.split = Some(height);
            out.events.push(WaterfallEvent::SplitResized {
                fft_area_height: height,
            });
        }
        self.cancel();
    }

    /// Wheel and arrow keys over the frequency strip pan without a drag.
    fn scroll(
        &mut self,
        pos: Vec2,
        input: &InputState,
        ctx: &mut InteractionContext<'_>,
        out: &mut InteractionOutcome,
    ) {
        if !ctx.layout.freq_area.contains(pos) {
            return;
        }
        let steps = input.wheel as f64 + input.key_right as f64 - input.key_left as f64;
        if steps != 0.0 {
            let step = ctx.view.view_bandwidth() / PAN_STEP_DIVISOR;
            pan(steps * step, ctx, out);
        }
    }
}

fn in_split_zone(pos: Vec2, layout: &Layout) -> bool {
    let Some(_) = layout.waterfall_area else {
        return false;
    };
    let split_y = layout.widget.min.y + layout.split;
    (pos.y - split_y).abs() <= layout.metrics.split_hot_zone
        && pos.x >= layout.widget.min.x
        && pos.x < layout.widget.max.x
}

/// Resizable VFO whose grip is under `pos`, the selected one first.
fn grip_under(pos: Vec2, vfos: &VfoSet) -> Option<String> {
    let hit = |vfo: &Vfo| !vfo.bandwidth_locked && vfo.geometry().is_some_and(|g| g.hit_grip(pos));
    if let Some(name) = vfos.selected_name() {
        if vfos.selected().is_some_and(hit) {
            return Some(name.to_owned());
        }
    }
    vfos.iter().find(|(_, vfo)| hit(vfo)).map(|(name, _)| name.to_owned())
}

fn pan(delta: f64, ctx: &mut InteractionContext<'_>, out: &mut InteractionOutcome) {
    let before = ctx.view.view_offset();
    let outcome = ctx.view.pan(delta, ctx.center_locked);
    if ctx.view.view_offset() != before {
        out.view_changed = true;
    }
    if outcome.center_moved() {
        out.events.push(WaterfallEvent::CenterFrequencyMoved {
            center_freq: ctx.view.center_freq(),
        });
    }
}

/// Put the selected VFO's reference point under the pointer, snapped.
fn move_selected(pos: Vec2, ctx: &mut InteractionContext<'_>, out: &mut InteractionOutcome) {
    let layout = ctx.layout;
    let Some(column) = layout.column_at(pos.x) else {
        return;
    };
    if pos.y < layout.widget.min.y || pos.y >= layout.widget.max.y {
        return;
    }
    let Some(name) = ctx.vfos.selected_name().map(str::to_owned) else {
        return;
    };

    let center = ctx.view.center_freq();
    let whole = ctx.view.whole_bandwidth();
    let mut offset = ctx.view.x_to_offset(column as f64, layout.data_width as f64);
    let Some(vfo) = ctx.vfos.get_mut(&name) else {
        return;
    };
    if vfo.snap_interval > 0.0 {
        offset = ((offset + center) / vfo.snap_interval).round() * vfo.snap_interval - center;
    }

    let before = vfo.general_offset();
    vfo.set_offset(offset);
    keep_vfo_in_band(vfo, whole);
    if vfo.general_offset() != before {
        out.events.push(WaterfallEvent::VfoMoved {
            name,
            offset: vfo.general_offset(),
        });
    }
}

/// Set a VFO's bandwidth from the pointer distance to its reference line.
fn resize_band(
    name: &str,
    pos: Vec2,
    ctx: &mut InteractionContext<'_>,
    out: &mut InteractionOutcome,
) {
    let layout = ctx.layout;
    let width = layout.data_width as f64;
    let half_whole = ctx.view.whole_bandwidth() / 2.0;
    let hz_per_px = ctx.view.hz_per_pixel(width);
    let Some(vfo) = ctx.vfos.get_mut(name) else {
        return;
    };

    let ref_x = layout.data_left() as f64 + ctx.view.offset_to_x(vfo.reference_offset(), width);
    let dist = pos.x as f64 - ref_x;
    let pixels = match vfo.reference() {
        Reference::Center => dist.abs() * 2.0,
        Reference::Lower => dist,
        Reference::Upper => -dist,
    };

    // Widest passband that still fits in the band around the fixed point.
    let band_max = match vfo.reference() {
        Reference::Lower => half_whole - vfo.lower_offset(),
        Reference::Upper => vfo.upper_offset() + half_whole,
        Reference::Center => {
            2.0 * (half_whole - vfo.center_offset()).min(vfo.center_offset() + half_whole)
        }
    }
    .max(0.0);

    let max_bw = vfo.max_bandwidth.max(vfo.min_bandwidth);
    let bandwidth = (pixels * hz_per_px)
        .clamp(vfo.min_bandwidth, max_bw)
        .min(band_max)
        .max(0.0);

    let before = vfo.bandwidth();
    vfo.set_bandwidth(bandwidth);
    keep_vfo_in_band(vfo, half_whole * 2.0);
    if vfo.bandwidth() != before {
        out.events.push(WaterfallEvent::VfoBandwidthChanged {
            name: name.to_owned(),
            bandwidth: vfo.bandwidth(),
        });
    }
}
