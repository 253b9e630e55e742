//! Per-frame drawing passes. Each takes what it draws from explicitly and
//! issues primitives against the [`Surface`]; none of them can fail.

use crate::bandplan::{BandColor, BandColorTable, BandPlan, BandPlanPosition};
use crate::geom::{Rect, Rgba, Vec2};
use crate::render::{best_step, format_frequency, Layout, Surface, Theme};
use crate::vfo::VfoSet;
use crate::view::ViewState;

use super::WaterfallCore;

/// Widest label the frequency axis has to fit.
const LABEL_TEMPLATE: &str = "000.000";

/// Frame, background and the split separator.
pub(super) fn chrome(surface: &mut dyn Surface, layout: &Layout, theme: &Theme) {
    let widget = layout.widget;
    surface.rect_filled(widget, theme.background);
    surface.rect_outline(widget, theme.border);
    if layout.waterfall_area.is_some() {
        let y = widget.min.y + layout.split;
        surface.line(Vec2::new(widget.min.x, y), Vec2::new(widget.max.x, y), theme.border);
    }
}

/// Grid, axis labels, live trace and hold trace.
pub(super) fn spectrum(
    surface: &mut dyn Surface,
    core: &WaterfallCore,
    layout: &Layout,
    theme: &Theme,
) {
    let view = &core.view;
    let (fft_min, fft_max) = view.fft_range();
    let left = layout.data_left();
    let right = left + layout.data_width as f32;
    let top = layout.plot_top();
    let bottom = layout.plot_bottom();
    let scale = layout.plot_height() / (fft_max - fft_min);
    let label = surface.text_size(LABEL_TEMPLATE);

    // Level grid
    let max_v_steps = (layout.plot_height() / label.y.max(1.0)) as usize;
    let v_step = best_step((fft_max - fft_min) as f64, max_v_steps) as f32;
    let first = (fft_max / v_step).floor() * v_step;
    for i in 0..=max_v_steps.max(1) {
        let level = first - i as f32 * v_step;
        if level <= fft_min {
            break;
        }
        let y = (bottom - (level - fft_min) * scale).round();
        surface.line(Vec2::new(left, y), Vec2::new(right, y), theme.grid);
        let text = format!("{}", level as i32);
        let size = surface.text_size(&text);
        let x = (left - 10.0 - size.x).max(layout.widget.min.x);
        surface.text(Vec2::new(x, (y - size.y / 2.0).round()), &text, theme.label);
    }

    // Frequency grid
    let width = layout.data_width as f64;
    let lower = view.lower_freq();
    let upper = view.upper_freq();
    let max_h_steps = (width / (label.x as f64 + 10.0)) as usize;
    let step = best_step(view.view_bandwidth(), max_h_steps);
    let first = (lower / step).ceil();
    let px_per_hz = width / view.view_bandwidth();
    let label_y = (bottom + label.y).min(layout.freq_area.max.y - label.y);
    let tick_end = (bottom + 7.0).min(label_y);
    for i in 0..=max_h_steps + 1 {
        let freq = (first + i as f64) * step;
        if freq >= upper {
            break;
        }
        let x = (left as f64 + (freq - lower) * px_per_hz).round() as f32;
        surface.line(Vec2::new(x, top - 1.0), Vec2::new(x, bottom), theme.grid);
        surface.line(Vec2::new(x, bottom), Vec2::new(x, tick_end), theme.axis);
        let text = format_frequency(freq);
        let size = surface.text_size(&text);
        surface.text(Vec2::new((x - size.x / 2.0).round(), label_y), &text, theme.label);
    }

    if !core.history.is_empty() {
        trace(surface, &core.live, layout, fft_min, scale, theme.trace, Some(theme.trace_fill));
        if core.hold_enabled {
            trace(surface, &core.hold, layout, fft_min, scale, theme.hold_trace, None);
        }
    }

    surface.line(Vec2::new(left, bottom), Vec2::new(right, bottom), theme.axis);
    surface.line(Vec2::new(left, top - 1.0), Vec2::new(left, bottom - 1.0), theme.axis);
}

fn trace(
    surface: &mut dyn Surface,
    line: &[f32],
    layout: &Layout,
    fft_min: f32,
    scale: f32,
    color: Rgba,
    fill: Option<Rgba>,
) {
    let left = layout.data_left();
    let top = layout.plot_top();
    let bottom = layout.plot_bottom();
    let y = |db: f32| (bottom - (db - fft_min) * scale).clamp(top, bottom).round();

    for (i, pair) in line.windows(2).enumerate() {
        let x = left + i as f32 + 1.0;
        let a = y(pair[0]);
        let b = y(pair[1]);
        surface.line(Vec2::new(x - 1.0, a), Vec2::new(x, b), color);
        if let Some(fill) = fill {
            surface.line(Vec2::new(x, b), Vec2::new(x, bottom), fill);
        }
    }
}

/// Passband boxes, reference lines and notches over the plot.
pub(super) fn vfos(surface: &mut dyn Surface, vfos: &VfoSet, theme: &Theme) {
    let selected = vfos.selected_name();
    for (name, vfo) in vfos.iter() {
        let Some(geometry) = vfo.geometry() else {
            continue;
        };
        surface.rect_filled(geometry.rect, vfo.color);
        if geometry.line_visible {
            let color = line_color(theme, Some(name) == selected);
            surface.line(geometry.line.0, geometry.line.1, color);
        }
        if let Some(notch) = geometry.notch {
            surface.rect_filled(notch, theme.notch);
        }
    }
}

/// The same passbands over the waterfall, shown while the pointer is on it.
pub(super) fn waterfall_vfos(surface: &mut dyn Surface, vfos: &VfoSet, theme: &Theme) {
    let selected = vfos.selected_name();
    for (name, vfo) in vfos.iter() {
        let Some(wf) = vfo.geometry().and_then(|g| g.waterfall.as_ref()) else {
            continue;
        };
        surface.rect_filled(wf.rect, vfo.color);
        surface.line(wf.line.0, wf.line.1, line_color(theme, Some(name) == selected));
    }
}

fn line_color(theme: &Theme, selected: bool) -> Rgba {
    if selected {
        theme.vfo_line_selected
    } else {
        theme.vfo_line
    }
}

/// Band plan strip along the top or bottom of the plot.
///
/// Bands entirely outside the view are skipped; names that do not fit
/// inside their band are left out.
pub(super) fn band_plan(
    surface: &mut dyn Surface,
    plan: &BandPlan,
    colors: &BandColorTable,
    position: BandPlanPosition,
    view: &ViewState,
    layout: &Layout,
    theme: &Theme,
) {
    let lower = view.lower_freq();
    let upper = view.upper_freq();
    let left = layout.data_left();
    let px_per_hz = layout.data_width as f64 / view.view_bandwidth();
    let x_at = |freq: f64| left + ((freq - lower) * px_per_hz) as f32;

    let height = surface.text_size("0").y * 2.5;
    let strip_bottom = match position {
        BandPlanPosition::Bottom => layout.plot_bottom(),
        BandPlanPosition::Top => layout.plot_top() + height,
    };

    for band in plan.visible(lower, upper) {
        let start_visible = band.start > lower;
        let end_visible = band.end < upper;
        let start = band.start.clamp(lower, upper);
        let end = band.end.clamp(lower, upper);
        let a = x_at(start);
        let b = x_at(end);
        let center = x_at((start + end) / 2.0);
        let width = b - a;
        let color = colors
            .find(&band.category)
            .unwrap_or_else(|| BandColor::from_color(theme.band_default));

        if width >= 1.0 {
            let a = a.max(left + 1.0).round();
            let b = b.max(left + 1.0).round();
            let fill = Rect::new(Vec2::new(a, strip_bottom - height), Vec2::new(b, strip_bottom));
            surface.rect_filled(fill, color.fill);
            let edge = |x: f32| {
                (
                    Vec2::new(x, strip_bottom - height - 1.0),
                    Vec2::new(x, strip_bottom - 1.0),
                )
            };
            if start_visible {
                let (p, q) = edge(a);
                surface.line(p, q, color.edge);
            }
            if end_visible {
                let (p, q) = edge(b);
                surface.line(p, q, color.edge);
            }
        }

        let size = surface.text_size(&band.name);
        if size.x <= width {
            let pos = Vec2::new(
                center - size.x / 2.0,
                strip_bottom - height / 2.0 - size.y / 2.0,
            );
            surface.text(pos, &band.name, theme.label);
        }
    }
}
