use crate::geom::{Rect, Vec2};
use crate::render::layout::Layout;
use crate::view::ViewState;

use super::{Reference, Vfo};

/// Where a VFO lands on screen for one view/layout.
#[derive(Debug, Clone, PartialEq)]
pub struct VfoGeometry {
    /// Passband over the plot, clamped to the data span.
    pub rect: Rect,
    /// Reference line over the plot (top, bottom).
    pub line: (Vec2, Vec2),
    pub line_visible: bool,
    pub left_grip: Rect,
    pub right_grip: Rect,
    /// Lower edge fell left of the data span and was clamped.
    pub left_clamped: bool,
    /// Upper edge fell right of the data span and was clamped.
    pub right_clamped: bool,
    pub waterfall: Option<WaterfallGeometry>,
    pub notch: Option<Rect>,
}

/// Same passband projected over the waterfall image.
#[derive(Debug, Clone, PartialEq)]
pub struct WaterfallGeometry {
    pub rect: Rect,
    pub line: (Vec2, Vec2),
    pub left_grip: Rect,
    pub right_grip: Rect,
}

impl VfoGeometry {
    /// Point is over the passband, on the plot or on the waterfall.
    pub fn hit_body(&self, p: Vec2) -> bool {
        self.rect.contains(p) || self.waterfall.as_ref().is_some_and(|wf| wf.rect.contains(p))
    }

    /// Point is over a usable bandwidth grip. Grips of clamped edges are
    /// off-screen and never hit.
    pub fn hit_grip(&self, p: Vec2) -> bool {
        let wf = self.waterfall.as_ref();
        let left = !self.left_clamped
            && (self.left_grip.contains(p) || wf.is_some_and(|wf| wf.left_grip.contains(p)));
        let right = !self.right_clamped
            && (self.right_grip.contains(p) || wf.is_some_and(|wf| wf.right_grip.contains(p)));
        left || right
    }
}

pub(super) fn compute(vfo: &Vfo, view: &ViewState, layout: &Layout) -> Option<VfoGeometry> {
    if !(vfo.bandwidth() > 0.0) || !(view.view_bandwidth() > 0.0) || layout.data_width == 0 {
        return None;
    }

    let width = layout.data_width as f64;
    // `as` saturates and maps NaN to 0, so far-off VFOs clamp cleanly.
    let column = |offset: f64| view.offset_to_x(offset, width).round() as i64;

    let left = column(vfo.lower_offset());
    let right = column(vfo.upper_offset());
    let reference = match vfo.reference() {
        Reference::Lower => left,
        Reference::Center => column(vfo.center_offset()),
        Reference::Upper => right,
    };

    let last = layout.data_width as i64 - 1;
    let line_visible = (0..=last).contains(&reference);
    let left_c = left.clamp(0, last);
    let right_c = right.clamp(0, last);

    let x0 = layout.data_left();
    let top = layout.plot_top();
    let bottom = layout.plot_bottom();
    let grip = layout.metrics.grip_half_width;

    let rect = Rect::new(
        Vec2::new(x0 + left_c as f32, top),
        Vec2::new(x0 + right_c as f32 + 1.0, bottom),
    );
    let line_x = x0 + reference.clamp(0, last) as f32;
    let grips = |area_top: f32, area_bottom: f32| {
        (
            Rect::new(
                Vec2::new(rect.min.x - grip, area_top),
                Vec2::new(rect.min.x + grip, area_bottom),
            ),
            Rect::new(
                Vec2::new(rect.max.x - grip, area_top),
                Vec2::new(rect.max.x + grip, area_bottom),
            ),
        )
    };
    let (left_grip, right_grip) = grips(top, bottom);

    let waterfall = layout.waterfall_area.map(|wf| {
        let (left_grip, right_grip) = grips(wf.min.y, wf.max.y);
        WaterfallGeometry {
            rect: Rect::new(Vec2::new(rect.min.x, wf.min.y), Vec2::new(rect.max.x, wf.max.y)),
            line: (Vec2::new(line_x, wf.min.y), Vec2::new(line_x, wf.max.y)),
            left_grip,
            right_grip,
        }
    });

    let notch = vfo
        .notch_visible()
        .then(|| column(vfo.center_offset() + vfo.notch_offset()))
        .filter(|n| (0..=last).contains(n))
        .map(|n| {
            let half = layout.metrics.notch_half_width;
            let x = x0 + n as f32;
            Rect::new(Vec2::new(x - half, top), Vec2::new(x + half, bottom))
        });

    Some(VfoGeometry {
        rect,
        line: (Vec2::new(line_x, top - 1.0), Vec2::new(line_x, bottom - 1.0)),
        line_visible,
        left_grip,
        right_grip,
        left_clamped: left != left_c,
        right_clamped: right != right_c,
        waterfall,
        notch,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Rect;
    use crate::render::layout::LayoutMetrics;

    fn setup() -> (ViewState, Layout) {
        let mut view = ViewState::new(0.0, 1_000_000.0).unwrap();
        view.set_view_bandwidth(200_000.0).unwrap();
        // 800 data columns: 250 Hz per column
        let widget = Rect::from_xywh(0.0, 0.0, 860.0, 700.0);
        let layout = Layout::compute(widget, 300.0, true, LayoutMetrics::standard()).unwrap();
        (view, layout)
    }

    #[test]
    fn centered_vfo_geometry() {
        let (view, layout) = setup();
        let vfo = Vfo::new(0.0, 10_000.0, Reference::Center);
        let geo = vfo.compute_geometry(&view, &layout).unwrap();
        assert_eq!(geo.rect.min.x, 50.0 + 380.0);
        assert_eq!(geo.rect.max.x, 50.0 + 421.0);
        assert_eq!(geo.line.0.x, 50.0 + 400.0);
        assert!(geo.line_visible);
        assert!(!geo.left_clamped && !geo.right_clamped);
        let wf = geo.waterfall.unwrap();
        assert_eq!(wf.rect.min.y, 301.0);
    }

    #[test]
    fn edge_vfo_is_clamped() {
        let (view, layout) = setup();
        let vfo = Vfo::new(-100_000.0, 10_000.0, Reference::Center);
        let geo = vfo.compute_geometry(&view, &layout).unwrap();
        assert!(geo.left_clamped);
        assert!(!geo.right_clamped);
        assert!(geo.line_visible);
        assert_eq!(geo.rect.min.x, 50.0);
        // clamped grip never hits, the right one still does
        assert!(!geo.hit_grip(Vec2::new(50.0, 100.0)));
        assert!(geo.hit_grip(Vec2::new(geo.rect.max.x, 100.0)));
    }

    #[test]
    fn off_screen_reference_hides_line() {
        let (view, layout) = setup();
        let vfo = Vfo::new(150_000.0, 10_000.0, Reference::Lower);
        let geo = vfo.compute_geometry(&view, &layout).unwrap();
        assert!(!geo.line_visible);
        assert!(geo.left_clamped && geo.right_clamped);
    }

    #[test]
    fn zero_bandwidth_is_not_drawn() {
        let (view, layout) = setup();
        let vfo = Vfo::new(0.0, 0.0, Reference::Center);
        assert!(vfo.compute_geometry(&view, &layout).is_none());
    }

    #[test]
    fn notch_follows_center() {
        let (view, layout) = setup();
        let mut vfo = Vfo::new(0.0, 10_000.0, Reference::Center);
        vfo.set_notch_offset(2_500.0);
        assert!(vfo.compute_geometry(&view, &layout).unwrap().notch.is_none());
        vfo.set_notch_visible(true);
        let notch = vfo.compute_geometry(&view, &layout).unwrap().notch.unwrap();
        assert_eq!(notch.min.x, 50.0 + 410.0 - 2.0);
    }
}
