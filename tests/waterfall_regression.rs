use saavy_sdr::{
    Band, BandColorTable, BandPlan, CursorShape, FrameContext, InputState, PlotGeometry, Rect,
    Reference, Rgba, Surface, Theme, Vec2, Vfo, VfoSet, ViewState, WaterfallConfig,
    WaterfallEvent, WaterfallOverlay, WaterfallRenderer,
};
use saavy_sdr::interaction::DragMode;

#[derive(Debug, Clone, PartialEq)]
enum Op {
    Line(Vec2, Vec2, Rgba),
    Rect(Rect, Rgba),
    Text(String),
    Upload(usize, usize),
    Texture(Rect),
    Tooltip(Vec<String>),
}

/// Records draw calls; 8x13 px monospace text.
#[derive(Default)]
struct Recorder {
    ops: Vec<Op>,
    input: InputState,
    cursor: CursorShape,
}

impl Recorder {
    fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    fn uploads(&self) -> Vec<(usize, usize)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Upload(w, h) => Some((*w, *h)),
                _ => None,
            })
            .collect()
    }

    fn lines_in(&self, color: Rgba) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, Op::Line(_, _, c) if *c == color))
            .count()
    }

    fn tooltip(&self) -> Option<&[String]> {
        self.ops.iter().find_map(|op| match op {
            Op::Tooltip(lines) => Some(lines.as_slice()),
            _ => None,
        })
    }
}

impl Surface for Recorder {
    fn line(&mut self, from: Vec2, to: Vec2, color: Rgba) {
        self.ops.push(Op::Line(from, to, color));
    }

    fn rect_filled(&mut self, rect: Rect, color: Rgba) {
        self.ops.push(Op::Rect(rect, color));
    }

    fn text(&mut self, _pos: Vec2, text: &str, _color: Rgba) {
        self.ops.push(Op::Text(text.to_owned()));
    }

    fn text_size(&self, text: &str) -> Vec2 {
        Vec2::new(8.0 * text.chars().count() as f32, 13.0)
    }

    fn upload_texture(&mut self, width: usize, height: usize, pixels: &[u32]) {
        assert_eq!(pixels.len(), width * height);
        self.ops.push(Op::Upload(width, height));
    }

    fn draw_texture(&mut self, rect: Rect) {
        self.ops.push(Op::Texture(rect));
    }

    fn input(&self) -> InputState {
        self.input
    }

    fn set_cursor(&mut self, cursor: CursorShape) {
        self.cursor = cursor;
    }

    fn tooltip(&mut self, _pos: Vec2, lines: &[String], _theme: &Theme) {
        self.ops.push(Op::Tooltip(lines.to_vec()));
    }
}

const RAW_WIDTH: usize = 2_000;

fn widget() -> Rect {
    // 800 data columns from x=50; plot y 10..260, scale strip to 300
    Rect::from_xywh(0.0, 0.0, 860.0, 700.0)
}

fn vfos() -> VfoSet {
    let mut vfos = VfoSet::new();
    vfos.insert("A", Vfo::new(0.0, 10_000.0, Reference::Center));
    vfos.insert("B", Vfo::new(60_000.0, 10_000.0, Reference::Lower));
    vfos
}

struct Harness {
    renderer: WaterfallRenderer,
    writer: saavy_sdr::SpectrumWriter,
    surface: Recorder,
    vfos: VfoSet,
}

impl Harness {
    fn new(config: WaterfallConfig) -> Self {
        let view = ViewState::new(100_000_000.0, 1_000_000.0).unwrap();
        let (mut renderer, writer) = WaterfallRenderer::new(&config, view, RAW_WIDTH).unwrap();
        // 250 Hz per column
        renderer.set_view_bandwidth(200_000.0).unwrap();
        Self {
            renderer,
            writer,
            surface: Recorder::default(),
            vfos: vfos(),
        }
    }

    fn frame(&mut self, input: InputState) -> Vec<WaterfallEvent> {
        self.surface.ops.clear();
        self.surface.input = input;
        self.renderer
            .render(&mut self.surface, FrameContext::new(widget(), &mut self.vfos))
    }

    fn idle(&mut self) -> Vec<WaterfallEvent> {
        self.frame(InputState::default())
    }
}

fn press(x: f32, y: f32) -> InputState {
    InputState {
        pointer: Some(Vec2::new(x, y)),
        primary_pressed: true,
        primary_down: true,
        ..Default::default()
    }
}

fn hold(x: f32, y: f32) -> InputState {
    InputState {
        pointer: Some(Vec2::new(x, y)),
        primary_down: true,
        ..Default::default()
    }
}

fn hover(x: f32, y: f32) -> InputState {
    InputState {
        pointer: Some(Vec2::new(x, y)),
        ..Default::default()
    }
}

fn carrier_line(bin: usize, level: f32) -> Vec<f32> {
    let mut line = vec![-90.0; RAW_WIDTH];
    line[bin] = level;
    line
}

#[test]
fn history_ring_returns_newest_first() {
    let config = WaterfallConfig {
        history_depth: Some(5),
        ..Default::default()
    };
    let mut h = Harness::new(config);
    for k in 0..13 {
        h.writer.push_line(&vec![k as f32; RAW_WIDTH]);
    }
    h.idle();
    let core = h.renderer.lock_core();
    let rows: Vec<f32> = (0..5).map(|k| core.history().row(k).unwrap()[0]).collect();
    assert_eq!(rows, vec![12.0, 11.0, 10.0, 9.0, 8.0]);
    assert!(core.history().row(5).is_none());
}

#[test]
fn texture_uploads_once_per_new_image() {
    let mut h = Harness::new(WaterfallConfig::default());
    h.idle();
    assert_eq!(h.surface.uploads(), vec![(800, 398)]);
    assert_eq!(h.surface.lines_in(Theme::default().trace), 0);

    h.writer.push_line(&carrier_line(1_000, -20.0));
    h.idle();
    assert_eq!(h.surface.uploads().len(), 1);
    assert_eq!(h.surface.lines_in(Theme::default().trace), 799);

    h.idle();
    assert!(h.surface.uploads().is_empty());
    let waterfall = Rect::new(Vec2::new(50.0, 301.0), Vec2::new(850.0, 699.0));
    assert!(h.surface.ops.contains(&Op::Texture(waterfall)));
}

#[test]
fn lines_between_frames_upload_one_image() {
    let mut h = Harness::new(WaterfallConfig::default());
    h.idle();
    for level in [-60.0, -40.0, -20.0] {
        h.writer.push_line(&carrier_line(1_000, level));
    }
    h.idle();
    assert_eq!(h.surface.uploads(), vec![(800, 398)]);
    assert_eq!(h.renderer.lock_core().history().filled(), 3);
    h.idle();
    assert!(h.surface.uploads().is_empty());
}

#[test]
fn first_vfo_is_selected() {
    let mut h = Harness::new(WaterfallConfig::default());
    assert_eq!(h.vfos.selected_name(), None);
    h.idle();
    assert_eq!(h.vfos.selected_name(), Some("A"));
}

#[test]
fn split_drag_relayouts_on_release() {
    let mut h = Harness::new(WaterfallConfig::default());
    h.frame(press(400.0, 300.0));
    assert_eq!(h.surface.cursor, CursorShape::ResizeVertical);

    h.frame(hold(400.0, 400.0));
    let preview = Op::Line(
        Vec2::new(0.0, 400.0),
        Vec2::new(860.0, 400.0),
        Theme::default().split_drag,
    );
    assert!(h.surface.ops.contains(&preview));
    assert_eq!(h.renderer.layout().unwrap().split, 300.0);

    let events = h.frame(hover(400.0, 400.0));
    assert_eq!(
        events,
        vec![WaterfallEvent::SplitResized {
            fft_area_height: 400.0
        }]
    );
    let layout = h.renderer.layout().unwrap();
    assert_eq!(layout.split, 400.0);
    assert_eq!(layout.waterfall_height, 298);
    assert_eq!(h.renderer.lock_core().framebuffer().height(), 298);
}

#[test]
fn scale_strip_drag_pans_then_retunes() {
    let mut h = Harness::new(WaterfallConfig::default());
    h.frame(press(400.0, 280.0));
    let events = h.frame(hold(300.0, 280.0));
    assert!(events.is_empty());
    assert_eq!(h.renderer.view().view_offset(), 25_000.0);
    h.frame(hover(300.0, 280.0));

    h.renderer.set_view_offset(400_000.0);
    h.frame(press(400.0, 280.0));
    let events = h.frame(hold(300.0, 280.0));
    assert_eq!(
        events,
        vec![WaterfallEvent::CenterFrequencyMoved {
            center_freq: 100_025_000.0
        }]
    );
}

#[test]
fn locked_center_stops_at_band_edge() {
    let config = WaterfallConfig {
        center_frequency_locked: true,
        ..Default::default()
    };
    let mut h = Harness::new(config);
    h.renderer.set_view_offset(400_000.0);
    h.frame(press(400.0, 280.0));
    let events = h.frame(hold(300.0, 280.0));
    assert!(events.is_empty());
    let view = h.renderer.view();
    assert_eq!(view.center_freq(), 100_000_000.0);
    assert_eq!(view.view_offset(), 400_000.0);
}

#[test]
fn grip_drag_reports_new_bandwidth() {
    let mut h = Harness::new(WaterfallConfig::default());
    h.idle();
    // A covers columns 380..=420, right edge at x=471
    h.frame(press(471.0, 100.0));
    assert!(matches!(h.renderer.drag_mode(), DragMode::ResizingVfoBand { .. }));
    let events = h.frame(hold(490.0, 100.0));
    assert_eq!(
        events,
        vec![WaterfallEvent::VfoBandwidthChanged {
            name: "A".into(),
            bandwidth: 20_000.0
        }]
    );
    assert_eq!(h.vfos.get("A").unwrap().upper_offset(), 10_000.0);
    h.frame(hover(490.0, 100.0));
    assert_eq!(h.renderer.drag_mode(), &DragMode::Idle);
}

#[test]
fn clicking_waterfall_selects_vfo_there() {
    let mut h = Harness::new(WaterfallConfig::default());
    h.idle();
    // B spans columns 640..680 on the waterfall as well
    let events = h.frame(press(710.0, 500.0));
    assert_eq!(
        events,
        vec![WaterfallEvent::SelectedVfoChanged { name: "B".into() }]
    );
    assert_eq!(h.vfos.selected_name(), Some("B"));
}

#[test]
fn locked_input_ignores_pointer() {
    let mut h = Harness::new(WaterfallConfig::default());
    h.idle();
    h.surface.input = press(471.0, 100.0);
    let events = h.renderer.render(
        &mut h.surface,
        FrameContext::new(widget(), &mut h.vfos).input_locked(true),
    );
    assert!(events.is_empty());
    assert_eq!(h.renderer.drag_mode(), &DragMode::Idle);
}

#[test]
fn band_plan_skips_hidden_bands_and_long_labels() {
    let config = WaterfallConfig {
        band_plan_visible: true,
        ..Default::default()
    };
    let mut h = Harness::new(config);
    let band = |name: &str, start: f64, end: f64| Band {
        name: name.into(),
        category: "amateur".into(),
        start,
        end,
    };
    let plan = BandPlan {
        name: "test".into(),
        bands: vec![
            band("In", 99_950_000.0, 100_050_000.0),
            band("a rather long band name", 100_060_000.0, 100_061_000.0),
            band("Out", 101_000_000.0, 102_000_000.0),
        ],
    };
    let colors = BandColorTable::new();
    h.surface.input = InputState::default();
    h.renderer.render(
        &mut h.surface,
        FrameContext::new(widget(), &mut h.vfos).band_plan(&plan, &colors),
    );
    let texts = h.surface.texts();
    assert!(texts.contains(&"In"));
    assert!(!texts.contains(&"Out"));
    assert!(!texts.contains(&"a rather long band name"));

    // Narrow band still gets its strip: 1 kHz is 4 columns
    let strip_fill = Rgba::new(255, 255, 255, 100);
    let strips = h
        .surface
        .ops
        .iter()
        .filter(|op| matches!(op, Op::Rect(_, c) if *c == strip_fill))
        .count();
    assert_eq!(strips, 2);
}

#[test]
fn hover_over_selected_vfo_shows_signal() {
    let mut h = Harness::new(WaterfallConfig::default());
    h.idle();
    // 2000 bins over 1 MHz: the center is bin 1000
    h.writer.push_line(&carrier_line(1_000, -20.0));
    h.frame(hover(450.0, 100.0));
    let lines = h.surface.tooltip().unwrap();
    assert_eq!(
        lines,
        &[
            "A".to_string(),
            "100.000000 MHz".to_string(),
            "BW: 10.000 kHz".to_string(),
            "Strength: -20.0 dBFS".to_string(),
            "SNR: 70.0 dB".to_string(),
        ]
    );
    let info = h.renderer.signal_info().unwrap();
    assert_eq!(info.strength, -20.0);
}

#[test]
fn hover_over_empty_plot_shows_frequency() {
    let mut h = Harness::new(WaterfallConfig::default());
    h.idle();
    h.frame(hover(50.0 + 200.0, 100.0));
    assert_eq!(
        h.surface.tooltip().unwrap(),
        &["99.950000 MHz".to_string()]
    );
}

#[test]
fn shrinking_band_pulls_vfos_inside() {
    let mut h = Harness::new(WaterfallConfig::default());
    h.vfos
        .insert("C", Vfo::new(450_000.0, 20_000.0, Reference::Center));
    h.idle();
    h.renderer.set_whole_bandwidth(500_000.0).unwrap();
    h.idle();
    assert_eq!(h.vfos.get("C").unwrap().center_offset(), 240_000.0);
    assert_eq!(h.renderer.view().view_bandwidth(), 100_000.0);
}

#[test]
fn tiny_widget_draws_background_only() {
    let mut h = Harness::new(WaterfallConfig::default());
    h.surface.input = InputState::default();
    let tiny = Rect::from_xywh(0.0, 0.0, 50.0, 50.0);
    h.renderer
        .render(&mut h.surface, FrameContext::new(tiny, &mut h.vfos));
    assert_eq!(h.surface.ops, vec![Op::Rect(tiny, Theme::default().background)]);
    assert!(h.renderer.layout().is_none());
}

/// Bookmark-style labels along the top of the plot that take clicks.
#[derive(Default)]
struct LabelStrip {
    plot: Option<PlotGeometry>,
    clicks: usize,
}

impl LabelStrip {
    const HEIGHT: f32 = 20.0;
}

impl WaterfallOverlay for LabelStrip {
    fn draw(&mut self, surface: &mut dyn Surface, plot: &PlotGeometry) {
        self.plot = Some(*plot);
        let x = plot.freq_to_x(100_065_000.0);
        surface.text(Vec2::new(x, plot.plot.min.y), "Net", Rgba::WHITE);
    }

    fn input(&mut self, input: &InputState, plot: &PlotGeometry) -> bool {
        let over = input
            .pointer
            .is_some_and(|p| plot.plot.contains(p) && p.y < plot.plot.min.y + Self::HEIGHT);
        if over && input.primary_pressed {
            self.clicks += 1;
        }
        over
    }
}

impl Harness {
    fn frame_with(&mut self, input: InputState, overlay: &mut LabelStrip) -> Vec<WaterfallEvent> {
        self.surface.ops.clear();
        self.surface.input = input;
        let frame = FrameContext::new(widget(), &mut self.vfos).overlay(overlay);
        self.renderer.render(&mut self.surface, frame)
    }
}

#[test]
fn overlay_draws_with_plot_geometry() {
    let mut h = Harness::new(WaterfallConfig::default());
    let mut labels = LabelStrip::default();
    h.frame_with(InputState::default(), &mut labels);

    let plot = labels.plot.unwrap();
    assert_eq!(plot.lower_freq, 99_900_000.0);
    assert_eq!(plot.upper_freq, 100_100_000.0);
    assert_eq!(plot.hz_per_pixel, 250.0);
    assert_eq!(plot.plot, h.renderer.layout().unwrap().fft_area);
    assert!(h.surface.texts().contains(&"Net"));
}

#[test]
fn consumed_click_leaves_vfos_alone() {
    let mut h = Harness::new(WaterfallConfig::default());
    let mut labels = LabelStrip::default();
    h.frame_with(InputState::default(), &mut labels);
    assert_eq!(h.vfos.selected_name(), Some("A"));

    // Over B's passband, inside the label strip
    let events = h.frame_with(press(710.0, 20.0), &mut labels);
    assert!(events.is_empty());
    assert_eq!(labels.clicks, 1);
    assert_eq!(h.vfos.selected_name(), Some("A"));
    assert_eq!(h.vfos.get("B").unwrap().lower_offset(), 60_000.0);
    assert_eq!(h.renderer.drag_mode(), &DragMode::Idle);
    assert!(h.surface.tooltip().is_none());

    // Same click without the overlay reaches the VFO
    h.frame(hover(710.0, 20.0));
    let events = h.frame(press(710.0, 20.0));
    assert_eq!(
        events,
        vec![WaterfallEvent::SelectedVfoChanged { name: "B".into() }]
    );
}
