//! TUI module for saavy-sdr
//!
//! Renders the waterfall widget into the terminal and turns crossterm mouse
//! and key events into per-frame pointer state.

mod bookmarks;
pub mod state;
mod surface;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::Producer;
use saavy_sdr::{
    geom::{Rect, Vec2},
    render::format_frequency_long,
    BandColorTable, BandPlan, CursorShape, FrameContext, InputState, VfoSet, WaterfallEvent,
    WaterfallRenderer,
};
use std::time::Duration;
use tracing::{debug, warn};

pub use bookmarks::{Bookmark, Bookmarks};
pub use state::ControlMessage;
use surface::CellCanvas;

/// Zoom factor per key press
const ZOOM_STEP: f64 = 2.0;

/// UI application state
pub struct UiApp {
    renderer: WaterfallRenderer,
    vfos: VfoSet,
    band_plan: BandPlan,
    band_colors: BandColorTable,
    bookmarks: Bookmarks,
    /// Ring buffer sender for receiver commands
    control_tx: Producer<ControlMessage>,
    canvas: CellCanvas,
    /// Input gathered since the last frame
    input: InputState,
    paused: bool,
    hold: bool,
    /// Whether the app should quit
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        renderer: WaterfallRenderer,
        vfos: VfoSet,
        band_plan: BandPlan,
        band_colors: BandColorTable,
        bookmarks: Bookmarks,
        control_tx: Producer<ControlMessage>,
    ) -> Self {
        Self {
            renderer,
            vfos,
            band_plan,
            band_colors,
            bookmarks,
            control_tx,
            canvas: CellCanvas::new(),
            input: InputState::default(),
            paused: false,
            hold: true,
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            terminal.draw(|frame| self.render(frame))?;

            // Start the next frame's input from the held button state only
            self.input = InputState {
                pointer: self.input.pointer,
                primary_down: self.input.primary_down,
                ..InputState::default()
            };

            // Block for up to one frame (~60fps), then drain whatever queued up
            if event::poll(Duration::from_millis(16))? {
                self.handle_event(event::read()?);
                while event::poll(Duration::ZERO)? {
                    self.handle_event(event::read()?);
                }
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        self.input.pointer = Some(Vec2::new(mouse.column as f32, mouse.row as f32));
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.input.primary_pressed = true;
                self.input.primary_down = true;
            }
            MouseEventKind::Up(MouseButton::Left) => self.input.primary_down = false,
            MouseEventKind::ScrollUp => self.input.wheel += 1.0,
            MouseEventKind::ScrollDown => self.input.wheel -= 1.0,
            _ => {}
        }
    }

    /// Handle keyboard input
    fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Left => self.input.key_left += 1,
            KeyCode::Right => self.input.key_right += 1,
            KeyCode::Char('+') | KeyCode::Char('=') => self.zoom(1.0 / ZOOM_STEP),
            KeyCode::Char('-') => self.zoom(ZOOM_STEP),
            KeyCode::Char('a') => {
                if !self.renderer.auto_range() {
                    debug!("auto range skipped, no history yet");
                }
            }
            KeyCode::Char('h') => {
                self.hold = !self.hold;
                self.renderer.set_hold(self.hold, 0.3);
            }
            KeyCode::Char('w') => {
                let visible = self.renderer.waterfall_visible();
                self.renderer.set_waterfall_visible(!visible);
            }
            KeyCode::Char('p') => {
                self.paused = !self.paused;
                self.send(ControlMessage::TogglePause);
            }
            _ => {}
        }
    }

    fn zoom(&mut self, factor: f64) {
        let view = self.renderer.view();
        let bandwidth = (view.view_bandwidth() * factor).min(view.whole_bandwidth());
        if let Err(err) = self.renderer.set_view_bandwidth(bandwidth) {
            warn!(%err, "zoom rejected");
        }
    }

    fn send(&mut self, msg: ControlMessage) {
        if self.control_tx.push(msg).is_err() {
            warn!(?msg, "control queue full, message dropped");
        }
    }

    /// Tell the receiver to stop. It drains the queue every line, so a full
    /// queue frees up shortly.
    pub fn shutdown(&mut self) {
        while self.control_tx.push(ControlMessage::Quit).is_err() {
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    /// Move the selected VFO's passband onto an absolute frequency.
    fn jump_to(&mut self, freq: f64) {
        let view = self.renderer.view();
        let (offset, whole) = (freq - view.center_freq(), view.whole_bandwidth());
        let Some(vfo) = self.vfos.selected_mut() else {
            return;
        };
        vfo.set_center_offset(offset);
        self.vfos.keep_in_band(whole);
        debug!(freq, "jumped to bookmark");
    }

    fn handle_events(&mut self, events: Vec<WaterfallEvent>) {
        for event in events {
            debug!(?event, "waterfall event");
            if let WaterfallEvent::CenterFrequencyMoved { center_freq } = event {
                self.send(ControlMessage::Tune(center_freq));
            }
        }
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(8),    // Waterfall widget
                Constraint::Length(1), // Status bar
            ])
            .split(frame.area());
        let area = chunks[0];

        // Pointer positions are terminal cells; the widget starts at the area origin
        let mut input = self.input;
        input.pointer = input
            .pointer
            .map(|p| Vec2::new(p.x - area.x as f32, p.y - area.y as f32));

        self.canvas
            .begin(area.width as usize, area.height as usize, input);
        let widget = Rect::from_xywh(0.0, 0.0, area.width as f32, area.height as f32);
        let context = FrameContext::new(widget, &mut self.vfos)
            .band_plan(&self.band_plan, &self.band_colors)
            .overlay(&mut self.bookmarks);
        let events = self.renderer.render(&mut self.canvas, context);
        frame.render_widget(&self.canvas, area);
        self.handle_events(events);
        if let Some(freq) = self.bookmarks.take_pending() {
            self.jump_to(freq);
        }

        frame.render_widget(self.status_line(), chunks[1]);
    }

    fn status_line(&self) -> Paragraph<'static> {
        let view = self.renderer.view();
        let mut spans = vec![
            Span::styled(
                format!(" {} ", format_frequency_long(view.center_freq())),
                Style::default().fg(Color::Black).bg(Color::Cyan),
            ),
            Span::raw(format!(
                " span {} ",
                format_frequency_long(view.view_bandwidth())
            )),
        ];
        if let Some(name) = self.vfos.selected_name() {
            spans.push(Span::raw(format!("| {name} ")));
        }
        if let Some(info) = self.renderer.signal_info() {
            spans.push(Span::raw(format!(
                "{:.1} dBFS  SNR {:.1} dB ",
                info.strength, info.snr
            )));
        }
        if self.paused {
            spans.push(Span::styled(" PAUSED ", Style::default().fg(Color::Yellow)));
        }
        let hint = match self.canvas.cursor() {
            CursorShape::ResizeHorizontal => "drag: bandwidth",
            CursorShape::ResizeVertical => "drag: split",
            CursorShape::Arrow => "+/- zoom  a auto  h hold  w waterfall  p pause  q quit",
        };
        spans.push(Span::styled(
            format!("  {hint}"),
            Style::default().fg(Color::DarkGray),
        ));
        Paragraph::new(Line::from(spans))
    }
}
