//! SaavySdr - main application builder and runner

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
};
use saavy_sdr::{
    render::LayoutMetrics, Band, BandColor, BandColorTable, BandPlan, Rgba, Vfo, VfoSet,
    ViewState, WaterfallConfig, WaterfallRenderer,
};
use std::{io::stdout, thread};
use tracing::info;

use super::source::{Receiver, Tone};
use super::ui::{Bookmark, Bookmarks, ControlMessage, UiApp};

/// Control ring buffer capacity
const CONTROL_QUEUE: usize = 32;

/// Main application builder
pub struct SaavySdr {
    center_freq: f64,
    sample_rate: f64,
    fft_size: usize,
    tones: Vec<Tone>,
    vfos: VfoSet,
    bands: Vec<Band>,
    band_colors: BandColorTable,
    bookmarks: Vec<Bookmark>,
}

impl SaavySdr {
    /// Create a new receiver display with stock settings
    pub fn new() -> Self {
        Self {
            center_freq: 100e6,
            sample_rate: 2.4e6,
            fft_size: 4096,
            tones: Vec::new(),
            vfos: VfoSet::new(),
            bands: Vec::new(),
            band_colors: BandColorTable::new(),
            bookmarks: Vec::new(),
        }
    }

    /// Set the initial tuned frequency in Hz
    pub fn center_frequency(mut self, freq: f64) -> Self {
        self.center_freq = freq;
        self
    }

    /// Set the sample rate, which is also the displayed bandwidth
    pub fn sample_rate(mut self, rate: f64) -> Self {
        self.sample_rate = rate;
        self
    }

    pub fn fft_size(mut self, size: usize) -> Self {
        self.fft_size = size;
        self
    }

    /// Add a synthetic carrier for the receiver to produce
    pub fn tone(mut self, tone: Tone) -> Self {
        self.tones.push(tone);
        self
    }

    /// Add a VFO. The first one added starts selected.
    pub fn vfo(mut self, name: &str, vfo: Vfo) -> Self {
        self.vfos.insert(name, vfo);
        self
    }

    /// Add a band plan segment drawn in the given color
    pub fn band(mut self, name: &str, category: &str, start: f64, end: f64, color: Rgba) -> Self {
        self.band_colors.insert(category, BandColor::from_color(color));
        self.bands.push(Band {
            name: name.to_owned(),
            category: category.to_owned(),
            start,
            end,
        });
        self
    }

    /// Label a frequency on the plot; clicking it moves the selected VFO there
    pub fn bookmark(mut self, name: &str, freq: f64) -> Self {
        self.bookmarks.push(Bookmark {
            name: name.to_owned(),
            freq,
        });
        self
    }

    /// Run the application (takes over the terminal until `q`)
    pub fn run(mut self) -> EyreResult<()> {
        if self.fft_size < 2 {
            return Err(eyre!("fft size must be at least 2, got {}", self.fft_size));
        }
        let view = ViewState::new(self.center_freq, self.sample_rate)
            .wrap_err("invalid tuning")?;

        let config = WaterfallConfig {
            fft_area_height: 14.0,
            hold_enabled: true,
            fft_range: (-100.0, 0.0),
            waterfall_range: (-100.0, -20.0),
            band_plan_visible: !self.bands.is_empty(),
            metrics: LayoutMetrics::compact(),
            ..WaterfallConfig::default()
        };
        let (renderer, writer) = WaterfallRenderer::new(&config, view, self.fft_size)
            .wrap_err("failed to create waterfall")?;

        self.bands.sort_by(|a, b| a.start.total_cmp(&b.start));
        let band_plan = BandPlan {
            name: "demo".to_owned(),
            bands: self.bands,
        };

        info!(
            center = self.center_freq,
            sample_rate = self.sample_rate,
            fft_size = self.fft_size,
            vfos = self.vfos.len(),
            "starting"
        );

        // Control channel: UI -> receiver
        let (control_tx, control_rx) = rtrb::RingBuffer::<ControlMessage>::new(CONTROL_QUEUE);

        let receiver = Receiver::new(self.center_freq, self.sample_rate, self.fft_size, self.tones);
        let producer = thread::Builder::new()
            .name("receiver".into())
            .spawn(move || receiver.run(writer, control_rx))
            .wrap_err("failed to spawn receiver thread")?;

        let bookmarks = Bookmarks::new(self.bookmarks);
        let mut app = UiApp::new(
            renderer,
            self.vfos,
            band_plan,
            self.band_colors,
            bookmarks,
            control_tx,
        );

        let mut terminal = ratatui::init();
        let result = execute!(stdout(), EnableMouseCapture)
            .map_err(Into::into)
            .and_then(|()| app.run(&mut terminal));
        let _ = execute!(stdout(), DisableMouseCapture);
        ratatui::restore();

        app.shutdown();
        if producer.join().is_err() {
            return Err(eyre!("receiver thread panicked"));
        }
        result
    }
}

impl Default for SaavySdr {
    fn default() -> Self {
        Self::new()
    }
}
