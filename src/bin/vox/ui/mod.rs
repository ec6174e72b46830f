//! TUI for vox
//!
//! Real-time view of the analysis pipeline: note and cents deviation,
//! pitch trace over the history window, input spectrum, and session
//! statistics.

pub mod spectrum;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    symbols,
    text::Line,
    widgets::{Axis, Block, Borders, Chart, Dataset, Gauge, GraphType, Paragraph},
    Frame,
};

use vox_dsp::analysis::history::{HistoryStats, VocalRange};
use vox_dsp::analysis::note::frequency_to_note;
use vox_dsp::tracker::{FrameReport, PitchTracker};

use spectrum::Spectrum;

/// Semitone index of a frequency relative to C0, the chart's y unit.
fn semitones_from_c0(freq: f32) -> f64 {
    // C0 sits 57 semitones below A4.
    57.0 + 12.0 * (freq as f64 / 440.0).log2()
}

/// Everything the renderer needs for one draw, refreshed each tick.
pub struct TunerState {
    pub sample_rate: f32,
    /// Latest per-frame report (kept across unvoiced ticks).
    pub report: Option<FrameReport>,
    /// (timestamp, semitones from C0) per history sample.
    pub trace: Vec<(f64, f64)>,
    pub stats: Option<HistoryStats>,
    pub range: Option<VocalRange>,
    pub dropped: u64,
    pub device_failed: bool,
}

impl TunerState {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            report: None,
            trace: Vec::new(),
            stats: None,
            range: None,
            dropped: 0,
            device_failed: false,
        }
    }

    /// Rebuild the chart trace and aggregates from the tracker.
    pub fn refresh(&mut self, tracker: &PitchTracker) {
        self.trace.clear();
        if let Some(history) = tracker.history() {
            self.trace.extend(
                history
                    .iter()
                    .map(|s| (s.timestamp, semitones_from_c0(s.estimate.frequency))),
            );
            self.stats = history.stats();
        }
        self.range = tracker.range();
        self.dropped = tracker.dropped_samples();
        self.device_failed = tracker.has_device_failed();
    }
}

pub fn render(frame: &mut Frame, state: &TunerState, spectrum: &Spectrum) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(frame.area());

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(1)])
        .split(chunks[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(8),
            Constraint::Min(6),
        ])
        .split(chunks[1]);

    render_trace(frame, left[0], state);
    render_help(frame, left[1], state);
    render_cents_gauge(frame, right[0], state);
    render_info(frame, right[1], state);
    render_spectrum(frame, right[2], spectrum);
}

/// Pitch trace over the history window, one point per voiced frame.
fn render_trace(frame: &mut Frame, area: Rect, state: &TunerState) {
    let (t_min, t_max) = state
        .trace
        .iter()
        .fold((f64::MAX, f64::MIN), |(lo, hi), (t, _)| {
            (lo.min(*t), hi.max(*t))
        });
    let (y_min, y_max) = state
        .trace
        .iter()
        .fold((f64::MAX, f64::MIN), |(lo, hi), (_, y)| {
            (lo.min(*y), hi.max(*y))
        });

    let (t_bounds, y_bounds) = if state.trace.is_empty() {
        ([0.0, 1.0], [24.0, 60.0]) // C2..C5 until something arrives
    } else {
        ([t_min, t_max.max(t_min + 1.0)], [y_min - 2.0, y_max + 2.0])
    };

    let dataset = Dataset::default()
        .name("pitch")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Scatter)
        .style(Style::default().fg(Color::Cyan))
        .data(&state.trace);

    let y_labels: Vec<_> = [y_bounds[0], (y_bounds[0] + y_bounds[1]) / 2.0, y_bounds[1]]
        .iter()
        .map(|semis| {
            let freq = 440.0 * 2.0_f64.powf((semis - 57.0) / 12.0);
            Line::from(frequency_to_note(freq as f32).to_string())
        })
        .collect();

    let chart = Chart::new(vec![dataset])
        .block(Block::default().title(" Pitch ").borders(Borders::ALL))
        .x_axis(Axis::default().title("s").bounds(t_bounds))
        .y_axis(Axis::default().bounds(y_bounds).labels(y_labels));

    frame.render_widget(chart, area);
}

/// Cents deviation from the nearest note, centered at zero.
fn render_cents_gauge(frame: &mut Frame, area: Rect, state: &TunerState) {
    let reading = state.report.as_ref().and_then(|r| r.reading);

    let (ratio, label, color) = match reading {
        Some(reading) => {
            let cents = reading.cents_offset;
            let color = if cents.abs() < 10.0 {
                Color::Green
            } else if cents.abs() < 25.0 {
                Color::Yellow
            } else {
                Color::Red
            };
            (
                f64::from((cents + 50.0) / 100.0).clamp(0.0, 1.0),
                format!("{reading} {cents:+.0} cents"),
                color,
            )
        }
        None => (0.5, "--".to_string(), Color::DarkGray),
    };

    let gauge = Gauge::default()
        .block(Block::default().title(" Tuning ").borders(Borders::ALL))
        .gauge_style(Style::default().fg(color))
        .ratio(ratio)
        .label(label);

    frame.render_widget(gauge, area);
}

fn render_info(frame: &mut Frame, area: Rect, state: &TunerState) {
    let mut lines: Vec<Line> = Vec::with_capacity(6);

    match &state.report {
        Some(report) => {
            match report.estimate {
                Some(estimate) => lines.push(
                    format!(
                        "Pitch: {:7.1} Hz   conf {:.2}",
                        estimate.frequency, estimate.confidence
                    )
                    .into(),
                ),
                None => lines.push("Pitch: unvoiced".to_string().into()),
            }
            lines.push(
                format!(
                    "Level: {:5.1} dBFS  peak {:.2}",
                    report.level.rms_dbfs(),
                    report.level.peak
                )
                .into(),
            );
        }
        None => lines.push("Waiting for audio...".to_string().into()),
    }

    if let Some(stats) = &state.stats {
        lines.push(
            format!(
                "Dominant {:2}  stability {:3.0}",
                stats.dominant_note.as_str(),
                stats.stability
            )
            .into(),
        );
    }
    if let Some(range) = &state.range {
        lines.push(
            format!(
                "Range: {} - {} ({:.1} st)",
                range.lowest_note(),
                range.highest_note(),
                range.semitone_span()
            )
            .into(),
        );
    }
    lines.push(format!("Rate:  {:.0} Hz", state.sample_rate).into());
    if state.dropped > 0 {
        lines.push(format!("Dropped samples: {}", state.dropped).into());
    }
    if state.device_failed {
        lines.push(
            Line::styled(
                "Device lost - press R to retry",
                Style::default().fg(Color::Red),
            ),
        );
    }

    let info = Paragraph::new(lines).block(Block::default().title(" Info ").borders(Borders::ALL));
    frame.render_widget(info, area);
}

fn render_spectrum(frame: &mut Frame, area: Rect, spectrum: &Spectrum) {
    let data = spectrum.points();
    let dataset = Dataset::default()
        .name("spectrum")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(data);

    let max_freq = data.iter().map(|(f, _)| *f).fold(1.0, f64::max);

    let chart = Chart::new(vec![dataset])
        .block(Block::default().title(" Spectrum ").borders(Borders::ALL))
        .x_axis(Axis::default().title("Hz").bounds([0.0, max_freq]))
        .y_axis(
            Axis::default()
                .title("dB")
                .bounds([-90.0, 0.0])
                .labels(vec![
                    Line::from("-90"),
                    Line::from("-45"),
                    Line::from("0"),
                ]),
        );

    frame.render_widget(chart, area);
}

fn render_help(frame: &mut Frame, area: Rect, _state: &TunerState) {
    let help = Paragraph::new(" [Q] Quit  [R] Restart measurement")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, area);
}
