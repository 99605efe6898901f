//! Figure description shared by the SVG and terminal renderers.
//!
//! Front-ends build a [`Figure`] from their data and hand it to
//! [`svg::write_svg`] (files) or [`ascii::render_ascii`] (`--show`).
//! The description is plain data, so it can be asserted on in tests without
//! rendering anything.

pub mod ascii;
pub mod svg;

pub use ascii::render_ascii;
pub use svg::write_svg;

/// Single-letter plot palette (`r g b c m k y`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Green,
    Blue,
    Cyan,
    Magenta,
    Black,
    Yellow,
}

impl Color {
    /// Colour cycle used for per-filling-fraction curves.
    pub const CYCLE: [Color; 10] = [
        Color::Red,
        Color::Green,
        Color::Blue,
        Color::Cyan,
        Color::Magenta,
        Color::Black,
        Color::Yellow,
        Color::Green,
        Color::Red,
        Color::Blue,
    ];

    pub fn cycle(i: usize) -> Color {
        Self::CYCLE[i % Self::CYCLE.len()]
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Color::Red => (255, 0, 0),
            Color::Green => (0, 128, 0),
            Color::Blue => (0, 0, 255),
            Color::Cyan => (0, 191, 191),
            Color::Magenta => (191, 0, 191),
            Color::Black => (0, 0, 0),
            Color::Yellow => (191, 191, 0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
    Dotted,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    None,
    Circle,
    Cross,
    Dot,
}

/// One plotted data series.
#[derive(Debug, Clone)]
pub struct Series {
    pub label: Option<String>,
    pub points: Vec<(f64, f64)>,
    pub color: Color,
    pub line: LineStyle,
    pub marker: Marker,
}

impl Series {
    pub fn line(points: Vec<(f64, f64)>, color: Color) -> Self {
        Self {
            label: None,
            points,
            color,
            line: LineStyle::Solid,
            marker: Marker::None,
        }
    }

    pub fn scatter(points: Vec<(f64, f64)>, color: Color, marker: Marker) -> Self {
        Self {
            label: None,
            points,
            color,
            line: LineStyle::None,
            marker,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_line(mut self, line: LineStyle) -> Self {
        self.line = line;
        self
    }

    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.marker = marker;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// A full-width or full-height reference line (`axhline` / `axvline`).
#[derive(Debug, Clone, Copy)]
pub struct Guide {
    pub orientation: Orientation,
    pub at: f64,
    pub color: Color,
    pub line: LineStyle,
}

/// Free text placed at data coordinates, centred horizontally, hanging below `y`.
#[derive(Debug, Clone)]
pub struct Annotation {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendPosition {
    UpperLeft,
    UpperRight,
}

#[derive(Debug, Clone)]
pub struct Figure {
    pub title: Option<String>,
    pub x_label: String,
    pub y_label: String,
    pub x_range: Option<(f64, f64)>,
    pub y_range: Option<(f64, f64)>,
    pub series: Vec<Series>,
    pub guides: Vec<Guide>,
    pub annotations: Vec<Annotation>,
    /// Explicit y tick positions and labels; `None` lets the renderer choose.
    pub y_ticks: Option<Vec<(f64, String)>>,
    pub legend: Option<LegendPosition>,
    /// Output size in pixels (SVG only).
    pub size: (u32, u32),
}

impl Figure {
    pub fn new(x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        Self {
            title: None,
            x_label: x_label.into(),
            y_label: y_label.into(),
            x_range: None,
            y_range: None,
            series: Vec::new(),
            guides: Vec::new(),
            annotations: Vec::new(),
            y_ticks: None,
            legend: None,
            size: (800, 600),
        }
    }

    pub fn push(&mut self, series: Series) {
        self.series.push(series);
    }

    pub fn hline(&mut self, y: f64, color: Color, line: LineStyle) {
        self.guides.push(Guide {
            orientation: Orientation::Horizontal,
            at: y,
            color,
            line,
        });
    }

    pub fn vline(&mut self, x: f64, color: Color, line: LineStyle) {
        self.guides.push(Guide {
            orientation: Orientation::Vertical,
            at: x,
            color,
            line,
        });
    }

    pub fn annotate(&mut self, text: impl Into<String>, x: f64, y: f64) {
        self.annotations.push(Annotation {
            text: text.into(),
            x,
            y,
        });
    }

    /// Axis bounds: explicit ranges where set, otherwise the data extent
    /// padded by 5% on each side. `None` when there is nothing to plot.
    pub fn bounds(&self) -> Option<((f64, f64), (f64, f64))> {
        let x = match self.x_range {
            Some(r) => r,
            None => pad_range(data_extent(self.series.iter().flat_map(|s| s.points.iter().map(|p| p.0)))?),
        };
        let y = match self.y_range {
            Some(r) => r,
            None => pad_range(data_extent(self.series.iter().flat_map(|s| s.points.iter().map(|p| p.1)))?),
        };
        (x.1 > x.0 && y.1 > y.0).then_some((x, y))
    }

    pub fn has_labels(&self) -> bool {
        self.series.iter().any(|s| s.label.is_some())
    }
}

fn data_extent(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    (lo.is_finite() && hi.is_finite()).then_some((lo, hi))
}

fn pad_range((min, max): (f64, f64)) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = if span > 0.0 { span * 0.05 } else { min.abs().max(1.0) * 0.05 };
    (min - pad, max + pad)
}
