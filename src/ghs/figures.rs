//! The two g(r) comparison figures.

use crate::plot::{Color, Figure, LegendPosition, LineStyle, Marker, Series};
use crate::report::printf::fmt_f;

use super::data::McData;
use super::gil_villegas::g_gil_villegas;
use super::smoothing::avg_points;

/// Vertical window `(min, max)` of each stacked panel, per filling fraction.
pub const PANEL_RANGES: [(f64, f64); 9] = [
    (0.9, 1.2),
    (0.9, 1.4),
    (0.9, 1.7),
    (0.8, 1.8),
    (0.8, 2.3),
    (0.75, 2.5),
    (0.75, 3.2),
    (0.6, 4.0),
    (0.6, 5.0),
];

/// Gil-Villegas is shown as fitted below this radius, dotted up to `GIL_RMAX`.
pub const GIL_RCUTOFF: f64 = 3.6;
pub const GIL_RMAX: f64 = 4.0;
/// Path spacing of the averaged Monte Carlo markers.
pub const DPATH: f64 = 0.2;
const X_LIMITS: (f64, f64) = (1.8, 5.5);

/// Placement of the stacked panels, indexed by filling-fraction position.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelLayout {
    /// Filling fractions that get a panel.
    pub indexes: Vec<usize>,
    /// Offset added to a panel's g values.
    pub zeros: Vec<f64>,
    pub maxes: Vec<f64>,
    pub mines: Vec<f64>,
}

impl PanelLayout {
    /// Stack `ranges` bottom-up, one per filling fraction.
    ///
    /// With `skip_every_other`, only odd positions get panels and the even
    /// ranges collapse to nothing. Returns `None` when `ranges` and the
    /// filling-fraction count disagree.
    pub fn new(ranges: &[(f64, f64)], n_etas: usize, skip_every_other: bool) -> Option<Self> {
        if ranges.len() != n_etas || ranges.is_empty() {
            return None;
        }
        let mut ranges = ranges.to_vec();
        let indexes: Vec<usize> = if skip_every_other {
            for r in ranges.iter_mut().step_by(2) {
                *r = (0.0, 0.0);
            }
            (1..n_etas).step_by(2).collect()
        } else {
            (0..n_etas).collect()
        };

        let n = ranges.len();
        let mut zeros = vec![-ranges[0].0; n];
        let mut maxes = vec![ranges[0].1; n];
        let mut mines = vec![ranges[0].0; n];
        for i in 1..n {
            mines[i] = ranges[i].0;
            maxes[i] = ranges[i].1;
            zeros[i] = zeros[i - 1] + maxes[i - 1] - ranges[i].0;
        }
        zeros.reverse();
        maxes.reverse();
        mines.reverse();

        Some(Self {
            indexes,
            zeros,
            maxes,
            mines,
        })
    }

    /// Full y extent of the stack.
    pub fn y_range(&self) -> (f64, f64) {
        let last = self.zeros.len() - 1;
        (self.zeros[last] + self.mines[last], self.zeros[0] + self.maxes[0])
    }

    /// Tick positions and `%.1f` labels for panel `i`.
    pub fn ticks(&self, i: usize) -> Vec<(f64, String)> {
        let dg = if self.maxes[i] > 2.0 { 0.5 } else { 0.2 };
        let stop = self.maxes[i] - 0.001;
        let count = if stop > 0.0 { (stop / dg).ceil() as usize } else { 0 };
        (0..count)
            .map(|k| k as f64 * dg)
            .filter(|gg| *gg > self.mines[i] + 0.001)
            .map(|gg| (self.zeros[i] + gg, fmt_f(gg, 1)))
            .collect()
    }
}

fn curve(r: &[f64], g: &[f64], keep: impl Fn(f64) -> bool, offset: f64) -> Vec<(f64, f64)> {
    r.iter()
        .zip(g)
        .filter(|(r, _)| keep(**r))
        .map(|(&r, &g)| (r, g + offset))
        .collect()
}

fn gil_curve(set: &McData, sigma: f64) -> Vec<f64> {
    set.r.iter().map(|&r| g_gil_villegas(set.eta, r, sigma)).collect()
}

/// Every Monte Carlo g(r), plus fitted (dashed) and Gil-Villegas (dotted)
/// curves for the panelled filling fractions.
pub fn overview_figure(data: &[McData], fitted: &[Vec<f64>], panels: &[usize], sigma: f64) -> Figure {
    let mut fig = Figure::new("r", "g(r)");
    fig.size = (500, 400);
    fig.legend = Some(LegendPosition::UpperRight);
    fig.vline(sigma, Color::Black, LineStyle::Dotted);
    fig.hline(1.0, Color::Black, LineStyle::Dotted);

    for set in data {
        let color = Color::cycle(set.index);
        fig.push(
            Series::line(curve(&set.r, &set.g, |_| true, 0.0), color)
                .with_label(format!("η = {}", fmt_f(set.eta, 2))),
        );
    }
    for (set, fit) in data.iter().zip(fitted) {
        if !panels.contains(&set.index) {
            continue;
        }
        let color = Color::cycle(set.index);
        fig.push(Series::line(curve(&set.r, fit, |_| true, 0.0), color).with_line(LineStyle::Dashed));
        let gil = gil_curve(set, sigma);
        fig.push(
            Series::line(curve(&set.r, &gil, |r| r < GIL_RCUTOFF, 0.0), color).with_line(LineStyle::Dotted),
        );
    }
    fig
}

/// Stacked panels: one filling fraction each, offset vertically.
pub fn stacked_figure(
    data: &[McData],
    fitted: &[Vec<f64>],
    layout: &PanelLayout,
    r_cut: f64,
    sigma: f64,
) -> Figure {
    let mut fig = Figure::new("r/R", "g(r)");
    fig.size = (480, 640);
    fig.legend = Some(LegendPosition::UpperRight);
    fig.x_range = Some(X_LIMITS);
    fig.y_range = Some(layout.y_range());
    fig.vline(2.0, Color::Black, LineStyle::Dotted);

    let mut ticks = Vec::new();
    let mut labelled = false;
    for (set, fit) in data.iter().zip(fitted) {
        let i = set.index;
        if !layout.indexes.contains(&i) || i >= layout.zeros.len() {
            continue;
        }
        let offset = layout.zeros[i];
        fig.hline(offset + layout.maxes[i], Color::Black, LineStyle::Solid);
        fig.hline(offset + 1.0, Color::Black, LineStyle::Dotted);

        let label = |s: Series, text: &str| if labelled { s } else { s.with_label(text) };

        fig.push(label(
            Series::line(curve(&set.r, fit, |r| r < r_cut, offset), Color::Blue),
            "this work",
        ));
        fig.push(
            Series::line(curve(&set.r, fit, |r| r < 1.1 * r_cut, offset), Color::Blue)
                .with_line(LineStyle::Dotted),
        );

        let gil = gil_curve(set, sigma);
        fig.push(label(
            Series::line(curve(&set.r, &gil, |r| r < GIL_RCUTOFF, offset), Color::Magenta)
                .with_line(LineStyle::Dashed),
            "fit by Gil-Villegas",
        ));
        fig.push(
            Series::line(
                curve(&set.r, &gil, |r| r > GIL_RCUTOFF && r < GIL_RMAX, offset),
                Color::Magenta,
            )
            .with_line(LineStyle::Dotted),
        );

        let (r_avg, g_avg) = avg_points(&set.r, &set.g, DPATH);
        fig.push(label(
            Series::scatter(curve(&r_avg, &g_avg, |_| true, offset), Color::Black, Marker::Dot),
            "Monte Carlo",
        ));
        labelled = true;

        ticks.extend(layout.ticks(i));

        let frac = 1.0 / 3.0 + 0.03 * i as f64 - 0.1;
        fig.annotate(
            format!("η = {}", fmt_f(set.eta, 1)),
            (1.0 - frac) * X_LIMITS.0 + frac * X_LIMITS.1,
            offset + layout.maxes[i] - 0.14,
        );
    }
    fig.y_ticks = Some(ticks);
    fig
}
