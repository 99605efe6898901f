//! SVG rendering of a [`Figure`] with Plotters.
//!
//! Plotters is built without its font-kit/bitmap features, so text layout
//! uses the crate's built-in font metrics; the SVG viewer does the actual
//! glyph rendering.

use std::error::Error;
use std::path::Path;

use plotters::chart::{ChartContext, SeriesAnno, SeriesLabelPosition};
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::{Figure, LegendPosition, LineStyle, Marker, Orientation, Series};
use crate::error::AppError;

type Chart<'a, 'b> = ChartContext<'a, SVGBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Render `figure` into an SVG file at `path`.
pub fn write_svg(figure: &Figure, path: &Path) -> Result<(), AppError> {
    draw(figure, path)
        .map_err(|e| AppError::output(format!("Failed to render figure '{}': {e}", path.display())))?;
    tracing::info!(path = %path.display(), series = figure.series.len(), "wrote figure");
    Ok(())
}

fn draw(figure: &Figure, path: &Path) -> Result<(), Box<dyn Error>> {
    let ((x0, x1), (y0, y1)) = figure
        .bounds()
        .ok_or("figure has no finite data to derive axis ranges from")?;

    let root = SVGBackend::new(path, figure.size).into_drawing_area();
    root.fill(&WHITE)?;

    let mut builder = ChartBuilder::on(&root);
    builder.margin(15).x_label_area_size(45).y_label_area_size(60);
    if let Some(title) = &figure.title {
        builder.caption(title, ("sans-serif", 18));
    }
    let mut chart = builder.build_cartesian_2d(x0..x1, y0..y1)?;

    {
        let mut mesh = chart.configure_mesh();
        mesh.disable_mesh()
            .x_desc(figure.x_label.as_str())
            .y_desc(figure.y_label.as_str())
            .label_style(("sans-serif", 14));
        if figure.y_ticks.is_some() {
            mesh.y_labels(0);
        }
        mesh.draw()?;
    }

    for guide in &figure.guides {
        let points = match guide.orientation {
            Orientation::Horizontal => vec![(x0, guide.at), (x1, guide.at)],
            Orientation::Vertical => vec![(guide.at, y0), (guide.at, y1)],
        };
        draw_path(&mut chart, &points, rgb(guide.color), guide.line)?;
    }

    for series in &figure.series {
        draw_one(&mut chart, series)?;
    }

    if let Some(ticks) = &figure.y_ticks {
        let style = TextStyle::from(("sans-serif", 12).into_font()).pos(Pos::new(HPos::Right, VPos::Center));
        chart.draw_series(ticks.iter().map(|(y, label)| {
            EmptyElement::at((x0, *y))
                + PathElement::new(vec![(0, 0), (-5, 0)], BLACK.stroke_width(1))
                + Text::new(label.clone(), (-8, 0), style.clone())
        }))?;
    }

    if !figure.annotations.is_empty() {
        let style = TextStyle::from(("sans-serif", 14).into_font()).pos(Pos::new(HPos::Center, VPos::Top));
        chart.draw_series(
            figure
                .annotations
                .iter()
                .map(|a| Text::new(a.text.clone(), (a.x, a.y), style.clone())),
        )?;
    }

    if let Some(position) = figure.legend.filter(|_| figure.has_labels()) {
        chart
            .configure_series_labels()
            .position(match position {
                LegendPosition::UpperLeft => SeriesLabelPosition::UpperLeft,
                LegendPosition::UpperRight => SeriesLabelPosition::UpperRight,
            })
            .background_style(&WHITE.mix(0.5))
            .border_style(&BLACK)
            .label_font(("sans-serif", 13))
            .draw()?;
    }

    root.present()?;
    Ok(())
}

fn draw_one(chart: &mut Chart<'_, '_>, series: &Series) -> Result<(), Box<dyn Error>> {
    let color = rgb(series.color);
    let label_on_line = series.marker == Marker::None;

    if series.line != LineStyle::None {
        if let Some(anno) = draw_path(chart, &series.points, color, series.line)? {
            if label_on_line {
                attach_label(anno, series, color);
            }
        }
    }

    let anno = match series.marker {
        Marker::None => return Ok(()),
        Marker::Circle => chart.draw_series(
            series
                .points
                .iter()
                .map(|&p| Circle::new(p, 3, color.stroke_width(1))),
        )?,
        Marker::Dot => chart.draw_series(series.points.iter().map(|&p| Circle::new(p, 2, color.filled())))?,
        Marker::Cross => chart.draw_series(
            series
                .points
                .iter()
                .map(|&p| Cross::new(p, 3, color.stroke_width(1))),
        )?,
    };
    attach_label(anno, series, color);
    Ok(())
}

fn draw_path<'c, 'a, 'b>(
    chart: &'c mut Chart<'a, 'b>,
    points: &[(f64, f64)],
    color: RGBColor,
    line: LineStyle,
) -> Result<Option<&'c mut SeriesAnno<'a, SVGBackend<'b>>>, Box<dyn Error>> {
    let style = color.stroke_width(1);
    let anno = match line {
        LineStyle::None => return Ok(None),
        LineStyle::Solid => chart.draw_series(LineSeries::new(points.iter().copied(), style))?,
        LineStyle::Dashed => chart.draw_series(DashedLineSeries::new(points.iter().copied(), 8, 5, style))?,
        LineStyle::Dotted => chart.draw_series(DashedLineSeries::new(points.iter().copied(), 2, 3, style))?,
    };
    Ok(Some(anno))
}

fn attach_label(anno: &mut SeriesAnno<'_, SVGBackend<'_>>, series: &Series, color: RGBColor) {
    if let Some(label) = &series.label {
        anno.label(label.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }
}

fn rgb(color: super::Color) -> RGBColor {
    let (r, g, b) = color.rgb();
    RGBColor(r, g, b)
}
