//! ASCII plotting for terminal output (`--show`).
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - guide lines: `:`
//! - line series: one glyph per series from `*#+=%@&$`
//! - markers: `o` (circle), `x` (cross), `.` (dot)

use super::{Figure, LineStyle, Marker, Orientation, Series};

const LINE_GLYPHS: [char; 8] = ['*', '#', '+', '=', '%', '@', '&', '$'];

/// Render `figure` onto a `width` x `height` character grid.
pub fn render_ascii(figure: &Figure, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let Some(((x_min, x_max), (y_min, y_max))) = figure.bounds() else {
        return "Plot: (no data)\n".to_string();
    };

    let mut grid = vec![vec![' '; width]; height];

    for guide in &figure.guides {
        match guide.orientation {
            Orientation::Horizontal if guide.at >= y_min && guide.at <= y_max => {
                let y = map_y(guide.at, y_min, y_max, height);
                draw_line(&mut grid, 0, y, width - 1, y, ':');
            }
            Orientation::Vertical if guide.at >= x_min && guide.at <= x_max => {
                let x = map_x(guide.at, x_min, x_max, width);
                draw_line(&mut grid, x, 0, x, height - 1, ':');
            }
            _ => {}
        }
    }

    let glyphs: Vec<char> = figure
        .series
        .iter()
        .enumerate()
        .map(|(i, s)| glyph(s, i))
        .collect();

    // Lines first so markers overlay them.
    for (series, &ch) in figure.series.iter().zip(&glyphs) {
        if series.line != LineStyle::None && series.marker == Marker::None {
            draw_curve(&mut grid, &series.points, (x_min, x_max), (y_min, y_max), ch);
        }
    }
    for (series, &ch) in figure.series.iter().zip(&glyphs) {
        if series.marker == Marker::None {
            continue;
        }
        for &(x, y) in &series.points {
            if !(x.is_finite() && y.is_finite()) || x < x_min || x > x_max || y < y_min || y > y_max {
                continue;
            }
            grid[map_y(y, y_min, y_max, height)][map_x(x, x_min, x_max, width)] = ch;
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: {}=[{x_min:.3}, {x_max:.3}] | {}=[{y_min:.3}, {y_max:.3}]\n",
        figure.x_label, figure.y_label
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    for (series, ch) in figure.series.iter().zip(glyphs) {
        if let Some(label) = &series.label {
            out.push_str(&format!("  {ch}  {label}\n"));
        }
    }
    out
}

fn glyph(series: &Series, index: usize) -> char {
    match series.marker {
        Marker::Circle => 'o',
        Marker::Cross => 'x',
        Marker::Dot => '.',
        Marker::None => LINE_GLYPHS[index % LINE_GLYPHS.len()],
    }
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], xr: (f64, f64), yr: (f64, f64), ch: char) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in curve {
        if !(x.is_finite() && y.is_finite()) {
            prev = None;
            continue;
        }
        let gx = map_x(x, xr.0, xr.1, width);
        let gy = map_y(y, yr.0, yr.1, height);
        if let Some((x0, y0)) = prev {
            draw_line(grid, x0, y0, gx, gy, ch);
        } else {
            grid[gy][gx] = ch;
        }
        prev = Some((gx, gy));
    }
}

/// Integer line drawing (Bresenham-ish). Only blank cells are written.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && matches!(grid[y0 as usize][x0 as usize], ' ' | ':')
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
