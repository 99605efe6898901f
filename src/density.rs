//! Contact-density profiles from a radial data file.

use std::f64::consts::PI;
use std::path::{Path, PathBuf};

use crate::error::AppError;
use crate::io::table::load_table;
use crate::plot::{Color, Figure, LegendPosition, Marker, Series};

/// Labels of columns 1..=9, in file order.
pub const COLUMNS: [&str; 9] = [
    "density",
    "small contact density",
    "small centered contact density",
    "medium contact density",
    "medium centered contact density",
    "large contact density",
    "large centered contact density",
    "huge contact density",
    "huge centered contact density",
];

/// Number densities become filling fractions for unit-radius spheres.
const TO_FILLING_FRACTION: f64 = 4.0 * PI / 3.0;

/// Build the profile figure for one data file.
pub fn density_figure(path: &Path) -> Result<Figure, AppError> {
    let table = load_table(path)?;
    if table.cols() < COLUMNS.len() + 1 {
        return Err(AppError::data(format!(
            "'{}' has {} columns; a radius column plus {} density columns are required",
            path.display(),
            table.cols(),
            COLUMNS.len()
        )));
    }

    let radius = table.column(0)?;
    let mut fig = Figure::new("radius", "filling fraction");
    fig.legend = Some(LegendPosition::UpperLeft);
    fig.title = path.file_name().map(|n| n.to_string_lossy().into_owned());

    for (i, label) in COLUMNS.iter().enumerate() {
        let values = table.column(i + 1)?;
        let points = radius
            .iter()
            .zip(&values)
            .map(|(&r, &n)| (r, n * TO_FILLING_FRACTION))
            .collect();
        let marker = if i % 2 == 0 { Marker::Circle } else { Marker::Cross };
        fig.push(Series::line(points, Color::cycle(i)).with_marker(marker).with_label(*label));
    }
    Ok(fig)
}

/// `DIR/STEM.svg` for an input file `.../STEM.dat`.
pub fn figure_path(input: &Path, out_dir: Option<&Path>) -> PathBuf {
    let stem = input.file_stem().map(|s| s.to_os_string()).unwrap_or_else(|| "density".into());
    let dir = out_dir
        .map(Path::to_path_buf)
        .or_else(|| input.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    let mut name = stem;
    name.push(".svg");
    dir.join(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn builds_nine_scaled_series() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.dat");
        fs::write(
            &path,
            "# r n ...\n0.0 1 2 3 4 5 6 7 8 9\n0.1 1 1 1 1 1 1 1 1 1\n",
        )
        .unwrap();

        let fig = density_figure(&path).unwrap();
        assert_eq!(fig.series.len(), 9);
        assert_eq!(fig.series[0].label.as_deref(), Some("density"));
        assert_eq!(fig.series[8].label.as_deref(), Some("huge centered contact density"));
        assert_eq!(fig.series[0].marker, Marker::Circle);
        assert_eq!(fig.series[1].marker, Marker::Cross);
        assert!((fig.series[2].points[0].1 - 3.0 * TO_FILLING_FRACTION).abs() < 1e-12);
        assert_eq!(fig.x_label, "radius");
        assert_eq!(fig.y_label, "filling fraction");
        assert_eq!(fig.legend, Some(LegendPosition::UpperLeft));
    }

    #[test]
    fn too_few_columns_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.dat");
        fs::write(&path, "0.0 1 2\n").unwrap();
        assert_eq!(density_figure(&path).unwrap_err().exit_code(), 3);
    }

    #[test]
    fn figure_paths() {
        assert_eq!(
            figure_path(Path::new("data/run-1.dat"), None),
            PathBuf::from("data/run-1.svg")
        );
        assert_eq!(
            figure_path(Path::new("data/run-1.dat"), Some(Path::new("out"))),
            PathBuf::from("out/run-1.svg")
        );
    }
}
