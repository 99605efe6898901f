//! Free energy from insertion success ratios.

use crate::plot::{Color, Figure, LegendPosition, Marker, Series};

use super::SweepResult;

/// `F/NkT` after each step: `-Σ ln(ratio) / N`, accumulated.
pub fn cumulative_free_energy(ratios: &[f64], spheres: u32) -> Vec<f64> {
    let n = f64::from(spheres.max(1));
    ratios
        .iter()
        .scan(0.0, |acc, r| {
            *acc -= r.ln();
            Some(*acc / n)
        })
        .collect()
}

/// Carnahan–Starling excess free energy per particle, `(4η - 3η²)/(1 - η)²`.
pub fn carnahan_starling(eta: f64) -> f64 {
    (4.0 * eta - 3.0 * eta * eta) / (1.0 - eta).powi(2)
}

/// Scatter of every sweep plus the Carnahan–Starling curve.
pub fn free_energy_figure(results: &[SweepResult]) -> Figure {
    let mut fig = Figure::new("η", "F/NkT");
    fig.legend = Some(LegendPosition::UpperLeft);

    let mut all_ff: Vec<f64> = Vec::new();
    for (i, result) in results.iter().enumerate() {
        let points: Vec<(f64, f64)> = result
            .records
            .iter()
            .zip(&result.free_energy)
            .map(|(rec, f)| (rec.ff_small, *f))
            .collect();
        all_ff.extend(points.iter().map(|p| p.0));
        let color = if results.len() == 1 { Color::Blue } else { Color::cycle(i) };
        let label = if results.len() == 1 {
            "Monte Carlo".to_string()
        } else {
            format!("N = {}", result.spheres)
        };
        fig.push(Series::scatter(points, color, Marker::Circle).with_label(label));
    }

    all_ff.sort_by(f64::total_cmp);
    all_ff.dedup();
    let reference: Vec<(f64, f64)> = all_ff.iter().map(|&eta| (eta, carnahan_starling(eta))).collect();
    if !reference.is_empty() {
        fig.push(Series::line(reference, Color::Green).with_label("Carnahan-Starling"));
    }
    fig
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sweep::StepRecord;

    #[test]
    fn free_energy_accumulates_log_ratios() {
        let f = cumulative_free_energy(&[0.5, 0.25, 1.0], 2);
        let ln2 = 2f64.ln();
        assert!((f[0] - ln2 / 2.0).abs() < 1e-12);
        assert!((f[1] - 3.0 * ln2 / 2.0).abs() < 1e-12);
        assert!((f[2] - f[1]).abs() < 1e-12);
    }

    #[test]
    fn carnahan_starling_values() {
        assert_eq!(carnahan_starling(0.0), 0.0);
        assert!((carnahan_starling(0.5) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn figure_has_scatter_and_reference() {
        let result = SweepResult {
            spheres: 10,
            records: vec![
                StepRecord {
                    ff: 0.0,
                    ff_small: 0.05,
                    total_checks: 100.0,
                    valid_checks: 90.0,
                    ratio: 0.9,
                },
                StepRecord {
                    ff: 0.05,
                    ff_small: 0.1,
                    total_checks: 100.0,
                    valid_checks: 80.0,
                    ratio: 0.8,
                },
            ],
            free_energy: vec![0.01, 0.03],
        };
        let fig = free_energy_figure(&[result]);
        assert_eq!(fig.series.len(), 2);
        assert_eq!(fig.series[0].points, vec![(0.05, 0.01), (0.1, 0.03)]);
        assert_eq!(fig.series[1].points.len(), 2);
        assert_eq!(fig.x_label, "η");
        assert_eq!(fig.y_label, "F/NkT");
    }
}
