//! Excess coordination integral, `∫ 4π r² g(r) dr - 4/3 π σ³`.

use std::f64::consts::PI;

/// Rectangle-rule integral over a uniform grid.
///
/// Returns `None` when the grid has fewer than two points.
pub fn excess_integral(r: &[f64], g: &[f64], sigma: f64) -> Option<f64> {
    let n = r.len().min(g.len());
    if n < 2 {
        return None;
    }
    let dr = (r[n - 1] - r[0]) / (n - 1) as f64;
    let sum: f64 = r.iter().zip(g).map(|(r, g)| 4.0 * PI * r * r * g).sum();
    Some(sum * dr - 4.0 / 3.0 * PI * sigma.powi(3))
}

/// MC and fitted integrals for one filling fraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegralComparison {
    pub eta: f64,
    pub mc: f64,
    pub fit: f64,
}

impl IntegralComparison {
    pub fn difference(&self) -> f64 {
        self.fit - self.mc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_g_recovers_shell_volume() {
        let sigma = 2.0;
        let r: Vec<f64> = (0..=2000).map(|i| f64::from(i) * 0.001).collect();
        let g = vec![1.0; r.len()];
        // ∫_0^2 4π r² dr = 32π/3, minus the same 4/3 π 8.
        let v = excess_integral(&r, &g, sigma).unwrap();
        assert!(v.abs() < 0.05, "{v}");
    }

    #[test]
    fn degenerate_grid() {
        assert_eq!(excess_integral(&[1.0], &[1.0], 2.0), None);
    }
}
