//! Ordinary least-squares line through evenly indexed points.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    /// Fit `y = slope * x + intercept` with `x = 0..n`. Needs two points.
    pub fn fit(values: &[f64]) -> Option<Self> {
        let n = values.len();
        if n < 2 {
            return None;
        }
        let n_f = n as f64;
        let mean_x = (n_f - 1.0) / 2.0;
        let mean_y = values.iter().sum::<f64>() / n_f;

        let (mut sxy, mut sxx) = (0.0, 0.0);
        for (x, y) in values.iter().enumerate() {
            let dx = x as f64 - mean_x;
            sxy += dx * (y - mean_y);
            sxx += dx * dx;
        }
        let slope = sxy / sxx;
        Some(Self {
            slope,
            intercept: mean_y - slope * mean_x,
        })
    }

    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_line_is_recovered() {
        let fit = LinearFit::fit(&[3.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-12);
        assert!((fit.intercept - 3.0).abs() < 1e-12);
    }

    #[test]
    fn noisy_points_get_least_squares_line() {
        // x = 0,1,2 ; y = 1,2,2 -> slope 0.5, intercept 7/6
        let fit = LinearFit::fit(&[1.0, 2.0, 2.0]).unwrap();
        assert!((fit.slope - 0.5).abs() < 1e-12);
        assert!((fit.intercept - 7.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn single_point_has_no_line() {
        assert!(LinearFit::fit(&[4.0]).is_none());
        assert!(LinearFit::fit(&[]).is_none());
    }
}
