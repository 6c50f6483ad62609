//! Colour conversion constants and tone curves used while developing.

/// XYZ (D65) to linear sRGB
pub const XYZ_TO_SRGB: [[f32; 3]; 3] = [
    [ 3.2404542, -1.5371385, -0.4985314],
    [-0.9692660,  1.8760108,  0.0415560],
    [ 0.0556434, -0.2040259,  1.0572252],
];

/// XYZ (D65) to linear ProPhoto RGB, Bradford-adapted to the D50 white point
pub const XYZ_TO_PROPHOTO: [[f32; 3]; 3] = [
    [ 1.4032152, -0.2231401, -0.1015530],
    [-0.5262716,  1.4816611,  0.0170313],
    [-0.0111905,  0.0182300,  0.9114427],
];

/// Builds the camera to output-space matrix from the camera to XYZ matrix.
///
/// Only the first three camera channels are used (Bayer sensors have no
/// fourth colour). Rows are normalised so a neutral camera signal maps to
/// output white.
pub fn camera_to_output(xyz_to_out: &[[f32; 3]; 3], cam_to_xyz: &[[f32; 4]; 3]) -> [[f32; 3]; 3] {
    let mut m = [[0.0f32; 3]; 3];
    for r in 0..3 {
        for c in 0..3 {
            m[r][c] = (0..3).map(|k| xyz_to_out[r][k] * cam_to_xyz[k][c]).sum();
        }
    }
    for row in m.iter_mut() {
        let sum: f32 = row.iter().sum();
        if sum.abs() > f32::EPSILON {
            row.iter_mut().for_each(|v| *v /= sum);
        }
    }
    m
}

/// Tone reproduction curve described by a `(power, slope)` pair.
///
/// Values below the toe threshold are scaled linearly by `slope`, values above
/// follow `(1 + offset) * x^(1/power) - offset`. The two segments meet with
/// matching value and derivative. `(2.4, 12.92)` is the sRGB-shaped curve,
/// `(1, 1)` is the identity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GammaCurve {
    power: f32,
    slope: f32,
    threshold: f32,
    offset: f32,
}

impl GammaCurve {
    pub fn new(power: f32, slope: f32) -> Self {
        let (threshold, offset) = if power > 1.0 && slope > 1.0 {
            solve_toe(power as f64, slope as f64)
        } else {
            (0.0, 0.0)
        };
        Self { power, slope, threshold, offset }
    }

    pub fn linear() -> Self {
        Self::new(1.0, 1.0)
    }

    /// The `(power, slope)` pair the curve was built from.
    pub fn pair(&self) -> (f32, f32) {
        (self.power, self.slope)
    }

    pub fn is_linear(&self) -> bool {
        self.power == 1.0 && self.threshold == 0.0
    }

    /// Maps a linear value in `[0, 1]` to the encoded value.
    pub fn apply(&self, x: f32) -> f32 {
        if self.is_linear() || x <= 0.0 {
            return x.max(0.0);
        }
        if x < self.threshold {
            self.slope * x
        } else {
            (1.0 + self.offset) * x.powf(1.0 / self.power) - self.offset
        }
    }
}

/// Finds the toe threshold `x0` and offset `a` for which the linear segment
/// `slope * x` and the power segment meet with equal value and derivative.
fn solve_toe(power: f64, slope: f64) -> (f32, f32) {
    // f(x0) = 1 + slope*x0*(power-1) - slope*power*x0^(1-1/power) is convex,
    // positive at 0 and negative at 1 whenever slope > 1.
    let f = |x: f64| 1.0 + slope * x * (power - 1.0) - slope * power * x.powf(1.0 - 1.0 / power);
    let (mut lo, mut hi) = (0.0f64, 1.0f64);
    for _ in 0..64 {
        let mid = 0.5 * (lo + hi);
        if f(mid) > 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    let threshold = 0.5 * (lo + hi);
    let offset = slope * threshold * (power - 1.0);
    (threshold as f32, offset as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn srgb_shaped_curve_matches_known_constants() {
        let curve = GammaCurve::new(2.4, 12.92);
        assert!((curve.offset - 0.055).abs() < 1e-3, "offset {}", curve.offset);
        assert!((curve.threshold - 0.00304).abs() < 1e-4, "threshold {}", curve.threshold);
        assert!((curve.apply(1.0) - 1.0).abs() < 1e-5);
        assert!((curve.apply(0.18) - 0.4614).abs() < 2e-3);
    }

    #[test]
    fn curve_is_continuous_at_threshold() {
        let curve = GammaCurve::new(2.4, 12.92);
        let below = curve.apply(curve.threshold - 1e-6);
        let above = curve.apply(curve.threshold + 1e-6);
        assert!((below - above).abs() < 1e-4);
    }

    #[test]
    fn unit_pair_is_identity() {
        let curve = GammaCurve::linear();
        assert!(curve.is_linear());
        for x in [0.0, 0.001, 0.25, 0.5, 1.0] {
            assert_eq!(curve.apply(x), x);
        }
        assert_eq!(curve.pair(), (1.0, 1.0));
    }

    #[test]
    fn slope_of_one_is_a_pure_power() {
        let curve = GammaCurve::new(2.0, 1.0);
        assert!((curve.apply(0.25) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn neutral_camera_maps_to_white() {
        // Identity camera: camera RGB == XYZ
        let cam_to_xyz = [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
        ];
        for target in [&XYZ_TO_SRGB, &XYZ_TO_PROPHOTO] {
            let m = camera_to_output(target, &cam_to_xyz);
            for row in m {
                assert!((row.iter().sum::<f32>() - 1.0).abs() < 1e-5);
            }
        }
    }
}
