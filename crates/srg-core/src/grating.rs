//! A single sinusoidal grating and its projected phase ramp.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::surface::{SamplingWindow, Surface};

/// One sinusoidal grating of an SRG at a given stretch step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Grating {
    pitch: f64,
    amplitude: f64,
    angle: f64,
}

impl Grating {
    /// `pitch` is the sinusoid period, `amplitude` the first diffracted order
    /// amplitude and `angle` the modulation direction from the x axis, in radians.
    pub fn new(pitch: f64, amplitude: f64, angle: f64) -> Self {
        Self {
            pitch,
            amplitude,
            angle,
        }
    }

    pub fn pitch(&self) -> f64 {
        self.pitch
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Position `(x, y)` projected on the modulation direction, in pitches.
    #[inline]
    pub fn phase_at(&self, x: f64, y: f64) -> f64 {
        (x * self.angle.cos() + y * self.angle.sin()) / self.pitch
    }

    /// Surface produced by this grating alone.
    ///
    /// Each cell holds `amplitude * phase_at(x, y)`: the unwrapped linear
    /// ramp, not folded back onto one period.
    pub fn surface(&self, window: SamplingWindow) -> Result<Surface> {
        let (sin, cos) = self.angle.sin_cos();
        let (pitch, amplitude) = (self.pitch, self.amplitude);
        Surface::sample(window, |x, y| amplitude * ((x * cos + y * sin) / pitch))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SrgError;
    use approx::assert_relative_eq;

    #[test]
    fn reference_grating_surface_corners() {
        let grating = Grating::new(1.5, 1.0, 0.5);
        let surface = grating.surface(SamplingWindow::new(10.0, 0.1)).unwrap();
        let last = surface.size - 1;
        assert_eq!(surface.size, 100);
        assert_eq!(surface.get(0, 0) as i64, 0);
        assert_eq!(surface.get(last, last) as i64, 8);
    }

    #[test]
    fn ramp_follows_projection_on_angle() {
        let grating = Grating::new(2.0, 3.0, std::f64::consts::FRAC_PI_2);
        let surface = grating.surface(SamplingWindow::new(4.0, 1.0)).unwrap();
        // Modulation along y only: constant along x.
        for x in 0..surface.size {
            assert_relative_eq!(surface.get(x, 2), 3.0, epsilon = 1e-12);
        }
        assert_relative_eq!(surface.get(1, 3), 3.0 * grating.phase_at(1.0, 3.0), epsilon = 1e-12);
    }

    #[test]
    fn zero_step_is_invalid() {
        let err = Grating::new(1.5, 1.0, 0.5)
            .surface(SamplingWindow::new(10.0, 0.0))
            .unwrap_err();
        assert!(matches!(err, SrgError::InvalidParameter { name: "step", .. }));
    }

    #[test]
    fn surface_is_deterministic() {
        let grating = Grating::new(0.8, -0.4, 2.1);
        let window = SamplingWindow::new(5.0, 0.25);
        assert_eq!(grating.surface(window).unwrap(), grating.surface(window).unwrap());
    }
}
