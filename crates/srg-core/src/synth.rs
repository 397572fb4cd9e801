//! Superposition of all gratings of a dataset at one stretch step.

use crate::dataset::SrgDataset;
use crate::error::{Result, SrgError};
use crate::grating::Grating;
use crate::surface::{SamplingWindow, Surface};

fn check_step(dataset: &SrgDataset, step_index: usize) -> Result<()> {
    let count = dataset.stretch_step_count();
    if step_index < count {
        Ok(())
    } else {
        Err(SrgError::IndexOutOfRange {
            index: step_index,
            count,
        })
    }
}

/// Gratings composing the SRG at `step_index`, in grating order.
pub fn gratings_at_step(dataset: &SrgDataset, step_index: usize) -> Result<Vec<Grating>> {
    check_step(dataset, step_index)?;
    let pitch = dataset.pitch().row(step_index);
    let amplitude = dataset.amplitude().row(step_index);
    let angle = dataset.angle().row(step_index);
    Ok(pitch
        .iter()
        .zip(amplitude)
        .zip(angle)
        .map(|((&p, &a), &t)| Grating::new(p, a, t))
        .collect())
}

/// Per-grating constants hoisted out of the cell loop.
struct Term {
    amplitude: f64,
    cos: f64,
    sin: f64,
    pitch: f64,
}

/// Surface of the whole SRG at `step_index`.
///
/// Each cell sums, over every grating g,
/// `amplitude_g * (phase + ((x·step)·cos(angle_g) + (y·step)·sin(angle_g)) / pitch_g)`
/// where `phase` is the dataset phase.
pub fn stretched_surface(
    dataset: &SrgDataset,
    step_index: usize,
    window: SamplingWindow,
) -> Result<Surface> {
    let gratings = gratings_at_step(dataset, step_index)?;
    let phase = dataset.phase();
    let terms: Vec<Term> = gratings
        .iter()
        .map(|g| {
            let (sin, cos) = g.angle().sin_cos();
            Term {
                amplitude: g.amplitude(),
                cos,
                sin,
                pitch: g.pitch(),
            }
        })
        .collect();

    log::debug!(
        "stretch step {}: superposing {} gratings over {}x{} window (step {})",
        step_index,
        terms.len(),
        window.dimension,
        window.dimension,
        window.step
    );

    Surface::sample(window, |x, y| {
        terms.iter().fold(0.0, |z, t| {
            z + t.amplitude * (phase + (x * t.cos + y * t.sin) / t.pitch)
        })
    })
}
