//! Stretched Surface Relief Grating (SRG) datasets and surface synthesis.
//!
//! A dataset file describes several superimposed sinusoidal gratings measured
//! over a sequence of stretch steps. [`SrgDataset`] parses it into pitch,
//! amplitude and angle tables; [`synth`] turns one stretch step into a sampled
//! height [`Surface`].

pub mod dataset;
pub mod error;
pub mod grating;
pub mod surface;
pub mod synth;
pub mod table;

pub use dataset::SrgDataset;
pub use error::{Result, SrgError};
pub use grating::Grating;
pub use surface::{SamplingWindow, Surface};
pub use synth::{gratings_at_step, stretched_surface};
pub use table::ParameterTable;
