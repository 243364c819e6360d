//! Section-based intensity scoring.
//!
//! A track is split into equal sections, each section is described and
//! normalized against a reference scale, and the weighted section scores
//! are averaged into one number.

pub mod engine;
pub mod reference;
pub mod scorer;
pub mod sections;

pub use engine::{compute_intensity, IntensityOptions, IntensityReport};
pub use reference::{ReferenceScale, ReferenceStrategy};
pub use scorer::NormalizationMode;
