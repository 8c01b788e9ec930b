//! Color controls for the galaxy: the three textual inputs and their parsed form.

use anyhow::{Context, Result};
use bevy::prelude::*;

/// Three parsed blend stops, stored as linear RGB (the space vertex colors are blended in).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStops([LinearRgba; 3]);

impl ColorStops {
    /// Parses all three `#rrggbb` values; nothing is returned unless every stop is valid.
    pub fn parse<S: AsRef<str>>(raw: &[S; 3]) -> Result<Self> {
        let mut out = [LinearRgba::WHITE; 3];
        for (i, (slot, text)) in out.iter_mut().zip(raw.iter()).enumerate() {
            let text = text.as_ref();
            let srgb = Srgba::hex(text)
                .with_context(|| format!("color stop {} has malformed value '{text}'", i + 1))?;
            *slot = LinearRgba::from(srgb);
        }
        Ok(Self(out))
    }

    pub fn channels(&self) -> [[f32; 3]; 3] {
        self.0.map(|c| [c.red, c.green, c.blue])
    }
}

/// Current text of the three color controls. Persists between recolors; only read on Apply.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ColorInputs {
    pub values: [String; 3],
}

impl ColorInputs {
    pub fn new(values: [String; 3]) -> Self {
        Self { values }
    }

    /// Advances control `slot` to the swatch after its current value (first swatch if unknown).
    /// Returns the new value, or `None` when there is nothing to cycle to.
    pub fn cycle(&mut self, slot: usize, swatches: &[String]) -> Option<&str> {
        if swatches.is_empty() {
            return None;
        }
        let current = self.values.get(slot)?;
        let next = swatches
            .iter()
            .position(|s| s.eq_ignore_ascii_case(current))
            .map_or(0, |i| (i + 1) % swatches.len());
        self.values[slot] = swatches[next].clone();
        Some(self.values[slot].as_str())
    }
}
