//! The minimal contract peer transforms (LZ/ROLZ/LZP, exe/text/utf
//! preprocessors — none implemented here, see crate docs) need to plug into
//! a chain ahead of the BWT stage.

use crate::error::Result;

/// A reversible, block-local byte transform.
pub trait BlockTransform {
    /// Apply the transform.
    fn forward(&self, input: &[u8]) -> Result<Vec<u8>>;
    /// Invert the transform; must satisfy `inverse(forward(x)) == x`.
    fn inverse(&self, input: &[u8]) -> Result<Vec<u8>>;
    /// Human-readable name, used only for diagnostics.
    fn name(&self) -> &'static str;
}

/// A no-op transform, useful as a chain placeholder and for exercising the
/// [`BlockTransform`] seam in tests.
pub struct Identity;

impl BlockTransform for Identity {
    fn forward(&self, input: &[u8]) -> Result<Vec<u8>> {
        Ok(input.to_vec())
    }
    fn inverse(&self, input: &[u8]) -> Result<Vec<u8>> {
        Ok(input.to_vec())
    }
    fn name(&self) -> &'static str {
        "identity"
    }
}

/// A sequence of [`BlockTransform`] stages applied in order on encode and in
/// reverse order on decode, ending in the caller's BWT+entropy stage (not
/// modeled as a `BlockTransform` itself, since its output is a framed
/// bitstream segment rather than a same-shape byte block).
pub struct Pipeline {
    stages: Vec<Box<dyn BlockTransform>>,
}

impl Pipeline {
    /// Build an empty pipeline.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Append a stage to the end of the chain.
    pub fn push(&mut self, stage: Box<dyn BlockTransform>) -> &mut Self {
        self.stages.push(stage);
        self
    }

    /// Run every stage's `forward` in order.
    pub fn forward(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut buf = input.to_vec();
        for stage in &self.stages {
            buf = stage.forward(&buf)?;
        }
        Ok(buf)
    }

    /// Run every stage's `inverse` in reverse order.
    pub fn inverse(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut buf = input.to_vec();
        for stage in self.stages.iter().rev() {
            buf = stage.inverse(&buf)?;
        }
        Ok(buf)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
