mod pool;
mod sequence;

pub use sequence::SequenceBuffer;
