//! Pipeline step implementations.
//!
//! Each step handles one phase of turning a video into timelines.

mod export;
mod extract;
mod recognize;
mod resolve;
mod segment;

pub use export::ExportStep;
pub use extract::ExtractStep;
pub use recognize::RecognizeStep;
pub use resolve::ResolveStep;
pub use segment::SegmentStep;
