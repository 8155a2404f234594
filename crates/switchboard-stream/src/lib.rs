pub mod chunker;
pub mod chunking;
pub mod surface;

pub use chunker::BlockChunker;
pub use chunking::{resolve_chunking, resolve_chunking_with, BreakPreference, ChunkBounds};
pub use surface::{ChunkSurface, ConfiguredTextLimits, TextLimitSource};
