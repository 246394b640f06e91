//! View-driven chunk streaming and caching

pub mod cache;
pub mod render;
pub mod streamer;
pub mod view;

pub use cache::ChunkCache;
pub use render::{ChunkDraw, ChunkRenderer};
pub use streamer::{ChunkStreamer, StreamingParams, StreamingStats};
pub use view::{Observer, ViewRect, ViewSnapshot, WIDTH_MARGIN};
