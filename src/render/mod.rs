//! Render loop — surface sizing, bar layout and the per-frame task.

pub mod bars;
pub mod scheduler;
pub mod surface;

pub use bars::{Bar, BarFill, LinearGradient};
pub use scheduler::{FrameHandle, FrameScheduler, RenderLoop};
pub use surface::{DrawSurface, ListenerId, SurfaceMetrics, Viewport};
