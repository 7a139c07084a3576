pub mod artwork;
pub mod geometry;
pub mod renderer;
pub mod spatial;
pub mod surface;
pub mod transform;

pub use artwork::{Bounds, MapArtwork, Region};
pub use renderer::MapLayers;
pub use surface::{class, RegionId, RegionSurface};
pub use transform::{MapView, ZoomState};
