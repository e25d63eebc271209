//! The null backend: a valid, completely empty world.

use super::VolumetricBackend;

/// Backend with no spatial structure.
///
/// Everything is free and reachable, the map is centered at the origin and
/// extends `f64::MAX` along every axis. `set_occupied` cannot record
/// anything and is a no-op, so occupancy queries stay `Free` even right
/// after marking a box occupied. Sensor insertions are logged as
/// unimplemented and discarded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EmptyWorld;

impl EmptyWorld {
    /// Create the empty world
    pub fn new() -> Self {
        Self
    }
}

impl VolumetricBackend for EmptyWorld {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CellStatus, Vector3};

    #[test]
    fn test_everything_is_free() {
        let world = EmptyWorld::new();
        let p = Vector3::new(1.0, -2.0, 3.0);
        let size = Vector3::new(0.5, 0.5, 0.5);

        assert_eq!(world.cell_status_point(&p), CellStatus::Free);
        assert_eq!(world.cell_status_bounding_box(&p, &size), CellStatus::Free);
        assert_eq!(world.line_status(&Vector3::zeros(), &p), CellStatus::Free);
        assert_eq!(
            world.line_status_bounding_box(&Vector3::zeros(), &p, &size),
            CellStatus::Free
        );
    }

    #[test]
    fn test_unbounded_extent() {
        let world = EmptyWorld::new();
        assert_eq!(world.map_center(), Vector3::zeros());
        assert_eq!(world.map_size(), Vector3::repeat(f64::MAX));
    }

    #[test]
    fn test_set_occupied_is_noop() {
        let mut world = EmptyWorld::new();
        let p = Vector3::new(2.0, 2.0, 0.5);
        world.set_occupied(&p, &Vector3::repeat(1.0));
        assert_eq!(world.cell_status_point(&p), CellStatus::Free);

        world.set_free(&p, &Vector3::repeat(1.0));
        assert_eq!(world.cell_status_point(&p), CellStatus::Free);
    }

    #[test]
    fn test_boxed_backend_forwards() {
        let boxed: Box<dyn VolumetricBackend> = Box::new(EmptyWorld::new());
        assert_eq!(boxed.map_size(), Vector3::repeat(f64::MAX));
        assert_eq!(boxed.cell_status_point(&Vector3::zeros()), CellStatus::Free);
    }
}
