use crate::region::Region;
use crate::surface::Surface;

/// A cell is a geometric region filled with a material (or void).
///
/// Cells are defined by a flat conjunction of surface half-spaces and
/// reference their material by index into the material table. `material`
/// of `None` means void: particles stream through without colliding.
#[derive(Clone, Debug)]
pub struct Cell {
    pub cell_id: u32,
    pub name: Option<String>,
    pub region: Region,
    pub material: Option<usize>,
    pub universe: u32,
}

impl Cell {
    pub fn new(cell_id: u32, region: Region, name: Option<String>, material: Option<usize>) -> Self {
        Cell {
            cell_id,
            name,
            region,
            material,
            universe: 0,
        }
    }

    /// Check if a point is inside this cell's region
    pub fn contains(&self, surfaces: &[Surface], point: [f64; 3]) -> bool {
        self.region.contains(surfaces, point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::Region;
    use crate::surface::Surface;

    #[test]
    fn test_cell_contains() {
        let surfaces = vec![
            Surface::x_plane(0.0, 1, None),
            Surface::x_plane(5.0, 2, None),
        ];
        let region = Region::default().and_above(0).and_below(1);
        let cell = Cell::new(1, region, Some("slab".to_string()), Some(0));
        assert!(cell.contains(&surfaces, [2.5, 0.0, 0.0]));
        assert!(!cell.contains(&surfaces, [6.0, 0.0, 0.0]));
    }

    #[test]
    fn test_void_cell() {
        let surfaces = vec![Surface::sphere(0.0, 0.0, 0.0, 1.0, 1, None)];
        let cell = Cell::new(2, Region::default().and_below(0), None, None);
        assert!(cell.material.is_none());
        assert!(cell.contains(&surfaces, [0.0, 0.0, 0.0]));
    }
}
