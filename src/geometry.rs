use std::collections::HashSet;

use crate::cell::Cell;
use crate::error::{Result, TransportError};
use crate::surface::Surface;

/// The spatial model: arenas of surfaces and cells referenced by index.
///
/// Surfaces and cells are immutable after construction. A well-formed
/// model partitions space inside its outer boundary: every interior point
/// resolves to exactly one cell.
#[derive(Clone, Debug)]
pub struct Geometry {
    pub surfaces: Vec<Surface>,
    pub cells: Vec<Cell>,
}

impl Geometry {
    /// Build a geometry, validating that cell and surface ids are unique
    /// and that every region references an in-range surface index.
    pub fn new(surfaces: Vec<Surface>, cells: Vec<Cell>) -> Result<Self> {
        let mut surface_ids = HashSet::new();
        for surface in &surfaces {
            if !surface_ids.insert(surface.surface_id) {
                return Err(TransportError::geometry(
                    0,
                    format!("duplicate surface_id {}", surface.surface_id),
                ));
            }
        }

        let mut cell_ids = HashSet::new();
        for cell in &cells {
            if !cell_ids.insert(cell.cell_id) {
                return Err(TransportError::geometry(
                    0,
                    format!("duplicate cell_id {}", cell.cell_id),
                ));
            }
            if cell.region.halfspaces.is_empty() {
                return Err(TransportError::geometry(
                    0,
                    format!("cell {} has an empty region", cell.cell_id),
                ));
            }
            if let Some(max) = cell.region.max_surface_index() {
                if max >= surfaces.len() {
                    return Err(TransportError::geometry(
                        0,
                        format!(
                            "cell {} references surface index {} out of range",
                            cell.cell_id, max
                        ),
                    ));
                }
            }
        }

        Ok(Geometry { surfaces, cells })
    }

    pub fn surface(&self, index: usize) -> &Surface {
        &self.surfaces[index]
    }

    pub fn cell(&self, index: usize) -> &Cell {
        &self.cells[index]
    }

    /// Locate the unique cell containing a point.
    ///
    /// Zero matches means the model has a gap, more than one means an
    /// overlap; both indicate a malformed model and are fatal.
    pub fn find_cell(&self, point: [f64; 3]) -> Result<usize> {
        let mut found = None;
        for (index, cell) in self.cells.iter().enumerate() {
            if cell.contains(&self.surfaces, point) {
                if let Some(first) = found {
                    let first_id = self.cells[first as usize].cell_id;
                    return Err(TransportError::geometry(
                        0,
                        format!(
                            "overlapping cells {} and {} at ({}, {}, {})",
                            first_id, cell.cell_id, point[0], point[1], point[2]
                        ),
                    ));
                }
                found = Some(index);
            }
        }
        found.ok_or_else(|| {
            TransportError::geometry(
                0,
                format!(
                    "no cell contains point ({}, {}, {})",
                    point[0], point[1], point[2]
                ),
            )
        })
    }

    /// Minimum positive distance from a point to the boundary of `cell`,
    /// along with the index of the surface crossed. Returns None if no
    /// region surface lies ahead (a lost particle, caught by the caller).
    ///
    /// Ties within floating tolerance resolve to the first surface hit,
    /// which for a conjunction of half-spaces is the outward crossing.
    pub fn distance_to_boundary(
        &self,
        point: [f64; 3],
        direction: [f64; 3],
        cell: usize,
    ) -> Option<(f64, usize)> {
        let mut min_dist = f64::INFINITY;
        let mut hit = None;
        for hs in &self.cells[cell].region.halfspaces {
            let surface = &self.surfaces[hs.surface];
            if let Some(dist) = surface.distance_to_surface(point, direction) {
                if dist < min_dist {
                    min_dist = dist;
                    hit = Some(hs.surface);
                }
            }
        }
        hit.map(|surface| (min_dist, surface))
    }
}
