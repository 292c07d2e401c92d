// Single-history tracker: advances one particle through the geometry
// until it leaks or is absorbed, collecting fission sites into a private
// buffer. Histories share only immutable geometry and material data, so
// any number of them can run concurrently.

use rand::Rng;

use crate::bank::FissionSite;
use crate::error::{Result, TransportError};
use crate::geometry::Geometry;
use crate::material::MaterialTable;
use crate::particle::Particle;
use crate::physics::{self, CollisionKind};
use crate::settings::ScatteringTreatment;
use crate::surface::BoundaryType;

/// Nudge distance applied after a surface crossing so the relocated point
/// is strictly inside the next cell rather than on the boundary.
const SURFACE_TOLERANCE: f64 = 1e-8;

/// Below this total cross section a group is treated as pure transport:
/// the flight samples no collision rather than dividing by ~zero.
const XS_FLOOR: f64 = 1e-12;

/// Histories whose weight falls below this are terminated.
const WEIGHT_CUTOFF: f64 = 1e-6;

/// Why a history ended. Terminal states are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationCause {
    /// Crossed a vacuum boundary.
    Leaked,
    /// Captured or consumed in fission.
    Absorbed,
    /// Fell below the weight cutoff.
    Cutoff,
}

/// Exactly one of these is produced per history; a history that ends
/// without one is a defect.
#[derive(Debug, Clone)]
pub struct HistoryResult {
    pub cause: TerminationCause,
    pub weight: f64,
    pub collisions: usize,
    /// Total fission-neutron weight banked by this history.
    pub fission_weight: f64,
    pub sites: Vec<FissionSite>,
}

/// Track one particle from birth to termination.
///
/// `batch` is attached to any geometry error raised mid-flight.
pub fn transport_history<R: Rng + ?Sized>(
    geometry: &Geometry,
    materials: &MaterialTable,
    scattering: &ScatteringTreatment,
    mut particle: Particle,
    batch: usize,
    rng: &mut R,
) -> Result<HistoryResult> {
    let mut collisions = 0usize;
    let mut fission_weight = 0.0;
    let mut sites = Vec::new();

    while particle.alive {
        let cell_index = match particle.cell {
            Some(index) => index,
            None => {
                let index = geometry.find_cell(particle.position).map_err(|e| e.with_batch(batch))?;
                particle.cell = Some(index);
                index
            }
        };
        let cell = geometry.cell(cell_index);

        // Sampled flight to the next collision, carrying the material it
        // was sampled in; void cells and vanishing totals stream without
        // colliding.
        let flight = match cell.material {
            Some(material_index) => {
                let material = materials.require(material_index, cell.cell_id)?;
                let sigma_t = material.total(particle.group);
                if sigma_t > XS_FLOOR {
                    Some((-rng.gen::<f64>().ln() / sigma_t, material))
                } else {
                    None
                }
            }
            None => None,
        };
        let dist_collision = flight.map_or(f64::INFINITY, |(dist, _)| dist);

        let boundary =
            geometry.distance_to_boundary(particle.position, particle.direction, cell_index);

        match boundary {
            Some((dist_surface, surface_index)) if dist_surface < dist_collision => {
                let surface = geometry.surface(surface_index);
                match surface.boundary_type {
                    BoundaryType::Vacuum => {
                        particle.move_by(dist_surface);
                        particle.alive = false;
                        return Ok(HistoryResult {
                            cause: TerminationCause::Leaked,
                            weight: particle.weight,
                            collisions,
                            fission_weight,
                            sites,
                        });
                    }
                    BoundaryType::Reflective => {
                        particle.move_by(dist_surface);
                        particle.direction =
                            surface.reflect(particle.position, particle.direction);
                        // Step off the surface; still in the same cell
                        particle.move_by(SURFACE_TOLERANCE);
                    }
                    BoundaryType::Transmission => {
                        particle.move_by(dist_surface + SURFACE_TOLERANCE);
                        particle.cell = Some(
                            geometry
                                .find_cell(particle.position)
                                .map_err(|e| e.with_batch(batch))?,
                        );
                    }
                }
            }
            // Boundary not closer: collide in the material the flight
            // was sampled in, or report a lost particle if there was no
            // flight either.
            _ => match flight {
                Some((dist, material)) => {
                    particle.move_by(dist);
                    collisions += 1;

                    match physics::sample_collision(material, particle.group, rng) {
                        CollisionKind::Scatter => {
                            let outgoing = material.sample_scatter_group(particle.group, rng);
                            let mu =
                                physics::sample_mu(scattering, material, particle.group, rng);
                            physics::rotate_direction(&mut particle.direction, mu, rng);
                            particle.group = outgoing;
                        }
                        CollisionKind::Fission => {
                            let nu = material.nu(particle.group);
                            let count = physics::sample_fission_count(nu, rng);
                            for _ in 0..count {
                                let delayed_family =
                                    material.sample_delayed_family(particle.group, rng);
                                let group = material.sample_chi_group(rng);
                                sites.push(FissionSite {
                                    position: particle.position,
                                    group,
                                    weight: particle.weight,
                                    delayed_family,
                                });
                            }
                            fission_weight += count as f64 * particle.weight;
                            particle.alive = false;
                            return Ok(HistoryResult {
                                cause: TerminationCause::Absorbed,
                                weight: particle.weight,
                                collisions,
                                fission_weight,
                                sites,
                            });
                        }
                        CollisionKind::Capture => {
                            particle.alive = false;
                            return Ok(HistoryResult {
                                cause: TerminationCause::Absorbed,
                                weight: particle.weight,
                                collisions,
                                fission_weight,
                                sites,
                            });
                        }
                    }
                }
                // No surface ahead and no collision possible: the model
                // does not close around this particle.
                None => {
                    return Err(TransportError::geometry(
                        batch,
                        format!(
                            "particle lost in cell {} at ({}, {}, {})",
                            cell.cell_id,
                            particle.position[0],
                            particle.position[1],
                            particle.position[2]
                        ),
                    ));
                }
            },
        }

        if particle.weight < WEIGHT_CUTOFF {
            particle.alive = false;
            return Ok(HistoryResult {
                cause: TerminationCause::Cutoff,
                weight: particle.weight,
                collisions,
                fission_weight,
                sites,
            });
        }
    }

    // Unreachable: every exit from the loop above returns.
    Err(TransportError::geometry(
        batch,
        "history ended without a termination event".to_string(),
    ))
}
