use rand::Rng;

use crate::error::{Result, TransportError};

/// One delayed-neutron precursor family after normalization: a decay
/// constant shared across groups and a fission fraction per originating
/// energy group.
#[derive(Clone, Debug, PartialEq)]
pub struct PrecursorFamily {
    pub decay_constant: f64,
    pub fraction_by_group: Vec<f64>,
}

/// Normalized delayed-neutron data. Both input encodings collapse to this
/// so the tracker never branches on the representation.
#[derive(Clone, Debug, PartialEq)]
pub struct DelayedData {
    pub families: Vec<PrecursorFamily>,
}

/// The two input encodings for delayed-neutron precursor data.
///
/// `Vector` applies one fraction per family uniformly across groups;
/// `Matrix` gives a full fraction per family per originating group.
/// Families share their decay constant across groups in both forms.
#[derive(Clone, Debug)]
pub enum DelayedInput {
    Vector {
        decay_constants: Vec<f64>,
        fractions: Vec<f64>,
    },
    Matrix {
        decay_constants: Vec<f64>,
        /// fractions[family][group]
        fractions: Vec<Vec<f64>>,
    },
}

impl DelayedInput {
    /// Normalize either encoding into per-group family lists, validating
    /// dimensions and the physical constraint sum(beta_k) <= 1 per group.
    pub fn normalize(self, groups: usize, material_id: u32) -> Result<DelayedData> {
        let invalid = |message: String| TransportError::InvalidMaterial {
            material: material_id,
            message,
        };

        let families = match self {
            DelayedInput::Vector {
                decay_constants,
                fractions,
            } => {
                if decay_constants.len() != fractions.len() {
                    return Err(invalid(format!(
                        "{} decay constants for {} delayed fractions",
                        decay_constants.len(),
                        fractions.len()
                    )));
                }
                decay_constants
                    .into_iter()
                    .zip(fractions)
                    .map(|(decay_constant, beta)| PrecursorFamily {
                        decay_constant,
                        fraction_by_group: vec![beta; groups],
                    })
                    .collect::<Vec<_>>()
            }
            DelayedInput::Matrix {
                decay_constants,
                fractions,
            } => {
                if decay_constants.len() != fractions.len() {
                    return Err(invalid(format!(
                        "{} decay constants for {} delayed families",
                        decay_constants.len(),
                        fractions.len()
                    )));
                }
                decay_constants
                    .into_iter()
                    .zip(fractions)
                    .map(|(decay_constant, row)| {
                        if row.len() != groups {
                            return Err(invalid(format!(
                                "delayed fraction row has {} groups, expected {}",
                                row.len(),
                                groups
                            )));
                        }
                        Ok(PrecursorFamily {
                            decay_constant,
                            fraction_by_group: row,
                        })
                    })
                    .collect::<Result<Vec<_>>>()?
            }
        };

        for family in &families {
            if family.decay_constant <= 0.0 {
                return Err(invalid(format!(
                    "non-positive decay constant {}",
                    family.decay_constant
                )));
            }
            if family.fraction_by_group.iter().any(|&b| b < 0.0) {
                return Err(invalid("negative delayed fraction".to_string()));
            }
        }
        for g in 0..groups {
            let total: f64 = families.iter().map(|f| f.fraction_by_group[g]).sum();
            if total > 1.0 + 1e-12 {
                return Err(invalid(format!(
                    "delayed fractions sum to {} > 1 in group {}",
                    total, g
                )));
            }
        }

        Ok(DelayedData { families })
    }
}

impl DelayedData {
    /// Total delayed fraction for fissions induced in `group`.
    pub fn total_fraction(&self, group: usize) -> f64 {
        self.families
            .iter()
            .map(|f| f.fraction_by_group[group])
            .sum()
    }

    /// Sample the precursor family for one fission neutron born from a
    /// fission in `group`. Returns None for a prompt neutron.
    pub fn sample_family<R: Rng + ?Sized>(&self, group: usize, rng: &mut R) -> Option<usize> {
        let xi: f64 = rng.gen();
        let mut cumulative = 0.0;
        for (index, family) in self.families.iter().enumerate() {
            cumulative += family.fraction_by_group[group];
            if xi < cumulative {
                return Some(index);
            }
        }
        None
    }
}

/// Macroscopic cross sections for one material, indexed by energy group.
/// All values are already scaled by the material density.
#[derive(Clone, Debug)]
pub struct MacroscopicXs {
    pub total: Vec<f64>,
    /// scatter[g][g']: scattering from group g into group g'
    pub scatter: Vec<Vec<f64>>,
    pub fission: Vec<f64>,
    pub nu_fission: Vec<f64>,
    /// Fission emission spectrum, normalized at construction.
    pub chi: Vec<f64>,
    pub delayed: Option<DelayedData>,
    /// Legendre moments a_l (l = 1..) of the scattering angular
    /// distribution per incident group, used only under the tabular
    /// Legendre scattering treatment. None means isotropic.
    pub scatter_moments: Option<Vec<Vec<f64>>>,
}

#[derive(Clone, Debug)]
pub struct Material {
    pub material_id: u32,
    pub name: Option<String>,
    pub density: f64,
    pub xs: MacroscopicXs,
}

impl Material {
    /// Build a material from unscaled cross sections, a density scaling
    /// factor, and optional delayed-neutron data in either encoding.
    /// Dimensions and signs are validated here so the tracker never has to.
    pub fn new(
        material_id: u32,
        name: Option<String>,
        density: f64,
        total: Vec<f64>,
        scatter: Vec<Vec<f64>>,
        fission: Vec<f64>,
        nu_fission: Vec<f64>,
        chi: Vec<f64>,
        delayed: Option<DelayedInput>,
    ) -> Result<Self> {
        let invalid = |message: String| TransportError::InvalidMaterial {
            material: material_id,
            message,
        };

        let groups = total.len();
        if groups == 0 {
            return Err(invalid("no energy groups".to_string()));
        }
        if density <= 0.0 {
            return Err(invalid(format!("non-positive density {}", density)));
        }
        for (label, v) in [
            ("fission", &fission),
            ("nu_fission", &nu_fission),
            ("chi", &chi),
        ] {
            if v.len() != groups {
                return Err(invalid(format!(
                    "{} has {} groups, expected {}",
                    label,
                    v.len(),
                    groups
                )));
            }
        }
        if scatter.len() != groups {
            return Err(invalid(format!(
                "scatter matrix has {} rows, expected {}",
                scatter.len(),
                groups
            )));
        }
        for (g, row) in scatter.iter().enumerate() {
            if row.len() != groups {
                return Err(invalid(format!(
                    "scatter row {} has {} columns, expected {}",
                    g,
                    row.len(),
                    groups
                )));
            }
        }
        let negative = total.iter().any(|&x| x < 0.0)
            || fission.iter().any(|&x| x < 0.0)
            || nu_fission.iter().any(|&x| x < 0.0)
            || chi.iter().any(|&x| x < 0.0)
            || scatter.iter().flatten().any(|&x| x < 0.0);
        if negative {
            return Err(invalid("negative cross section".to_string()));
        }

        // Normalize chi; an all-zero spectrum is only valid for a
        // non-fissionable material.
        let chi_sum: f64 = chi.iter().sum();
        let fissionable = nu_fission.iter().any(|&x| x > 0.0);
        let chi = if chi_sum > 0.0 {
            chi.iter().map(|&x| x / chi_sum).collect()
        } else if fissionable {
            return Err(invalid("fissionable material with zero chi".to_string()));
        } else {
            chi
        };

        let delayed = match delayed {
            Some(input) => Some(input.normalize(groups, material_id)?),
            None => None,
        };

        let scale = |v: Vec<f64>| v.into_iter().map(|x| x * density).collect::<Vec<f64>>();
        Ok(Material {
            material_id,
            name,
            density,
            xs: MacroscopicXs {
                total: scale(total),
                scatter: scatter
                    .into_iter()
                    .map(|row| row.into_iter().map(|x| x * density).collect())
                    .collect(),
                fission: scale(fission),
                nu_fission: scale(nu_fission),
                chi,
                delayed,
                scatter_moments: None,
            },
        })
    }

    /// Attach Legendre scattering moments, one row of a_l coefficients
    /// per incident group. Angular moments are shape data and are not
    /// scaled by density.
    pub fn with_scatter_moments(mut self, moments: Vec<Vec<f64>>) -> Result<Self> {
        if moments.len() != self.num_groups() {
            return Err(TransportError::InvalidMaterial {
                material: self.material_id,
                message: format!(
                    "scatter moments have {} rows, expected {}",
                    moments.len(),
                    self.num_groups()
                ),
            });
        }
        self.xs.scatter_moments = Some(moments);
        Ok(self)
    }

    /// Legendre moments for scattering out of `group`, if present.
    pub fn scatter_moments(&self, group: usize) -> Option<&[f64]> {
        self.xs
            .scatter_moments
            .as_ref()
            .map(|m| m[group].as_slice())
    }

    pub fn num_groups(&self) -> usize {
        self.xs.total.len()
    }

    pub fn total(&self, group: usize) -> f64 {
        self.xs.total[group]
    }

    pub fn fission(&self, group: usize) -> f64 {
        self.xs.fission[group]
    }

    pub fn nu_fission(&self, group: usize) -> f64 {
        self.xs.nu_fission[group]
    }

    pub fn scatter_row(&self, group: usize) -> &[f64] {
        &self.xs.scatter[group]
    }

    /// Total scattering out of a group (sum over outgoing groups).
    pub fn scatter_total(&self, group: usize) -> f64 {
        self.xs.scatter[group].iter().sum()
    }

    /// Mean fission neutron yield for fissions induced in `group`.
    pub fn nu(&self, group: usize) -> f64 {
        let fission = self.xs.fission[group];
        if fission > 0.0 {
            self.xs.nu_fission[group] / fission
        } else {
            0.0
        }
    }

    /// Sample the outgoing group of a scattering event in `group`.
    pub fn sample_scatter_group<R: Rng + ?Sized>(&self, group: usize, rng: &mut R) -> usize {
        sample_discrete(&self.xs.scatter[group], rng)
    }

    /// Sample the emission group of a fission neutron from chi.
    pub fn sample_chi_group<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        sample_discrete(&self.xs.chi, rng)
    }

    /// Sample the delayed-precursor family for a fission in `group`;
    /// None means prompt (or the material carries no delayed data).
    pub fn sample_delayed_family<R: Rng + ?Sized>(
        &self,
        group: usize,
        rng: &mut R,
    ) -> Option<usize> {
        self.xs
            .delayed
            .as_ref()
            .and_then(|d| d.sample_family(group, rng))
    }
}

/// Sample an index proportional to the (unnormalized) weights.
fn sample_discrete<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> usize {
    let total: f64 = weights.iter().sum();
    let target = rng.gen::<f64>() * total;
    let mut cumulative = 0.0;
    for (index, &w) in weights.iter().enumerate() {
        cumulative += w;
        if target < cumulative {
            return index;
        }
    }
    weights.len() - 1
}

/// Immutable lookup table of materials, indexed by position.
#[derive(Clone, Debug)]
pub struct MaterialTable {
    materials: Vec<Material>,
}

impl MaterialTable {
    /// Build the table, validating unique ids and a consistent group count.
    pub fn new(materials: Vec<Material>) -> Result<Self> {
        if materials.is_empty() {
            return Err(TransportError::Configuration(
                "material table is empty".to_string(),
            ));
        }
        let groups = materials[0].num_groups();
        let mut seen = std::collections::HashSet::new();
        for material in &materials {
            if !seen.insert(material.material_id) {
                return Err(TransportError::InvalidMaterial {
                    material: material.material_id,
                    message: "duplicate material_id".to_string(),
                });
            }
            if material.num_groups() != groups {
                return Err(TransportError::InvalidMaterial {
                    material: material.material_id,
                    message: format!(
                        "has {} groups, table uses {}",
                        material.num_groups(),
                        groups
                    ),
                });
            }
        }
        Ok(MaterialTable { materials })
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn num_groups(&self) -> usize {
        self.materials[0].num_groups()
    }

    pub fn get(&self, index: usize) -> Option<&Material> {
        self.materials.get(index)
    }

    /// Lookup required for a physical interaction: a missing index is an
    /// `UnknownMaterial` error attributed to the asking cell.
    pub fn require(&self, index: usize, cell: u32) -> Result<&Material> {
        self.materials
            .get(index)
            .ok_or(TransportError::UnknownMaterial {
                cell,
                material: index,
            })
    }
}
