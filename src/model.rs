// The validated in-memory model: geometry, material table, and run
// settings bound together. Construction performs every cross-entity
// check so the drivers can assume a well-formed model; cell-to-material
// references in particular are resolved here and never fail mid-track.

use std::sync::atomic::AtomicBool;

use crate::eigenvalue::{
    run_eigenvalue, run_fixed_source, EigenvalueResults, FixedSourceResults,
};
use crate::error::{Result, TransportError};
use crate::geometry::Geometry;
use crate::material::MaterialTable;
use crate::settings::{RunMode, Settings};
use crate::source::GroupDistribution;

/// Output of a completed run, by run mode.
#[derive(Debug, Clone)]
pub enum RunOutput {
    Eigenvalue(EigenvalueResults),
    FixedSource(FixedSourceResults),
}

#[derive(Debug, Clone)]
pub struct Model {
    pub geometry: Geometry,
    pub materials: MaterialTable,
    pub settings: Settings,
}

impl Model {
    pub fn new(
        geometry: Geometry,
        materials: MaterialTable,
        settings: Settings,
    ) -> Result<Self> {
        settings.validate()?;

        for cell in &geometry.cells {
            if let Some(material_index) = cell.material {
                materials.require(material_index, cell.cell_id)?;
            }
        }

        let groups = materials.num_groups();
        match &settings.source.group {
            GroupDistribution::Fixed(group) => {
                if *group >= groups {
                    return Err(TransportError::Configuration(format!(
                        "source group {} out of range for {} groups",
                        group, groups
                    )));
                }
            }
            GroupDistribution::Spectrum(weights) => {
                if weights.len() != groups {
                    return Err(TransportError::Configuration(format!(
                        "source spectrum has {} entries, expected {}",
                        weights.len(),
                        groups
                    )));
                }
            }
        }

        Ok(Model {
            geometry,
            materials,
            settings,
        })
    }

    /// Run the model to completion, or until `stop` is raised at a batch
    /// barrier.
    pub fn run(&self, stop: Option<&AtomicBool>) -> Result<RunOutput> {
        match self.settings.run_mode {
            RunMode::Eigenvalue => run_eigenvalue(
                &self.geometry,
                &self.materials,
                &self.settings,
                stop,
            )
            .map(RunOutput::Eigenvalue),
            RunMode::FixedSource => run_fixed_source(
                &self.geometry,
                &self.materials,
                &self.settings,
                stop,
            )
            .map(RunOutput::FixedSource),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;
    use crate::material::Material;
    use crate::region::Region;
    use crate::source::{IndependentSource, SpatialDistribution};
    use crate::surface::{BoundaryType, Surface};

    fn one_group_material() -> Material {
        Material::new(
            1,
            None,
            1.0,
            vec![1.0],
            vec![vec![0.3]],
            vec![0.3],
            vec![0.75],
            vec![1.0],
            None,
        )
        .unwrap()
    }

    fn slab_geometry(material: Option<usize>) -> Geometry {
        let surfaces = vec![
            Surface::x_plane(0.0, 1, Some(BoundaryType::Reflective)),
            Surface::x_plane(10.0, 2, Some(BoundaryType::Vacuum)),
        ];
        let cells = vec![Cell::new(
            1,
            Region::default().and_above(0).and_below(1),
            None,
            material,
        )];
        Geometry::new(surfaces, cells).unwrap()
    }

    fn source() -> IndependentSource {
        IndependentSource::new(SpatialDistribution::Point([5.0, 0.0, 0.0]))
    }

    #[test]
    fn test_valid_model_builds() {
        let model = Model::new(
            slab_geometry(Some(0)),
            MaterialTable::new(vec![one_group_material()]).unwrap(),
            Settings::eigenvalue(100, 4, 1, source()),
        );
        assert!(model.is_ok());
    }

    #[test]
    fn test_unknown_material_caught_at_build() {
        let err = Model::new(
            slab_geometry(Some(3)),
            MaterialTable::new(vec![one_group_material()]).unwrap(),
            Settings::eigenvalue(100, 4, 1, source()),
        )
        .unwrap_err();
        assert_eq!(
            err,
            TransportError::UnknownMaterial {
                cell: 1,
                material: 3
            }
        );
    }

    #[test]
    fn test_source_group_out_of_range_rejected() {
        let mut settings = Settings::eigenvalue(100, 4, 1, source());
        settings.source.group = GroupDistribution::Fixed(5);
        let err = Model::new(
            slab_geometry(Some(0)),
            MaterialTable::new(vec![one_group_material()]).unwrap(),
            settings,
        )
        .unwrap_err();
        assert!(matches!(err, TransportError::Configuration(_)));
    }

    #[test]
    fn test_run_dispatches_on_mode() {
        let model = Model::new(
            slab_geometry(Some(0)),
            MaterialTable::new(vec![one_group_material()]).unwrap(),
            Settings::eigenvalue(100, 4, 1, source()),
        )
        .unwrap();
        match model.run(None).unwrap() {
            RunOutput::Eigenvalue(results) => {
                assert_eq!(results.completed_batches, 4);
            }
            RunOutput::FixedSource(_) => panic!("expected eigenvalue output"),
        }

        let model = Model::new(
            slab_geometry(Some(0)),
            MaterialTable::new(vec![one_group_material()]).unwrap(),
            Settings::fixed_source(100, 3, source()),
        )
        .unwrap();
        match model.run(None).unwrap() {
            RunOutput::FixedSource(results) => {
                assert_eq!(results.completed_batches, 3);
            }
            RunOutput::Eigenvalue(_) => panic!("expected fixed-source output"),
        }
    }
}
