//! Multi-group Monte Carlo neutron transport with k-eigenvalue power
//! iteration.
//!
//! A model is built from three immutable parts: a [`Geometry`] of
//! arena-indexed surfaces and cells, a [`MaterialTable`] of multi-group
//! macroscopic cross sections (with optional delayed-neutron precursor
//! data and scattering moments), and run [`Settings`]. Particle histories
//! within a batch run in parallel; per-history random streams keyed by
//! (seed, batch, history) make results bit-reproducible for any worker
//! count.
//!
//! ```no_run
//! use multigroup_mc::{
//!     BoundaryType, Cell, Geometry, Material, MaterialTable, Model, Region,
//!     RunOutput, Settings, Surface,
//! };
//! use multigroup_mc::source::{IndependentSource, SpatialDistribution};
//!
//! let surfaces = vec![
//!     Surface::x_plane(0.0, 1, Some(BoundaryType::Reflective)),
//!     Surface::x_plane(10.0, 2, Some(BoundaryType::Vacuum)),
//! ];
//! let cells = vec![Cell::new(
//!     1,
//!     Region::default().and_above(0).and_below(1),
//!     Some("fuel".to_string()),
//!     Some(0),
//! )];
//! let geometry = Geometry::new(surfaces, cells)?;
//!
//! let fuel = Material::new(
//!     1, None, 1.0,
//!     vec![1.0],        // total
//!     vec![vec![0.3]],  // scatter
//!     vec![0.3],        // fission
//!     vec![0.75],       // nu-fission
//!     vec![1.0],        // chi
//!     None,
//! )?;
//! let materials = MaterialTable::new(vec![fuel])?;
//!
//! let source = IndependentSource::new(SpatialDistribution::Point([5.0, 0.0, 0.0]));
//! let settings = Settings::eigenvalue(1000, 10, 5, source);
//!
//! let model = Model::new(geometry, materials, settings)?;
//! if let RunOutput::Eigenvalue(results) = model.run(None)? {
//!     println!("k-effective = {:.5} +/- {:.5}", results.k_mean, results.k_std_err);
//! }
//! # Ok::<(), multigroup_mc::TransportError>(())
//! ```

pub mod bank;
pub mod cell;
pub mod eigenvalue;
pub mod error;
pub mod geometry;
pub mod material;
pub mod model;
pub mod particle;
pub mod physics;
pub mod region;
pub mod rng;
pub mod settings;
pub mod source;
pub mod stats;
pub mod surface;
pub mod tally;
pub mod transport;

pub use bank::{FissionBank, FissionSite};
pub use cell::Cell;
pub use eigenvalue::{
    run_eigenvalue, run_fixed_source, EigenvalueResults, FixedSourceResults,
};
pub use error::{Result, TransportError};
pub use geometry::Geometry;
pub use material::{DelayedData, DelayedInput, Material, MaterialTable, PrecursorFamily};
pub use model::{Model, RunOutput};
pub use particle::Particle;
pub use region::{Halfspace, Region, Sense};
pub use rng::FastRng;
pub use settings::{EnergyMode, RunMode, ScatteringTreatment, Settings};
pub use source::IndependentSource;
pub use stats::RunningStat;
pub use surface::{BoundaryType, Surface, SurfaceKind};
pub use tally::{BatchCounts, Tally, TallySet};
pub use transport::{transport_history, HistoryResult, TerminationCause};
