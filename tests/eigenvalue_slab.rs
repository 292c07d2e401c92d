// End-to-end eigenvalue run on a six-slab reactor model: six materials
// across six adjacent slab cells bounded by a reflective surface on the
// left and a vacuum surface on the right.

use multigroup_mc::source::{IndependentSource, SpatialDistribution};
use multigroup_mc::{
    BoundaryType, Cell, DelayedInput, Geometry, Material, MaterialTable, Model, Region,
    RunOutput, Settings, Surface, TransportError,
};

const SLAB_WIDTH: f64 = 154.9;
const NUM_SLABS: usize = 6;

/// Two-group cross sections for slab `index`, with delayed-neutron data
/// alternating between the vector and matrix encodings.
fn slab_material(index: usize) -> Material {
    let absorb = 0.08 + 0.005 * index as f64;
    let fission = vec![0.05, 0.12];
    let nu_fission = vec![0.05 * 2.5, 0.12 * 2.5];
    // Downscatter-dominated scattering matrix
    let scatter = vec![vec![0.20, 0.06], vec![0.01, 0.25]];
    let total = vec![
        absorb + fission[0] + scatter[0][0] + scatter[0][1],
        absorb + fission[1] + scatter[1][0] + scatter[1][1],
    ];
    let chi = vec![1.0, 0.0];

    let delayed = if index % 2 == 0 {
        DelayedInput::Vector {
            decay_constants: vec![0.0124, 0.0305],
            fractions: vec![0.0002, 0.0005],
        }
    } else {
        DelayedInput::Matrix {
            decay_constants: vec![0.0124, 0.0305],
            fractions: vec![vec![0.0002, 0.0002], vec![0.0005, 0.0005]],
        }
    };

    Material::new(
        (index + 1) as u32,
        Some(format!("slab {}", index + 1)),
        1.0,
        total,
        scatter,
        fission,
        nu_fission,
        chi,
        Some(delayed),
    )
    .unwrap()
}

fn six_slab_model(particles: usize, batches: usize, inactive: usize) -> Model {
    let mut surfaces = Vec::new();
    for i in 0..=NUM_SLABS {
        let boundary = if i == 0 {
            Some(BoundaryType::Reflective)
        } else if i == NUM_SLABS {
            Some(BoundaryType::Vacuum)
        } else {
            None
        };
        surfaces.push(Surface::x_plane(
            i as f64 * SLAB_WIDTH,
            (i + 1) as u32,
            boundary,
        ));
    }

    let cells = (0..NUM_SLABS)
        .map(|i| {
            Cell::new(
                (i + 1) as u32,
                Region::default().and_above(i).and_below(i + 1),
                Some(format!("slab cell {}", i + 1)),
                Some(i),
            )
        })
        .collect();

    let geometry = Geometry::new(surfaces, cells).unwrap();
    let materials = MaterialTable::new((0..NUM_SLABS).map(slab_material).collect()).unwrap();

    let source = IndependentSource::new(SpatialDistribution::Box {
        lower: [0.0, 0.0, 0.0],
        upper: [NUM_SLABS as f64 * SLAB_WIDTH, 0.0, 0.0],
    });
    let settings = Settings::eigenvalue(particles, batches, inactive, source);

    Model::new(geometry, materials, settings).unwrap()
}

#[test]
fn test_six_slab_eigenvalue_run() {
    let _ = env_logger::builder().is_test(true).try_init();
    let model = six_slab_model(1000, 10, 5);
    let output = model.run(None).unwrap();

    let results = match output {
        RunOutput::Eigenvalue(results) => results,
        RunOutput::FixedSource(_) => panic!("expected eigenvalue output"),
    };

    assert_eq!(results.completed_batches, 10);
    assert_eq!(results.k_by_batch.len(), 10);
    assert_eq!(results.inactive, 5);
    // Five active samples feed the statistics
    assert_eq!(results.tallies.leakage.n_batches(), 5);

    assert!(
        results.k_mean > 0.0 && results.k_mean < 2.0,
        "k-effective {} outside plausible range",
        results.k_mean
    );
    assert!(results.k_std_dev.is_finite());
    assert!(results.k_std_err.is_finite());
    for &k in &results.k_by_batch {
        assert!(k > 0.0 && k < 2.0, "batch k {} outside plausible range", k);
    }
}

#[test]
fn test_zero_particles_is_configuration_error() {
    let model = six_slab_model(1000, 10, 5);
    let mut settings = model.settings.clone();
    settings.particles = 0;
    let err = Model::new(model.geometry.clone(), model.materials.clone(), settings).unwrap_err();
    assert!(matches!(err, TransportError::Configuration(_)));
}

#[test]
fn test_inactive_equal_to_batches_is_configuration_error() {
    let model = six_slab_model(1000, 10, 5);
    let mut settings = model.settings.clone();
    settings.inactive = 10;
    let err = Model::new(model.geometry.clone(), model.materials.clone(), settings).unwrap_err();
    assert!(matches!(err, TransportError::Configuration(_)));
}

#[test]
fn test_k_sequence_independent_of_thread_count() {
    let model = six_slab_model(500, 4, 1);

    let run_with_threads = |threads: usize| {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .unwrap();
        pool.install(|| match model.run(None).unwrap() {
            RunOutput::Eigenvalue(results) => results.k_by_batch,
            RunOutput::FixedSource(_) => panic!("expected eigenvalue output"),
        })
    };

    let serial = run_with_threads(1);
    let parallel = run_with_threads(4);
    assert_eq!(serial, parallel, "k sequence depends on worker count");
}
