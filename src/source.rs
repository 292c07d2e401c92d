use rand::Rng;

use crate::particle::Particle;

/// Spatial distribution of source sites.
#[derive(Debug, Clone)]
pub enum SpatialDistribution {
    Point([f64; 3]),
    /// Uniform over an axis-aligned box.
    Box { lower: [f64; 3], upper: [f64; 3] },
}

impl SpatialDistribution {
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> [f64; 3] {
        match self {
            SpatialDistribution::Point(p) => *p,
            SpatialDistribution::Box { lower, upper } => {
                let mut p = [0.0; 3];
                for i in 0..3 {
                    p[i] = lower[i] + rng.gen::<f64>() * (upper[i] - lower[i]);
                }
                p
            }
        }
    }
}

/// Angular distribution of source directions.
#[derive(Debug, Clone)]
pub enum AngularDistribution {
    Isotropic,
    Monodirectional { reference_uvw: [f64; 3] },
}

impl AngularDistribution {
    /// Create a new monodirectional distribution from an unnormalized vector
    pub fn new_monodirectional(u: f64, v: f64, w: f64) -> Self {
        let mag = (u * u + v * v + w * w).sqrt();
        assert!(mag > 0.0, "direction vector cannot be zero");
        Self::Monodirectional {
            reference_uvw: [u / mag, v / mag, w / mag],
        }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> [f64; 3] {
        match self {
            AngularDistribution::Isotropic => crate::physics::isotropic_direction(rng),
            AngularDistribution::Monodirectional { reference_uvw } => *reference_uvw,
        }
    }
}

/// Starting energy-group distribution.
#[derive(Debug, Clone)]
pub enum GroupDistribution {
    Fixed(usize),
    /// Sample from an unnormalized spectrum, one weight per group.
    Spectrum(Vec<f64>),
}

impl GroupDistribution {
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        match self {
            GroupDistribution::Fixed(group) => *group,
            GroupDistribution::Spectrum(weights) => {
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
        }
    }
}

/// The initial source specification: where, which way, and in which group
/// particles are born before the fission bank takes over.
#[derive(Debug, Clone)]
pub struct IndependentSource {
    pub space: SpatialDistribution,
    pub angle: AngularDistribution,
    pub group: GroupDistribution,
}

impl IndependentSource {
    pub fn new(space: SpatialDistribution) -> Self {
        Self {
            space,
            angle: AngularDistribution::Isotropic,
            group: GroupDistribution::Fixed(0),
        }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Particle {
        Particle::new(
            self.space.sample(rng),
            self.angle.sample(rng),
            self.group.sample(rng),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_point_source() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut s = IndependentSource::new(SpatialDistribution::Point([1.0, 2.0, 3.0]));
        s.angle = AngularDistribution::new_monodirectional(0.0, 0.0, 1.0);
        s.group = GroupDistribution::Fixed(2);

        let p = s.sample(&mut rng);
        assert_eq!(p.position, [1.0, 2.0, 3.0]);
        assert_eq!(p.direction, [0.0, 0.0, 1.0]);
        assert_eq!(p.group, 2);
        assert!(p.alive);
    }

    #[test]
    fn test_box_source_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(2);
        let s = IndependentSource::new(SpatialDistribution::Box {
            lower: [-1.0, 0.0, 5.0],
            upper: [1.0, 2.0, 6.0],
        });
        for _ in 0..1000 {
            let p = s.sample(&mut rng);
            assert!(p.position[0] >= -1.0 && p.position[0] <= 1.0);
            assert!(p.position[1] >= 0.0 && p.position[1] <= 2.0);
            assert!(p.position[2] >= 5.0 && p.position[2] <= 6.0);
        }
    }

    #[test]
    fn test_isotropic_directions_are_unit_and_vary() {
        let mut rng = StdRng::seed_from_u64(3);
        let s = IndependentSource::new(SpatialDistribution::Point([0.0; 3]));
        let mut directions = Vec::new();
        for _ in 0..100 {
            let p = s.sample(&mut rng);
            let mag = (p.direction[0] * p.direction[0]
                + p.direction[1] * p.direction[1]
                + p.direction[2] * p.direction[2])
                .sqrt();
            assert!((mag - 1.0).abs() < 1e-10);
            directions.push(p.direction);
        }
        let first = directions[0];
        assert!(directions.iter().any(|&d| d != first));
    }

    #[test]
    fn test_group_spectrum_sampling() {
        let mut rng = StdRng::seed_from_u64(4);
        // All weight in group 1
        let dist = GroupDistribution::Spectrum(vec![0.0, 1.0, 0.0]);
        for _ in 0..100 {
            assert_eq!(dist.sample(&mut rng), 1);
        }
    }
}
