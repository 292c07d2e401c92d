// Collision physics for multi-group transport: interaction-type sampling,
// direction sampling (isotropic and tabular Legendre), and fission yield.

use nalgebra::Vector3;
use rand::Rng;

use crate::material::Material;
use crate::settings::ScatteringTreatment;

/// Outcome of interaction-type sampling at a collision point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionKind {
    Scatter,
    Capture,
    Fission,
}

/// Sample the interaction type proportional to the macroscopic cross
/// sections of `group`: scattering (row sum), fission, and capture as the
/// remainder of the total.
pub fn sample_collision<R: Rng + ?Sized>(
    material: &Material,
    group: usize,
    rng: &mut R,
) -> CollisionKind {
    let total = material.total(group);
    let scatter = material.scatter_total(group);
    let fission = material.fission(group);

    let xi = rng.gen::<f64>() * total;
    if xi < scatter {
        CollisionKind::Scatter
    } else if xi < scatter + fission {
        CollisionKind::Fission
    } else {
        CollisionKind::Capture
    }
}

/// Number of fission neutrons to bank for a fission with mean yield `nu`:
/// floor(nu) plus one more with probability frac(nu).
pub fn sample_fission_count<R: Rng + ?Sized>(nu: f64, rng: &mut R) -> usize {
    let base = nu.floor();
    let extra = if rng.gen::<f64>() < nu - base { 1 } else { 0 };
    base as usize + extra
}

/// Sample a direction uniformly over the unit sphere.
pub fn isotropic_direction<R: Rng + ?Sized>(rng: &mut R) -> [f64; 3] {
    let mu = 2.0 * rng.gen::<f64>() - 1.0;
    let phi = 2.0 * std::f64::consts::PI * rng.gen::<f64>();
    let sin_theta = (1.0 - mu * mu).sqrt();
    [sin_theta * phi.cos(), sin_theta * phi.sin(), mu]
}

/// Rotate a direction to a new one with cosine `mu` relative to the
/// original, with a uniformly random azimuthal angle.
pub fn rotate_direction<R: Rng + ?Sized>(direction: &mut [f64; 3], mu: f64, rng: &mut R) {
    let u_old = Vector3::new(direction[0], direction[1], direction[2]);
    let phi = 2.0 * std::f64::consts::PI * rng.gen::<f64>();
    let sin_theta = (1.0 - mu * mu).max(0.0).sqrt();

    // Build an orthonormal frame around the old direction
    let perp = if u_old.x.abs() < 0.99 {
        Vector3::new(1.0, 0.0, 0.0).cross(&u_old).normalize()
    } else {
        Vector3::new(0.0, 1.0, 0.0).cross(&u_old).normalize()
    };
    let ortho = u_old.cross(&perp);

    let u_new = mu * u_old + sin_theta * phi.cos() * perp + sin_theta * phi.sin() * ortho;
    direction[0] = u_new.x;
    direction[1] = u_new.y;
    direction[2] = u_new.z;
}

/// Sample the scattering cosine for the configured treatment.
///
/// Under the Legendre treatment the truncated expansion
/// p(mu) = 1/2 + sum_l (2l+1)/2 a_l P_l(mu) is tabulated on a uniform
/// cosine grid and inverted; materials without moments fall back to
/// isotropic.
pub fn sample_mu<R: Rng + ?Sized>(
    treatment: &ScatteringTreatment,
    material: &Material,
    group: usize,
    rng: &mut R,
) -> f64 {
    match treatment {
        ScatteringTreatment::Isotropic => 2.0 * rng.gen::<f64>() - 1.0,
        ScatteringTreatment::Legendre(order) => match material.scatter_moments(group) {
            Some(moments) => {
                let order = (*order).min(moments.len());
                sample_tabular_legendre(&moments[..order], rng)
            }
            None => 2.0 * rng.gen::<f64>() - 1.0,
        },
    }
}

/// Number of table points for the tabularized angular distribution.
const MU_TABLE_POINTS: usize = 65;

fn sample_tabular_legendre<R: Rng + ?Sized>(moments: &[f64], rng: &mut R) -> f64 {
    // Tabulate the expansion, clamping negative lobes of the truncated
    // series to zero.
    let mut mu_grid = [0.0; MU_TABLE_POINTS];
    let mut pdf = [0.0; MU_TABLE_POINTS];
    for i in 0..MU_TABLE_POINTS {
        let mu = -1.0 + 2.0 * i as f64 / (MU_TABLE_POINTS - 1) as f64;
        mu_grid[i] = mu;
        let mut p = 0.5;
        for (l, &a) in moments.iter().enumerate() {
            let order = l + 1;
            p += (2.0 * order as f64 + 1.0) / 2.0 * a * legendre(order, mu);
        }
        pdf[i] = p.max(0.0);
    }

    // Trapezoid CDF over the grid
    let mut cdf = [0.0; MU_TABLE_POINTS];
    for i in 1..MU_TABLE_POINTS {
        let dmu = mu_grid[i] - mu_grid[i - 1];
        cdf[i] = cdf[i - 1] + 0.5 * (pdf[i] + pdf[i - 1]) * dmu;
    }
    let total = cdf[MU_TABLE_POINTS - 1];
    if total <= 0.0 {
        // Degenerate moments; fall back to isotropic
        return 2.0 * rng.gen::<f64>() - 1.0;
    }

    // Invert by linear interpolation within the bracketing bin
    let target = rng.gen::<f64>() * total;
    for i in 1..MU_TABLE_POINTS {
        if target <= cdf[i] {
            let span = cdf[i] - cdf[i - 1];
            let frac = if span > 0.0 {
                (target - cdf[i - 1]) / span
            } else {
                0.5
            };
            return mu_grid[i - 1] + frac * (mu_grid[i] - mu_grid[i - 1]);
        }
    }
    mu_grid[MU_TABLE_POINTS - 1]
}

/// Legendre polynomial P_n(x) by the Bonnet recurrence.
fn legendre(n: usize, x: f64) -> f64 {
    match n {
        0 => 1.0,
        1 => x,
        _ => {
            let mut p0 = 1.0;
            let mut p1 = x;
            for k in 2..=n {
                let p2 = ((2 * k - 1) as f64 * x * p1 - (k - 1) as f64 * p0) / k as f64;
                p0 = p1;
                p1 = p2;
            }
            p1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Material;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn material(total: f64, scatter: f64, fission: f64) -> Material {
        Material::new(
            1,
            None,
            1.0,
            vec![total],
            vec![vec![scatter]],
            vec![fission],
            vec![fission * 2.5],
            vec![if fission > 0.0 { 1.0 } else { 0.0 }],
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_legendre_polynomials() {
        assert_eq!(legendre(0, 0.3), 1.0);
        assert_eq!(legendre(1, 0.3), 0.3);
        // P2(x) = (3x^2 - 1)/2
        assert!((legendre(2, 0.5) - (3.0 * 0.25 - 1.0) / 2.0).abs() < 1e-12);
        // P3(1) = 1 for all orders at x = 1
        assert!((legendre(3, 1.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_collision_kind_proportions() {
        // total 1.0: scatter 0.5, fission 0.2, capture 0.3
        let mat = material(1.0, 0.5, 0.2);
        let mut rng = StdRng::seed_from_u64(5);
        let n = 100_000;
        let mut scatters = 0;
        let mut fissions = 0;
        for _ in 0..n {
            match sample_collision(&mat, 0, &mut rng) {
                CollisionKind::Scatter => scatters += 1,
                CollisionKind::Fission => fissions += 1,
                CollisionKind::Capture => {}
            }
        }
        assert!((scatters as f64 / n as f64 - 0.5).abs() < 0.01);
        assert!((fissions as f64 / n as f64 - 0.2).abs() < 0.01);
    }

    #[test]
    fn test_pure_absorber_never_scatters() {
        let mat = material(1.0, 0.0, 0.0);
        let mut rng = StdRng::seed_from_u64(6);
        for _ in 0..1000 {
            assert_eq!(sample_collision(&mat, 0, &mut rng), CollisionKind::Capture);
        }
    }

    #[test]
    fn test_fission_count_mean() {
        let mut rng = StdRng::seed_from_u64(7);
        let n = 100_000;
        let total: usize = (0..n).map(|_| sample_fission_count(2.43, &mut rng)).sum();
        let mean = total as f64 / n as f64;
        assert!((mean - 2.43).abs() < 0.02, "mean {} far from 2.43", mean);
    }

    #[test]
    fn test_isotropic_direction_is_unit() {
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..1000 {
            let d = isotropic_direction(&mut rng);
            let mag = (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt();
            assert!((mag - 1.0).abs() < 1e-10);
        }
    }

    #[test]
    fn test_rotate_direction_gives_requested_cosine() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..100 {
            let original = isotropic_direction(&mut rng);
            let mut rotated = original;
            let mu = 2.0 * rng.gen::<f64>() - 1.0;
            rotate_direction(&mut rotated, mu, &mut rng);
            let dot = original[0] * rotated[0]
                + original[1] * rotated[1]
                + original[2] * rotated[2];
            assert!((dot - mu).abs() < 1e-10);
            let mag =
                (rotated[0] * rotated[0] + rotated[1] * rotated[1] + rotated[2] * rotated[2])
                    .sqrt();
            assert!((mag - 1.0).abs() < 1e-10);
        }
    }

    #[test]
    fn test_legendre_mu_forward_bias() {
        // a_1 = 0.3 keeps p(mu) = 0.5 + 0.45 mu positive on [-1, 1], so
        // the sampled mean cosine equals a_1
        let mat = material(1.0, 0.5, 0.0)
            .with_scatter_moments(vec![vec![0.3]])
            .unwrap();
        let mut rng = StdRng::seed_from_u64(10);
        let n = 50_000;
        let mean: f64 = (0..n)
            .map(|_| sample_mu(&ScatteringTreatment::Legendre(1), &mat, 0, &mut rng))
            .sum::<f64>()
            / n as f64;
        assert!((mean - 0.3).abs() < 0.02, "mean mu {} far from 0.3", mean);
    }

    #[test]
    fn test_legendre_mu_clamped_negative_lobe() {
        // a_1 = 0.6 makes p(mu) = 0.5 + 0.9 mu negative below mu = -5/9;
        // the clamped density has mean 0.5243 / 1.0889 ~= 0.4815
        let mat = material(1.0, 0.5, 0.0)
            .with_scatter_moments(vec![vec![0.6]])
            .unwrap();
        let mut rng = StdRng::seed_from_u64(12);
        let n = 50_000;
        let mut min_mu = 1.0f64;
        let mean: f64 = (0..n)
            .map(|_| {
                let mu = sample_mu(&ScatteringTreatment::Legendre(1), &mat, 0, &mut rng);
                min_mu = min_mu.min(mu);
                mu
            })
            .sum::<f64>()
            / n as f64;
        assert!((mean - 0.4815).abs() < 0.02, "mean mu {} far from 0.4815", mean);
        // No samples from the clamped region
        assert!(min_mu > -5.0 / 9.0 - 0.05, "sampled mu {} in clamped lobe", min_mu);
    }

    #[test]
    fn test_legendre_without_moments_falls_back_isotropic() {
        let mat = material(1.0, 0.5, 0.0);
        let mut rng = StdRng::seed_from_u64(11);
        let n = 50_000;
        let mean: f64 = (0..n)
            .map(|_| sample_mu(&ScatteringTreatment::Legendre(3), &mat, 0, &mut rng))
            .sum::<f64>()
            / n as f64;
        assert!(mean.abs() < 0.02, "mean mu {} not near 0", mean);
    }
}
