/// One neutron history's mutable state.
///
/// The containing cell is cached and recomputed only on boundary
/// crossings; everything else is owned by the history and dies with it.
#[derive(Debug, Clone)]
pub struct Particle {
    pub position: [f64; 3],
    pub direction: [f64; 3],
    pub group: usize,
    pub weight: f64,
    pub alive: bool,
    pub cell: Option<usize>,
}

impl Particle {
    pub fn new(position: [f64; 3], direction: [f64; 3], group: usize) -> Self {
        Self {
            position,
            direction,
            group,
            weight: 1.0,
            alive: true,
            cell: None,
        }
    }

    /// Advance the particle along its direction of flight.
    pub fn move_by(&mut self, distance: f64) {
        self.position[0] += distance * self.direction[0];
        self.position[1] += distance * self.direction[1];
        self.position[2] += distance * self.direction[2];
    }
}
