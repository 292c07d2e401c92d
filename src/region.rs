use crate::surface::Surface;

/// Which side of a surface a region keeps: `Positive` is the side where
/// the surface's signed evaluation is > 0, `Negative` where it is < 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sense {
    Positive,
    Negative,
}

/// One half-space constraint: a surface index into the geometry's surface
/// arena plus the sense the region keeps.
#[derive(Clone, Copy, Debug)]
pub struct Halfspace {
    pub surface: usize,
    pub sense: Sense,
}

/// A cell's region: the conjunction (logical AND) of signed half-spaces.
///
/// The recursive Boolean trees common in CSG engines flatten to this for
/// the nested 1-D models we track; the surfaces live in an arena owned by
/// the geometry and are referenced by index, so a region is a small flat
/// list rather than a shared object graph.
#[derive(Clone, Debug, Default)]
pub struct Region {
    pub halfspaces: Vec<Halfspace>,
}

impl Region {
    pub fn new(halfspaces: Vec<Halfspace>) -> Self {
        Region { halfspaces }
    }

    /// Add a constraint keeping the positive side of `surface`.
    pub fn and_above(mut self, surface: usize) -> Self {
        self.halfspaces.push(Halfspace {
            surface,
            sense: Sense::Positive,
        });
        self
    }

    /// Add a constraint keeping the negative side of `surface`.
    pub fn and_below(mut self, surface: usize) -> Self {
        self.halfspaces.push(Halfspace {
            surface,
            sense: Sense::Negative,
        });
        self
    }

    /// Point-in-region test: every listed half-space must be satisfied.
    /// Containment is strict, so points exactly on a surface belong to no
    /// region; the tracker nudges particles off surfaces before asking.
    pub fn contains(&self, surfaces: &[Surface], point: [f64; 3]) -> bool {
        self.halfspaces.iter().all(|hs| {
            let value = surfaces[hs.surface].evaluate(point);
            match hs.sense {
                Sense::Positive => value > 0.0,
                Sense::Negative => value < 0.0,
            }
        })
    }

    /// Largest surface index referenced, for arena bounds validation.
    pub fn max_surface_index(&self) -> Option<usize> {
        self.halfspaces.iter().map(|hs| hs.surface).max()
    }
}
