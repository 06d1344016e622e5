//! Rectangular absorber and detector regions.

use crate::{
    error::SimulationResult,
    geometry::Point2,
    tracing::{ftr, particle::ParticleState},
};
use atomic_counter::{AtomicCounter, RelaxedCounter};
use std::{fmt, sync::Arc};

#[cfg(feature = "serialization")]
use serde::Serialize;

#[cfg(feature = "statistics")]
use crate::ensemble::statistics::Histogram;

/// What happens to a particle entering a region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
#[cfg_attr(feature = "serialization", serde(rename_all = "snake_case"))]
pub enum OutcomeTag {
    /// The particle is stopped by a collimator or other obstacle.
    Absorbed,
    /// The particle is captured by a detector.
    Detected,
}

impl OutcomeTag {
    /// Returns the numerical code of the tag.
    pub fn code(self) -> u8 {
        match self {
            Self::Absorbed => 0,
            Self::Detected => 1,
        }
    }
}

/// A particle position found inside a region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct Collision {
    /// Index of the region in its set.
    pub region_index: usize,
    /// Tag of the region.
    pub tag: OutcomeTag,
}

/// Defines the properties of a hook invoked when a particle terminates in a region.
///
/// Observers are shared between all particles of an ensemble, which may be
/// simulated concurrently.
pub trait CollisionObserver: Sync + Send {
    /// Called once for each particle terminating in the observed region.
    fn on_collision(&self, collision: &Collision, state: &ParticleState);
}

/// An axis-aligned rectangle tagged with an outcome.
///
/// The rectangle is closed, so points on its sides are contained.
#[derive(Clone)]
pub struct AbsorberRegion {
    x1: ftr,
    x2: ftr,
    y1: ftr,
    y2: ftr,
    tag: OutcomeTag,
    observer: Option<Arc<dyn CollisionObserver>>,
}

impl AbsorberRegion {
    /// Creates a new region covering `[x1, x2] x [y1, y2]`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if any bound is not finite or
    /// `x1 > x2` or `y1 > y2`.
    pub fn new(x1: ftr, x2: ftr, y1: ftr, y2: ftr, tag: OutcomeTag) -> SimulationResult<Self> {
        crate::ensure_valid!(
            [x1, x2, y1, y2].iter().all(|bound| bound.is_finite()),
            "Absorber bounds must be finite, got [{}, {}] x [{}, {}]",
            x1,
            x2,
            y1,
            y2
        );
        crate::ensure_valid!(
            x1 <= x2 && y1 <= y2,
            "Absorber bounds must be ordered, got [{}, {}] x [{}, {}]",
            x1,
            x2,
            y1,
            y2
        );
        Ok(Self {
            x1,
            x2,
            y1,
            y2,
            tag,
            observer: None,
        })
    }

    /// Creates a new collimator region.
    pub fn absorber(x1: ftr, x2: ftr, y1: ftr, y2: ftr) -> SimulationResult<Self> {
        Self::new(x1, x2, y1, y2, OutcomeTag::Absorbed)
    }

    /// Creates a new detector region.
    pub fn detector(x1: ftr, x2: ftr, y1: ftr, y2: ftr) -> SimulationResult<Self> {
        Self::new(x1, x2, y1, y2, OutcomeTag::Detected)
    }

    /// Attaches an observer to the region, replacing any existing one.
    pub fn with_observer(mut self, observer: Arc<dyn CollisionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Whether the given point lies in the closed rectangle.
    pub fn contains(&self, point: &Point2<ftr>) -> bool {
        let (x, y) = (point.x(), point.y());
        self.x1 <= x && x <= self.x2 && self.y1 <= y && y <= self.y2
    }

    pub fn tag(&self) -> OutcomeTag {
        self.tag
    }

    /// Returns the bounds as `(x1, x2, y1, y2)`.
    pub fn bounds(&self) -> (ftr, ftr, ftr, ftr) {
        (self.x1, self.x2, self.y1, self.y2)
    }
}

impl fmt::Debug for AbsorberRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AbsorberRegion")
            .field("x1", &self.x1)
            .field("x2", &self.x2)
            .field("y1", &self.y1)
            .field("y2", &self.y2)
            .field("tag", &self.tag)
            .field("has_observer", &self.observer.is_some())
            .finish()
    }
}

/// Ordered collection of regions where earlier regions take priority.
#[derive(Clone, Debug, Default)]
pub struct AbsorberSet {
    regions: Vec<AbsorberRegion>,
}

impl AbsorberSet {
    /// Creates a new empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set from the given regions, in priority order.
    pub fn from_regions(regions: Vec<AbsorberRegion>) -> Self {
        Self { regions }
    }

    /// Appends a region with lower priority than all existing ones.
    pub fn add(&mut self, region: AbsorberRegion) {
        self.regions.push(region);
    }

    /// Appends a region and returns the set.
    pub fn with_region(mut self, region: AbsorberRegion) -> Self {
        self.add(region);
        self
    }

    pub fn regions(&self) -> &[AbsorberRegion] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Finds the first region containing the given position.
    pub fn test_collision(&self, position: &Point2<ftr>) -> Option<Collision> {
        self.regions
            .iter()
            .position(|region| region.contains(position))
            .map(|region_index| Collision {
                region_index,
                tag: self.regions[region_index].tag,
            })
    }

    /// Invokes the observer of the collided region, if it has one.
    pub fn notify(&self, collision: &Collision, state: &ParticleState) {
        if let Some(observer) = self
            .regions
            .get(collision.region_index)
            .and_then(|region| region.observer.as_ref())
        {
            observer.on_collision(collision, state);
        }
    }
}

/// Observer counting the particles terminating in a region.
pub struct HitCounter {
    hits: RelaxedCounter,
}

impl HitCounter {
    pub fn new() -> Self {
        Self {
            hits: RelaxedCounter::new(0),
        }
    }

    /// Returns the number of hits so far.
    pub fn count(&self) -> usize {
        self.hits.get()
    }
}

impl Default for HitCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HitCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HitCounter").field("hits", &self.count()).finish()
    }
}

impl CollisionObserver for HitCounter {
    fn on_collision(&self, _collision: &Collision, _state: &ParticleState) {
        self.hits.inc();
    }
}

/// Observer accumulating a histogram of the kinetic energy of particles
/// terminating in a region.
#[cfg(feature = "statistics")]
pub struct EnergySpectrum {
    lower: ftr,
    upper: ftr,
    bins: Vec<RelaxedCounter>,
    underflow: RelaxedCounter,
    overflow: RelaxedCounter,
}

#[cfg(feature = "statistics")]
impl EnergySpectrum {
    /// Creates a new empty spectrum with the given number of bins over the
    /// given kinetic energy range [eV].
    pub fn new(lower: ftr, upper: ftr, n_bins: usize) -> SimulationResult<Self> {
        // Validates the binning
        Histogram::new(lower, upper, n_bins)?;
        Ok(Self {
            lower,
            upper,
            bins: (0..n_bins).map(|_| RelaxedCounter::new(0)).collect(),
            underflow: RelaxedCounter::new(0),
            overflow: RelaxedCounter::new(0),
        })
    }

    /// Returns the histogram of kinetic energies recorded so far.
    pub fn snapshot(&self) -> Histogram {
        Histogram::from_counts(
            self.lower,
            self.upper,
            self.bins.iter().map(|bin| bin.get() as u64).collect(),
            self.underflow.get() as u64,
            self.overflow.get() as u64,
        )
    }
}

#[cfg(feature = "statistics")]
impl CollisionObserver for EnergySpectrum {
    fn on_collision(&self, _collision: &Collision, state: &ParticleState) {
        let energy = state.kinetic_energy();
        if energy < self.lower {
            self.underflow.inc();
        } else if energy > self.upper {
            self.overflow.inc();
        } else {
            let n_bins = self.bins.len();
            let idx = ((energy - self.lower) / (self.upper - self.lower) * n_bins as ftr) as usize;
            self.bins[idx.min(n_bins - 1)].inc();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimulationError;

    #[test]
    fn first_matching_region_wins() {
        let set = AbsorberSet::new()
            .with_region(AbsorberRegion::absorber(0.0, 2.0, 0.0, 2.0).unwrap())
            .with_region(AbsorberRegion::detector(1.0, 3.0, 1.0, 3.0).unwrap());
        assert_eq!(
            set.test_collision(&Point2::new(1.5, 1.5)),
            Some(Collision {
                region_index: 0,
                tag: OutcomeTag::Absorbed
            })
        );
        assert_eq!(
            set.test_collision(&Point2::new(2.5, 2.5)),
            Some(Collision {
                region_index: 1,
                tag: OutcomeTag::Detected
            })
        );
        assert_eq!(set.test_collision(&Point2::new(-0.5, 2.5)), None);
    }

    #[test]
    fn regions_are_closed() {
        let region = AbsorberRegion::absorber(-1.0, 1.0, 2.0, 3.0).unwrap();
        assert!(region.contains(&Point2::new(-1.0, 2.0)));
        assert!(region.contains(&Point2::new(1.0, 3.0)));
        assert!(!region.contains(&Point2::new(1.0 + 1e-12, 3.0)));
        let degenerate = AbsorberRegion::detector(0.5, 0.5, 0.0, 1.0).unwrap();
        assert!(degenerate.contains(&Point2::new(0.5, 0.5)));
    }

    #[test]
    fn malformed_regions_are_rejected() {
        assert!(matches!(
            AbsorberRegion::absorber(1.0, 0.0, 0.0, 1.0),
            Err(SimulationError::InvalidConfiguration(_))
        ));
        assert!(AbsorberRegion::absorber(0.0, 1.0, 1.0, 0.0).is_err());
        assert!(AbsorberRegion::absorber(0.0, ftr::NAN, 0.0, 1.0).is_err());
    }

    #[test]
    fn notify_reaches_only_the_collided_region() {
        let first = Arc::new(HitCounter::new());
        let second = Arc::new(HitCounter::new());
        let set = AbsorberSet::from_regions(vec![
            AbsorberRegion::absorber(0.0, 1.0, 0.0, 1.0)
                .unwrap()
                .with_observer(first.clone()),
            AbsorberRegion::detector(2.0, 3.0, 0.0, 1.0)
                .unwrap()
                .with_observer(second.clone()),
        ]);
        let state = ParticleState::planar(2.5, 0.5, 1.0, 0.0, 1.0, 1.0).unwrap();
        let collision = set.test_collision(&state.planar_position()).unwrap();
        set.notify(&collision, &state);
        assert_eq!(first.count(), 0);
        assert_eq!(second.count(), 1);
    }

    #[cfg(feature = "statistics")]
    #[test]
    fn energy_spectrum_bins_kinetic_energy() {
        let spectrum = EnergySpectrum::new(0.0, 10.0, 5).unwrap();
        let collision = Collision {
            region_index: 0,
            tag: OutcomeTag::Detected,
        };
        // Unit mass with momentum sqrt(35) has kinetic energy 5
        let state = ParticleState::planar(0.0, 0.0, 35.0_f64.sqrt(), 0.0, 1.0, 1.0).unwrap();
        spectrum.on_collision(&collision, &state);
        let fast = ParticleState::planar(0.0, 0.0, 1e3, 0.0, 1.0, 1.0).unwrap();
        spectrum.on_collision(&collision, &fast);
        let histogram = spectrum.snapshot();
        assert_eq!(histogram.counts(), &[0, 0, 1, 0, 0]);
        assert_eq!(histogram.overflow(), 1);
    }
}
