//! Validated per-axis binning.
//!
//! Bin lookup is delegated to `ndhistogram`'s `Uniform` and `Variable` axes;
//! [`Binning`] lets the two kinds be mixed freely, one choice per axis.

use std::mem;

use ndhistogram::axis::{Axis, BinInterval, Uniform, Variable};

use crate::weighted::Weighted;
use crate::{Error, Result};

/// Unvalidated description of the bins along one axis.
#[derive(Clone, Debug, PartialEq)]
pub enum BinSpec {
    /// `bins` equal-width bins covering `[min, max)`
    Fixed { bins: usize, min: f64, max: f64 },
    /// `N` ascending edges describing `N-1` variable-width bins
    Edges(Vec<f64>),
}

/// Where a coordinate falls on an axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinPosition {
    Underflow,
    /// 0-based index among the in-range bins
    Bin(usize),
    Overflow,
}

/// A validated axis with fixed-width or variable-width bins.
///
/// Bins are half open, `[low, high)`. Coordinates below the first edge go to
/// the underflow bin; coordinates at or above the last edge, and NaN, go to the
/// overflow bin. Like `ndhistogram`'s own axes, `num_bins` counts both flow bins.
#[derive(Clone, Debug)]
pub struct Binning {
    axis: Kind,
    edges: Vec<f64>,
}

/// Largest number of in-range bins whose contents, flow bins included, fit in
/// one allocation.
pub(crate) const MAX_BINS: usize = isize::MAX as usize / mem::size_of::<Weighted>() - 2;

/// Fail unless the combined storage of `axes`, flow bins included, fits in one
/// allocation.
pub(crate) fn check_storage(axes: &[&Binning]) -> Result<()> {
    axes.iter()
        .try_fold(1_usize, |total, axis| total.checked_mul(axis.num_bins()))
        .filter(|&total| total <= MAX_BINS + 2)
        .map(|_| ())
        .ok_or_else(|| Error::Binning(format!(
            "{} bins cannot be stored",
            axes.iter().map(|axis| axis.num_bins().to_string()).collect::<Vec<_>>().join(" x "),
        )))
}

#[derive(Clone, Debug)]
enum Kind {
    Fixed(Uniform<f64>),
    Variable(Variable<f64>),
}

impl Binning {

    /// `bins` equal-width bins in `[min, max)`.
    pub fn fixed(bins: usize, min: f64, max: f64) -> Result<Self> {
        if bins == 0 {
            return Err(Error::Binning("need more than zero bins on axis".into()));
        }
        if !min.is_finite() || !max.is_finite() {
            return Err(Error::Binning(format!("axis range [{min}, {max}) is not finite")));
        }
        if min >= max {
            return Err(Error::Binning(format!("axis range [{min}, {max}) has non-positive width")));
        }
        if bins > MAX_BINS {
            return Err(Error::Binning(format!("{bins} bins on one axis cannot be stored")));
        }
        let range = max - min;
        let width = range / bins as f64;
        if !range.is_finite() || !width.is_normal() {
            return Err(Error::Binning(format!(
                "bin width of {bins} bins in [{min}, {max}) is not representable"
            )));
        }
        let edges = (0..=bins)
            .map(|i| if i == bins { max } else { min + width * i as f64 })
            .collect::<Vec<_>>();
        if edges.windows(2).any(|w| w[0] >= w[1]) {
            return Err(Error::Binning(format!(
                "{bins} bins in [{min}, {max}) are narrower than the resolution of their edges"
            )));
        }
        Ok(Self { axis: Kind::Fixed(Uniform::new(bins, min, max)), edges })
    }

    /// Variable-width bins between consecutive `edges`.
    pub fn variable(edges: &[f64]) -> Result<Self> {
        if edges.len() < 2 {
            return Err(Error::Binning(format!("need at least two bin edges, got {}", edges.len())));
        }
        if let Some(bad) = edges.iter().find(|e| !e.is_finite()) {
            return Err(Error::Binning(format!("bin edge {bad} is not finite")));
        }
        if let Some(i) = edges.windows(2).position(|w| w[0] >= w[1]) {
            return Err(Error::Binning(format!(
                "bin edges not strictly increasing: edge {i} ({}) >= edge {} ({})",
                edges[i], i + 1, edges[i + 1]
            )));
        }
        Ok(Self { axis: Kind::Variable(Variable::new(edges.to_vec())), edges: edges.to_vec() })
    }

    /// Number of in-range bins, excluding underflow and overflow.
    pub fn bins(&self) -> usize { self.edges.len() - 1 }

    pub fn low (&self) -> f64 { self.edges[0] }
    pub fn high(&self) -> f64 { self.edges[self.bins()] }

    /// All bin edges, from `low` to `high`.
    pub fn edges(&self) -> &[f64] { &self.edges }

    pub fn is_fixed(&self) -> bool { matches!(self.axis, Kind::Fixed(_)) }

    pub fn find(&self, x: f64) -> BinPosition {
        self.position(self.index(&x).unwrap_or(self.bins() + 1))
    }

    /// Position of the bin with storage index `index`, as used by [`Axis`].
    pub(crate) fn position(&self, index: usize) -> BinPosition {
        match index {
            0                     => BinPosition::Underflow,
            i if i <= self.bins() => BinPosition::Bin(i - 1),
            _                     => BinPosition::Overflow,
        }
    }
}

impl PartialEq for Binning {
    fn eq(&self, other: &Self) -> bool {
        self.is_fixed() == other.is_fixed() && self.edges == other.edges
    }
}

impl TryFrom<&BinSpec> for Binning {
    type Error = Error;

    fn try_from(spec: &BinSpec) -> Result<Self> {
        match spec {
            &BinSpec::Fixed { bins, min, max } => Self::fixed(bins, min, max),
            BinSpec::Edges(edges)              => Self::variable(edges),
        }
    }
}

impl Axis for Binning {
    type Coordinate = f64;
    type BinInterval = BinInterval<f64>;

    fn index(&self, coordinate: &f64) -> Option<usize> {
        if coordinate.is_nan() { return Some(self.bins() + 1) }
        match &self.axis {
            Kind::Fixed   (axis) => axis.index(coordinate).map(|i| i.min(self.bins() + 1)),
            Kind::Variable(axis) => axis.index(coordinate),
        }
    }

    fn num_bins(&self) -> usize { self.bins() + 2 }

    fn bin(&self, index: usize) -> Option<BinInterval<f64>> {
        match &self.axis {
            Kind::Fixed   (axis) => axis.bin(index),
            Kind::Variable(axis) => axis.bin(index),
        }
    }
}
