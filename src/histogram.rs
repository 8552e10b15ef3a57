//! Named 1, 2 or 3-dimensional histograms with weighted bin contents.

use std::fmt;

use itertools::Itertools;
use ndhistogram::{ndhistogram, axis::Axis, AxesTuple, HistND, Histogram as _};
use serde::{Deserialize, Serialize};

use crate::binning::{BinPosition, Binning};
use crate::weighted::Weighted;
use crate::{Error, Result};

/// The axes of a histogram: a tuple of one to three [`Binning`]s.
pub trait AxisSet: Clone + PartialEq + fmt::Debug + Send + Sync {
    /// One coordinate per axis: `f64`, `(f64, f64)` or `(f64, f64, f64)`
    type Coordinate;
    /// Axis names, in order, as used in error messages
    const NAMES: &'static [&'static str];
    fn binnings(&self) -> Vec<&Binning>;
}

impl AxisSet for (Binning,) {
    type Coordinate = f64;
    const NAMES: &'static [&'static str] = &["x"];
    fn binnings(&self) -> Vec<&Binning> { vec![&self.0] }
}

impl AxisSet for (Binning, Binning) {
    type Coordinate = (f64, f64);
    const NAMES: &'static [&'static str] = &["x", "y"];
    fn binnings(&self) -> Vec<&Binning> { vec![&self.0, &self.1] }
}

impl AxisSet for (Binning, Binning, Binning) {
    type Coordinate = (f64, f64, f64);
    const NAMES: &'static [&'static str] = &["x", "y", "z"];
    fn binnings(&self) -> Vec<&Binning> { vec![&self.0, &self.1, &self.2] }
}

/// A named histogram whose bins hold [`Weighted`] contents.
///
/// Storage and bin lookup belong to `ndhistogram`. Every axis carries an
/// underflow and an overflow bin; bins are stored with the `x` index varying
/// fastest, flow bins included.
#[derive(Clone)]
pub struct Histogram<A: AxisSet> {
    name: String,
    axes: A,
    storage: HistND<A, Weighted>,
}

pub type Histogram1D = Histogram<(Binning,)>;
pub type Histogram2D = Histogram<(Binning, Binning)>;
pub type Histogram3D = Histogram<(Binning, Binning, Binning)>;

impl Histogram1D {
    pub fn new(name: impl Into<String>, x: Binning) -> Self {
        let storage = ndhistogram!(x.clone(); Weighted);
        Self { name: name.into(), axes: (x,), storage }
    }

    /// Content of in-range bin `i` (0-based).
    pub fn bin_content(&self, i: usize) -> Option<Weighted> {
        if i >= self.axes.0.bins() { return None }
        self.storage.value_at_index(i + 1).copied()
    }

    pub fn underflow(&self) -> Weighted {
        self.storage.value_at_index(0).copied().unwrap_or_default()
    }

    pub fn overflow(&self) -> Weighted {
        self.storage.value_at_index(self.axes.0.bins() + 1).copied().unwrap_or_default()
    }
}

impl Histogram2D {
    pub fn new(name: impl Into<String>, x: Binning, y: Binning) -> Self {
        let storage = ndhistogram!(x.clone(), y.clone(); Weighted);
        Self { name: name.into(), axes: (x, y), storage }
    }
}

impl Histogram3D {
    pub fn new(name: impl Into<String>, x: Binning, y: Binning, z: Binning) -> Self {
        let storage = ndhistogram!(x.clone(), y.clone(), z.clone(); Weighted);
        Self { name: name.into(), axes: (x, y, z), storage }
    }
}

impl<A> Histogram<A>
where
    A: AxisSet,
    AxesTuple<A>: Axis<Coordinate = A::Coordinate>,
{
    pub fn name(&self) -> &str { &self.name }

    pub fn set_name(&mut self, name: impl Into<String>) { self.name = name.into(); }

    pub fn axes(&self) -> &A { &self.axes }

    pub fn dimensions(&self) -> usize { A::NAMES.len() }

    /// Add `weight` to the bin containing `coordinate`. Out-of-range
    /// coordinates land in the flow bins.
    pub fn fill(&mut self, coordinate: &A::Coordinate, weight: f64) {
        self.storage.fill_with(coordinate, weight);
    }

    /// Content of the bin containing `coordinate`.
    pub fn bin(&self, coordinate: &A::Coordinate) -> Weighted {
        self.storage.value(coordinate).copied().unwrap_or_default()
    }

    /// Sum of weights in the bin containing `coordinate`.
    pub fn content(&self, coordinate: &A::Coordinate) -> f64 { self.bin(coordinate).sumw() }

    /// Every bin, flow bins included, in storage order.
    pub fn contents(&self) -> impl Iterator<Item = &Weighted> + '_ { self.storage.values() }

    /// Sum of weights over all bins, flow bins included.
    pub fn sum_of_weights(&self) -> f64 { self.contents().map(Weighted::sumw).sum() }

    /// Sum of weights over the in-range bins only.
    pub fn integral(&self) -> f64 {
        self.contents()
            .enumerate()
            .filter(|(index, _)| self.positions(*index).iter().all(|p| matches!(p, BinPosition::Bin(_))))
            .map(|(_, bin)| bin.sumw())
            .sum()
    }

    /// Number of fills, flow bins included.
    pub fn entries(&self) -> u64 { self.contents().map(Weighted::entries).sum() }

    /// Per-axis position of the bin at storage `index`.
    pub fn positions(&self, mut index: usize) -> Vec<BinPosition> {
        self.axes.binnings().into_iter()
            .map(|axis| {
                let n = axis.num_bins();
                let position = axis.position(index % n);
                index /= n;
                position
            })
            .collect()
    }

    pub fn same_binning(&self, other: &Self) -> bool { self.axes == other.axes }

    /// Add the contents of `other`, bin by bin, flow bins included.
    pub fn add(&mut self, other: &Self) -> Result<()> {
        if !self.same_binning(other) {
            return Err(Error::BinningMismatch { this: self.name.clone(), other: other.name.clone() });
        }
        for (sum, partial) in self.storage.values_mut().zip(other.storage.values()) {
            *sum += partial;
        }
        Ok(())
    }

    /// Flat, serializable copy of the histogram.
    pub fn export(&self) -> HistogramExport {
        HistogramExport {
            name   : self.name.clone(),
            edges  : self.axes.binnings().iter().map(|axis| axis.edges().to_vec()).collect(),
            sumw   : self.contents().map(Weighted::sumw   ).collect(),
            sumw2  : self.contents().map(Weighted::sumw2  ).collect(),
            entries: self.contents().map(Weighted::entries).collect(),
        }
    }
}

impl<A> fmt::Debug for Histogram<A>
where
    A: AxisSet,
    AxesTuple<A>: Axis<Coordinate = A::Coordinate>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Histogram")
            .field("name", &self.name)
            .field("axes", &self.axes)
            .field("entries", &self.entries())
            .field("sum_of_weights", &self.sum_of_weights())
            .finish()
    }
}

impl<A> fmt::Display for Histogram<A>
where
    A: AxisSet,
    AxesTuple<A>: Axis<Coordinate = A::Coordinate>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shape = self.axes.binnings().iter().map(|axis| axis.bins()).join(" x ");
        writeln!(f, "{} [{shape}] entries: {} sum of weights: {}",
                 self.name, self.entries(), self.sum_of_weights())?;
        for (index, bin) in self.contents().enumerate().filter(|(_, bin)| !bin.is_empty()) {
            let bin_range = self.axes.binnings().iter()
                .zip(self.positions(index))
                .map(|(axis, position)| match position {
                    BinPosition::Underflow => format!("(-inf, {})", axis.low()),
                    BinPosition::Overflow  => format!("[{}, +inf)", axis.high()),
                    BinPosition::Bin(i)    => format!("[{}, {})", axis.edges()[i], axis.edges()[i + 1]),
                })
                .join(" x ");
            writeln!(f, "  {bin_range}: {} +- {}", bin.sumw(), bin.error())?;
        }
        Ok(())
    }
}

/// Flat representation of a histogram for persistence: per-axis edges plus
/// per-bin sums in storage order (`x` fastest, flow bins included).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistogramExport {
    pub name: String,
    pub edges: Vec<Vec<f64>>,
    pub sumw: Vec<f64>,
    pub sumw2: Vec<f64>,
    pub entries: Vec<u64>,
}
