//! Histogram-filling queries.
//!
//! [`Hist`] plugs a 1, 2 or 3-dimensional [`Histogram`] into the
//! [`Query`] interface: it is filled once per event with one [`Observable`]
//! per axis and a weight, hands out its histogram as a shared handle, and
//! merges the partial histograms of independently processed partitions.

use std::marker::PhantomData;
use std::sync::Arc;

use ndhistogram::{axis::Axis, AxesTuple};
use num_traits::AsPrimitive;
use queryflow::{Observable, Query};

use crate::binning::{check_storage, BinSpec, Binning};
use crate::histogram::{AxisSet, Histogram};
use crate::{Error, Result};

/// Histogram query over axes `A`, fed with observables of precision `T`.
pub struct Hist<A: AxisSet, T = f64> {
    histogram: Arc<Histogram<A>>,
    precision: PhantomData<fn() -> T>,
}

pub type Hist1D<T = f64> = Hist<(Binning,), T>;
pub type Hist2D<T = f64> = Hist<(Binning, Binning), T>;
pub type Hist3D<T = f64> = Hist<(Binning, Binning, Binning), T>;

impl<T> Hist1D<T> {
    pub fn new(name: &str, x: &BinSpec) -> Result<Self> {
        let x = Binning::try_from(x)?;
        check_storage(&[&x])?;
        Ok(Self::wrap(Histogram::<(Binning,)>::new(name, x)))
    }

    /// `bins` equal-width bins in `[min, max)`.
    pub fn fixed(name: &str, bins: usize, min: f64, max: f64) -> Result<Self> {
        Self::new(name, &BinSpec::Fixed { bins, min, max })
    }

    /// Variable-width bins between consecutive `edges`.
    pub fn variable(name: &str, edges: &[f64]) -> Result<Self> {
        Self::new(name, &BinSpec::Edges(edges.to_vec()))
    }
}

impl<T> Hist2D<T> {
    pub fn new(name: &str, x: &BinSpec, y: &BinSpec) -> Result<Self> {
        let (x, y) = (Binning::try_from(x)?, Binning::try_from(y)?);
        check_storage(&[&x, &y])?;
        Ok(Self::wrap(Histogram::<(Binning, Binning)>::new(name, x, y)))
    }
}

impl<T> Hist3D<T> {
    pub fn new(name: &str, x: &BinSpec, y: &BinSpec, z: &BinSpec) -> Result<Self> {
        let (x, y, z) = (Binning::try_from(x)?, Binning::try_from(y)?, Binning::try_from(z)?);
        check_storage(&[&x, &y, &z])?;
        Ok(Self::wrap(Histogram::<(Binning, Binning, Binning)>::new(name, x, y, z)))
    }
}

impl<A, T> Hist<A, T>
where
    A: AxisSet,
    AxesTuple<A>: Axis<Coordinate = A::Coordinate>,
{
    fn wrap(histogram: Histogram<A>) -> Self {
        tracing::debug!(name = histogram.name(), dimensions = histogram.dimensions(), "booked histogram");
        Self { histogram: Arc::new(histogram), precision: PhantomData }
    }

    pub fn name(&self) -> &str { self.histogram.name() }

    /// Fill every coordinate tuple produced by `source`, each with `weight`.
    ///
    /// The source is validated before anything is filled, so a shape error
    /// leaves the histogram untouched. If the histogram has been handed out
    /// by `result`, it is copied before being modified.
    fn fill_from<S>(&mut self, source: S, weight: f64) -> Result<()>
    where
        S: CoordinateSource<Coordinate = A::Coordinate>,
    {
        let batch = source.batch_len()?;
        let histogram = Arc::make_mut(&mut self.histogram);
        match batch {
            None    => histogram.fill(&source.coordinate(0), weight),
            Some(n) => for i in 0..n { histogram.fill(&source.coordinate(i), weight) },
        }
        Ok(())
    }

    /// Copy of the first partial result with all the others added to it, in order.
    fn merged(results: &[Arc<Histogram<A>>]) -> Result<Arc<Histogram<A>>> {
        let (first, rest) = results.split_first().ok_or(Error::EmptyMerge)?;
        let mut merged = (**first).clone();
        for partial in rest {
            merged.add(partial)?;
        }
        tracing::debug!(name = merged.name(), partials = results.len(), "merged histograms");
        Ok(Arc::new(merged))
    }
}

/// One set of per-axis observables for a single event.
///
/// Yields either one coordinate tuple (all axes scalar) or a batch of
/// `batch_len` tuples, one per array element, with scalar axes broadcast.
trait CoordinateSource {
    type Coordinate;

    /// `None` if every axis is scalar, otherwise the common length of the
    /// array-valued axes.
    fn batch_len(&self) -> Result<Option<usize>>;

    fn coordinate(&self, i: usize) -> Self::Coordinate;
}

/// Common length of the array-valued axes, if any.
fn common_len(lengths: &[(&'static str, Option<usize>)]) -> Result<Option<usize>> {
    let mut arrays = lengths.iter().filter_map(|&(name, len)| len.map(|len| (name, len)));
    let Some((first, first_len)) = arrays.next() else { return Ok(None) };
    for (second, second_len) in arrays {
        if second_len != first_len {
            return Err(Error::ShapeMismatch { first, second, first_len, second_len });
        }
    }
    Ok(Some(first_len))
}

impl<T: AsPrimitive<f64>> CoordinateSource for (Observable<'_, T>,) {
    type Coordinate = f64;

    fn batch_len(&self) -> Result<Option<usize>> { Ok(self.0.array_len()) }

    fn coordinate(&self, i: usize) -> f64 { self.0.at(i).as_() }
}

impl<T: AsPrimitive<f64>> CoordinateSource for (Observable<'_, T>, Observable<'_, T>) {
    type Coordinate = (f64, f64);

    fn batch_len(&self) -> Result<Option<usize>> {
        common_len(&[("x", self.0.array_len()), ("y", self.1.array_len())])
    }

    fn coordinate(&self, i: usize) -> (f64, f64) { (self.0.at(i).as_(), self.1.at(i).as_()) }
}

impl<T: AsPrimitive<f64>> CoordinateSource for (Observable<'_, T>, Observable<'_, T>, Observable<'_, T>) {
    type Coordinate = (f64, f64, f64);

    fn batch_len(&self) -> Result<Option<usize>> {
        common_len(&[("x", self.0.array_len()), ("y", self.1.array_len()), ("z", self.2.array_len())])
    }

    fn coordinate(&self, i: usize) -> (f64, f64, f64) {
        (self.0.at(i).as_(), self.1.at(i).as_(), self.2.at(i).as_())
    }
}

macro_rules! impl_query {
    ($axes:ty => $($observable:ident),+) => {
        impl<T: AsPrimitive<f64>> Query for Hist<$axes, T> {
            type Input<'a> = ($($observable<'a, T>,)+);
            type Output = Arc<Histogram<$axes>>;
            type Error = Error;

            fn fill(&mut self, input: Self::Input<'_>, weight: f64) -> Result<()> {
                self.fill_from(input, weight)
            }

            fn result(&self) -> Self::Output { Arc::clone(&self.histogram) }

            fn merge(&self, results: &[Self::Output]) -> Result<Self::Output> {
                Self::merged(results)
            }
        }
    };
}

impl_query!((Binning,)                   => Observable);
impl_query!((Binning, Binning)           => Observable, Observable);
impl_query!((Binning, Binning, Binning)  => Observable, Observable, Observable);
