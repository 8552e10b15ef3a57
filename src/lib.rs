//! Histogram-filling queries for columnar event data.
//!
//! Each [`Hist`] owns a 1, 2 or 3-dimensional weighted [`Histogram`], is
//! filled once per event through the [`Query`] interface with scalar or
//! array-valued [`Observable`]s, and merges the partial histograms produced
//! by independent partitions of the data (see [`Dataflow`]).

mod error;
pub use error::{Error, Result};

pub mod binning;
pub mod weighted;
pub mod histogram;
pub mod hist;
pub mod config;
pub mod table;

pub use binning::{BinPosition, BinSpec, Binning};
pub use weighted::Weighted;
pub use histogram::{AxisSet, Histogram, Histogram1D, Histogram2D, Histogram3D, HistogramExport};
pub use hist::{Hist, Hist1D, Hist2D, Hist3D};

pub use queryflow::{Dataflow, Observable, Query};
