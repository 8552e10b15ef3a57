use std::ops::AddAssign;

use ndhistogram::{Fill, FillWith};
use serde::Serialize;

/// Content of one histogram bin.
///
/// Keeps the sum of weights, the sum of squared weights (the variance of the
/// sum) and the raw number of fills.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Weighted {
    sumw: f64,
    sumw2: f64,
    entries: u64,
}

impl Weighted {
    pub fn new(sumw: f64, sumw2: f64, entries: u64) -> Self { Self { sumw, sumw2, entries } }

    pub fn sumw   (&self) -> f64 { self.sumw }
    pub fn sumw2  (&self) -> f64 { self.sumw2 }
    pub fn entries(&self) -> u64 { self.entries }

    pub fn variance(&self) -> f64 { self.sumw2 }
    pub fn error   (&self) -> f64 { self.sumw2.sqrt() }

    pub fn is_empty(&self) -> bool { self.entries == 0 }
}

impl Fill for Weighted {
    fn fill(&mut self) { self.fill_with(1.0) }
}

impl FillWith<f64> for Weighted {
    fn fill_with(&mut self, weight: f64) {
        self.sumw    += weight;
        self.sumw2   += weight * weight;
        self.entries += 1;
    }
}

impl AddAssign<&Weighted> for Weighted {
    fn add_assign(&mut self, other: &Weighted) {
        self.sumw    += other.sumw;
        self.sumw2   += other.sumw2;
        self.entries += other.entries;
    }
}
