//! Minimal columnar query framework.
//!
//! A [`Query`] is filled once per event with per-event [`Observable`]s and a
//! weight. [`Dataflow`] splits a set of events into disjoint partitions, gives
//! each partition its own query instance, and merges the partial results.

mod observable;
mod query;
mod dataflow;

pub use observable::Observable;
pub use query::Query;
pub use dataflow::Dataflow;
