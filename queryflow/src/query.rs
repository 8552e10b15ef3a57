/// Definition of a query that accumulates a result over events.
///
/// An instance is filled by one thread only. When events are split over
/// several partitions, each partition fills its own instance and the partial
/// results are combined with [`Query::merge`].
pub trait Query {
    /// Per-event input, one value per query argument.
    type Input<'a>;
    /// Accumulated result, cheap to hand out and to send between threads.
    type Output: Clone + Send;
    type Error;

    /// Accumulate one event with the given weight.
    fn fill(&mut self, input: Self::Input<'_>, weight: f64) -> Result<(), Self::Error>;

    /// Current accumulated result. Calling this has no effect on the query.
    fn result(&self) -> Self::Output;

    /// Combine the results of independently filled instances of this query.
    fn merge(&self, results: &[Self::Output]) -> Result<Self::Output, Self::Error>;
}
