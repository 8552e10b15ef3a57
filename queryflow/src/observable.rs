/// Per-event value of a column: either a single scalar or a variable-length
/// array of scalars.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Observable<'a, T> {
    Value(T),
    Array(&'a [T]),
}

impl<'a, T: Copy> Observable<'a, T> {

    /// Length of the array, `None` for a scalar.
    pub fn array_len(&self) -> Option<usize> {
        match self {
            Self::Value(_)     => None,
            Self::Array(array) => Some(array.len()),
        }
    }

    pub fn is_array(&self) -> bool { matches!(self, Self::Array(_)) }

    /// Element `i` of an array. A scalar is broadcast: it is returned for any `i`.
    ///
    /// # Panics
    /// Panics if `i` is out of bounds for an array.
    pub fn at(&self, i: usize) -> T {
        match self {
            Self::Value(x)     => *x,
            Self::Array(array) => array[i],
        }
    }
}

impl<'a, T> From<&'a [T]> for Observable<'a, T> {
    fn from(array: &'a [T]) -> Self { Self::Array(array) }
}

impl<'a, T> From<&'a Vec<T>> for Observable<'a, T> {
    fn from(array: &'a Vec<T>) -> Self { Self::Array(array) }
}
