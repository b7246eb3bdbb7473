use crate::error::Error;

/// Reserves storage for exactly `len` items, reporting
/// allocation failure instead of aborting.
pub(crate) fn try_with_capacity<T>(len: usize) -> Result<Vec<T>, Error> {
    let mut v = Vec::new();
    v.try_reserve_exact(len).map_err(|_| Error::Allocation)?;
    Ok(v)
}

/// Fallible `vec![value; len]`
pub(crate) fn try_filled<T: Clone>(len: usize, value: T) -> Result<Vec<T>, Error> {
    let mut v = try_with_capacity(len)?;
    v.resize(len, value);
    Ok(v)
}

/// Fallible slice copy
pub(crate) fn try_copy<T: Clone>(src: &[T]) -> Result<Vec<T>, Error> {
    let mut v = try_with_capacity(src.len())?;
    v.extend_from_slice(src);
    Ok(v)
}
