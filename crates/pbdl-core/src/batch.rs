//! Fixed-size batch planning.

use std::num::NonZeroUsize;

/// Splits `items` into consecutive batches of `batch_size`; the last batch may be shorter.
///
/// Order is preserved and nothing is dropped or duplicated, so concatenating
/// the batches yields `items` again. Returns an empty vec for empty input.
pub fn partition<T>(items: &[T], batch_size: NonZeroUsize) -> Vec<&[T]> {
    items.chunks(batch_size.get()).collect()
}
