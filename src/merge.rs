//! Two-way sorted-merge primitive shared by all merge schedulers.

use crate::types::Element;

/// Merge two sorted runs into `out`, which must hold exactly
/// `a.len() + b.len()` elements and may not alias either input.
///
/// On equal elements `b`'s element is emitted first. Every scheduler calls
/// this as `merge_runs(local, received, out)`, so received data wins ties on
/// all ranks and all algorithms produce identical output arrays.
pub fn merge_runs<T: Element>(a: &[T], b: &[T], out: &mut [T]) {
    debug_assert_eq!(out.len(), a.len() + b.len());

    let mut i = 0;
    let mut j = 0;
    let mut k = 0;
    while i < a.len() && j < b.len() {
        if a[i] < b[j] {
            out[k] = a[i];
            i += 1;
        } else {
            out[k] = b[j];
            j += 1;
        }
        k += 1;
    }
    if i < a.len() {
        out[k..].copy_from_slice(&a[i..]);
    } else if j < b.len() {
        out[k..].copy_from_slice(&b[j..]);
    }
}
