//! Alignment primitives shared by every allocator in this crate.
//!
//! These are pure functions over `usize` offsets: none of them touch a
//! backing buffer. [`Arena`](crate::arena::Arena), [`Stack`](crate::stack::Stack)
//! and [`Pool`](crate::pool::Pool) all build their bump/padding math on top of
//! [`forward_align`] and [`calc_padding_with_header`].

/// Returns `true` iff `x` is a power of two.
///
/// `x == 0` is not a power of two; callers that need `align > 0` should
/// check that separately (alignment of zero never makes sense).
#[inline]
#[must_use]
pub fn is_power_of_two(x: usize) -> bool {
  x > 0 && (x & (x - 1)) == 0
}

/// Returns the smallest integer `>= base` that is a multiple of `align`.
///
/// # Panics
///
/// Panics (via `debug_assert!`) if `align` is not a power of two. Violating
/// this precondition is a programming error, not a recoverable failure.
///
/// # Examples
///
/// ```
/// use region_alloc::align::forward_align;
///
/// assert_eq!(forward_align(3, 1), 3);
/// assert_eq!(forward_align(1, 4), 4);
/// assert_eq!(forward_align(29, 8), 32);
/// assert_eq!(forward_align(17, 16), 32);
/// assert_eq!(forward_align(129, 256), 256);
/// ```
#[inline]
#[must_use]
pub fn forward_align(base: usize, align: usize) -> usize {
  debug_assert!(is_power_of_two(align), "align must be a power of two, got {align}");

  let modulo = base & (align - 1);
  if modulo == 0 {
    base
  } else {
    base + (align - modulo)
  }
}

/// Returns the smallest padding `p >= 0` such that `base + p` is aligned to
/// `align` *and* the last `header_size` bytes of `[base, base + p)` are free
/// to hold a header.
///
/// Starts from the natural alignment padding. If that is already large
/// enough to fit the header, it is returned unchanged; otherwise the padding
/// is extended by whole multiples of `align` until it is.
///
/// # Panics
///
/// Panics (via `debug_assert!`) if `align` is not a power of two.
///
/// # Examples
///
/// ```
/// use region_alloc::align::calc_padding_with_header;
///
/// assert_eq!(calc_padding_with_header(0, 8, 1), 8);
/// assert_eq!(calc_padding_with_header(0, 8, 7), 8);
/// assert_eq!(calc_padding_with_header(1, 8, 1), 7);
/// assert_eq!(calc_padding_with_header(15, 8, 0), 1);
/// assert_eq!(calc_padding_with_header(1, 8, 14), 15);
/// assert_eq!(calc_padding_with_header(1, 8, 32), 39);
/// ```
#[inline]
#[must_use]
pub fn calc_padding_with_header(base: usize, align: usize, header_size: usize) -> usize {
  debug_assert!(is_power_of_two(align), "align must be a power of two, got {align}");

  let modulo = base & (align - 1);
  let mut padding = if modulo == 0 { 0 } else { align - modulo };

  if padding < header_size {
    let needed = header_size - padding;
    // Round `needed` up to a whole number of `align`-sized steps.
    let steps = needed.div_ceil(align);
    padding += steps * align;
  }

  padding
}


#[cfg(test)]
mod proptests {
  use super::*;
  use proptest::prelude::*;

  fn pow2_align() -> impl Strategy<Value = usize> {
    (0u32..20).prop_map(|shift| 1usize << shift)
  }

  proptest! {
    #[test]
    fn forward_align_result_is_aligned_and_not_less_than_base(base in 0usize..1_000_000, align in pow2_align()) {
      let result = forward_align(base, align);
      prop_assert!(result >= base);
      prop_assert_eq!(result % align, 0);
      prop_assert!(result - base < align);
    }

    #[test]
    fn padding_clears_alignment_and_header(
      base in 0usize..1_000_000,
      align in pow2_align(),
      header_size in 0usize..64,
    ) {
      let padding = calc_padding_with_header(base, align, header_size);
      prop_assert_eq!((base + padding) % align, 0);
      prop_assert!(padding >= header_size);
    }

    #[test]
    fn padding_is_minimal(
      base in 0usize..1_000_000,
      align in pow2_align(),
      header_size in 0usize..64,
    ) {
      let padding = calc_padding_with_header(base, align, header_size);
      if padding >= align {
        let smaller = padding - align;
        let fits_alignment = (base + smaller) % align == 0;
        prop_assert!(!fits_alignment || smaller < header_size);
      }
    }
  }
}
