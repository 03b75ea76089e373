//! Role-swapping buffer pair used by the merge schedulers.
//!
//! Each merge round reads the current buffer and writes the other, then the
//! roles swap. Swapping reassigns a label; element data never moves. The
//! parity constructor picks the starting role so the final current buffer is
//! the caller-supplied output slice, which removes the trailing copy the
//! schedulers would otherwise need.

/// A pair of equal-capacity buffers with a "current" role label.
///
/// `primary` is the caller's output slice; `scratch` is a per-call
/// allocation of the same capacity. Exactly one of the two is current at any
/// time; no buffer is read and mutated in the same round.
pub(crate) struct PingPong<'a, T> {
    primary: &'a mut [T],
    scratch: &'a mut [T],
    current_is_primary: bool,
}

impl<'a, T> PingPong<'a, T> {
    /// Start with `primary` current. Callers that use this constructor
    /// finish with `commit_to_primary` in case the result landed in scratch.
    pub(crate) fn new(primary: &'a mut [T], scratch: &'a mut [T]) -> Self {
        debug_assert_eq!(primary.len(), scratch.len());
        Self {
            primary,
            scratch,
            current_is_primary: true,
        }
    }

    /// Choose the starting role from the number of swaps to come, so that
    /// after exactly `rounds` swaps the current buffer is `primary`.
    pub(crate) fn for_rounds(primary: &'a mut [T], scratch: &'a mut [T], rounds: u32) -> Self {
        let mut pair = Self::new(primary, scratch);
        pair.current_is_primary = rounds % 2 == 0;
        pair
    }

    /// The current buffer and the other buffer, simultaneously borrowed.
    /// Rounds read from the first and write into the second.
    pub(crate) fn parts(&mut self) -> (&[T], &mut [T]) {
        if self.current_is_primary {
            (&*self.primary, &mut *self.scratch)
        } else {
            (&*self.scratch, &mut *self.primary)
        }
    }

    /// Read-only view of the current buffer.
    pub(crate) fn current(&self) -> &[T] {
        if self.current_is_primary {
            &*self.primary
        } else {
            &*self.scratch
        }
    }

    /// Mutable view of the current buffer (initial population only).
    pub(crate) fn current_mut(&mut self) -> &mut [T] {
        if self.current_is_primary {
            &mut *self.primary
        } else {
            &mut *self.scratch
        }
    }

    /// Swap the roles.
    pub(crate) fn swap(&mut self) {
        self.current_is_primary = !self.current_is_primary;
    }

    /// Whether the current buffer is the caller's output slice.
    #[cfg(test)]
    pub(crate) fn current_is_primary(&self) -> bool {
        self.current_is_primary
    }
}

impl<T: Copy> PingPong<'_, T> {
    /// If the roles ended swapped, copy the current contents into `primary`
    /// and restore it as current. The one-copy fallback for callers that
    /// could not seed the roles by round parity.
    pub(crate) fn commit_to_primary(&mut self) {
        if !self.current_is_primary {
            self.primary.copy_from_slice(self.scratch);
            self.current_is_primary = true;
        }
    }
}
