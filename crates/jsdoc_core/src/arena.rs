//! Arena allocation for parsed comments.
//!
//! Every AST node produced by a parse is allocated from a bump arena owned by
//! the caller. Dropping the arena frees the whole tree at once.

use bumpalo::Bump;

/// A bump arena holding the nodes of one or more parses.
///
/// Parsers borrow the inner [`Bump`] for the lifetime `'a` of the tree they
/// return, so a tree can never outlive the arena it lives in.
pub struct DocArena {
    bump: Bump,
}

impl DocArena {
    /// Create a new arena with default capacity.
    pub fn new() -> Self {
        Self { bump: Bump::new() }
    }

    /// Get a reference to the underlying bump allocator.
    #[inline]
    pub fn bump(&self) -> &Bump {
        &self.bump
    }
}

impl Default for DocArena {
    fn default() -> Self {
        Self::new()
    }
}

/// Move the contents of a `Vec` into the arena and return them as a slice.
///
/// Empty vectors do not touch the arena.
pub fn alloc_vec_in<T>(arena: &Bump, vec: Vec<T>) -> &[T] {
    if vec.is_empty() {
        return &[];
    }
    bumpalo::collections::Vec::from_iter_in(vec, arena).into_bump_slice()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_vec_in_preserves_order() {
        let arena = DocArena::new();
        let slice = alloc_vec_in(arena.bump(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(slice, &["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_alloc_vec_in_empty() {
        let arena = DocArena::new();
        let slice: &[u32] = alloc_vec_in(arena.bump(), Vec::new());
        assert!(slice.is_empty());
    }
}
