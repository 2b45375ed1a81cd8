//! Arena allocation helpers.
//!
//! Syntax tree nodes are allocated from a bump arena owned by the caller of a
//! parse. When the parse result is dropped, the whole arena goes with it.

use bumpalo::Bump;

/// Move a Vec into the arena as a slice.
///
/// Uses ManuallyDrop to prevent double-free on panic inside alloc_slice_fill_with.
pub fn alloc_vec_in<T>(arena: &Bump, vec: Vec<T>) -> &[T] {
    if vec.is_empty() {
        return &[];
    }
    let mut vec = std::mem::ManuallyDrop::new(vec);
    let len = vec.len();
    let ptr = vec.as_ptr();
    let slice = arena.alloc_slice_fill_with(len, |i| {
        // SAFETY: i < len, and each element is read exactly once. ManuallyDrop
        // prevents the Vec destructor from running, so elements won't be
        // double-freed even if this closure panics partway through.
        unsafe { std::ptr::read(ptr.add(i)) }
    });
    // SAFETY: every element has been moved out above.
    unsafe {
        vec.set_len(0);
        std::mem::ManuallyDrop::drop(&mut vec);
    }
    slice
}
