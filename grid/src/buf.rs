// Distributed under The MIT License (MIT)
//
// Copyright (c) 2024 The `sky-image` developers
use core::cell::Cell;

use alloc::rc::Rc;

/// Allocates and manages unsynchronized shared samples.
///
/// The samples are held as cells so that every view sharing the buffer may write to them, and
/// every other view observes those writes immediately. Cloning the buffer shares it; the memory is
/// released exactly when the last clone is dropped.
///
/// The length is fixed at allocation. Growing a grid always means allocating a fresh buffer and
/// dropping the reference to the old one.
pub struct PixelBuffer<T> {
    inner: Rc<[Cell<T>]>,
}

/// The memory a view refers to.
///
/// Either a reference counted buffer allocated by this crate, or a borrow of memory owned by
/// somebody else. The latter is how grids are wrapped around foreign arrays without copying them,
/// the borrow ensures that the owner outlives all views.
pub enum Storage<'a, T> {
    Shared(PixelBuffer<T>),
    Borrowed(&'a [Cell<T>]),
}

impl<T: Copy> PixelBuffer<T> {
    /// Allocate a new buffer of `len` samples, each set to `init`.
    ///
    /// # Panics
    ///
    /// When the allocation fails.
    pub fn new(len: usize, init: T) -> Self {
        let inner: Rc<[Cell<T>]> = (0..len).map(|_| Cell::new(init)).collect();
        PixelBuffer { inner }
    }
}

impl<T> PixelBuffer<T> {
    /// The number of samples allocated.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn as_cells(&self) -> &[Cell<T>] {
        &self.inner
    }

    /// The number of views and handles currently holding this buffer.
    pub fn holders(&self) -> usize {
        Rc::strong_count(&self.inner)
    }

    /// Check if no other handle refers to this buffer.
    pub fn is_unique(&self) -> bool {
        self.holders() == 1
    }

    /// Query if two buffers share the same memory region.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// The address of the first sample, only meaningful as an identity.
    pub fn as_ptr(&self) -> *const Cell<T> {
        self.inner.as_ptr()
    }
}

impl<T> Clone for PixelBuffer<T> {
    fn clone(&self) -> Self {
        PixelBuffer {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<'a, T> Storage<'a, T> {
    pub fn as_cells(&self) -> &[Cell<T>] {
        match self {
            Storage::Shared(buffer) => buffer.as_cells(),
            Storage::Borrowed(cells) => cells,
        }
    }

    pub fn len(&self) -> usize {
        self.as_cells().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_cells().is_empty()
    }

    /// The owned buffer, if this storage was allocated by the crate.
    pub fn buffer(&self) -> Option<&PixelBuffer<T>> {
        match self {
            Storage::Shared(buffer) => Some(buffer),
            Storage::Borrowed(_) => None,
        }
    }

    /// Check if the memory may be repurposed without affecting any other view.
    ///
    /// Borrowed memory is never unique, somebody else owns it.
    pub fn is_unique(&self) -> bool {
        match self {
            Storage::Shared(buffer) => buffer.is_unique(),
            Storage::Borrowed(_) => false,
        }
    }

    /// Check if two storages refer to the same memory.
    pub fn ptr_eq(&self, other: &Storage<'_, T>) -> bool {
        core::ptr::eq(self.as_cells().as_ptr(), other.as_cells().as_ptr())
    }
}

impl<T> Clone for Storage<'_, T> {
    fn clone(&self) -> Self {
        match self {
            Storage::Shared(buffer) => Storage::Shared(buffer.clone()),
            Storage::Borrowed(cells) => Storage::Borrowed(cells),
        }
    }
}

#[test]
fn shared_buffer_release() {
    let buffer = PixelBuffer::new(4, 0u8);
    assert!(buffer.is_unique());

    let other = buffer.clone();
    assert_eq!(buffer.holders(), 2);
    assert!(buffer.ptr_eq(&other));

    other.as_cells()[1].set(7);
    assert_eq!(buffer.as_cells()[1].get(), 7);

    drop(other);
    assert!(buffer.is_unique());
}

#[test]
fn borrowed_is_never_unique() {
    let mut data = [1i32, 2, 3];
    let cells = Cell::from_mut(&mut data[..]).as_slice_of_cells();
    let storage = Storage::Borrowed(cells);
    assert!(!storage.is_unique());
    assert!(storage.buffer().is_none());
    assert_eq!(storage.len(), 3);
}
