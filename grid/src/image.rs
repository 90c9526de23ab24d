// Distributed under The MIT License (MIT)
//
// Copyright (c) 2024 The `sky-image` developers
//! Defines the view family over shared pixel buffers.
//!
//! All three types, [`ConstImageView`], [`ImageView`] and [`ImageAlloc`], wrap the same
//! addressing core and differ only in the rights they grant. The core stores the memory, the index
//! of the sample at `(xmin, ymin)`, the column `step` and the row `stride`. The address of any
//! pixel inside the bounds is
//!
//! > `offset + (y - ymin) * stride + (x - xmin) * step`
//!
//! Narrowing a view recomputes the offset and keeps step and stride, so sub-views are O(1) and
//! alias their parent. Bulk operations always walk rows by `stride` and columns by `step`, a view
//! is never assumed to be densely packed.
use core::cell::Cell;
use core::fmt;

use crate::buf::{PixelBuffer, Storage};
use crate::{Bounds, Error, Pixel};

/// The addressing core shared by all views.
pub(crate) struct RawImage<'a, T> {
    /// `None` exactly when the bounds are undefined.
    pub(crate) storage: Option<Storage<'a, T>>,
    /// Index of the sample at `(xmin, ymin)`.
    pub(crate) offset: isize,
    pub(crate) step: isize,
    pub(crate) stride: isize,
    pub(crate) bounds: Bounds,
}

/// A read-only view of a pixel grid.
///
/// Cloning the view shares the underlying buffer, pixels are never copied.
pub struct ConstImageView<'a, T> {
    inner: RawImage<'a, T>,
}

/// A view of a pixel grid that may modify the pixels.
///
/// All clones and sub-views of a view alias the same memory, and a write through any of them is
/// visible through all others. For this reason the modifying methods only need a shared
/// reference, in the same way as a `Cell`.
///
/// # Usage
///
/// ```
/// use sky_grid::{Bounds, ImageAlloc};
///
/// let image = ImageAlloc::new(4, 4, 0i32).unwrap();
/// let view = image.view();
///
/// // Write a diagonal, with coordinates starting at 1.
/// view.shade(|x, y, pix| if x == y { *pix = 1 }).unwrap();
/// assert_eq!(view.sum_elements().unwrap(), 4);
/// ```
pub struct ImageView<'a, T> {
    pub(crate) inner: RawImage<'a, T>,
}

/// An owning pixel grid.
///
/// Like the views it shares its buffer with any view created from it, but in addition it has the
/// right to resize and reallocate. Cloning an `ImageAlloc` is a deep copy of the pixels.
pub struct ImageAlloc<T: 'static> {
    inner: RawImage<'static, T>,
}

/// Number of samples required by some bounds.
fn checked_len(bounds: &Bounds) -> Result<usize, Error> {
    // Both extents must be positive, two inverted axes would still give a positive area.
    if bounds.width() <= 0 || bounds.height() <= 0 {
        return Err(Error::InvalidBounds(*bounds));
    }

    let area = bounds.area();

    // Every index must be representable as an `isize` offset.
    let len = isize::try_from(area).map_err(|_| Error::InvalidBounds(*bounds))?;
    Ok(len as usize)
}

impl<'a, T> RawImage<'a, T> {
    pub(crate) const fn undefined() -> Self {
        RawImage {
            storage: None,
            offset: 0,
            step: 0,
            stride: 0,
            bounds: Bounds::undefined(),
        }
    }

    fn cells(&self) -> Result<&[Cell<T>], Error> {
        match &self.storage {
            Some(storage) => Ok(storage.as_cells()),
            None => Err(Error::Undefined),
        }
    }

    /// The index of a pixel, without checking the bounds.
    pub(crate) fn index_of(&self, x: i32, y: i32) -> isize {
        let col = (x - self.bounds.xmin) as isize;
        let row = (y - self.bounds.ymin) as isize;
        self.offset + row * self.stride + col * self.step
    }

    /// The index at offsets `(col, row)` relative to the minimum corner.
    ///
    /// Indexing `cells` panics if the index leaves the memory, which the bounds invariant excludes
    /// for any offsets within the bounds.
    pub(crate) fn index_at(&self, cells: &[Cell<T>], col: isize, row: isize) -> usize {
        let index = self.offset + row * self.stride + col * self.step;
        debug_assert!(index >= 0 && (index as usize) < cells.len());
        index as usize
    }

    fn cell(&self, x: i32, y: i32) -> Result<&Cell<T>, Error> {
        let cells = self.cells()?;
        if !self.bounds.includes(x, y) {
            return Err(Error::out_of_bounds(x, y, &self.bounds));
        }

        Ok(&cells[self.index_of(x, y) as usize])
    }

    fn sub(&self, bounds: &Bounds) -> Result<Self, Error> {
        if self.storage.is_none() {
            return Err(Error::Undefined);
        }

        if !self.bounds.includes_bounds(bounds) {
            return Err(Error::not_included(bounds, &self.bounds));
        }

        Ok(RawImage {
            storage: self.storage.clone(),
            offset: self.index_of(bounds.xmin, bounds.ymin),
            step: self.step,
            stride: self.stride,
            bounds: *bounds,
        })
    }

    fn flipped_x(&self) -> Self {
        let mut flipped = self.clone();
        if self.storage.is_some() {
            flipped.offset = self.index_of(self.bounds.xmax, self.bounds.ymin);
            flipped.step = -self.step;
        }
        flipped
    }

    fn flipped_y(&self) -> Self {
        let mut flipped = self.clone();
        if self.storage.is_some() {
            flipped.offset = self.index_of(self.bounds.xmin, self.bounds.ymax);
            flipped.stride = -self.stride;
        }
        flipped
    }

    /// Visit all addressed cells, row by row in address order.
    fn for_each_cell(&self, mut f: impl FnMut(i32, i32, &Cell<T>)) -> Result<(), Error> {
        let cells = self.cells()?;
        let mut row_start = self.offset;
        for y in self.bounds.ymin..=self.bounds.ymax {
            let mut index = row_start;
            for x in self.bounds.xmin..=self.bounds.xmax {
                f(x, y, &cells[index as usize]);
                index += self.step;
            }
            row_start += self.stride;
        }
        Ok(())
    }

    /// Visit the cells of two equally shaped grids at matching offsets.
    fn zip_cells(
        &self,
        other: &RawImage<'_, T>,
        mut f: impl FnMut(&Cell<T>, &Cell<T>),
    ) -> Result<(), Error> {
        if !self.bounds.is_same_shape_as(&other.bounds) {
            return Err(Error::ShapeMismatch {
                ours: self.bounds,
                theirs: other.bounds,
            });
        }

        let ours = self.cells()?;
        let theirs = other.cells()?;
        let (width, height) = (self.bounds.width() as isize, self.bounds.height() as isize);
        for row in 0..height {
            for col in 0..width {
                let a = self.index_at(ours, col, row);
                let b = other.index_at(theirs, col, row);
                f(&ours[a], &theirs[b]);
            }
        }
        Ok(())
    }

    fn same_buffer(&self, other: &RawImage<'_, T>) -> bool {
        match (&self.storage, &other.storage) {
            (Some(a), Some(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl<T: Copy + 'static> RawImage<'static, T> {
    fn allocate(bounds: &Bounds, init: T) -> Result<Self, Error> {
        if !bounds.is_defined() {
            return Ok(RawImage::undefined());
        }

        let len = checked_len(bounds)?;
        Ok(RawImage {
            storage: Some(Storage::Shared(PixelBuffer::new(len, init))),
            offset: 0,
            step: 1,
            stride: bounds.width() as isize,
            bounds: *bounds,
        })
    }
}

impl<'a, T: Copy> RawImage<'a, T> {
    /// Validate a strided layout over externally provided cells.
    fn with_cells(
        cells: &'a [Cell<T>],
        offset: isize,
        step: isize,
        stride: isize,
        bounds: &Bounds,
    ) -> Result<Self, Error> {
        if !bounds.is_defined() {
            return Ok(RawImage::undefined());
        }

        checked_len(bounds)?;
        let last_col = (bounds.width() - 1) as isize;
        let last_row = (bounds.height() - 1) as isize;

        // The index is affine in the offsets, the extremes are at the corners.
        let corner = |col: isize, row: isize| -> Option<isize> {
            offset
                .checked_add(row.checked_mul(stride)?)?
                .checked_add(col.checked_mul(step)?)
        };

        for (col, row) in [(0, 0), (last_col, 0), (0, last_row), (last_col, last_row)] {
            let index = corner(col, row).ok_or(Error::InvalidLayout("index overflow"))?;
            if index < 0 || index as usize >= cells.len() {
                return Err(Error::InvalidLayout("strided layout exceeds the memory"));
            }
        }

        Ok(RawImage {
            storage: Some(Storage::Borrowed(cells)),
            offset,
            step,
            stride,
            bounds: *bounds,
        })
    }

    fn get(&self, x: i32, y: i32) -> Result<T, Error> {
        Ok(self.cell(x, y)?.get())
    }

    fn set(&self, x: i32, y: i32, value: T) -> Result<(), Error> {
        self.cell(x, y)?.set(value);
        Ok(())
    }

    fn transform(&self, mut f: impl FnMut(T) -> T) -> Result<(), Error> {
        self.for_each_cell(|_, _, cell| cell.set(f(cell.get())))
    }
}

impl<'a, T: Pixel> RawImage<'a, T> {
    fn sum(&self) -> Result<T, Error> {
        let mut sum = T::zero();
        self.for_each_cell(|_, _, cell| sum += cell.get())?;
        Ok(sum)
    }

    fn to_owned(&self) -> Result<RawImage<'static, T>, Error> {
        let owned = RawImage::allocate(&self.bounds, T::zero())?;
        if owned.storage.is_some() {
            owned.zip_cells(self, |into, from| into.set(from.get()))?;
        }
        Ok(owned)
    }
}

macro_rules! read_accessors {
    () => {
        /// The bounds of the addressed pixels.
        pub fn bounds(&self) -> &Bounds {
            &self.inner.bounds
        }

        /// Whether the grid has defined bounds, and thus memory.
        pub fn is_defined(&self) -> bool {
            self.inner.storage.is_some()
        }

        /// The index delta between neighbouring columns, negative for a horizontally flipped view.
        pub fn step(&self) -> isize {
            self.inner.step
        }

        /// The index delta between neighbouring rows, negative for a vertically flipped view.
        pub fn stride(&self) -> isize {
            self.inner.stride
        }

        /// The number of columns.
        pub fn ncol(&self) -> i64 {
            self.inner.bounds.width()
        }

        /// The number of rows.
        pub fn nrow(&self) -> i64 {
            self.inner.bounds.height()
        }

        /// The memory this grid refers to, `None` for undefined bounds.
        pub fn storage(&self) -> Option<&Storage<'_, T>> {
            self.inner.storage.as_ref()
        }

        /// Bounds-checked access to a single pixel.
        ///
        /// Fails with [`Error::Undefined`] if the grid has no memory and with
        /// [`Error::OutOfBounds`] naming the violating axis if the coordinate is outside, or
        /// [`Error::OutsideBoth`] if it is outside along both axes.
        pub fn at(&self, x: i32, y: i32) -> Result<T, Error>
        where
            T: Copy,
        {
            self.inner.get(x, y)
        }

        /// The sum of all addressed pixels, accumulated in the pixel type.
        pub fn sum_elements(&self) -> Result<T, Error>
        where
            T: Pixel,
        {
            self.inner.sum()
        }

        /// Visit all addressed pixels with their coordinates, row by row.
        ///
        /// Visits nothing for a grid with undefined bounds.
        pub fn for_each(&self, mut f: impl FnMut(i32, i32, T))
        where
            T: Copy,
        {
            let _ = self.inner.for_each_cell(|x, y, cell| f(x, y, cell.get()));
        }
    };
}

macro_rules! write_accessors {
    () => {
        /// Bounds-checked write of a single pixel.
        pub fn set_value(&self, x: i32, y: i32, value: T) -> Result<(), Error>
        where
            T: Copy,
        {
            self.inner.set(x, y, value)
        }

        /// Set every addressed pixel to `value`.
        ///
        /// Only the pixels of this view are written, not the rest of a shared buffer.
        pub fn fill(&self, value: T) -> Result<(), Error>
        where
            T: Copy,
        {
            self.inner.transform(|_| value)
        }

        pub fn set_zero(&self) -> Result<(), Error>
        where
            T: Pixel,
        {
            self.inner.transform(|_| T::zero())
        }

        /// Replace every pixel by its reciprocal, where zero stays zero.
        pub fn invert_self(&self) -> Result<(), Error>
        where
            T: Pixel,
        {
            self.inner.transform(Pixel::invert)
        }

        /// Compute every pixel from its coordinates and previous value.
        pub fn shade(&self, mut f: impl FnMut(i32, i32, &mut T)) -> Result<(), Error>
        where
            T: Copy,
        {
            self.inner.for_each_cell(|x, y, cell| {
                let mut value = cell.get();
                f(x, y, &mut value);
                cell.set(value);
            })
        }

        /// Copy all pixels from an equally shaped grid.
        ///
        /// Offsets and strides of the two grids may differ, pixels are matched by their position
        /// relative to the minimum corner. Fails with [`Error::ShapeMismatch`] otherwise.
        pub fn copy_from(&self, source: &ConstImageView<'_, T>) -> Result<(), Error>
        where
            T: Copy,
        {
            self.inner
                .zip_cells(&source.inner, |into, from| into.set(from.get()))
        }

        /// Add all pixels of an equally shaped grid to this one.
        pub fn add_from(&self, source: &ConstImageView<'_, T>) -> Result<(), Error>
        where
            T: Pixel,
        {
            self.inner
                .zip_cells(&source.inner, |into, from| into.set(into.get() + from.get()))
        }
    };
}

impl<'a, T> ConstImageView<'a, T> {
    read_accessors!();

    /// A view of a sub-rectangle, sharing the memory.
    ///
    /// Fails with [`Error::OutOfBounds`] unless the rectangle is entirely contained in the
    /// bounds of this view.
    pub fn sub_image(&self, bounds: &Bounds) -> Result<Self, Error> {
        Ok(ConstImageView {
            inner: self.inner.sub(bounds)?,
        })
    }

    /// The same pixels with the column order reversed.
    pub fn flipped_x(&self) -> Self {
        ConstImageView {
            inner: self.inner.flipped_x(),
        }
    }

    /// The same pixels with the row order reversed.
    pub fn flipped_y(&self) -> Self {
        ConstImageView {
            inner: self.inner.flipped_y(),
        }
    }

    /// Check if two views share one buffer.
    pub fn shares_buffer(&self, other: &ConstImageView<'_, T>) -> bool {
        self.inner.same_buffer(&other.inner)
    }
}

impl<'a, T: Copy> ConstImageView<'a, T> {
    /// View externally owned cells as a strided grid.
    ///
    /// The `offset` is the index of the pixel at `(xmin, ymin)`. Step and stride may be negative.
    /// Fails with [`Error::InvalidLayout`] if any pixel would lie outside of `cells`.
    pub fn from_cells(
        cells: &'a [Cell<T>],
        offset: isize,
        step: isize,
        stride: isize,
        bounds: &Bounds,
    ) -> Result<Self, Error> {
        Ok(ConstImageView {
            inner: RawImage::with_cells(cells, offset, step, stride, bounds)?,
        })
    }
}

impl<'a, T> ImageView<'a, T> {
    read_accessors!();
    write_accessors!();

    /// A view of a sub-rectangle, sharing the memory.
    ///
    /// Fails with [`Error::OutOfBounds`] unless the rectangle is entirely contained in the
    /// bounds of this view.
    pub fn sub_image(&self, bounds: &Bounds) -> Result<Self, Error> {
        Ok(ImageView {
            inner: self.inner.sub(bounds)?,
        })
    }

    /// Weaken to a read-only view of the same pixels.
    pub fn as_const(&self) -> ConstImageView<'a, T> {
        ConstImageView {
            inner: self.inner.clone(),
        }
    }

    /// The same pixels with the column order reversed.
    pub fn flipped_x(&self) -> Self {
        ImageView {
            inner: self.inner.flipped_x(),
        }
    }

    /// The same pixels with the row order reversed.
    pub fn flipped_y(&self) -> Self {
        ImageView {
            inner: self.inner.flipped_y(),
        }
    }

    /// Check if two views share one buffer.
    pub fn shares_buffer(&self, other: &ImageView<'_, T>) -> bool {
        self.inner.same_buffer(&other.inner)
    }
}

impl<'a, T: Copy> ImageView<'a, T> {
    /// View externally owned cells as a strided, writable grid.
    ///
    /// This is the zero-copy path for memory owned by a foreign caller. The borrow guarantees
    /// that the memory outlives all views created from it. The `offset` is the index of the pixel
    /// at `(xmin, ymin)`; step and stride may be negative. Fails with [`Error::InvalidLayout`] if
    /// any pixel would lie outside of `cells`.
    pub fn from_cells(
        cells: &'a [Cell<T>],
        offset: isize,
        step: isize,
        stride: isize,
        bounds: &Bounds,
    ) -> Result<Self, Error> {
        Ok(ImageView {
            inner: RawImage::with_cells(cells, offset, step, stride, bounds)?,
        })
    }

    /// View an exclusively borrowed slice as a strided, writable grid.
    pub fn from_slice_mut(
        data: &'a mut [T],
        offset: isize,
        step: isize,
        stride: isize,
        bounds: &Bounds,
    ) -> Result<Self, Error> {
        let cells = Cell::from_mut(data).as_slice_of_cells();
        Self::from_cells(cells, offset, step, stride, bounds)
    }
}

impl<'a, T: Pixel> ImageView<'a, T> {
    /// View raw bytes, for example the data of a foreign array, as a grid of samples.
    ///
    /// The bytes must be aligned for `T` and a multiple of its size. Offset, step and stride are
    /// counted in samples, not bytes.
    pub fn from_bytes_mut(
        bytes: &'a mut [u8],
        offset: isize,
        step: isize,
        stride: isize,
        bounds: &Bounds,
    ) -> Result<Self, Error> {
        let data: &'a mut [T] = bytemuck::try_cast_slice_mut(bytes)
            .map_err(|_| Error::InvalidLayout("bytes are misaligned or not a whole sample"))?;
        Self::from_slice_mut(data, offset, step, stride, bounds)
    }
}

impl<T: 'static> ImageAlloc<T> {
    /// An owning grid with undefined bounds and no memory.
    pub const fn empty() -> Self {
        ImageAlloc {
            inner: RawImage::undefined(),
        }
    }

    read_accessors!();
    write_accessors!();

    /// A writable view of all pixels, sharing the buffer.
    pub fn view(&self) -> ImageView<'static, T> {
        ImageView {
            inner: self.inner.clone(),
        }
    }

    /// A read-only view of all pixels, sharing the buffer.
    pub fn const_view(&self) -> ConstImageView<'static, T> {
        ConstImageView {
            inner: self.inner.clone(),
        }
    }

    /// A writable view of a sub-rectangle, sharing the buffer.
    pub fn sub_image(&self, bounds: &Bounds) -> Result<ImageView<'static, T>, Error> {
        Ok(ImageView {
            inner: self.inner.sub(bounds)?,
        })
    }

    /// The owned buffer, `None` for undefined bounds.
    pub fn buffer(&self) -> Option<&PixelBuffer<T>> {
        self.inner.storage.as_ref().and_then(Storage::buffer)
    }

    /// The number of samples allocated, which may exceed the area after shrinking.
    pub fn capacity(&self) -> usize {
        self.inner.storage.as_ref().map_or(0, Storage::len)
    }
}

impl<T: Pixel + 'static> ImageAlloc<T> {
    /// Allocate `ncol` by `nrow` pixels with bounds `(1, ncol, 1, nrow)`.
    ///
    /// Fails with [`Error::InvalidBounds`] if either size is not positive.
    pub fn new(ncol: i32, nrow: i32, init: T) -> Result<Self, Error> {
        if ncol <= 0 || nrow <= 0 {
            return Err(Error::InvalidBounds(Bounds::claimed(1, ncol, 1, nrow)));
        }

        Self::with_bounds(Bounds::new(1, ncol, 1, nrow), init)
    }

    /// Allocate a grid over some bounds, with every pixel set to `init`.
    ///
    /// Undefined bounds create a grid without memory.
    pub fn with_bounds(bounds: Bounds, init: T) -> Result<Self, Error> {
        Ok(ImageAlloc {
            inner: RawImage::allocate(&bounds, init)?,
        })
    }

    /// Copy the pixels of a view into a newly allocated, contiguous grid with the same bounds.
    pub fn from_view(view: &ConstImageView<'_, T>) -> Result<Self, Error> {
        Ok(ImageAlloc {
            inner: view.inner.to_owned()?,
        })
    }

    /// Change the bounds, reallocating only when required.
    ///
    /// - Undefined bounds release the buffer, the grid no longer owns any memory.
    /// - If the buffer is held by this grid alone and has room for the new area, it is reused and
    ///   only the addressing changes. **The pixels are not cleared**: their content is whatever
    ///   the buffer held before, reinterpreted under the new layout.
    /// - Otherwise a fresh, zeroed buffer of exactly the new area is allocated. Views created
    ///   before keep the old buffer alive and unchanged.
    ///
    /// Fails with [`Error::InvalidBounds`] if defined bounds have no positive width or height, in
    /// which case the grid is not modified.
    pub fn resize(&mut self, bounds: &Bounds) -> Result<(), Error> {
        if !bounds.is_defined() {
            log::debug!("releasing buffer of {}", self.inner.bounds);
            self.inner = RawImage::undefined();
            return Ok(());
        }

        let len = checked_len(bounds)?;
        let reusable = matches!(
            &self.inner.storage,
            Some(storage) if len <= storage.len() && storage.is_unique()
        );

        if reusable {
            log::debug!("resize {} to {} reuses buffer", self.inner.bounds, bounds);
            self.inner.offset = 0;
            self.inner.step = 1;
            self.inner.stride = bounds.width() as isize;
            self.inner.bounds = *bounds;
        } else {
            log::debug!("resize {} to {} allocates {len} pixels", self.inner.bounds, bounds);
            self.inner = RawImage::allocate(bounds, T::zero())?;
        }

        Ok(())
    }

    /// Fold the whole grid periodically into `target`, see [`ImageView::wrap`].
    pub fn wrap(&self, target: &Bounds) -> Result<ImageView<'static, T>, Error> {
        self.view().wrap(target)
    }
}

impl<T: Pixel + 'static> Clone for ImageAlloc<T> {
    fn clone(&self) -> Self {
        let inner = self
            .inner
            .to_owned()
            .expect("bounds of an existing grid were validated at allocation");
        ImageAlloc { inner }
    }
}

impl<T> Clone for RawImage<'_, T> {
    fn clone(&self) -> Self {
        RawImage {
            storage: self.storage.clone(),
            offset: self.offset,
            step: self.step,
            stride: self.stride,
            bounds: self.bounds,
        }
    }
}

impl<T> Clone for ConstImageView<'_, T> {
    fn clone(&self) -> Self {
        ConstImageView {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Clone for ImageView<'_, T> {
    fn clone(&self) -> Self {
        ImageView {
            inner: self.inner.clone(),
        }
    }
}

impl<T: 'static> Default for ImageAlloc<T> {
    fn default() -> Self {
        ImageAlloc::empty()
    }
}

impl<'a, T> From<ImageView<'a, T>> for ConstImageView<'a, T> {
    fn from(view: ImageView<'a, T>) -> Self {
        ConstImageView { inner: view.inner }
    }
}

impl<T: 'static> From<ImageAlloc<T>> for ImageView<'static, T> {
    fn from(image: ImageAlloc<T>) -> Self {
        ImageView { inner: image.inner }
    }
}

impl<T> fmt::Debug for RawImage<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawImage")
            .field("bounds", &self.bounds)
            .field("offset", &self.offset)
            .field("step", &self.step)
            .field("stride", &self.stride)
            .finish()
    }
}

impl<T> fmt::Debug for ConstImageView<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ConstImageView").field(&self.inner).finish()
    }
}

impl<T> fmt::Debug for ImageView<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ImageView").field(&self.inner).finish()
    }
}

impl<T: 'static> fmt::Debug for ImageAlloc<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ImageAlloc").field(&self.inner).finish()
    }
}

#[test]
fn sub_image_addressing() {
    let image = ImageAlloc::with_bounds(Bounds::new(0, 4, 0, 3), 0u16).unwrap();
    image.shade(|x, y, pix| *pix = (10 * y + x) as u16).unwrap();

    let sub = image.sub_image(&Bounds::new(2, 3, 1, 2)).unwrap();
    assert_eq!(sub.step(), 1);
    assert_eq!(sub.stride(), 5);
    assert_eq!(sub.at(2, 1), Ok(12));
    assert_eq!(sub.at(3, 2), Ok(23));
    assert_eq!(sub.sum_elements(), Ok(12 + 13 + 22 + 23));
}

#[test]
fn flipped_views_alias() {
    let image = ImageAlloc::with_bounds(Bounds::new(1, 3, 1, 2), 0i32).unwrap();
    image.shade(|x, y, pix| *pix = 10 * y + x).unwrap();

    let flipped = image.view().flipped_x();
    assert_eq!(flipped.step(), -1);
    assert_eq!(flipped.at(1, 1), Ok(13));
    assert_eq!(flipped.at(3, 2), Ok(21));

    let both = flipped.flipped_y();
    assert_eq!(both.stride(), -3);
    assert_eq!(both.at(1, 1), Ok(23));

    both.set_value(1, 1, -1).unwrap();
    assert_eq!(image.at(3, 2), Ok(-1));

    // A sub-image of a flipped view keeps the negative steps.
    let sub = both.sub_image(&Bounds::new(2, 3, 2, 2)).unwrap();
    assert_eq!(sub.at(2, 2), Ok(12));
    assert_eq!(sub.at(3, 2), Ok(11));
}

#[test]
fn undefined_grid() {
    let image = ImageAlloc::<f64>::empty();
    assert!(!image.is_defined());
    assert_eq!(image.at(0, 0), Err(Error::Undefined));
    assert_eq!(image.fill(1.0), Err(Error::Undefined));
    assert_eq!(
        image.sub_image(&Bounds::new(0, 0, 0, 0)).unwrap_err(),
        Error::Undefined
    );
    assert_eq!(image.capacity(), 0);
}
