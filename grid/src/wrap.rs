// Distributed under The MIT License (MIT)
//
// Copyright (c) 2024 The `sky-image` developers
//! Periodic folding of an oversampled grid into its native support.
//!
//! A profile that is band-limited in Fourier space is periodic in real space, and the other way
//! around. When a render is computed on a grid larger than that period, the surplus content belongs
//! to the same periodic cells as the target and must be added onto them.
use crate::image::ImageView;
use crate::{Bounds, Error, Pixel};

impl<'a, T: Pixel> ImageView<'a, T> {
    /// Fold all pixels of this view periodically into `target`, in place.
    ///
    /// The period is the size of `target` along each axis. First every row outside the target's
    /// row range is added onto the target row congruent to it modulo the row period. Then, within
    /// that band of rows, every column outside the target's column range is added onto the
    /// congruent target column. Each pixel is visited exactly once and content is only ever
    /// added, so the sum over `target` afterwards equals the sum over the whole view before.
    ///
    /// An axis along which the view is no larger than the target is left as is.
    ///
    /// Returns the view restricted to `target`, sharing the buffer. Fails with
    /// [`Error::OutOfBounds`] unless `target` is contained in the bounds of this view. Pixels
    /// outside of `target` keep their previous values and should be considered garbage.
    ///
    /// # Usage
    ///
    /// ```
    /// use sky_grid::{Bounds, ImageAlloc};
    ///
    /// let image = ImageAlloc::new(6, 6, 1.0f64).unwrap();
    /// let folded = image.wrap(&Bounds::new(1, 3, 1, 3)).unwrap();
    ///
    /// // Each target pixel received four contributions.
    /// folded.for_each(|_, _, pix| assert_eq!(pix, 4.0));
    /// ```
    pub fn wrap(&self, target: &Bounds) -> Result<ImageView<'a, T>, Error> {
        // Validates the target, before anything is modified.
        let folded = self.sub_image(target)?;

        let raw = &self.inner;
        let cells = match &raw.storage {
            Some(storage) => storage.as_cells(),
            None => return Err(Error::Undefined),
        };

        let bounds = raw.bounds;
        let m = bounds.width() as isize;
        let n = bounds.height() as isize;

        // The target window in offsets from the view's own origin, half-open.
        let i1 = (target.xmin - bounds.xmin) as isize;
        let i2 = (target.xmax - bounds.xmin) as isize + 1;
        let j1 = (target.ymin - bounds.ymin) as isize;
        let j2 = (target.ymax - bounds.ymin) as isize + 1;
        let mwrap = i2 - i1;
        let nwrap = j2 - j1;

        log::debug!("wrap {bounds} into {target}: periods {mwrap} x {nwrap}");

        // Fold rows into [j1, j2), across the full width of the view.
        if nwrap < n {
            for j in (0..j1).chain(j2..n) {
                let jj = j1 + (j - j1).rem_euclid(nwrap);
                log::trace!("wrap row {j} onto row {jj}");
                for i in 0..m {
                    let from = cells[raw.index_at(cells, i, j)].get();
                    let into = &cells[raw.index_at(cells, i, jj)];
                    into.set(into.get() + from);
                }
            }
        }

        // Fold columns into [i1, i2), only within the target rows.
        if mwrap < m {
            for j in j1..j2 {
                log::trace!("wrap row {j} into columns [{i1}, {i2})");
                for i in (0..i1).chain(i2..m) {
                    let ii = i1 + (i - i1).rem_euclid(mwrap);
                    let from = cells[raw.index_at(cells, i, j)].get();
                    let into = &cells[raw.index_at(cells, ii, j)];
                    into.set(into.get() + from);
                }
            }
        }

        Ok(folded)
    }
}

#[test]
fn folds_ones_into_fours() {
    use crate::ImageAlloc;

    let image = ImageAlloc::new(6, 6, 1i32).unwrap();
    let folded = image.wrap(&Bounds::new(1, 3, 1, 3)).unwrap();
    assert_eq!(folded.sum_elements(), Ok(36));
    folded.for_each(|_, _, pix| assert_eq!(pix, 4));
}

#[test]
fn target_must_be_inside() {
    use crate::{Axis, ImageAlloc};

    let image = ImageAlloc::new(4, 4, 1.0f32).unwrap();
    let err = image.wrap(&Bounds::new(2, 5, 1, 2)).unwrap_err();
    assert_eq!(
        err,
        Error::OutOfBounds {
            axis: Axis::Column,
            value: 5,
            min: 1,
            max: 4
        }
    );
    // Nothing was folded.
    assert_eq!(image.sum_elements(), Ok(16.0));
}
