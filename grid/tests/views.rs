use core::cell::Cell;

use sky_grid::{Axis, Bounds, Complex64, ConstImageView, Error, ImageAlloc, ImageView};

#[test]
fn fill_and_sum_with_sub_image() {
    let image = ImageAlloc::with_bounds(Bounds::new(1, 4, 1, 4), 2i32).unwrap();
    assert_eq!(image.sum_elements(), Ok(32));

    let sub = image.sub_image(&Bounds::new(2, 3, 2, 3)).unwrap();
    assert_eq!(sub.ncol(), 2);
    assert_eq!(sub.nrow(), 2);
    assert_eq!(sub.sum_elements(), Ok(8));

    sub.fill(5).unwrap();
    assert_eq!(image.at(2, 2), Ok(5));
    assert_eq!(image.at(1, 1), Ok(2));
    assert_eq!(image.sum_elements(), Ok(12 * 2 + 4 * 5));
}

#[test]
fn at_reports_violating_axis() {
    let image = ImageAlloc::with_bounds(Bounds::new(1, 4, -1, 2), 0.0f64).unwrap();

    for y in -1..=2 {
        for x in 1..=4 {
            image.set_value(x, y, f64::from(x * y)).unwrap();
            assert_eq!(image.at(x, y), Ok(f64::from(x * y)));
        }
    }

    assert_eq!(
        image.at(0, 0),
        Err(Error::OutOfBounds {
            axis: Axis::Column,
            value: 0,
            min: 1,
            max: 4
        })
    );
    assert_eq!(
        image.at(1, 3),
        Err(Error::OutOfBounds {
            axis: Axis::Row,
            value: 3,
            min: -1,
            max: 2
        })
    );
    assert!(image.set_value(5, 0, 1.0).is_err());
    assert_eq!(
        image.at(0, 3),
        Err(Error::OutsideBoth {
            x: 0,
            y: 3,
            bounds: Bounds::new(1, 4, -1, 2)
        })
    );
}

#[test]
fn sub_image_outside_fails() {
    let image = ImageAlloc::new(4, 4, 0u16).unwrap();
    let err = image.sub_image(&Bounds::new(0, 2, 1, 2)).unwrap_err();
    assert_eq!(
        err,
        Error::OutOfBounds {
            axis: Axis::Column,
            value: 0,
            min: 1,
            max: 4
        }
    );

    let err = image.sub_image(&Bounds::new(1, 2, 3, 5)).unwrap_err();
    assert!(matches!(err, Error::OutOfBounds { axis: Axis::Row, value: 5, .. }));
}

#[test]
fn sub_image_aliases_parent() {
    let image = ImageAlloc::with_bounds(Bounds::new(0, 7, 0, 5), 0i16).unwrap();
    let parent = image.view();
    let sub = parent.sub_image(&Bounds::new(3, 5, 1, 4)).unwrap();
    assert!(sub.shares_buffer(&parent));

    sub.shade(|x, y, pix| *pix = (x + 10 * y) as i16).unwrap();
    for y in 1..=4 {
        for x in 3..=5 {
            assert_eq!(parent.at(x, y), sub.at(x, y));
        }
    }

    parent.set_value(4, 2, -7).unwrap();
    assert_eq!(sub.at(4, 2), Ok(-7));

    // Nested sub-views keep mapping to the same memory.
    let inner = sub.sub_image(&Bounds::new(4, 4, 2, 3)).unwrap();
    assert_eq!(inner.at(4, 2), Ok(-7));
    assert_eq!(inner.at(4, 3), Ok(34));
}

#[test]
fn copy_from_matches_by_offset() {
    let a = ImageAlloc::with_bounds(Bounds::new(1, 3, 1, 2), 0.0f32).unwrap();
    let b = ImageAlloc::with_bounds(Bounds::new(10, 14, 20, 24), 0.0f32).unwrap();
    b.shade(|x, y, pix| *pix = (x * 100 + y) as f32).unwrap();

    // A flipped sub-view of `b` with the same shape as `a`.
    let source = b
        .sub_image(&Bounds::new(11, 13, 21, 22))
        .unwrap()
        .flipped_x()
        .as_const();
    a.copy_from(&source).unwrap();

    assert_eq!(a.at(1, 1), Ok(1321.0));
    assert_eq!(a.at(3, 1), Ok(1121.0));
    assert_eq!(a.at(2, 2), Ok(1222.0));

    // Copying onto itself changes nothing.
    let before = ImageAlloc::from_view(&a.const_view()).unwrap();
    a.copy_from(&a.const_view()).unwrap();
    a.for_each(|x, y, pix| assert_eq!(Ok(pix), before.at(x, y)));

    let err = a.copy_from(&b.const_view()).unwrap_err();
    assert!(matches!(err, Error::ShapeMismatch { .. }));
}

#[test]
fn invert_self_twice() {
    let image = ImageAlloc::new(3, 3, 0.0f64).unwrap();
    image.shade(|x, y, pix| *pix = f64::from(x - y) * 0.75).unwrap();
    let original = image.clone();

    image.invert_self().unwrap();
    assert_eq!(image.at(2, 2), Ok(0.0));
    assert_eq!(image.at(3, 1), Ok(1.0 / 1.5));

    image.invert_self().unwrap();
    image.for_each(|x, y, pix| {
        let expected = original.at(x, y).unwrap();
        assert!((pix - expected).abs() <= 1e-12 * expected.abs());
    });
}

#[test]
fn complex_grid() {
    let image = ImageAlloc::new(2, 2, Complex64::new(1.0, 1.0)).unwrap();
    assert_eq!(image.sum_elements(), Ok(Complex64::new(4.0, 4.0)));
    image.invert_self().unwrap();
    assert_eq!(image.at(1, 2), Ok(Complex64::new(0.5, -0.5)));
    image.set_zero().unwrap();
    assert_eq!(image.sum_elements(), Ok(Complex64::new(0.0, 0.0)));
}

#[test_log::test]
fn resize_reuses_unique_buffer() {
    let mut image = ImageAlloc::new(8, 8, 1u32).unwrap();
    let before = image.buffer().unwrap().as_ptr();

    image.resize(&Bounds::new(0, 3, 0, 9)).unwrap();
    assert_eq!(image.buffer().unwrap().as_ptr(), before);
    assert_eq!(image.capacity(), 64);
    assert_eq!(image.stride(), 4);
    // Reused memory is not cleared.
    assert_eq!(image.sum_elements(), Ok(40));

    image.resize(&Bounds::new(0, 7, 0, 7)).unwrap();
    assert_eq!(image.buffer().unwrap().as_ptr(), before);

    image.resize(&Bounds::new(0, 8, 0, 7)).unwrap();
    assert_ne!(image.buffer().unwrap().as_ptr(), before);
    assert_eq!(image.capacity(), 72);
}

#[test_log::test]
fn resize_while_shared_reallocates() {
    let mut image = ImageAlloc::new(4, 4, 3i32).unwrap();
    let kept = image.view();

    image.resize(&Bounds::new(1, 2, 1, 2)).unwrap();
    assert!(!image.view().shares_buffer(&kept));

    image.fill(9).unwrap();
    assert_eq!(kept.sum_elements(), Ok(48));
    assert_eq!(image.sum_elements(), Ok(36));
}

#[test]
fn resize_to_undefined_releases() {
    let mut image = ImageAlloc::new(4, 4, 3i32).unwrap();
    let kept = image.view();
    assert_eq!(kept.storage().and_then(|s| s.buffer()).unwrap().holders(), 2);

    image.resize(&Bounds::undefined()).unwrap();
    assert!(!image.is_defined());
    assert_eq!(image.step(), 0);
    assert_eq!(image.stride(), 0);
    assert_eq!(image.at(1, 1), Err(Error::Undefined));
    assert_eq!(kept.storage().and_then(|s| s.buffer()).unwrap().holders(), 1);
}

#[test]
fn invalid_bounds() {
    assert!(matches!(
        ImageAlloc::new(0, 4, 0.0f64),
        Err(Error::InvalidBounds(_))
    ));

    let mut image = ImageAlloc::new(2, 2, 0.0f64).unwrap();
    let mut bad = Bounds::new(1, 4, 1, 4);
    bad.xmax = -3;
    assert_eq!(image.resize(&bad), Err(Error::InvalidBounds(bad)));
    // Untouched after the failure.
    assert_eq!(*image.bounds(), Bounds::new(1, 2, 1, 2));

    // Both axes inverted, the product of the extents is positive.
    let mut inverted = Bounds::new(1, 3, 1, 3);
    (inverted.xmin, inverted.xmax, inverted.ymin, inverted.ymax) = (3, 1, 3, 1);
    assert_eq!(inverted.area(), 1);
    assert_eq!(image.resize(&inverted), Err(Error::InvalidBounds(inverted)));
    assert!(matches!(
        ImageAlloc::with_bounds(inverted, 0.0f64),
        Err(Error::InvalidBounds(_))
    ));
    assert_eq!(image.stride(), 2);
}

#[test]
fn foreign_memory_is_not_copied() {
    // A column-major 3x2 array, viewed as row-major coordinates.
    let mut data = [1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0];
    {
        let bounds = Bounds::new(0, 2, 0, 1);
        let view = ImageView::from_slice_mut(&mut data[..], 0, 2, 1, &bounds).unwrap();
        assert_eq!(view.at(1, 0), Ok(3.0));
        assert_eq!(view.at(0, 1), Ok(2.0));
        view.set_value(2, 1, 60.0).unwrap();
        assert_eq!(view.sum_elements(), Ok(75.0));
    }
    assert_eq!(data[5], 60.0);

    // Negative step starting at the end of a row.
    let cells = Cell::from_mut(&mut data[..]).as_slice_of_cells();
    let reversed = ConstImageView::from_cells(cells, 5, -1, -3, &Bounds::new(0, 2, 0, 1)).unwrap();
    assert_eq!(reversed.at(0, 0), Ok(60.0));
    assert_eq!(reversed.at(2, 1), Ok(1.0));

    let err = ConstImageView::from_cells(cells, 4, 1, 3, &Bounds::new(0, 2, 0, 1)).unwrap_err();
    assert!(matches!(err, Error::InvalidLayout(_)));
}

#[test]
fn foreign_bytes() {
    let mut bytes = [0u32; 4];
    {
        let view = ImageView::<u32>::from_bytes_mut(
            bytemuck::cast_slice_mut(&mut bytes[..]),
            0,
            1,
            2,
            &Bounds::new(0, 1, 0, 1),
        )
        .unwrap();
        view.fill(7).unwrap();
    }
    assert_eq!(bytes, [7; 4]);

    let mut short = [0u8; 3];
    let err = ImageView::<u16>::from_bytes_mut(&mut short, 0, 1, 1, &Bounds::new(0, 0, 0, 0));
    assert!(matches!(err, Err(Error::InvalidLayout(_))));
}

#[test]
fn clone_is_deep() {
    let mut image = ImageAlloc::new(6, 6, 1i32).unwrap();
    // A reused buffer with spare capacity.
    image.resize(&Bounds::new(-1, 1, 0, 2)).unwrap();
    image.fill(4).unwrap();

    let copy = image.clone();
    assert_eq!(*copy.bounds(), *image.bounds());
    assert_eq!(copy.capacity(), 9);
    assert!(!copy.view().shares_buffer(&image.view()));

    copy.set_value(0, 1, -2).unwrap();
    assert_eq!(image.at(0, 1), Ok(4));
    assert_eq!(copy.sum_elements(), Ok(8 * 4 - 2));

    let empty = ImageAlloc::<f32>::empty().clone();
    assert!(!empty.is_defined());
}
