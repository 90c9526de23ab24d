use sky_grid::{Bounds, Complex64, ImageAlloc};

/// Fold by brute force: add every pixel onto its congruent target pixel.
fn reference_fold(image: &ImageAlloc<f64>, target: &Bounds) -> ImageAlloc<f64> {
    let folded = ImageAlloc::with_bounds(*target, 0.0).unwrap();
    let (mwrap, nwrap) = (target.width() as i32, target.height() as i32);
    image.for_each(|x, y, pix| {
        let xx = target.xmin + (x - target.xmin).rem_euclid(mwrap);
        let yy = target.ymin + (y - target.ymin).rem_euclid(nwrap);
        let old = folded.at(xx, yy).unwrap();
        folded.set_value(xx, yy, old + pix).unwrap();
    });
    folded
}

fn ramp(bounds: Bounds) -> ImageAlloc<f64> {
    let image = ImageAlloc::with_bounds(bounds, 0.0).unwrap();
    image
        .shade(|x, y, pix| *pix = f64::from(x * 31 + y * 7 + 3))
        .unwrap();
    image
}

#[test_log::test]
fn ones_fold_to_fours() {
    let image = ImageAlloc::new(6, 6, 1.0f64).unwrap();
    let target = Bounds::new(1, 3, 1, 3);
    let folded = image.wrap(&target).unwrap();
    assert_eq!(*folded.bounds(), target);
    folded.for_each(|_, _, pix| assert_eq!(pix, 4.0));
}

#[test_log::test]
fn matches_reference_for_offset_targets() {
    let bounds = Bounds::new(-4, 7, -3, 9);
    let targets = [
        Bounds::new(0, 3, 0, 4),
        Bounds::new(-4, -2, -3, 0),
        Bounds::new(5, 7, 7, 9),
        Bounds::new(-1, 1, 2, 2),
        // Full width, rows only.
        Bounds::new(-4, 7, 1, 5),
        // Full height, columns only.
        Bounds::new(2, 6, -3, 9),
    ];

    for target in targets {
        let image = ramp(bounds);
        let expected = reference_fold(&image, &target);
        let total = image.sum_elements().unwrap();

        let folded = image.wrap(&target).unwrap();
        assert_eq!(folded.sum_elements().unwrap(), total, "mass for {target}");
        folded.for_each(|x, y, pix| {
            assert_eq!(pix, expected.at(x, y).unwrap(), "pixel {x},{y} for {target}");
        });
    }
}

#[test]
fn same_size_is_identity() {
    let image = ramp(Bounds::new(1, 5, 1, 4));
    let before = image.clone();
    let folded = image.wrap(&Bounds::new(1, 5, 1, 4)).unwrap();
    folded.for_each(|x, y, pix| assert_eq!(pix, before.at(x, y).unwrap()));
}

#[test]
fn wraps_sub_views_and_flipped_views() {
    let image = ImageAlloc::new(10, 10, 0.0f64).unwrap();
    let region = image.sub_image(&Bounds::new(2, 9, 3, 8)).unwrap();
    region.fill(1.0).unwrap();

    // Folding a flipped sub-view touches only the sub-view's pixels.
    let flipped = region.flipped_x().flipped_y();
    let folded = flipped.wrap(&Bounds::new(4, 7, 4, 6)).unwrap();
    folded.for_each(|_, _, pix| assert_eq!(pix, 4.0));
    assert_eq!(image.at(1, 1), Ok(0.0));
    assert_eq!(image.at(10, 10), Ok(0.0));
}

#[test]
fn folds_complex_values() {
    let image = ImageAlloc::new(4, 2, Complex64::new(1.0, -2.0)).unwrap();
    let folded = image.wrap(&Bounds::new(2, 3, 1, 2)).unwrap();
    folded.for_each(|_, _, pix| assert_eq!(pix, Complex64::new(2.0, -4.0)));
}
