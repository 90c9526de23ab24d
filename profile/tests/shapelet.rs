use sky_grid::{Bounds, Complex64, ImageAlloc};
use sky_profile::{Error, Position, RenderParams, SampleGrid, Shapelet, SurfaceBrightness};

const BVEC: [f64; 10] = [1.0, 0.2, -0.1, 0.3, 0.05, -0.2, 0.1, 0.0, -0.05, 0.02];

fn shapelet() -> Shapelet {
    Shapelet::new(1.3, BVEC).unwrap()
}

fn max_abs(image: &ImageAlloc<f64>) -> f64 {
    let mut peak = 0.0f64;
    image.for_each(|_, _, pix| peak = peak.max(pix.abs()));
    peak
}

#[test]
fn rejects_invalid_parameters() {
    assert!(matches!(
        Shapelet::new(0.0, [1.0]),
        Err(Error::InvalidParameter(_))
    ));
    assert!(Shapelet::new(-1.0, [1.0]).is_err());
    assert!(Shapelet::new(f64::NAN, [1.0]).is_err());
    assert!(Shapelet::new(1.0, [1.0, 0.0]).is_err());
    assert!(Shapelet::new(1.0, Vec::<f64>::new()).is_err());

    let profile = Shapelet::new(1.0, [1.0, 0.0, 0.0]).unwrap();
    assert_eq!(profile.order(), 1);
    assert!(profile
        .clone()
        .with_params(RenderParams {
            folding_threshold: 2.0,
            ..RenderParams::default()
        })
        .is_err());
}

#[test]
fn coefficients_by_order() {
    let profile = shapelet();
    assert_eq!(profile.order(), 3);
    assert_eq!(profile.coefficient(0, 0), Some(1.0));
    assert_eq!(profile.coefficient(1, 0), Some(0.2));
    assert_eq!(profile.coefficient(0, 1), Some(-0.1));
    assert_eq!(profile.coefficient(1, 2), Some(-0.05));
    assert_eq!(profile.coefficient(2, 2), None);
    assert!(!profile.is_axisymmetric());
    assert!(!profile.has_hard_edges());
    assert!(profile.is_analytic_x() && profile.is_analytic_k());
}

#[test]
fn zeroth_order_is_gaussian() {
    let sigma = 0.8;
    let profile = Shapelet::new(sigma, [1.0]).unwrap();
    let norm = 1.0 / (sigma * sigma * core::f64::consts::PI.sqrt());
    for pos in [Position::origin(), Position::new(0.5, -1.0), Position::new(2.0, 0.3)] {
        let expected = norm * (-0.5 * pos.norm_sqr() / (sigma * sigma)).exp();
        let got = profile.x_value(pos).unwrap();
        assert!((got - expected).abs() < 1e-15, "{got} != {expected}");
    }
}

#[test]
fn aligned_fill_matches_pointwise() {
    let profile = shapelet();
    let image = ImageAlloc::with_bounds(Bounds::new(-10, 10, -9, 9), -1.0).unwrap();
    let target = Bounds::new(-8, 8, -6, 7);
    let view = image.sub_image(&target).unwrap();
    let grid = SampleGrid::aligned(-2.3, 0.27, 1.9, -0.31);

    profile.fill_x(&view, &grid).unwrap();

    let peak = max_abs(&image);
    image.for_each(|x, y, pix| {
        if !target.includes(x, y) {
            assert_eq!(pix, -1.0, "outside of the view at {x},{y}");
            return;
        }

        let pos = grid.position((x - target.xmin) as usize, (y - target.ymin) as usize);
        let expected = profile.x_value(pos).unwrap();
        assert!((pix - expected).abs() <= 1e-10 * peak, "{pix} != {expected} at {x},{y}");
    });
}

#[test]
fn sheared_fill_matches_pointwise() {
    let profile = shapelet();
    let image = ImageAlloc::with_bounds(Bounds::new(0, 11, 0, 8), 0.0).unwrap();
    let grid = SampleGrid {
        x0: -2.0,
        dx: 0.3,
        dxy: 0.07,
        y0: -1.5,
        dy: 0.35,
        dyx: -0.05,
    };

    profile.fill_x(&image.view(), &grid).unwrap();

    let peak = max_abs(&image);
    image.for_each(|x, y, pix| {
        let expected = profile.x_value(grid.position(x as usize, y as usize)).unwrap();
        assert!((pix - expected).abs() <= 1e-10 * peak);
    });
}

#[test]
fn fourier_fill_matches_pointwise() {
    let profile = shapelet();
    let image = ImageAlloc::with_bounds(Bounds::new(-6, 6, -6, 6), Complex64::new(0.0, 0.0)).unwrap();
    let grid = SampleGrid::aligned(-3.0, 0.5, -3.0, 0.5);

    profile.fill_k(&image.view(), &grid).unwrap();

    let peak = profile.k_value(Position::origin()).unwrap().norm();
    image.for_each(|x, y, pix| {
        let k = grid.position((x + 6) as usize, (y + 6) as usize);
        let expected = profile.k_value(k).unwrap();
        assert!((pix - expected).norm() <= 1e-10 * peak, "{pix} != {expected} at {x},{y}");
    });
}

#[test]
fn flux_does_not_depend_on_sigma() {
    let narrow = Shapelet::new(1.0, BVEC).unwrap();
    let wide = Shapelet::new(2.0, BVEC).unwrap();
    assert!((narrow.flux() - wide.flux()).abs() < 1e-14);

    // Only the zeroth order carries flux for a single coefficient: I_0² = 2√π.
    let gaussian = Shapelet::new(2.5, [1.0]).unwrap();
    assert!((gaussian.flux() - 2.0 * core::f64::consts::PI.sqrt()).abs() < 1e-14);

    // The drawn flux agrees for both scales.
    for profile in [narrow, wide] {
        let image = ImageAlloc::with_bounds(Bounds::new(-60, 60, -60, 60), 0.0).unwrap();
        let drawn = sky_profile::draw::draw_x(&profile, &image.view(), 0.25).unwrap();
        assert!((drawn - profile.flux()).abs() < 1e-8, "{drawn} != {}", profile.flux());
    }
}

#[test]
fn centroid_scales_with_sigma() {
    let narrow = Shapelet::new(1.0, BVEC).unwrap();
    let wide = Shapelet::new(3.0, BVEC).unwrap();
    let (a, b) = (narrow.centroid(), wide.centroid());
    assert!((b.x - 3.0 * a.x).abs() < 1e-12);
    assert!((b.y - 3.0 * a.y).abs() < 1e-12);
}

#[test]
fn flux_is_transform_at_origin() {
    let profile = shapelet();
    let k0 = profile.k_value(Position::origin()).unwrap();
    assert!((k0.re - profile.flux()).abs() < 1e-12 * profile.flux().abs());
    assert!(k0.im.abs() < 1e-12);
}

#[test]
fn flux_and_centroid_by_integration() {
    let profile = shapelet();
    let h = 0.05;
    let n = 240;
    let image = ImageAlloc::with_bounds(Bounds::new(-n, n, -n, n), 0.0).unwrap();
    profile
        .fill_x(&image.view(), &SampleGrid::aligned(-f64::from(n) * h, h, -f64::from(n) * h, h))
        .unwrap();

    let (mut flux, mut mx, mut my) = (0.0, 0.0, 0.0);
    image.for_each(|x, y, pix| {
        let (px, py) = (f64::from(x) * h, f64::from(y) * h);
        flux += pix * h * h;
        mx += px * pix * h * h;
        my += py * pix * h * h;
    });

    assert!((flux - profile.flux()).abs() < 1e-8, "{flux} != {}", profile.flux());
    let centroid = profile.centroid();
    assert!((mx / flux - centroid.x).abs() < 1e-7, "{} != {}", mx / flux, centroid.x);
    assert!((my / flux - centroid.y).abs() < 1e-7, "{} != {}", my / flux, centroid.y);
}

#[test]
fn sizes_from_thresholds() {
    let sigma = 2.0;
    let profile = Shapelet::new(sigma, [1.0, 0.0, 0.0, 0.0, 0.0, 0.0]).unwrap();
    let params = RenderParams::default();
    let order_factor = 3.0f64.sqrt();

    let max_k = (-2.0 * params.maxk_threshold.ln()).sqrt() / sigma * order_factor;
    assert!((profile.max_k() - max_k).abs() < 1e-12);

    // The folding radius for the default threshold is below the floor of four.
    let step_k = core::f64::consts::PI / (4.0 * sigma * order_factor);
    assert!((profile.step_k() - step_k).abs() < 1e-12);

    let loose = profile
        .with_params(RenderParams {
            folding_threshold: 1e-5,
            ..params
        })
        .unwrap();
    let radius = (-2.0 * 1e-5f64.ln()).sqrt();
    assert!(radius > 4.0);
    assert!((loose.step_k() - core::f64::consts::PI / (radius * sigma * order_factor)).abs() < 1e-12);
}

#[test]
fn zero_flux_centroid_is_origin() {
    // Only odd orders, no flux at all.
    let profile = Shapelet::new(1.0, [0.0, 1.0, 0.5]).unwrap();
    assert_eq!(profile.flux(), 0.0);
    assert_eq!(profile.centroid(), Position::origin());
}

#[test]
fn shooting_is_unsupported() {
    let mut rng = <rand::rngs::StdRng as rand::SeedableRng>::seed_from_u64(7);
    assert!(matches!(
        shapelet().shoot(10, &mut rng),
        Err(Error::Unsupported(..))
    ));
}
