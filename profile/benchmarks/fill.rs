//! Benchmarks bulk fills of shapelets against per-pixel evaluation.
use brunch::Bench;

use sky_grid::{Bounds, Complex64, ImageAlloc};
use sky_profile::{Coords, SampleGrid, Shapelet, SurfaceBrightness};

struct Fill {
    order: usize,
    sz: i32,
    sheared: bool,
}

impl Fill {
    fn name(&self) -> String {
        format!(
            "fill(order {}, {}x{}, sheared: {})",
            self.order, self.sz, self.sz, self.sheared
        )
    }

    fn grid(&self) -> SampleGrid {
        let start = -f64::from(self.sz) * 0.05;
        let mut grid = SampleGrid::aligned(start, 0.1, start, 0.1);
        if self.sheared {
            grid.dxy = 0.01;
            grid.dyx = -0.01;
        }
        grid
    }

    fn shapelet(&self) -> Shapelet {
        let len = (self.order + 1) * (self.order + 2) / 2;
        let bvec: Vec<f64> = (0..len).map(|i| 1.0 / (1.0 + i as f64)).collect();
        Shapelet::new(1.5, bvec).expect("valid shapelet")
    }

    fn prepare_x(self) -> impl FnMut() {
        let image = ImageAlloc::with_bounds(Bounds::new(0, self.sz - 1, 0, self.sz - 1), 0.0)
            .expect("Failed to allocate");
        let (profile, grid) = (self.shapelet(), self.grid());
        move || profile.fill_x(&image.view(), &grid).unwrap()
    }

    fn prepare_k(self) -> impl FnMut() {
        let zero = Complex64::new(0.0, 0.0);
        let image = ImageAlloc::with_bounds(Bounds::new(0, self.sz - 1, 0, self.sz - 1), zero)
            .expect("Failed to allocate");
        let (profile, grid) = (self.shapelet(), self.grid());
        move || profile.fill_k(&image.view(), &grid).unwrap()
    }

    fn prepare_coords(self) -> impl FnMut() {
        let image = ImageAlloc::with_bounds(Bounds::new(0, self.sz - 1, 0, self.sz - 1), 0.0)
            .expect("Failed to allocate");
        let profile = self.shapelet();
        let coords = Coords::for_view(&self.grid(), &image.view());
        move || profile.fill_x_coords(&image.view(), &coords).unwrap()
    }
}

fn main() {
    let tests = |sheared| {
        [4, 10, 20].map(|order| Fill {
            order,
            sz: 128,
            sheared,
        })
    };

    let mut benches = brunch::Benches::default();
    benches.extend(tests(false).map(|fill| {
        Bench::new(format!("profile::fill::x::{}", fill.name())).run(fill.prepare_x())
    }));
    benches.extend(tests(true).map(|fill| {
        Bench::new(format!("profile::fill::x::{}", fill.name())).run(fill.prepare_x())
    }));
    benches.extend(tests(false).map(|fill| {
        Bench::new(format!("profile::fill::k::{}", fill.name())).run(fill.prepare_k())
    }));
    benches.extend(tests(false).map(|fill| {
        Bench::new(format!("profile::fill::coords::{}", fill.name())).run(fill.prepare_coords())
    }));
    benches.finish();
}
