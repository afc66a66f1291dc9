use backdrop::camera::{ray_for, TILT};
use backdrop::frame::{
    CancellationToken, FixedStepClock, Frame, FrameDriver, Presenter,
};
use backdrop::marcher::{frag_coord, march, BACKDROP, MAX_STEPS};
use backdrop::math::{abs, v, v2};
use backdrop::{render_pixel, Color, Resolution, SceneState};

fn state(time: f64, width: i64, height: i64) -> SceneState {
    SceneState {
        time,
        resolution: Resolution::clamped(width, height),
    }
}

#[test]
fn center_pixel_at_time_zero() {
    let s = state(0., 800, 600);
    let center = v2(400., 300.);

    let ray = ray_for(center, s.resolution);
    let forward = v(0., -TILT.sin(), TILT.cos());
    assert!(abs(&(ray.direction - forward)) < 1e-12);

    let result = march(&BACKDROP, &ray, s.time);
    assert!(result.steps <= MAX_STEPS);
    assert_eq!(march(&BACKDROP, &ray, s.time), result);

    let Color { r, g, b } = render_pixel(center, &s);
    assert_eq!(r, g);
    assert_eq!(g, b);
    assert!((0.0..=0.9).contains(&r));
}

#[test]
fn adjacent_ground_pixels_are_continuous() {
    let s = state(0., 800, 600);
    for row in 590..600 {
        for (left, right) in [(5, 6), (793, 794), (400, 401)] {
            let a = render_pixel(frag_coord(left, row, 600), &s);
            let b = render_pixel(frag_coord(right, row, 600), &s);
            assert!(
                (a.r - b.r).abs() < 0.05,
                "row {row}, columns {left}/{right}: {a:?} vs {b:?}"
            );
        }
    }
}

#[test]
fn edge_rays_land_on_the_deformed_ground() {
    let s = state(0., 800, 600);
    for column in [5, 794] {
        let ray = ray_for(frag_coord(column, 595, 600), s.resolution);
        let hit = march(&BACKDROP, &ray, s.time);
        // the edge envelope only lifts the plane noticeably once |x| > 1
        assert!(hit.position.x.abs() > 1., "column {column}: {hit:?}");
    }
}

#[test]
fn same_snapshot_same_pixel() {
    let s = state(12.5, 320, 240);
    for (x, y) in [(0, 0), (160, 120), (319, 239), (40, 200)] {
        let frag = frag_coord(x, y, 240);
        assert_eq!(render_pixel(frag, &s), render_pixel(frag, &s));
    }
}

struct Sizes(Vec<(u32, u32, usize)>);

impl Presenter for Sizes {
    fn present(&mut self, frame: &Frame, state: &SceneState) -> anyhow::Result<()> {
        assert_eq!(frame.dimensions(), (state.resolution.width, state.resolution.height));
        for p in frame.pixels() {
            assert!(p.0.iter().all(|c| (0.0..=0.9).contains(c)));
        }
        self.0.push((frame.width(), frame.height(), frame.pixels().count()));
        Ok(())
    }
}

#[test]
fn resize_between_frames_never_straddles() {
    let mut driver = FrameDriver::new(Resolution::clamped(16, 12), FixedStepClock::new(24.));
    let resize = driver.resize_handle();
    let mut sizes = Sizes(Vec::new());

    driver.run(&mut sizes, &CancellationToken::new(), 2, None);
    resize.request(9, 20);
    driver.run(&mut sizes, &CancellationToken::new(), 2, None);

    assert_eq!(
        sizes.0,
        vec![(16, 12, 192), (16, 12, 192), (9, 20, 180), (9, 20, 180)]
    );
}
