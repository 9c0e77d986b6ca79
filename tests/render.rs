use std::env;
use duffing::render::{poincare_file_name, RenderConfig, Renderer};
use duffing::{solve_duffing, DuffingParams};

fn small() -> Renderer {
    Renderer::new(RenderConfig { width: 200, height: 150, ..RenderConfig::default() })
}

#[test]
fn test_render_poincare_section() {
    let drive = DuffingParams::new(0.3, 0.2, 1.2);
    let solution = solve_duffing(600.0, 50, 100.0, 0.0, 0.0, drive.gamma, drive.delta, drive.omega).unwrap();
    let renderer = small();

    let img = renderer.poincare_section(&solution);
    assert_eq!(img.dimensions(), (200, 150));
    assert!(img.pixels().any(|p| p.0 != [255, 255, 255, 255]));

    let dir = env::temp_dir().join("duffing-render-test");
    let path = renderer.save(&img, &dir, &poincare_file_name(&drive)).unwrap();
    assert!(path.exists());
    let back = image::open(&path).unwrap();
    assert_eq!((back.width(), back.height()), (200, 150));
}

#[test]
fn test_render_phase_portrait() {
    let solution = solve_duffing(100.0, 100, 10.0, 1.0, 0.0, 0.3, 0.15, 1.2).unwrap();
    let img = small().phase_portrait(&solution);
    assert_eq!(img.dimensions(), (200, 150));
    let first = *img.get_pixel(0, 0);
    assert!(img.pixels().any(|p| *p != first));
}
