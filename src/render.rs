//! Rendering collaborator for solved trajectories.
//!
//! All presentation settings live in one `RenderConfig`, owned by a
//! `Renderer` built once at startup. The numerical core never sees them;
//! the renderer only consumes `Solution`s.

use std::fs;
use std::path::{Path, PathBuf};
use image::{Rgba, RgbaImage};
use nalgebra::{Point2, Vector2};
use palette::Lch;
use serde::{Deserialize, Serialize};
use crate::array::Density;
use crate::colormap::{self, ColorMap, MAP_COLORFUL, MAP_SPECTRAL};
use crate::error::Result;
use crate::model::{potential_curve, DuffingParams};
use crate::plot::{Figure, Marker};
use crate::solver::Solution;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width:          u32,
    pub height:         u32,
    /// marker radius in pixels
    pub point_radius:   f32,
    /// marker opacity
    pub alpha:          f32,
    /// padding around the data, as a fraction of its span
    pub margin:         f64,
    /// density exponent for phase portraits
    pub exposure:       f32,
    pub background:     [u8; 4]
}

impl Default for RenderConfig {
    fn default() -> RenderConfig {
        RenderConfig {
            width:          800,
            height:         800,
            point_radius:   1.5,
            alpha:          0.5,
            margin:         0.05,
            exposure:       0.4,
            background:     [255, 255, 255, 255]
        }
    }
}

pub struct Renderer {
    config: RenderConfig
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Renderer {
        Renderer { config }
    }

    fn blank(&self) -> RgbaImage {
        RgbaImage::from_pixel(self.config.width, self.config.height, Rgba(self.config.background))
    }

    fn marker(&self) -> Marker {
        Marker {
            radius: self.config.point_radius,
            alpha:  self.config.alpha
        }
    }

    /// Scatter of the once-per-period samples, colored by their order along
    /// the Spectral map.
    pub fn poincare_section(&self, solution: &Solution) -> RgbaImage {
        let points: Vec<Point2<f64>> = solution.poincare_section()
            .into_iter()
            .map(Point2::from)
            .collect();

        let mut img = self.blank();
        let (lo, hi) = match bounds(&points) {
            Some(b) => b,
            None => return img
        };

        let spectral: &[(f32, Lch)] = &MAP_SPECTRAL[..];
        let colors = spectral.build(points.len());
        Figure::around(lo, hi, self.config.margin)
            .scatter(points, colors)
            .paint(&mut img, Rgba([0, 0, 0, 255]), self.marker());
        img
    }

    /// The continuous `(x, ẋ)` trajectory as a density of traced lines.
    pub fn phase_portrait(&self, solution: &Solution) -> RgbaImage {
        let (width, height) = (self.config.width as usize, self.config.height as usize);
        let (lo, hi) = match solution.bounds() {
            Some(b) => b,
            None => return self.blank()
        };

        let mut fig = Figure::around(lo, hi, self.config.margin);
        fig.trace(solution.states.iter().map(|&s| Point2::from(s)), 1.0);
        let density: Density = fig.draw(width, height);

        let colorful: &[(f32, Lch)] = &MAP_COLORFUL[..];
        colormap::map(&density, &colorful, self.config.exposure)
    }

    /// V(x) over [-1.5, 1.5].
    pub fn potential_curve(&self) -> RgbaImage {
        let curve: Vec<Point2<f64>> = potential_curve(-1.5 .. 1.5, 100)
            .into_iter()
            .map(|(x, v)| Point2::new(x, v))
            .collect();

        let mut img = self.blank();
        if let Some((lo, hi)) = bounds(&curve) {
            Figure::around(lo, hi, self.config.margin)
                .trace(curve, 1.0)
                .paint(&mut img, Rgba([0, 0, 160, 255]), self.marker());
        }
        img
    }

    /// Write `img` as PNG to `dir/name`, creating `dir` if needed.
    pub fn save(&self, img: &RgbaImage, dir: &Path, name: &str) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(name);
        img.save_with_format(&path, image::ImageFormat::Png)?;
        log::info!("wrote {}", path.display());
        Ok(path)
    }
}

fn bounds(points: &[Point2<f64>]) -> Option<(Vector2<f64>, Vector2<f64>)> {
    let first = points.first()?.coords;
    Some(points.iter().fold((first, first), |(lo, hi), p| (lo.inf(&p.coords), hi.sup(&p.coords))))
}

/// File name carrying the drive parameters with three decimals.
pub fn poincare_file_name(p: &DuffingParams) -> String {
    format!("Poincaré_section_omega={:.3}gamma={:.3}delta={:.3}.png", p.omega, p.gamma, p.delta)
}

/// The potential does not depend on the drive, so it gets a fixed name.
pub const POTENTIAL_FILE_NAME: &str = "potential.png";

/// Same naming scheme for the phase portrait.
pub fn phase_portrait_file_name(p: &DuffingParams) -> String {
    format!("phase_portrait_omega={:.3}gamma={:.3}delta={:.3}.png", p.omega, p.gamma, p.delta)
}

#[test]
fn test_file_names() {
    let p = DuffingParams::new(0.08, 0.02, 0.28);
    assert_eq!(poincare_file_name(&p), "Poincaré_section_omega=0.280gamma=0.080delta=0.020.png");
    assert_eq!(phase_portrait_file_name(&p), "phase_portrait_omega=0.280gamma=0.080delta=0.020.png");
}

#[test]
fn test_potential_curve_image() {
    let renderer = Renderer::new(RenderConfig { width: 120, height: 80, ..RenderConfig::default() });
    let img = renderer.potential_curve();
    assert_eq!(img.dimensions(), (120, 80));
    assert!(img.pixels().any(|p| p.0 != [255, 255, 255, 255]));
}
