use std::cmp;
use image::{Rgba, RgbaImage};
use lazy_static::lazy_static;
use num::ToPrimitive;
use palette::{Clamp, FromColor, Lch, LabHue, Mix, Srgb};
use crate::canvas::{Canvas, Meta, Data};

pub trait ColorMap {
    fn build(&self, steps: usize) -> Vec<Rgba<u8>>;
}

fn hex(r: u8, g: u8, b: u8) -> Lch {
    let rgb: Srgb<f32> = Srgb::new(r, g, b).into_format();
    Lch::from_color(rgb)
}

lazy_static! {
    /// dark to bright through blue, magenta and orange; for densities
    pub static ref MAP_COLORFUL: [(f32, Lch); 5] = [
        (0.0, Lch::new(0.0,   100., LabHue::from_degrees(-120.))),
        (0.3, Lch::new(20.0,  100., LabHue::from_degrees(-60.))),
        (0.6, Lch::new(50.0,  100., LabHue::from_degrees(0.))),
        (0.8, Lch::new(80.0,  100., LabHue::from_degrees(60.))),
        (1.0, Lch::new(100.0, 0.,   LabHue::from_degrees(60.)))
    ];

    /// diverging red-yellow-blue, the usual "Spectral" stops
    pub static ref MAP_SPECTRAL: [(f32, Lch); 11] = [
        (0.0, hex(0x9e, 0x01, 0x42)),
        (0.1, hex(0xd5, 0x3e, 0x4f)),
        (0.2, hex(0xf4, 0x6d, 0x43)),
        (0.3, hex(0xfd, 0xae, 0x61)),
        (0.4, hex(0xfe, 0xe0, 0x8b)),
        (0.5, hex(0xff, 0xff, 0xbf)),
        (0.6, hex(0xe6, 0xf5, 0x98)),
        (0.7, hex(0xab, 0xdd, 0xa4)),
        (0.8, hex(0x66, 0xc2, 0xa5)),
        (0.9, hex(0x32, 0x88, 0xbd)),
        (1.0, hex(0x5e, 0x4f, 0xa2))
    ];
}

/// Color at `x` in `[0, 1]` on a gradient given by sorted `(position, color)` stops.
fn gradient(stops: &[(f32, Lch)], x: f32) -> Lch {
    let i = stops.iter().rposition(|&(pos, _)| pos <= x).unwrap_or(0);
    match stops.get(i + 1) {
        Some(&(pos, next)) => {
            let (start, color) = stops[i];
            let factor = ((x - start) / (pos - start)).max(0.0).min(1.0);
            color.mix(next, factor)
        },
        None => stops[i].1
    }
}

fn to_pixel(color: Lch) -> Rgba<u8> {
    let rgb: Srgb<u8> = Srgb::<f32>::from_color(color).clamp().into_format();
    Rgba([rgb.red, rgb.green, rgb.blue, 255])
}

impl<'a> ColorMap for &'a [(f32, Lch)] {
    /// `steps` colors evenly spread over the whole gradient, ends included.
    fn build(&self, steps: usize) -> Vec<Rgba<u8>> {
        if self.is_empty() {
            return vec![Rgba([0, 0, 0, 255]); steps];
        }
        let k = cmp::max(steps, 2) - 1;
        (0 .. steps).map(|i| {
            to_pixel(gradient(self, i as f32 / k as f32))
        }).collect()
    }
}

/// Color a canvas by value relative to its maximum. `exposure` < 1 lifts
/// faint regions; zero-valued pixels keep the lowest color.
pub fn map<C: Canvas>(canvas: &C, colormap: &dyn ColorMap, exposure: f32) -> RgbaImage
    where <C::Data as Data>::Item: ToPrimitive
{
    canvas.run(|meta, data| {
        let (width, height) = meta.size();
        let mut max_value = 0.0f32;
        for y in 0 .. height {
            for x in 0 .. width {
                if let Some(v) = data.get(meta.index((x, y))).to_f32() {
                    if v > max_value {
                        max_value = v;
                    }
                }
            }
        }

        log::debug!("density map {}x{}, max = {}", width, height, max_value);
        let steps = 1024;
        let cmap = colormap.build(steps);
        let mut imgbuf = RgbaImage::from_pixel(width as u32, height as u32, cmap[0]);
        if max_value == 0. {
            return imgbuf;
        }

        for (x, y, p) in imgbuf.enumerate_pixels_mut() {
            let idx = meta.index((x as usize, y as usize));
            let v = data.get(idx)
                .to_f32()
                .map(|v| (v / max_value).max(0.0).powf(exposure) * (steps - 1) as f32)
                .unwrap_or(0.);
            *p = cmap[cmp::min(v as usize, steps - 1)];
        }

        imgbuf
    })
}

#[test]
fn test_build_endpoints() {
    let stops: &[(f32, Lch)] = &MAP_SPECTRAL[..];
    let colors = stops.build(11);
    assert_eq!(colors.len(), 11);
    // each sample sits exactly on a stop and round-trips to its source color
    let first = colors[0].0;
    let last = colors[10].0;
    assert!((first[0] as i32 - 0x9e).abs() <= 1 && (first[2] as i32 - 0x42).abs() <= 1, "{:?}", first);
    assert!((last[0] as i32 - 0x5e).abs() <= 1 && (last[2] as i32 - 0xa2).abs() <= 1, "{:?}", last);
    assert!(colors.iter().all(|c| c.0[3] == 255));
}

#[test]
fn test_map_scales_to_max() {
    use crate::array::Density;

    let mut density: Density = crate::array::Array::zeros(2, 1);
    density[(1, 0)] = 4.0;
    let stops: &[(f32, Lch)] = &MAP_COLORFUL[..];
    let img = map(&density, &stops, 1.0);
    let cmap = stops.build(1024);
    assert_eq!(*img.get_pixel(0, 0), cmap[0]);
    assert_eq!(*img.get_pixel(1, 0), cmap[1023]);
}
