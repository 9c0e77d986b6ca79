use std::ops::{Range, AddAssign};
use image::{Rgba, RgbaImage};
use nalgebra::{Point2, Vector2};
use num::{cast, NumCast};
use crate::canvas::{Canvas, Meta, Data, Initial};
use crate::pen::Pen;

pub enum Item {
    /// polyline through the points; the second argument is the strength to
    /// draw with (line intensity)
    Traced(Vec<Point2<f64>>, f32),

    /// one disc per point, colored by the matching entry
    Scattered(Vec<Point2<f64>>, Vec<Rgba<u8>>)
}

/// How scattered points are painted.
#[derive(Copy, Clone, Debug)]
pub struct Marker {
    pub radius: f32,
    pub alpha:  f32
}

/// A plot in domain coordinates; y grows upwards.
pub struct Figure {
    offset: Vector2<f64>,
    size:   Vector2<f64>,
    items:  Vec<Item>
}

impl Figure {
    pub fn new(x: Range<f64>, y: Range<f64>) -> Figure {
        Figure {
            offset: Vector2::new(x.start, y.start),
            size:   Vector2::new(x.end - x.start, y.end - y.start),
            items:  Vec::new()
        }
    }

    /// A figure spanning `lo .. hi`, widened by `margin` (a fraction of the
    /// span) on every side. Degenerate spans get a unit width.
    pub fn around(lo: Vector2<f64>, hi: Vector2<f64>, margin: f64) -> Figure {
        let pad = |lo: f64, hi: f64| {
            let span = hi - lo;
            if span > 0.0 {
                (lo - margin * span) .. (hi + margin * span)
            } else {
                (lo - 0.5) .. (hi + 0.5)
            }
        };
        Figure::new(pad(lo.x, hi.x), pad(lo.y, hi.y))
    }

    pub fn trace<I>(&mut self, points: I, strength: f32) -> &mut Figure
        where I: IntoIterator<Item=Point2<f64>>
    {
        self.items.push(Item::Traced(points.into_iter().collect(), strength));
        self
    }

    pub fn scatter(&mut self, points: Vec<Point2<f64>>, colors: Vec<Rgba<u8>>) -> &mut Figure {
        self.items.push(Item::Scattered(points, colors));
        self
    }

    /// Domain point to pixel position on a `width` x `height` canvas.
    pub fn to_pixel(&self, p: Point2<f64>, width: usize, height: usize) -> Point2<f32> {
        let rel = (p - Point2::from(self.offset)).component_div(&self.size);
        Point2::new(
            (rel.x * width as f64) as f32,
            ((1.0 - rel.y) * height as f64) as f32
        )
    }

    /** accumulate the traced items on a canvas of the given size **/
    pub fn draw<C>(&self, width: usize, height: usize) -> C where
        C: Canvas, C::Data: Initial, <C::Data as Data>::Item: NumCast + AddAssign
    {
        let mut canvas = C::new(
            C::Meta::new(width, height),
            C::Data::initial(width, height)
        );
        self.draw_on(&mut canvas);
        canvas
    }

    pub fn draw_on<C>(&self, canvas: &mut C)
        where C: Canvas, <C::Data as Data>::Item: NumCast + AddAssign
    {
        canvas.run_mut(|meta, data| {
            let (width, height) = meta.size();
            for item in self.items.iter() {
                if let Item::Traced(ref points, strength) = *item {
                    let mut pen = Pen::new(|x, y, v| {
                        if let (Some(idx), Some(inc)) = (meta.clip(x, y), cast(strength * v)) {
                            *data.get_mut(idx) += inc;
                        }
                    });
                    pen.polyline(points.iter().map(|&p| self.to_pixel(p, width, height)));
                }
            }
        });
    }

    /// Paint every item onto an image: traces as lines in `ink`, scatters as
    /// alpha-blended discs.
    pub fn paint(&self, img: &mut RgbaImage, ink: Rgba<u8>, marker: Marker) {
        let (width, height) = (img.width() as usize, img.height() as usize);
        for item in self.items.iter() {
            match *item {
                Item::Traced(ref points, strength) => {
                    let mut pen = Pen::new(|x, y, v| blend(img, x, y, ink, strength * v));
                    pen.polyline(points.iter().map(|&p| self.to_pixel(p, width, height)));
                },
                Item::Scattered(ref points, ref colors) => {
                    for (&p, &color) in points.iter().zip(colors.iter()) {
                        disc(img, self.to_pixel(p, width, height), marker.radius, color, marker.alpha);
                    }
                }
            }
        }
    }
}

/// Source-over blend of `color` at opacity `alpha` into one pixel.
fn blend(img: &mut RgbaImage, x: isize, y: isize, color: Rgba<u8>, alpha: f32) {
    if x < 0 || y < 0 || x as u32 >= img.width() || y as u32 >= img.height() {
        return;
    }
    let a = alpha.max(0.0).min(1.0);
    let dst = img.get_pixel_mut(x as u32, y as u32);
    for c in 0 .. 3 {
        let v = color.0[c] as f32 * a + dst.0[c] as f32 * (1.0 - a);
        dst.0[c] = v.round() as u8;
    }
    dst.0[3] = 255;
}

/// Filled disc with a one pixel soft edge.
fn disc(img: &mut RgbaImage, center: Point2<f32>, radius: f32, color: Rgba<u8>, alpha: f32) {
    let reach = (radius + 1.0).ceil() as isize;
    let (cx, cy) = (center.x.floor() as isize, center.y.floor() as isize);
    for y in cy - reach ..= cy + reach {
        for x in cx - reach ..= cx + reach {
            // distance from the pixel center
            let d = ((x as f32 + 0.5 - center.x).powi(2) + (y as f32 + 0.5 - center.y).powi(2)).sqrt();
            let coverage = (radius + 0.5 - d).max(0.0).min(1.0);
            if coverage > 0.0 {
                blend(img, x, y, color, alpha * coverage);
            }
        }
    }
}

#[test]
fn test_to_pixel_flips_y() {
    let fig = Figure::new(-1.0 .. 1.0, 0.0 .. 4.0);
    assert_eq!(fig.to_pixel(Point2::new(-1.0, 4.0), 100, 50), Point2::new(0.0, 0.0));
    assert_eq!(fig.to_pixel(Point2::new(0.0, 2.0), 100, 50), Point2::new(50.0, 25.0));
    assert_eq!(fig.to_pixel(Point2::new(1.0, 0.0), 100, 50), Point2::new(100.0, 50.0));
}

#[test]
fn test_around_pads_span() {
    let fig = Figure::around(Vector2::new(0.0, 1.0), Vector2::new(10.0, 1.0), 0.1);
    assert_eq!(fig.offset, Vector2::new(-1.0, 0.5));
    assert_eq!(fig.size, Vector2::new(12.0, 1.0));
}

#[test]
fn test_draw_traces_density() {
    use crate::array::{Array, RowMajor};

    let mut fig = Figure::new(0.0 .. 10.0, 0.0 .. 10.0);
    fig.trace(vec![Point2::new(1.0, 5.0), Point2::new(9.0, 5.0)], 1.0);
    let canvas: Array<Vec<f32>, RowMajor> = fig.draw(10, 10);
    let total: f32 = canvas.data.iter().sum();
    assert!(total > 7.0 && total < 9.0, "total = {}", total);
}

#[test]
fn test_scatter_blends() {
    let mut img = RgbaImage::from_pixel(9, 9, Rgba([255, 255, 255, 255]));
    let mut fig = Figure::new(0.0 .. 9.0, 0.0 .. 9.0);
    fig.scatter(vec![Point2::new(4.5, 4.5)], vec![Rgba([0, 0, 0, 255])]);
    fig.paint(&mut img, Rgba([0, 0, 0, 255]), Marker { radius: 1.0, alpha: 0.5 });
    // half opacity black over white
    assert_eq!(img.get_pixel(4, 4).0, [128, 128, 128, 255]);
    assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255, 255]);
}
