use std::mem::swap;
use nalgebra::Point2;

type N = f32;

/// Anti-aliased line rasteriser. Every touched pixel is handed to `draw`
/// together with its coverage in `[0, 1]`.
pub struct Pen<F> {
    draw:   F,
    p:      Point2<N>
}

#[inline(always)]
fn fpart(x: N) -> N {
    x - x.floor()
}

#[inline(always)]
fn rfpart(x: N) -> N {
    1.0 - fpart(x)
}

impl<F> Pen<F> where F: FnMut(isize, isize, N)
{
    pub fn new(draw: F) -> Pen<F> {
        Pen {
            draw:   draw,
            p:      Point2::origin()
        }
    }

    pub fn line(&mut self, p0: Point2<N>, p1: Point2<N>) {
        self.move_to(p0);
        self.line_to(p1);
    }

    #[inline]
    pub fn move_to(&mut self, p: Point2<N>) {
        self.p = p;
    }

    /// Draw a polyline through `points`.
    pub fn polyline<I>(&mut self, points: I) where I: IntoIterator<Item=Point2<N>> {
        let mut points = points.into_iter();
        if let Some(start) = points.next() {
            self.move_to(start);
            for p in points {
                self.line_to(p);
            }
        }
    }

    /// Segments shorter than a tenth of a pixel are skipped and the pen stays
    /// put, so dense traces do not pile up on one pixel.
    pub fn line_to(&mut self, p: Point2<N>) {
        let (mut x0, mut y0) = (self.p.x, self.p.y);
        let (mut x1, mut y1) = (p.x, p.y);
        let threshold = 0.1;

        if (x1 - x0).abs().max((y1 - y0).abs()) < threshold {
            return;
        }
        self.p = p;

        // Xiaolin Wu's algorithm
        let steep = (y1 - y0).abs() > (x1 - x0).abs();
        let draw = &mut self.draw;
        let mut plot = |a: isize, b: isize, v: N| {
            if steep {
                draw(b, a, v)
            } else {
                draw(a, b, v)
            }
        };

        if steep {
            swap(&mut x0, &mut y0);
            swap(&mut x1, &mut y1);
        }
        if x0 > x1 {
            swap(&mut x0, &mut x1);
            swap(&mut y0, &mut y1);
        }

        let dx = x1 - x0;
        let gradient = if dx > 0. { (y1 - y0) / dx } else { 1.0 };

        // first endpoint
        let xend = x0.round();
        let yend = y0 + gradient * (xend - x0);
        let xgap = rfpart(x0 + 0.5);
        let xpxl1 = xend as isize;
        let ypxl1 = yend.floor() as isize;
        plot(xpxl1, ypxl1,     xgap * rfpart(yend));
        plot(xpxl1, ypxl1 + 1, xgap * fpart(yend));
        let mut intery = yend + gradient;

        // second endpoint
        let xend = x1.round();
        let yend = y1 + gradient * (xend - x1);
        let xgap = fpart(x1 + 0.5);
        let xpxl2 = xend as isize;
        let ypxl2 = yend.floor() as isize;
        plot(xpxl2, ypxl2,     xgap * rfpart(yend));
        plot(xpxl2, ypxl2 + 1, xgap * fpart(yend));

        for x in xpxl1 + 1 .. xpxl2 {
            let py = intery.floor() as isize;
            plot(x, py,     rfpart(intery));
            plot(x, py + 1, fpart(intery));
            intery += gradient;
        }
    }
}

#[test]
fn test_horizontal_line_coverage() {
    let mut hits = vec![0.0f32; 10];
    Pen::new(|x, y, v| {
        if y == 2 && x >= 0 && x < 10 {
            hits[x as usize] += v;
        }
    }).line(Point2::new(1.0, 2.0), Point2::new(8.0, 2.0));

    for x in 2 .. 8 {
        assert!((hits[x] - 1.0).abs() < 1e-6, "x = {}: {}", x, hits[x]);
    }
    assert_eq!(hits[0], 0.0);
    assert_eq!(hits[9], 0.0);
}

#[test]
fn test_short_segment_skipped() {
    let mut count = 0;
    Pen::new(|_, _, _| count += 1).line(Point2::new(1.0, 1.0), Point2::new(1.05, 1.0));
    assert_eq!(count, 0);
}
