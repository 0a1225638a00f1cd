// Circle packing for the language bubble chart.
//
// Every value becomes a circle whose area is proportional to the value. The
// largest circle goes in the middle and each next one is placed tangent to two
// circles already placed, at the free spot nearest the origin. The result is
// centered and scaled so that it fits in [-1, 1] on both axes.

const EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub x: f64,
    pub y: f64,
    pub r: f64,
}

impl Circle {
    fn overlaps(&self, other: &Circle) -> bool {
        let distance = (self.x - other.x).hypot(self.y - other.y);
        distance + EPSILON < self.r + other.r
    }

    fn extent(&self) -> f64 {
        (self.x.abs() + self.r).max(self.y.abs() + self.r)
    }
}

/// Circles in the same order as `values`.
pub fn pack(values: &[u64]) -> Vec<Circle> {
    let radii: Vec<f64> = values.iter().map(|&v| (v as f64).sqrt()).collect();

    let mut order: Vec<usize> = (0..radii.len()).collect();
    order.sort_by(|&a, &b| radii[b].total_cmp(&radii[a]));

    let mut placed: Vec<Circle> = Vec::with_capacity(radii.len());
    let mut slots: Vec<Option<Circle>> = vec![None; radii.len()];
    for index in order {
        let circle = place(&placed, radii[index]);
        placed.push(circle);
        slots[index] = Some(circle);
    }

    let circles: Vec<Circle> = slots.into_iter().flatten().collect();
    fit_to_unit_square(circles)
}

fn place(placed: &[Circle], r: f64) -> Circle {
    match placed {
        [] => Circle { x: 0.0, y: 0.0, r },
        [first] => Circle {
            x: first.x + first.r + r,
            y: first.y,
            r,
        },
        _ => {
            let mut best: Option<Circle> = None;
            for (i, a) in placed.iter().enumerate() {
                for b in &placed[i + 1..] {
                    for candidate in tangent_to_both(a, b, r) {
                        if placed.iter().any(|p| candidate.overlaps(p)) {
                            continue;
                        }
                        let closer = best.is_none_or(|current| {
                            candidate.x.hypot(candidate.y) < current.x.hypot(current.y)
                        });
                        if closer {
                            best = Some(candidate);
                        }
                    }
                }
            }
            // Every pair is blocked only in degenerate input; fall back to the
            // outside of the current arrangement.
            best.unwrap_or_else(|| {
                let reach = placed
                    .iter()
                    .map(|p| p.x + p.r)
                    .fold(f64::MIN, f64::max);
                Circle {
                    x: reach + r,
                    y: 0.0,
                    r,
                }
            })
        }
    }
}

fn tangent_to_both(a: &Circle, b: &Circle, r: f64) -> Vec<Circle> {
    let da = a.r + r;
    let db = b.r + r;
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let d = dx.hypot(dy);
    if d < EPSILON || d > da + db + EPSILON || d + EPSILON < (da - db).abs() {
        return Vec::new();
    }

    let along = (da * da - db * db + d * d) / (2.0 * d);
    let height = (da * da - along * along).max(0.0).sqrt();
    let (ux, uy) = (dx / d, dy / d);
    let (px, py) = (a.x + along * ux, a.y + along * uy);

    vec![
        Circle {
            x: px - height * uy,
            y: py + height * ux,
            r,
        },
        Circle {
            x: px + height * uy,
            y: py - height * ux,
            r,
        },
    ]
}

fn fit_to_unit_square(circles: Vec<Circle>) -> Vec<Circle> {
    if circles.is_empty() {
        return circles;
    }

    let min_x = circles.iter().map(|c| c.x - c.r).fold(f64::MAX, f64::min);
    let max_x = circles.iter().map(|c| c.x + c.r).fold(f64::MIN, f64::max);
    let min_y = circles.iter().map(|c| c.y - c.r).fold(f64::MAX, f64::min);
    let max_y = circles.iter().map(|c| c.y + c.r).fold(f64::MIN, f64::max);
    let (cx, cy) = ((min_x + max_x) / 2.0, (min_y + max_y) / 2.0);

    let centered: Vec<Circle> = circles
        .into_iter()
        .map(|c| Circle {
            x: c.x - cx,
            y: c.y - cy,
            r: c.r,
        })
        .collect();

    let extent = centered.iter().map(Circle::extent).fold(0.0, f64::max);
    if extent < EPSILON {
        return centered;
    }

    centered
        .into_iter()
        .map(|c| Circle {
            x: c.x / extent,
            y: c.y / extent,
            r: c.r / extent,
        })
        .collect()
}
