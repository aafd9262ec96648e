//! Real roots of `a·t² + b·t + c = 0`.

const EPS: f64 = 1e-10;

/// Up to two real roots. Only the first `count` slots are meaningful.
#[derive(Clone, Copy, Debug, Default)]
pub struct Roots {
    values: [f64; 2],
    count: usize,
}

impl Roots {
    pub fn as_slice(&self) -> &[f64] {
        &self.values[..self.count]
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    fn push(&mut self, t: f64) {
        if t.is_finite() {
            self.values[self.count] = t;
            self.count += 1;
        }
    }
}

/// Rescaling `t` (e.g. an unnormalized ray direction) multiplies `a` and `b`
/// but leaves the root count alone; tolerances are relative to `b² + |4ac|`.
pub fn solve_quadratic(a: f64, b: f64, c: f64) -> Roots {
    let mut roots = Roots::default();

    // degenerates to b·t + c = 0
    if a == 0.0 {
        if b != 0.0 {
            roots.push(-c / b);
        }
        return roots;
    }

    let d = b * b - 4.0 * a * c;
    if d.abs() <= EPS * (b * b + (4.0 * a * c).abs()) {
        roots.push(-b / (2.0 * a));
    } else if d > 0.0 {
        // q never cancels, so tiny `a` still yields the near root -c/b
        let q = -0.5 * (b + d.sqrt().copysign(b));
        roots.push(q / a);
        roots.push(c / q);
    }
    roots
}
