//! Fixed-order Gauss–Legendre quadrature for arc-length integrals.

/// 8-point Gauss–Legendre abscissae on [-1, 1] (positive half).
const GL8_X: [f64; 4] = [
    0.183_434_642_495_649_8,
    0.525_532_409_916_329_0,
    0.796_666_477_413_626_7,
    0.960_289_856_497_536_3,
];

/// 8-point Gauss–Legendre weights matching [`GL8_X`].
const GL8_W: [f64; 4] = [
    0.362_683_783_378_362_0,
    0.313_706_645_877_887_3,
    0.222_381_034_453_374_5,
    0.101_228_536_290_376_3,
];

/// Integrates `f` over `[a, b]` with one 8-point Gauss–Legendre rule.
fn gauss8<F: Fn(f64) -> f64>(f: &F, a: f64, b: f64) -> f64 {
    let half = (b - a) / 2.0;
    let mid = (a + b) / 2.0;
    let mut sum = 0.0;
    for i in 0..4 {
        let dx = half * GL8_X[i];
        sum += GL8_W[i] * (f(mid - dx) + f(mid + dx));
    }
    sum * half
}

/// Integrates `f` over `[a, b]` by compositing the 8-point rule over a
/// fixed number of panels. Plenty of accuracy for the smooth speed
/// functions of Bézier and elliptical-arc segments.
pub(crate) fn integrate<F: Fn(f64) -> f64>(f: F, a: f64, b: f64) -> f64 {
    const PANELS: usize = 8;
    if a == b {
        return 0.0;
    }
    let step = (b - a) / PANELS as f64;
    let mut total = 0.0;
    for i in 0..PANELS {
        let lo = a + step * i as f64;
        total += gauss8(&f, lo, lo + step);
    }
    total
}

/// Finds `t` in `[0, hi]` such that the arc length from 0 to `t` equals
/// `target`, given the total length over `[0, hi]`. Bisection on the
/// monotone partial-length function.
pub(crate) fn param_at_length<F: Fn(f64) -> f64>(speed: F, hi: f64, target: f64) -> f64 {
    let mut lo = 0.0;
    let mut hi = hi;
    for _ in 0..48 {
        let mid = (lo + hi) / 2.0;
        if integrate(&speed, 0.0, mid) < target {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    (lo + hi) / 2.0
}
