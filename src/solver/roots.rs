//! Exact and numeric root finding for univariate polynomials
//!
//! Strategy: approximate the coefficients as rationals, scale to a
//! primitive integer polynomial, peel off rational roots by synthetic
//! division, then solve a remaining quadratic exactly. An irreducible
//! remainder of degree >= 3 (or irrational coefficients) falls back to
//! numeric isolation over the Cauchy bound.

use crate::error::QuizError;
use crate::poly::Polynomial;

/// Tolerance for treating an evaluated candidate as an exact root
const ROOT_TOLERANCE: f64 = 1e-9;

/// Denominator cap for rational approximation of coefficients. Kept small
/// so that genuinely irrational values fail the tolerance check instead of
/// being absorbed by a huge continued-fraction convergent.
const MAX_DENOMINATOR: i128 = 10_000;

/// Trial-division bound for the divisor and square-free scans. Huge
/// constant terms stop scanning here and fall through to the exact
/// quadratic formula or the numeric path instead of hanging.
const FACTOR_SCAN_LIMIT: i128 = 1_000_000;

/// One root of a polynomial, with both a rendering and (when real) a
/// numeric value usable for ordering
#[derive(Debug, Clone, PartialEq)]
pub struct Root {
    /// Exact (`"sqrt(2)"`, `"3/2"`) or approximate (`"0.834244"`) text
    pub text: String,
    /// Numeric value; `None` for non-real roots
    pub value: Option<f64>,
    /// Whether `text` is exact rather than a numeric approximation
    pub exact: bool,
}

impl Root {
    fn rational(num: i128, den: i128) -> Self {
        Root {
            text: render_rational(num, den),
            value: Some(num as f64 / den as f64),
            exact: true,
        }
    }

    fn approx(value: f64) -> Self {
        Root {
            text: render_approx(value),
            value: Some(value),
            exact: false,
        }
    }
}

// =============================================================================
// INTEGER / RATIONAL HELPERS
// =============================================================================

pub(crate) fn gcd(a: i128, b: i128) -> i128 {
    let (mut a, mut b) = (a.abs(), b.abs());
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// Approximate a float as a reduced fraction via continued fractions.
/// Returns None when no small-denominator fraction is close enough.
pub(crate) fn to_rational(x: f64) -> Option<(i128, i128)> {
    if !x.is_finite() {
        return None;
    }
    let negative = x < 0.0;
    let target = x.abs();

    let (mut num, mut den): (i128, i128) = (target.floor() as i128, 1);
    let (mut prev_num, mut prev_den): (i128, i128) = (1, 0);
    let mut frac = target - target.floor();

    for _ in 0..40 {
        let approx = num as f64 / den as f64;
        if (approx - target).abs() <= 1e-9 * target.max(1.0) {
            break;
        }
        if frac.abs() < 1e-12 {
            break;
        }
        let inv = 1.0 / frac;
        let whole = inv.floor();
        frac = inv - whole;

        let next_num = (whole as i128).checked_mul(num)?.checked_add(prev_num)?;
        let next_den = (whole as i128).checked_mul(den)?.checked_add(prev_den)?;
        if next_den > MAX_DENOMINATOR {
            break;
        }
        prev_num = num;
        prev_den = den;
        num = next_num;
        den = next_den;
    }

    let approx = num as f64 / den as f64;
    if (approx - x.abs()).abs() > 1e-9 * x.abs().max(1.0) {
        return None;
    }
    let g = gcd(num, den).max(1);
    Some((if negative { -num / g } else { num / g }, den / g))
}

/// Ascending integer coefficients of a primitive scaled polynomial,
/// or None when some coefficient is not (close to) rational
fn integer_coeffs(p: &Polynomial) -> Option<Vec<i128>> {
    let desc = p.all_coeffs();
    let mut fractions = Vec::with_capacity(desc.len());
    for &c in desc.iter().rev() {
        fractions.push(to_rational(c)?);
    }

    // Scale by the LCM of the denominators
    let mut lcm: i128 = 1;
    for &(_, d) in &fractions {
        lcm = lcm.checked_mul(d / gcd(lcm, d))?;
    }
    let mut ints = Vec::with_capacity(fractions.len());
    for (n, d) in fractions {
        ints.push(n.checked_mul(lcm / d)?);
    }
    Some(ints)
}

/// Exact evaluation of sum a_k * p^k * q^(n-k); None on overflow
fn eval_rational(coeffs: &[i128], p: i128, q: i128) -> Option<i128> {
    let n = coeffs.len() - 1;
    let mut acc: i128 = 0;
    for (k, &a) in coeffs.iter().enumerate() {
        let mut term = a;
        for _ in 0..k {
            term = term.checked_mul(p)?;
        }
        for _ in 0..(n - k) {
            term = term.checked_mul(q)?;
        }
        acc = acc.checked_add(term)?;
    }
    Some(acc)
}

/// Positive divisors of |n| (n != 0), unsorted; the scan is bounded by
/// `FACTOR_SCAN_LIMIT`, so divisors between the limit and n/limit are
/// missed for very large n
fn divisors(n: i128) -> Vec<i128> {
    let n = n.abs();
    let mut out = Vec::new();
    let mut d = 1;
    while d * d <= n && d <= FACTOR_SCAN_LIMIT {
        if n % d == 0 {
            out.push(d);
            if d != n / d {
                out.push(n / d);
            }
        }
        d += 1;
    }
    out
}

/// Synthetic division of an integer polynomial (ascending coefficients)
/// by (q*x - p) where p/q is a known root. Gauss's lemma guarantees an
/// integer quotient for a primitive divisor; overflow yields None.
fn deflate(coeffs: &[i128], p: i128, q: i128) -> Option<Vec<i128>> {
    // Long division from the top: b_{n-1} = a_n / q,
    // b_{k-1} = (a_k + p * b_k) / q
    let n = coeffs.len() - 1;
    let mut quotient = vec![0i128; n];
    let mut carry = coeffs[n];
    for k in (1..=n).rev() {
        if carry % q != 0 {
            return None;
        }
        quotient[k - 1] = carry / q;
        carry = coeffs[k - 1].checked_add(p.checked_mul(quotient[k - 1])?)?;
    }
    // Remainder must vanish for a true root
    if carry != 0 {
        return None;
    }
    Some(quotient)
}

fn isqrt(n: i128) -> i128 {
    if n < 2 {
        return n.max(0);
    }
    let mut x = (n as f64).sqrt() as i128;
    while x * x > n {
        x -= 1;
    }
    while (x + 1) * (x + 1) <= n {
        x += 1;
    }
    x
}

/// Split n > 0 into s^2 * m (trial division). m is square-free up to
/// `FACTOR_SCAN_LIMIT`; either way s^2 * m == n holds, so the rendering
/// stays exact even when the scan stops early.
fn square_free_split(n: i128) -> (i128, i128) {
    let mut s: i128 = 1;
    let mut m = n;
    let mut d: i128 = 2;
    while d * d <= m && d <= FACTOR_SCAN_LIMIT {
        while m % (d * d) == 0 {
            m /= d * d;
            s *= d;
        }
        d += 1;
    }
    (s, m)
}

// =============================================================================
// RENDERING
// =============================================================================

fn render_rational(num: i128, den: i128) -> String {
    if den == 1 {
        format!("{}", num)
    } else {
        format!("{}/{}", num, den)
    }
}

/// Round to 10 decimals and drop the trailing zeros
fn render_approx(value: f64) -> String {
    let rounded = (value * 1e10).round() / 1e10;
    if rounded.fract() == 0.0 && rounded.abs() < 1e10 {
        format!("{:.1}", rounded)
    } else {
        format!("{}", rounded)
    }
}

/// Render (p + sign*s*sqrt(m)) / q with minimal noise
fn render_surd(p: i128, s: i128, m: i128, q: i128, positive: bool) -> String {
    let radical = if s == 1 {
        format!("sqrt({})", m)
    } else {
        format!("{}*sqrt({})", s, m)
    };
    let numerator = if p == 0 {
        if positive {
            radical
        } else {
            format!("-{}", radical)
        }
    } else if positive {
        format!("{} + {}", p, radical)
    } else {
        format!("{} - {}", p, radical)
    };
    if q == 1 {
        numerator
    } else if p == 0 {
        format!("{}/{}", numerator, q)
    } else {
        format!("({})/{}", numerator, q)
    }
}

/// Render (p + sign*s*sqrt(m)*i) / q for a complex-conjugate pair
fn render_complex(p: i128, s: i128, m: i128, q: i128, positive: bool) -> String {
    let imag = match (s, m) {
        (s, 1) if s == 1 => "i".to_string(),
        (s, 1) => format!("{}*i", s),
        (1, m) => format!("sqrt({})*i", m),
        (s, m) => format!("{}*sqrt({})*i", s, m),
    };
    let numerator = if p == 0 {
        if positive {
            imag
        } else {
            format!("-{}", imag)
        }
    } else if positive {
        format!("{} + {}", p, imag)
    } else {
        format!("{} - {}", p, imag)
    };
    if q == 1 {
        numerator
    } else if p == 0 {
        format!("{}/{}", numerator, q)
    } else {
        format!("({})/{}", numerator, q)
    }
}

// =============================================================================
// QUADRATIC FORMULA
// =============================================================================

/// Exact roots of a*x^2 + b*x + c with integer coefficients.
/// A discriminant that overflows i128 falls through to the numeric path.
fn quadratic_roots(a: i128, b: i128, c: i128) -> Vec<Root> {
    let disc = match b.checked_mul(b).and_then(|bb| {
        a.checked_mul(c)
            .and_then(|ac| ac.checked_mul(4))
            .and_then(|ac4| bb.checked_sub(ac4))
    }) {
        Some(disc) => disc,
        None => return quadratic_approx(a as f64, b as f64, c as f64),
    };

    if disc >= 0 {
        let sq = isqrt(disc);
        if sq * sq == disc {
            // Rational roots
            let den = 2 * a;
            let mut out = Vec::new();
            for numerator in [-b - sq, -b + sq] {
                let g = gcd(numerator, den).max(1);
                let (mut n, mut d) = (numerator / g, den / g);
                if d < 0 {
                    n = -n;
                    d = -d;
                }
                out.push(Root::rational(n, d));
            }
            out.dedup();
            return out;
        }

        // Irrational real pair: (-b ± s*sqrt(m)) / 2a
        let (s, m) = square_free_split(disc);
        let g = gcd(gcd(b, s), 2 * a).max(1);
        let (mut p, mut sr, mut q) = (-b / g, s / g, 2 * a / g);
        if q < 0 {
            p = -p;
            sr = -sr;
            q = -q;
        }
        let sign_flip = sr < 0;
        let sr = sr.abs();
        let sqrt_disc = (disc as f64).sqrt();
        let lo = (-b as f64 - sqrt_disc) / (2.0 * a as f64);
        let hi = (-b as f64 + sqrt_disc) / (2.0 * a as f64);
        return vec![
            Root {
                text: render_surd(p, sr, m, q, sign_flip),
                value: Some(lo.min(hi)),
                exact: true,
            },
            Root {
                text: render_surd(p, sr, m, q, !sign_flip),
                value: Some(lo.max(hi)),
                exact: true,
            },
        ];
    }

    // Complex-conjugate pair
    let (s, m) = square_free_split(-disc);
    let g = gcd(gcd(b, s), 2 * a).max(1);
    let (mut p, mut sr, mut q) = (-b / g, s / g, 2 * a / g);
    if q < 0 {
        p = -p;
        sr = -sr;
        q = -q;
    }
    let sr = sr.abs();
    vec![
        Root {
            text: render_complex(p, sr, m, q, false),
            value: None,
            exact: true,
        },
        Root {
            text: render_complex(p, sr, m, q, true),
            value: None,
            exact: true,
        },
    ]
}

// =============================================================================
// DECOMPOSITION
// =============================================================================

/// Rational-root decomposition of a polynomial
pub struct Decomposition {
    /// Rational roots (num, den) with multiplicity, reduced, den > 0
    pub rational_roots: Vec<(i128, i128)>,
    /// Integer coefficients of the unfactored remainder, ascending;
    /// None when the coefficients were not rational to begin with
    pub remainder: Option<Vec<i128>>,
}

/// Peel rational roots off `p` by trial over the divisors of the constant
/// and leading coefficients, deflating after each hit
pub fn decompose(p: &Polynomial) -> Decomposition {
    let Some(mut coeffs) = integer_coeffs(p) else {
        return Decomposition {
            rational_roots: Vec::new(),
            remainder: None,
        };
    };

    let mut roots = Vec::new();

    // Roots at zero: factor out x while the constant term vanishes
    while coeffs.len() > 1 && coeffs[0] == 0 {
        roots.push((0i128, 1i128));
        coeffs.remove(0);
    }

    'outer: while coeffs.len() > 1 {
        let constant = coeffs[0];
        let leading = coeffs[coeffs.len() - 1];
        debug_assert!(constant != 0);

        for q in divisors(leading) {
            for pp in divisors(constant) {
                for num in [pp, -pp] {
                    if gcd(num, q) != 1 {
                        continue;
                    }
                    let is_root = match eval_rational(&coeffs, num, q) {
                        Some(v) => v == 0,
                        // Overflow: decide by numeric evaluation
                        None => {
                            let x = num as f64 / q as f64;
                            horner(&coeffs, x).abs() < ROOT_TOLERANCE
                        }
                    };
                    if is_root {
                        if let Some(quotient) = deflate(&coeffs, num, q) {
                            roots.push((num, q));
                            coeffs = quotient;
                            continue 'outer;
                        }
                    }
                }
            }
        }
        break;
    }

    Decomposition {
        rational_roots: roots,
        remainder: Some(coeffs),
    }
}

fn horner(coeffs: &[i128], x: f64) -> f64 {
    let mut acc = 0.0;
    for &c in coeffs.iter().rev() {
        acc = acc * x + c as f64;
    }
    acc
}

// =============================================================================
// PUBLIC SOLVERS
// =============================================================================

/// All roots, real and complex, in the manner of an exact general solve.
/// Non-real roots of an irreducible remainder of degree >= 3 are not
/// reported; its real roots come back as numeric approximations.
///
/// Constants (the zero polynomial included) have no isolated roots and
/// yield an empty list; the dispatch layer renders the zero polynomial's
/// full real-line solution set itself.
pub fn solve_all(p: &Polynomial) -> Result<Vec<Root>, QuizError> {
    if p.is_constant() {
        return Ok(Vec::new());
    }

    let decomposition = decompose(p);
    let mut roots: Vec<Root> = decomposition
        .rational_roots
        .iter()
        .map(|&(n, d)| Root::rational(n, d))
        .collect();

    match decomposition.remainder {
        Some(rem) if rem.len() == 3 => {
            roots.extend(quadratic_roots(rem[2], rem[1], rem[0]));
        }
        Some(rem) if rem.len() > 3 => {
            let rem_f: Vec<f64> = rem.iter().map(|&c| c as f64).collect();
            roots.extend(isolate_real(&rem_f).into_iter().map(Root::approx));
        }
        Some(_) => {}
        None => {
            // Irrational coefficients: fully numeric treatment
            let asc: Vec<f64> = p.all_coeffs().into_iter().rev().collect();
            if asc.len() == 3 {
                roots.extend(quadratic_approx(asc[2], asc[1], asc[0]));
            } else {
                roots.extend(isolate_real(&asc).into_iter().map(Root::approx));
            }
        }
    }

    sort_roots(&mut roots);
    Ok(roots)
}

/// Real roots only, sorted ascending (the real solution set)
pub fn real_roots(p: &Polynomial) -> Result<Vec<Root>, QuizError> {
    let mut roots = solve_all(p)?;
    roots.retain(|r| r.value.is_some());
    Ok(roots)
}

/// Numeric quadratic solve for irrational coefficients
fn quadratic_approx(a: f64, b: f64, c: f64) -> Vec<Root> {
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return Vec::new();
    }
    let sq = disc.sqrt();
    let mut out = vec![
        Root::approx((-b - sq) / (2.0 * a)),
        Root::approx((-b + sq) / (2.0 * a)),
    ];
    out.dedup();
    out
}

/// Real-root isolation over the Cauchy bound: sign-change scan plus
/// bisection. Ascending coefficients, leading entry nonzero.
pub fn isolate_real(coeffs: &[f64]) -> Vec<f64> {
    let n = coeffs.len() - 1;
    let leading = coeffs[n];
    let bound = 1.0
        + coeffs[..n]
            .iter()
            .fold(0.0f64, |m, c| m.max((c / leading).abs()));

    let eval = |x: f64| {
        let mut acc = 0.0;
        for &c in coeffs.iter().rev() {
            acc = acc * x + c;
        }
        acc
    };

    const STEPS: usize = 4096;
    let width = 2.0 * bound / STEPS as f64;
    let mut out: Vec<f64> = Vec::new();
    let mut push = |x: f64| {
        if !out.iter().any(|&r| (r - x).abs() < 1e-8) {
            out.push(x);
        }
    };

    let mut prev_x = -bound;
    let mut prev_y = eval(prev_x);
    for step in 1..=STEPS {
        let x = -bound + width * step as f64;
        let y = eval(x);
        if prev_y.abs() < 1e-12 {
            push(prev_x);
        } else if prev_y * y < 0.0 {
            // Bisection
            let (mut lo, mut hi) = (prev_x, x);
            let (mut flo, _) = (prev_y, y);
            for _ in 0..100 {
                let mid = 0.5 * (lo + hi);
                let fmid = eval(mid);
                if fmid == 0.0 {
                    lo = mid;
                    hi = mid;
                    break;
                }
                if flo * fmid < 0.0 {
                    hi = mid;
                } else {
                    lo = mid;
                    flo = fmid;
                }
            }
            push(0.5 * (lo + hi));
        }
        prev_x = x;
        prev_y = y;
    }
    if prev_y.abs() < 1e-12 {
        push(prev_x);
    }
    out
}

/// Order real roots ascending, non-real roots after, stable by text
fn sort_roots(roots: &mut [Root]) {
    roots.sort_by(|a, b| match (a.value, b.value) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(std::cmp::Ordering::Equal),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.text.cmp(&b.text),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poly(text: &str) -> Polynomial {
        Polynomial::from_text(text).unwrap()
    }

    #[test]
    fn test_rational_approximation() {
        assert_eq!(to_rational(0.5), Some((1, 2)));
        assert_eq!(to_rational(-2.0), Some((-2, 1)));
        assert_eq!(to_rational(0.75), Some((3, 4)));
        // No small-denominator fraction is within tolerance of sqrt(2) or pi
        assert!(to_rational(std::f64::consts::SQRT_2).is_none());
        assert!(to_rational(std::f64::consts::PI).is_none());
    }

    #[test]
    fn test_real_roots_of_difference_of_squares() {
        let roots = real_roots(&poly("x^2-4")).unwrap();
        let texts: Vec<&str> = roots.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["-2", "2"]);
    }

    #[test]
    fn test_constant_has_no_roots() {
        let roots = real_roots(&poly("5")).unwrap();
        assert!(roots.is_empty());
    }

    #[test]
    fn test_zero_polynomial_has_no_isolated_roots() {
        let roots = solve_all(&poly("0")).unwrap();
        assert!(roots.is_empty());
    }

    #[test]
    fn test_rational_root() {
        // 2x - 3 -> 3/2
        let roots = real_roots(&poly("2x-3")).unwrap();
        assert_eq!(roots[0].text, "3/2");
    }

    #[test]
    fn test_surd_roots() {
        // x^2 - 2 -> ±sqrt(2)
        let roots = real_roots(&poly("x^2-2")).unwrap();
        assert_eq!(roots[0].text, "-sqrt(2)");
        assert_eq!(roots[1].text, "sqrt(2)");
    }

    #[test]
    fn test_golden_ratio_roots() {
        // x^2 + x - 1 -> (-1 ± sqrt(5))/2
        let roots = real_roots(&poly("x^2+x-1")).unwrap();
        assert_eq!(roots[0].text, "(-1 - sqrt(5))/2");
        assert_eq!(roots[1].text, "(-1 + sqrt(5))/2");
    }

    #[test]
    fn test_complex_pair() {
        let roots = solve_all(&poly("x^2+1")).unwrap();
        assert_eq!(roots.len(), 2);
        assert!(roots.iter().all(|r| r.value.is_none()));
        assert!(roots.iter().any(|r| r.text == "i"));
        assert!(roots.iter().any(|r| r.text == "-i"));
    }

    #[test]
    fn test_complex_pair_not_in_real_set() {
        let roots = real_roots(&poly("x^2+1")).unwrap();
        assert!(roots.is_empty());
    }

    #[test]
    fn test_cubic_mixed_roots() {
        // x^3 - x = x(x-1)(x+1)
        let roots = real_roots(&poly("x^3-x")).unwrap();
        let texts: Vec<&str> = roots.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["-1", "0", "1"]);
    }

    #[test]
    fn test_quintic_rational_root() {
        // x^5 - 1 has the single real root 1
        let roots = real_roots(&poly("x^5-1")).unwrap();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].text, "1");
    }

    #[test]
    fn test_irreducible_cubic_numeric_fallback() {
        // x^3 + x - 1 is irreducible over Q, single real root ~0.6823
        let roots = real_roots(&poly("x^3+x-1")).unwrap();
        assert_eq!(roots.len(), 1);
        assert!(!roots[0].exact);
        let v = roots[0].value.unwrap();
        assert!((v - 0.6823278).abs() < 1e-5);
    }

    #[test]
    fn test_multiplicity() {
        // (x-1)^2 = x^2 - 2x + 1 -> root 1 twice
        let roots = solve_all(&poly("x^2-2x+1")).unwrap();
        assert_eq!(roots.len(), 2);
        assert!(roots.iter().all(|r| r.text == "1"));
    }

    #[test]
    fn test_fractional_coefficients() {
        // x/2 - 1 -> root 2
        let roots = real_roots(&poly("x/2-1")).unwrap();
        assert_eq!(roots[0].text, "2");
    }

    #[test]
    fn test_overflowing_discriminant_falls_back_numeric() {
        // b^2 does not fit i128; the quadratic formula must hand over
        // to the numeric path instead of overflowing
        let roots = real_roots(&poly("x^2 + 20000000000000000000x + 3")).unwrap();
        assert_eq!(roots.len(), 2);
        assert!(roots.iter().all(|r| !r.exact));
        assert!((roots[0].value.unwrap() + 2.0e19).abs() < 1e6);
    }

    #[test]
    fn test_huge_constant_term_terminates() {
        // x^2 - 2^100 = (x - 2^50)*(x + 2^50); the bounded divisor scan
        // finds nothing, the quadratic formula still solves it exactly
        let roots = real_roots(&poly("x^2 - 1267650600228229401496703205376")).unwrap();
        let texts: Vec<&str> = roots.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["-1125899906842624", "1125899906842624"]);
    }

    #[test]
    fn test_isolate_real_on_quadratic() {
        // x^2 - 4 ascending: [-4, 0, 1]
        let found = isolate_real(&[-4.0, 0.0, 1.0]);
        assert_eq!(found.len(), 2);
        assert!((found[0] + 2.0).abs() < 1e-6);
        assert!((found[1] - 2.0).abs() < 1e-6);
    }
}
