//! Chezy coefficient, mean velocity and discharge for one wetted section.

use std::fmt;

use crate::regime::{ChezyFormula, FlowRegime};

/// Standard gravity, m/s².
pub const GRAVITY: f64 = 9.80665;

/// Largest average depth, in metres, for which the Pavlovsky exponent is used
/// by [`ChezyFormula::DepthBanded`].
pub const PAVLOVSKY_MAX_DEPTH: f64 = 3.0;

/// Formula that produced a Chezy coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoefficientMethod {
    /// `C = h^y / n` with Pavlovsky's exponent.
    Pavlovsky,
    /// `C = h^y / n` with the Pavlovsky–Zheleznyakov exponent.
    PavlovskyZheleznyakov,
    /// `C = h^(1/6) / n`.
    Manning,
    /// Zheleznyakov's closed form.
    Zheleznyakov,
}

impl fmt::Display for CoefficientMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pavlovsky => "pavlovsky",
            Self::PavlovskyZheleznyakov => "pavlovsky_zheleznyakov",
            Self::Manning => "manning",
            Self::Zheleznyakov => "zheleznyakov",
        })
    }
}

/// Pavlovsky exponent `y = 2.5√n − 0.13 − 0.75√h(√n − 0.10)`.
#[must_use]
pub fn pavlovsky_exponent(n: f64, h: f64) -> f64 {
    let sqrt_n = n.sqrt();
    2.5 * sqrt_n - 0.13 - 0.75 * h.sqrt() * (sqrt_n - 0.10)
}

// Terms `1/n − (√g/0.13)(1 − lg h)` and `(√g/0.13)(1/n + √g·lg h)` shared by
// both Zheleznyakov forms.
fn zheleznyakov_terms(n: f64, h: f64) -> (f64, f64) {
    let k = GRAVITY.sqrt() / 0.13;
    let lg = h.log10();
    let a = 1.0 / n - k * (1.0 - lg);
    let b = k * (1.0 / n + GRAVITY.sqrt() * lg);
    (a, b)
}

/// Zheleznyakov coefficient
/// `C = ½(1/n − (√g/0.13)(1 − lg h)) + √(¼(1/n − (√g/0.13)(1 − lg h))² + (√g/0.13)(1/n + √g·lg h))`.
#[must_use]
pub fn zheleznyakov_coefficient(n: f64, h: f64) -> f64 {
    let (a, b) = zheleznyakov_terms(n, h);
    0.5 * a + (0.25 * a * a + b).sqrt()
}

/// Pavlovsky–Zheleznyakov exponent `y` such that `h^y / n` equals the
/// Zheleznyakov coefficient.
#[must_use]
pub fn pavlovsky_zheleznyakov_exponent(n: f64, h: f64) -> f64 {
    let (a, b) = zheleznyakov_terms(n, h);
    let inner = n * a / 2.0 + n * (0.25 * a * a + b).sqrt();
    inner.log10() / h.log10()
}

/// Chezy coefficient for roughness `n` and average depth `h` (metres).
#[must_use]
pub fn chezy_coefficient(n: f64, h: f64, formula: ChezyFormula) -> (f64, CoefficientMethod) {
    match formula {
        ChezyFormula::DepthBanded if h <= PAVLOVSKY_MAX_DEPTH => {
            (h.powf(pavlovsky_exponent(n, h)) / n, CoefficientMethod::Pavlovsky)
        }
        ChezyFormula::DepthBanded => (
            h.powf(pavlovsky_zheleznyakov_exponent(n, h)) / n,
            CoefficientMethod::PavlovskyZheleznyakov,
        ),
        ChezyFormula::Manning => (h.powf(1.0 / 6.0) / n, CoefficientMethod::Manning),
        ChezyFormula::Zheleznyakov => (zheleznyakov_coefficient(n, h), CoefficientMethod::Zheleznyakov),
    }
}

/// Mean velocity for `regime`. `slope` is in per mille.
#[must_use]
pub fn velocity(regime: FlowRegime, chezy: f64, h: f64, slope: f64) -> f64 {
    let i = slope / 1000.0;
    match regime {
        FlowRegime::Water => chezy * (h * i).sqrt(),
        FlowRegime::SedimentFlow => 4.5 * h.powf(0.67) * i.powf(0.17),
        FlowRegime::MudrockFlow => 3.75 * h.powf(0.5) * i.powf(0.17),
    }
}

/// Flow through one wetted section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowCalculation {
    /// Chezy coefficient, m^0.5/s.
    pub chezy: f64,
    /// Mean velocity, m/s.
    pub velocity: f64,
    /// Discharge, m³/s.
    pub discharge: f64,
    /// Formula that produced `chezy`.
    pub method: CoefficientMethod,
}

impl FlowCalculation {
    /// Compute flow for roughness `n`, slope `slope` (‰), average depth `h`
    /// (m) and area `area` (m²).
    ///
    /// The Chezy coefficient is reported for every regime, though only
    /// [`FlowRegime::Water`] uses it for the velocity.
    #[must_use]
    pub fn compute(
        n: f64,
        slope: f64,
        h: f64,
        area: f64,
        regime: FlowRegime,
        formula: ChezyFormula,
    ) -> Self {
        let (chezy, method) = chezy_coefficient(n, h, formula);
        let velocity = velocity(regime, chezy, h, slope);
        Self { chezy, velocity, discharge: area * velocity, method }
    }
}
