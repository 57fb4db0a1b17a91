//! Unit-carrying numbers.
//!
//! Grounded on spec §3's `Number(rational, numerator_units,
//! denominator_units, as_slash?)`. Nothing in the teacher or the rest of
//! the pack pins a rational/bignum crate for this value, so the
//! magnitude is a plain `f64`; unit vectors are sorted `Vec<String>` so
//! two numbers with the same units in different orders still compare
//! equal after construction (spec invariant: "unit vectors are sorted").

use std::fmt;

use crate::error::{SassError, SassResult};

/// Conversion factor to the canonical unit for each unit family, so
/// e.g. `1in` and `96px` compare/arithmetic correctly.
fn canonical_factor(unit: &str) -> Option<(&'static str, f64)> {
    Some(match unit {
        "px" => ("px", 1.0),
        "in" => ("px", 96.0),
        "pt" => ("px", 96.0 / 72.0),
        "pc" => ("px", 16.0),
        "cm" => ("px", 96.0 / 2.54),
        "mm" => ("px", 96.0 / 25.4),
        "q" => ("px", 96.0 / 101.6),
        "deg" => ("deg", 1.0),
        "grad" => ("deg", 0.9),
        "rad" => ("deg", 180.0 / std::f64::consts::PI),
        "turn" => ("deg", 360.0),
        "s" => ("s", 1.0),
        "ms" => ("s", 0.001),
        "hz" => ("hz", 1.0),
        "khz" => ("hz", 1000.0),
        "dpi" => ("dpi", 1.0),
        "dpcm" => ("dpi", 2.54),
        "dppx" | "x" => ("dpi", 96.0),
        _ => return None,
    })
}

#[derive(Debug, Clone)]
pub struct Number {
    value: f64,
    numerator_units: Vec<String>,
    denominator_units: Vec<String>,
}

impl Number {
    pub fn unitless(value: f64) -> Self {
        Number {
            value,
            numerator_units: Vec::new(),
            denominator_units: Vec::new(),
        }
    }

    pub fn with_unit(value: f64, unit: impl Into<String>) -> Self {
        Number {
            value,
            numerator_units: vec![unit.into()],
            denominator_units: Vec::new(),
        }
    }

    pub fn with_units(value: f64, mut numerator: Vec<String>, mut denominator: Vec<String>) -> Self {
        numerator.sort();
        denominator.sort();
        let mut n = Number {
            value,
            numerator_units: numerator,
            denominator_units: denominator,
        };
        n.simplify();
        n
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn is_unitless(&self) -> bool {
        self.numerator_units.is_empty() && self.denominator_units.is_empty()
    }

    pub fn has_unit(&self, unit: &str) -> bool {
        self.numerator_units.iter().any(|u| u == unit) && self.denominator_units.is_empty()
    }

    pub fn numerator_units(&self) -> &[String] {
        &self.numerator_units
    }

    pub fn denominator_units(&self) -> &[String] {
        &self.denominator_units
    }

    /// Cancels matching units that appear in both the numerator and the
    /// denominator (e.g. `px/px` -> unitless), and sorts what remains.
    fn simplify(&mut self) {
        self.numerator_units.sort();
        self.denominator_units.sort();
        let mut remaining_denom = Vec::with_capacity(self.denominator_units.len());
        for denom_unit in self.denominator_units.drain(..) {
            if let Some(pos) = self.numerator_units.iter().position(|u| u == &denom_unit) {
                self.numerator_units.remove(pos);
            } else {
                remaining_denom.push(denom_unit);
            }
        }
        self.denominator_units = remaining_denom;
    }

    /// The canonical units this number reduces to, e.g. `(px, )` for
    /// `1in`. Units with no known conversion family are left as-is.
    fn canonical_value(&self) -> f64 {
        let mut v = self.value;
        for unit in &self.numerator_units {
            if let Some((_, factor)) = canonical_factor(unit) {
                v *= factor;
            }
        }
        for unit in &self.denominator_units {
            if let Some((_, factor)) = canonical_factor(unit) {
                v /= factor;
            }
        }
        v
    }

    fn canonical_units(&self) -> (Vec<&'static str>, Vec<&'static str>) {
        let canon = |units: &[String]| -> Vec<&'static str> {
            let mut v: Vec<&'static str> = units
                .iter()
                .map(|u| canonical_factor(u).map_or("?", |(c, _)| c))
                .collect();
            v.sort_unstable();
            v
        };
        (canon(&self.numerator_units), canon(&self.denominator_units))
    }

    /// Numbers are "compatible" if they reduce to the same canonical unit
    /// signature (spec: "units must be compatible").
    pub fn is_compatible_with(&self, other: &Number) -> bool {
        if self.is_unitless() || other.is_unitless() {
            return true;
        }
        self.canonical_units() == other.canonical_units()
    }

    fn require_compatible(&self, other: &Number, op: &str) -> SassResult<()> {
        if self.is_compatible_with(other) {
            Ok(())
        } else {
            Err(SassError::script(format!(
                "Incompatible units {} and {} for {}.",
                self.unit_string(),
                other.unit_string(),
                op
            )))
        }
    }

    pub fn unit_string(&self) -> String {
        if self.is_unitless() {
            return String::new();
        }
        let num = self.numerator_units.join("*");
        if self.denominator_units.is_empty() {
            num
        } else {
            format!("{}/{}", num, self.denominator_units.join("*"))
        }
    }

    pub fn add(&self, other: &Number) -> SassResult<Number> {
        self.require_compatible(other, "addition")?;
        if self.is_unitless() && !other.is_unitless() {
            return Ok(Number::with_units(
                self.value + other.value,
                other.numerator_units.clone(),
                other.denominator_units.clone(),
            ));
        }
        let factor = conversion_factor(other, self);
        Ok(Number::with_units(
            self.value + other.value * factor,
            self.numerator_units.clone(),
            self.denominator_units.clone(),
        ))
    }

    pub fn sub(&self, other: &Number) -> SassResult<Number> {
        self.require_compatible(other, "subtraction")?;
        if self.is_unitless() && !other.is_unitless() {
            return Ok(Number::with_units(
                self.value - other.value,
                other.numerator_units.clone(),
                other.denominator_units.clone(),
            ));
        }
        let factor = conversion_factor(other, self);
        Ok(Number::with_units(
            self.value - other.value * factor,
            self.numerator_units.clone(),
            self.denominator_units.clone(),
        ))
    }

    /// Unit multiplication: numerators/denominators concatenate, then
    /// cancel (spec: "unit multiplication on multiplication").
    pub fn mul(&self, other: &Number) -> Number {
        let mut numerator = self.numerator_units.clone();
        numerator.extend(other.numerator_units.clone());
        let mut denominator = self.denominator_units.clone();
        denominator.extend(other.denominator_units.clone());
        Number::with_units(self.value * other.value, numerator, denominator)
    }

    /// Unit division: cancellation on division (spec).
    pub fn div(&self, other: &Number) -> SassResult<Number> {
        if other.value == 0.0 {
            return Err(SassError::script("Division by zero."));
        }
        let mut numerator = self.numerator_units.clone();
        numerator.extend(other.denominator_units.clone());
        let mut denominator = self.denominator_units.clone();
        denominator.extend(other.numerator_units.clone());
        Ok(Number::with_units(
            self.value / other.value,
            numerator,
            denominator,
        ))
    }

    pub fn rem(&self, other: &Number) -> SassResult<Number> {
        self.require_compatible(other, "modulo")?;
        let factor = conversion_factor(other, self);
        let other_in_self_units = other.value * factor;
        Ok(Number::with_units(
            self.value % other_in_self_units,
            self.numerator_units.clone(),
            self.denominator_units.clone(),
        ))
    }

    pub fn neg(&self) -> Number {
        Number::with_units(-self.value, self.numerator_units.clone(), self.denominator_units.clone())
    }

    pub fn compare(&self, other: &Number) -> SassResult<std::cmp::Ordering> {
        self.require_compatible(other, "comparison")?;
        let factor = conversion_factor(other, self);
        self.value
            .partial_cmp(&(other.value * factor))
            .ok_or_else(|| SassError::script("Cannot compare NaN."))
    }
}

/// The scale of one unit of `n` relative to its canonical unit, e.g. `in`
/// is `96.0` relative to canonical `px`. Value-independent, so it is safe
/// to use even when `n.value()` is zero.
fn unit_factor(n: &Number) -> f64 {
    let mut factor = 1.0;
    for unit in &n.numerator_units {
        if let Some((_, f)) = canonical_factor(unit) {
            factor *= f;
        }
    }
    for unit in &n.denominator_units {
        if let Some((_, f)) = canonical_factor(unit) {
            factor /= f;
        }
    }
    factor
}

/// Multiplying `other`'s value by this factor expresses it in `target`'s
/// declared units, assuming the two are unit-compatible.
fn conversion_factor(other: &Number, target: &Number) -> f64 {
    if other.is_unitless() || target.is_unitless() {
        return 1.0;
    }
    unit_factor(other) / unit_factor(target)
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        if !self.is_compatible_with(other) {
            return false;
        }
        (self.canonical_value() - other.canonical_value()).abs() < 1e-11
    }
}

impl std::hash::Hash for Number {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.canonical_value().to_bits().hash(state);
        self.canonical_units().hash(state);
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", format_f64(self.value), self.unit_string())
    }
}

pub fn format_f64(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        let mut s = format!("{:.10}", value);
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancels_matching_units_on_construction() {
        let n = Number::with_units(4.0, vec!["px".into()], vec!["px".into()]);
        assert!(n.is_unitless());
    }

    #[test]
    fn unit_multiplication_then_division_cancels() {
        // ($n * 2px) / 1px == $n * 2 (unitless), per spec invariant #2.
        let n = Number::unitless(3.0);
        let two_px = Number::with_unit(2.0, "px");
        let product = n.mul(&two_px);
        let one_px = Number::with_unit(1.0, "px");
        let result = product.div(&one_px).unwrap();
        assert!(result.is_unitless());
        assert_eq!(result.value(), 6.0);
    }

    #[test]
    fn compatible_units_convert_for_addition() {
        let one_in = Number::with_unit(1.0, "in");
        let ninety_six_px = Number::with_unit(96.0, "px");
        assert_eq!(one_in, ninety_six_px);
        let sum = one_in.add(&Number::with_unit(0.0, "px")).unwrap();
        assert_eq!(sum, Number::with_unit(96.0, "px"));
    }

    #[test]
    fn incompatible_units_reject_addition() {
        let px = Number::with_unit(1.0, "px");
        let s = Number::with_unit(1.0, "s");
        assert!(px.add(&s).is_err());
    }
}
