use super::Value;

// Largest magnitude an f64 can hold while still mapping onto the i64 range.
const I64_UPPER_AS_F64: f64 = 9_223_372_036_854_775_808.0;

impl Value {
    ///
    /// Strict key equality used by the join matcher.
    ///
    /// No cross-kind coercion: `Text("1")` never equals `Int(1)`.
    /// Int and Float are both numbers, so `Int(1)` equals `Float(1.0)`.
    /// `Null` equals `Null`; NaN equals nothing.
    /// Lists and maps never match, join keys must be scalar.
    ///
    #[must_use]
    pub fn strict_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            #[expect(clippy::float_cmp)]
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Int(i), Self::Float(f)) | (Self::Float(f), Self::Int(i)) => int_eq_float(*i, *f),
            (Self::Text(a), Self::Text(b)) => a == b,
            _ => false,
        }
    }
}

#[expect(clippy::cast_possible_truncation)]
fn int_eq_float(i: i64, f: f64) -> bool {
    if !f.is_finite() || f.fract() != 0.0 {
        return false;
    }
    if f < -I64_UPPER_AS_F64 || f >= I64_UPPER_AS_F64 {
        return false;
    }

    f as i64 == i
}
