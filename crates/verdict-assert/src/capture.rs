//! Conversion of judged values into `serde_json::Value`.
//!
//! `Value` has no representation for `NaN` or the infinities; a plain
//! `serde_json::to_value` silently turns them into `null`. Capturing runs the
//! value through a forwarding serializer that notes every non-finite float it
//! passes to `serde_json`, so judgments can tell `f64::INFINITY` from `None`.

use std::cell::RefCell;

use serde::Serialize;
use serde::ser::{self, Serializer};
use serde_json::Value;
use verdict_core::VerdictError;

use crate::equality::canonical_encoding;
use crate::truthy::is_truthy;

/// A judged value in `Value` form plus the non-finite floats it contained.
#[derive(Debug, Clone, PartialEq)]
pub struct Captured {
    value: Value,
    non_finite: Vec<f64>,
}

impl Captured {
    /// Serializes `value`, recording non-finite floats.
    ///
    /// # Errors
    /// Returns [`VerdictError::Serialization`] if the value cannot be serialized.
    pub fn of<T: Serialize + ?Sized>(value: &T) -> verdict_core::Result<Self> {
        let seen = RefCell::new(Vec::new());
        let value = value
            .serialize(Tracking {
                inner: serde_json::value::Serializer,
                seen: &seen,
            })
            .map_err(|e| VerdictError::serialization(e.to_string()))?;
        Ok(Self {
            value,
            non_finite: seen.into_inner(),
        })
    }

    /// The `Value` form. Non-finite floats appear as `null`.
    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }

    /// Non-finite floats met during serialization, in order.
    #[must_use]
    pub fn non_finite(&self) -> &[f64] {
        &self.non_finite
    }

    /// The value itself, when it is a single non-finite float.
    #[must_use]
    pub fn non_finite_scalar(&self) -> Option<f64> {
        match (&self.value, self.non_finite.as_slice()) {
            (Value::Null, [x]) => Some(*x),
            _ => None,
        }
    }

    /// Truthiness, with `NaN` falsy and both infinities truthy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self.non_finite_scalar() {
            Some(x) => !x.is_nan(),
            None => is_truthy(&self.value),
        }
    }

    /// Text for failure messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match self.non_finite_scalar() {
            Some(x) => describe_float(x),
            None => canonical_encoding(&self.value),
        }
    }

    /// Returns the `Value`, refusing values that contained non-finite floats.
    ///
    /// # Errors
    /// Returns [`VerdictError::Serialization`] naming the first non-finite float.
    pub fn into_finite(self) -> verdict_core::Result<Value> {
        match self.non_finite.first() {
            Some(x) => Err(VerdictError::serialization(format!(
                "{} has no structural form",
                describe_float(*x)
            ))),
            None => Ok(self.value),
        }
    }
}

fn describe_float(x: f64) -> String {
    if x.is_nan() {
        "NaN".to_string()
    } else if x > 0.0 {
        "Infinity".to_string()
    } else {
        "-Infinity".to_string()
    }
}

struct Track<'a, T: ?Sized> {
    value: &'a T,
    seen: &'a RefCell<Vec<f64>>,
}

impl<T: Serialize + ?Sized> Serialize for Track<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(Tracking {
            inner: serializer,
            seen: self.seen,
        })
    }
}

struct Tracking<'a, S> {
    inner: S,
    seen: &'a RefCell<Vec<f64>>,
}

impl<S> Tracking<'_, S> {
    fn note(&self, x: f64) {
        if !x.is_finite() {
            self.seen.borrow_mut().push(x);
        }
    }
}

impl<'a, S: Serializer> Serializer for Tracking<'a, S> {
    type Ok = S::Ok;
    type Error = S::Error;
    type SerializeSeq = Tracking<'a, S::SerializeSeq>;
    type SerializeTuple = Tracking<'a, S::SerializeTuple>;
    type SerializeTupleStruct = Tracking<'a, S::SerializeTupleStruct>;
    type SerializeTupleVariant = Tracking<'a, S::SerializeTupleVariant>;
    type SerializeMap = Tracking<'a, S::SerializeMap>;
    type SerializeStruct = Tracking<'a, S::SerializeStruct>;
    type SerializeStructVariant = Tracking<'a, S::SerializeStructVariant>;

    fn serialize_bool(self, v: bool) -> Result<S::Ok, S::Error> {
        self.inner.serialize_bool(v)
    }

    fn serialize_i8(self, v: i8) -> Result<S::Ok, S::Error> {
        self.inner.serialize_i8(v)
    }

    fn serialize_i16(self, v: i16) -> Result<S::Ok, S::Error> {
        self.inner.serialize_i16(v)
    }

    fn serialize_i32(self, v: i32) -> Result<S::Ok, S::Error> {
        self.inner.serialize_i32(v)
    }

    fn serialize_i64(self, v: i64) -> Result<S::Ok, S::Error> {
        self.inner.serialize_i64(v)
    }

    fn serialize_i128(self, v: i128) -> Result<S::Ok, S::Error> {
        self.inner.serialize_i128(v)
    }

    fn serialize_u8(self, v: u8) -> Result<S::Ok, S::Error> {
        self.inner.serialize_u8(v)
    }

    fn serialize_u16(self, v: u16) -> Result<S::Ok, S::Error> {
        self.inner.serialize_u16(v)
    }

    fn serialize_u32(self, v: u32) -> Result<S::Ok, S::Error> {
        self.inner.serialize_u32(v)
    }

    fn serialize_u64(self, v: u64) -> Result<S::Ok, S::Error> {
        self.inner.serialize_u64(v)
    }

    fn serialize_u128(self, v: u128) -> Result<S::Ok, S::Error> {
        self.inner.serialize_u128(v)
    }

    fn serialize_f32(self, v: f32) -> Result<S::Ok, S::Error> {
        self.note(f64::from(v));
        self.inner.serialize_f32(v)
    }

    fn serialize_f64(self, v: f64) -> Result<S::Ok, S::Error> {
        self.note(v);
        self.inner.serialize_f64(v)
    }

    fn serialize_char(self, v: char) -> Result<S::Ok, S::Error> {
        self.inner.serialize_char(v)
    }

    fn serialize_str(self, v: &str) -> Result<S::Ok, S::Error> {
        self.inner.serialize_str(v)
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<S::Ok, S::Error> {
        self.inner.serialize_bytes(v)
    }

    fn serialize_none(self) -> Result<S::Ok, S::Error> {
        self.inner.serialize_none()
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<S::Ok, S::Error> {
        let seen = self.seen;
        self.inner.serialize_some(&Track { value, seen })
    }

    fn serialize_unit(self) -> Result<S::Ok, S::Error> {
        self.inner.serialize_unit()
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<S::Ok, S::Error> {
        self.inner.serialize_unit_struct(name)
    }

    fn serialize_unit_variant(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
    ) -> Result<S::Ok, S::Error> {
        self.inner.serialize_unit_variant(name, variant_index, variant)
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        name: &'static str,
        value: &T,
    ) -> Result<S::Ok, S::Error> {
        let seen = self.seen;
        self.inner.serialize_newtype_struct(name, &Track { value, seen })
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<S::Ok, S::Error> {
        let seen = self.seen;
        self.inner
            .serialize_newtype_variant(name, variant_index, variant, &Track { value, seen })
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq, S::Error> {
        let seen = self.seen;
        Ok(Tracking {
            inner: self.inner.serialize_seq(len)?,
            seen,
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple, S::Error> {
        let seen = self.seen;
        Ok(Tracking {
            inner: self.inner.serialize_tuple(len)?,
            seen,
        })
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct, S::Error> {
        let seen = self.seen;
        Ok(Tracking {
            inner: self.inner.serialize_tuple_struct(name, len)?,
            seen,
        })
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleVariant, S::Error> {
        let seen = self.seen;
        Ok(Tracking {
            inner: self
                .inner
                .serialize_tuple_variant(name, variant_index, variant, len)?,
            seen,
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap, S::Error> {
        let seen = self.seen;
        Ok(Tracking {
            inner: self.inner.serialize_map(len)?,
            seen,
        })
    }

    fn serialize_struct(
        self,
        name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStruct, S::Error> {
        let seen = self.seen;
        Ok(Tracking {
            inner: self.inner.serialize_struct(name, len)?,
            seen,
        })
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStructVariant, S::Error> {
        let seen = self.seen;
        Ok(Tracking {
            inner: self
                .inner
                .serialize_struct_variant(name, variant_index, variant, len)?,
            seen,
        })
    }

    fn is_human_readable(&self) -> bool {
        self.inner.is_human_readable()
    }
}

impl<S: ser::SerializeSeq> ser::SerializeSeq for Tracking<'_, S> {
    type Ok = S::Ok;
    type Error = S::Error;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), S::Error> {
        let seen = self.seen;
        self.inner.serialize_element(&Track { value, seen })
    }

    fn end(self) -> Result<S::Ok, S::Error> {
        self.inner.end()
    }
}

impl<S: ser::SerializeTuple> ser::SerializeTuple for Tracking<'_, S> {
    type Ok = S::Ok;
    type Error = S::Error;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), S::Error> {
        let seen = self.seen;
        self.inner.serialize_element(&Track { value, seen })
    }

    fn end(self) -> Result<S::Ok, S::Error> {
        self.inner.end()
    }
}

impl<S: ser::SerializeTupleStruct> ser::SerializeTupleStruct for Tracking<'_, S> {
    type Ok = S::Ok;
    type Error = S::Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), S::Error> {
        let seen = self.seen;
        self.inner.serialize_field(&Track { value, seen })
    }

    fn end(self) -> Result<S::Ok, S::Error> {
        self.inner.end()
    }
}

impl<S: ser::SerializeTupleVariant> ser::SerializeTupleVariant for Tracking<'_, S> {
    type Ok = S::Ok;
    type Error = S::Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), S::Error> {
        let seen = self.seen;
        self.inner.serialize_field(&Track { value, seen })
    }

    fn end(self) -> Result<S::Ok, S::Error> {
        self.inner.end()
    }
}

impl<S: ser::SerializeMap> ser::SerializeMap for Tracking<'_, S> {
    type Ok = S::Ok;
    type Error = S::Error;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<(), S::Error> {
        let seen = self.seen;
        self.inner.serialize_key(&Track { value: key, seen })
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), S::Error> {
        let seen = self.seen;
        self.inner.serialize_value(&Track { value, seen })
    }

    fn end(self) -> Result<S::Ok, S::Error> {
        self.inner.end()
    }
}

impl<S: ser::SerializeStruct> ser::SerializeStruct for Tracking<'_, S> {
    type Ok = S::Ok;
    type Error = S::Error;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), S::Error> {
        let seen = self.seen;
        self.inner.serialize_field(key, &Track { value, seen })
    }

    fn skip_field(&mut self, key: &'static str) -> Result<(), S::Error> {
        self.inner.skip_field(key)
    }

    fn end(self) -> Result<S::Ok, S::Error> {
        self.inner.end()
    }
}

impl<S: ser::SerializeStructVariant> ser::SerializeStructVariant for Tracking<'_, S> {
    type Ok = S::Ok;
    type Error = S::Error;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), S::Error> {
        let seen = self.seen;
        self.inner.serialize_field(key, &Track { value, seen })
    }

    fn skip_field(&mut self, key: &'static str) -> Result<(), S::Error> {
        self.inner.skip_field(key)
    }

    fn end(self) -> Result<S::Ok, S::Error> {
        self.inner.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    #[test]
    fn test_finite_values_pass_through() {
        let captured = Captured::of(&vec![1.5, 2.0]).unwrap();
        assert_eq!(captured.value(), &json!([1.5, 2.0]));
        assert!(captured.non_finite().is_empty());
        assert_eq!(captured.non_finite_scalar(), None);
    }

    #[test]
    fn test_scalar_infinity_is_recorded() {
        let captured = Captured::of(&f64::INFINITY).unwrap();
        assert_eq!(captured.value(), &Value::Null);
        assert_eq!(captured.non_finite_scalar(), Some(f64::INFINITY));
        assert!(captured.is_truthy());
        assert_eq!(captured.describe(), "Infinity");
    }

    #[test]
    fn test_nan_is_falsy() {
        let captured = Captured::of(&f32::NAN).unwrap();
        assert!(!captured.is_truthy());
        assert_eq!(captured.describe(), "NaN");
    }

    #[test]
    fn test_none_is_not_mistaken_for_a_float() {
        let captured = Captured::of(&None::<f64>).unwrap();
        assert_eq!(captured.non_finite_scalar(), None);
        assert!(!captured.is_truthy());
        assert_eq!(captured.describe(), "null");
    }

    #[test]
    fn test_nested_non_finite_floats_are_found() {
        #[derive(Serialize)]
        struct Reading {
            label: &'static str,
            samples: Vec<f64>,
            peak: Option<f64>,
        }
        let mut by_name = BTreeMap::new();
        by_name.insert(
            "sensor",
            Reading {
                label: "a",
                samples: vec![1.0, f64::NEG_INFINITY],
                peak: Some(f64::NAN),
            },
        );
        let captured = Captured::of(&by_name).unwrap();
        assert_eq!(captured.non_finite().len(), 2);
        assert_eq!(captured.non_finite()[0], f64::NEG_INFINITY);
        assert!(captured.non_finite()[1].is_nan());
        // Containers stay truthy whatever they hold.
        assert!(captured.is_truthy());
    }

    #[test]
    fn test_into_finite_refuses_non_finite() {
        let err = Captured::of(&(1, f64::INFINITY))
            .unwrap()
            .into_finite()
            .unwrap_err();
        assert!(matches!(err, VerdictError::Serialization(_)));
        assert!(err.to_string().contains("Infinity"));
        assert_eq!(
            Captured::of(&(1, 2.5)).unwrap().into_finite().unwrap(),
            json!([1, 2.5])
        );
    }
}
