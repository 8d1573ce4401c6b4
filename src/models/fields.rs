//! Deserializers for fields that arrive either as native JSON values or as
//! the string forms an urlencoded submission produces. Empty strings count
//! as absent, matching how untouched form inputs are posted.

use std::fmt;

use rust_decimal::Decimal;
use serde::de::{self, Deserializer, Visitor};

pub(crate) fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(LenientInt)
}

pub(crate) fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(LenientDecimal)
}

/// Checkbox semantics: JSON `true`, or the form values `"on"`, `"true"`,
/// `"1"`. Anything else is false.
pub(crate) fn checkbox<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(Checkbox)
}

struct LenientInt;

impl<'de> Visitor<'de> for LenientInt {
    type Value = Option<i32>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an integer or a numeric string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        i32::try_from(v).map(Some).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        i32::try_from(v).map(Some).map_err(E::custom)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        if v.fract() == 0.0 && (f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(&v) {
            Ok(Some(v as i32))
        } else {
            Err(E::custom(format!("{v} is not a whole number")))
        }
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        trimmed.parse().map(Some).map_err(E::custom)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }
}

struct LenientDecimal;

impl<'de> Visitor<'de> for LenientDecimal {
    type Value = Option<Decimal>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a decimal number or a numeric string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Some(Decimal::from(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Some(Decimal::from(v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Decimal::try_from(v).map(Some).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        trimmed.parse().map(Some).map_err(E::custom)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }
}

struct Checkbox;

impl<'de> Visitor<'de> for Checkbox {
    type Value = bool;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a boolean or a checkbox value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(v != 0)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(v != 0)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(matches!(
            v.trim().to_ascii_lowercase().as_str(),
            "on" | "true" | "1"
        ))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(false)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "super::lenient_int")]
        count: Option<i32>,
        #[serde(default, deserialize_with = "super::lenient_decimal")]
        price: Option<Decimal>,
        #[serde(default, deserialize_with = "super::checkbox")]
        flag: bool,
    }

    #[test]
    fn accepts_native_json_types() {
        let probe: Probe =
            serde_json::from_str(r#"{"count": 25, "price": 10.5, "flag": true}"#).unwrap();
        assert_eq!(probe.count, Some(25));
        assert_eq!(probe.price, Some(Decimal::new(105, 1)));
        assert!(probe.flag);
    }

    #[test]
    fn accepts_form_strings() {
        let probe: Probe =
            serde_urlencoded::from_str("count=25&price=10.50&flag=on").unwrap();
        assert_eq!(probe.count, Some(25));
        assert_eq!(probe.price, Some("10.50".parse().unwrap()));
        assert!(probe.flag);
    }

    #[test]
    fn empty_strings_count_as_absent() {
        let probe: Probe = serde_urlencoded::from_str("count=&price=&flag=").unwrap();
        assert_eq!(probe.count, None);
        assert_eq!(probe.price, None);
        assert!(!probe.flag);
    }

    #[test]
    fn nulls_count_as_absent() {
        let probe: Probe =
            serde_json::from_str(r#"{"count": null, "price": null, "flag": null}"#).unwrap();
        assert_eq!(probe.count, None);
        assert_eq!(probe.price, None);
        assert!(!probe.flag);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let probe: Probe = serde_json::from_str("{}").unwrap();
        assert_eq!(probe.count, None);
        assert_eq!(probe.price, None);
        assert!(!probe.flag);
    }

    #[test]
    fn unchecked_checkbox_values_are_false() {
        let probe: Probe = serde_urlencoded::from_str("flag=off").unwrap();
        assert!(!probe.flag);
    }

    #[test]
    fn garbage_numbers_are_rejected() {
        assert!(serde_urlencoded::from_str::<Probe>("count=lots").is_err());
        assert!(serde_json::from_str::<Probe>(r#"{"price": "free"}"#).is_err());
    }
}
