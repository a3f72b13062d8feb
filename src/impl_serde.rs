#![cfg_attr(docsrs, doc(cfg(feature = "serde")))]

//! Provides [`serde::Serialize`] support for the parsed value tree.
//!
//! Date/times serialize as their TOML string form. Big integers serialize as
//! `i64` or `u64` when they fit and as decimal strings otherwise.

use num_bigint::BigInt;
use serde::ser::{SerializeMap, SerializeSeq};

use crate::{Array, Datetime, Table, Value};

fn serialize_big_integer<S>(value: &BigInt, ser: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    if let Ok(n) = i64::try_from(value) {
        ser.serialize_i64(n)
    } else if let Ok(n) = u64::try_from(value) {
        ser.serialize_u64(n)
    } else {
        ser.collect_str(value)
    }
}

impl serde::Serialize for Value {
    fn serialize<S>(&self, ser: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Value::String(s) => ser.serialize_str(s),
            Value::Integer(i) => ser.serialize_i64(*i),
            Value::BigInteger(b) => serialize_big_integer(b, ser),
            Value::Float(f) => ser.serialize_f64(*f),
            Value::Boolean(b) => ser.serialize_bool(*b),
            Value::Datetime(d) => d.serialize(ser),
            Value::Array(arr) => arr.serialize(ser),
            Value::Table(tab) => tab.serialize(ser),
        }
    }
}

impl serde::Serialize for Array {
    fn serialize<S>(&self, ser: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut seq = ser.serialize_seq(Some(self.len()))?;
        for ele in self {
            seq.serialize_element(ele)?;
        }
        seq.end()
    }
}

impl serde::Serialize for Table {
    fn serialize<S>(&self, ser: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = ser.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl serde::Serialize for Datetime {
    fn serialize<S>(&self, ser: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        ser.collect_str(self)
    }
}
