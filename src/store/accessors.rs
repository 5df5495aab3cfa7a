//! Typed reads over the flat store.
//!
//! Absent paths yield `None` (or the caller's default); a present value of the wrong
//! variant is a `TypeMismatch`.

use rust_decimal::Decimal;

use super::{Store, Value};
use crate::errors::{HoconError, HoconResult};

/// Conversion from a stored value to a concrete Rust type
pub trait FromValue: Sized {
    /// Name used in type mismatch errors
    const EXPECTED: &'static str;

    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for String {
    const EXPECTED: &'static str = "string";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl FromValue for i64 {
    const EXPECTED: &'static str = "int";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_int()
    }
}

impl FromValue for Decimal {
    const EXPECTED: &'static str = "decimal";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_decimal()
    }
}

impl FromValue for bool {
    const EXPECTED: &'static str = "bool";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl FromValue for Value {
    const EXPECTED: &'static str = "value";

    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl Store {
    /// Whether any entry (value or node) exists at `path`
    pub fn has_path(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Whether a non-node value exists at `path`
    pub fn has_value(&self, path: &str) -> bool {
        self.entries.get(path).is_some_and(|v| !v.is_node())
    }

    pub fn get_value(&self, path: &str) -> Option<&Value> {
        self.entries.get(path)
    }

    /// Typed read; `Ok(None)` when the path is absent
    pub fn get<T: FromValue>(&self, path: &str) -> HoconResult<Option<T>> {
        match self.entries.get(path) {
            None => Ok(None),
            Some(value) => T::from_value(value)
                .map(Some)
                .ok_or_else(|| HoconError::type_mismatch(path, T::EXPECTED, value.type_name())),
        }
    }

    /// Typed read with a default for absent paths
    pub fn get_or<T: FromValue>(&self, path: &str, default: T) -> HoconResult<T> {
        Ok(self.get(path)?.unwrap_or(default))
    }

    pub fn get_string(&self, path: &str) -> HoconResult<Option<String>> {
        self.get(path)
    }

    pub fn get_int(&self, path: &str) -> HoconResult<Option<i64>> {
        self.get(path)
    }

    pub fn get_decimal(&self, path: &str) -> HoconResult<Option<Decimal>> {
        self.get(path)
    }

    pub fn get_bool(&self, path: &str) -> HoconResult<Option<bool>> {
        self.get(path)
    }

    /// Typed read of an array; every element must convert
    pub fn get_list<T: FromValue>(&self, path: &str) -> HoconResult<Option<Vec<T>>> {
        let Some(value) = self.entries.get(path) else {
            return Ok(None);
        };
        let items = value
            .as_array()
            .ok_or_else(|| HoconError::type_mismatch(path, "array", value.type_name()))?;

        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                T::from_value(item).ok_or_else(|| {
                    HoconError::type_mismatch(format!("{}[{}]", path, i), T::EXPECTED, item.type_name())
                })
            })
            .collect::<HoconResult<Vec<T>>>()
            .map(Some)
    }

    pub fn get_string_list(&self, path: &str) -> HoconResult<Option<Vec<String>>> {
        self.get_list(path)
    }

    pub fn get_int_list(&self, path: &str) -> HoconResult<Option<Vec<i64>>> {
        self.get_list(path)
    }

    pub fn get_decimal_list(&self, path: &str) -> HoconResult<Option<Vec<Decimal>>> {
        self.get_list(path)
    }

    pub fn get_bool_list(&self, path: &str) -> HoconResult<Option<Vec<bool>>> {
        self.get_list(path)
    }
}
