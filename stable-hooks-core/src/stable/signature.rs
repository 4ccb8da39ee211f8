//! Signatures and the built-in signature policies.
//!
//! A [`Signature`] is an opaque byte string summarizing a value's logical
//! content. Two values with equal signatures are treated as the same value by
//! [`use_stable_value`](super::use_stable_value). Signatures compare by
//! content, never by identity.
//!
//! # Policies
//!
//! [`json`] is the default policy and [`msgpack`] a more compact one. Both are
//! replaceable conveniences, not equality guarantees. Known failure and
//! collision modes of both encoders:
//!
//! - maps with non-string keys (tuples, structs) fail under [`json`]
//! - non-finite floats encode as `null` under [`json`], colliding with `None`
//! - `HashMap` iteration order is unspecified, so equal maps may produce
//!   different signatures (a spurious change, never a wrong value)
//! - `None` fields are encoded unless skipped with serde attributes
//! - [`msgpack`] encodes structs as arrays, so field names do not take part
//!
//! Values with custom equality should pass their own signature function to
//! [`use_stable_value_with`](super::use_stable_value_with).

use std::fmt;
use std::rc::Rc;

use serde::Serialize;

use crate::error::SignatureError;

/// Comparable summary of a value's logical content.
///
/// Cloning is cheap: the bytes are shared.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Signature(Rc<[u8]>);

impl Signature {
    /// Build a signature from raw bytes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(Rc::from(bytes.into()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for Signature {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<String> for Signature {
    fn from(text: String) -> Self {
        Self::from_bytes(text.into_bytes())
    }
}

impl From<&str> for Signature {
    fn from(text: &str) -> Self {
        Self::from_bytes(text.as_bytes())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match std::str::from_utf8(&self.0) {
            Ok(text) => f.debug_tuple("Signature").field(&text).finish(),
            Err(_) => f.debug_tuple("Signature").field(&&*self.0).finish(),
        }
    }
}

/// Signature from the JSON encoding of `value`.
pub fn json<T>(value: &T) -> Result<Signature, SignatureError>
where
    T: Serialize + ?Sized,
{
    Ok(Signature::from(serde_json::to_vec(value)?))
}

/// Signature from the MessagePack encoding of `value`.
pub fn msgpack<T>(value: &T) -> Result<Signature, SignatureError>
where
    T: Serialize + ?Sized,
{
    Ok(Signature::from(rmp_serde::to_vec(value)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use std::collections::BTreeMap;

    #[derive(Serialize)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[test]
    fn json_signature_is_the_encoding() {
        let signature = json(&["one", "two"]).unwrap();
        assert_eq!(signature.as_bytes(), br#"["one","two"]"#);
        assert_eq!(signature, Signature::from(r#"["one","two"]"#));
        assert_eq!(format!("{signature:?}"), r#"Signature("[\"one\",\"two\"]")"#);
    }

    #[test]
    fn equal_content_gives_equal_signatures() {
        let a = vec![String::from("x")];
        let b = vec![String::from("x")];
        assert_eq!(json(&a).unwrap(), json(&b).unwrap());
        assert_eq!(msgpack(&a).unwrap(), msgpack(&b).unwrap());
        assert_ne!(json(&a).unwrap(), json(&vec!["y"]).unwrap());
    }

    #[test]
    fn json_rejects_non_string_map_keys() {
        let mut map = BTreeMap::new();
        map.insert((1, 2), "tuple key");

        assert!(matches!(json(&map), Err(SignatureError::Json(_))));
        // MessagePack allows arbitrary keys.
        assert!(msgpack(&map).is_ok());
    }

    #[test]
    fn json_collides_non_finite_floats_with_none() {
        let nan = json(&f64::NAN).unwrap();
        let none = json(&Option::<f64>::None).unwrap();
        assert_eq!(nan, none);
    }

    #[test]
    fn msgpack_ignores_field_names() {
        #[derive(Serialize)]
        struct Size {
            w: i32,
            h: i32,
        }

        let point = msgpack(&Point { x: 1, y: 2 }).unwrap();
        let size = msgpack(&Size { w: 1, h: 2 }).unwrap();
        assert_eq!(point, size);
        assert_ne!(json(&Point { x: 1, y: 2 }).unwrap(), json(&Size { w: 1, h: 2 }).unwrap());
    }

    #[test]
    fn binary_signatures_debug_as_bytes() {
        let signature = Signature::from_bytes(vec![0xff, 0x00]);
        assert_eq!(signature.len(), 2);
        assert!(!signature.is_empty());
        assert_eq!(format!("{signature:?}"), "Signature([255, 0])");
    }
}
