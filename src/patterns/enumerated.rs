//! Singleton expressed as an enum with exactly one case.
//!
//! The case is a compile-time constant stored in one `static`, so there is
//! nothing to initialize at run time and nothing to race on. The variant is
//! `#[non_exhaustive]`, which makes it impossible to build outside this
//! crate, and the type is neither `Clone` nor `Copy`:
//!
//! ```compile_fail
//! use sole::enumerated::Singleton;
//!
//! let forged = Singleton::Instance {};
//! ```
//!
//! ```compile_fail
//! use sole::enumerated::Singleton;
//!
//! let copied: Singleton = *Singleton::get_instance();
//! ```
//!
//! Serialization writes the case name. Deserialization accepts only that
//! name, and [`Singleton::resolve`] maps the decoded value back onto the
//! shared instance:
//!
//! ```rust
//! use sole::enumerated::Singleton;
//!
//! let json = serde_json::to_string(Singleton::get_instance()).unwrap();
//! assert_eq!(json, r#""Instance""#);
//!
//! let decoded: Singleton = serde_json::from_str(&json).unwrap();
//! assert!(std::ptr::eq(decoded.resolve(), Singleton::get_instance()));
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};

static INSTANCE: Singleton = Singleton::Instance {};

/// The single-case enumeration.
#[derive(Debug, PartialEq, Eq, Hash)]
pub enum Singleton {
    /// The only case.
    #[non_exhaustive]
    Instance {},
}

impl Singleton {
    /// Returns the shared instance.
    #[inline]
    pub fn get_instance() -> &'static Singleton {
        &INSTANCE
    }

    /// Trades an owned value (as produced by deserialization) for the shared
    /// instance.
    #[inline]
    pub fn resolve(self) -> &'static Singleton {
        match self {
            Singleton::Instance {} => &INSTANCE,
        }
    }

    /// Placeholder operation; does nothing.
    pub fn whatever_method(&self) {}
}

/// Wire form: a plain unit variant named after the case.
#[derive(Serialize, Deserialize)]
#[serde(rename = "Singleton")]
enum Repr {
    Instance,
}

impl Serialize for Singleton {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Singleton::Instance {} => Repr::Instance.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Singleton {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Repr::deserialize(deserializer).map(|Repr::Instance| Singleton::Instance {})
    }
}
