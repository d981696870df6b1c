//! Runtime type descriptors used to drive converter dispatch.
//!
//! Converters are registered for a concrete Rust type `T` and serve both `T` and its
//! nullable wrapper `Option<T>`. A [`DataType`] names which of the two forms a caller
//! asked for, because the form decides the *semantic default* returned when a value
//! cannot be read:
//!
//! - [`DataType::of`]: non-nullable, default is `T::default()`
//! - [`DataType::nullable`]: nullable, default is null
//!
//! ```rust
//! use dataio::DataType;
//!
//! let strict = DataType::of::<i32>();
//! let optional = DataType::nullable::<i32>();
//!
//! assert!(!strict.is_nullable());
//! assert!(optional.is_nullable());
//! assert_eq!(strict.id(), optional.id());
//! ```

use crate::{Error, Result};
use std::any::{type_name, Any, TypeId};
use std::fmt;

/// A decoded record or member: `None` is null, otherwise a boxed value of the
/// converter's target type.
pub type Decoded = Option<Box<dyn Any>>;

/// Describes the type requested from, or handed to, a converter registry.
#[derive(Clone, Copy)]
pub struct DataType {
    id: TypeId,
    name: &'static str,
    nullable: bool,
    default: fn() -> Decoded,
}

impl DataType {
    /// The non-nullable form of `T`.
    #[must_use]
    pub fn of<T: Default + 'static>() -> Self {
        DataType {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
            nullable: false,
            default: default_of::<T>,
        }
    }

    /// The nullable form of `T`, i.e. `Option<T>`.
    #[must_use]
    pub fn nullable<T: 'static>() -> Self {
        DataType {
            id: TypeId::of::<T>(),
            name: type_name::<Option<T>>(),
            nullable: true,
            default: null,
        }
    }

    /// The `TypeId` of the converted type (without the nullable wrapper).
    #[inline]
    #[must_use]
    pub fn id(&self) -> TypeId {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns `true` if the requested form can represent absence.
    #[inline]
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Returns `true` if this describes `T` or `Option<T>`.
    #[inline]
    #[must_use]
    pub fn is<T: 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }

    /// Builds the semantic default: null for nullable types, the zero value otherwise.
    #[must_use]
    pub fn default_value(&self) -> Decoded {
        (self.default)()
    }
}

impl PartialEq for DataType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.nullable == other.nullable
    }
}

impl Eq for DataType {}

impl fmt::Debug for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataType")
            .field("name", &self.name)
            .field("nullable", &self.nullable)
            .finish()
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

fn default_of<T: Default + 'static>() -> Decoded {
    Some(Box::new(T::default()))
}

fn null() -> Decoded {
    None
}

/// Direction a serializer is configured for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DataAccess {
    Read,
    Write,
}

impl DataAccess {
    /// Whether a converter with the given capabilities serves this direction.
    #[inline]
    #[must_use]
    pub const fn permits(&self, can_read: bool, can_write: bool) -> bool {
        match self {
            DataAccess::Read => can_read,
            DataAccess::Write => can_write,
        }
    }
}

impl fmt::Display for DataAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataAccess::Read => f.write_str("read"),
            DataAccess::Write => f.write_str("write"),
        }
    }
}

/// Takes the value out of a decoded box.
pub(crate) fn unbox<T: 'static>(value: Box<dyn Any>) -> Result<T> {
    value
        .downcast::<T>()
        .map(|boxed| *boxed)
        .map_err(|_| Error::type_mismatch(type_name::<T>()))
}

/// Unboxes a decoded value, substituting `T::default()` for null.
pub(crate) fn unbox_or_default<T: Default + 'static>(value: Decoded) -> Result<T> {
    match value {
        Some(boxed) => unbox(boxed),
        None => Ok(T::default()),
    }
}

/// Unboxes a decoded value, keeping null as `None`.
pub(crate) fn unbox_nullable<T: 'static>(value: Decoded) -> Result<Option<T>> {
    value.map(unbox::<T>).transpose()
}
