//! Record descriptors and field mapping
//!
//! A destination type describes its fields once through [`Record::fields`],
//! normally generated by `#[derive(Record)]`. The resulting
//! [`RecordDescriptor`] is cached per type for the life of the process and
//! reused by every hydration of that type.

use std::any::{Any, TypeId};
use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDateTime, Utc};
use dashmap::DashMap;
use once_cell::sync::Lazy;

use crate::coerce::TypedValue;
use crate::config::CoercionConfig;
use crate::error::{FetchError, FetchResult};
use crate::row::Row;

/// Assigns one field of `T` from a column value
pub type FieldSetter<T> = fn(&mut T, &TypedValue<'_>) -> FetchResult<()>;

/// How a field is bound to the result set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldTag {
    /// Read from the named column
    Column(String),
    /// Tagged `-` or `_`; never written
    Excluded,
    /// No tag, or an empty one; never matched
    Untagged,
}

impl FieldTag {
    pub fn parse(tag: &str) -> Self {
        match tag {
            "-" | "_" => FieldTag::Excluded,
            "" => FieldTag::Untagged,
            column => FieldTag::Column(column.to_string()),
        }
    }

    pub fn column(&self) -> Option<&str> {
        match self {
            FieldTag::Column(c) => Some(c),
            _ => None,
        }
    }
}

/// One destination field
pub struct FieldDescriptor<T> {
    name: &'static str,
    tag: FieldTag,
    setter: FieldSetter<T>,
}

impl<T> FieldDescriptor<T> {
    /// Describe a field from its raw tag
    pub fn new(name: &'static str, tag: &str, setter: FieldSetter<T>) -> Self {
        Self {
            name,
            tag: FieldTag::parse(tag),
            setter,
        }
    }

    /// Describe a field that carries no tag at all
    pub fn untagged(name: &'static str, setter: FieldSetter<T>) -> Self {
        Self {
            name,
            tag: FieldTag::Untagged,
            setter,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn tag(&self) -> &FieldTag {
        &self.tag
    }
}

impl<T> std::fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("tag", &self.tag)
            .finish()
    }
}

/// Cached field list of a record type
#[derive(Debug)]
pub struct RecordDescriptor<T> {
    type_name: &'static str,
    fields: Vec<FieldDescriptor<T>>,
}

impl<T> RecordDescriptor<T> {
    /// Build a descriptor, rejecting field lists that name a field twice
    pub fn build(type_name: &'static str, fields: Vec<FieldDescriptor<T>>) -> FetchResult<Self> {
        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.name) {
                return Err(FetchError::argument(format!(
                    "{} describes field '{}' more than once",
                    type_name, field.name
                )));
            }
        }

        Ok(Self { type_name, fields })
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn fields(&self) -> &[FieldDescriptor<T>] {
        &self.fields
    }

    /// Columns this record reads, in declaration order
    pub fn mapped_columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().filter_map(|f| f.tag.column())
    }

    /// Assign every tagged field whose column is present in `row`.
    ///
    /// Fields are visited in declaration order; the first failing field
    /// aborts the rest, leaving earlier assignments in place.
    pub fn apply(&self, dest: &mut T, row: &Row, config: &CoercionConfig) -> FetchResult<()> {
        for field in &self.fields {
            let Some(column) = field.tag.column() else {
                continue;
            };
            if !row.exist(column) {
                continue;
            }

            (field.setter)(dest, &row.get_with(column, config))
                .map_err(|e| e.for_field(field.name))?;
        }

        Ok(())
    }
}

/// A destination type that rows can be mapped onto
pub trait Record: Default + 'static {
    /// Describe the fields of this type. Called once per process.
    fn fields() -> Vec<FieldDescriptor<Self>>;

    /// The cached descriptor for this type, built at first use
    fn descriptor() -> FetchResult<Arc<RecordDescriptor<Self>>> {
        descriptor_for::<Self>()
    }
}

static DESCRIPTORS: Lazy<DashMap<TypeId, Arc<dyn Any + Send + Sync>>> = Lazy::new(DashMap::new);

fn descriptor_for<T: Record>() -> FetchResult<Arc<RecordDescriptor<T>>> {
    let id = TypeId::of::<T>();
    if let Some(cached) = DESCRIPTORS.get(&id) {
        if let Ok(descriptor) = Arc::clone(cached.value()).downcast::<RecordDescriptor<T>>() {
            return Ok(descriptor);
        }
    }

    let type_name = std::any::type_name::<T>();
    let built: Arc<dyn Any + Send + Sync> = Arc::new(RecordDescriptor::build(type_name, T::fields())?);
    tracing::debug!("Built record descriptor for {}", type_name);

    let entry = Arc::clone(DESCRIPTORS.entry(id).or_insert(built).value());
    entry
        .downcast::<RecordDescriptor<T>>()
        .map_err(|_| FetchError::argument(format!("descriptor cache holds another type for {}", type_name)))
}

/// Map one row onto `dest` using the cached descriptor of `T`
pub fn map_row<T: Record>(dest: &mut T, row: &Row, config: &CoercionConfig) -> FetchResult<()> {
    let descriptor = T::descriptor()?;
    tracing::trace!("Mapping {} columns onto {}", row.len(), descriptor.type_name());
    descriptor.apply(dest, row, config)
}

/// Field types that can be read from a column value
pub trait Coerce: Sized {
    fn coerce(value: &TypedValue<'_>) -> FetchResult<Self>;
}

impl Coerce for String {
    fn coerce(value: &TypedValue<'_>) -> FetchResult<Self> {
        Ok(value.as_string())
    }
}

macro_rules! impl_coerce_integer {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Coerce for $ty {
                fn coerce(value: &TypedValue<'_>) -> FetchResult<Self> {
                    Ok(value.as_i64() as $ty)
                }
            }
        )*
    };
}

impl_coerce_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Coerce for DateTime<Utc> {
    fn coerce(value: &TypedValue<'_>) -> FetchResult<Self> {
        Ok(value.as_timestamp())
    }
}

impl Coerce for DateTime<Local> {
    fn coerce(value: &TypedValue<'_>) -> FetchResult<Self> {
        Ok(value.as_timestamp().with_timezone(&Local))
    }
}

impl Coerce for NaiveDateTime {
    fn coerce(value: &TypedValue<'_>) -> FetchResult<Self> {
        let zone = value.config().time_zone;
        Ok(zone.wall_clock(&value.as_timestamp()))
    }
}

macro_rules! impl_coerce_unmapped {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl Coerce for $ty {
                fn coerce(value: &TypedValue<'_>) -> FetchResult<Self> {
                    Err(FetchError::type_mismatch($name, value.type_name()))
                }
            }
        )*
    };
}

impl_coerce_unmapped! {
    bool => "bool",
    f32 => "f32",
    f64 => "f64",
    char => "char",
}

impl<T: Coerce> Coerce for Option<T> {
    fn coerce(value: &TypedValue<'_>) -> FetchResult<Self> {
        T::coerce(value).map(Some)
    }
}
