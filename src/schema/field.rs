//! Field type capability, field definitions and compiled descriptors

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use bytes::Bytes;

use super::{Result, Schema, StringOptions, UIntOptions, Value};

/// Outcome of a single [`FieldType::parse`] call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed {
    /// Bytes consumed from the front of the input
    pub length: usize,
    /// Decoded value
    pub value: Value,
}

impl Parsed {
    /// Create a parse result
    #[must_use]
    pub fn new(length: usize, value: impl Into<Value>) -> Self {
        Self {
            length,
            value: value.into(),
        }
    }
}

/// Parse/encode capability implementing one data kind
///
/// Implementations must round-trip: parsing the output of `encode` yields
/// the same value and consumes exactly the encoded length.
pub trait FieldType: Send + Sync + fmt::Debug {
    /// Registry name of this type (e.g. `"uint"`).
    fn name(&self) -> &str;

    /// Check a descriptor at schema compile time.
    ///
    /// The default accepts anything.
    fn validate(&self, _field: &Field) -> Result<()> {
        Ok(())
    }

    /// Read one value from the front of `buf`, never looking past the
    /// reported length.
    fn parse(&self, field: &Field, buf: &[u8]) -> Result<Parsed>;

    /// Produce the exact byte sequence representing `value`.
    fn encode(&self, field: &Field, value: &Value) -> Result<Bytes>;
}

/// Type-specific options of a descriptor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldOptions {
    /// No options; the field type's defaults apply
    #[default]
    None,
    /// Options for the built-in `string` type
    String(StringOptions),
    /// Options for the built-in `uint` type
    UInt(UIntOptions),
    /// Free-form options for externally registered types
    Custom(BTreeMap<String, Value>),
}

impl From<StringOptions> for FieldOptions {
    fn from(options: StringOptions) -> Self {
        Self::String(options)
    }
}

impl From<UIntOptions> for FieldOptions {
    fn from(options: UIntOptions) -> Self {
        Self::UInt(options)
    }
}

impl From<BTreeMap<String, Value>> for FieldOptions {
    fn from(options: BTreeMap<String, Value>) -> Self {
        Self::Custom(options)
    }
}

/// Type of a definition entry, by registry name or already resolved
#[derive(Clone)]
pub enum TypeRef {
    /// Looked up in the registry at compile time
    Named(String),
    /// Used as-is
    Resolved(Arc<dyn FieldType>),
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Self::Resolved(ty) => f.debug_tuple("Resolved").field(&ty.name()).finish(),
        }
    }
}

impl From<&str> for TypeRef {
    fn from(name: &str) -> Self {
        Self::Named(name.to_owned())
    }
}

impl From<String> for TypeRef {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

impl From<Arc<dyn FieldType>> for TypeRef {
    fn from(ty: Arc<dyn FieldType>) -> Self {
        Self::Resolved(ty)
    }
}

impl From<Schema> for TypeRef {
    fn from(schema: Schema) -> Self {
        Self::Resolved(Arc::new(schema))
    }
}

/// One raw entry of a definition, before compilation
///
/// ```rust
/// use buffproto::{FieldDef, UIntOptions};
///
/// let field = FieldDef::new("uint")
///     .named("port")
///     .options(UIntOptions::new(2));
/// # let _ = field;
/// ```
#[derive(Debug, Clone)]
pub struct FieldDef {
    pub(crate) name: Option<String>,
    pub(crate) ty: TypeRef,
    pub(crate) options: FieldOptions,
    pub(crate) value: Option<Value>,
    pub(crate) repeated: Option<u32>,
}

impl FieldDef {
    /// Create an unnamed entry of the given type
    #[must_use]
    pub fn new(ty: impl Into<TypeRef>) -> Self {
        Self {
            name: None,
            ty: ty.into(),
            options: FieldOptions::None,
            value: None,
            repeated: None,
        }
    }

    /// Surface the field in records under `name`
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set type-specific options
    #[must_use]
    pub fn options(mut self, options: impl Into<FieldOptions>) -> Self {
        self.options = options.into();
        self
    }

    /// Default value used on encode when the record lacks this field
    #[must_use]
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Allow up to `count` further applications while input remains
    #[must_use]
    pub fn repeated(mut self, count: u32) -> Self {
        self.repeated = Some(count);
        self
    }
}

/// Compiled descriptor: a definition entry with its type resolved
#[derive(Debug, Clone)]
pub struct Field {
    name: Option<String>,
    ty: Arc<dyn FieldType>,
    options: FieldOptions,
    default: Option<Value>,
    repeated: u32,
}

impl Field {
    pub(crate) fn new(def: &FieldDef, ty: Arc<dyn FieldType>) -> Self {
        Self {
            name: def.name.clone(),
            ty,
            options: def.options.clone(),
            default: def.value.clone(),
            repeated: def.repeated.unwrap_or(0),
        }
    }

    /// Record key, if the field is surfaced
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Resolved field type
    #[must_use]
    pub fn field_type(&self) -> &Arc<dyn FieldType> {
        &self.ty
    }

    /// Type-specific options
    #[must_use]
    pub const fn options(&self) -> &FieldOptions {
        &self.options
    }

    /// Default value
    #[must_use]
    pub const fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Repetition budget; zero means the field is applied exactly once
    #[must_use]
    pub const fn repeated(&self) -> u32 {
        self.repeated
    }

    /// Whether decoding collects this field into a list
    #[must_use]
    pub const fn is_repeated(&self) -> bool {
        self.repeated > 0
    }

    /// Name used in error messages
    #[must_use]
    pub fn label(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("<{}>", self.ty.name()))
    }
}
