//! Field type registry and schema compilation

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::{Error, Field, FieldDef, FieldType, Result, Schema, StringType, TypeRef, UIntType};

/// Mapping from type name to [`FieldType`] implementation
///
/// Registries are plain values: independent registries can coexist, and a
/// compiled [`Schema`] does not keep a reference to the registry it was
/// compiled against.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    types: HashMap<String, Arc<dyn FieldType>>,
}

impl TypeRegistry {
    /// Registry holding the built-in `string` and `uint` types
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry
            .types
            .insert(StringType::NAME.to_owned(), Arc::new(StringType));
        registry
            .types
            .insert(UIntType::NAME.to_owned(), Arc::new(UIntType));
        registry
    }

    /// Registry with no types at all
    #[must_use]
    pub fn empty() -> Self {
        Self {
            types: HashMap::new(),
        }
    }

    /// Add a type under `name`
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateFieldType`] if `name` is taken; use
    /// [`TypeRegistry::replace`] to override deliberately.
    pub fn register(&mut self, name: impl Into<String>, ty: Arc<dyn FieldType>) -> Result<()> {
        let name = name.into();
        if self.types.contains_key(&name) {
            return Err(Error::DuplicateFieldType { name });
        }
        debug!(name = %name, "registering field type");
        self.types.insert(name, ty);
        Ok(())
    }

    /// Install `ty` under `name`, returning the type it replaced
    pub fn replace(
        &mut self,
        name: impl Into<String>,
        ty: Arc<dyn FieldType>,
    ) -> Option<Arc<dyn FieldType>> {
        let name = name.into();
        debug!(name = %name, "replacing field type");
        self.types.insert(name, ty)
    }

    /// Look up a type by name
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn FieldType>> {
        self.types
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownFieldType {
                name: name.to_owned(),
            })
    }

    /// Whether `name` is registered
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Registered names, sorted
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Compile a definition into a [`Schema`]
    ///
    /// Every named type is resolved exactly once and every descriptor is
    /// validated by its type. Any failure aborts the whole compilation.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A type name is not registered ([`Error::UnknownFieldType`])
    /// - A field type rejects its descriptor's options
    pub fn compile(&self, definition: &[FieldDef]) -> Result<Schema> {
        let fields = definition
            .iter()
            .map(|def| {
                let ty = match &def.ty {
                    TypeRef::Named(name) => self.resolve(name)?,
                    TypeRef::Resolved(ty) => Arc::clone(ty),
                };
                let field = Field::new(def, ty);
                field.field_type().validate(&field)?;
                Ok(field)
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(fields = fields.len(), "compiled schema");
        Ok(Schema::from_fields(fields.into()))
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Compile `definition` against the built-in types
///
/// # Errors
///
/// See [`TypeRegistry::compile`].
pub fn compile(definition: &[FieldDef]) -> Result<Schema> {
    TypeRegistry::new().compile(definition)
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::{Parsed, UIntOptions, Value};

    /// Single byte holding a boolean
    #[derive(Debug)]
    struct Flag;

    impl FieldType for Flag {
        fn name(&self) -> &str {
            "flag"
        }

        fn parse(&self, _field: &Field, buf: &[u8]) -> Result<Parsed> {
            let byte = buf.first().ok_or(Error::BufferTooSmall { needed: 1, got: 0 })?;
            Ok(Parsed::new(1, u64::from(*byte != 0)))
        }

        fn encode(&self, field: &Field, value: &Value) -> Result<Bytes> {
            match value {
                Value::UInt(v) => Ok(Bytes::copy_from_slice(&[u8::from(*v != 0)])),
                other => Err(Error::TypeMismatch {
                    field: field.label(),
                    expected: "uint",
                    found: other.kind(),
                }),
            }
        }
    }

    #[test]
    fn test_builtin_names() {
        assert_eq!(TypeRegistry::new().names(), ["string", "uint"]);
        assert!(TypeRegistry::empty().names().is_empty());
    }

    #[test]
    fn test_unknown_type() {
        let result = compile(&[FieldDef::new("nonexistent").named("x")]);
        assert!(matches!(
            result,
            Err(Error::UnknownFieldType { name }) if name == "nonexistent"
        ));
    }

    #[test]
    fn test_unknown_type_aborts_whole_compile() {
        let definition = [
            FieldDef::new("uint").named("a").options(UIntOptions::new(1)),
            FieldDef::new("missing"),
        ];
        assert!(compile(&definition).is_err());
    }

    #[test]
    fn test_register_refuses_override() {
        let mut registry = TypeRegistry::new();
        let result = registry.register("uint", Arc::new(Flag));
        assert!(matches!(result, Err(Error::DuplicateFieldType { .. })));

        let previous = registry.replace("uint", Arc::new(Flag));
        assert_eq!(previous.unwrap().name(), "uint");
        assert_eq!(registry.resolve("uint").unwrap().name(), "flag");
    }

    #[test]
    fn test_custom_type_is_usable() {
        let mut registry = TypeRegistry::new();
        registry.register("flag", Arc::new(Flag)).unwrap();

        let schema = registry
            .compile(&[FieldDef::new("flag").named("on")])
            .unwrap();
        let record = schema.decode(&[0x07]).unwrap();
        assert_eq!(record.get("on"), Some(&Value::UInt(1)));
    }

    #[test]
    fn test_independent_registries() {
        let mut a = TypeRegistry::empty();
        a.register("flag", Arc::new(Flag)).unwrap();
        let b = TypeRegistry::empty();

        assert!(a.contains("flag"));
        assert!(!b.contains("flag"));
        assert!(b.compile(&[FieldDef::new("flag")]).is_err());
    }

    #[test]
    fn test_compile_validates_options() {
        let missing = compile(&[FieldDef::new("uint").named("n")]);
        assert!(matches!(missing, Err(Error::InvalidOptions { .. })));

        let too_wide = compile(&[FieldDef::new("uint").options(UIntOptions::new(9))]);
        assert!(matches!(too_wide, Err(Error::InvalidWidth { width: 9 })));
    }
}
