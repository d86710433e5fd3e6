//! Global symbol table and cross-file name resolution.
//!
//! Generation runs in two phases. [`SymbolTable::from_files`] registers
//! every message and enum (top-level and nested) of every input file.
//! Only then are files generated, each through a [`NameResolver`] that
//! borrows the completed table read-only. A file can therefore reference a
//! type declared in a file that appears later in the request.

use crate::error::{Error, Result};
use crate::naming::{module_name_for_file, Artifact, QualifiedName, TypePath};
use prost_types::{DescriptorProto, FileDescriptorProto};
use std::collections::BTreeMap;
use tracing::trace;

/// A registered message or enum
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// Schema file declaring the type
    pub file: String,
    /// Flattened Elm identifier of the type, as its definition spells it
    pub flattened: String,
}

/// Maps fully-qualified type names to the file declaring them
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    types: BTreeMap<String, Symbol>,
}

impl SymbolTable {
    /// Creates an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every type declared in `files`
    pub fn from_files(files: &[FileDescriptorProto]) -> Result<Self> {
        let mut table = Self::new();
        for file in files {
            table.register_file(file)?;
        }
        Ok(table)
    }

    /// Registers every top-level and nested type declared in `file`
    pub fn register_file(&mut self, file: &FileDescriptorProto) -> Result<()> {
        let root = TypePath::root();
        for enum_type in &file.enum_type {
            self.register_declaration(file, &root, enum_type.name())?;
        }
        for message in &file.message_type {
            self.register_message(file, &root, message)?;
        }
        Ok(())
    }

    fn register_message(
        &mut self,
        file: &FileDescriptorProto,
        path: &TypePath,
        message: &DescriptorProto,
    ) -> Result<()> {
        self.register_declaration(file, path, message.name())?;

        let nested = path.child(message.name());
        for enum_type in &message.enum_type {
            self.register_declaration(file, &nested, enum_type.name())?;
        }
        for child in &message.nested_type {
            self.register_message(file, &nested, child)?;
        }
        Ok(())
    }

    /// Records the declaration `name` nested at `path` inside `file`.
    ///
    /// The flattened identifier comes from the declaration structure, so
    /// package and type segments are told apart regardless of their case.
    pub fn register_declaration(
        &mut self,
        file: &FileDescriptorProto,
        path: &TypePath,
        name: &str,
    ) -> Result<()> {
        self.insert(
            path.qualified(file.package(), name),
            Symbol {
                file: file.name().to_string(),
                flattened: path.flatten(name),
            },
        )
    }

    /// Records that the dotted `name` is declared in `file`.
    ///
    /// Segments are classified by case (see [`QualifiedName`]). Registering
    /// the same pair twice is a no-op; registering a name that another file
    /// already declared fails.
    pub fn register(&mut self, name: impl Into<String>, file: impl Into<String>) -> Result<()> {
        let name = name.into();
        let flattened = QualifiedName::parse(&name).flattened_type();
        self.insert(
            name,
            Symbol {
                file: file.into(),
                flattened,
            },
        )
    }

    fn insert(&mut self, name: String, symbol: Symbol) -> Result<()> {
        let key = name.trim_start_matches('.').to_string();

        match self.types.get(&key) {
            Some(existing) if existing.file == symbol.file => Ok(()),
            Some(existing) => Err(Error::DuplicateType {
                name: key,
                first: existing.file.clone(),
                second: symbol.file,
            }),
            None => {
                trace!("Registered {} as {} from {}", key, symbol.flattened, symbol.file);
                self.types.insert(key, symbol);
                Ok(())
            }
        }
    }

    /// Returns the registered symbol for `name`, if any
    pub fn symbol(&self, name: &str) -> Option<&Symbol> {
        self.types.get(name.trim_start_matches('.'))
    }

    /// Returns the declaring file of `name`, if any
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.symbol(name).map(|symbol| symbol.file.as_str())
    }

    /// Returns the declaring file of `name`.
    ///
    /// `referenced_from` names the file holding the reference and is only
    /// used for the error.
    pub fn resolve(&self, name: &str, referenced_from: &str) -> Result<&Symbol> {
        self.symbol(name).ok_or_else(|| {
            Error::unknown_type(name.trim_start_matches('.'), referenced_from)
        })
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true if nothing was registered
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Registered `(type, file)` pairs in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.types.iter().map(|(k, v)| (k.as_str(), v.file.as_str()))
    }
}

/// Resolves type references from the point of view of one file
#[derive(Debug, Clone, Copy)]
pub struct NameResolver<'a> {
    symbols: &'a SymbolTable,
    current_file: &'a str,
}

impl<'a> NameResolver<'a> {
    /// Creates a resolver for references made from `current_file`
    pub fn new(symbols: &'a SymbolTable, current_file: &'a str) -> Self {
        Self {
            symbols,
            current_file,
        }
    }

    /// The file references are resolved from
    pub fn current_file(&self) -> &'a str {
        self.current_file
    }

    /// Elm module to import for `type_name`, or `None` if it is local
    pub fn foreign_module(&self, type_name: &str) -> Result<Option<String>> {
        let symbol = self.symbols.resolve(type_name, self.current_file)?;
        Ok(self.module_of(symbol))
    }

    fn module_of(&self, symbol: &Symbol) -> Option<String> {
        (symbol.file != self.current_file).then(|| module_name_for_file(&symbol.file))
    }

    /// Identifier of `artifact` for `type_name`, module-qualified when the
    /// type is declared in another file.
    pub fn qualify(&self, type_name: &str, artifact: Artifact) -> Result<String> {
        let symbol = self.symbols.resolve(type_name, self.current_file)?;
        let local = artifact.name(&symbol.flattened);
        match self.module_of(symbol) {
            Some(module) => Ok(format!("{}.{}", module, local)),
            None => Ok(local),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost_types::EnumDescriptorProto;

    fn message(name: &str, nested: Vec<DescriptorProto>, enums: Vec<&str>) -> DescriptorProto {
        DescriptorProto {
            name: Some(name.to_string()),
            nested_type: nested,
            enum_type: enums
                .into_iter()
                .map(|e| EnumDescriptorProto {
                    name: Some(e.to_string()),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }
    }

    fn file(name: &str, package: &str, messages: Vec<DescriptorProto>) -> FileDescriptorProto {
        FileDescriptorProto {
            name: Some(name.to_string()),
            package: Some(package.to_string()),
            syntax: Some("proto3".to_string()),
            message_type: messages,
            ..Default::default()
        }
    }

    #[test]
    fn test_registers_nested_types() {
        let outer = message(
            "Outer",
            vec![message("Inner", vec![], vec!["Color"])],
            vec!["Kind"],
        );
        let table = SymbolTable::from_files(&[file("a.proto", "pkg", vec![outer])]).unwrap();

        let names: Vec<_> = table.iter().map(|(name, _)| name).collect();
        assert_eq!(
            names,
            vec![
                "pkg.Outer",
                "pkg.Outer.Inner",
                "pkg.Outer.Inner.Color",
                "pkg.Outer.Kind"
            ]
        );
        assert_eq!(table.lookup(".pkg.Outer.Inner.Color"), Some("a.proto"));
    }

    #[test]
    fn test_resolve_unknown_type() {
        let table = SymbolTable::new();
        let err = table.resolve(".pkg.Missing", "b.proto").unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownType { ref name, ref file } if name == "pkg.Missing" && file == "b.proto"
        ));
    }

    #[test]
    fn test_duplicate_registration() {
        let mut table = SymbolTable::new();
        table.register("pkg.T", "a.proto").unwrap();
        table.register("pkg.T", "a.proto").unwrap();
        assert_eq!(table.len(), 1);
        assert!(matches!(
            table.register("pkg.T", "b.proto"),
            Err(Error::DuplicateType { .. })
        ));
    }

    #[test]
    fn test_qualify_local_and_foreign() {
        let mut table = SymbolTable::new();
        table.register("pkg.T", "dir/a.proto").unwrap();
        table.register("pkg.U", "b.proto").unwrap();

        let in_a = NameResolver::new(&table, "dir/a.proto");
        assert_eq!(in_a.qualify(".pkg.T", Artifact::Type).unwrap(), "T");
        assert_eq!(in_a.qualify(".pkg.T", Artifact::Decoder).unwrap(), "tDecoder");

        let in_b = NameResolver::new(&table, "b.proto");
        assert_eq!(in_b.qualify(".pkg.T", Artifact::Type).unwrap(), "Dir.A.T");
        assert_eq!(
            in_b.qualify(".pkg.T", Artifact::Encoder).unwrap(),
            "Dir.A.tEncoder"
        );
        assert_eq!(in_b.foreign_module(".pkg.U").unwrap(), None);
    }

    #[test]
    fn test_lowercase_message_name() {
        let holder = message("Holder", vec![message("entry", vec![], vec![])], vec![]);
        let table = SymbolTable::from_files(&[file(
            "a.proto",
            "pkg",
            vec![message("item", vec![], vec![]), holder],
        )])
        .unwrap();
        let resolver = NameResolver::new(&table, "a.proto");

        assert_eq!(resolver.qualify(".pkg.item", Artifact::Type).unwrap(), "Item");
        assert_eq!(
            resolver.qualify(".pkg.item", Artifact::Decoder).unwrap(),
            "itemDecoder"
        );
        assert_eq!(
            resolver.qualify(".pkg.Holder.entry", Artifact::Encoder).unwrap(),
            "holder_EntryEncoder"
        );
    }

    #[test]
    fn test_uppercase_package() {
        let table = SymbolTable::from_files(&[
            file("acme/item.proto", "Acme.V1", vec![message("Item", vec![], vec![])]),
            file("b.proto", "other", vec![]),
        ])
        .unwrap();

        assert_eq!(
            table.symbol("Acme.V1.Item").map(|s| s.flattened.as_str()),
            Some("Item")
        );
        let in_b = NameResolver::new(&table, "b.proto");
        assert_eq!(
            in_b.qualify(".Acme.V1.Item", Artifact::Type).unwrap(),
            "Acme.Item.Item"
        );
        assert_eq!(
            in_b.qualify(".Acme.V1.Item", Artifact::Decoder).unwrap(),
            "Acme.Item.itemDecoder"
        );
    }
}
