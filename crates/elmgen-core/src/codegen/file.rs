//! Generation of one Elm module from one schema file.

use super::enums::{self, EnumPlan};
use super::message::write_message;
use super::runtime::write_runtime;
use super::writer::CodeWriter;
use super::{Context, GeneratedFile, GeneratorConfig, ProtoSyntax};
use crate::error::{Error, Result};
use crate::naming::{module_name_for_file, output_path_for_file, TypePath};
use crate::symbols::{NameResolver, SymbolTable};
use prost_types::field_descriptor_proto::Type;
use prost_types::{DescriptorProto, EnumDescriptorProto, FileDescriptorProto};
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

/// Imports every generated module carries
const RUNTIME_IMPORTS: &[&str] = &["import Json.Decode as JD", "import Json.Encode as JE"];

/// Generates the Elm module for a single schema file.
///
/// The symbol table must already hold the types of every input file.
#[derive(Debug, Clone, Copy)]
pub struct FileGenerator<'a> {
    file: &'a FileDescriptorProto,
    symbols: &'a SymbolTable,
    config: &'a GeneratorConfig,
}

impl<'a> FileGenerator<'a> {
    /// Creates a generator for `file`
    pub fn new(
        file: &'a FileDescriptorProto,
        symbols: &'a SymbolTable,
        config: &'a GeneratorConfig,
    ) -> Self {
        Self {
            file,
            symbols,
            config,
        }
    }

    /// Elm module name of the output
    pub fn module_name(&self) -> String {
        module_name_for_file(self.file.name())
    }

    /// Path of the output, relative to the output root
    pub fn output_path(&self) -> String {
        output_path_for_file(self.file.name())
    }

    fn resolver(&self) -> NameResolver<'a> {
        NameResolver::new(self.symbols, self.file.name())
    }

    /// Modules declaring types this file references, sorted
    pub fn imports(&self) -> Result<BTreeSet<String>> {
        let resolver = self.resolver();
        let mut modules = BTreeSet::new();
        for message in &self.file.message_type {
            collect_imports(&resolver, message, &mut modules)?;
        }
        Ok(modules)
    }

    /// Render the complete module
    pub fn generate(&self) -> Result<GeneratedFile> {
        ProtoSyntax::require_proto3(self.file)?;
        self.check_registered()?;
        self.check_identifiers()?;

        let imports = self.imports()?;
        debug!(
            "Generating {} ({} imports)",
            self.file.name(),
            imports.len()
        );

        let ctx = Context {
            resolver: self.resolver(),
            config: self.config,
        };

        let mut content = String::new();
        let mut w = CodeWriter::new(&mut content, &self.config.indent_str);

        w.line(&format!("module {} exposing (..)", self.module_name()))?;
        w.blank()?;
        w.line("-- DO NOT EDIT")?;
        w.line("-- AUTOGENERATED BY protoc-gen-elm")?;
        w.line(&format!("-- source file: {}", self.file.name()))?;
        w.blank()?;
        for import in RUNTIME_IMPORTS {
            w.line(import)?;
        }
        for module in &imports {
            w.line(&format!("import {}", module))?;
        }

        write_runtime(&mut w)?;

        let root = TypePath::root();
        for enum_type in &self.file.enum_type {
            let plan = EnumPlan::new(&root, enum_type, self.file.name())?;
            enums::write_definition(&mut w, &plan)?;
            enums::write_decoder(&mut w, &plan, self.config.unknown_enum)?;
            enums::write_encoder(&mut w, &plan)?;
        }

        for message in &self.file.message_type {
            write_message(&mut w, &ctx, &root, message)?;
        }

        Ok(GeneratedFile {
            name: self.output_path(),
            content,
        })
    }

    /// Every top-level declaration must resolve back to this file
    fn check_registered(&self) -> Result<()> {
        let root = TypePath::root();
        let names = self
            .file
            .enum_type
            .iter()
            .map(|e| e.name())
            .chain(self.file.message_type.iter().map(|m| m.name()));

        for name in names {
            let qualified = root.qualified(self.file.package(), name);
            if self.symbols.lookup(&qualified) != Some(self.file.name()) {
                return Err(Error::internal(format!(
                    "{} is not registered to {}",
                    qualified,
                    self.file.name()
                )));
            }
        }
        Ok(())
    }

    /// Elm modules share one namespace for types and one for constructors.
    /// Record aliases contribute a constructor of their own name.
    fn check_identifiers(&self) -> Result<()> {
        let mut names = Identifiers {
            file: self.file.name(),
            types: HashSet::new(),
            constructors: HashSet::new(),
        };

        let root = TypePath::root();
        for enum_type in &self.file.enum_type {
            names.add_enum(&root, enum_type)?;
        }
        for message in &self.file.message_type {
            names.add_message(&root, message)?;
        }
        Ok(())
    }
}

struct Identifiers<'a> {
    file: &'a str,
    types: HashSet<String>,
    constructors: HashSet<String>,
}

impl Identifiers<'_> {
    fn claim(file: &str, set: &mut HashSet<String>, name: String) -> Result<()> {
        if set.insert(name.clone()) {
            Ok(())
        } else {
            Err(Error::DuplicateIdentifier {
                file: file.to_string(),
                name,
            })
        }
    }

    fn add_enum(&mut self, path: &TypePath, enum_type: &EnumDescriptorProto) -> Result<()> {
        let plan = EnumPlan::new(path, enum_type, self.file)?;
        Self::claim(self.file, &mut self.types, plan.type_name)?;
        for variant in plan.variants {
            Self::claim(self.file, &mut self.constructors, variant.constructor)?;
        }
        Ok(())
    }

    fn add_message(&mut self, path: &TypePath, message: &DescriptorProto) -> Result<()> {
        let name = path.flatten(message.name());
        Self::claim(self.file, &mut self.types, name.clone())?;
        Self::claim(self.file, &mut self.constructors, name)?;

        let nested = path.child(message.name());
        for enum_type in &message.enum_type {
            self.add_enum(&nested, enum_type)?;
        }
        for child in &message.nested_type {
            self.add_message(&nested, child)?;
        }
        Ok(())
    }
}

fn collect_imports(
    resolver: &NameResolver<'_>,
    message: &DescriptorProto,
    modules: &mut BTreeSet<String>,
) -> Result<()> {
    for field in &message.field {
        if matches!(field.r#type(), Type::Message | Type::Enum) {
            if let Some(module) = resolver.foreign_module(field.type_name())? {
                modules.insert(module);
            }
        }
    }
    for nested in &message.nested_type {
        collect_imports(resolver, nested, modules)?;
    }
    Ok(())
}
