//! # elmgen-core
//!
//! A library for generating Elm types and JSON codecs from protobuf
//! (proto3) file descriptors.
//!
//! This crate provides the core functionality for:
//! - Building a global symbol table over a batch of schema files
//! - Deriving Elm module, type and function names from protobuf names
//! - Emitting one Elm module per schema file, with a type, decoder and
//!   encoder for every message and enum, nested ones included
//! - Speaking the protoc plugin protocol
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`naming`]: Qualified names, casing rules and flattening
//! - [`symbols`]: The symbol table and cross-file name resolution
//! - [`codegen`]: Elm emission for files, messages and enums
//! - [`plugin`]: `CodeGeneratorRequest` / `CodeGeneratorResponse` handling
//! - [`error`]: Error types and handling
//!
//! ## Example
//!
//! ```no_run
//! use elmgen_core::{Generator, GeneratorConfig};
//! use prost_types::FileDescriptorProto;
//!
//! # fn load() -> Vec<FileDescriptorProto> { Vec::new() }
//! let files: Vec<FileDescriptorProto> = load();
//!
//! let generator = Generator::with_config(GeneratorConfig::new().emit_defaults(false));
//! for module in generator.generate(&files, &[])? {
//!     println!("// {}\n{}", module.name, module.content);
//! }
//! # Ok::<(), elmgen_core::Error>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod codegen;
pub mod error;
pub mod naming;
pub mod plugin;
pub mod symbols;

// Re-export primary types for convenience
pub use codegen::{
    FileGenerator, GeneratedFile, Generator, GeneratorConfig, ProtoSyntax, UnknownEnumPolicy,
};
pub use error::{Error, Result};
pub use naming::{module_name_for_file, output_path_for_file, split_qualified_name, QualifiedName};
pub use symbols::{NameResolver, Symbol, SymbolTable};

/// Crate version for programmatic access
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
