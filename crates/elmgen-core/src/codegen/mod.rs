//! Elm code generation.
//!
//! ## Architecture
//!
//! Generation is all-or-nothing across a batch of files and runs in two
//! phases, driven by [`Generator::generate`]:
//!
//! 1. Every type of every input file is registered in a [`SymbolTable`]
//! 2. Each selected file is rendered by a [`FileGenerator`] against the
//!    completed, read-only table
//!
//! Output is deterministic: the same descriptors always produce the same
//! text byte for byte.

mod enums;
mod field;
mod file;
mod message;
mod runtime;
mod writer;

pub use field::{scalar, FieldCodec, Scalar};
pub use file::FileGenerator;
pub use writer::CodeWriter;

use crate::error::{Error, Result};
use crate::symbols::{NameResolver, SymbolTable};
use prost_types::FileDescriptorProto;
use std::str::FromStr;
use tracing::{debug, info};

/// What an enum decoder does with a string matching no constant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownEnumPolicy {
    /// Decoding fails
    #[default]
    Fail,
    /// The enum's zero value is produced
    Default,
}

impl FromStr for UnknownEnumPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "fail" => Ok(UnknownEnumPolicy::Fail),
            "default" => Ok(UnknownEnumPolicy::Default),
            _ => Err(Error::invalid_parameter(format!("unknown_enum={}", s))),
        }
    }
}

/// Configuration for code generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Indentation string (default: 4 spaces, as elm-format)
    pub indent_str: String,
    /// Encode every field, including those holding their default value
    pub emit_defaults: bool,
    /// Handling of unrecognised enum literals
    pub unknown_enum: UnknownEnumPolicy,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            indent_str: "    ".to_string(),
            emit_defaults: true,
            unknown_enum: UnknownEnumPolicy::Fail,
        }
    }
}

impl GeneratorConfig {
    /// Creates a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the indentation string
    pub fn indent_str(mut self, s: impl Into<String>) -> Self {
        self.indent_str = s.into();
        self
    }

    /// Sets whether fields holding their default value are encoded
    pub fn emit_defaults(mut self, emit: bool) -> Self {
        self.emit_defaults = emit;
        self
    }

    /// Sets the unknown enum literal policy
    pub fn unknown_enum(mut self, policy: UnknownEnumPolicy) -> Self {
        self.unknown_enum = policy;
        self
    }

    /// Parse a protoc plugin parameter such as
    /// `emit_defaults=false,unknown_enum=default`.
    pub fn from_parameter(parameter: &str) -> Result<Self> {
        let mut config = Self::default();
        for item in parameter.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let (key, value) = item
                .split_once('=')
                .ok_or_else(|| Error::invalid_parameter(item))?;
            match key.trim() {
                "emit_defaults" => {
                    config.emit_defaults = value
                        .trim()
                        .parse()
                        .map_err(|_| Error::invalid_parameter(item))?;
                }
                "unknown_enum" => config.unknown_enum = value.trim().parse()?,
                _ => return Err(Error::invalid_parameter(item)),
            }
        }
        Ok(config)
    }
}

/// Proto syntax version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtoSyntax {
    /// Proto2 syntax
    Proto2,
    /// Proto3 syntax
    Proto3,
}

impl ProtoSyntax {
    /// Returns the syntax declaration string
    pub fn as_str(&self) -> &'static str {
        match self {
            ProtoSyntax::Proto2 => "proto2",
            ProtoSyntax::Proto3 => "proto3",
        }
    }

    /// Fails unless `file` declares proto3
    pub fn require_proto3(file: &FileDescriptorProto) -> Result<()> {
        match ProtoSyntax::try_from(file.syntax()) {
            Ok(ProtoSyntax::Proto3) => Ok(()),
            _ => Err(Error::unsupported_syntax(file.name(), file.syntax())),
        }
    }
}

impl TryFrom<&str> for ProtoSyntax {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        // An absent syntax statement means proto2.
        match value {
            "" | "proto2" => Ok(ProtoSyntax::Proto2),
            "proto3" => Ok(ProtoSyntax::Proto3),
            _ => Err(Error::unsupported_syntax("", value)),
        }
    }
}

/// A generated Elm module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Output path, e.g. `Foo/Bar.elm`
    pub name: String,
    /// Module source text
    pub content: String,
}

/// Shared state for emitters within one file
#[derive(Debug, Clone, Copy)]
pub(crate) struct Context<'a> {
    pub(crate) resolver: NameResolver<'a>,
    pub(crate) config: &'a GeneratorConfig,
}

/// Generates Elm modules for a batch of schema files
#[derive(Debug, Clone, Default)]
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    /// Creates a generator with default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a generator with custom config
    pub fn with_config(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// The active configuration
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate modules for the files named in `to_generate`, or for every
    /// file when it is empty.
    ///
    /// All of `files` contribute to the symbol table, so dependencies that
    /// are not themselves generated can still be referenced. Any error
    /// aborts the whole batch.
    pub fn generate(
        &self,
        files: &[FileDescriptorProto],
        to_generate: &[String],
    ) -> Result<Vec<GeneratedFile>> {
        let symbols = SymbolTable::from_files(files)?;
        debug!(
            "Registered {} types from {} files",
            symbols.len(),
            files.len()
        );

        let selected = select_files(files, to_generate)?;
        for file in &selected {
            ProtoSyntax::require_proto3(file)?;
        }

        let generated = selected
            .iter()
            .map(|file| FileGenerator::new(file, &symbols, &self.config).generate())
            .collect::<Result<Vec<_>>>()?;

        info!("Generated {} Elm modules", generated.len());
        Ok(generated)
    }
}

fn select_files<'a>(
    files: &'a [FileDescriptorProto],
    to_generate: &[String],
) -> Result<Vec<&'a FileDescriptorProto>> {
    if to_generate.is_empty() {
        return Ok(files.iter().collect());
    }
    to_generate
        .iter()
        .map(|name| {
            files.iter().find(|f| f.name() == name).ok_or_else(|| {
                Error::malformed_request(format!("file to generate '{}' is not in the request", name))
            })
        })
        .collect()
}
