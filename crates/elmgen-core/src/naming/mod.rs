//! Name derivation for generated Elm code.
//!
//! Protobuf names arrive as dotted strings such as `.pkg.sub.Outer.Inner`.
//! Elm has no nested types, so a qualified name is decomposed into a
//! package path and a single flattened type identifier (`Outer_Inner`).
//!
//! Segments are classified by the case of their first character: lowercase
//! segments are package components, everything else is a type component.

pub mod case;

use std::fmt;

/// Separator placed between ancestor type names when flattening
pub const FLATTEN_SEPARATOR: &str = "_";

/// Extension of schema files
pub const PROTO_EXTENSION: &str = ".proto";

/// Extension of generated files
pub const ELM_EXTENSION: &str = ".elm";

/// Role of a segment in a dotted qualified name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Package component (`pkg` in `pkg.Msg`)
    Package,
    /// Message or enum component (`Msg` in `pkg.Msg`)
    Type,
}

/// One component of a qualified name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// The segment exactly as it appears in the schema
    pub name: String,
    /// Package or type
    pub kind: SegmentKind,
}

/// A dotted protobuf name decomposed into classified segments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedName {
    segments: Vec<Segment>,
}

impl QualifiedName {
    /// Parse a dotted name. A leading dot and empty segments are ignored.
    pub fn parse(dotted: &str) -> Self {
        let segments = dotted
            .split('.')
            .filter(|s| !s.is_empty())
            .map(|s| Segment {
                name: s.to_string(),
                kind: if s.chars().next().is_some_and(char::is_lowercase) {
                    SegmentKind::Package
                } else {
                    SegmentKind::Type
                },
            })
            .collect();
        Self { segments }
    }

    /// The classified segments in order
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Capitalized package segments joined with `.`
    pub fn package_path(&self) -> String {
        self.segments
            .iter()
            .filter(|s| s.kind == SegmentKind::Package)
            .map(|s| case::first_upper(&s.name))
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Type segments flattened into a single Elm type identifier
    pub fn flattened_type(&self) -> String {
        flatten(
            self.segments
                .iter()
                .filter(|s| s.kind == SegmentKind::Type)
                .map(|s| s.name.as_str()),
        )
    }

    /// Returns `(package_path, flattened_type)`
    pub fn split(&self) -> (String, String) {
        (self.package_path(), self.flattened_type())
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(&segment.name)?;
        }
        Ok(())
    }
}

/// Decompose a dotted name into `(package_path, flattened_type)`.
///
/// `pkg.sub.Msg` yields `("Pkg.Sub", "Msg")` and `Msg` yields `("", "Msg")`.
pub fn split_qualified_name(dotted: &str) -> (String, String) {
    QualifiedName::parse(dotted).split()
}

fn flatten<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names
        .map(case::type_name)
        .collect::<Vec<_>>()
        .join(FLATTEN_SEPARATOR)
}

/// The chain of enclosing message names for a nested type.
///
/// Empty for top-level declarations. Each recursion into a nested message
/// produces a child path; the flattened identifier of a declaration is its
/// ancestors and its own name joined by [`FLATTEN_SEPARATOR`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypePath {
    ancestors: Vec<String>,
}

impl TypePath {
    /// The path of top-level declarations
    pub fn root() -> Self {
        Self::default()
    }

    /// The path of declarations nested inside `message`
    pub fn child(&self, message: &str) -> Self {
        let mut ancestors = self.ancestors.clone();
        ancestors.push(message.to_string());
        Self { ancestors }
    }

    /// Enclosing message names, outermost first
    pub fn ancestors(&self) -> &[String] {
        &self.ancestors
    }

    /// Flattened Elm identifier of the declaration `name` at this path
    pub fn flatten(&self, name: &str) -> String {
        flatten(self.ancestors.iter().map(String::as_str).chain(Some(name)))
    }

    /// Dotted protobuf name of the declaration `name` at this path
    pub fn qualified(&self, package: &str, name: &str) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(self.ancestors.len() + 2);
        if !package.is_empty() {
            parts.push(package);
        }
        parts.extend(self.ancestors.iter().map(String::as_str));
        parts.push(name);
        parts.join(".")
    }
}

/// A generated top-level definition derived from a flattened type name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    /// The type itself: `Outer_Inner`
    Type,
    /// JSON decoder: `outer_InnerDecoder`
    Decoder,
    /// JSON encoder: `outer_InnerEncoder`
    Encoder,
    /// Default value constant (enums only): `colorDefault`
    Default,
}

impl Artifact {
    /// Unqualified identifier of this artifact for `flattened`
    pub fn name(self, flattened: &str) -> String {
        match self {
            Artifact::Type => flattened.to_string(),
            Artifact::Decoder => format!("{}Decoder", case::first_lower(flattened)),
            Artifact::Encoder => format!("{}Encoder", case::first_lower(flattened)),
            Artifact::Default => format!("{}Default", case::first_lower(flattened)),
        }
    }
}

fn file_segments(file_path: &str) -> Vec<String> {
    file_path
        .strip_suffix(PROTO_EXTENSION)
        .unwrap_or(file_path)
        .split('/')
        .filter(|s| !s.is_empty())
        .map(case::first_upper)
        .collect()
}

/// Elm module name for a schema file: `foo/bar.proto` becomes `Foo.Bar`
pub fn module_name_for_file(file_path: &str) -> String {
    file_segments(file_path).join(".")
}

/// Output path for a schema file: `foo/bar.proto` becomes `Foo/Bar.elm`
pub fn output_path_for_file(file_path: &str) -> String {
    format!("{}{}", file_segments(file_path).join("/"), ELM_EXTENSION)
}
