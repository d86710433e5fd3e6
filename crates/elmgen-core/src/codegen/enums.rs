//! Enum emission: a closed union type, its default, decoder and encoder.
//!
//! Enum values travel as their declared constant name, matching the
//! canonical proto3 JSON representation.

use super::writer::{elm_string, CodeWriter};
use super::UnknownEnumPolicy;
use crate::error::{Error, Result};
use crate::naming::{case, Artifact, TypePath};
use prost_types::EnumDescriptorProto;
use std::fmt::Write;
use tracing::trace;

/// One enum constant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumVariant {
    /// Elm constructor
    pub constructor: String,
    /// Constant name as declared, used as the JSON literal
    pub literal: String,
}

/// Names derived from an enum descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumPlan {
    /// Flattened Elm type name
    pub type_name: String,
    /// Constants in declaration order
    pub variants: Vec<EnumVariant>,
    /// Constructor of the first constant numbered 0
    pub default_constructor: String,
}

impl EnumPlan {
    /// Derive names for `enum_type` declared at `path` in `file`
    pub fn new(path: &TypePath, enum_type: &EnumDescriptorProto, file: &str) -> Result<Self> {
        let variants: Vec<EnumVariant> = enum_type
            .value
            .iter()
            .map(|value| EnumVariant {
                constructor: case::enum_variant_name(value.name()),
                literal: value.name().to_string(),
            })
            .collect();

        let default_constructor = enum_type
            .value
            .iter()
            .position(|value| value.number() == 0)
            .map(|i| variants[i].constructor.clone())
            .ok_or_else(|| Error::MissingEnumDefault {
                file: file.to_string(),
                name: enum_type.name().to_string(),
            })?;

        Ok(Self {
            type_name: path.flatten(enum_type.name()),
            variants,
            default_constructor,
        })
    }

    fn artifact(&self, artifact: Artifact) -> String {
        artifact.name(&self.type_name)
    }
}

/// Emit the union type and its default constant
pub fn write_definition<W: Write>(w: &mut CodeWriter<'_, W>, plan: &EnumPlan) -> Result<()> {
    trace!("Emitting enum {}", plan.type_name);

    w.declaration()?;
    w.line(&format!("type {}", plan.type_name))?;
    w.indent();
    for (i, variant) in plan.variants.iter().enumerate() {
        let lead = if i == 0 { '=' } else { '|' };
        w.line(&format!("{} {}", lead, variant.constructor))?;
    }

    let default = plan.artifact(Artifact::Default);
    w.declaration()?;
    w.line(&format!("{} : {}", default, plan.type_name))?;
    w.line(&format!("{} =", default))?;
    w.indent();
    w.line(&plan.default_constructor)?;
    Ok(())
}

/// Emit the JSON decoder
pub fn write_decoder<W: Write>(
    w: &mut CodeWriter<'_, W>,
    plan: &EnumPlan,
    policy: UnknownEnumPolicy,
) -> Result<()> {
    let decoder = plan.artifact(Artifact::Decoder);

    w.declaration()?;
    w.line(&format!("{} : JD.Decoder {}", decoder, plan.type_name))?;
    w.line(&format!("{} =", decoder))?;
    w.indent();
    w.line("JD.string")?;
    w.indent();
    w.line("|> JD.andThen")?;
    w.indent();
    w.line("(\\s ->")?;
    w.indent();
    w.line("case s of")?;
    w.indent();
    for variant in &plan.variants {
        w.line(&format!("{} ->", elm_string(&variant.literal)))?;
        w.indent();
        w.line(&format!("JD.succeed {}", variant.constructor))?;
        w.dedent();
        w.blank()?;
    }
    w.line("_ ->")?;
    w.indent();
    match policy {
        UnknownEnumPolicy::Fail => w.line(&format!(
            "JD.fail (\"unknown value for enum {}: \" ++ s)",
            plan.type_name
        ))?,
        UnknownEnumPolicy::Default => {
            w.line(&format!("JD.succeed {}", plan.artifact(Artifact::Default)))?
        }
    }
    w.dedent();
    w.dedent();
    w.dedent();
    w.line(")")?;
    Ok(())
}

/// Emit the JSON encoder, the inverse of the decoder
pub fn write_encoder<W: Write>(w: &mut CodeWriter<'_, W>, plan: &EnumPlan) -> Result<()> {
    let encoder = plan.artifact(Artifact::Encoder);

    w.declaration()?;
    w.line(&format!("{} : {} -> JE.Value", encoder, plan.type_name))?;
    w.line(&format!("{} v =", encoder))?;
    w.indent();
    w.line("JE.string <|")?;
    w.indent();
    w.line("case v of")?;
    w.indent();
    for (i, variant) in plan.variants.iter().enumerate() {
        if i > 0 {
            w.blank()?;
        }
        w.line(&format!("{} ->", variant.constructor))?;
        w.indent();
        w.line(&elm_string(&variant.literal))?;
        w.dedent();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use prost_types::EnumValueDescriptorProto;

    fn color() -> EnumDescriptorProto {
        EnumDescriptorProto {
            name: Some("Color".to_string()),
            value: [("COLOR_UNSPECIFIED", 0), ("COLOR_RED", 1)]
                .into_iter()
                .map(|(name, number)| EnumValueDescriptorProto {
                    name: Some(name.to_string()),
                    number: Some(number),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }
    }

    fn render(f: impl FnOnce(&mut CodeWriter<'_, String>) -> Result<()>) -> String {
        let mut out = String::new();
        let mut w = CodeWriter::new(&mut out, "    ");
        f(&mut w).unwrap();
        out
    }

    #[test]
    fn test_plan_nested_names() {
        let path = TypePath::root().child("Outer").child("Inner");
        let plan = EnumPlan::new(&path, &color(), "a.proto").unwrap();
        assert_eq!(plan.type_name, "Outer_Inner_Color");
        assert_eq!(plan.default_constructor, "ColorUnspecified");
        assert_eq!(plan.artifact(Artifact::Decoder), "outer_Inner_ColorDecoder");
    }

    #[test]
    fn test_missing_zero_value() {
        let mut e = color();
        e.value.remove(0);
        let err = EnumPlan::new(&TypePath::root(), &e, "a.proto").unwrap_err();
        assert!(matches!(err, Error::MissingEnumDefault { .. }));
    }

    #[test]
    fn test_definition() {
        let plan = EnumPlan::new(&TypePath::root(), &color(), "a.proto").unwrap();
        let out = render(|w| write_definition(w, &plan));
        assert_eq!(
            out,
            "\n\ntype Color\n    = ColorUnspecified\n    | ColorRed\n\n\ncolorDefault : Color\ncolorDefault =\n    ColorUnspecified\n"
        );
    }

    #[test]
    fn test_decoder() {
        let plan = EnumPlan::new(&TypePath::root(), &color(), "a.proto").unwrap();
        let out = render(|w| write_decoder(w, &plan, UnknownEnumPolicy::Fail));
        let expected = r#"

colorDecoder : JD.Decoder Color
colorDecoder =
    JD.string
        |> JD.andThen
            (\s ->
                case s of
                    "COLOR_UNSPECIFIED" ->
                        JD.succeed ColorUnspecified

                    "COLOR_RED" ->
                        JD.succeed ColorRed

                    _ ->
                        JD.fail ("unknown value for enum Color: " ++ s)
            )
"#;
        assert_eq!(out, expected);
    }

    #[test]
    fn test_decoder_default_policy() {
        let plan = EnumPlan::new(&TypePath::root(), &color(), "a.proto").unwrap();
        let out = render(|w| write_decoder(w, &plan, UnknownEnumPolicy::Default));
        assert!(out.contains("                    _ ->\n                        JD.succeed colorDefault\n"));
    }

    #[test]
    fn test_encoder() {
        let plan = EnumPlan::new(&TypePath::root(), &color(), "a.proto").unwrap();
        let out = render(|w| write_encoder(w, &plan));
        let expected = r#"

colorEncoder : Color -> JE.Value
colorEncoder v =
    JE.string <|
        case v of
            ColorUnspecified ->
                "COLOR_UNSPECIFIED"

            ColorRed ->
                "COLOR_RED"
"#;
        assert_eq!(out, expected);
    }
}
