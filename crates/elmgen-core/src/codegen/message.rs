//! Message emission.
//!
//! For each message the artifacts are emitted in a fixed order:
//!
//! 1. the record type alias
//! 2. nested enum types
//! 3. the message decoder
//! 4. nested enum decoders
//! 5. the message encoder
//! 6. nested enum encoders
//! 7. nested messages, recursively, in declaration order

use super::enums::{self, EnumPlan};
use super::field::FieldCodec;
use super::writer::CodeWriter;
use super::Context;
use crate::error::Result;
use crate::naming::{Artifact, TypePath};
use prost_types::DescriptorProto;
use std::fmt::Write;
use tracing::trace;

/// Emit `message` declared at `path`, followed by everything nested in it
pub fn write_message<W: Write>(
    w: &mut CodeWriter<'_, W>,
    ctx: &Context<'_>,
    path: &TypePath,
    message: &DescriptorProto,
) -> Result<()> {
    let type_name = path.flatten(message.name());
    trace!("Emitting message {}", type_name);

    let fields = message
        .field
        .iter()
        .map(|field| FieldCodec::new(field, &ctx.resolver))
        .collect::<Result<Vec<_>>>()?;

    let nested = path.child(message.name());
    let file = ctx.resolver.current_file();
    let nested_enums = message
        .enum_type
        .iter()
        .map(|e| EnumPlan::new(&nested, e, file))
        .collect::<Result<Vec<_>>>()?;

    write_definition(w, &type_name, &fields)?;
    for plan in &nested_enums {
        enums::write_definition(w, plan)?;
    }

    write_decoder(w, &type_name, &fields)?;
    for plan in &nested_enums {
        enums::write_decoder(w, plan, ctx.config.unknown_enum)?;
    }

    write_encoder(w, &type_name, &fields, ctx.config.emit_defaults)?;
    for plan in &nested_enums {
        enums::write_encoder(w, plan)?;
    }

    for child in &message.nested_type {
        write_message(w, ctx, &nested, child)?;
    }

    Ok(())
}

fn write_definition<W: Write>(
    w: &mut CodeWriter<'_, W>,
    type_name: &str,
    fields: &[FieldCodec],
) -> Result<()> {
    w.declaration()?;
    w.line(&format!("type alias {} =", type_name))?;
    w.indent();

    if fields.is_empty() {
        w.line("{}")?;
        return Ok(());
    }

    for (i, field) in fields.iter().enumerate() {
        let lead = if i == 0 { '{' } else { ',' };
        w.line(&format!("{} {} : {}", lead, field.elm_name, field.elm_type))?;
    }
    w.line("}")?;
    Ok(())
}

fn write_decoder<W: Write>(
    w: &mut CodeWriter<'_, W>,
    type_name: &str,
    fields: &[FieldCodec],
) -> Result<()> {
    let decoder = Artifact::Decoder.name(type_name);

    w.declaration()?;
    w.line(&format!("{} : JD.Decoder {}", decoder, type_name))?;
    w.line(&format!("{} =", decoder))?;
    w.indent();

    if fields.is_empty() {
        w.line("JD.succeed {}")?;
        return Ok(());
    }

    w.line(&format!("JD.succeed {}", type_name))?;
    w.indent();
    for field in fields {
        w.line(&field.decode_step())?;
    }
    Ok(())
}

fn write_encoder<W: Write>(
    w: &mut CodeWriter<'_, W>,
    type_name: &str,
    fields: &[FieldCodec],
    emit_defaults: bool,
) -> Result<()> {
    let encoder = Artifact::Encoder.name(type_name);

    w.declaration()?;
    w.line(&format!("{} : {} -> JE.Value", encoder, type_name))?;

    if fields.is_empty() {
        w.line(&format!("{} _ =", encoder))?;
        w.indent();
        w.line("JE.object []")?;
        return Ok(());
    }

    w.line(&format!("{} v =", encoder))?;
    w.indent();

    let entries: Vec<String> = if emit_defaults {
        w.line("JE.object")?;
        w.indent();
        fields.iter().map(|f| f.encode_pair("v")).collect()
    } else {
        w.line("JE.object <|")?;
        w.indent();
        w.line("List.filterMap identity")?;
        w.indent();
        fields.iter().map(|f| f.encode_unless_default("v")).collect()
    };

    for (i, entry) in entries.iter().enumerate() {
        let lead = if i == 0 { '[' } else { ',' };
        w.line(&format!("{} {}", lead, entry))?;
    }
    w.line("]")?;
    Ok(())
}
