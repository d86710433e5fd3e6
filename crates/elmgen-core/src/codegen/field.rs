//! Field type mapping: Elm type, JSON key, codec expressions and default.

use super::writer::{elm_string, paren};
use crate::error::{Error, Result};
use crate::naming::{case, Artifact};
use crate::symbols::NameResolver;
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::FieldDescriptorProto;

/// Elm rendition of a protobuf scalar kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scalar {
    /// Elm type
    pub elm_type: &'static str,
    /// proto3 zero value
    pub default: &'static str,
    /// JSON decoder expression
    pub decoder: &'static str,
    /// JSON encoder function
    pub encoder: &'static str,
}

const FLOAT: Scalar = Scalar {
    elm_type: "Float",
    default: "0.0",
    decoder: "JD.float",
    encoder: "JE.float",
};

const INT: Scalar = Scalar {
    elm_type: "Int",
    default: "0",
    decoder: "JD.int",
    encoder: "JE.int",
};

// The proto3 JSON mapping writes 64-bit integers as strings.
const INT64: Scalar = Scalar {
    elm_type: "Int",
    default: "0",
    decoder: "int64Decoder",
    encoder: "int64Encoder",
};

const BOOL: Scalar = Scalar {
    elm_type: "Bool",
    default: "False",
    decoder: "JD.bool",
    encoder: "JE.bool",
};

// Bytes travel as base64 text and are kept encoded.
const STRING: Scalar = Scalar {
    elm_type: "String",
    default: "\"\"",
    decoder: "JD.string",
    encoder: "JE.string",
};

/// Look up the Elm rendition of a scalar kind.
///
/// Returns `None` for message, enum and group kinds.
pub fn scalar(kind: Type) -> Option<Scalar> {
    match kind {
        Type::Double | Type::Float => Some(FLOAT),
        Type::Int32 | Type::Uint32 | Type::Sint32 | Type::Fixed32 | Type::Sfixed32 => Some(INT),
        Type::Int64 | Type::Uint64 | Type::Sint64 | Type::Fixed64 | Type::Sfixed64 => Some(INT64),
        Type::Bool => Some(BOOL),
        Type::String | Type::Bytes => Some(STRING),
        Type::Message | Type::Enum | Type::Group => None,
    }
}

/// Everything the message emitter needs to know about one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCodec {
    /// Record field identifier
    pub elm_name: String,
    /// Quoted JSON key
    pub json_key: String,
    /// Elm type of the record field
    pub elm_type: String,
    /// JSON decoder expression
    pub decoder: String,
    /// JSON encoder function expression
    pub encoder: String,
    /// Value used when the key is absent
    pub default: String,
}

impl FieldCodec {
    /// Map `field` using `resolver` to qualify message and enum references
    pub fn new(field: &FieldDescriptorProto, resolver: &NameResolver<'_>) -> Result<Self> {
        let json_name = match &field.json_name {
            Some(name) => name.clone(),
            None => case::to_lower_camel_case(field.name()),
        };
        let repeated = field.label() == Label::Repeated;

        let (elm_type, decoder, encoder, default) = match field.r#type() {
            Type::Group => {
                return Err(Error::UnsupportedFieldType {
                    file: resolver.current_file().to_string(),
                    field: field.name().to_string(),
                    kind: "group".to_string(),
                })
            }
            Type::Enum => {
                let name = field.type_name();
                (
                    resolver.qualify(name, Artifact::Type)?,
                    resolver.qualify(name, Artifact::Decoder)?,
                    resolver.qualify(name, Artifact::Encoder)?,
                    resolver.qualify(name, Artifact::Default)?,
                )
            }
            Type::Message => {
                let name = field.type_name();
                let elm_type = resolver.qualify(name, Artifact::Type)?;
                let decoder = resolver.qualify(name, Artifact::Decoder)?;
                let encoder = resolver.qualify(name, Artifact::Encoder)?;
                if repeated {
                    (elm_type, decoder, encoder, String::new())
                } else {
                    // An unset singular message is represented as Nothing.
                    (
                        format!("Maybe {}", elm_type),
                        format!("JD.map Just {}", decoder),
                        format!("encodeMaybe {}", encoder),
                        "Nothing".to_string(),
                    )
                }
            }
            kind => {
                let scalar = scalar(kind)
                    .ok_or_else(|| Error::internal(format!("no scalar mapping for {:?}", kind)))?;
                (
                    scalar.elm_type.to_string(),
                    scalar.decoder.to_string(),
                    scalar.encoder.to_string(),
                    scalar.default.to_string(),
                )
            }
        };

        let (elm_type, decoder, encoder, default) = if repeated {
            (
                format!("List {}", elm_type),
                format!("JD.list {}", paren(&decoder)),
                format!("JE.list {}", paren(&encoder)),
                "[]".to_string(),
            )
        } else {
            (elm_type, decoder, encoder, default)
        };

        Ok(Self {
            elm_name: case::field_name(field.name()),
            json_key: elm_string(&json_name),
            elm_type,
            decoder,
            encoder,
            default,
        })
    }

    /// The `decodeField` pipeline step for this field
    pub fn decode_step(&self) -> String {
        format!(
            "|> decodeField {} {} {}",
            self.json_key,
            paren(&self.decoder),
            paren(&self.default)
        )
    }

    /// A `( key, value )` pair encoding the field of record `record`
    pub fn encode_pair(&self, record: &str) -> String {
        format!(
            "( {}, {} {}.{} )",
            self.json_key, self.encoder, record, self.elm_name
        )
    }

    /// An `encodeField` call that skips the field when it holds its default
    pub fn encode_unless_default(&self, record: &str) -> String {
        format!(
            "encodeField {} {} {} {}.{}",
            self.json_key,
            paren(&self.encoder),
            paren(&self.default),
            record,
            self.elm_name
        )
    }
}
