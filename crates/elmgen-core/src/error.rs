//! Error types for the elmgen-core library.
//!
//! Every failure is fatal to the whole generation run: the plugin either
//! produces output for every requested file or for none of them.

use thiserror::Error;

/// Result type alias for elmgen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for all elmgen operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A file selected for generation does not declare proto3 syntax
    #[error("{file}: unsupported proto syntax '{syntax}', only proto3 is supported")]
    UnsupportedSyntax {
        /// Name of the offending file
        file: String,
        /// The declared syntax string
        syntax: String,
    },

    /// A field references a type that no input file declares
    #[error("{file}: reference to unknown type '{name}'")]
    UnknownType {
        /// Fully-qualified type name, without the leading dot
        name: String,
        /// File containing the reference
        file: String,
    },

    /// The plugin request could not be decoded or is inconsistent
    #[error("malformed request: {details}")]
    MalformedRequest {
        /// Description of the problem
        details: String,
        /// Underlying decode error, if the bytes failed to parse
        #[source]
        source: Option<prost::DecodeError>,
    },

    /// The same qualified type name is declared by two different files
    #[error("type '{name}' is declared in both '{first}' and '{second}'")]
    DuplicateType {
        /// Fully-qualified type name
        name: String,
        /// File that registered the name first
        first: String,
        /// File that tried to register it again
        second: String,
    },

    /// A proto3 enum has no constant with value 0
    #[error("{file}: enum '{name}' has no zero value")]
    MissingEnumDefault {
        /// File declaring the enum
        file: String,
        /// Enum name
        name: String,
    },

    /// Two declarations of one file map to the same Elm identifier
    #[error("{file}: Elm name '{name}' would be declared twice")]
    DuplicateIdentifier {
        /// File whose module would hold both declarations
        file: String,
        /// The clashing Elm identifier
        name: String,
    },

    /// A field uses a kind with no proto3 JSON representation
    #[error("{file}: field '{field}' has unsupported type {kind}")]
    UnsupportedFieldType {
        /// File declaring the field
        file: String,
        /// Field name
        field: String,
        /// Descriptor type name
        kind: String,
    },

    /// The plugin parameter string contains an unknown option
    #[error("invalid plugin parameter '{param}'")]
    InvalidParameter {
        /// The offending `key=value` item
        param: String,
    },

    /// Reading the request or writing the response failed
    #[error("plugin i/o failed: {0}")]
    Io(#[from] std::io::Error),

    /// Writing generated text failed
    #[error("failed to format generated code")]
    Format(#[from] std::fmt::Error),

    /// Generic internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Creates a new unsupported syntax error
    pub fn unsupported_syntax(file: impl Into<String>, syntax: impl Into<String>) -> Self {
        Self::UnsupportedSyntax {
            file: file.into(),
            syntax: syntax.into(),
        }
    }

    /// Creates a new unknown type error
    pub fn unknown_type(name: impl Into<String>, file: impl Into<String>) -> Self {
        Self::UnknownType {
            name: name.into(),
            file: file.into(),
        }
    }

    /// Creates a malformed request error with no underlying decode error
    pub fn malformed_request(details: impl Into<String>) -> Self {
        Self::MalformedRequest {
            details: details.into(),
            source: None,
        }
    }

    /// Creates a new invalid parameter error
    pub fn invalid_parameter(param: impl Into<String>) -> Self {
        Self::InvalidParameter {
            param: param.into(),
        }
    }

    /// Creates a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl From<prost::DecodeError> for Error {
    fn from(err: prost::DecodeError) -> Self {
        Self::MalformedRequest {
            details: err.to_string(),
            source: Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::unknown_type("pkg.Missing", "a.proto");
        assert_eq!(err.to_string(), "a.proto: reference to unknown type 'pkg.Missing'");

        let err = Error::unsupported_syntax("old.proto", "proto2");
        assert!(err.to_string().contains("old.proto"));
        assert!(err.to_string().contains("proto2"));
    }

    #[test]
    fn test_decode_error_is_malformed_request() {
        use prost::Message;

        // Field 1 claims five bytes but only one follows.
        let decoded = prost_types::FileDescriptorProto::decode(&[0x0a, 0x05, b'a'][..]);
        let err: Error = decoded.unwrap_err().into();
        assert!(matches!(err, Error::MalformedRequest { source: Some(_), .. }));
    }
}
