//! Helper functions emitted into every generated module.
//!
//! Generated decoders and encoders call these instead of spelling out
//! presence handling and 64-bit integer conversion at every field.

use super::writer::CodeWriter;
use crate::error::Result;
use std::fmt::Write;

/// Absent or `null` keys decode to the supplied default.
const DECODE_FIELD: &str = r#"decodeField : String -> JD.Decoder a -> a -> JD.Decoder (a -> b) -> JD.Decoder b
decodeField name decoder default =
    JD.map2 (|>)
        (JD.maybe (JD.field name JD.value)
            |> JD.andThen
                (\present ->
                    case present of
                        Nothing ->
                            JD.succeed default

                        Just _ ->
                            JD.field name (JD.oneOf [ JD.null default, decoder ])
                )
        )"#;

const ENCODE_FIELD: &str = r#"encodeField : String -> (a -> JE.Value) -> a -> a -> Maybe ( String, JE.Value )
encodeField name encoder default value =
    if value == default then
        Nothing

    else
        Just ( name, encoder value )"#;

const ENCODE_MAYBE: &str = r#"encodeMaybe : (a -> JE.Value) -> Maybe a -> JE.Value
encodeMaybe encoder value =
    case value of
        Nothing ->
            JE.null

        Just inner ->
            encoder inner"#;

// 64-bit integers are accepted as numbers or decimal strings.
const INT64_DECODER: &str = r#"int64Decoder : JD.Decoder Int
int64Decoder =
    JD.oneOf
        [ JD.int
        , JD.string
            |> JD.andThen
                (\text ->
                    case String.toInt text of
                        Just parsed ->
                            JD.succeed parsed

                        Nothing ->
                            JD.fail ("invalid 64-bit integer: " ++ text)
                )
        ]"#;

const INT64_ENCODER: &str = r#"int64Encoder : Int -> JE.Value
int64Encoder value =
    JE.string (String.fromInt value)"#;

/// Helpers in emission order
pub const HELPERS: &[&str] = &[
    DECODE_FIELD,
    ENCODE_FIELD,
    ENCODE_MAYBE,
    INT64_DECODER,
    INT64_ENCODER,
];

/// Emit every runtime helper as its own top-level declaration
pub fn write_runtime<W: Write>(w: &mut CodeWriter<'_, W>) -> Result<()> {
    for helper in HELPERS {
        w.declaration()?;
        for line in helper.lines() {
            w.line(line)?;
        }
    }
    Ok(())
}
