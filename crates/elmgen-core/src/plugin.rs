//! protoc plugin protocol.
//!
//! protoc writes a serialized `CodeGeneratorRequest` to the plugin's stdin
//! and expects a serialized `CodeGeneratorResponse` on stdout. This module
//! converts between those messages and [`Generator`] calls; the binary only
//! wires it to the process streams.

use crate::codegen::{GeneratedFile, Generator, GeneratorConfig};
use crate::error::{Error, Result};
use bytes::{Bytes, BytesMut};
use prost::Message;
use prost_types::compiler::code_generator_response::File;
use prost_types::compiler::{CodeGeneratorRequest, CodeGeneratorResponse};
use std::io::{Read, Write};
use tracing::{debug, trace};

/// Decode a serialized request
pub fn decode_request(data: impl Into<Bytes>) -> Result<CodeGeneratorRequest> {
    let request = CodeGeneratorRequest::decode(data.into())?;
    trace!(
        "Decoded request: {} proto files, {} to generate, parameter {:?}",
        request.proto_file.len(),
        request.file_to_generate.len(),
        request.parameter()
    );
    Ok(request)
}

/// Read and decode a request from `reader` until end of input
pub fn read_request(mut reader: impl Read) -> Result<CodeGeneratorRequest> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    debug!("Read {} request bytes", data.len());
    decode_request(data)
}

/// Generate the response for `request`.
///
/// Either every requested file is generated or an error is returned and
/// nothing is.
pub fn process(request: &CodeGeneratorRequest) -> Result<CodeGeneratorResponse> {
    let config = GeneratorConfig::from_parameter(request.parameter())?;
    let generated = Generator::with_config(config)
        .generate(&request.proto_file, &request.file_to_generate)?;

    Ok(CodeGeneratorResponse {
        file: generated.into_iter().map(into_response_file).collect(),
        ..Default::default()
    })
}

fn into_response_file(file: GeneratedFile) -> File {
    File {
        name: Some(file.name),
        content: Some(file.content),
        ..Default::default()
    }
}

/// Serialize a response
pub fn encode_response(response: &CodeGeneratorResponse) -> Result<Bytes> {
    let mut buf = BytesMut::with_capacity(response.encoded_len());
    response
        .encode(&mut buf)
        .map_err(|e| Error::internal(format!("failed to encode response: {}", e)))?;
    Ok(buf.freeze())
}

/// Serialize `response` to `writer` and flush it
pub fn write_response(mut writer: impl Write, response: &CodeGeneratorResponse) -> Result<()> {
    let data = encode_response(response)?;
    writer.write_all(&data)?;
    writer.flush()?;
    debug!("Wrote {} response bytes", data.len());
    Ok(())
}

/// Run the whole plugin exchange: read a request, generate, write a response.
///
/// On error nothing is written to `writer`.
pub fn run(reader: impl Read, writer: impl Write) -> Result<()> {
    let request = read_request(reader)?;
    let response = process(&request)?;
    write_response(writer, &response)
}
