//! Descriptor builders shared by the integration tests.

#![allow(dead_code)]

use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
    FileDescriptorProto,
};

pub fn file(name: &str, package: &str) -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some(name.to_string()),
        package: Some(package.to_string()),
        syntax: Some("proto3".to_string()),
        ..Default::default()
    }
}

pub fn message(name: &str) -> DescriptorProto {
    DescriptorProto {
        name: Some(name.to_string()),
        ..Default::default()
    }
}

pub fn enumeration(name: &str, values: &[(&str, i32)]) -> EnumDescriptorProto {
    EnumDescriptorProto {
        name: Some(name.to_string()),
        value: values
            .iter()
            .map(|(name, number)| EnumValueDescriptorProto {
                name: Some(name.to_string()),
                number: Some(*number),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}

fn field(name: &str, json_name: &str, kind: Type, label: Label) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        json_name: Some(json_name.to_string()),
        label: Some(label as i32),
        r#type: Some(kind as i32),
        ..Default::default()
    }
}

pub fn scalar(name: &str, json_name: &str, kind: Type) -> FieldDescriptorProto {
    field(name, json_name, kind, Label::Optional)
}

pub fn repeated(name: &str, json_name: &str, kind: Type) -> FieldDescriptorProto {
    field(name, json_name, kind, Label::Repeated)
}

pub fn reference(name: &str, kind: Type, type_name: &str) -> FieldDescriptorProto {
    FieldDescriptorProto {
        type_name: Some(type_name.to_string()),
        ..field(name, name, kind, Label::Optional)
    }
}

/// Index of `needle` in `haystack`, failing the test if absent
pub fn position(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("missing {:?} in:\n{}", needle, haystack))
}
