//! JVM method descriptor parsing.
//!
//! Descriptors such as `(ILjava/lang/String;[J)V` encode the argument and
//! return types of a method. The filters only need the arity, but parsing the
//! whole thing lets malformed descriptors be rejected rather than miscounted.

use std::fmt;
use std::str::Chars;

use serde::Serialize;

use crate::core::{Error, Result};

/// A single field type inside a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
    Boolean,
    /// Reference type by internal name, e.g. `java/lang/String`.
    Object(String),
    Array(Box<FieldType>),
}

impl FieldType {
    fn parse(descriptor: &str, chars: &mut Chars<'_>) -> Result<Self> {
        let tag = chars
            .next()
            .ok_or_else(|| Error::descriptor(descriptor, "unexpected end of descriptor"))?;
        let field = match tag {
            'B' => FieldType::Byte,
            'C' => FieldType::Char,
            'D' => FieldType::Double,
            'F' => FieldType::Float,
            'I' => FieldType::Int,
            'J' => FieldType::Long,
            'S' => FieldType::Short,
            'Z' => FieldType::Boolean,
            'L' => {
                let rest = chars.as_str();
                let end = rest
                    .find(';')
                    .ok_or_else(|| Error::descriptor(descriptor, "unterminated class name"))?;
                if end == 0 {
                    return Err(Error::descriptor(descriptor, "empty class name"));
                }
                let name = rest[..end].to_string();
                *chars = rest[end + 1..].chars();
                FieldType::Object(name)
            }
            '[' => FieldType::Array(Box::new(FieldType::parse(descriptor, chars)?)),
            other => {
                return Err(Error::descriptor(
                    descriptor,
                    format!("unexpected type tag '{other}'"),
                ))
            }
        };
        Ok(field)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Byte => f.write_str("B"),
            FieldType::Char => f.write_str("C"),
            FieldType::Double => f.write_str("D"),
            FieldType::Float => f.write_str("F"),
            FieldType::Int => f.write_str("I"),
            FieldType::Long => f.write_str("J"),
            FieldType::Short => f.write_str("S"),
            FieldType::Boolean => f.write_str("Z"),
            FieldType::Object(name) => write!(f, "L{name};"),
            FieldType::Array(inner) => write!(f, "[{inner}"),
        }
    }
}

/// Parsed method descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodDescriptor {
    /// Argument types in declaration order.
    pub arguments: Vec<FieldType>,
    /// Return type; `None` for `void`.
    pub return_type: Option<FieldType>,
}

impl MethodDescriptor {
    /// Parse a descriptor string.
    pub fn parse(descriptor: &str) -> Result<Self> {
        let mut chars = descriptor.chars();
        if chars.next() != Some('(') {
            return Err(Error::descriptor(descriptor, "must start with '('"));
        }

        let mut arguments = Vec::new();
        loop {
            match chars.clone().next() {
                Some(')') => {
                    chars.next();
                    break;
                }
                Some(_) => arguments.push(FieldType::parse(descriptor, &mut chars)?),
                None => return Err(Error::descriptor(descriptor, "missing ')'")),
            }
        }

        let return_type = if chars.as_str() == "V" {
            chars.next();
            None
        } else {
            Some(FieldType::parse(descriptor, &mut chars)?)
        };

        if !chars.as_str().is_empty() {
            return Err(Error::descriptor(
                descriptor,
                format!("trailing characters {:?}", chars.as_str()),
            ));
        }

        Ok(Self {
            arguments,
            return_type,
        })
    }

    /// Number of declared arguments.
    pub fn arity(&self) -> usize {
        self.arguments.len()
    }
}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for arg in &self.arguments {
            write!(f, "{arg}")?;
        }
        f.write_str(")")?;
        match &self.return_type {
            Some(ret) => write!(f, "{ret}"),
            None => f.write_str("V"),
        }
    }
}

/// Count the arguments of a descriptor.
pub fn argument_count(descriptor: &str) -> Result<usize> {
    MethodDescriptor::parse(descriptor).map(|d| d.arity())
}
