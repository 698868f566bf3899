use super::ValueError;
use crate::resource_types::ResourceTypes;
use std::borrow::Cow;
use std::fmt::{Display, Formatter};

/// A token: `[system|]code`. Without a pipe, the system is empty.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Token {
    pub system: String,
    pub code: String,
}

impl Token {
    pub fn parse(value: &str) -> Result<Self, ValueError> {
        match value.split('|').collect::<Vec<_>>().as_slice() {
            [code] => Ok(Self {
                system: String::new(),
                code: code.to_string(),
            }),
            [system, code] => Ok(Self {
                system: system.to_string(),
                code: code.to_string(),
            }),
            _ => Err(ValueError::InvalidValue(value.to_string())),
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if !self.system.is_empty() {
            write!(f, "{}|", self.system)?;
        }
        f.write_str(&self.code)
    }
}

/// A reference: `[type/]id`.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Reference {
    pub resource_type: Option<String>,
    pub id: String,
}

impl Reference {
    pub fn parse(value: &str) -> Result<Self, ValueError> {
        match value.split('/').collect::<Vec<_>>().as_slice() {
            [id] => Ok(Self {
                resource_type: None,
                id: id.to_string(),
            }),
            [resource_type, id] => Ok(Self {
                resource_type: Some(resource_type.to_string()),
                id: id.to_string(),
            }),
            _ => Err(ValueError::InvalidValue(value.to_string())),
        }
    }
}

impl Display for Reference {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if let Some(resource_type) = &self.resource_type {
            write!(f, "{resource_type}/")?;
        }
        f.write_str(&self.id)
    }
}

/// Turn a resource type used as modifier into a typed value: `subject:Patient=23` becomes
/// `subject=Patient/23`.
///
/// Any other modifier is returned as it is.
pub fn disambiguate<'v, R>(
    resource_types: &R,
    modifier: Option<&'v str>,
    value: &'v str,
) -> (Cow<'v, str>, Option<&'v str>)
where
    R: ResourceTypes + ?Sized,
{
    match modifier {
        Some(resource_type) if resource_types.contains(resource_type) => {
            (Cow::Owned(format!("{resource_type}/{value}")), None)
        }
        _ => (Cow::Borrowed(value), modifier),
    }
}
