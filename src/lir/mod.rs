mod number;
mod time;
mod token;

pub use self::number::*;
pub use self::time::*;
pub use self::token::*;

use crate::hir;
use crate::mir::{Modifier, Precision, Prefix, SearchType};
use crate::parser::parser;
use crate::resource_types::{ResourceTypes, R4};
use chumsky::Parser;
use std::fmt::{Display, Formatter};

/// Failure of a single value, without knowing the parameter it belongs to.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    /// The modifier is not legal for the type, or `:missing` did not get a boolean.
    #[error("Invalid modifier: {0}")]
    InvalidModifier(String),
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Parser error: {0}")]
    Parser(String),
    #[error("Unknown search parameter: {0}")]
    UnknownParameter(String),
    #[error("Invalid search parameter '{parameter}': {error}")]
    Parameter {
        parameter: String,
        #[source]
        error: ValueError,
    },
    #[error("Prefix '{prefix}' is not supported for {search_type} parameter '{parameter}'")]
    Unsupported {
        parameter: String,
        search_type: SearchType,
        prefix: Prefix,
    },
}

/// A value, or the `:missing` flag which replaces it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Parsed<T> {
    /// `true`: the field must be absent, `false`: the field must be present.
    Missing(bool),
    Value(T),
}

impl<T> Parsed<T> {
    pub fn map<U, F>(self, f: F) -> Parsed<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Missing(missing) => Parsed::Missing(missing),
            Self::Value(value) => Parsed::Value(f(value)),
        }
    }

    fn try_map<U, F>(self, f: F) -> Result<Parsed<U>, ValueError>
    where
        F: FnOnce(T) -> Result<U, ValueError>,
    {
        Ok(match self {
            Self::Missing(missing) => Parsed::Missing(missing),
            Self::Value(value) => Parsed::Value(f(value)?),
        })
    }
}

impl<T: Display> Display for Parsed<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing(missing) => write!(f, "{missing}"),
            Self::Value(value) => write!(f, "{value}"),
        }
    }
}

/// A value with a comparison prefix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ordered<T> {
    pub prefix: Prefix,
    pub value: T,
}

impl<T: Display> Display for Ordered<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.prefix, self.value)
    }
}

/// A value with an optional, type specific, modifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Qualified<T, M> {
    pub modifier: Option<M>,
    pub value: T,
}

impl<T: Display, M> Display for Qualified<T, M> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

macro_rules! type_modifier {
    ($n:ident { $($variant:ident),* $(,)? }) => {
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
        pub enum $n {
            $($variant),*
        }

        impl TryFrom<Modifier> for $n {
            type Error = Modifier;

            fn try_from(value: Modifier) -> Result<Self, Self::Error> {
                match value {
                    $(Modifier::$variant => Ok(Self::$variant),)*
                    other => Err(other),
                }
            }
        }

        impl From<$n> for Modifier {
            fn from(value: $n) -> Self {
                match value {
                    $($n::$variant => Modifier::$variant),*
                }
            }
        }
    };
}

type_modifier!(StringModifier { Exact, Contains });
type_modifier!(TokenModifier {
    Text,
    Not,
    In,
    NotIn,
    Below,
    Above
});
type_modifier!(ReferenceModifier {
    Identifier,
    Above,
    Below
});
type_modifier!(UriModifier { Above, Below });

/// Types which only know `:missing`.
enum Unmodified {}

impl TryFrom<Modifier> for Unmodified {
    type Error = Modifier;

    fn try_from(value: Modifier) -> Result<Self, Self::Error> {
        Err(value)
    }
}

/// Resolve the modifier of a parameter, handling `:missing`.
fn select<M>(modifier: Option<&str>, value: &str) -> Result<Parsed<Option<M>>, ValueError>
where
    M: TryFrom<Modifier>,
{
    let Some(name) = modifier else {
        return Ok(Parsed::Value(None));
    };

    let modifier = name
        .parse::<Modifier>()
        .map_err(|_| ValueError::InvalidModifier(name.to_string()))?;

    match modifier {
        Modifier::Missing => match value {
            "true" => Ok(Parsed::Missing(true)),
            "false" => Ok(Parsed::Missing(false)),
            _ => Err(ValueError::InvalidModifier(format!("{modifier}={value}"))),
        },
        modifier => M::try_from(modifier)
            .map(|modifier| Parsed::Value(Some(modifier)))
            .map_err(|_| ValueError::InvalidModifier(name.to_string())),
    }
}

/// The typed value of a single search parameter occurrence.
#[derive(Clone, Debug, PartialEq)]
pub enum ParsedValue {
    Number(Parsed<Ordered<Number>>),
    Date(Parsed<Ordered<DateValue>>),
    String(Parsed<Qualified<String, StringModifier>>),
    Token(Parsed<Qualified<Token, TokenModifier>>),
    Reference(Parsed<Qualified<Reference, ReferenceModifier>>),
    Quantity(Parsed<Ordered<Quantity>>),
    Uri(Parsed<Qualified<String, UriModifier>>),
}

impl ParsedValue {
    /// Parse a raw value as the given search type.
    pub fn parse<R>(
        search_type: SearchType,
        modifier: Option<&str>,
        value: &str,
        resource_types: &R,
    ) -> Result<Self, ValueError>
    where
        R: ResourceTypes + ?Sized,
    {
        match search_type {
            SearchType::Number => Self::number(modifier, value),
            SearchType::Date => Self::date(modifier, value),
            SearchType::String => Self::string(modifier, value),
            SearchType::Token => Self::token(modifier, value),
            SearchType::Reference => Self::reference(resource_types, modifier, value),
            SearchType::Quantity => Self::quantity(modifier, value),
            SearchType::Uri => Self::uri(modifier, value),
        }
    }

    pub fn number(modifier: Option<&str>, value: &str) -> Result<Self, ValueError> {
        select::<Unmodified>(modifier, value)?
            .try_map(|_| {
                let (prefix, number) = Prefix::split(value);
                Ok(Ordered {
                    prefix,
                    value: Number::parse(number)?,
                })
            })
            .map(Self::Number)
    }

    pub fn date(modifier: Option<&str>, value: &str) -> Result<Self, ValueError> {
        select::<Unmodified>(modifier, value)?
            .try_map(|_| {
                let (prefix, date) = Prefix::split(value);
                Ok(Ordered {
                    prefix,
                    value: DateValue::parse(date)?,
                })
            })
            .map(Self::Date)
    }

    pub fn string(modifier: Option<&str>, value: &str) -> Result<Self, ValueError> {
        select::<StringModifier>(modifier, value)?
            .try_map(|modifier| {
                Ok(Qualified {
                    modifier,
                    value: value.to_string(),
                })
            })
            .map(Self::String)
    }

    pub fn token(modifier: Option<&str>, value: &str) -> Result<Self, ValueError> {
        select::<TokenModifier>(modifier, value)?
            .try_map(|modifier| {
                Ok(Qualified {
                    modifier,
                    value: Token::parse(value)?,
                })
            })
            .map(Self::Token)
    }

    /// Parse a reference, a known resource type is accepted in place of a modifier.
    pub fn reference<R>(
        resource_types: &R,
        modifier: Option<&str>,
        value: &str,
    ) -> Result<Self, ValueError>
    where
        R: ResourceTypes + ?Sized,
    {
        let (value, modifier) = disambiguate(resource_types, modifier, value);

        select::<ReferenceModifier>(modifier, &value)?
            .try_map(|modifier| {
                Ok(Qualified {
                    modifier,
                    value: Reference::parse(&value)?,
                })
            })
            .map(Self::Reference)
    }

    pub fn quantity(modifier: Option<&str>, value: &str) -> Result<Self, ValueError> {
        select::<Unmodified>(modifier, value)?
            .try_map(|_| Quantity::parse(value))
            .map(Self::Quantity)
    }

    pub fn uri(modifier: Option<&str>, value: &str) -> Result<Self, ValueError> {
        select::<UriModifier>(modifier, value)?
            .try_map(|modifier| {
                Ok(Qualified {
                    modifier,
                    value: value.to_string(),
                })
            })
            .map(Self::Uri)
    }

    pub fn search_type(&self) -> SearchType {
        match self {
            Self::Number(_) => SearchType::Number,
            Self::Date(_) => SearchType::Date,
            Self::String(_) => SearchType::String,
            Self::Token(_) => SearchType::Token,
            Self::Reference(_) => SearchType::Reference,
            Self::Quantity(_) => SearchType::Quantity,
            Self::Uri(_) => SearchType::Uri,
        }
    }

    /// The modifier, as it would appear on the parameter name.
    pub fn modifier(&self) -> Option<Modifier> {
        fn ordered<T>(value: &Parsed<Ordered<T>>) -> Option<Modifier> {
            match value {
                Parsed::Missing(_) => Some(Modifier::Missing),
                Parsed::Value(_) => None,
            }
        }

        fn qualified<T, M>(value: &Parsed<Qualified<T, M>>) -> Option<Modifier>
        where
            M: Copy + Into<Modifier>,
        {
            match value {
                Parsed::Missing(_) => Some(Modifier::Missing),
                Parsed::Value(value) => value.modifier.map(Into::into),
            }
        }

        match self {
            Self::Number(value) => ordered(value),
            Self::Date(value) => ordered(value),
            Self::String(value) => qualified(value),
            Self::Token(value) => qualified(value),
            Self::Reference(value) => qualified(value),
            Self::Quantity(value) => ordered(value),
            Self::Uri(value) => qualified(value),
        }
    }

    /// The prefix of an ordered value.
    pub fn prefix(&self) -> Option<Prefix> {
        match self {
            Self::Number(Parsed::Value(value)) => Some(value.prefix),
            Self::Date(Parsed::Value(value)) => Some(value.prefix),
            Self::Quantity(Parsed::Value(value)) => Some(value.prefix),
            _ => None,
        }
    }
}

/// Renders the value part of the parameter, the modifier is available through
/// [`ParsedValue::modifier`].
impl Display for ParsedValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Date(value) => write!(f, "{value}"),
            Self::String(value) => write!(f, "{value}"),
            Self::Token(value) => write!(f, "{value}"),
            Self::Reference(value) => write!(f, "{value}"),
            Self::Quantity(value) => write!(f, "{value}"),
            Self::Uri(value) => write!(f, "{value}"),
        }
    }
}

/// The search fields of a resource.
pub trait Search: Sized + Copy {
    fn from_name(name: &str) -> Option<Self>;

    fn name(&self) -> &'static str;

    fn search_type(&self) -> SearchType;

    /// Storage precision of the field, only relevant for date fields.
    fn precision(&self) -> Precision {
        Precision::default()
    }

    fn parse(query: &str) -> Result<Query<Self>, Error> {
        Self::parse_with(query, &R4)
    }

    fn parse_with<R>(query: &str, resource_types: &R) -> Result<Query<Self>, Error>
    where
        R: ResourceTypes + ?Sized,
    {
        let query = parser().parse(query).into_result().map_err(|errors| {
            Error::Parser(
                errors
                    .iter()
                    .map(|err| format!("{err:?}"))
                    .collect::<Vec<_>>()
                    .join(", "),
            )
        })?;

        Query::parse_from(query, resource_types)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Term<S> {
    pub field: S,
    pub value: ParsedValue,
}

/// A conjunction of parsed parameters, in the order of the request.
#[derive(Clone, Debug, PartialEq)]
pub struct Query<S> {
    pub terms: Vec<Term<S>>,
}

impl<S> Default for Query<S> {
    fn default() -> Self {
        Self { terms: vec![] }
    }
}

impl<S> Query<S>
where
    S: Search,
{
    pub fn parse_from<R>(query: hir::Query<'_>, resource_types: &R) -> Result<Self, Error>
    where
        R: ResourceTypes + ?Sized,
    {
        query
            .parameters
            .into_iter()
            .map(|parameter| Self::parse_parameter(parameter, resource_types))
            .collect::<Result<Vec<_>, _>>()
            .map(|terms| Self { terms })
    }

    /// Assemble a query from decoded `(name[:modifier], value)` pairs, as provided by most HTTP
    /// frameworks.
    pub fn from_pairs<'a, I, R>(pairs: I, resource_types: &R) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
        R: ResourceTypes + ?Sized,
    {
        Self::parse_from(
            hir::Query {
                parameters: pairs
                    .into_iter()
                    .map(|(key, value)| hir::Parameter::from_pair(key, value))
                    .collect(),
            },
            resource_types,
        )
    }

    fn parse_parameter<R>(
        parameter: hir::Parameter<'_>,
        resource_types: &R,
    ) -> Result<Term<S>, Error>
    where
        R: ResourceTypes + ?Sized,
    {
        let Some(field) = S::from_name(parameter.name) else {
            tracing::debug!(parameter = parameter.name, "Unknown search parameter");
            return Err(Error::UnknownParameter(parameter.name.to_string()));
        };

        let value = ParsedValue::parse(
            field.search_type(),
            parameter.modifier,
            parameter.value,
            resource_types,
        )
        .map_err(|error| {
            tracing::debug!(parameter = parameter.name, %error, "Invalid search parameter");
            Error::Parameter {
                parameter: parameter.name.to_string(),
                error,
            }
        })?;

        tracing::debug!(
            parameter = parameter.name,
            search_type = %field.search_type(),
            modifier = ?value.modifier(),
            "Parsed search parameter"
        );

        Ok(Term { field, value })
    }

    pub fn and(mut self, other: Query<S>) -> Self {
        self.terms.extend(other.terms);
        self
    }
}
