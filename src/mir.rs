use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Error returned when a vocabulary term is not known.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind}: {value}")]
pub struct UnknownTerm {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! vocabulary {
    ($(#[$meta:meta])* $n:ident($kind:literal) { $($variant:ident => $term:literal),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
        pub enum $n {
            $($variant),*
        }

        impl $n {
            pub const ALL: &'static [$n] = &[$($n::$variant),*];

            pub const fn as_str(&self) -> &'static str {
                match self {
                    $($n::$variant => $term),*
                }
            }
        }

        impl Display for $n {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $n {
            type Err = UnknownTerm;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($term => Ok($n::$variant),)*
                    _ => Err(UnknownTerm {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

vocabulary!(
    /// Comparison prefix of an ordered value, like the `lt` in `birthdate=lt1970`.
    Prefix("prefix") {
        Eq => "eq",
        Ne => "ne",
        Gt => "gt",
        Lt => "lt",
        Ge => "ge",
        Le => "le",
        Sa => "sa",
        Eb => "eb",
        Ap => "ap",
    }
);

impl Default for Prefix {
    fn default() -> Self {
        Self::Eq
    }
}

impl Prefix {
    /// Split a leading prefix from a value, falling back to [`Prefix::Eq`] and the full value.
    pub fn split(value: &str) -> (Self, &str) {
        match value.get(..2).and_then(|prefix| prefix.parse().ok()) {
            Some(prefix) => (prefix, &value[2..]),
            None => (Self::default(), value),
        }
    }
}

vocabulary!(
    /// Modifier of a parameter name, like the `exact` in `family:exact=Reed`.
    Modifier("modifier") {
        Missing => "missing",
        Exact => "exact",
        Contains => "contains",
        Text => "text",
        Not => "not",
        In => "in",
        NotIn => "not-in",
        Below => "below",
        Above => "above",
        Identifier => "identifier",
    }
);

vocabulary!(
    SearchType("search type") {
        Number => "number",
        Date => "date",
        String => "string",
        Token => "token",
        Reference => "reference",
        Quantity => "quantity",
        Uri => "uri",
    }
);

impl SearchType {
    /// The modifiers a parameter of this type accepts.
    ///
    /// Reference parameters additionally accept resource type names, which are not part of the
    /// vocabulary.
    pub const fn modifiers(&self) -> &'static [Modifier] {
        use Modifier::*;
        match self {
            Self::Number | Self::Date | Self::Quantity => &[Missing],
            Self::String => &[Missing, Exact, Contains],
            Self::Token => &[Missing, Text, Not, In, NotIn, Below, Above],
            Self::Reference => &[Missing, Identifier, Above, Below],
            Self::Uri => &[Missing, Above, Below],
        }
    }

    pub fn allows(&self, modifier: Modifier) -> bool {
        self.modifiers().contains(&modifier)
    }
}

/// Storage precision of a date field.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Precision {
    /// Calendar date only, no time of day.
    Date,
    #[default]
    Timestamp,
}
