use crate::hir::{Parameter, Query};
use chumsky::prelude::*;

pub fn name<'a>() -> impl Parser<'a, &'a str, &'a str, extra::Err<Simple<'a, char>>> {
    any()
        .filter(|c: &char| !matches!(c, ':' | '=' | '&'))
        .repeated()
        .at_least(1)
        .to_slice()
}

pub fn modifier<'a>() -> impl Parser<'a, &'a str, &'a str, extra::Err<Simple<'a, char>>> {
    just(':').ignore_then(
        any()
            .filter(|c: &char| !matches!(c, ':' | '=' | '&'))
            .repeated()
            .at_least(1)
            .to_slice(),
    )
}

pub fn value<'a>() -> impl Parser<'a, &'a str, &'a str, extra::Err<Simple<'a, char>>> {
    any()
        .filter(|c: &char| c != &'&')
        .repeated()
        .to_slice()
}

pub fn parameter<'a>() -> impl Parser<'a, &'a str, Parameter<'a>, extra::Err<Simple<'a, char>>> {
    name()
        .then(modifier().or_not())
        .then_ignore(just('='))
        .then(value())
        .map(|((name, modifier), value)| Parameter {
            name,
            modifier,
            value,
        })
}

/// Parse a (decoded) query string like `family:exact=Reed&birthdate=lt1970`.
pub fn parser<'a>() -> impl Parser<'a, &'a str, Query<'a>, extra::Err<Simple<'a, char>>> {
    just('?')
        .or_not()
        .ignore_then(
            parameter()
                .separated_by(just('&'))
                .allow_trailing()
                .collect::<Vec<_>>(),
        )
        .then_ignore(end())
        .map(|parameters| Query { parameters })
}
