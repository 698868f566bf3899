use crate::prelude::*;
use ::sea_orm::{
    sea_query::{Expr, Func, IntoCondition},
    ColumnTrait, Condition, IntoSimpleExpr, Value,
};
use std::ops::Bound;

/// A prefix which has no translation for the type of value.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("Prefix '{prefix}' is not supported for {search_type} values")]
pub struct Unsupported {
    pub search_type: SearchType,
    pub prefix: Prefix,
}

impl From<Number> for Value {
    fn from(value: Number) -> Self {
        match value {
            Number::Integer(value) => value.into(),
            Number::Decimal(value) => value.into(),
        }
    }
}

impl From<DateValue> for Value {
    fn from(value: DateValue) -> Self {
        match value {
            DateValue::Date(value) => value.into(),
            DateValue::DateTime(value) => value.into(),
            DateValue::Zoned(value) => value.into(),
        }
    }
}

/// Translate a query into a condition, all terms must match.
///
/// The `columns` function maps each search field to the column it is stored in.
pub fn translate_query<S, F, C>(query: Query<S>, columns: F) -> Result<Condition, Error>
where
    S: Search,
    F: Fn(S) -> C,
    C: ColumnTrait,
{
    query
        .terms
        .into_iter()
        .try_fold(Condition::all(), |result, term| {
            Ok(result.add(translate_term(term, &columns)?))
        })
}

pub fn translate_term<S, F, C>(term: Term<S>, columns: &F) -> Result<Condition, Error>
where
    S: Search,
    F: Fn(S) -> C,
    C: ColumnTrait,
{
    let Term { field, value } = term;

    translate_value(columns(field), field.precision(), value).map_err(|err| {
        tracing::debug!(parameter = field.name(), %err, "Unable to translate search parameter");
        Error::Unsupported {
            parameter: field.name().to_string(),
            search_type: err.search_type,
            prefix: err.prefix,
        }
    })
}

/// Translate a single value into a condition on a column.
///
/// The precision is only used for date values, and decides between comparing calendar dates
/// or points in time.
pub fn translate_value<C>(
    column: C,
    precision: Precision,
    value: ParsedValue,
) -> Result<Condition, Unsupported>
where
    C: ColumnTrait,
{
    Ok(match value {
        ParsedValue::Number(Parsed::Missing(missing))
        | ParsedValue::Date(Parsed::Missing(missing))
        | ParsedValue::String(Parsed::Missing(missing))
        | ParsedValue::Token(Parsed::Missing(missing))
        | ParsedValue::Reference(Parsed::Missing(missing))
        | ParsedValue::Quantity(Parsed::Missing(missing))
        | ParsedValue::Uri(Parsed::Missing(missing)) => translate_missing(column, missing),

        ParsedValue::Number(Parsed::Value(Ordered { prefix, value })) => {
            translate_number(column, SearchType::Number, prefix, value)?
        }
        // units are not converted, only the number is compared
        ParsedValue::Quantity(Parsed::Value(Ordered { prefix, value })) => {
            translate_number(column, SearchType::Quantity, prefix, value.number)?
        }
        ParsedValue::Date(Parsed::Value(value)) => match precision {
            Precision::Date => translate_date(column, value),
            Precision::Timestamp => translate_timestamp(column, value),
        },

        ParsedValue::String(Parsed::Value(Qualified { modifier, value })) => match modifier {
            None => Expr::expr(Func::lower(column.into_simple_expr()))
                .eq(value.to_lowercase())
                .into_condition(),
            Some(StringModifier::Exact) => column.eq(value).into_condition(),
            Some(StringModifier::Contains) => column.contains(value.as_str()).into_condition(),
        },
        ParsedValue::Token(Parsed::Value(Qualified { modifier, value })) => match modifier {
            Some(TokenModifier::Not) => column.ne(value.code).into_condition(),
            // hierarchy and value set lookups are not available, fall back to the code
            _ => column.eq(value.code).into_condition(),
        },
        ParsedValue::Reference(Parsed::Value(Qualified { value, .. })) => {
            column.eq(value.id).into_condition()
        }
        ParsedValue::Uri(Parsed::Value(Qualified { value, .. })) => {
            column.eq(value).into_condition()
        }
    })
}

fn translate_missing<C>(column: C, missing: bool) -> Condition
where
    C: ColumnTrait,
{
    match missing {
        true => column.is_null().into_condition(),
        false => column.is_not_null().into_condition(),
    }
}

fn translate_number<C>(
    column: C,
    search_type: SearchType,
    prefix: Prefix,
    value: Number,
) -> Result<Condition, Unsupported>
where
    C: ColumnTrait,
{
    let condition = match prefix {
        Prefix::Eq => column.eq(value),
        Prefix::Ne => column.ne(value),
        Prefix::Lt | Prefix::Eb => column.lt(value),
        Prefix::Gt | Prefix::Sa => column.gt(value),
        Prefix::Le => column.lte(value),
        Prefix::Ge => column.gte(value),
        Prefix::Ap => {
            return Err(Unsupported {
                search_type,
                prefix,
            })
        }
    };

    Ok(condition.into_condition())
}

/// Compare on calendar dates, strict comparisons include the day of the value.
fn translate_date<C>(column: C, value: Ordered<DateValue>) -> Condition
where
    C: ColumnTrait,
{
    let date = value.value.date();

    match value.prefix {
        Prefix::Eq => column.eq(date).into_condition(),
        Prefix::Ne => column.ne(date).into_condition(),
        Prefix::Le | Prefix::Lt | Prefix::Eb => column.lte(date).into_condition(),
        Prefix::Ge | Prefix::Gt | Prefix::Sa => column.gte(date).into_condition(),
        Prefix::Ap => translate_range(
            &column,
            included(date.previous_day().map(DateValue::Date)),
            included(date.next_day().map(DateValue::Date)),
        ),
    }
}

/// Compare on points in time, equality matches the whole day of the value.
fn translate_timestamp<C>(column: C, value: Ordered<DateValue>) -> Condition
where
    C: ColumnTrait,
{
    let point = value.value.timestamp();
    let start = value.value.start_of_day();
    let end = start.checked_add_days(1);

    match value.prefix {
        Prefix::Eq => translate_range(
            &column,
            Bound::Included(start),
            end.map_or(Bound::Unbounded, Bound::Excluded),
        ),
        Prefix::Ne => {
            let mut result = Condition::any().add(column.lt(start));
            if let Some(end) = end {
                result = result.add(column.gte(end));
            }
            result
        }
        Prefix::Lt | Prefix::Eb => column.lt(point).into_condition(),
        Prefix::Gt | Prefix::Sa => column.gt(point).into_condition(),
        Prefix::Le => column.lte(point).into_condition(),
        Prefix::Ge => column.gte(point).into_condition(),
        Prefix::Ap => translate_range(
            &column,
            included(point.checked_add_days(-1)),
            included(point.checked_add_days(1)),
        ),
    }
}

fn included<T>(value: Option<T>) -> Bound<T> {
    value.map_or(Bound::Unbounded, Bound::Included)
}

/// Translate a range into a condition, a range included on both ends becomes `BETWEEN`.
fn translate_range<C, T>(column: &C, min: Bound<T>, max: Bound<T>) -> Condition
where
    C: ColumnTrait,
    T: Into<Value>,
{
    match (min, max) {
        (Bound::Included(min), Bound::Included(max)) => column.between(min, max).into_condition(),
        (min, max) => {
            let mut result = Condition::all();
            if let Some(min) =
                translate_bound(min, |value| column.gte(value), |value| column.gt(value))
            {
                result = result.add(min);
            }
            if let Some(max) =
                translate_bound(max, |value| column.lte(value), |value| column.lt(value))
            {
                result = result.add(max);
            }
            result
        }
    }
}

/// Default translation of a value bound into a SeaORM condition.
///
/// This will call either the included or excluded function, or return `None` for an unbounded
/// value.
pub fn translate_bound<T, FI, FIO, FE, FEO>(
    bound: Bound<T>,
    included: FI,
    excluded: FE,
) -> Option<Condition>
where
    T: Into<Value>,
    FI: FnOnce(Value) -> FIO,
    FIO: IntoCondition,
    FE: FnOnce(Value) -> FEO,
    FEO: IntoCondition,
{
    match bound {
        Bound::Unbounded => None,
        Bound::Included(value) => Some(included(value.into()).into_condition()),
        Bound::Excluded(value) => Some(excluded(value.into()).into_condition()),
    }
}
