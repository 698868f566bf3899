pub mod hir;
pub mod lir;
pub mod mir;
pub mod parser;
pub mod resource_types;

#[cfg(feature = "sea-orm")]
pub mod sea_orm;

pub mod prelude {
    pub use crate::lir::*;
    pub use crate::mir::{Modifier, Precision, Prefix, SearchType};
    pub use crate::parser::parser;
    pub use crate::resource_types::{ResourceTypes, R4};
    pub use fhir_search_macros::Search;
}

pub use fhir_search_macros::Search;

pub use ::chumsky;
