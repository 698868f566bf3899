use fhir_search::chumsky::Parser;
use fhir_search::{parser::parser, sea_orm::translate_query};
use sea_orm::{DbBackend, EntityTrait, QueryFilter, QueryTrait};
use tracing_subscriber::EnvFilter;

include!("../tests/resource.rs");

mod patients {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "patients")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub identifier: Option<String>,
        pub active: Option<bool>,
        pub given_name: Option<String>,
        pub family_name: Option<String>,
        pub gender: Option<String>,
        pub birth_date: Option<TimeDate>,
        pub general_practitioner: Option<String>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let query = std::env::args().skip(1).collect::<Vec<_>>().join("&");
    println!("Input: '{query}'");

    let hir = parser()
        .parse(query.as_str())
        .into_result()
        .expect("Failed to parse query string");
    println!("\nHIR:\n{hir:#?}");

    let query = Query::<PatientSearch>::parse_from(hir, &R4)
        .expect("Failed to parse search parameters");
    println!("\nLIR:\n{query:#?}");

    let condition = translate_query(query, |field| match field {
        PatientSearch::Id => patients::Column::Id,
        PatientSearch::Identifier => patients::Column::Identifier,
        PatientSearch::Active => patients::Column::Active,
        PatientSearch::Given => patients::Column::GivenName,
        PatientSearch::Family => patients::Column::FamilyName,
        PatientSearch::Gender => patients::Column::Gender,
        PatientSearch::BirthDate => patients::Column::BirthDate,
        PatientSearch::GeneralPractitioner => patients::Column::GeneralPractitioner,
    })
    .expect("Failed to translate query");

    let sql = patients::Entity::find()
        .filter(condition)
        .build(DbBackend::Sqlite)
        .to_string();
    println!("\nSQL:\n{sql}");
}
