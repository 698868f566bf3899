use convert_case::{Case, Casing};
use darling::util::Flag;
use darling::FromVariant;
use proc_macro2::{Ident, TokenStream};
use quote::quote;
use syn::{parse_macro_input, Data, DataEnum, DeriveInput};

#[proc_macro_derive(Search, attributes(search))]
pub fn derive(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let DeriveInput {
        ident,
        data,
        generics,
        ..
    } = parse_macro_input!(input as DeriveInput);

    if !generics.params.is_empty() {
        panic!("Derive can only be used on enum types without generics");
    }

    let data = match data {
        Data::Enum(data) => data,
        _ => panic!("Derive can only be used on enum types"),
    };

    let fields = collect(&data);
    let expanded = expand_search(&ident, &fields);

    proc_macro::TokenStream::from(expanded)
}

fn expand_search(ident: &Ident, fields: &[Field]) -> TokenStream {
    let match_names = fields.iter().map(|field| {
        let name = &field.name;
        let ident = &field.ident;
        quote! {
            #name => Self::#ident
        }
    });

    let names = fields.iter().map(|field| {
        let name = &field.name;
        let ident = &field.ident;
        quote! {
            Self::#ident => #name
        }
    });

    let search_types = fields.iter().map(|field| {
        let ident = &field.ident;
        let search_type = &field.search_type;
        quote! {
            Self::#ident => fhir_search::mir::SearchType::#search_type
        }
    });

    let precisions = fields.iter().map(|field| {
        let ident = &field.ident;
        match field.date_only {
            true => quote! { Self::#ident => fhir_search::mir::Precision::Date },
            false => quote! { Self::#ident => fhir_search::mir::Precision::Timestamp },
        }
    });

    quote! {
        impl fhir_search::lir::Search for #ident {
            fn from_name(name: &str) -> Option<Self> {
                Some(match name {
                    #(#match_names, )*
                    _ => return None,
                })
            }

            fn name(&self) -> &'static str {
                match *self {
                    #(#names, )*
                }
            }

            fn search_type(&self) -> fhir_search::mir::SearchType {
                match *self {
                    #(#search_types, )*
                }
            }

            fn precision(&self) -> fhir_search::mir::Precision {
                match *self {
                    #(#precisions, )*
                }
            }
        }
    }
}

struct Field {
    ident: Ident,
    name: String,
    search_type: Ident,
    date_only: bool,
}

#[derive(FromVariant, Default)]
#[darling(default, attributes(search))]
struct VariantOpts {
    number: Flag,
    date: Flag,
    string: Flag,
    token: Flag,
    reference: Flag,
    quantity: Flag,
    uri: Flag,

    /// A date field without a time of day
    date_only: Flag,
    /// Parameter name, instead of the kebab cased variant name
    rename: Option<String>,
}

impl VariantOpts {
    fn search_type(&self) -> Option<&'static str> {
        let types = [
            (self.number.is_present(), "Number"),
            (self.date.is_present(), "Date"),
            (self.string.is_present(), "String"),
            (self.token.is_present(), "Token"),
            (self.reference.is_present(), "Reference"),
            (self.quantity.is_present(), "Quantity"),
            (self.uri.is_present(), "Uri"),
        ];

        let mut selected = types
            .into_iter()
            .filter_map(|(present, name)| present.then_some(name));

        match (selected.next(), selected.next()) {
            (Some(name), None) => Some(name),
            _ => None,
        }
    }
}

fn collect(data: &DataEnum) -> Vec<Field> {
    let mut fields = vec![];

    for variant in &data.variants {
        if !variant.fields.is_empty() {
            panic!("Variant '{}' must not have fields", variant.ident);
        }

        let opts = VariantOpts::from_variant(variant).expect("Unable to parse variant options");

        let search_type = opts.search_type().unwrap_or_else(|| {
            panic!(
                "Variant '{}' must have exactly one search type: number, date, string, token, reference, quantity or uri",
                variant.ident
            )
        });

        let date_only = opts.date_only.is_present();
        if date_only && search_type != "Date" {
            panic!("Variant '{}' can only be 'date_only' for date fields", variant.ident);
        }

        let name = match opts.rename {
            Some(name) => name,
            None => variant.ident.to_string().to_case(Case::Kebab),
        };

        fields.push(Field {
            ident: variant.ident.clone(),
            name,
            search_type: Ident::new(search_type, variant.ident.span()),
            date_only,
        });
    }

    fields
}
