//! Record derive implementation
//!
//! Generates `xsql::Record::fields` for structs with named fields, one
//! descriptor per field in declaration order.

use proc_macro::TokenStream;
use proc_macro2::{Ident, TokenStream as TokenStream2};
use quote::quote;
use syn::{
    ext::IdentExt,
    parse::{ParseStream, Result},
    parse_macro_input, Attribute, Data, DeriveInput, Error, Fields, LitStr, Token,
};

/// Main implementation function for the Record derive
pub fn record_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand_record(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Field information extracted from the struct definition
struct FieldInfo {
    ident: Ident,
    /// Raw tag, `None` when the field carries no `#[xsql]` attribute
    tag: Option<LitStr>,
}

impl FieldInfo {
    /// Whether the field can ever be written. Mirrors `FieldTag::parse`.
    fn is_mapped(&self) -> bool {
        match &self.tag {
            Some(tag) => !matches!(tag.value().as_str(), "" | "-" | "_"),
            None => false,
        }
    }
}

fn expand_record(input: &DeriveInput) -> Result<TokenStream2> {
    let fields = extract_fields(input)?;
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let descriptors = fields.iter().map(generate_descriptor);

    Ok(quote! {
        impl #impl_generics ::xsql::record::Record for #name #ty_generics #where_clause {
            fn fields() -> ::std::vec::Vec<::xsql::record::FieldDescriptor<Self>> {
                ::std::vec![#(#descriptors),*]
            }
        }
    })
}

fn extract_fields(input: &DeriveInput) -> Result<Vec<FieldInfo>> {
    let data = match &input.data {
        Data::Struct(data) => data,
        _ => {
            return Err(Error::new_spanned(
                &input.ident,
                "#[derive(Record)] can only be applied to structs",
            ))
        }
    };

    let named = match &data.fields {
        Fields::Named(named) => named,
        _ => {
            return Err(Error::new_spanned(
                &input.ident,
                "#[derive(Record)] requires a struct with named fields",
            ))
        }
    };

    named
        .named
        .iter()
        .map(|field| {
            let ident = field
                .ident
                .clone()
                .ok_or_else(|| Error::new_spanned(field, "Expected a named field"))?;
            let tag = parse_tag(&field.attrs)?;
            Ok(FieldInfo { ident, tag })
        })
        .collect()
}

/// Read the `#[xsql(...)]` attribute of a field, if any
fn parse_tag(attrs: &[Attribute]) -> Result<Option<LitStr>> {
    let mut tag = None;

    for attr in attrs.iter().filter(|a| a.path().is_ident("xsql")) {
        if tag.is_some() {
            return Err(Error::new_spanned(attr, "Duplicate #[xsql] attribute"));
        }
        tag = Some(attr.parse_args_with(parse_tag_args)?);
    }

    Ok(tag)
}

/// Accepts `"column"` or `column = "column"`
fn parse_tag_args(input: ParseStream) -> Result<LitStr> {
    if input.peek(LitStr) {
        return input.parse();
    }

    let key: Ident = input.parse()?;
    if key != "column" {
        return Err(Error::new_spanned(
            &key,
            "Expected #[xsql(\"column\")] or #[xsql(column = \"column\")]",
        ));
    }
    input.parse::<Token![=]>()?;
    input.parse()
}

fn generate_descriptor(field: &FieldInfo) -> TokenStream2 {
    let ident = &field.ident;
    let name = ident.unraw().to_string();

    // Unmapped fields get a no-op setter so their type needs no Coerce impl
    let setter = if field.is_mapped() {
        quote! {
            |record: &mut Self, value: &::xsql::coerce::TypedValue<'_>| -> ::xsql::error::FetchResult<()> {
                record.#ident = ::xsql::record::Coerce::coerce(value)?;
                ::std::result::Result::Ok(())
            }
        }
    } else {
        quote! {
            |_: &mut Self, _: &::xsql::coerce::TypedValue<'_>| -> ::xsql::error::FetchResult<()> {
                ::std::result::Result::Ok(())
            }
        }
    };

    match &field.tag {
        Some(tag) => quote! {
            ::xsql::record::FieldDescriptor::new(#name, #tag, #setter)
        },
        None => quote! {
            ::xsql::record::FieldDescriptor::untagged(#name, #setter)
        },
    }
}
