use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput, Lit, Meta, NestedMeta};

/// Implements `DbTable` for a struct. The table name is the lowercased struct name with an `s`
/// appended, unless overridden with `#[db_table(plural = "...")]`.
#[proc_macro_derive(DbTable, attributes(db_table))]
pub fn derive_db_table(input: TokenStream) -> TokenStream {
    let DeriveInput { ident, attrs, .. } = parse_macro_input!(input);
    let mut plural = ident.to_string().to_lowercase() + "s";
    for attr in attrs.iter().filter(|attr| attr.path.is_ident("db_table")) {
        let list = match attr.parse_meta() {
            Ok(Meta::List(list)) => list,
            Ok(other) => {
                return syn::Error::new_spanned(other, "expected #[db_table(plural = \"...\")]")
                    .to_compile_error()
                    .into()
            }
            Err(e) => return e.to_compile_error().into(),
        };
        for nested in list.nested {
            match nested {
                NestedMeta::Meta(Meta::NameValue(nv)) if nv.path.is_ident("plural") => {
                    match nv.lit {
                        Lit::Str(s) => plural = s.value(),
                        other => {
                            return syn::Error::new_spanned(other, "plural has to be a string")
                                .to_compile_error()
                                .into()
                        }
                    }
                }
                other => {
                    return syn::Error::new_spanned(other, "unknown db_table option")
                        .to_compile_error()
                        .into()
                }
            }
        }
    }
    quote! {
        impl DbTable for #ident {
            const TABLE_NAME: &'static str = #plural;
        }
    }
    .into()
}
