use proc_macro::TokenStream;
use quote::quote;

fn get_enum_variants(
    input: &syn::DeriveInput,
) -> &syn::punctuated::Punctuated<syn::Variant, syn::token::Comma> {
    let variants = match &input.data {
        syn::Data::Enum(enum_item) => &enum_item.variants,
        _ => panic!("EnumFromStr can only be derived for enums."),
    };

    assert!(
        variants.iter().all(|v| v.fields.is_empty()),
        "All variants must have no fields."
    );

    variants
}

/// Derives a case-insensitive `EnumFromStr` (and `std::str::FromStr`) impl
/// that matches a variant's identifier against the input, ignoring ASCII
/// case. Used for the opcode mnemonics and type-tag keywords that the XML
/// wire format spells in a fixed case the interpreter must accept regardless
/// of how the producer capitalized it.
#[proc_macro_derive(EnumFromStr)]
pub fn enum_from_str_derive(input: TokenStream) -> TokenStream {
    let syn_item: syn::DeriveInput = syn::parse(input).unwrap();
    let name = &syn_item.ident;
    let name_str = name.to_string();
    let variants = get_enum_variants(&syn_item);
    let literals = variants.iter().map(|v| v.ident.to_string().to_ascii_uppercase());
    let identifiers = variants.iter().map(|v| &v.ident);

    let expanded = quote! {
        impl ::util::EnumFromStr for #name {
            fn from_str(s: &str) -> ::std::result::Result<#name, ::util::ParseEnumError> {
                let upper = s.to_ascii_uppercase();
                match upper.as_str() {
                    #( #literals => Ok(#name::#identifiers), )*
                    _ => Err(::util::ParseEnumError {
                        value: s.to_string(),
                        enum_name: #name_str,
                    }),
                }
            }
        }

        impl ::std::str::FromStr for #name {
            type Err = ::util::ParseEnumError;

            fn from_str(s: &str) -> ::std::result::Result<#name, ::util::ParseEnumError> {
                <#name as ::util::EnumFromStr>::from_str(s)
            }
        }
    };

    expanded.into()
}
