use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{FnArg, Ident, ItemFn, Pat, parse_macro_input};

/// Server-side handler wrapper: `#[cli_handler(Variant)]` renames the
/// annotated `Result`-returning async fn to an inner impl and emits a
/// wrapper with the same signature returning `ApiResponseKind`. Errors
/// are routed through the host crate's `crate::err::into_api_error` so
/// the error taxonomy survives onto the wire.
#[proc_macro_attribute]
pub fn cli_handler(args: TokenStream, input: TokenStream) -> TokenStream {
    // Expect a single identifier as the ApiResponseKind variant: #[cli_handler(Variant)]
    let variant_ident = parse_macro_input!(args as Ident);

    let mut input_fn = parse_macro_input!(input as ItemFn);

    // Capture pieces
    let vis = input_fn.vis.clone();
    let sig = input_fn.sig.clone();
    let attrs = input_fn.attrs.clone();
    let fn_name = sig.ident.clone();
    let impl_name = format_ident!("{}_impl", fn_name);
    let inputs = sig.inputs.clone();
    let generics = sig.generics.clone();
    let where_clause = sig.generics.where_clause.clone();

    let call_args = collect_call_args(&input_fn);

    // Rename the original function to an inner implementation
    input_fn.sig.ident = impl_name.clone();

    let api_kind = quote! { api_model::protocol::message::api_response_message::ApiResponseKind };

    let output = quote! {
        // Emit the inner implementation (with original attrs)
        #(#attrs)*
        #input_fn

        // Emit the public wrapper with the same signature but ApiResponseKind return
        #vis async fn #fn_name #generics ( #inputs ) -> #api_kind #where_clause {
            match #impl_name( #(#call_args),* ).await {
                Ok(__resp) => #api_kind::#variant_ident(__resp),
                Err(e) => #api_kind::Error(crate::err::into_api_error(e)),
            }
        }
    };

    TokenStream::from(output)
}

/// Client-side wrapper: keeps the annotated fn's signature but swallows
/// the `Result`, printing the error instead of propagating it.
#[proc_macro_attribute]
pub fn cli_impl(_args: TokenStream, input: TokenStream) -> TokenStream {
    let mut input_fn = parse_macro_input!(input as ItemFn);

    // Capture pieces
    let vis = input_fn.vis.clone();
    let sig = input_fn.sig.clone();
    let attrs = input_fn.attrs.clone();
    let fn_name = sig.ident.clone();
    let impl_name = format_ident!("{}_impl", fn_name);
    let inputs = sig.inputs.clone();
    let generics = sig.generics.clone();

    let call_args = collect_call_args(&input_fn);

    // Rename the original function to an inner implementation
    input_fn.sig.ident = impl_name.clone();

    let output = quote! {
        // Emit the inner implementation (with original attrs)
        #(#attrs)*
        #input_fn

        #vis fn #fn_name #generics ( #inputs ) {
            match #impl_name( #(#call_args),* ) {
                Ok(_) => {}
                Err(e) => {
                    println!("{:?}", e);
                }
            }
        }
    };

    TokenStream::from(output)
}

fn collect_call_args(input_fn: &ItemFn) -> Vec<proc_macro2::TokenStream> {
    let mut call_args = Vec::new();
    for arg in &input_fn.sig.inputs {
        match arg {
            FnArg::Receiver(r) => {
                if r.reference.is_some() {
                    call_args.push(quote! { &self });
                } else {
                    call_args.push(quote! { self });
                }
            }
            FnArg::Typed(pat_ty) => {
                let pat: &Pat = &pat_ty.pat;
                call_args.push(quote! { #pat });
            }
        }
    }
    call_args
}
