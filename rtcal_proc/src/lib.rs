//! Attribute helpers for conditional bindings.
//!
//! Both macros exist so a qualifier or a nested attribute can sit behind `cfg_attr`, which plain
//! Rust syntax does not allow for keywords such as `const` or `extern "C"`. Read the descriptions
//! on [`fn_attr()`] and [`py_attr()`].

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    Abi, Attribute, ImplItem, ImplItemFn, ItemImpl, Meta, Token,
    parse::{Parse, ParseStream},
    parse_macro_input,
};

/// A single qualifier accepted by [`fn_attr()`].
enum Qualifier {
    Const(Token![const]),
    Unsafe(Token![unsafe]),
    Abi(Abi),
}

impl Parse for Qualifier {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let lookahead = input.lookahead1();
        if lookahead.peek(Token![const]) {
            input.parse().map(Self::Const)
        } else if lookahead.peek(Token![unsafe]) {
            input.parse().map(Self::Unsafe)
        } else if lookahead.peek(Token![extern]) {
            input.parse().map(Self::Abi)
        } else {
            Err(lookahead.error())
        }
    }
}

/// Add a qualifier (`const`, `unsafe` or an ABI such as `extern "C"`) to a function or method.
///
/// `wasm-bindgen` cannot export a `const fn` and C exports need an ABI only under one feature,
/// hence:
///
/// ```rust,ignore
/// #[cfg_attr(feature = "c", unsafe(no_mangle), fn_attr(extern "C"))]
/// #[cfg_attr(not(feature = "wasm"), fn_attr(const))]
/// pub fn is_leap_year(year: Year) -> bool { todo!() }
/// ```
#[proc_macro_attribute]
pub fn fn_attr(args: TokenStream, tokens: TokenStream) -> TokenStream {
    let qualifier = parse_macro_input!(args as Qualifier);
    // a free function parses as a method without receiver just as well
    let mut item = parse_macro_input!(tokens as ImplItemFn);

    match qualifier {
        Qualifier::Const(token) => item.sig.constness = Some(token),
        Qualifier::Unsafe(token) => item.sig.unsafety = Some(token),
        Qualifier::Abi(abi) => item.sig.abi = Some(abi),
    }

    quote! { #item }.into()
}

/// Create bindgens for conditional pyo3.
///
/// PyO3 generally does not support attributes under conditional clauses
/// (<https://github.com/PyO3/pyo3/issues/780>). Simply, when the header macro of a block like
/// `pymethods` is conditional (via `cfg_attr`), the nested macros (like `new`) will misbehave.
///
/// As of now, this only supports usage for `impl` blocks and only with `pymethods` input similar to
/// the example below:
///
/// ```rust,ignore
/// #[pymethods]
/// impl X {
///     #[new]
///     pub fn new() -> Self { todo!() }
/// }
///
/// // can be conditionally written like so all the functions will have the given attribute:
///
/// #[cfg_attr(criterion, py_attr(pymethods, new))]
/// impl X {
///     pub fn new() -> Self { todo!() }
/// }
/// ```
#[proc_macro_attribute]
pub fn py_attr(args: TokenStream, tokens: TokenStream) -> TokenStream {
    let arg_parser = |input: ParseStream| {
        let parent = input.parse::<Meta>()?;
        input.parse::<Token![,]>()?;
        let meta = input.parse::<Meta>()?;
        Ok((parent, meta))
    };

    let (parent, meta) = parse_macro_input!(args with arg_parser);

    if !parent.path().is_ident("pymethods") {
        return syn::Error::new_spanned(parent, "only `pymethods` blocks are supported")
            .to_compile_error()
            .into();
    }

    let mut item_impl = parse_macro_input!(tokens as ItemImpl);
    for i in item_impl.items.iter_mut() {
        if let ImplItem::Fn(ImplItemFn { attrs, .. }) = i {
            attrs.push(Attribute {
                pound_token: Default::default(),
                style: syn::AttrStyle::Outer,
                bracket_token: Default::default(),
                meta: meta.clone(),
            });
        }
    }

    quote! {
        #[#parent]
        #item_impl
    }
    .into()
}
