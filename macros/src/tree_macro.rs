//! `tree!` macro: parse markup and generate trellis `Element` builder code.

use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::ext::IdentExt;
use syn::parse::{Parse, ParseStream};
use syn::{braced, Error, Expr, Ident, Lit, Result, Token};

// ---------------------------------------------------------------------------
// AST types
// ---------------------------------------------------------------------------

/// Right-hand side of an attribute.
#[derive(Clone)]
pub(crate) enum AttrValue {
    Lit(Lit),
    Negated(Lit),
    Expr(Expr),
}

/// A parsed attribute: `name="value"`, `grid-row=2` or `width={expr}`.
#[derive(Clone)]
pub(crate) struct Attribute {
    pub name: String,
    pub span: Span,
    pub value: AttrValue,
}

impl std::fmt::Debug for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attribute").field("name", &self.name).finish()
    }
}

/// A parsed element: `<Type attrs... />` or `<Type attrs...> children </Type>`.
#[derive(Clone)]
pub(crate) struct Element {
    pub tag: Ident,
    pub attrs: Vec<Attribute>,
    pub children: Vec<Element>,
}

impl std::fmt::Debug for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Element")
            .field("tag", &self.tag.to_string())
            .field("attrs", &self.attrs)
            .field("children", &self.children)
            .finish()
    }
}

/// The top-level tree! input: exactly one root element.
#[derive(Debug)]
struct TreeInput {
    root: Element,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

impl Parse for TreeInput {
    fn parse(input: ParseStream) -> Result<Self> {
        if input.is_empty() {
            return Err(Error::new(
                Span::call_site(),
                "tree! macro requires a root element",
            ));
        }
        let root = parse_element(input)?;
        if !input.is_empty() {
            return Err(input.error("tree! macro takes a single root element"));
        }
        Ok(TreeInput { root })
    }
}

/// Parse a kebab-case attribute name. Keywords such as `type` are allowed.
fn parse_attr_name(input: ParseStream) -> Result<(String, Span)> {
    let first = Ident::parse_any(input)?;
    let span = first.span();
    let mut name = first.to_string();
    while input.peek(Token![-]) {
        input.parse::<Token![-]>()?;
        let part = Ident::parse_any(input)?;
        name.push('-');
        name.push_str(&part.to_string());
    }
    Ok((name, span))
}

fn parse_attr_value(input: ParseStream) -> Result<AttrValue> {
    if input.peek(syn::token::Brace) {
        let content;
        braced!(content in input);
        return Ok(AttrValue::Expr(content.parse()?));
    }
    let negated = input.peek(Token![-]);
    if negated {
        input.parse::<Token![-]>()?;
    }
    let lit: Lit = input.parse()?;
    match (&lit, negated) {
        (Lit::Int(_) | Lit::Float(_), true) => Ok(AttrValue::Negated(lit)),
        (Lit::Str(_) | Lit::Int(_) | Lit::Float(_) | Lit::Bool(_), false) => Ok(AttrValue::Lit(lit)),
        _ => Err(Error::new(
            lit.span(),
            "expected a string, number or boolean literal, or a braced expression",
        )),
    }
}

/// Parse a single element from the token stream.
pub(crate) fn parse_element(input: ParseStream) -> Result<Element> {
    input.parse::<Token![<]>()?;
    let tag: Ident = input.parse()?;

    let mut attrs = Vec::new();
    loop {
        if input.peek(Token![/]) {
            input.parse::<Token![/]>()?;
            input.parse::<Token![>]>()?;
            return Ok(Element {
                tag,
                attrs,
                children: Vec::new(),
            });
        }
        if input.peek(Token![>]) {
            input.parse::<Token![>]>()?;
            break;
        }

        let (name, span) = parse_attr_name(input)?;
        input.parse::<Token![=]>()?;
        let value = parse_attr_value(input)?;
        if attrs.iter().any(|a: &Attribute| a.name == name) {
            return Err(Error::new(span, format!("duplicate attribute `{name}`")));
        }
        attrs.push(Attribute { name, span, value });
    }

    let mut children = Vec::new();
    loop {
        if input.peek(Token![<]) && input.peek2(Token![/]) {
            input.parse::<Token![<]>()?;
            input.parse::<Token![/]>()?;
            let closing_tag: Ident = input.parse()?;
            if closing_tag != tag {
                return Err(Error::new(
                    closing_tag.span(),
                    format!(
                        "mismatched closing tag: expected `</{}>`, found `</{}>`",
                        tag, closing_tag
                    ),
                ));
            }
            input.parse::<Token![>]>()?;
            break;
        }

        if input.peek(Token![<]) {
            children.push(parse_element(input)?);
        } else {
            return Err(input.error("expected `<` to start a child element or `</` to close the parent"));
        }
    }

    Ok(Element {
        tag,
        attrs,
        children,
    })
}

// ---------------------------------------------------------------------------
// Code generation
// ---------------------------------------------------------------------------

fn generate_value(value: &AttrValue) -> TokenStream {
    match value {
        AttrValue::Lit(lit) => quote! { #lit },
        AttrValue::Negated(lit) => quote! { -#lit },
        AttrValue::Expr(expr) => quote! { (#expr) },
    }
}

/// Generate code for a single element.
fn generate_element(elem: &Element) -> TokenStream {
    let tag = elem.tag.to_string();

    let attr_calls = elem.attrs.iter().map(|attr| {
        let name = &attr.name;
        let value = generate_value(&attr.value);
        quote! { .with(#name, #value) }
    });
    let child_calls = elem.children.iter().map(|child| {
        let child_code = generate_element(child);
        quote! { .with_child(#child_code) }
    });

    quote! {
        ::trellis::tree::Element::new(#tag) #(#attr_calls)* #(#child_calls)*
    }
}

/// Entry point: generate code for the entire tree! macro.
pub(crate) fn tree_impl(input: TokenStream) -> Result<TokenStream> {
    let parsed: TreeInput = syn::parse2(input)?;
    Ok(generate_element(&parsed.root))
}

// ===========================================================================
// Tests
// ===========================================================================
