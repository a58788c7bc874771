//! Proc macros for trellis: `tree!` markup for attributed trees.
//!
//! This crate is not meant to be used directly; enable the `macros` feature on `trellis`.

use proc_macro::TokenStream;

mod tree_macro;

/// Markup-style construction of a [`trellis::tree::Element`].
///
/// Transforms JSX-like syntax into `Element` builder calls. The macro takes
/// exactly one root element.
///
/// # Syntax
///
/// - `<Type />`: element without children
/// - `<Type name="value"> ... </Type>`: element with children
///
/// # Attributes
///
/// - Names may contain hyphens (`grid-template-columns="1fr 1fr"`)
/// - Values are string, integer, float or boolean literals, or a braced
///   Rust expression (`width={base * 2}`) of any type convertible into `Value`
///
/// # Example
///
/// ```ignore
/// let element = tree! {
///     <Panel display="grid" grid-template-columns="1fr 2fr" width=80>
///         <Text id="title" text="Hello" />
///         <Panel grid-column="1 / span 2" />
///     </Panel>
/// };
/// ```
#[proc_macro]
pub fn tree(input: TokenStream) -> TokenStream {
    tree_macro::tree_impl(input.into())
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}
