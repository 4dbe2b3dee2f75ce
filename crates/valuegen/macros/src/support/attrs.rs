use proc_macro2::{TokenStream as TokenStream2, TokenTree};
use syn::{
    Attribute, Ident, Lit, Meta, Path, Result, Token,
    ext::IdentExt,
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
};

use crate::support::diag;

/// `key = value` pairs from every `#[value(...)]` on one item.
#[derive(Debug, Clone, Default)]
pub struct AttrArgs {
    pub items: Vec<AttrItem>,
}

/// `crate = ::valuegen`
#[derive(Debug, Clone)]
pub struct AttrItem {
    pub key: Ident,
    pub value: AttrValue,
}

/// Right-hand side of a key-value pair.
#[derive(Debug, Clone)]
pub enum AttrValue {
    Lit(Lit),
    Tokens(TokenStream2),
}

impl AttrArgs {
    /// Find a key-value pair by key name.
    pub fn get_value(&self, key: &str) -> Option<&AttrValue> {
        self.items
            .iter()
            .find(|item| item.key == key)
            .map(|item| &item.value)
    }

    /// Parse a path from `key = some::path` or `key = "some::path"`.
    pub fn get_path(&self, key: &str) -> Result<Option<Path>> {
        let Some(value) = self.get_value(key) else {
            return Ok(None);
        };

        let path = match value {
            AttrValue::Lit(Lit::Str(s)) => s
                .parse::<Path>()
                .map_err(|e| diag::error_spanned(s, format!("invalid path for `{key}`: {e}")))?,
            AttrValue::Tokens(tokens) => syn::parse2::<Path>(tokens.clone()).map_err(|e| {
                diag::error_spanned(tokens, format!("invalid path for `{key}`: {e}"))
            })?,
            AttrValue::Lit(other) => {
                return Err(diag::error_spanned(
                    other,
                    format!("expected a path for `{key}`"),
                ));
            }
        };

        Ok(Some(path))
    }

    /// Reject keys outside `allowed`.
    pub fn ensure_only(&self, allowed: &[&str]) -> Result<()> {
        for item in &self.items {
            let key = &item.key;
            if !allowed.iter().any(|name| key == name) {
                return Err(diag::error_spanned(
                    key,
                    format!("unknown attribute `{key}`, expected one of: {}", allowed.join(", ")),
                ));
            }
        }
        Ok(())
    }
}

/// Parse attribute like `#[value(...)]` (the whole Attribute, not only args).
pub fn parse_attr(attr: &Attribute, expected: &str) -> Result<Option<AttrArgs>> {
    if !attr.path().is_ident(expected) {
        return Ok(None);
    }

    match &attr.meta {
        Meta::Path(_) => Ok(Some(AttrArgs::default())),
        Meta::List(list) => {
            let args = syn::parse2::<AttrArgsParser>(list.tokens.clone())?;
            Ok(Some(args.0))
        }
        Meta::NameValue(nv) => Err(diag::error_spanned(
            nv,
            format!("#[{expected}] must be #[{expected}(...)] or #[{expected}] (not name-value)"),
        )),
    }
}

/// Parse all attributes of a given name and merge them.
pub fn parse_attrs(attrs: &[Attribute], name: &str) -> Result<AttrArgs> {
    let mut result = AttrArgs::default();

    for attr in attrs {
        if let Some(args) = parse_attr(attr, name)? {
            result.items.extend(args.items);
        }
    }

    Ok(result)
}

struct AttrArgsParser(AttrArgs);

impl Parse for AttrArgsParser {
    fn parse(input: ParseStream) -> Result<Self> {
        let items = if input.is_empty() {
            vec![]
        } else {
            Punctuated::<AttrItemParser, Token![,]>::parse_terminated(input)?
                .into_iter()
                .map(|x| x.0)
                .collect()
        };
        Ok(Self(AttrArgs { items }))
    }
}

struct AttrItemParser(AttrItem);

impl Parse for AttrItemParser {
    fn parse(input: ParseStream) -> Result<Self> {
        // `crate` is a keyword, so keys are parsed with `parse_any`.
        let key = Ident::parse_any(input)?;
        input.parse::<Token![=]>()?;
        let value = input.parse::<AttrValueParser>()?.0;
        Ok(Self(AttrItem { key, value }))
    }
}

struct AttrValueParser(AttrValue);

impl Parse for AttrValueParser {
    fn parse(input: ParseStream) -> Result<Self> {
        if input.peek(Lit) {
            return Ok(Self(AttrValue::Lit(input.parse()?)));
        }

        let mut tokens = TokenStream2::new();
        while !input.is_empty() && !input.peek(Token![,]) {
            tokens.extend([input.parse::<TokenTree>()?]);
        }
        if tokens.is_empty() {
            return Err(input.error("expected a value"));
        }
        Ok(Self(AttrValue::Tokens(tokens)))
    }
}
