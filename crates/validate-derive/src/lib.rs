//! Derive macro for `validation_demo_shared::Validate`.
//!
//! ```ignore
//! #[derive(Validate)]
//! struct OrgParam {
//!     #[constraint(field = "orgId", required, positive)]
//!     org_id: Option<i64>,
//!     #[constraint(field = "orgName", not_blank, length(min = 1, max = 32))]
//!     org_name: Option<String>,
//! }
//! ```
//!
//! Rules run in declaration order. Every rule accepts `message = "..."` and
//! `groups(...)`; rules without groups belong to the default group.

use proc_macro::TokenStream;
use proc_macro2::{Literal, Span};
use quote::{ToTokens, format_ident, quote};
use syn::meta::ParseNestedMeta;
use syn::{
    Attribute, Data, DeriveInput, Fields, GenericArgument, Ident, Lit, LitStr, PathArguments, Type,
};

const DEFAULT_LENGTH_MAX: usize = 2_147_483_647;

/// Derive `validation_demo_shared::Validate` with field-level rules.
#[proc_macro_derive(Validate, attributes(constraint))]
pub fn derive_validate(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    match expand_validate(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_validate(input: &DeriveInput) -> Result<proc_macro2::TokenStream, syn::Error> {
    reject_container_attributes(&input.attrs)?;
    let Data::Struct(struct_data) = &input.data else {
        return Err(syn::Error::new_spanned(
            input,
            "Validate can only be derived for structs",
        ));
    };

    let fields = match &struct_data.fields {
        Fields::Named(fields) => &fields.named,
        _ => {
            return Err(syn::Error::new_spanned(
                &struct_data.fields,
                "Validate requires named fields",
            ));
        },
    };

    let mut blocks = Vec::new();
    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let (field_name, rules) = parse_field_rules(&field.attrs, ident)?;
        if rules.is_empty() {
            continue;
        }
        let (is_option, inner_ty) = unwrap_option(&field.ty);
        let field_name = LitStr::new(&field_name, Span::call_site());
        let mut checks = Vec::with_capacity(rules.len());
        for rule in rules {
            checks.push(expand_rule(&rule, &field_name, inner_ty, is_option)?);
        }
        let value = if is_option {
            quote! { self.#ident.as_ref() }
        } else {
            quote! { ::core::option::Option::Some(&self.#ident) }
        };
        blocks.push(quote! {
            {
                let value = #value;
                #(#checks)*
            }
        });
    }

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    Ok(quote! {
        impl #impl_generics ::validation_demo_shared::Validate for #name #ty_generics #where_clause {
            fn validate_with(&self, ctx: &mut ::validation_demo_shared::ValidationContext<'_>) {
                #(#blocks)*
            }
        }
    })
}

fn reject_container_attributes(attrs: &[Attribute]) -> Result<(), syn::Error> {
    attrs
        .iter()
        .find(|attr| attr.path().is_ident("constraint"))
        .map_or(Ok(()), |attr| {
            Err(syn::Error::new_spanned(
                attr,
                "constraint attributes belong on fields",
            ))
        })
}

#[derive(Debug)]
struct Rule {
    kind: RuleKind,
    message: Option<LitStr>,
    groups: Vec<Ident>,
    span: Span,
}

#[derive(Debug)]
enum RuleKind {
    Required,
    NotBlank,
    NotEmpty,
    Length { min: usize, max: usize },
    Range { min: Lit, max: Lit },
    Positive,
    Email,
    Past,
    PastOrPresent,
    Pattern { regexp: LitStr },
    PhoneNo { regexp: Option<LitStr> },
    IdNo { regexp: Option<LitStr> },
    DateFormat { format: Option<LitStr> },
    DateTimeFormat { format: Option<LitStr> },
    Nested,
}

/// Arguments accepted inside a rule's parentheses.
#[derive(Debug, Default)]
struct RuleArgs {
    message: Option<LitStr>,
    groups: Vec<Ident>,
    min: Option<Lit>,
    max: Option<Lit>,
    regexp: Option<LitStr>,
    format: Option<LitStr>,
}

impl RuleArgs {
    fn parse(meta: &ParseNestedMeta<'_>, allowed: &[&str]) -> Result<Self, syn::Error> {
        let mut args = Self::default();
        if !meta.input.peek(syn::token::Paren) {
            return Ok(args);
        }
        meta.parse_nested_meta(|nested| {
            let Some(key) = nested.path.get_ident().map(ToString::to_string) else {
                return Err(nested.error("expected a rule argument"));
            };
            if !allowed.contains(&key.as_str()) {
                return Err(nested.error(format!("unsupported rule argument `{key}`")));
            }
            match key.as_str() {
                "message" => args.message = Some(nested.value()?.parse()?),
                "groups" => nested.parse_nested_meta(|group| {
                    let ident = group
                        .path
                        .get_ident()
                        .ok_or_else(|| group.error("expected a group name"))?;
                    args.groups.push(group_variant(ident));
                    Ok(())
                })?,
                "min" => args.min = Some(nested.value()?.parse()?),
                "max" => args.max = Some(nested.value()?.parse()?),
                "regexp" => args.regexp = Some(nested.value()?.parse()?),
                _ => args.format = Some(nested.value()?.parse()?),
            }
            Ok(())
        })?;
        Ok(args)
    }
}

const COMMON: &[&str] = &["message", "groups"];
const BOUNDED: &[&str] = &["message", "groups", "min", "max"];
const PATTERN: &[&str] = &["message", "groups", "regexp"];
const FORMAT: &[&str] = &["message", "groups", "format"];

fn group_variant(ident: &Ident) -> Ident {
    let name = ident.to_string();
    let mut chars = name.chars();
    let capitalized = chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect::<String>()
    });
    format_ident!("{}", capitalized, span = ident.span())
}

fn parse_field_rules(attrs: &[Attribute], ident: &Ident) -> Result<(String, Vec<Rule>), syn::Error> {
    let mut rules = Vec::new();
    let mut field_name_override: Option<String> = None;
    for attr in attrs {
        if !attr.path().is_ident("constraint") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            let Some(name) = meta.path.get_ident().map(ToString::to_string) else {
                return Err(meta.error("expected a rule name"));
            };
            let span = meta.path.get_ident().map_or_else(Span::call_site, Ident::span);
            let (kind, args) = match name.as_str() {
                "field" => {
                    let value: LitStr = meta.value()?.parse()?;
                    if field_name_override.is_some() {
                        return Err(meta.error("duplicate constraint(field = ...)"));
                    }
                    field_name_override = Some(value.value());
                    return Ok(());
                },
                "nested" => (RuleKind::Nested, RuleArgs::parse(&meta, &[])?),
                "required" => (RuleKind::Required, RuleArgs::parse(&meta, COMMON)?),
                "not_blank" => (RuleKind::NotBlank, RuleArgs::parse(&meta, COMMON)?),
                "not_empty" => (RuleKind::NotEmpty, RuleArgs::parse(&meta, COMMON)?),
                "positive" => (RuleKind::Positive, RuleArgs::parse(&meta, COMMON)?),
                "email" => (RuleKind::Email, RuleArgs::parse(&meta, COMMON)?),
                "past" => (RuleKind::Past, RuleArgs::parse(&meta, COMMON)?),
                "past_or_present" => (RuleKind::PastOrPresent, RuleArgs::parse(&meta, COMMON)?),
                "length" => {
                    let mut args = RuleArgs::parse(&meta, BOUNDED)?;
                    let min = args.min.take().map(|lit| lit_to_usize(&lit)).transpose()?;
                    let max = args.max.take().map(|lit| lit_to_usize(&lit)).transpose()?;
                    let kind = RuleKind::Length {
                        min: min.unwrap_or(0),
                        max: max.unwrap_or(DEFAULT_LENGTH_MAX),
                    };
                    (kind, args)
                },
                "range" => {
                    let mut args = RuleArgs::parse(&meta, BOUNDED)?;
                    let Some(min) = args.min.take() else {
                        return Err(meta.error("range requires min"));
                    };
                    let Some(max) = args.max.take() else {
                        return Err(meta.error("range requires max"));
                    };
                    (RuleKind::Range { min, max }, args)
                },
                "pattern" => {
                    let mut args = RuleArgs::parse(&meta, PATTERN)?;
                    let Some(regexp) = args.regexp.take() else {
                        return Err(meta.error("pattern requires regexp"));
                    };
                    (RuleKind::Pattern { regexp }, args)
                },
                "phone_no" => {
                    let mut args = RuleArgs::parse(&meta, PATTERN)?;
                    (RuleKind::PhoneNo { regexp: args.regexp.take() }, args)
                },
                "id_no" => {
                    let mut args = RuleArgs::parse(&meta, PATTERN)?;
                    (RuleKind::IdNo { regexp: args.regexp.take() }, args)
                },
                "date_format" => {
                    let mut args = RuleArgs::parse(&meta, FORMAT)?;
                    (RuleKind::DateFormat { format: args.format.take() }, args)
                },
                "date_time_format" => {
                    let mut args = RuleArgs::parse(&meta, FORMAT)?;
                    (RuleKind::DateTimeFormat { format: args.format.take() }, args)
                },
                _ => return Err(meta.error(format!("unsupported constraint rule `{name}`"))),
            };
            rules.push(Rule {
                kind,
                message: args.message,
                groups: args.groups,
                span,
            });
            Ok(())
        })?;
    }
    let name = field_name_override.unwrap_or_else(|| ident.to_string());
    Ok((name, rules))
}

fn lit_to_usize(lit: &Lit) -> Result<usize, syn::Error> {
    match lit {
        Lit::Int(value) => value.base10_parse::<usize>(),
        _ => Err(syn::Error::new_spanned(lit, "expected an unsigned integer")),
    }
}

fn expand_rule(
    rule: &Rule,
    field_name: &LitStr,
    inner_ty: &Type,
    is_option: bool,
) -> Result<proc_macro2::TokenStream, syn::Error> {
    let constraints = quote! { ::validation_demo_shared::constraints };
    let (check, default_message) = match &rule.kind {
        RuleKind::Nested => return Ok(expand_nested(field_name, inner_ty)),
        RuleKind::Required => {
            if !is_option {
                return Err(syn::Error::new(
                    rule.span,
                    "required can only be used on Option fields",
                ));
            }
            (
                quote! { #constraints::required(value) },
                quote! { #constraints::messages::REQUIRED },
            )
        },
        RuleKind::NotBlank => (
            quote! { #constraints::not_blank(value) },
            quote! { #constraints::messages::NOT_BLANK },
        ),
        RuleKind::NotEmpty => (
            quote! { #constraints::not_empty(value) },
            quote! { #constraints::messages::NOT_EMPTY },
        ),
        RuleKind::Length { min, max } => {
            let message = LitStr::new(
                &format!("size must be between {min} and {max}"),
                Span::call_site(),
            );
            let min = Literal::usize_unsuffixed(*min);
            let max = Literal::usize_unsuffixed(*max);
            (
                quote! { #constraints::length(value, #min, #max) },
                message.to_token_stream(),
            )
        },
        RuleKind::Range { min, max } => {
            let message = LitStr::new(
                &format!(
                    "must be between {} and {}",
                    lit_to_string(min),
                    lit_to_string(max)
                ),
                Span::call_site(),
            );
            (
                quote! { #constraints::range(value, #min, #max) },
                message.to_token_stream(),
            )
        },
        RuleKind::Positive => (
            quote! { #constraints::positive(value) },
            quote! { #constraints::messages::POSITIVE },
        ),
        RuleKind::Email => (
            quote! { #constraints::email(value) },
            quote! { #constraints::messages::EMAIL },
        ),
        RuleKind::Past => (
            quote! { #constraints::past(value) },
            quote! { #constraints::messages::PAST },
        ),
        RuleKind::PastOrPresent => (
            quote! { #constraints::past_or_present(value) },
            quote! { #constraints::messages::PAST_OR_PRESENT },
        ),
        RuleKind::Pattern { regexp } => {
            let message = LitStr::new(
                &format!("must match \"{}\"", regexp.value()),
                Span::call_site(),
            );
            (pattern_check(regexp), message.to_token_stream())
        },
        RuleKind::PhoneNo { regexp } => (
            regexp.as_ref().map_or_else(
                || quote! { #constraints::phone_no(value) },
                pattern_check,
            ),
            quote! { #constraints::messages::PHONE_NO },
        ),
        RuleKind::IdNo { regexp } => (
            regexp
                .as_ref()
                .map_or_else(|| quote! { #constraints::id_no(value) }, pattern_check),
            quote! { #constraints::messages::ID_NO },
        ),
        RuleKind::DateFormat { format } => (
            format.as_ref().map_or_else(
                || quote! { #constraints::date_format(value) },
                date_format_check,
            ),
            quote! { #constraints::messages::DATE_FORMAT },
        ),
        RuleKind::DateTimeFormat { format } => (
            format.as_ref().map_or_else(
                || quote! { #constraints::date_time_format(value) },
                date_format_check,
            ),
            quote! { #constraints::messages::DATE_TIME_FORMAT },
        ),
    };

    let message = rule
        .message
        .as_ref()
        .map_or(default_message, ToTokens::to_token_stream);
    let groups = if rule.groups.is_empty() {
        vec![format_ident!("Default")]
    } else {
        rule.groups.clone()
    };
    Ok(quote! {
        if ctx.applies(&[#(::validation_demo_shared::Group::#groups),*]) && !(#check) {
            ctx.report(#field_name, #message);
        }
    })
}

fn pattern_check(regexp: &LitStr) -> proc_macro2::TokenStream {
    quote! {
        {
            static RULE: ::validation_demo_shared::PatternRule =
                ::validation_demo_shared::PatternRule::new(#regexp);
            RULE.accepts(value)
        }
    }
}

fn date_format_check(format: &LitStr) -> proc_macro2::TokenStream {
    quote! {
        {
            static RULE: ::validation_demo_shared::DateFormatRule =
                ::validation_demo_shared::DateFormatRule::new(#format);
            RULE.accepts(value)
        }
    }
}

fn expand_nested(field_name: &LitStr, inner_ty: &Type) -> proc_macro2::TokenStream {
    if vec_inner(inner_ty).is_some() {
        quote! {
            if let ::core::option::Option::Some(items) = value {
                for (index, item) in items.iter().enumerate() {
                    ::validation_demo_shared::Validate::validate_with(
                        item,
                        &mut ctx.child(&::std::format!("{}[{}]", #field_name, index)),
                    );
                }
            }
        }
    } else {
        quote! {
            if let ::core::option::Option::Some(item) = value {
                ::validation_demo_shared::Validate::validate_with(item, &mut ctx.child(#field_name));
            }
        }
    }
}

fn unwrap_option(ty: &Type) -> (bool, &Type) {
    generic_inner(ty, "Option").map_or((false, ty), |inner| (true, inner))
}

fn vec_inner(ty: &Type) -> Option<&Type> {
    generic_inner(ty, "Vec")
}

fn generic_inner<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != wrapper {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    args.args.iter().find_map(|arg| match arg {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    })
}

fn lit_to_string(lit: &Lit) -> String {
    match lit {
        Lit::Int(value) => value.base10_digits().to_string(),
        Lit::Float(value) => value.base10_digits().to_string(),
        Lit::Str(value) => value.value(),
        _ => lit.to_token_stream().to_string(),
    }
}
