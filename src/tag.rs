//! Tag-reference normalization.
//!
//! Converts a markup tag reference into a plain expression usable both as the
//! component callee and as an object key. The input tree is never mutated; a
//! fresh normalized value is returned.

use crate::component::TransformCtx;
use crate::ir::TagName;
use crate::text::{is_valid_identifier, js_string};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTag {
    pub code: String,
    /// True when the whole reference collapsed to a string literal, which
    /// makes it a computed key in object position.
    pub string_literal: bool,
    /// True when the reference is a bare identifier, the only shape eligible
    /// for built-in resolution.
    pub plain_identifier: bool,
}

pub fn normalize_tag(tag: &TagName) -> NormalizedTag {
    match tag {
        TagName::Identifier { name } => {
            if is_valid_identifier(name) {
                NormalizedTag {
                    code: name.clone(),
                    string_literal: false,
                    plain_identifier: true,
                }
            } else {
                NormalizedTag {
                    code: js_string(name),
                    string_literal: true,
                    plain_identifier: false,
                }
            }
        }
        TagName::Member { object, property } => {
            let object = normalize_tag(object);
            let code = if is_valid_identifier(property) {
                format!("{}.{}", object.code, property)
            } else {
                format!("{}[{}]", object.code, js_string(property))
            };
            NormalizedTag {
                code,
                string_literal: false,
                plain_identifier: false,
            }
        }
        TagName::Namespaced { namespace, name } => NormalizedTag {
            code: js_string(&format!("{}:{}", namespace, name)),
            string_literal: true,
            plain_identifier: false,
        },
    }
}

/// Normalizes a component tag and rewrites configured built-in names to their
/// imported runtime helpers when no local binding shadows them.
pub fn resolve_component_tag(ctx: &mut TransformCtx, tag: &TagName) -> NormalizedTag {
    let normalized = normalize_tag(tag);
    if normalized.plain_identifier
        && ctx.config.built_ins.iter().any(|b| b == &normalized.code)
        && !ctx.bindings.has(&normalized.code)
    {
        let alias = ctx.imports.register(&normalized.code);
        log::debug!("built-in component {} resolved to {}", normalized.code, alias);
        return NormalizedTag {
            code: alias,
            string_literal: false,
            plain_identifier: true,
        };
    }
    normalized
}

/// Heuristic used by the built-in child compilers: capitalized names and
/// member paths invoke components, everything else renders as an element.
pub fn is_component_tag(tag: &TagName) -> bool {
    match tag {
        TagName::Identifier { name } => {
            name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
        }
        TagName::Member { .. } => true,
        TagName::Namespaced { .. } => false,
    }
}

/// Dotted display form, used for element lowering and log output.
pub fn tag_label(tag: &TagName) -> String {
    match tag {
        TagName::Identifier { name } => name.clone(),
        TagName::Member { object, property } => {
            format!("{}.{}", tag_label(object), property)
        }
        TagName::Namespaced { namespace, name } => format!("{}:{}", namespace, name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str) -> TagName {
        TagName::Identifier { name: name.into() }
    }

    #[test]
    fn simple_names_normalize_to_identifiers_or_strings() {
        assert_eq!(
            normalize_tag(&ident("Card")),
            NormalizedTag { code: "Card".into(), string_literal: false, plain_identifier: true }
        );
        assert_eq!(
            normalize_tag(&ident("my-comp")),
            NormalizedTag { code: "\"my-comp\"".into(), string_literal: true, plain_identifier: false }
        );
    }

    #[test]
    fn member_paths_preserve_association_and_mark_computed_access() {
        let tag = TagName::Member {
            object: Box::new(TagName::Member {
                object: Box::new(ident("ui")),
                property: "Form".into(),
            }),
            property: "text-input".into(),
        };
        assert_eq!(normalize_tag(&tag).code, "ui.Form[\"text-input\"]");
    }

    #[test]
    fn namespaced_names_collapse_to_string_literals() {
        let tag = TagName::Namespaced { namespace: "ui".into(), name: "card".into() };
        let normalized = normalize_tag(&tag);
        assert_eq!(normalized.code, "\"ui:card\"");
        assert!(normalized.string_literal);
    }

    #[test]
    fn component_tag_heuristic() {
        assert!(is_component_tag(&ident("Card")));
        assert!(!is_component_tag(&ident("div")));
        assert!(is_component_tag(&TagName::Member {
            object: Box::new(ident("Form")),
            property: "Input".into(),
        }));
    }
}
