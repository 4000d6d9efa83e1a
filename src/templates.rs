//! Built-in child/template compilers, one per output target.
//!
//! The full element compiler lives outside this crate; these implementations
//! cover what component subtrees need end to end: nested component
//! invocations recurse into the pass, expression and spread children go
//! through the dynamism classifier, and plain element children lower to a
//! thin runtime element call for the selected target.

use crate::analyze::{is_conditional_expression, is_dynamic, DynamismChecks};
use crate::children::filter_children;
use crate::component::{transform_component, TransformCtx};
use crate::condition::wrap_conditional;
use crate::config::GenerateMode;
use crate::ir::{Attribute, AttributeValue, CompileError, ElementNode, MarkupNode};
use crate::tag::{is_component_tag, tag_label};
use crate::text::{decode_entities, is_valid_identifier, js_string, trim_whitespace};

/// Flags passed down from the invoking compiler.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransformInfo {
    pub top_level: bool,
    pub component_child: bool,
}

/// A compiled child sub-expression and its staticity verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformedChild {
    pub expr: String,
    pub dynamic: bool,
    pub component: bool,
}

/// The child/template compilation seam. The tree-walk driver may supply its
/// own implementation; `for_target` picks the built-in one.
pub trait TemplateCompiler {
    fn transform(
        &self,
        ctx: &mut TransformCtx,
        node: &MarkupNode,
        info: &TransformInfo,
    ) -> Result<TransformedChild, CompileError>;

    /// Wraps a compiled child for the target. `has_siblings` tells the
    /// builder the child sits in a positional collection.
    fn create_template(
        &self,
        ctx: &mut TransformCtx,
        node: &MarkupNode,
        child: &TransformedChild,
        has_siblings: bool,
    ) -> Result<String, CompileError>;
}

pub struct DomTemplates;
pub struct SsrTemplates;
pub struct UniversalTemplates;

pub fn for_target(generate: GenerateMode) -> Box<dyn TemplateCompiler> {
    match generate {
        GenerateMode::Dom => Box::new(DomTemplates),
        GenerateMode::Ssr => Box::new(SsrTemplates),
        GenerateMode::Universal => Box::new(UniversalTemplates),
    }
}

impl TemplateCompiler for DomTemplates {
    fn transform(
        &self,
        ctx: &mut TransformCtx,
        node: &MarkupNode,
        info: &TransformInfo,
    ) -> Result<TransformedChild, CompileError> {
        transform_node(self, ctx, node, info, "createElement")
    }

    fn create_template(
        &self,
        _ctx: &mut TransformCtx,
        _node: &MarkupNode,
        child: &TransformedChild,
        _has_siblings: bool,
    ) -> Result<String, CompileError> {
        Ok(child.expr.clone())
    }
}

impl TemplateCompiler for SsrTemplates {
    fn transform(
        &self,
        ctx: &mut TransformCtx,
        node: &MarkupNode,
        info: &TransformInfo,
    ) -> Result<TransformedChild, CompileError> {
        transform_node(self, ctx, node, info, "ssrElement")
    }

    fn create_template(
        &self,
        _ctx: &mut TransformCtx,
        _node: &MarkupNode,
        child: &TransformedChild,
        _has_siblings: bool,
    ) -> Result<String, CompileError> {
        Ok(child.expr.clone())
    }
}

impl TemplateCompiler for UniversalTemplates {
    fn transform(
        &self,
        ctx: &mut TransformCtx,
        node: &MarkupNode,
        info: &TransformInfo,
    ) -> Result<TransformedChild, CompileError> {
        transform_node(self, ctx, node, info, "createElement")
    }

    fn create_template(
        &self,
        _ctx: &mut TransformCtx,
        _node: &MarkupNode,
        child: &TransformedChild,
        _has_siblings: bool,
    ) -> Result<String, CompileError> {
        Ok(child.expr.clone())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SHARED LOWERING
// ═══════════════════════════════════════════════════════════════════════════════

fn transform_node(
    compiler: &dyn TemplateCompiler,
    ctx: &mut TransformCtx,
    node: &MarkupNode,
    _info: &TransformInfo,
    element_helper: &str,
) -> Result<TransformedChild, CompileError> {
    match node {
        MarkupNode::Element(el) if is_component_tag(&el.tag) => {
            let output = transform_component(ctx, compiler, el)?;
            Ok(TransformedChild {
                expr: output.expressions.into_iter().next().unwrap_or_default(),
                dynamic: false,
                component: true,
            })
        }
        MarkupNode::Element(el) => Ok(TransformedChild {
            expr: lower_element(compiler, ctx, el, element_helper)?,
            dynamic: false,
            component: false,
        }),
        MarkupNode::Expression(expr) => Ok(compile_expression_child(ctx, &expr.code)),
        MarkupNode::Spread(spread) => Ok(compile_expression_child(ctx, &spread.code)),
        MarkupNode::Text(text) => Ok(TransformedChild {
            expr: js_string(&decode_entities(&trim_whitespace(&text.value))),
            dynamic: false,
            component: false,
        }),
    }
}

fn compile_expression_child(ctx: &mut TransformCtx, code: &str) -> TransformedChild {
    if !is_dynamic(code, &DynamismChecks::member_and_tags(), ctx.bindings) {
        return TransformedChild { expr: code.to_string(), dynamic: false, component: false };
    }
    let body = if ctx.config.wrap_conditionals
        && ctx.config.generate != GenerateMode::Ssr
        && is_conditional_expression(code)
    {
        wrap_conditional(ctx, code)
    } else {
        code.to_string()
    };
    TransformedChild {
        expr: format!("() => {}", body),
        dynamic: true,
        component: false,
    }
}

// Thin stand-in for the general element compiler: a runtime element call with
// attributes and children passed through positionally.
fn lower_element(
    compiler: &dyn TemplateCompiler,
    ctx: &mut TransformCtx,
    el: &ElementNode,
    element_helper: &str,
) -> Result<String, CompileError> {
    let create = ctx.imports.register(element_helper);
    let tag = js_string(&tag_label(&el.tag));

    let mut props: Vec<String> = Vec::new();
    for attribute in &el.attributes {
        match attribute {
            Attribute::Named(attr) => {
                let key = if is_valid_identifier(&attr.name) {
                    attr.name.clone()
                } else {
                    js_string(&attr.name)
                };
                let value = match &attr.value {
                    None => "true".to_string(),
                    Some(AttributeValue::Literal(text)) => js_string(text),
                    Some(AttributeValue::Expression(code)) => code.clone(),
                };
                props.push(format!("{}: {}", key, value));
            }
            Attribute::Spread(spread) => props.push(format!("...{}", spread.argument)),
        }
    }

    let mut kids: Vec<String> = Vec::new();
    for child in filter_children(&el.children) {
        match child {
            MarkupNode::Text(text) => {
                let value = decode_entities(&trim_whitespace(&text.value));
                if !value.is_empty() {
                    kids.push(js_string(&value));
                }
            }
            MarkupNode::Spread(spread) => kids.push(format!("...{}", spread.code)),
            node => {
                let info = TransformInfo { top_level: false, component_child: false };
                let child = transform_node(compiler, ctx, node, &info, element_helper)?;
                kids.push(child.expr);
            }
        }
    }

    let props_code = if props.is_empty() {
        "{}".to_string()
    } else {
        format!("{{ {} }}", props.join(", "))
    };
    Ok(format!("{}({}, {}, [{}])", create, tag, props_code, kids.join(", ")))
}
