//! Component-invocation compilation.
//!
//! Turns a component-tagged markup element into the construction call the
//! reactive runtime executes, deciding per attribute whether its value is
//! captured once or re-read through a lazy accessor, folding spread sources
//! into a merge call when needed, and collapsing children into a single
//! deferred value.

use crate::analyze::{
    classify_ref, is_conditional_expression, is_dynamic, lazy_body, unwrap_thunk, DynamismChecks,
    LazyBody, RefShape,
};
use crate::bindings::BindingTable;
use crate::children::{filter_children, transform_component_children, CompiledChildren};
use crate::condition::wrap_conditional;
use crate::config::{CompileConfig, GenerateMode};
use crate::imports::ImportRegistry;
use crate::ir::{Attribute, AttributeValue, CompileError, ElementNode, NamedAttribute};
use crate::tag::{resolve_component_tag, tag_label};
use crate::templates::{self, TemplateCompiler};
use crate::text::{is_valid_identifier, js_string};

// ═══════════════════════════════════════════════════════════════════════════════
// CONTEXT & OUTPUT
// ═══════════════════════════════════════════════════════════════════════════════

/// Per-file compilation context, threaded explicitly through every entry
/// point. Configuration and scope information are read-only; the import
/// registry accumulates helper registrations across invocations.
pub struct TransformCtx<'a> {
    pub config: &'a CompileConfig,
    pub bindings: &'a BindingTable,
    pub imports: &'a mut ImportRegistry,
}

impl<'a> TransformCtx<'a> {
    pub fn new(
        config: &'a CompileConfig,
        bindings: &'a BindingTable,
        imports: &'a mut ImportRegistry,
    ) -> Self {
        TransformCtx { config, bindings, imports }
    }
}

/// Result handed back to the tree-walk driver, which splices the expressions
/// in place of the original component node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentOutput {
    pub expressions: Vec<String>,
    pub component: bool,
}

// ═══════════════════════════════════════════════════════════════════════════════
// COMPILED PROPERTY FORMS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GetterBody {
    Return(String),
    Block(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropEntry {
    /// Static value captured once at construction.
    Plain { key: String, value: String },
    /// Zero-argument accessor re-evaluated on each read.
    Getter { key: String, body: GetterBody },
    /// Method bound to `ref`, invoked by the runtime with the fresh instance.
    RefMethod { statements: Vec<String> },
}

impl PropEntry {
    fn render(&self) -> String {
        match self {
            PropEntry::Plain { key, value } => {
                format!("{}: {}", render_plain_key(key), value)
            }
            PropEntry::Getter { key, body: GetterBody::Return(expr) } => {
                format!("get {}() {{ return {}; }}", render_accessor_key(key), expr)
            }
            PropEntry::Getter { key, body: GetterBody::Block(block) } => {
                format!("get {}() {}", render_accessor_key(key), block)
            }
            PropEntry::RefMethod { statements } => {
                format!("ref(r$) {{ {} }}", statements.join(" "))
            }
        }
    }
}

fn render_plain_key(key: &str) -> String {
    if is_valid_identifier(key) {
        key.to_string()
    } else {
        js_string(key)
    }
}

// Accessors take the computed form for names that cannot appear bare.
fn render_accessor_key(key: &str) -> String {
    if is_valid_identifier(key) {
        key.to_string()
    } else {
        format!("[{}]", js_string(key))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropsSource {
    Object(Vec<PropEntry>),
    Spread(String),
}

/// Accumulates property entries in source order, flushing the running object
/// whenever a spread source interrupts it. Produces either a single object
/// literal or a merge-helper call over all fragments.
#[derive(Debug, Default)]
pub struct PropsBuilder {
    running: Vec<PropEntry>,
    sources: Vec<PropsSource>,
    dynamic_spread: bool,
}

impl PropsBuilder {
    pub fn new() -> Self {
        PropsBuilder::default()
    }

    pub fn push(&mut self, entry: PropEntry) {
        self.running.push(entry);
    }

    pub fn push_spread(&mut self, source: String, dynamic: bool) {
        self.flush();
        if dynamic {
            self.dynamic_spread = true;
        }
        self.sources.push(PropsSource::Spread(source));
    }

    fn flush(&mut self) {
        if !self.running.is_empty() {
            self.sources.push(PropsSource::Object(std::mem::take(&mut self.running)));
        }
    }

    pub fn finish(mut self, imports: &mut ImportRegistry) -> String {
        // At least one source always exists, even if it is an empty object.
        if !self.running.is_empty() || self.sources.is_empty() {
            self.sources.push(PropsSource::Object(std::mem::take(&mut self.running)));
        }
        let rendered: Vec<String> = self.sources.iter().map(render_source).collect();
        if rendered.len() > 1 || self.dynamic_spread {
            let merge = imports.register("mergeProps");
            format!("{}({})", merge, rendered.join(", "))
        } else {
            rendered.into_iter().next().unwrap_or_else(|| "{}".to_string())
        }
    }
}

fn render_source(source: &PropsSource) -> String {
    match source {
        PropsSource::Object(entries) if entries.is_empty() => "{}".to_string(),
        PropsSource::Object(entries) => {
            let body = entries.iter().map(PropEntry::render).collect::<Vec<_>>().join(", ");
            format!("{{ {} }}", body)
        }
        PropsSource::Spread(code) => code.clone(),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// THE PASS
// ═══════════════════════════════════════════════════════════════════════════════

/// Compiles one component-tagged element. The caller has already decided the
/// node is a component; this pass never re-classifies it.
pub fn transform_component<C>(
    ctx: &mut TransformCtx,
    compiler: &C,
    element: &ElementNode,
) -> Result<ComponentOutput, CompileError>
where
    C: TemplateCompiler + ?Sized,
{
    log::debug!(
        "compiling component <{}> at {}:{}",
        tag_label(&element.tag),
        element.location.line,
        element.location.column
    );
    let tag = resolve_component_tag(ctx, &element.tag);

    // An attribute literally named `children` is the final authority on the
    // children value; nested child content is suppressed by its presence.
    let has_children_attr = element
        .attributes
        .iter()
        .any(|a| matches!(a, Attribute::Named(n) if n.name == "children"));

    let mut props = PropsBuilder::new();
    for attribute in &element.attributes {
        match attribute {
            Attribute::Spread(spread) => {
                if is_dynamic(&spread.argument, &DynamismChecks::member(), ctx.bindings) {
                    // A zero-argument call defers by passing its callee;
                    // anything else defers behind a lazy closure.
                    let source = unwrap_thunk(&spread.argument, true)
                        .unwrap_or_else(|| format!("() => {}", spread.argument));
                    props.push_spread(source, true);
                } else {
                    props.push_spread(spread.argument.clone(), false);
                }
            }
            Attribute::Named(attr) => compile_named_attribute(ctx, attr, &mut props),
        }
    }

    if !has_children_attr {
        let filtered = filter_children(&element.children);
        if let Some(children) = transform_component_children(ctx, compiler, &filtered)? {
            props.push(children_entry(children));
        }
    } else if !element.children.is_empty() {
        log::debug!("explicit children attribute suppresses nested child content");
    }

    let props_expr = props.finish(ctx.imports);
    let create = ctx.imports.register("createComponent");
    let call = format!("{}({}, {})", create, tag.code, props_expr);
    Ok(ComponentOutput {
        expressions: assemble_expressions(Vec::new(), call),
        component: true,
    })
}

fn compile_named_attribute(ctx: &mut TransformCtx, attr: &NamedAttribute, props: &mut PropsBuilder) {
    match &attr.value {
        None => props.push(PropEntry::Plain {
            key: attr.name.clone(),
            value: "true".to_string(),
        }),
        Some(AttributeValue::Literal(text)) => props.push(PropEntry::Plain {
            key: attr.name.clone(),
            value: js_string(text),
        }),
        Some(AttributeValue::Expression(code)) => {
            if attr.name == "ref" {
                // Refs need a live instance; server rendering has none.
                if ctx.config.generate == GenerateMode::Ssr {
                    log::debug!("dropping ref attribute under server rendering");
                    return;
                }
                compile_ref_attribute(ctx, code, props);
            } else if is_dynamic(code, &DynamismChecks::member_and_tags(), ctx.bindings) {
                let body = if ctx.config.wrap_conditionals
                    && ctx.config.generate != GenerateMode::Ssr
                    && is_conditional_expression(code)
                {
                    wrap_conditional(ctx, code)
                } else {
                    code.clone()
                };
                props.push(PropEntry::Getter {
                    key: attr.name.clone(),
                    body: GetterBody::Return(body),
                });
            } else {
                props.push(PropEntry::Plain {
                    key: attr.name.clone(),
                    value: code.clone(),
                });
            }
        }
    }
}

/// Refs work whether the user supplies a mutable slot, a stable function, or
/// a composed forwarding call; the capture happens exactly once in all forms.
fn compile_ref_attribute(ctx: &mut TransformCtx, code: &str, props: &mut PropsBuilder) {
    match classify_ref(code, ctx.bindings) {
        RefShape::Assignable { expr } => props.push(PropEntry::RefMethod {
            statements: vec![
                format!("const _ref$ = {};", expr),
                format!("typeof _ref$ === \"function\" ? _ref$(r$) : {} = r$;", expr),
            ],
        }),
        RefShape::Callable { expr } => props.push(PropEntry::Plain {
            key: "ref".to_string(),
            value: expr,
        }),
        RefShape::CallResult { expr } => props.push(PropEntry::RefMethod {
            statements: vec![
                format!("const _ref$ = {};", expr),
                "typeof _ref$ === \"function\" && _ref$(r$);".to_string(),
            ],
        }),
        RefShape::Unsupported => {
            log::debug!("dropping unsupported ref expression: {}", code);
        }
    }
}

fn children_entry(children: CompiledChildren) -> PropEntry {
    if children.dynamic {
        let body = match lazy_body(&children.value) {
            Some(LazyBody::Expression(expr)) => GetterBody::Return(expr),
            Some(LazyBody::Block(block)) => GetterBody::Block(block),
            None => GetterBody::Return(format!("{}()", children.value)),
        };
        PropEntry::Getter { key: "children".to_string(), body }
    } else {
        PropEntry::Plain { key: "children".to_string(), value: children.value }
    }
}

/// Auxiliary statements force the call behind an immediately-invoked closure.
/// The current pipeline never produces any; the branch is kept for compiling
/// steps that hoist.
pub(crate) fn assemble_expressions(auxiliary: Vec<String>, call: String) -> Vec<String> {
    if auxiliary.is_empty() {
        vec![call]
    } else {
        vec![format!(
            "(() => {{ {} return {}; }})()",
            auxiliary.join(" "),
            call
        )]
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// DRIVER-FACING CONVENIENCE
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledComponent {
    pub code: String,
    pub imports: String,
}

/// Compiles a single component invocation with the built-in template
/// compiler for the configured target, returning the rendered call and the
/// helper import statement it needs.
pub fn compile_component(
    config: &CompileConfig,
    bindings: &BindingTable,
    element: &ElementNode,
) -> Result<CompiledComponent, CompileError> {
    let mut imports = ImportRegistry::new(config.module_name.as_str());
    let compiler = templates::for_target(config.generate);
    let output = {
        let mut ctx = TransformCtx::new(config, bindings, &mut imports);
        transform_component(&mut ctx, compiler.as_ref(), element)?
    };
    Ok(CompiledComponent {
        code: output.expressions.join("\n"),
        imports: imports.render(),
    })
}
