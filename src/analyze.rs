//! Static analysis over embedded JavaScript snippets.
//!
//! Attribute values and expression children arrive as source text; every
//! decision below parses the snippet with oxc into a throwaway arena and
//! pattern-matches the AST. Results are returned as owned data so no arena
//! outlives its analysis call.

use oxc_allocator::Allocator;
use oxc_ast::ast::{
    ChainElement, Expression, Function, SpreadElement, Statement,
};
use oxc_ast_visit::{walk, Visit};
use oxc_parser::Parser;
use oxc_span::{GetSpan, SourceType, Span};
use oxc_syntax::scope::ScopeFlags;

use crate::bindings::{BindingKind, BindingTable};

pub(crate) fn source_type() -> SourceType {
    SourceType::default()
        .with_module(true)
        .with_typescript(true)
        .with_jsx(true)
}

pub(crate) fn slice(code: &str, span: Span) -> String {
    code[span.start as usize..span.end as usize].to_string()
}

// The parser preserves parentheses as AST nodes; classification looks through
// them.
pub(crate) fn peel_parens<'b, 'a>(mut expr: &'b Expression<'a>) -> &'b Expression<'a> {
    while let Expression::ParenthesizedExpression(inner) = expr {
        expr = &inner.expression;
    }
    expr
}

// ═══════════════════════════════════════════════════════════════════════════════
// DYNAMISM CLASSIFIER
// ═══════════════════════════════════════════════════════════════════════════════

/// Which syntactic forms count as observable mutation for a given call site.
#[derive(Debug, Clone, Copy)]
pub struct DynamismChecks {
    pub member: bool,
    pub tags: bool,
    pub call_expressions: bool,
}

impl DynamismChecks {
    /// Member-access sensitive, as used for spread arguments.
    pub fn member() -> Self {
        DynamismChecks { member: true, tags: false, call_expressions: true }
    }

    /// Member- and tag-sensitive, as used for attribute values and children.
    pub fn member_and_tags() -> Self {
        DynamismChecks { member: true, tags: true, call_expressions: true }
    }

    /// Tag-sensitive only, as used for conditional arms.
    pub fn tags() -> Self {
        DynamismChecks { member: false, tags: true, call_expressions: true }
    }
}

/// Decides whether an expression's value can change over the component's
/// lifetime: a call, a member access that could observe mutation, a reference
/// to a mutable binding, or (when tag-sensitive) nested markup. Function
/// literals are opaque values and never dynamic themselves.
///
/// Unparseable snippets classify as dynamic; a lazy re-read is always
/// semantically safe.
pub fn is_dynamic(code: &str, checks: &DynamismChecks, bindings: &BindingTable) -> bool {
    let allocator = Allocator::default();
    let Ok(expr) = Parser::new(&allocator, code, source_type()).parse_expression() else {
        log::debug!("unparseable expression treated as dynamic: {}", code);
        return true;
    };
    expression_is_dynamic(&expr, checks, bindings)
}

pub(crate) fn expression_is_dynamic(
    expr: &Expression<'_>,
    checks: &DynamismChecks,
    bindings: &BindingTable,
) -> bool {
    let mut visitor = DynamismVisitor { dynamic: false, checks, bindings };
    visitor.visit_expression(expr);
    visitor.dynamic
}

struct DynamismVisitor<'c> {
    dynamic: bool,
    checks: &'c DynamismChecks,
    bindings: &'c BindingTable,
}

impl<'a, 'c> Visit<'a> for DynamismVisitor<'c> {
    fn visit_expression(&mut self, expr: &Expression<'a>) {
        if self.dynamic {
            return;
        }
        match expr {
            Expression::ArrowFunctionExpression(_) | Expression::FunctionExpression(_) => {}
            Expression::CallExpression(_) | Expression::TaggedTemplateExpression(_)
                if self.checks.call_expressions =>
            {
                self.dynamic = true;
            }
            Expression::StaticMemberExpression(_)
            | Expression::ComputedMemberExpression(_)
            | Expression::PrivateFieldExpression(_)
                if self.checks.member =>
            {
                self.dynamic = true;
            }
            Expression::ChainExpression(chain) => {
                let hit = match &chain.expression {
                    ChainElement::CallExpression(_) => self.checks.call_expressions,
                    ChainElement::StaticMemberExpression(_)
                    | ChainElement::ComputedMemberExpression(_)
                    | ChainElement::PrivateFieldExpression(_) => self.checks.member,
                    _ => false,
                };
                if hit {
                    self.dynamic = true;
                } else {
                    walk::walk_expression(self, expr);
                }
            }
            Expression::JSXElement(_) if self.checks.tags => {
                self.dynamic = true;
            }
            Expression::JSXFragment(fragment) if self.checks.tags => {
                if !fragment.children.is_empty() {
                    self.dynamic = true;
                }
            }
            Expression::JSXElement(_) | Expression::JSXFragment(_) => {}
            Expression::Identifier(ident) => {
                if self.bindings.is_mutable(ident.name.as_str()) {
                    self.dynamic = true;
                }
            }
            _ => walk::walk_expression(self, expr),
        }
    }

    fn visit_spread_element(&mut self, elem: &SpreadElement<'a>) {
        if self.dynamic {
            return;
        }
        if self.checks.member {
            self.dynamic = true;
        } else {
            walk::walk_spread_element(self, elem);
        }
    }

    // Function bodies are deferred execution contexts and never inspected.
    fn visit_function(&mut self, _func: &Function<'a>, _flags: ScopeFlags) {}
}

// ═══════════════════════════════════════════════════════════════════════════════
// REF CLASSIFICATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Shape of a `ref` attribute value after peeling non-null and cast wrappers,
/// carrying the peeled source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefShape {
    /// An assignable target holding either a setter function or a slot to
    /// write the instance into.
    Assignable { expr: String },
    /// A stable function the runtime can call directly: a const-bound
    /// identifier or a function literal.
    Callable { expr: String },
    /// A composing helper invocation whose result may or may not be callable.
    CallResult { expr: String },
    /// Dropped without error.
    Unsupported,
}

pub fn classify_ref(code: &str, bindings: &BindingTable) -> RefShape {
    let allocator = Allocator::default();
    let Ok(parsed) = Parser::new(&allocator, code, source_type()).parse_expression() else {
        return RefShape::Unsupported;
    };
    let mut expr = &parsed;
    loop {
        match expr {
            Expression::TSNonNullExpression(inner) => expr = &inner.expression,
            Expression::TSAsExpression(inner) => expr = &inner.expression,
            Expression::TSSatisfiesExpression(inner) => expr = &inner.expression,
            Expression::ParenthesizedExpression(inner) => expr = &inner.expression,
            _ => break,
        }
    }
    let peeled = slice(code, expr.span());
    match expr {
        Expression::Identifier(ident) => {
            if bindings.kind_of(ident.name.as_str()) == Some(BindingKind::Const) {
                RefShape::Callable { expr: peeled }
            } else {
                RefShape::Assignable { expr: peeled }
            }
        }
        Expression::ArrowFunctionExpression(_) | Expression::FunctionExpression(_) => {
            RefShape::Callable { expr: peeled }
        }
        Expression::StaticMemberExpression(_)
        | Expression::ComputedMemberExpression(_)
        | Expression::PrivateFieldExpression(_) => RefShape::Assignable { expr: peeled },
        Expression::CallExpression(_) => RefShape::CallResult { expr: peeled },
        _ => RefShape::Unsupported,
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// OUTPUT-SHAPE HELPERS
// ═══════════════════════════════════════════════════════════════════════════════

/// Output-size optimization: a zero-argument call can be deferred by passing
/// its callee instead of wrapping the whole call in a closure. `any_callee`
/// permits unwrapping plain identifier callees as well (spread position);
/// child position keeps identifier calls intact.
pub fn unwrap_thunk(code: &str, any_callee: bool) -> Option<String> {
    let allocator = Allocator::default();
    let expr = Parser::new(&allocator, code, source_type()).parse_expression().ok()?;
    if let Expression::CallExpression(call) = peel_parens(&expr) {
        let callee = peel_parens(&call.callee);
        if call.arguments.is_empty()
            && (any_callee || !matches!(callee, Expression::Identifier(_)))
        {
            return Some(slice(code, callee.span()));
        }
    }
    None
}

/// True for logical and conditional expressions, the forms eligible for
/// short-circuit wrapping.
pub fn is_conditional_expression(code: &str) -> bool {
    let allocator = Allocator::default();
    match Parser::new(&allocator, code, source_type()).parse_expression() {
        Ok(expr) => matches!(
            peel_parens(&expr),
            Expression::LogicalExpression(_) | Expression::ConditionalExpression(_)
        ),
        Err(_) => false,
    }
}

/// Body of a deferred-evaluation expression, extracted for getter emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LazyBody {
    Expression(String),
    Block(String),
}

/// Extracts the function body from a zero-argument closure, or from an
/// immediately-invoked function, so a getter can re-run it on each read.
pub fn lazy_body(code: &str) -> Option<LazyBody> {
    let allocator = Allocator::default();
    let parsed = Parser::new(&allocator, code, source_type()).parse_expression().ok()?;
    let root = peel_parens(&parsed);
    let func = match root {
        Expression::CallExpression(call) => {
            let callee = peel_parens(&call.callee);
            if !matches!(
                callee,
                Expression::ArrowFunctionExpression(_) | Expression::FunctionExpression(_)
            ) {
                return None;
            }
            callee
        }
        Expression::ArrowFunctionExpression(_) | Expression::FunctionExpression(_) => root,
        _ => return None,
    };
    match func {
        Expression::ArrowFunctionExpression(arrow) => {
            if arrow.expression {
                match arrow.body.statements.first() {
                    Some(Statement::ExpressionStatement(stmt)) => {
                        Some(LazyBody::Expression(slice(code, stmt.expression.span())))
                    }
                    _ => None,
                }
            } else {
                Some(LazyBody::Block(slice(code, arrow.body.span)))
            }
        }
        Expression::FunctionExpression(function) => {
            let body = function.body.as_ref()?;
            Some(LazyBody::Block(slice(code, body.span)))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::{BindingKind, BindingTable};

    fn no_bindings() -> BindingTable {
        BindingTable::new()
    }

    #[test]
    fn calls_and_members_are_dynamic() {
        let b = no_bindings();
        assert!(is_dynamic("count()", &DynamismChecks::member_and_tags(), &b));
        assert!(is_dynamic("state.value", &DynamismChecks::member_and_tags(), &b));
        assert!(is_dynamic("a?.b", &DynamismChecks::member_and_tags(), &b));
        assert!(is_dynamic("1 + count()", &DynamismChecks::member_and_tags(), &b));
    }

    #[test]
    fn literals_and_functions_are_static() {
        let b = no_bindings();
        assert!(!is_dynamic("42", &DynamismChecks::member_and_tags(), &b));
        assert!(!is_dynamic("\"text\"", &DynamismChecks::member_and_tags(), &b));
        assert!(!is_dynamic("() => count()", &DynamismChecks::member_and_tags(), &b));
        assert!(!is_dynamic("[1, 2, 3]", &DynamismChecks::member_and_tags(), &b));
    }

    #[test]
    fn member_sensitivity_is_optional() {
        let b = no_bindings();
        assert!(!is_dynamic("state.value", &DynamismChecks::tags(), &b));
        assert!(is_dynamic("state.value", &DynamismChecks::member(), &b));
    }

    #[test]
    fn mutable_bindings_are_dynamic() {
        let mut b = BindingTable::new();
        b.add("count", BindingKind::Let).unwrap();
        b.add("fixed", BindingKind::Const).unwrap();
        assert!(is_dynamic("count", &DynamismChecks::member_and_tags(), &b));
        assert!(is_dynamic("count + 1", &DynamismChecks::member_and_tags(), &b));
        assert!(!is_dynamic("fixed", &DynamismChecks::member_and_tags(), &b));
    }

    #[test]
    fn markup_in_expressions_is_tag_sensitive() {
        let b = no_bindings();
        assert!(is_dynamic("<Nested />", &DynamismChecks::member_and_tags(), &b));
        assert!(!is_dynamic("<Nested />", &DynamismChecks::member(), &b));
    }

    #[test]
    fn classifies_ref_shapes() {
        let mut b = BindingTable::new();
        b.add("setEl", BindingKind::Const).unwrap();
        b.add("el", BindingKind::Let).unwrap();
        assert_eq!(classify_ref("el", &b), RefShape::Assignable { expr: "el".into() });
        assert_eq!(classify_ref("refs.button", &b), RefShape::Assignable { expr: "refs.button".into() });
        assert_eq!(classify_ref("setEl", &b), RefShape::Callable { expr: "setEl".into() });
        assert_eq!(
            classify_ref("(r) => (el = r)", &b),
            RefShape::Callable { expr: "(r) => (el = r)".into() }
        );
        assert_eq!(
            classify_ref("mergeRefs(a, b)", &b),
            RefShape::CallResult { expr: "mergeRefs(a, b)".into() }
        );
        assert_eq!(classify_ref("42", &b), RefShape::Unsupported);
    }

    #[test]
    fn peels_cast_wrappers_before_classifying() {
        let b = no_bindings();
        assert_eq!(
            classify_ref("el!", &b),
            RefShape::Assignable { expr: "el".into() }
        );
        assert_eq!(
            classify_ref("el as HTMLDivElement", &b),
            RefShape::Assignable { expr: "el".into() }
        );
    }

    #[test]
    fn unwraps_zero_argument_thunks() {
        assert_eq!(unwrap_thunk("getProps()", true).as_deref(), Some("getProps"));
        assert_eq!(unwrap_thunk("getProps()", false), None);
        assert_eq!(unwrap_thunk("obj.make()", false).as_deref(), Some("obj.make"));
        assert_eq!(unwrap_thunk("make(1)", true), None);
        assert_eq!(unwrap_thunk("props", true), None);
    }

    #[test]
    fn detects_conditional_forms() {
        assert!(is_conditional_expression("a ? b : c"));
        assert!(is_conditional_expression("a && b"));
        assert!(!is_conditional_expression("a + b"));
    }

    #[test]
    fn extracts_lazy_bodies() {
        assert_eq!(
            lazy_body("() => [a, b]"),
            Some(LazyBody::Expression("[a, b]".into()))
        );
        assert_eq!(
            lazy_body("(() => { run(); })()"),
            Some(LazyBody::Block("{ run(); }".into()))
        );
        assert_eq!(lazy_body("value"), None);
    }
}
