//! Short-circuit wrapping for logical/conditional expressions.
//!
//! A dynamic test re-evaluates its arms on every dependency change even when
//! its truthiness is unchanged. Wrapping the test in the configured memo
//! helper pins each arm to the test's boolean value, so arms only re-run when
//! the branch actually flips.

use oxc_allocator::Allocator;
use oxc_ast::ast::Expression;
use oxc_parser::Parser;
use oxc_span::GetSpan;

use crate::analyze::{
    expression_is_dynamic, peel_parens, slice, source_type, DynamismChecks,
};
use crate::component::TransformCtx;

/// Rewrites dynamic tests of a logical/conditional expression into
/// memo-guarded calls. Returns the input unchanged when nothing qualifies.
/// The caller decides how to defer the result (getter body, lazy closure).
pub fn wrap_conditional(ctx: &mut TransformCtx, code: &str) -> String {
    let allocator = Allocator::default();
    let Ok(parsed) = Parser::new(&allocator, code, source_type()).parse_expression() else {
        return code.to_string();
    };
    let mut replacements: Vec<(u32, u32, String)> = Vec::new();
    collect_wraps(ctx, &parsed, code, &mut replacements);
    if replacements.is_empty() {
        return code.to_string();
    }
    // Apply back to front so earlier spans stay valid.
    replacements.sort_by(|a, b| b.0.cmp(&a.0));
    let mut result = code.to_string();
    for (start, end, replacement) in replacements {
        result.replace_range(start as usize..end as usize, &replacement);
    }
    result
}

fn collect_wraps(
    ctx: &mut TransformCtx,
    expr: &Expression<'_>,
    src: &str,
    out: &mut Vec<(u32, u32, String)>,
) {
    match peel_parens(expr) {
        Expression::ConditionalExpression(cond) => {
            let arm_dynamic = expression_is_dynamic(&cond.consequent, &DynamismChecks::tags(), ctx.bindings)
                || expression_is_dynamic(&cond.alternate, &DynamismChecks::tags(), ctx.bindings);
            if !arm_dynamic {
                return;
            }
            if expression_is_dynamic(&cond.test, &DynamismChecks::member(), ctx.bindings) {
                out.push(memo_wrap(ctx, &cond.test, src));
                for arm in [&cond.consequent, &cond.alternate] {
                    if matches!(
                        peel_parens(arm),
                        Expression::ConditionalExpression(_) | Expression::LogicalExpression(_)
                    ) {
                        collect_wraps(ctx, arm, src, out);
                    }
                }
            }
        }
        Expression::LogicalExpression(logical) => {
            if expression_is_dynamic(&logical.left, &DynamismChecks::member(), ctx.bindings) {
                out.push(memo_wrap(ctx, &logical.left, src));
            }
        }
        _ => {}
    }
}

fn memo_wrap(ctx: &mut TransformCtx, test: &Expression<'_>, src: &str) -> (u32, u32, String) {
    let memo_name = ctx.config.memo_wrapper.clone();
    let memo = ctx.imports.register(&memo_name);
    let span = test.span();
    let test_src = slice(src, span);
    // Comparisons already produce booleans; everything else is coerced so the
    // memo only invalidates on a truthiness flip.
    let guarded = if matches!(peel_parens(test), Expression::BinaryExpression(_)) {
        test_src
    } else {
        format!("!!{}", test_src)
    };
    (span.start, span.end, format!("{}(() => {})()", memo, guarded))
}
