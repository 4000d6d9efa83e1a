//! Children compilation for component invocations.
//!
//! Children collapse into a single value with a staticity flag: absent, one
//! compiled sub-expression, or a lazily-built collection. A single compiled
//! element child is always forced dynamic so the parent can re-run child
//! construction independently of its own re-renders.

use crate::analyze::unwrap_thunk;
use crate::component::TransformCtx;
use crate::ir::{CompileError, MarkupNode};
use crate::templates::{TemplateCompiler, TransformInfo};
use crate::text::{decode_entities, is_blank, js_string, trim_whitespace};

/// One compiled children value and whether it must be re-read lazily.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledChildren {
    pub value: String,
    pub dynamic: bool,
}

/// Drops children that carry no content: whitespace-only text and empty
/// expression containers.
pub fn filter_children(children: &[MarkupNode]) -> Vec<&MarkupNode> {
    children
        .iter()
        .filter(|child| match child {
            MarkupNode::Text(text) => !is_blank(&text.value),
            MarkupNode::Expression(expr) => !expr.code.trim().is_empty(),
            _ => true,
        })
        .collect()
}

pub fn transform_component_children<C>(
    ctx: &mut TransformCtx,
    compiler: &C,
    filtered: &[&MarkupNode],
) -> Result<Option<CompiledChildren>, CompileError>
where
    C: TemplateCompiler + ?Sized,
{
    if filtered.is_empty() {
        return Ok(None);
    }
    let multiple = filtered.len() > 1;
    let mut dynamic = false;
    let mut compiled: Vec<String> = Vec::new();

    for child in filtered {
        match child {
            MarkupNode::Text(text) => {
                let value = decode_entities(&trim_whitespace(&text.value));
                if !value.is_empty() {
                    compiled.push(js_string(&value));
                }
            }
            node => {
                log::trace!(
                    "compiling {} child at {}:{}",
                    node.kind(),
                    node.location().line,
                    node.location().column
                );
                let info = TransformInfo { top_level: true, component_child: true };
                let transformed = compiler.transform(ctx, node, &info)?;
                dynamic = dynamic || transformed.dynamic;
                compiled.push(compiler.create_template(ctx, node, &transformed, multiple)?);
            }
        }
    }

    if compiled.len() == 1 {
        let Some(value) = compiled.pop() else {
            return Ok(None);
        };
        let result = match filtered[0] {
            // Containers, spreads and text already carry the right verdict.
            MarkupNode::Expression(_) | MarkupNode::Spread(_) | MarkupNode::Text(_) => {
                CompiledChildren { value, dynamic }
            }
            // A lone element or component child is read lazily regardless of
            // the sub-compiler's verdict.
            MarkupNode::Element(_) => {
                let value = unwrap_thunk(&value, false)
                    .unwrap_or_else(|| format!("() => {}", value));
                CompiledChildren { value, dynamic: true }
            }
        };
        Ok(Some(result))
    } else {
        let value = format!("() => [{}]", compiled.join(", "));
        Ok(Some(CompiledChildren { value, dynamic: true }))
    }
}
