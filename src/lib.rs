//! # Lumen Component Compiler
//!
//! Compilation pass turning component-tagged markup nodes into the
//! construction calls the reactive runtime executes.
//!
//! ## Ground rules
//!
//! 1. **One-way data flow**: tag → normalized callee; attributes → ordered
//!    property entries interleaved with spread sources; children → one
//!    compiled value. All three feed the call assembler.
//! 2. **Laziness is the default for anything dynamic**: values the classifier
//!    cannot prove constant are emitted behind zero-argument accessors so the
//!    runtime re-reads them.
//! 3. **Insertion order is override order**: later attributes and spreads win
//!    over earlier ones, matching object-literal merge semantics.
//! 4. **The input tree is never mutated**: normalization produces fresh
//!    values; the pass only reads the markup IR.
//! 5. **Determinism**: no ambient randomness; temporaries and helper aliases
//!    derive from fixed names, so identical input and configuration always
//!    produce identical output.

pub mod analyze;
pub mod bindings;
pub mod children;
pub mod component;
pub mod condition;
pub mod config;
pub mod imports;
pub mod ir;
pub mod tag;
pub mod templates;
pub mod text;

pub use bindings::{BindingKind, BindingTable};
pub use component::{
    compile_component, transform_component, CompiledComponent, ComponentOutput, TransformCtx,
};
pub use config::{CompileConfig, GenerateMode};
pub use imports::ImportRegistry;
pub use ir::{
    Attribute, AttributeValue, CompileError, ElementNode, ExpressionNode, MarkupNode,
    NamedAttribute, SourceLocation, SpreadAttribute, SpreadNode, TagName, TextNode,
};
pub use templates::{
    for_target, DomTemplates, SsrTemplates, TemplateCompiler, TransformInfo, TransformedChild,
    UniversalTemplates,
};
