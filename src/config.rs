use serde::{Deserialize, Serialize};

/// Output target for compiled component invocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerateMode {
    /// Direct-DOM output.
    Dom,
    /// Server-string rendering. Refs are dropped and conditional wrapping is
    /// skipped in this mode.
    Ssr,
    /// Target-agnostic output against the universal renderer.
    Universal,
}

impl Default for GenerateMode {
    fn default() -> Self {
        GenerateMode::Dom
    }
}

/// Compiler configuration, threaded explicitly through every entry point.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileConfig {
    #[serde(default)]
    pub generate: GenerateMode,
    /// Component names resolved against the runtime module when no local
    /// binding shadows them (e.g. `For`, `Show`).
    #[serde(default)]
    pub built_ins: Vec<String>,
    /// Wrap dynamic logical/conditional attribute values so branch
    /// re-evaluation short-circuits on an unchanged test.
    #[serde(default = "default_wrap_conditionals")]
    pub wrap_conditionals: bool,
    /// Runtime helper used by the conditional wrapper.
    #[serde(default = "default_memo_wrapper")]
    pub memo_wrapper: String,
    /// Module the runtime helpers are imported from.
    #[serde(default = "default_module_name")]
    pub module_name: String,
}

fn default_wrap_conditionals() -> bool {
    true
}

fn default_memo_wrapper() -> String {
    "memo".to_string()
}

fn default_module_name() -> String {
    "lumen/web".to_string()
}

impl Default for CompileConfig {
    fn default() -> Self {
        CompileConfig {
            generate: GenerateMode::default(),
            built_ins: Vec::new(),
            wrap_conditionals: default_wrap_conditionals(),
            memo_wrapper: default_memo_wrapper(),
            module_name: default_module_name(),
        }
    }
}

impl CompileConfig {
    pub fn for_target(generate: GenerateMode) -> Self {
        CompileConfig {
            generate,
            ..CompileConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let config: CompileConfig = serde_json::from_str(r#"{ "generate": "ssr" }"#).unwrap();
        assert_eq!(config.generate, GenerateMode::Ssr);
        assert!(config.wrap_conditionals);
        assert_eq!(config.memo_wrapper, "memo");
        assert_eq!(config.module_name, "lumen/web");
    }
}
