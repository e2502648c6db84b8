//! Plugin Registry

use crate::{EvalContext, FunctionMeta, FunctionPlugin};
use almanac_core::{codes, AlmanacError, Value};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, warn};

/// Central function registry, keyed by lowercase name
pub struct PluginRegistry {
    functions: HashMap<String, Arc<dyn FunctionPlugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    pub fn with_function<F: FunctionPlugin + 'static>(mut self, f: F) -> Self {
        let name = f.meta().name.to_lowercase();
        self.functions.insert(name, Arc::new(f));
        self
    }

    pub fn get_function(&self, name: &str) -> Option<&dyn FunctionPlugin> {
        self.functions.get(&name.to_lowercase()).map(|f| f.as_ref())
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Registered names as declared by each plugin, sorted
    pub fn function_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.functions.values().map(|f| f.meta().name).collect();
        names.sort_unstable();
        names
    }

    pub fn call_function(&self, name: &str, args: &[Value], ctx: &EvalContext) -> Value {
        match self.get_function(name) {
            Some(f) => {
                debug!(function = name, args = args.len(), "calling function");
                let result = f.call(args, ctx);
                if let Value::Error(e) = &result {
                    debug!(function = name, code = %e.code, "function returned error");
                }
                result
            }
            None => {
                warn!(function = name, "unknown function");
                let similar = self.find_similar_functions(name);
                let mut err = AlmanacError::undefined_func(name);
                if !similar.is_empty() {
                    let suggestions: Vec<&str> = similar.iter().take(5).copied().collect();
                    err = err.with_suggestion(format!(
                        "Similar: {}. Use help() for full list.",
                        suggestions.join(", ")
                    ));
                }
                Value::Error(err)
            }
        }
    }

    /// Function names similar to the given name, best match first
    fn find_similar_functions(&self, name: &str) -> Vec<&'static str> {
        let name_lower = name.to_lowercase();
        let mut matches: Vec<(&'static str, usize)> = self
            .functions
            .iter()
            .filter_map(|(key, f)| {
                let score = Self::similarity_score(&name_lower, key);
                (score > 0).then(|| (f.meta().name, score))
            })
            .collect();

        matches.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        matches.into_iter().map(|(name, _)| name).collect()
    }

    fn similarity_score(query: &str, candidate: &str) -> usize {
        let mut score = 0;

        if candidate.starts_with(query) {
            score += 100;
        } else if candidate.contains(query) {
            score += 50;
        } else if query.contains(candidate) {
            score += 30;
        }

        let query_chars: HashSet<char> = query.chars().collect();
        let candidate_chars: HashSet<char> = candidate.chars().collect();
        let common = query_chars.intersection(&candidate_chars).count();
        // Few shared letters is noise, not similarity
        if score == 0 && common * 2 < query_chars.len() {
            return 0;
        }
        score += common * 2;

        let len_diff = query.len().abs_diff(candidate.len());
        if len_diff < 5 && score > 0 {
            score += 5 - len_diff;
        }

        score
    }

    pub fn help(&self, name: Option<&str>) -> Value {
        match name {
            Some(n) => self.help_for(n),
            None => self.general_help(),
        }
    }

    fn help_for(&self, name: &str) -> Value {
        match self.get_function(name) {
            Some(f) => Value::Object(Self::function_to_help(f.meta())),
            None => Value::Error(AlmanacError::new(
                codes::NOT_FOUND,
                format!("No function named '{}'", name),
            )),
        }
    }

    fn general_help(&self) -> Value {
        let mut funcs_by_cat: HashMap<String, Vec<&'static str>> = HashMap::new();
        for f in self.functions.values() {
            let meta = f.meta();
            funcs_by_cat.entry(meta.category.to_string()).or_default().push(meta.name);
        }

        let mut help = HashMap::new();
        help.insert(
            "functions".to_string(),
            Value::Object(
                funcs_by_cat
                    .into_iter()
                    .map(|(cat, mut names)| {
                        names.sort_unstable();
                        (cat, Value::from(names))
                    })
                    .collect(),
            ),
        );
        help.insert(
            "usage".to_string(),
            Value::Text("Call help('functionName') for detailed help.".to_string()),
        );
        Value::Object(help)
    }

    fn function_to_help(meta: FunctionMeta) -> HashMap<String, Value> {
        let mut help = HashMap::new();
        help.insert("name".to_string(), Value::from(meta.name));
        help.insert("description".to_string(), Value::from(meta.description));
        help.insert("usage".to_string(), Value::from(meta.usage));
        help.insert("returns".to_string(), Value::from(meta.returns));
        help.insert("category".to_string(), Value::from(meta.category));
        help.insert(
            "args".to_string(),
            Value::List(
                meta.args
                    .iter()
                    .map(|a| {
                        let mut arg = HashMap::new();
                        arg.insert("name".to_string(), Value::from(a.name));
                        arg.insert("type".to_string(), Value::from(a.typ));
                        arg.insert("description".to_string(), Value::from(a.description));
                        arg.insert("optional".to_string(), Value::Bool(a.optional));
                        if let Some(default) = a.default {
                            arg.insert("default".to_string(), Value::from(default));
                        }
                        Value::Object(arg)
                    })
                    .collect(),
            ),
        );
        help.insert("examples".to_string(), Value::from(meta.examples.to_vec()));
        help.insert("related".to_string(), Value::from(meta.related.to_vec()));
        help
    }

    pub fn list_functions(&self, category: Option<&str>) -> Value {
        let mut metas: Vec<FunctionMeta> = self
            .functions
            .values()
            .map(|f| f.meta())
            .filter(|meta| category.map_or(true, |c| meta.category == c))
            .collect();
        metas.sort_by_key(|meta| meta.name);

        Value::List(
            metas
                .into_iter()
                .map(|meta| {
                    let mut obj = HashMap::new();
                    obj.insert("name".to_string(), Value::from(meta.name));
                    obj.insert("description".to_string(), Value::from(meta.description));
                    obj.insert("usage".to_string(), Value::from(meta.usage));
                    obj.insert("category".to_string(), Value::from(meta.category));
                    Value::Object(obj)
                })
                .collect(),
        )
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ArgMeta;

    struct Echo;

    static ECHO_ARGS: [ArgMeta; 1] = [ArgMeta::required("value", "Any", "Value to return")];

    impl FunctionPlugin for Echo {
        fn meta(&self) -> FunctionMeta {
            FunctionMeta {
                name: "echoValue",
                description: "Return the argument",
                usage: "echoValue(value)",
                args: &ECHO_ARGS,
                returns: "Any",
                examples: &["echoValue(1)"],
                category: "test",
                related: &[],
            }
        }

        fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
            args.first().cloned().unwrap_or_default()
        }
    }

    fn registry() -> PluginRegistry {
        PluginRegistry::new().with_function(Echo)
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let r = registry();
        assert!(r.get_function("ECHOVALUE").is_some());
        let v = r.call_function("echovalue", &[Value::Number(3)], &EvalContext::default());
        assert_eq!(v, Value::Number(3));
        assert_eq!(r.function_names(), vec!["echoValue"]);
    }

    #[test]
    fn test_unknown_function_suggests() {
        let v = registry().call_function("echo", &[], &EvalContext::default());
        let err = v.as_error().unwrap();
        assert_eq!(err.code, codes::UNDEFINED_FUNC);
        assert!(err.suggestion.as_deref().unwrap().contains("echoValue"));
    }

    #[test]
    fn test_unrelated_name_has_no_similar() {
        let v = registry().call_function("zzz", &[], &EvalContext::default());
        let err = v.as_error().unwrap();
        assert!(!err.suggestion.as_deref().unwrap().starts_with("Similar"));
    }

    #[test]
    fn test_help() {
        let r = registry();
        let help = r.help(Some("echoValue"));
        assert_eq!(help.get("usage").as_text(), Some("echoValue(value)"));
        assert_eq!(help.get("args").as_list().map(|a| a.len()), Some(1));

        let general = r.help(None);
        let test_cat = general.get("functions").get("test");
        assert_eq!(test_cat.as_list().map(|l| l.len()), Some(1));

        assert!(r.help(Some("missing")).is_error());
    }

    #[test]
    fn test_list_functions_by_category() {
        let r = registry();
        assert_eq!(r.list_functions(Some("test")).as_list().map(|l| l.len()), Some(1));
        assert_eq!(r.list_functions(Some("other")).as_list().map(|l| l.len()), Some(0));
    }
}
