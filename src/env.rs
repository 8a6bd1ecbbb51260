use std::collections::HashMap;

/// Source of environment variables consulted during credential resolution.
///
/// [`ProcessEnv`] reads the real process environment. A `HashMap` stands in
/// for it in tests without touching process state.
pub trait Environment {
    /// Returns the value of `key`, or `None` when it is unset.
    fn var(&self, key: &str) -> Option<String>;

    /// Like [`Environment::var`], but treats an empty value as unset.
    fn non_empty_var(&self, key: &str) -> Option<String> {
        self.var(key).filter(|value| !value.is_empty())
    }
}

/// The environment of the running process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl Environment for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl<E: Environment + ?Sized> Environment for &E {
    fn var(&self, key: &str) -> Option<String> {
        (**self).var(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_env_lookup() {
        let env = HashMap::from([("A".to_string(), "1".to_string())]);
        assert_eq!(env.var("A").as_deref(), Some("1"));
        assert!(env.var("B").is_none());
    }

    #[test]
    fn test_non_empty_var_filters_empty_values() {
        let env = HashMap::from([
            ("EMPTY".to_string(), String::new()),
            ("SET".to_string(), "x".to_string()),
        ]);
        assert!(env.non_empty_var("EMPTY").is_none());
        assert!(env.non_empty_var("MISSING").is_none());
        assert_eq!(env.non_empty_var("SET").as_deref(), Some("x"));
    }

    #[test]
    fn test_borrowed_env_delegates() {
        let env = HashMap::from([("A".to_string(), "1".to_string())]);
        fn lookup<E: Environment>(env: E) -> Option<String> {
            env.var("A")
        }
        assert_eq!(lookup(&env).as_deref(), Some("1"));
    }
}
