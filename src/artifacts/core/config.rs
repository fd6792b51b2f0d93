use std::time::Duration;

pub const DEFAULT_MAX_TREE_DEPTH: usize = 256;

/// Settings for one fetch: HTTP behaviour and checkout limits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// Bound on each HTTP request; `None` waits indefinitely
    pub timeout: Option<Duration>,
    pub user_agent: String,
    /// Deepest tree nesting the materializer will follow
    pub max_tree_depth: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig {
            timeout: None,
            user_agent: default_user_agent(),
            max_tree_depth: DEFAULT_MAX_TREE_DEPTH,
        }
    }
}

impl FetchConfig {
    pub fn with_timeout_secs(mut self, secs: Option<u64>) -> Self {
        self.timeout = secs.map(Duration::from_secs);
        self
    }

    pub fn with_max_tree_depth(mut self, depth: usize) -> Self {
        self.max_tree_depth = depth;
        self
    }
}

pub fn default_user_agent() -> String {
    format!("bitclone/{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_no_timeout() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout, None);
        assert_eq!(config.max_tree_depth, DEFAULT_MAX_TREE_DEPTH);
        assert!(config.user_agent.starts_with("bitclone/"));
    }

    #[test]
    fn builder_overrides() {
        let config = FetchConfig::default()
            .with_timeout_secs(Some(30))
            .with_max_tree_depth(4);
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.max_tree_depth, 4);
    }
}
