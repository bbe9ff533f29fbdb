//! Execution context for migration steps
//!
//! Carries the profile the migration runs under. Side effects that only make
//! sense against a real profile (audit files) are gated on this value instead
//! of on process-wide state.

/// Profile a migration step executes against
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExecutionContext {
    /// Profile name, for log output
    pub profile_name: String,
    /// Disposable profile used by test suites
    pub is_ephemeral: bool,
}

impl ExecutionContext {
    /// Create a context for a regular, persistent profile
    pub fn new(profile_name: impl Into<String>) -> Self {
        Self {
            profile_name: profile_name.into(),
            is_ephemeral: false,
        }
    }

    /// Create a context for a disposable test profile
    pub fn ephemeral(profile_name: impl Into<String>) -> Self {
        Self {
            profile_name: profile_name.into(),
            is_ephemeral: true,
        }
    }

    pub fn is_ephemeral(&self) -> bool {
        self.is_ephemeral
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::new("default")
    }
}

impl std::fmt::Display for ExecutionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_ephemeral {
            write!(f, "ExecutionContext({}, ephemeral)", self.profile_name)
        } else {
            write!(f, "ExecutionContext({})", self.profile_name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_context() {
        let ctx = ExecutionContext::default();
        assert_eq!(ctx.profile_name, "default");
        assert!(!ctx.is_ephemeral());
    }

    #[test]
    fn test_ephemeral_context() {
        let ctx = ExecutionContext::ephemeral("test_profile");
        assert!(ctx.is_ephemeral());
        assert_eq!(ctx.to_string(), "ExecutionContext(test_profile, ephemeral)");
    }
}
