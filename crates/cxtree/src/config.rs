use cxtree_frontend::{FRONTEND_VERSION, FrontendVersion};

/// What to do with a node whose class has no registered wrapper.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnknownKindPolicy {
    /// Wrap it as `Unexposed{Decl,Expr,Stmt}` with no kind-specific accessors.
    #[default]
    Degrade,
    /// Fail with `UnknownKind`.
    Reject,
}

/// Registry configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Front-end version whose node set the tables should describe.
    pub frontend: FrontendVersion,
    pub unknown_kinds: UnknownKindPolicy,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self { frontend: FRONTEND_VERSION, unknown_kinds: UnknownKindPolicy::default() }
    }
}

impl RegistryConfig {
    #[must_use]
    pub fn with_frontend(mut self, frontend: FrontendVersion) -> Self {
        self.frontend = frontend;
        self
    }

    #[must_use]
    pub fn with_unknown_kinds(mut self, policy: UnknownKindPolicy) -> Self {
        self.unknown_kinds = policy;
        self
    }
}
