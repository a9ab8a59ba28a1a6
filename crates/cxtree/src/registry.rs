//! Class-to-wrapper tables.
//!
//! Each front-end class with a stable counterpart has an entry giving its
//! [`NodeKind`], the accessors it supports, and the downcast that produces its
//! cached payload pointer. Entries carry the front-end version that introduced
//! the class, so a registry can describe an older node set.

use std::ptr::NonNull;
use std::rc::Rc;

use cxtree_frontend::{FRONTEND_VERSION, FrontendVersion, NodeClass, NodePtr};
use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashMap, FxHashSet};

use crate::accessor::Accessor::*;
use crate::liveness::Liveness;
use crate::payload::{Concrete, downcast};
use crate::{
    AccessorSet, BindingError, KindSet, Node, NodeKind, RegistryConfig, Result, UnknownKindPolicy,
};

type Construct = unsafe fn(NodePtr) -> Option<Concrete>;

/// Registered wrapper for one class.
#[derive(Clone, Copy, Debug)]
pub struct Entry {
    kind: NodeKind,
    accessors: AccessorSet,
    construct: Construct,
}

impl Entry {
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn accessors(&self) -> AccessorSet {
        self.accessors
    }
}

struct TableEntry {
    class: NodeClass,
    since: FrontendVersion,
    entry: Entry,
}

const BASELINE: FrontendVersion = FrontendVersion::new(3, 0);

const NONE: AccessorSet = AccessorSet::EMPTY;
const NAMED: AccessorSet = AccessorSet::new([DeclaredName]);
const VALUE: AccessorSet = NAMED.union(AccessorSet::new([QualifiedType]));
const FUNCTION: AccessorSet = VALUE.union(AccessorSet::new([
    StorageClass,
    IsInline,
    IsVariadic,
    IsDefinition,
    Parameters,
    Body,
]));
const EXPR: AccessorSet = AccessorSet::new([QualifiedType]);
const LITERAL: AccessorSet = EXPR.union(AccessorSet::new([LiteralValue, LiteralSpelling]));
const BINARY: AccessorSet =
    EXPR.union(AccessorSet::new([BinaryOpcode, OperatorSpelling, Lhs, Rhs]));
const CAST: AccessorSet = EXPR.union(AccessorSet::new([CastKind, SubExpr]));

macro_rules! table {
    ($($class:ident => $kind:ident, $accessors:expr, $variant:ident $(, since $major:literal)?;)*) => {
        &[$(TableEntry {
            class: NodeClass::$class,
            since: table!(@since $($major)?),
            entry: Entry {
                kind: NodeKind::$kind,
                accessors: $accessors,
                construct: |ptr| unsafe { downcast(ptr) }.map(Concrete::$variant),
            },
        },)*]
    };
    (@since) => { BASELINE };
    (@since $major:literal) => { FrontendVersion::new($major, 0) };
}

#[expect(unsafe_code)]
static TABLE: &[TableEntry] = table! {
    TranslationUnitDecl => TranslationUnit, NONE, Base;
    NamespaceDecl => Namespace, NAMED, Named;
    TypedefDecl => Typedef, NAMED.union(AccessorSet::new([UnderlyingType])), Typedef;
    RecordDecl => Record, NAMED.union(AccessorSet::new([TagKind, IsDefinition])), Record;
    EnumDecl => Enum, NAMED.union(AccessorSet::new([IsScoped, IsDefinition])), Enum;
    FieldDecl => Field, VALUE.union(AccessorSet::new([BitWidth, Initializer])), Field;
    EnumConstantDecl => EnumConstant, VALUE.union(AccessorSet::new([EnumValue, Initializer])), EnumConstant;
    FunctionDecl => Function, FUNCTION, Function;
    CXXMethodDecl => Method, FUNCTION.union(AccessorSet::new([IsVirtual, IsPureVirtual, IsStatic, IsConst])), Method;
    VarDecl => Variable, VALUE.union(AccessorSet::new([StorageClass, IsDefinition, Initializer])), Var;
    ParmVarDecl => Parameter, VALUE.union(AccessorSet::new([Initializer])), Parm;

    NullStmt => NullStmt, NONE, Base;
    CompoundStmt => CompoundStmt, NONE, Base;
    DeclStmt => DeclStmt, NONE, Base;
    ReturnStmt => ReturnStmt, AccessorSet::new([ReturnValue]), Base;
    IfStmt => IfStmt, AccessorSet::new([Condition, ThenBranch, ElseBranch]), Base;
    ForStmt => ForStmt, AccessorSet::new([ForInit, Condition, ForIncrement, Body]), Base;
    WhileStmt => WhileStmt, AccessorSet::new([Condition, Body]), Base;
    DoStmt => DoStmt, AccessorSet::new([Body, Condition]), Base;
    SwitchStmt => SwitchStmt, AccessorSet::new([Condition, Body]), Base;
    CaseStmt => CaseStmt, AccessorSet::new([Body]), Base;
    DefaultStmt => DefaultStmt, AccessorSet::new([Body]), Base;
    BreakStmt => BreakStmt, NONE, Base;
    ContinueStmt => ContinueStmt, NONE, Base;

    IntegerLiteral => IntegerLiteral, LITERAL, Integer;
    FloatingLiteral => FloatingLiteral, LITERAL, Floating;
    FixedPointLiteral => FixedPointLiteral, LITERAL, FixedPoint, since 11;
    CharacterLiteral => CharacterLiteral, LITERAL, Character;
    StringLiteral => StringLiteral, LITERAL, String;
    CXXBoolLiteralExpr => BoolLiteral, LITERAL, Bool;
    CXXNullPtrLiteralExpr => NullPtrLiteral, LITERAL, Expr;
    ParenExpr => ParenExpr, EXPR.union(AccessorSet::new([SubExpr])), Expr;
    UnaryOperator => UnaryOperator, EXPR.union(AccessorSet::new([UnaryOpcode, OperatorSpelling, IsPostfix, SubExpr])), Unary;
    BinaryOperator => BinaryOperator, BINARY, Binary;
    CompoundAssignOperator => CompoundAssignOperator, BINARY, CompoundAssign;
    ConditionalOperator => ConditionalOperator, EXPR.union(AccessorSet::new([Condition, ThenBranch, ElseBranch])), Expr;
    CallExpr => CallExpr, EXPR.union(AccessorSet::new([Callee, Arguments])), Expr;
    DeclRefExpr => DeclRefExpr, EXPR.union(AccessorSet::new([DeclaredName, Referenced])), DeclRef;
    MemberExpr => MemberRefExpr, EXPR.union(AccessorSet::new([DeclaredName, Referenced, IsArrow, SubExpr])), Member;
    ArraySubscriptExpr => ArraySubscriptExpr, EXPR.union(AccessorSet::new([Lhs, Rhs])), Expr;
    ImplicitCastExpr => ImplicitCastExpr, CAST, Cast;
    CStyleCastExpr => CStyleCastExpr, CAST, Cast;
    InitListExpr => InitListExpr, EXPR.union(AccessorSet::new([Arguments])), Expr;
};

/// Builds a [`Registry`] with per-class adjustments.
#[derive(Debug, Clone)]
pub struct RegistryBuilder {
    config: RegistryConfig,
    excluded: FxHashSet<NodeClass>,
    transparent: FxHashSet<NodeClass>,
}

impl RegistryBuilder {
    /// Leaves `class` unregistered, as if the tables did not know it.
    #[must_use]
    pub fn exclude(mut self, class: NodeClass) -> Self {
        self.excluded.insert(class);
        self
    }

    /// Makes `class` invisible: cursors and traversal step through it to its
    /// first child.
    #[must_use]
    pub fn transparent(mut self, class: NodeClass) -> Self {
        self.transparent.insert(class);
        self
    }

    pub fn build(self) -> Registry {
        if self.config.frontend > FRONTEND_VERSION {
            tracing::warn!(
                configured = %self.config.frontend,
                known = %FRONTEND_VERSION,
                "registry configured for a newer front-end than the binding knows"
            );
        }
        let mut entries = IndexMap::with_capacity_and_hasher(TABLE.len(), FxBuildHasher);
        let mut supporting = FxHashMap::<_, KindSet>::default();
        for table_entry in TABLE {
            let class = table_entry.class;
            if table_entry.since > self.config.frontend
                || self.excluded.contains(&class)
                || self.transparent.contains(&class)
            {
                continue;
            }
            let entry = table_entry.entry;
            for accessor in entry.accessors.iter() {
                let kinds = supporting.entry(accessor).or_default();
                *kinds = kinds.with(entry.kind);
            }
            entries.insert(class, entry);
        }
        Registry { config: self.config, entries, transparent: self.transparent, supporting }
    }
}

/// Maps front-end classes to wrapper kinds and accessor sets.
#[derive(Debug)]
pub struct Registry {
    config: RegistryConfig,
    entries: IndexMap<NodeClass, Entry, FxBuildHasher>,
    transparent: FxHashSet<NodeClass>,
    supporting: FxHashMap<crate::Accessor, KindSet>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::builder(RegistryConfig::default()).build()
    }
}

impl Registry {
    pub fn new(config: RegistryConfig) -> Self {
        Self::builder(config).build()
    }

    pub fn builder(config: RegistryConfig) -> RegistryBuilder {
        let mut transparent = FxHashSet::default();
        transparent.insert(NodeClass::ConstantExpr);
        RegistryBuilder { config, excluded: FxHashSet::default(), transparent }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn entry(&self, class: NodeClass) -> Option<&Entry> {
        self.entries.get(&class)
    }

    /// Registered classes, in table order.
    pub fn classes(&self) -> impl Iterator<Item = NodeClass> + '_ {
        self.entries.keys().copied()
    }

    pub fn is_transparent(&self, class: NodeClass) -> bool {
        self.transparent.contains(&class)
    }

    /// Kind a node of `class` is wrapped as, under the unknown-kind policy.
    pub fn kind_of(&self, class: NodeClass) -> Result<NodeKind> {
        match self.entries.get(&class) {
            Some(entry) => Ok(entry.kind),
            None => self.unexposed(class),
        }
    }

    /// Kinds whose accessor set includes `accessor`.
    pub fn kinds_supporting(&self, accessor: crate::Accessor) -> KindSet {
        self.supporting.get(&accessor).copied().unwrap_or_default()
    }

    fn unexposed(&self, class: NodeClass) -> Result<NodeKind> {
        match self.config.unknown_kinds {
            UnknownKindPolicy::Reject => Err(BindingError::UnknownKind { class }),
            UnknownKindPolicy::Degrade => Ok(if class.is_decl() {
                NodeKind::UnexposedDecl
            } else if class.is_expr() {
                NodeKind::UnexposedExpr
            } else {
                NodeKind::UnexposedStmt
            }),
        }
    }

    /// Steps through transparent classes.
    ///
    /// # Safety
    ///
    /// `ptr` must be a node of a live unit.
    #[expect(unsafe_code)]
    pub(crate) unsafe fn visible(&self, mut ptr: NodePtr) -> NodePtr {
        loop {
            let base = unsafe { ptr.get() };
            if !self.is_transparent(base.class()) {
                return ptr;
            }
            match base.children().next() {
                Some(child) => ptr = child,
                None => return ptr,
            }
        }
    }

    /// Builds the wrapper for a visible node.
    ///
    /// # Safety
    ///
    /// `ptr` must be a node of the live unit `liveness` refers to.
    #[expect(unsafe_code)]
    pub(crate) unsafe fn wrap_ptr(
        self: &Rc<Self>,
        liveness: &Liveness,
        ptr: NodePtr,
    ) -> Result<Node> {
        let ptr = unsafe { self.visible(ptr) };
        let class = unsafe { ptr.get() }.class();
        let (kind, accessors, concrete) = match self.entries.get(&class) {
            Some(entry) => {
                let concrete = unsafe { (entry.construct)(ptr) }
                    .ok_or(BindingError::UnknownKind { class })?;
                (entry.kind, entry.accessors, concrete)
            }
            None => {
                let kind = self.unexposed(class)?;
                tracing::trace!(%class, %kind, "wrapping unregistered class as unexposed");
                (kind, AccessorSet::EMPTY, Concrete::Base(NonNull::from(unsafe { ptr.get() })))
            }
        };
        Ok(Node::new(liveness.clone(), Rc::clone(self), ptr, kind, accessors, concrete))
    }
}

#[cfg(test)]
mod tests {
    use cxtree_frontend::{FrontendVersion, NodeClass};

    use super::{Registry, TABLE};
    use crate::{Accessor, NodeKind, RegistryConfig, UnknownKindPolicy};

    #[test]
    fn table_classes_and_kinds_are_unique() {
        let mut classes: Vec<_> = TABLE.iter().map(|it| it.class).collect();
        let mut kinds: Vec<_> = TABLE.iter().map(|it| it.entry.kind).collect();
        classes.sort();
        classes.dedup();
        kinds.sort();
        kinds.dedup();
        assert_eq!(classes.len(), TABLE.len());
        assert_eq!(kinds.len(), TABLE.len());
        assert!(kinds.iter().all(|kind| !kind.is_unexposed()));
    }

    #[test]
    fn categories_agree_with_classes() {
        for it in TABLE {
            let kind = it.entry.kind;
            assert_eq!(it.class.is_decl(), kind.is_declaration(), "{}", it.class);
            assert_eq!(it.class.is_expr(), kind.is_expression(), "{}", it.class);
        }
    }

    #[test]
    fn older_front_ends_lack_newer_classes() {
        let current = Registry::default();
        assert_eq!(current.kind_of(NodeClass::FixedPointLiteral), Ok(NodeKind::FixedPointLiteral));

        let old = Registry::new(RegistryConfig::default().with_frontend(FrontendVersion::new(10, 0)));
        assert!(old.entry(NodeClass::FixedPointLiteral).is_none());
        assert_eq!(old.kind_of(NodeClass::FixedPointLiteral), Ok(NodeKind::UnexposedExpr));
        assert!(!old.kinds_supporting(Accessor::LiteralValue).contains(NodeKind::FixedPointLiteral));
    }

    #[test]
    fn reverse_index_names_supporting_kinds() {
        let registry = Registry::default();
        let kinds = registry.kinds_supporting(Accessor::BinaryOpcode);
        assert_eq!(kinds.to_string(), "{BinaryOperator, CompoundAssignOperator}");
        assert!(registry.kinds_supporting(Accessor::ForInit).contains(NodeKind::ForStmt));
    }

    #[test]
    fn unknown_classes_follow_the_policy() {
        let degrade = Registry::default();
        assert_eq!(degrade.kind_of(NodeClass::CoawaitExpr), Ok(NodeKind::UnexposedExpr));

        let reject =
            Registry::new(RegistryConfig::default().with_unknown_kinds(UnknownKindPolicy::Reject));
        assert!(reject.kind_of(NodeClass::CoawaitExpr).is_err());
        assert!(reject.kind_of(NodeClass::BinaryOperator).is_ok());
    }

    #[test]
    fn builder_adjustments() {
        let registry = Registry::builder(RegistryConfig::default())
            .exclude(NodeClass::ParenExpr)
            .build();
        assert!(registry.entry(NodeClass::ParenExpr).is_none());
        assert!(registry.is_transparent(NodeClass::ConstantExpr));
        assert!(registry.entry(NodeClass::ConstantExpr).is_none());
    }
}
