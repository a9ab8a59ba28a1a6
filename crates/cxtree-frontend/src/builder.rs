//! Event-driven construction of a translation unit.
//!
//! The front-end opens a node with [`Builder::start`], consumes the tokens it
//! spells, and closes it with [`Marker::complete`]. Node ranges are derived
//! from the consumed tokens; allocations and pointers are fixed at
//! [`Builder::finish`].

use std::ptr::NonNull;

use camino::Utf8PathBuf;
use cxtree_tokenizer::{Token, tokenize};
use drop_bomb::DropBomb;
use text_size::{TextRange, TextSize};

use crate::decl::{
    CXXMethodDecl, EnumConstantDecl, EnumDecl, FieldDecl, FunctionDecl, NamedDecl, ParmVarDecl,
    RecordDecl, TypedefDecl, ValueDecl, VarDecl,
};
use crate::expr::{
    BinaryOperator, CXXBoolLiteralExpr, CastExpr, CharacterLiteral, CompoundAssignOperator,
    DeclRefExpr, Expr, FixedPointLiteral, FloatingLiteral, IntegerLiteral, MemberExpr,
    StringLiteral, UnaryOperator,
};
use crate::maybe_dangling::MaybeDangling;
use crate::node::{NodeBase, NodePtr};
use crate::storage::{Allocation, UnitStorage};
use crate::{
    BinaryOperatorKind, CastKind, NodeClass, QualType, StorageClass, TagTypeKind,
    UnaryOperatorKind,
};

/// Reference to a completed node, usable as a declaration target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeRef(u32);

#[derive(Clone, Debug)]
pub struct FunctionData {
    pub name: Box<str>,
    pub ty: QualType,
    pub storage: StorageClass,
    pub is_inline: bool,
    pub is_variadic: bool,
    pub is_definition: bool,
}

impl FunctionData {
    pub fn new(name: &str, ty: QualType) -> Self {
        Self {
            name: name.into(),
            ty,
            storage: StorageClass::None,
            is_inline: false,
            is_variadic: false,
            is_definition: false,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct MethodFlags {
    pub is_virtual: bool,
    pub is_pure: bool,
    pub is_const: bool,
    pub is_static: bool,
}

/// Payload of a node as the front-end describes it.
#[derive(Clone, Debug)]
pub enum NodeData {
    TranslationUnit,
    Namespace { name: Box<str> },
    Typedef { name: Box<str>, underlying: QualType },
    Record { name: Box<str>, tag: TagTypeKind, is_definition: bool },
    Enum { name: Box<str>, is_scoped: bool, is_definition: bool },
    Field { name: Box<str>, ty: QualType, bit_width: Option<u32> },
    EnumConstant { name: Box<str>, ty: QualType, value: i64 },
    Function(FunctionData),
    Method(FunctionData, MethodFlags),
    Var { name: Box<str>, ty: QualType, storage: StorageClass, is_definition: bool },
    Parm { name: Box<str>, ty: QualType },
    /// A statement class without payload.
    Stmt(NodeClass),
    /// An expression class whose only payload is its type.
    Expr(NodeClass, QualType),
    IntegerLiteral { ty: QualType, value: u64 },
    FloatingLiteral { ty: QualType, value: f64 },
    FixedPointLiteral { ty: QualType, value: i64, scale: u32 },
    CharacterLiteral { ty: QualType, value: u32 },
    StringLiteral { ty: QualType, bytes: Box<[u8]> },
    BoolLiteral { ty: QualType, value: bool },
    Unary { ty: QualType, opcode: UnaryOperatorKind },
    Binary { ty: QualType, opcode: BinaryOperatorKind },
    CompoundAssign { ty: QualType, opcode: BinaryOperatorKind },
    DeclRef { ty: QualType, name: Box<str>, decl: Option<NodeRef> },
    Member { ty: QualType, member: Box<str>, is_arrow: bool, decl: Option<NodeRef> },
    /// `class` is `ImplicitCastExpr` or `CStyleCastExpr`.
    Cast { class: NodeClass, ty: QualType, kind: CastKind },
}

impl NodeData {
    pub fn class(&self) -> NodeClass {
        match self {
            Self::TranslationUnit => NodeClass::TranslationUnitDecl,
            Self::Namespace { .. } => NodeClass::NamespaceDecl,
            Self::Typedef { .. } => NodeClass::TypedefDecl,
            Self::Record { .. } => NodeClass::RecordDecl,
            Self::Enum { .. } => NodeClass::EnumDecl,
            Self::Field { .. } => NodeClass::FieldDecl,
            Self::EnumConstant { .. } => NodeClass::EnumConstantDecl,
            Self::Function(_) => NodeClass::FunctionDecl,
            Self::Method(..) => NodeClass::CXXMethodDecl,
            Self::Var { .. } => NodeClass::VarDecl,
            Self::Parm { .. } => NodeClass::ParmVarDecl,
            Self::Stmt(class) | Self::Expr(class, _) | Self::Cast { class, .. } => *class,
            Self::IntegerLiteral { .. } => NodeClass::IntegerLiteral,
            Self::FloatingLiteral { .. } => NodeClass::FloatingLiteral,
            Self::FixedPointLiteral { .. } => NodeClass::FixedPointLiteral,
            Self::CharacterLiteral { .. } => NodeClass::CharacterLiteral,
            Self::StringLiteral { .. } => NodeClass::StringLiteral,
            Self::BoolLiteral { .. } => NodeClass::CXXBoolLiteralExpr,
            Self::Unary { .. } => NodeClass::UnaryOperator,
            Self::Binary { .. } => NodeClass::BinaryOperator,
            Self::CompoundAssign { .. } => NodeClass::CompoundAssignOperator,
            Self::DeclRef { .. } => NodeClass::DeclRefExpr,
            Self::Member { .. } => NodeClass::MemberExpr,
        }
    }

    pub fn var(name: &str, ty: QualType) -> Self {
        Self::Var { name: name.into(), ty, storage: StorageClass::None, is_definition: true }
    }

    pub fn int(ty: QualType, value: u64) -> Self {
        Self::IntegerLiteral { ty, value }
    }

    pub fn binary(ty: QualType, opcode: BinaryOperatorKind) -> Self {
        Self::Binary { ty, opcode }
    }

    pub fn implicit_cast(ty: QualType, kind: CastKind) -> Self {
        Self::Cast { class: NodeClass::ImplicitCastExpr, ty, kind }
    }

    pub fn decl_ref(ty: QualType, name: &str, decl: Option<NodeRef>) -> Self {
        Self::DeclRef { ty, name: name.into(), decl }
    }

    fn check(&self) {
        let class = self.class();
        match self {
            Self::Stmt(_) => assert!(class.is_stmt(), "{class} is not a statement class"),
            Self::Expr(..) => assert!(
                matches!(
                    class,
                    NodeClass::CXXNullPtrLiteralExpr
                        | NodeClass::ParenExpr
                        | NodeClass::ConditionalOperator
                        | NodeClass::CallExpr
                        | NodeClass::ArraySubscriptExpr
                        | NodeClass::InitListExpr
                        | NodeClass::ConstantExpr
                        | NodeClass::CoawaitExpr
                ),
                "{class} carries a payload"
            ),
            Self::Cast { .. } => assert!(
                matches!(class, NodeClass::ImplicitCastExpr | NodeClass::CStyleCastExpr),
                "{class} is not a cast class"
            ),
            _ => {}
        }
    }
}

struct PendingNode {
    data: NodeData,
    children: Vec<Option<u32>>,
    parent: Option<u32>,
    start: TextSize,
    range: Option<TextRange>,
}

/// Builds a `UnitStorage` from front-end events.
pub struct Builder {
    path: Utf8PathBuf,
    text: Box<str>,
    tokens: Vec<Token>,
    next_token: usize,
    nodes: Vec<PendingNode>,
    opened: Vec<u32>,
    finished: bool,
}

impl Drop for Builder {
    fn drop(&mut self) {
        if !std::thread::panicking() && !self.finished {
            panic!("you should call `Builder::finish()`");
        }
    }
}

/// An opened node that must be completed.
pub struct Marker {
    index: u32,
    bomb: DropBomb,
}

impl Marker {
    pub fn complete(mut self, builder: &mut Builder) -> NodeRef {
        self.bomb.defuse();
        let last = builder.opened.pop();
        assert_eq!(last, Some(self.index), "nodes must be completed innermost first");
        NodeRef(self.index)
    }
}

impl Builder {
    /// Lexes `text`; the resulting token buffer is what nodes consume.
    pub fn new(path: impl Into<Utf8PathBuf>, text: &str) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
            tokens: tokenize(text),
            next_token: 0,
            nodes: Vec::new(),
            opened: Vec::new(),
            finished: false,
        }
    }

    /// Opens a node as the next child of the innermost open node.
    ///
    /// The first node started is the root and must be the translation unit.
    pub fn start(&mut self, data: NodeData) -> Marker {
        data.check();
        let index = u32::try_from(self.nodes.len()).expect("too many nodes");
        let parent = self.opened.last().copied();
        match parent {
            Some(parent) => self.nodes[parent as usize].children.push(Some(index)),
            None => assert!(
                self.nodes.is_empty() && matches!(data, NodeData::TranslationUnit),
                "the translation unit must be the only root"
            ),
        }
        let start = self.peek().map_or_else(|| self.text_len(), |token| token.range.start());
        self.nodes.push(PendingNode { data, children: Vec::new(), parent, start, range: None });
        self.opened.push(index);
        Marker { index, bomb: DropBomb::new("node was started but never completed") }
    }

    /// Records an absent optional child of the innermost open node.
    pub fn empty_slot(&mut self) {
        let parent = *self.opened.last().expect("no opened node");
        self.nodes[parent as usize].children.push(None);
    }

    /// Text of the next token to consume, skipping comments.
    pub fn current(&self) -> Option<&str> {
        self.peek().map(|token| &self.text[token.range])
    }

    /// Consumes the next non-comment token into every open node.
    pub fn token(&mut self) {
        self.skip_comments();
        let token = *self.tokens.get(self.next_token).expect("no tokens left");
        self.next_token += 1;
        for &node in &self.opened {
            let node = &mut self.nodes[node as usize];
            node.range = Some(match node.range {
                None => token.range,
                Some(range) => range.cover(token.range),
            });
        }
    }

    #[track_caller]
    pub fn expect(&mut self, text: &str) {
        assert_eq!(self.current(), Some(text));
        self.token();
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens[self.next_token..].iter().find(|token| !token.kind.is_comment())
    }

    fn skip_comments(&mut self) {
        while self.tokens.get(self.next_token).is_some_and(|token| token.kind.is_comment()) {
            self.next_token += 1;
        }
    }

    fn text_len(&self) -> TextSize {
        TextSize::of(&*self.text)
    }

    /// Allocates every node and fixes up parent, child and declaration
    /// pointers.
    pub fn finish(mut self) -> UnitStorage {
        assert!(self.opened.is_empty());
        assert!(!self.nodes.is_empty());
        self.finished = true;

        let nodes = std::mem::take(&mut self.nodes);
        let text_len = self.text_len();
        let mut allocations = Vec::with_capacity(nodes.len());
        let mut decl_refs = Vec::new();
        for (index, node) in nodes.iter().enumerate() {
            let range = match node.data {
                NodeData::TranslationUnit => TextRange::up_to(text_len),
                _ => node.range.unwrap_or_else(|| TextRange::empty(node.start)),
            };
            if let NodeData::DeclRef { decl: Some(target), .. }
            | NodeData::Member { decl: Some(target), .. } = node.data
            {
                decl_refs.push((index, target));
            }
            allocations.push(allocate(&node.data, range));
        }

        let mut slots = Vec::with_capacity(nodes.iter().map(|node| node.children.len()).sum());
        let mut spans = Vec::with_capacity(nodes.len());
        for node in &nodes {
            spans.push((slots.len(), node.children.len()));
            slots.extend(node.children.iter().map(|child| child.map(|it| allocations[it as usize].ptr)));
        }
        let slots = MaybeDangling::new(slots.into_boxed_slice());

        for ((node, allocation), (start, len)) in nodes.iter().zip(&allocations).zip(spans) {
            let parent = node.parent.map(|parent| allocations[parent as usize].ptr);
            let children = NonNull::from(&slots[start..start + len]);
            patch_links(allocation.ptr, parent, children);
        }
        for (index, target) in decl_refs {
            patch_decl(allocations[index].ptr, allocations[target.0 as usize].ptr);
        }

        let root = allocations[0].ptr;
        UnitStorage::new(
            std::mem::take(&mut self.path),
            std::mem::take(&mut self.text),
            std::mem::take(&mut self.tokens).into_boxed_slice(),
            root,
            allocations.into_boxed_slice(),
            slots,
        )
    }
}

#[expect(unsafe_code)]
fn patch_links(node: NodePtr, parent: Option<NodePtr>, children: NonNull<[Option<NodePtr>]>) {
    // SAFETY: the allocation is uniquely owned by the builder until `finish`
    // hands it to the storage.
    let base = unsafe { &mut *node.0.as_ptr() };
    base.parent = parent;
    base.children = children;
}

#[expect(unsafe_code)]
fn patch_decl(node: NodePtr, target: NodePtr) {
    // SAFETY: as in `patch_links`; the class was fixed by `allocate`.
    match unsafe { node.get() }.class() {
        NodeClass::DeclRefExpr => unsafe { (*node.0.cast::<DeclRefExpr>().as_ptr()).decl = Some(target) },
        NodeClass::MemberExpr => unsafe { (*node.0.cast::<MemberExpr>().as_ptr()).decl = Some(target) },
        _ => {}
    }
}

#[expect(unsafe_code)]
fn alloc<T>(node: T) -> Allocation {
    unsafe fn free<T>(ptr: NodePtr) {
        drop(unsafe { Box::from_raw(ptr.0.cast::<T>().as_ptr()) });
    }
    let ptr = NodePtr(NonNull::from(Box::leak(Box::new(node))).cast());
    Allocation { ptr, free: free::<T> }
}

fn allocate(data: &NodeData, range: TextRange) -> Allocation {
    let class = data.class();
    let base = NodeBase::new(class, range);
    let named = |name: &str| NamedDecl { base: NodeBase::new(class, range), name: name.into() };
    let value = |name: &str, ty: &QualType| ValueDecl { named: named(name), ty: ty.clone() };
    let expr = |ty: &QualType| Expr { base: NodeBase::new(class, range), ty: ty.clone() };
    let function = |data: &FunctionData| FunctionDecl {
        value: value(&data.name, &data.ty),
        storage: data.storage,
        is_inline: data.is_inline,
        is_variadic: data.is_variadic,
        is_definition: data.is_definition,
    };
    match data {
        NodeData::TranslationUnit | NodeData::Stmt(_) => alloc(base),
        NodeData::Namespace { name } => alloc(named(name)),
        NodeData::Typedef { name, underlying } => {
            alloc(TypedefDecl { named: named(name), underlying: underlying.clone() })
        }
        NodeData::Record { name, tag, is_definition } => {
            alloc(RecordDecl { named: named(name), tag: *tag, is_definition: *is_definition })
        }
        NodeData::Enum { name, is_scoped, is_definition } => alloc(EnumDecl {
            named: named(name),
            is_scoped: *is_scoped,
            is_definition: *is_definition,
        }),
        NodeData::Field { name, ty, bit_width } => {
            alloc(FieldDecl { value: value(name, ty), bit_width: *bit_width })
        }
        NodeData::EnumConstant { name, ty, value: init_val } => {
            alloc(EnumConstantDecl { value: value(name, ty), init_val: *init_val })
        }
        NodeData::Function(data) => alloc(function(data)),
        NodeData::Method(data, flags) => alloc(CXXMethodDecl {
            function: function(data),
            is_virtual: flags.is_virtual,
            is_pure: flags.is_pure,
            is_const: flags.is_const,
            is_static: flags.is_static,
        }),
        NodeData::Var { name, ty, storage, is_definition } => alloc(VarDecl {
            value: value(name, ty),
            storage: *storage,
            is_definition: *is_definition,
        }),
        NodeData::Parm { name, ty } => alloc(ParmVarDecl {
            var: VarDecl { value: value(name, ty), storage: StorageClass::None, is_definition: true },
        }),
        NodeData::Expr(_, ty) => alloc(expr(ty)),
        NodeData::IntegerLiteral { ty, value } => {
            alloc(IntegerLiteral { expr: expr(ty), value: *value })
        }
        NodeData::FloatingLiteral { ty, value } => {
            alloc(FloatingLiteral { expr: expr(ty), value: *value })
        }
        NodeData::FixedPointLiteral { ty, value, scale } => {
            alloc(FixedPointLiteral { expr: expr(ty), value: *value, scale: *scale })
        }
        NodeData::CharacterLiteral { ty, value } => {
            alloc(CharacterLiteral { expr: expr(ty), value: *value })
        }
        NodeData::StringLiteral { ty, bytes } => {
            alloc(StringLiteral { expr: expr(ty), bytes: bytes.clone() })
        }
        NodeData::BoolLiteral { ty, value } => {
            alloc(CXXBoolLiteralExpr { expr: expr(ty), value: *value })
        }
        NodeData::Unary { ty, opcode } => alloc(UnaryOperator { expr: expr(ty), opcode: *opcode }),
        NodeData::Binary { ty, opcode } => {
            alloc(BinaryOperator { expr: expr(ty), opcode: *opcode })
        }
        NodeData::CompoundAssign { ty, opcode } => alloc(CompoundAssignOperator {
            binary: BinaryOperator { expr: expr(ty), opcode: *opcode },
        }),
        NodeData::DeclRef { ty, name, decl: _ } => {
            alloc(DeclRefExpr { expr: expr(ty), name: name.clone(), decl: None })
        }
        NodeData::Member { ty, member, is_arrow, decl: _ } => alloc(MemberExpr {
            expr: expr(ty),
            member: member.clone(),
            is_arrow: *is_arrow,
            decl: None,
        }),
        NodeData::Cast { ty, kind, .. } => alloc(CastExpr { expr: expr(ty), kind: *kind }),
    }
}
