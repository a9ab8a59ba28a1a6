//! The host-facing node wrapper.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use cxtree_frontend::{NodeClass, NodePtr};
use text_size::TextRange;

use crate::cursor::{CursorClass, OpaqueCursor};
use crate::liveness::{Liveness, LoadedUnit};
use crate::location::{SourceLocation, SourceRange};
use crate::payload::{Concrete, Payload};
use crate::values::{
    BinaryOpcode, CastKind, LiteralValue, QualifiedType, StorageClass, TagKind, UnaryOpcode, Value,
};
use crate::{Accessor, AccessorSet, BindingError, NodeKind, Registry, Result, UnitKey};

/// A node of a loaded translation unit.
///
/// Wrappers are cheap to clone and compare by identity. They stay valid as
/// values after their unit is disposed, but every query then fails with
/// [`BindingError::UseAfterDispose`].
#[derive(Clone)]
pub struct Node {
    liveness: Liveness,
    registry: Rc<Registry>,
    ptr: NodePtr,
    kind: NodeKind,
    accessors: AccessorSet,
    concrete: Concrete,
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.ptr == other.ptr && self.liveness.key() == other.liveness.key()
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ptr.hash(state);
        self.liveness.key().hash(state);
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("kind", &self.kind)
            .field("unit", &self.liveness.key())
            .field("addr", &format_args!("{:#x}", self.ptr.addr()))
            .finish()
    }
}

/// Where a kind keeps the child an accessor returns.
#[derive(Clone, Copy)]
enum Slots {
    At(usize),
    From(usize),
    OfClass(NodeClass),
    LastOfClass(NodeClass),
}

fn layout(kind: NodeKind, accessor: Accessor) -> Option<Slots> {
    use Accessor as A;
    use NodeKind as K;
    use Slots::{At, From, LastOfClass, OfClass};

    Some(match (kind, accessor) {
        (
            K::BinaryOperator | K::CompoundAssignOperator | K::ArraySubscriptExpr,
            A::Lhs,
        ) => At(0),
        (
            K::BinaryOperator | K::CompoundAssignOperator | K::ArraySubscriptExpr,
            A::Rhs,
        ) => At(1),
        (
            K::ParenExpr
            | K::UnaryOperator
            | K::MemberRefExpr
            | K::ImplicitCastExpr
            | K::CStyleCastExpr,
            A::SubExpr,
        ) => At(0),
        (K::CallExpr, A::Callee) => At(0),
        (K::CallExpr, A::Arguments) => From(1),
        (K::InitListExpr, A::Arguments) => From(0),
        (K::Function | K::Method, A::Parameters) => OfClass(NodeClass::ParmVarDecl),
        (K::Function | K::Method, A::Body) => LastOfClass(NodeClass::CompoundStmt),
        (K::Variable | K::Parameter | K::Field | K::EnumConstant, A::Initializer) => At(0),
        (K::IfStmt | K::ConditionalOperator | K::WhileStmt | K::SwitchStmt, A::Condition) => {
            At(0)
        }
        (K::ForStmt | K::DoStmt, A::Condition) => At(1),
        (K::IfStmt | K::ConditionalOperator, A::ThenBranch) => At(1),
        (K::IfStmt | K::ConditionalOperator, A::ElseBranch) => At(2),
        (K::ForStmt, A::ForInit) => At(0),
        (K::ForStmt, A::ForIncrement) => At(2),
        (K::ForStmt, A::Body) => At(3),
        (K::WhileStmt | K::SwitchStmt | K::CaseStmt, A::Body) => At(1),
        (K::DoStmt | K::DefaultStmt, A::Body) => At(0),
        (K::ReturnStmt, A::ReturnValue) => At(0),
        _ => return None,
    })
}

impl Node {
    pub(crate) fn new(
        liveness: Liveness,
        registry: Rc<Registry>,
        ptr: NodePtr,
        kind: NodeKind,
        accessors: AccessorSet,
        concrete: Concrete,
    ) -> Self {
        Self { liveness, registry, ptr, kind, accessors, concrete }
    }

    pub(crate) fn ptr(&self) -> NodePtr {
        self.ptr
    }

    pub(crate) fn liveness(&self) -> &Liveness {
        &self.liveness
    }

    pub(crate) fn registry(&self) -> &Rc<Registry> {
        &self.registry
    }

    /// Runs `f` on the live unit with the node's header.
    #[expect(unsafe_code)]
    pub(crate) fn with_base<R>(
        &self,
        f: impl FnOnce(&LoadedUnit, &cxtree_frontend::NodeBase) -> R,
    ) -> Result<R> {
        // SAFETY: `with_unit` only calls back while the unit is alive, and the
        // pointer was validated against it when the wrapper was built.
        self.liveness.with_unit(|unit| f(unit, unsafe { self.ptr.get() }))
    }

    /// Wraps `ptr`, a node of the same unit, while the unit is borrowed.
    #[expect(unsafe_code)]
    pub(crate) fn wrap_sibling(&self, ptr: NodePtr) -> Result<Node> {
        // SAFETY: only called from inside `with_base`, with pointers read from
        // this unit.
        unsafe { self.registry.wrap_ptr(&self.liveness, ptr) }
    }

    pub fn kind(&self) -> Result<NodeKind> {
        self.liveness.check()?;
        Ok(self.kind)
    }

    pub fn unit(&self) -> UnitKey {
        self.liveness.key()
    }

    pub fn is_disposed(&self) -> bool {
        self.liveness.check().is_err()
    }

    /// The front-end's own class for this node.
    pub fn class(&self) -> Result<NodeClass> {
        self.with_base(|_, base| base.class())
    }

    pub fn cursor(&self) -> Result<OpaqueCursor> {
        let class = self.class()?;
        Ok(OpaqueCursor::new(CursorClass::of(class), self.ptr, self.liveness.key()))
    }

    pub fn supports(&self, accessor: Accessor) -> Result<bool> {
        self.liveness.check()?;
        Ok(self.accessors.contains(accessor))
    }

    pub fn accessors(&self) -> Result<AccessorSet> {
        self.liveness.check()?;
        Ok(self.accessors)
    }

    pub fn range(&self) -> Result<TextRange> {
        self.with_base(|_, base| base.range())
    }

    pub fn extent(&self) -> Result<SourceRange> {
        self.with_base(|unit, base| SourceRange::new(&unit.lines, base.range()))
    }

    pub fn location(&self) -> Result<SourceLocation> {
        self.with_base(|unit, base| SourceLocation::new(&unit.lines, base.range().start()))
    }

    /// Source text covered by the node.
    pub fn text(&self) -> Result<String> {
        self.with_base(|unit, base| unit.storage.text()[base.range()].to_owned())
    }

    /// Dynamic form of the typed accessors.
    pub fn get(&self, accessor: Accessor) -> Result<Value> {
        use Accessor as A;

        Ok(match accessor {
            A::BinaryOpcode => Value::BinaryOpcode(self.binary_opcode()?),
            A::UnaryOpcode => Value::UnaryOpcode(self.unary_opcode()?),
            A::OperatorSpelling => Value::Text(self.operator_spelling()?.to_owned()),
            A::LiteralValue => Value::Literal(self.literal()?),
            A::LiteralSpelling => Value::Text(self.literal_spelling()?),
            A::DeclaredName => Value::Text(self.name()?),
            A::QualifiedType => Value::Type(self.qualified_type()?),
            A::UnderlyingType => Value::Type(self.underlying_type()?),
            A::StorageClass => Value::StorageClass(self.storage_class()?),
            A::IsVirtual => Value::Bool(self.is_virtual()?),
            A::IsPureVirtual => Value::Bool(self.is_pure_virtual()?),
            A::IsStatic => Value::Bool(self.is_static()?),
            A::IsConst => Value::Bool(self.is_const()?),
            A::IsInline => Value::Bool(self.is_inline()?),
            A::IsDefinition => Value::Bool(self.is_definition()?),
            A::IsVariadic => Value::Bool(self.is_variadic()?),
            A::IsScoped => Value::Bool(self.is_scoped()?),
            A::IsArrow => Value::Bool(self.is_arrow()?),
            A::IsPostfix => Value::Bool(self.is_postfix()?),
            A::BitWidth => self.bit_width()?.map_or(Value::Absent, |it| Value::Int(it.into())),
            A::EnumValue => Value::Int(self.enum_value()?),
            A::TagKind => Value::TagKind(self.tag_kind()?),
            A::CastKind => Value::CastKind(self.cast_kind()?),
            A::Referenced => Value::Node(self.referenced()?),
            A::Arguments => Value::Nodes(self.arguments()?),
            A::Parameters => Value::Nodes(self.parameters()?),
            A::Lhs
            | A::Rhs
            | A::SubExpr
            | A::Callee
            | A::Initializer
            | A::Condition
            | A::ThenBranch
            | A::ElseBranch
            | A::ForInit
            | A::ForIncrement
            | A::Body
            | A::ReturnValue => Value::Node(self.child(accessor)?),
        })
    }

    fn unsupported(&self, accessor: Accessor) -> BindingError {
        BindingError::UnsupportedOperation {
            accessor,
            kind: self.kind,
            expected: self.registry.kinds_supporting(accessor),
        }
    }

    fn require(&self, accessor: Accessor) -> Result<()> {
        self.liveness.check()?;
        if self.accessors.contains(accessor) { Ok(()) } else { Err(self.unsupported(accessor)) }
    }

    /// Reads a payload field after checking liveness and the accessor set.
    #[expect(unsafe_code)]
    fn read<R>(&self, accessor: Accessor, f: impl FnOnce(Payload<'_>) -> Option<R>) -> Result<R> {
        self.require(accessor)?;
        // SAFETY: the payload is only borrowed for the duration of `with_unit`.
        self.liveness
            .with_unit(|_| f(unsafe { self.concrete.payload() }))?
            .ok_or_else(|| self.unsupported(accessor))
    }

    /// Wraps the children `accessor` designates for this kind.
    #[expect(unsafe_code)]
    fn select(&self, accessor: Accessor) -> Result<Vec<Node>> {
        self.require(accessor)?;
        let slots = layout(self.kind, accessor).ok_or_else(|| self.unsupported(accessor))?;
        self.with_base(|_, base| {
            // SAFETY: child pointers belong to the live unit.
            let class_of = |ptr: NodePtr| unsafe { self.registry.visible(ptr).get() }.class();
            let children = base.child_slots();
            let picked: Vec<NodePtr> = match slots {
                Slots::At(index) => children.get(index).copied().flatten().into_iter().collect(),
                Slots::From(index) => children.iter().skip(index).flatten().copied().collect(),
                Slots::OfClass(class) => {
                    base.children().filter(|&child| class_of(child) == class).collect()
                }
                Slots::LastOfClass(class) => base
                    .children()
                    .last()
                    .filter(|&child| class_of(child) == class)
                    .into_iter()
                    .collect(),
            };
            picked.into_iter().map(|ptr| self.wrap_sibling(ptr)).collect()
        })?
    }

    fn child(&self, accessor: Accessor) -> Result<Option<Node>> {
        Ok(self.select(accessor)?.into_iter().next())
    }

    pub fn binary_opcode(&self) -> Result<BinaryOpcode> {
        self.read(Accessor::BinaryOpcode, |p| p.binary().map(|it| it.opcode().into()))
    }

    pub fn unary_opcode(&self) -> Result<UnaryOpcode> {
        self.read(Accessor::UnaryOpcode, |p| match p {
            Payload::Unary(it) => Some(it.opcode().into()),
            _ => None,
        })
    }

    /// The operator as the front-end spells it, e.g. `"+="`.
    pub fn operator_spelling(&self) -> Result<&'static str> {
        self.read(Accessor::OperatorSpelling, |p| match p {
            Payload::Unary(it) => Some(it.opcode().spelling()),
            _ => p.binary().map(|it| it.opcode().spelling()),
        })
    }

    pub fn literal(&self) -> Result<LiteralValue> {
        self.read(Accessor::LiteralValue, |p| {
            Some(match p {
                Payload::Integer(it) => LiteralValue::Integer(it.value()),
                Payload::Floating(it) => LiteralValue::Floating(it.value()),
                Payload::FixedPoint(it) => {
                    LiteralValue::FixedPoint { value: it.value(), scale: it.scale() }
                }
                Payload::Character(it) => LiteralValue::Character(it.value()),
                Payload::String(it) => LiteralValue::String(it.bytes().to_vec()),
                Payload::Bool(it) => LiteralValue::Bool(it.value()),
                Payload::Expr(_) => LiteralValue::NullPtr,
                _ => return None,
            })
        })
    }

    /// The literal's value rendered as text: decimal integers, the shortest
    /// round-tripping float, the character or string contents, `true`/`false`.
    pub fn literal_spelling(&self) -> Result<String> {
        if !self.supports(Accessor::LiteralSpelling)? {
            return Err(self.unsupported(Accessor::LiteralSpelling));
        }
        self.literal().map(|literal| literal.to_string())
    }

    /// Declared name, or the referenced name for references and member
    /// accesses.
    pub fn name(&self) -> Result<String> {
        self.read(Accessor::DeclaredName, |p| match p {
            Payload::DeclRef(it) => Some(it.name().to_owned()),
            Payload::Member(it) => Some(it.member_name().to_owned()),
            _ => p.named().map(|it| it.name().to_owned()),
        })
    }

    pub fn qualified_type(&self) -> Result<QualifiedType> {
        self.read(Accessor::QualifiedType, |p| match p.value_decl() {
            Some(decl) => Some(decl.ty().into()),
            None => p.expr().map(|it| it.ty().into()),
        })
    }

    pub fn underlying_type(&self) -> Result<QualifiedType> {
        self.read(Accessor::UnderlyingType, |p| match p {
            Payload::Typedef(it) => Some(it.underlying_type().into()),
            _ => None,
        })
    }

    pub fn storage_class(&self) -> Result<StorageClass> {
        self.read(Accessor::StorageClass, |p| match p.var() {
            Some(var) => Some(var.storage_class().into()),
            None => p.function().map(|it| it.storage_class().into()),
        })
    }

    pub fn is_virtual(&self) -> Result<bool> {
        self.read(Accessor::IsVirtual, |p| match p {
            Payload::Method(it) => Some(it.is_virtual()),
            _ => None,
        })
    }

    pub fn is_pure_virtual(&self) -> Result<bool> {
        self.read(Accessor::IsPureVirtual, |p| match p {
            Payload::Method(it) => Some(it.is_pure()),
            _ => None,
        })
    }

    pub fn is_static(&self) -> Result<bool> {
        self.read(Accessor::IsStatic, |p| match p {
            Payload::Method(it) => Some(it.is_static()),
            _ => None,
        })
    }

    pub fn is_const(&self) -> Result<bool> {
        self.read(Accessor::IsConst, |p| match p {
            Payload::Method(it) => Some(it.is_const()),
            _ => None,
        })
    }

    pub fn is_inline(&self) -> Result<bool> {
        self.read(Accessor::IsInline, |p| p.function().map(|it| it.is_inline_specified()))
    }

    pub fn is_variadic(&self) -> Result<bool> {
        self.read(Accessor::IsVariadic, |p| p.function().map(|it| it.is_variadic()))
    }

    pub fn is_definition(&self) -> Result<bool> {
        self.read(Accessor::IsDefinition, |p| match p {
            Payload::Record(it) => Some(it.is_this_declaration_a_definition()),
            Payload::Enum(it) => Some(it.is_this_declaration_a_definition()),
            _ => match p.var() {
                Some(var) => Some(var.is_this_declaration_a_definition()),
                None => p.function().map(|it| it.is_this_declaration_a_definition()),
            },
        })
    }

    pub fn is_scoped(&self) -> Result<bool> {
        self.read(Accessor::IsScoped, |p| match p {
            Payload::Enum(it) => Some(it.is_scoped()),
            _ => None,
        })
    }

    pub fn is_arrow(&self) -> Result<bool> {
        self.read(Accessor::IsArrow, |p| match p {
            Payload::Member(it) => Some(it.is_arrow()),
            _ => None,
        })
    }

    pub fn is_postfix(&self) -> Result<bool> {
        self.read(Accessor::IsPostfix, |p| match p {
            Payload::Unary(it) => Some(it.opcode().is_postfix()),
            _ => None,
        })
    }

    /// `None` for a field that is not a bit-field.
    pub fn bit_width(&self) -> Result<Option<u32>> {
        self.read(Accessor::BitWidth, |p| match p {
            Payload::Field(it) => Some(it.bit_width()),
            _ => None,
        })
    }

    pub fn enum_value(&self) -> Result<i64> {
        self.read(Accessor::EnumValue, |p| match p {
            Payload::EnumConstant(it) => Some(it.init_val()),
            _ => None,
        })
    }

    pub fn tag_kind(&self) -> Result<TagKind> {
        self.read(Accessor::TagKind, |p| match p {
            Payload::Record(it) => Some(it.tag_kind().into()),
            _ => None,
        })
    }

    pub fn cast_kind(&self) -> Result<CastKind> {
        self.read(Accessor::CastKind, |p| match p {
            Payload::Cast(it) => Some(it.cast_kind().into()),
            _ => None,
        })
    }

    /// The declaration a reference or member access names, when it is part of
    /// the same unit.
    pub fn referenced(&self) -> Result<Option<Node>> {
        let target = self.read(Accessor::Referenced, |p| match p {
            Payload::DeclRef(it) => Some(it.decl()),
            Payload::Member(it) => Some(it.member_decl()),
            _ => None,
        })?;
        match target {
            Some(ptr) => self.with_base(|_, _| self.wrap_sibling(ptr))?.map(Some),
            None => Ok(None),
        }
    }

    pub fn lhs(&self) -> Result<Option<Node>> {
        self.child(Accessor::Lhs)
    }

    pub fn rhs(&self) -> Result<Option<Node>> {
        self.child(Accessor::Rhs)
    }

    pub fn sub_expr(&self) -> Result<Option<Node>> {
        self.child(Accessor::SubExpr)
    }

    pub fn callee(&self) -> Result<Option<Node>> {
        self.child(Accessor::Callee)
    }

    pub fn arguments(&self) -> Result<Vec<Node>> {
        self.select(Accessor::Arguments)
    }

    pub fn parameters(&self) -> Result<Vec<Node>> {
        self.select(Accessor::Parameters)
    }

    pub fn initializer(&self) -> Result<Option<Node>> {
        self.child(Accessor::Initializer)
    }

    pub fn condition(&self) -> Result<Option<Node>> {
        self.child(Accessor::Condition)
    }

    pub fn then_branch(&self) -> Result<Option<Node>> {
        self.child(Accessor::ThenBranch)
    }

    pub fn else_branch(&self) -> Result<Option<Node>> {
        self.child(Accessor::ElseBranch)
    }

    /// `Ok(None)` when the `for` statement has no init part.
    pub fn for_init(&self) -> Result<Option<Node>> {
        self.child(Accessor::ForInit)
    }

    pub fn for_increment(&self) -> Result<Option<Node>> {
        self.child(Accessor::ForIncrement)
    }

    pub fn body(&self) -> Result<Option<Node>> {
        self.child(Accessor::Body)
    }

    pub fn return_value(&self) -> Result<Option<Node>> {
        self.child(Accessor::ReturnValue)
    }
}
