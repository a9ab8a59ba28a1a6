use std::fmt;

/// Stable, host-facing node kind.
///
/// Discriminants are dense and append-only: a value never changes meaning once
/// published, whatever the front-end's own class numbering does.
#[repr(u16)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeKind {
    TranslationUnit,
    Namespace,
    Typedef,
    Record,
    Field,
    Enum,
    EnumConstant,
    Function,
    Method,
    Parameter,
    Variable,

    IntegerLiteral,
    FloatingLiteral,
    CharacterLiteral,
    StringLiteral,
    BoolLiteral,
    NullPtrLiteral,
    FixedPointLiteral,
    ParenExpr,
    UnaryOperator,
    BinaryOperator,
    CompoundAssignOperator,
    ConditionalOperator,
    CallExpr,
    DeclRefExpr,
    MemberRefExpr,
    ArraySubscriptExpr,
    CStyleCastExpr,
    ImplicitCastExpr,
    InitListExpr,

    CompoundStmt,
    DeclStmt,
    NullStmt,
    ReturnStmt,
    IfStmt,
    ForStmt,
    WhileStmt,
    DoStmt,
    SwitchStmt,
    CaseStmt,
    DefaultStmt,
    BreakStmt,
    ContinueStmt,

    UnexposedDecl,
    UnexposedExpr,
    UnexposedStmt,
}

impl NodeKind {
    pub const ALL: &[NodeKind] = &[
        Self::TranslationUnit,
        Self::Namespace,
        Self::Typedef,
        Self::Record,
        Self::Field,
        Self::Enum,
        Self::EnumConstant,
        Self::Function,
        Self::Method,
        Self::Parameter,
        Self::Variable,
        Self::IntegerLiteral,
        Self::FloatingLiteral,
        Self::CharacterLiteral,
        Self::StringLiteral,
        Self::BoolLiteral,
        Self::NullPtrLiteral,
        Self::FixedPointLiteral,
        Self::ParenExpr,
        Self::UnaryOperator,
        Self::BinaryOperator,
        Self::CompoundAssignOperator,
        Self::ConditionalOperator,
        Self::CallExpr,
        Self::DeclRefExpr,
        Self::MemberRefExpr,
        Self::ArraySubscriptExpr,
        Self::CStyleCastExpr,
        Self::ImplicitCastExpr,
        Self::InitListExpr,
        Self::CompoundStmt,
        Self::DeclStmt,
        Self::NullStmt,
        Self::ReturnStmt,
        Self::IfStmt,
        Self::ForStmt,
        Self::WhileStmt,
        Self::DoStmt,
        Self::SwitchStmt,
        Self::CaseStmt,
        Self::DefaultStmt,
        Self::BreakStmt,
        Self::ContinueStmt,
        Self::UnexposedDecl,
        Self::UnexposedExpr,
        Self::UnexposedStmt,
    ];

    pub fn is_declaration(self) -> bool {
        self <= Self::Variable || self == Self::UnexposedDecl
    }

    pub fn is_expression(self) -> bool {
        (Self::IntegerLiteral..=Self::InitListExpr).contains(&self) || self == Self::UnexposedExpr
    }

    pub fn is_statement(self) -> bool {
        (Self::CompoundStmt..=Self::ContinueStmt).contains(&self) || self == Self::UnexposedStmt
    }

    pub fn is_unexposed(self) -> bool {
        matches!(self, Self::UnexposedDecl | Self::UnexposedExpr | Self::UnexposedStmt)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::TranslationUnit => "TranslationUnit",
            Self::Namespace => "Namespace",
            Self::Typedef => "Typedef",
            Self::Record => "Record",
            Self::Field => "Field",
            Self::Enum => "Enum",
            Self::EnumConstant => "EnumConstant",
            Self::Function => "Function",
            Self::Method => "Method",
            Self::Parameter => "Parameter",
            Self::Variable => "Variable",
            Self::IntegerLiteral => "IntegerLiteral",
            Self::FloatingLiteral => "FloatingLiteral",
            Self::CharacterLiteral => "CharacterLiteral",
            Self::StringLiteral => "StringLiteral",
            Self::BoolLiteral => "BoolLiteral",
            Self::NullPtrLiteral => "NullPtrLiteral",
            Self::FixedPointLiteral => "FixedPointLiteral",
            Self::ParenExpr => "ParenExpr",
            Self::UnaryOperator => "UnaryOperator",
            Self::BinaryOperator => "BinaryOperator",
            Self::CompoundAssignOperator => "CompoundAssignOperator",
            Self::ConditionalOperator => "ConditionalOperator",
            Self::CallExpr => "CallExpr",
            Self::DeclRefExpr => "DeclRefExpr",
            Self::MemberRefExpr => "MemberRefExpr",
            Self::ArraySubscriptExpr => "ArraySubscriptExpr",
            Self::CStyleCastExpr => "CStyleCastExpr",
            Self::ImplicitCastExpr => "ImplicitCastExpr",
            Self::InitListExpr => "InitListExpr",
            Self::CompoundStmt => "CompoundStmt",
            Self::DeclStmt => "DeclStmt",
            Self::NullStmt => "NullStmt",
            Self::ReturnStmt => "ReturnStmt",
            Self::IfStmt => "IfStmt",
            Self::ForStmt => "ForStmt",
            Self::WhileStmt => "WhileStmt",
            Self::DoStmt => "DoStmt",
            Self::SwitchStmt => "SwitchStmt",
            Self::CaseStmt => "CaseStmt",
            Self::DefaultStmt => "DefaultStmt",
            Self::BreakStmt => "BreakStmt",
            Self::ContinueStmt => "ContinueStmt",
            Self::UnexposedDecl => "UnexposedDecl",
            Self::UnexposedExpr => "UnexposedExpr",
            Self::UnexposedStmt => "UnexposedStmt",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
