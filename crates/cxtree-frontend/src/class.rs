use std::fmt;

/// Version of the front-end's node model.
///
/// Class tags, enumerator values and the set of node classes change between
/// front-end releases; consumers key their tables on this.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrontendVersion {
    pub major: u16,
    pub minor: u16,
}

impl FrontendVersion {
    pub const fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for FrontendVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// The node model produced by this build of the front-end.
pub const FRONTEND_VERSION: FrontendVersion = FrontendVersion::new(12, 0);

/// Dynamic class tag stored in every node header.
///
/// The discriminant order is internal and may change in any release.
/// Declarations, statements and expressions occupy contiguous ranges.
#[non_exhaustive]
#[repr(u16)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeClass {
    TranslationUnitDecl,
    NamespaceDecl,
    TypedefDecl,
    RecordDecl,
    EnumDecl,
    FieldDecl,
    EnumConstantDecl,
    FunctionDecl,
    CXXMethodDecl,
    VarDecl,
    ParmVarDecl,

    NullStmt,
    CompoundStmt,
    DeclStmt,
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

    IntegerLiteral,
    FloatingLiteral,
    FixedPointLiteral,
    CharacterLiteral,
    StringLiteral,
    CXXBoolLiteralExpr,
    CXXNullPtrLiteralExpr,
    ParenExpr,
    UnaryOperator,
    BinaryOperator,
    CompoundAssignOperator,
    ConditionalOperator,
    CallExpr,
    DeclRefExpr,
    MemberExpr,
    ArraySubscriptExpr,
    ImplicitCastExpr,
    CStyleCastExpr,
    InitListExpr,
    ConstantExpr,
    CoawaitExpr,
}

impl NodeClass {
    const FIRST_DECL: u16 = Self::TranslationUnitDecl as u16;
    const LAST_DECL: u16 = Self::ParmVarDecl as u16;
    const FIRST_STMT: u16 = Self::NullStmt as u16;
    const LAST_STMT: u16 = Self::ContinueStmt as u16;
    const FIRST_EXPR: u16 = Self::IntegerLiteral as u16;
    const LAST_EXPR: u16 = Self::CoawaitExpr as u16;

    pub const ALL: &[NodeClass] = &[
        Self::TranslationUnitDecl,
        Self::NamespaceDecl,
        Self::TypedefDecl,
        Self::RecordDecl,
        Self::EnumDecl,
        Self::FieldDecl,
        Self::EnumConstantDecl,
        Self::FunctionDecl,
        Self::CXXMethodDecl,
        Self::VarDecl,
        Self::ParmVarDecl,
        Self::NullStmt,
        Self::CompoundStmt,
        Self::DeclStmt,
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
        Self::IntegerLiteral,
        Self::FloatingLiteral,
        Self::FixedPointLiteral,
        Self::CharacterLiteral,
        Self::StringLiteral,
        Self::CXXBoolLiteralExpr,
        Self::CXXNullPtrLiteralExpr,
        Self::ParenExpr,
        Self::UnaryOperator,
        Self::BinaryOperator,
        Self::CompoundAssignOperator,
        Self::ConditionalOperator,
        Self::CallExpr,
        Self::DeclRefExpr,
        Self::MemberExpr,
        Self::ArraySubscriptExpr,
        Self::ImplicitCastExpr,
        Self::CStyleCastExpr,
        Self::InitListExpr,
        Self::ConstantExpr,
        Self::CoawaitExpr,
    ];

    pub fn is_decl(self) -> bool {
        (Self::FIRST_DECL..=Self::LAST_DECL).contains(&(self as u16))
    }

    pub fn is_stmt(self) -> bool {
        (Self::FIRST_STMT..=Self::LAST_STMT).contains(&(self as u16))
    }

    /// Expressions are statements in the front-end's model; this only answers
    /// whether the class is an expression.
    pub fn is_expr(self) -> bool {
        (Self::FIRST_EXPR..=Self::LAST_EXPR).contains(&(self as u16))
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::TranslationUnitDecl => "TranslationUnitDecl",
            Self::NamespaceDecl => "NamespaceDecl",
            Self::TypedefDecl => "TypedefDecl",
            Self::RecordDecl => "RecordDecl",
            Self::EnumDecl => "EnumDecl",
            Self::FieldDecl => "FieldDecl",
            Self::EnumConstantDecl => "EnumConstantDecl",
            Self::FunctionDecl => "FunctionDecl",
            Self::CXXMethodDecl => "CXXMethodDecl",
            Self::VarDecl => "VarDecl",
            Self::ParmVarDecl => "ParmVarDecl",
            Self::NullStmt => "NullStmt",
            Self::CompoundStmt => "CompoundStmt",
            Self::DeclStmt => "DeclStmt",
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
            Self::IntegerLiteral => "IntegerLiteral",
            Self::FloatingLiteral => "FloatingLiteral",
            Self::FixedPointLiteral => "FixedPointLiteral",
            Self::CharacterLiteral => "CharacterLiteral",
            Self::StringLiteral => "StringLiteral",
            Self::CXXBoolLiteralExpr => "CXXBoolLiteralExpr",
            Self::CXXNullPtrLiteralExpr => "CXXNullPtrLiteralExpr",
            Self::ParenExpr => "ParenExpr",
            Self::UnaryOperator => "UnaryOperator",
            Self::BinaryOperator => "BinaryOperator",
            Self::CompoundAssignOperator => "CompoundAssignOperator",
            Self::ConditionalOperator => "ConditionalOperator",
            Self::CallExpr => "CallExpr",
            Self::DeclRefExpr => "DeclRefExpr",
            Self::MemberExpr => "MemberExpr",
            Self::ArraySubscriptExpr => "ArraySubscriptExpr",
            Self::ImplicitCastExpr => "ImplicitCastExpr",
            Self::CStyleCastExpr => "CStyleCastExpr",
            Self::InitListExpr => "InitListExpr",
            Self::ConstantExpr => "ConstantExpr",
            Self::CoawaitExpr => "CoawaitExpr",
        }
    }
}

impl fmt::Display for NodeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::NodeClass;

    #[test]
    fn categories_partition_all_classes() {
        for &class in NodeClass::ALL {
            let categories = [class.is_decl(), class.is_stmt(), class.is_expr()];
            assert_eq!(categories.iter().filter(|&&it| it).count(), 1, "{class}");
        }
    }

    #[test]
    fn all_is_in_discriminant_order() {
        for (index, &class) in NodeClass::ALL.iter().enumerate() {
            assert_eq!(class as usize, index, "{class}");
        }
    }
}
