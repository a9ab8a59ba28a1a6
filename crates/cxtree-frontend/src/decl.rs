//! Declaration payloads.

use crate::node::{NodeBase, subclass};
use crate::{QualType, StorageClass, TagTypeKind};

#[repr(C)]
pub struct NamedDecl {
    pub(crate) base: NodeBase,
    pub(crate) name: Box<str>,
}

subclass!(NamedDecl: NodeBase => base,
    NamespaceDecl | TypedefDecl | RecordDecl | EnumDecl | FieldDecl | EnumConstantDecl
        | FunctionDecl | CXXMethodDecl | VarDecl | ParmVarDecl);

impl NamedDecl {
    /// Empty for anonymous declarations.
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[repr(C)]
pub struct TypedefDecl {
    pub(crate) named: NamedDecl,
    pub(crate) underlying: QualType,
}

subclass!(TypedefDecl: NamedDecl => named, TypedefDecl);

impl TypedefDecl {
    pub fn underlying_type(&self) -> &QualType {
        &self.underlying
    }
}

#[repr(C)]
pub struct RecordDecl {
    pub(crate) named: NamedDecl,
    pub(crate) tag: TagTypeKind,
    pub(crate) is_definition: bool,
}

subclass!(RecordDecl: NamedDecl => named, RecordDecl);

impl RecordDecl {
    pub fn tag_kind(&self) -> TagTypeKind {
        self.tag
    }

    pub fn is_this_declaration_a_definition(&self) -> bool {
        self.is_definition
    }
}

#[repr(C)]
pub struct EnumDecl {
    pub(crate) named: NamedDecl,
    pub(crate) is_scoped: bool,
    pub(crate) is_definition: bool,
}

subclass!(EnumDecl: NamedDecl => named, EnumDecl);

impl EnumDecl {
    pub fn is_scoped(&self) -> bool {
        self.is_scoped
    }

    pub fn is_this_declaration_a_definition(&self) -> bool {
        self.is_definition
    }
}

#[repr(C)]
pub struct ValueDecl {
    pub(crate) named: NamedDecl,
    pub(crate) ty: QualType,
}

subclass!(ValueDecl: NamedDecl => named,
    FieldDecl | EnumConstantDecl | FunctionDecl | CXXMethodDecl | VarDecl | ParmVarDecl);

impl ValueDecl {
    pub fn ty(&self) -> &QualType {
        &self.ty
    }
}

#[repr(C)]
pub struct FieldDecl {
    pub(crate) value: ValueDecl,
    pub(crate) bit_width: Option<u32>,
}

subclass!(FieldDecl: ValueDecl => value, FieldDecl);

impl FieldDecl {
    pub fn bit_width(&self) -> Option<u32> {
        self.bit_width
    }
}

#[repr(C)]
pub struct EnumConstantDecl {
    pub(crate) value: ValueDecl,
    pub(crate) init_val: i64,
}

subclass!(EnumConstantDecl: ValueDecl => value, EnumConstantDecl);

impl EnumConstantDecl {
    pub fn init_val(&self) -> i64 {
        self.init_val
    }
}

#[repr(C)]
pub struct VarDecl {
    pub(crate) value: ValueDecl,
    pub(crate) storage: StorageClass,
    pub(crate) is_definition: bool,
}

subclass!(VarDecl: ValueDecl => value, VarDecl | ParmVarDecl);

impl VarDecl {
    pub fn storage_class(&self) -> StorageClass {
        self.storage
    }

    pub fn is_this_declaration_a_definition(&self) -> bool {
        self.is_definition
    }
}

#[repr(C)]
pub struct ParmVarDecl {
    pub(crate) var: VarDecl,
}

subclass!(ParmVarDecl: VarDecl => var, ParmVarDecl);

#[repr(C)]
pub struct FunctionDecl {
    pub(crate) value: ValueDecl,
    pub(crate) storage: StorageClass,
    pub(crate) is_inline: bool,
    pub(crate) is_variadic: bool,
    pub(crate) is_definition: bool,
}

subclass!(FunctionDecl: ValueDecl => value, FunctionDecl | CXXMethodDecl);

impl FunctionDecl {
    pub fn storage_class(&self) -> StorageClass {
        self.storage
    }

    pub fn is_inline_specified(&self) -> bool {
        self.is_inline
    }

    pub fn is_variadic(&self) -> bool {
        self.is_variadic
    }

    pub fn is_this_declaration_a_definition(&self) -> bool {
        self.is_definition
    }
}

#[repr(C)]
pub struct CXXMethodDecl {
    pub(crate) function: FunctionDecl,
    pub(crate) is_virtual: bool,
    pub(crate) is_pure: bool,
    pub(crate) is_const: bool,
    pub(crate) is_static: bool,
}

subclass!(CXXMethodDecl: FunctionDecl => function, CXXMethodDecl);

impl CXXMethodDecl {
    pub fn is_virtual(&self) -> bool {
        self.is_virtual
    }

    pub fn is_pure(&self) -> bool {
        self.is_pure
    }

    pub fn is_const(&self) -> bool {
        self.is_const
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }
}
