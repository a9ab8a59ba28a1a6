mod common;

use common::{children, coawait, decls, find, fixed, kinds, named, var_x};
use cxtree::{
    Accessor, BinaryOpcode, BindingError, CursorClass, Index, KindSet, LiteralValue, NodeKind,
    OpaqueCursor, Registry, RegistryConfig, StorageClass, TagKind, UnknownKindPolicy, Value,
};
use cxtree_frontend::{FrontendVersion, NodeClass};
use expect_test::expect;
use text_size::TextSize;

#[test]
fn unsupported_accessor_names_the_kinds_that_have_it() {
    let index = Index::new();
    let unit = index.load(var_x());
    let literal = unit.node_at(TextSize::new(8)).unwrap();
    assert_eq!(literal.kind().unwrap(), NodeKind::IntegerLiteral);
    assert!(!literal.supports(Accessor::BinaryOpcode).unwrap());

    let err = literal.binary_opcode().unwrap_err();
    assert_eq!(
        err,
        BindingError::UnsupportedOperation {
            accessor: Accessor::BinaryOpcode,
            kind: NodeKind::IntegerLiteral,
            expected: KindSet::new([NodeKind::BinaryOperator, NodeKind::CompoundAssignOperator]),
        }
    );
    expect![[r#"`binary_opcode` is not supported on IntegerLiteral; supported on {BinaryOperator, CompoundAssignOperator}"#]]
        .assert_eq(&err.to_string());

    assert!(matches!(literal.lhs(), Err(BindingError::UnsupportedOperation { .. })));
    assert!(matches!(literal.name(), Err(BindingError::UnsupportedOperation { .. })));
}

#[test]
fn every_accessor_either_answers_or_refuses() {
    let index = Index::new();
    for storage in [var_x(), common::sum(), decls(), fixed(), coawait()] {
        let unit = index.load(storage);
        for node in unit.root().unwrap().descendants().unwrap() {
            let node = node.unwrap();
            let kind = node.kind().unwrap();
            for &accessor in Accessor::ALL {
                match node.get(accessor) {
                    Ok(_) => assert!(node.supports(accessor).unwrap(), "{kind} {accessor}"),
                    Err(BindingError::UnsupportedOperation { expected, .. }) => {
                        assert!(!node.supports(accessor).unwrap(), "{kind} {accessor}");
                        assert!(!expected.contains(kind), "{kind} {accessor}");
                    }
                    Err(err) => panic!("{kind} {accessor}: {err}"),
                }
            }
        }
    }
}

#[test]
fn queries_are_repeatable() {
    let index = Index::new();
    let unit = index.load(var_x());
    let add = unit.node_at(TextSize::new(10)).unwrap();
    for accessor in [Accessor::BinaryOpcode, Accessor::Lhs, Accessor::QualifiedType] {
        assert_eq!(add.get(accessor).unwrap(), add.get(accessor).unwrap());
    }
    assert_eq!(add.get(Accessor::BinaryOpcode).unwrap(), Value::BinaryOpcode(BinaryOpcode::Add));
    assert_eq!(add.get(Accessor::OperatorSpelling).unwrap(), Value::Text("+".to_owned()));
    assert_eq!(add.get(Accessor::Lhs).unwrap(), Value::Node(add.lhs().unwrap()));
    assert_eq!(add.kind().unwrap(), add.kind().unwrap());
}

#[test]
fn declarations_expose_their_properties() {
    let index = Index::new();
    let unit = index.load(decls());
    let root = unit.root().unwrap();

    let ns = find(&root, NodeKind::Namespace);
    assert_eq!(ns.name().unwrap(), "geo");
    assert_eq!(
        kinds(&children(&ns)),
        [NodeKind::Typedef, NodeKind::Enum, NodeKind::Record, NodeKind::Record]
    );

    let size = named(&root, "size");
    assert_eq!(size.underlying_type().unwrap().spelling, "unsigned int");

    let color = named(&root, "Color");
    assert!(color.is_scoped().unwrap());
    assert!(color.is_definition().unwrap());
    assert_eq!(named(&root, "Green").enum_value().unwrap(), 4);
    assert_eq!(named(&root, "Red").qualified_type().unwrap().spelling, "geo::Color");

    let point = named(&root, "Point");
    assert_eq!(point.tag_kind().unwrap(), TagKind::Struct);
    assert_eq!(named(&point, "x").bit_width().unwrap(), None);
    assert_eq!(named(&point, "x").get(Accessor::BitWidth).unwrap(), Value::Absent);
    assert_eq!(named(&point, "y").bit_width().unwrap(), Some(4));

    let shape = named(&root, "Shape");
    assert_eq!(shape.tag_kind().unwrap(), TagKind::Class);
    let area = named(&shape, "area");
    assert_eq!(area.kind().unwrap(), NodeKind::Method);
    assert!(area.is_virtual().unwrap());
    assert!(area.is_pure_virtual().unwrap());
    assert!(area.is_const().unwrap());
    assert!(!area.is_static().unwrap());
    assert!(!area.is_definition().unwrap());
    assert_eq!(area.body().unwrap(), None);
    assert_eq!(area.qualified_type().unwrap().spelling, "double () const");
    let count = named(&shape, "count");
    assert!(count.is_static().unwrap());
    assert!(!count.is_virtual().unwrap());

    let nine = named(&root, "nine");
    assert_eq!(nine.storage_class().unwrap(), StorageClass::None);
    assert!(nine.is_definition().unwrap());
}

#[test]
fn unknown_classes_degrade_by_default() {
    let index = Index::new();
    let unit = index.load(coawait());
    let var = named(&unit.root().unwrap(), "v");
    let awaited = var.initializer().unwrap().unwrap();
    assert_eq!(awaited.kind().unwrap(), NodeKind::UnexposedExpr);
    assert_eq!(awaited.class().unwrap(), NodeClass::CoawaitExpr);
    assert!(awaited.accessors().unwrap().is_empty());
    assert!(matches!(awaited.qualified_type(), Err(BindingError::UnsupportedOperation { .. })));

    let operand = children(&awaited);
    assert_eq!(kinds(&operand), [NodeKind::DeclRefExpr]);
    assert_eq!(operand[0].referenced().unwrap(), None);
    assert_eq!(operand[0].parent().unwrap(), Some(awaited));
}

#[test]
fn unknown_classes_can_be_rejected() {
    let config = RegistryConfig::default().with_unknown_kinds(UnknownKindPolicy::Reject);
    let index = Index::with_registry(Registry::new(config));
    let unit = index.load(coawait());
    let var = named(&unit.root().unwrap(), "v");

    let unknown = BindingError::UnknownKind { class: NodeClass::CoawaitExpr };
    assert_eq!(var.initializer(), Err(unknown.clone()));
    let mut kids = var.children().unwrap();
    assert_eq!(kids.next(), Some(Err(unknown.clone())));
    assert_eq!(kids.next(), None);

    // `co_await` itself has no wrapper.
    assert_eq!(unit.node_at(TextSize::new(9)), Err(unknown));
    let t = unit.node_at(TextSize::new(17)).unwrap();
    assert_eq!(t.kind().unwrap(), NodeKind::DeclRefExpr);
    assert!(t.parent().is_err());
}

#[test]
fn registry_follows_the_configured_front_end() {
    let current = Index::new();
    let unit = current.load(fixed());
    let literal = find(&unit.root().unwrap(), NodeKind::FixedPointLiteral);
    assert_eq!(literal.literal().unwrap(), LiteralValue::FixedPoint { value: 1 << 14, scale: 15 });
    assert_eq!(literal.literal_spelling().unwrap(), "0.5");

    let config = RegistryConfig::default().with_frontend(FrontendVersion::new(10, 0));
    let older = Index::with_registry(Registry::new(config));
    let unit = older.load(fixed());
    let var = named(&unit.root().unwrap(), "half");
    let literal = var.initializer().unwrap().unwrap();
    assert_eq!(literal.kind().unwrap(), NodeKind::UnexposedExpr);
    assert!(matches!(literal.literal(), Err(BindingError::UnsupportedOperation { .. })));
}

#[test]
fn excluded_classes_are_unexposed() {
    let registry =
        Registry::builder(RegistryConfig::default()).exclude(NodeClass::BinaryOperator).build();
    let index = Index::with_registry(registry);
    let unit = index.load(var_x());
    let add = unit.node_at(TextSize::new(10)).unwrap();
    assert_eq!(add.kind().unwrap(), NodeKind::UnexposedExpr);
    assert_eq!(
        index.registry().kinds_supporting(Accessor::BinaryOpcode),
        KindSet::new([NodeKind::CompoundAssignOperator])
    );
    assert_eq!(kinds(&children(&add)), [NodeKind::IntegerLiteral, NodeKind::IntegerLiteral]);
}

#[test]
fn wrapped_kind_matches_the_registry() {
    let index = Index::new();
    let unit = index.load(common::sum());
    for node in unit.root().unwrap().descendants().unwrap() {
        let node = node.unwrap();
        let resolved = index.resolve(&node.cursor().unwrap()).unwrap();
        assert_eq!(index.registry().kind_of(resolved.class()), node.kind());
        assert_eq!(index.wrap(resolved).unwrap(), node);
    }
}

#[test]
fn cursors_to_constant_wrappers_resolve_to_their_operand() {
    let storage = decls();
    let four = TextSize::of(&common::DECLS[..common::DECLS.find("= 4").unwrap() + 2]);
    let constant = unsafe { storage.node_at(four).get() }.parent().unwrap();
    assert_eq!(unsafe { constant.get() }.class(), NodeClass::ConstantExpr);

    let index = Index::new();
    let unit = index.load(storage);
    let cursor =
        OpaqueCursor::from_raw_parts(CursorClass::Expr, constant.as_ptr().cast(), unit.key());
    let resolved = index.resolve(&cursor).unwrap();
    assert_eq!(resolved.class(), NodeClass::IntegerLiteral);

    let node = index.wrap(resolved).unwrap();
    assert_eq!(index.registry().kind_of(resolved.class()), node.kind());
    assert_eq!(index.resolve(&node.cursor().unwrap()), Ok(resolved));
    assert_eq!(index.node(&cursor), Ok(node.clone()));
    let green = named(&unit.root().unwrap(), "Green");
    assert_eq!(green.initializer().unwrap(), Some(node));
}
