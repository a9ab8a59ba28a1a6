use text_size::{TextRange, TextSize};

use crate::expr::{BinaryOperator, CastExpr, DeclRefExpr, Expr, IntegerLiteral};
use crate::{
    BinaryOperatorKind, Builder, CastKind, NodeClass, NodeData, NodePtr, QualType, UnitStorage,
};

fn int() -> QualType {
    QualType::new("int")
}

/// `int x = 1 + 2; int y = x;`
fn two_vars() -> UnitStorage {
    let mut b = Builder::new("two_vars.c", "int x = 1 + 2; int y = x;");
    let tu = b.start(NodeData::TranslationUnit);

    let x = b.start(NodeData::var("x", int()));
    b.expect("int");
    b.expect("x");
    b.expect("=");
    let add = b.start(NodeData::binary(int(), BinaryOperatorKind::Add));
    let one = b.start(NodeData::int(int(), 1));
    b.expect("1");
    one.complete(&mut b);
    b.expect("+");
    let two = b.start(NodeData::int(int(), 2));
    b.expect("2");
    two.complete(&mut b);
    add.complete(&mut b);
    b.expect(";");
    let x = x.complete(&mut b);

    let y = b.start(NodeData::var("y", int()));
    b.expect("int");
    b.expect("y");
    b.expect("=");
    let cast = b.start(NodeData::implicit_cast(int(), CastKind::LValueToRValue));
    let r = b.start(NodeData::decl_ref(int(), "x", Some(x)));
    b.expect("x");
    r.complete(&mut b);
    cast.complete(&mut b);
    b.expect(";");
    y.complete(&mut b);

    tu.complete(&mut b);
    b.finish()
}

fn children(ptr: NodePtr) -> Vec<NodePtr> {
    unsafe { ptr.get() }.children().collect()
}

#[test]
fn tree_shape_and_ranges() {
    let unit = two_vars();
    let root = unit.root();
    let root_base = unsafe { root.get() };
    assert_eq!(root_base.class(), NodeClass::TranslationUnitDecl);
    assert_eq!(root_base.range(), TextRange::up_to(TextSize::of(unit.text())));
    assert_eq!(unit.node_count(), 8);

    let vars = children(root);
    assert_eq!(vars.len(), 2);
    let x = unsafe { vars[0].get() };
    assert_eq!(&unit.text()[x.range()], "int x = 1 + 2;");
    assert_eq!(x.parent(), Some(root));

    let add = children(vars[0])[0];
    let add_base = unsafe { add.get() };
    assert_eq!(&unit.text()[add_base.range()], "1 + 2");
    let values: Vec<u64> = children(add)
        .into_iter()
        .map(|lit| unsafe { lit.downcast::<IntegerLiteral>() }.map(IntegerLiteral::value).unwrap())
        .collect();
    assert_eq!(values, [1, 2]);
}

#[test]
fn downcast_follows_the_class_hierarchy() {
    let unit = two_vars();
    let vars = children(unit.root());
    let add = children(vars[0])[0];
    let binary = unsafe { add.downcast::<BinaryOperator>() }.unwrap();
    assert_eq!(binary.opcode(), BinaryOperatorKind::Add);
    assert_eq!(binary.ty().name(), "int");
    assert!(unsafe { add.downcast::<Expr>() }.is_some());
    assert!(unsafe { add.downcast::<CastExpr>() }.is_none());
    assert!(unsafe { vars[0].downcast::<Expr>() }.is_none());
}

#[test]
fn declaration_references_resolve_to_nodes() {
    let unit = two_vars();
    let vars = children(unit.root());
    let cast = children(vars[1])[0];
    assert_eq!(unsafe { cast.downcast::<CastExpr>() }.unwrap().cast_kind(), CastKind::LValueToRValue);
    let decl_ref = children(cast)[0];
    let decl_ref = unsafe { decl_ref.downcast::<DeclRefExpr>() }.unwrap();
    assert_eq!(decl_ref.name(), "x");
    assert_eq!(decl_ref.decl(), Some(vars[0]));
}

#[test]
fn membership_and_offset_lookup() {
    let unit = two_vars();
    let other = two_vars();
    let vars = children(unit.root());
    assert!(unit.contains(vars[0]));
    assert!(!other.contains(vars[0]));

    let plus = TextSize::from(10);
    let add = children(vars[0])[0];
    assert_eq!(unit.node_at(plus), add);
    let one = unit.node_at(TextSize::from(8));
    assert_eq!(unsafe { one.get() }.class(), NodeClass::IntegerLiteral);
    assert_eq!(unit.node_at(TextSize::from(14)), unit.root());
}

#[test]
fn empty_slots_keep_positions() {
    let mut b = Builder::new("for.c", "for (;;) ;");
    let tu = b.start(NodeData::TranslationUnit);
    let for_stmt = b.start(NodeData::Stmt(NodeClass::ForStmt));
    b.expect("for");
    b.expect("(");
    b.empty_slot();
    b.expect(";");
    b.empty_slot();
    b.expect(";");
    b.empty_slot();
    b.expect(")");
    let body = b.start(NodeData::Stmt(NodeClass::NullStmt));
    b.expect(";");
    body.complete(&mut b);
    for_stmt.complete(&mut b);
    tu.complete(&mut b);
    let unit = b.finish();

    let for_stmt = children(unit.root())[0];
    let slots = unsafe { for_stmt.get() }.child_slots();
    assert_eq!(slots.len(), 4);
    assert!(slots[..3].iter().all(Option::is_none));
    assert_eq!(unsafe { slots[3].unwrap().get() }.class(), NodeClass::NullStmt);
}

#[test]
fn comments_are_skipped_by_nodes_but_kept_as_tokens() {
    let mut b = Builder::new("comment.c", "/* a */ ;");
    let tu = b.start(NodeData::TranslationUnit);
    let null = b.start(NodeData::Stmt(NodeClass::NullStmt));
    b.expect(";");
    null.complete(&mut b);
    tu.complete(&mut b);
    let unit = b.finish();

    assert_eq!(unit.tokens().len(), 2);
    let null = children(unit.root())[0];
    assert_eq!(unsafe { null.get() }.range(), TextRange::new(8.into(), 9.into()));
}

#[test]
#[should_panic = "node was started but never completed"]
fn unbalanced_markers_panic() {
    let mut b = Builder::new("bad.c", "");
    let _tu = b.start(NodeData::TranslationUnit);
}

#[test]
#[should_panic = "you should call `Builder::finish()`"]
fn unfinished_builders_panic() {
    let mut b = Builder::new("bad.c", "");
    let tu = b.start(NodeData::TranslationUnit);
    tu.complete(&mut b);
}
