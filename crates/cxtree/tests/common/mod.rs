//! Units assembled through the front-end builder, the way a parser would
//! emit them.

#![allow(dead_code)]

use cxtree::{Index, Node, NodeKind, TranslationUnit};
use cxtree_frontend::{
    BinaryOperatorKind, Builder, CastKind, FunctionData, MethodFlags, NodeClass, NodeData,
    NodeRef, QualType, TagTypeKind, UnaryOperatorKind, UnitStorage,
};

pub fn int() -> QualType {
    QualType::new("int")
}

pub fn leaf(b: &mut Builder, data: NodeData, text: &str) -> NodeRef {
    let m = b.start(data);
    b.expect(text);
    m.complete(b)
}

fn decl_ref(b: &mut Builder, name: &str, decl: NodeRef) -> NodeRef {
    leaf(b, NodeData::decl_ref(int(), name, Some(decl)), name)
}

/// An lvalue-to-rvalue conversion of a reference to `decl`.
fn rvalue(b: &mut Builder, name: &str, decl: NodeRef) -> NodeRef {
    let cast = b.start(NodeData::implicit_cast(int(), CastKind::LValueToRValue));
    decl_ref(b, name, decl);
    cast.complete(b)
}

pub const VAR_X: &str = "int x = 1 + 2;";

/// `int x = 1 + 2;`
pub fn var_x() -> UnitStorage {
    let mut b = Builder::new("var_x.c", VAR_X);
    let tu = b.start(NodeData::TranslationUnit);
    let x = b.start(NodeData::var("x", int()));
    b.expect("int");
    b.expect("x");
    b.expect("=");
    let add = b.start(NodeData::binary(int(), BinaryOperatorKind::Add));
    leaf(&mut b, NodeData::int(int(), 1), "1");
    b.expect("+");
    leaf(&mut b, NodeData::int(int(), 2), "2");
    add.complete(&mut b);
    x.complete(&mut b);
    b.expect(";");
    tu.complete(&mut b);
    b.finish()
}

pub const SUM: &str = "\
// sum the first n integers
int sum(int n) {
  int total = 0;
  for (int i = 0; i < n; i++)
    total += i;
  for (;;)
    break;
  return total;
}
";

pub fn sum() -> UnitStorage {
    let mut b = Builder::new("sum.c", SUM);
    let tu = b.start(NodeData::TranslationUnit);
    let f = b.start(NodeData::Function(FunctionData {
        is_definition: true,
        ..FunctionData::new("sum", QualType::new("int (int)"))
    }));
    b.expect("int");
    b.expect("sum");
    b.expect("(");
    let parm = b.start(NodeData::Parm { name: "n".into(), ty: int() });
    b.expect("int");
    b.expect("n");
    let n = parm.complete(&mut b);
    b.expect(")");

    let body = b.start(NodeData::Stmt(NodeClass::CompoundStmt));
    b.expect("{");

    let decl_stmt = b.start(NodeData::Stmt(NodeClass::DeclStmt));
    let var = b.start(NodeData::var("total", int()));
    b.expect("int");
    b.expect("total");
    b.expect("=");
    leaf(&mut b, NodeData::int(int(), 0), "0");
    let total = var.complete(&mut b);
    b.expect(";");
    decl_stmt.complete(&mut b);

    let for_stmt = b.start(NodeData::Stmt(NodeClass::ForStmt));
    b.expect("for");
    b.expect("(");
    let init = b.start(NodeData::Stmt(NodeClass::DeclStmt));
    let var = b.start(NodeData::var("i", int()));
    b.expect("int");
    b.expect("i");
    b.expect("=");
    leaf(&mut b, NodeData::int(int(), 0), "0");
    let i = var.complete(&mut b);
    b.expect(";");
    init.complete(&mut b);
    let cond = b.start(NodeData::binary(QualType::new("bool"), BinaryOperatorKind::LT));
    rvalue(&mut b, "i", i);
    b.expect("<");
    rvalue(&mut b, "n", n);
    cond.complete(&mut b);
    b.expect(";");
    let inc = b.start(NodeData::Unary { ty: int(), opcode: UnaryOperatorKind::PostInc });
    decl_ref(&mut b, "i", i);
    b.expect("++");
    inc.complete(&mut b);
    b.expect(")");
    let step =
        b.start(NodeData::CompoundAssign { ty: int(), opcode: BinaryOperatorKind::AddAssign });
    decl_ref(&mut b, "total", total);
    b.expect("+=");
    rvalue(&mut b, "i", i);
    step.complete(&mut b);
    b.expect(";");
    for_stmt.complete(&mut b);

    let forever = b.start(NodeData::Stmt(NodeClass::ForStmt));
    b.expect("for");
    b.expect("(");
    b.empty_slot();
    b.expect(";");
    b.empty_slot();
    b.expect(";");
    b.empty_slot();
    b.expect(")");
    leaf(&mut b, NodeData::Stmt(NodeClass::BreakStmt), "break");
    b.expect(";");
    forever.complete(&mut b);

    let ret = b.start(NodeData::Stmt(NodeClass::ReturnStmt));
    b.expect("return");
    rvalue(&mut b, "total", total);
    b.expect(";");
    ret.complete(&mut b);

    b.expect("}");
    body.complete(&mut b);
    f.complete(&mut b);
    tu.complete(&mut b);
    b.finish()
}

pub const DECLS: &str = "\
#define SQUARE(x) ((x) * (x))
namespace geo {
typedef unsigned int size;
enum class Color { Red, Green = 4 };
struct Point { int x; int y : 4; };
class Shape {
  virtual double area() const = 0;
  static int count();
};
}
int nine = SQUARE(3);
";

pub fn decls() -> UnitStorage {
    let mut b = Builder::new("decls.cpp", DECLS);
    let tu = b.start(NodeData::TranslationUnit);
    for text in ["#", "define", "SQUARE", "(", "x", ")", "(", "(", "x", ")", "*", "(", "x", ")", ")"]
    {
        b.expect(text);
    }

    let ns = b.start(NodeData::Namespace { name: "geo".into() });
    b.expect("namespace");
    b.expect("geo");
    b.expect("{");

    let typedef = b.start(NodeData::Typedef {
        name: "size".into(),
        underlying: QualType::new("unsigned int"),
    });
    for text in ["typedef", "unsigned", "int", "size"] {
        b.expect(text);
    }
    typedef.complete(&mut b);
    b.expect(";");

    let color = QualType::new("geo::Color");
    let en = b.start(NodeData::Enum { name: "Color".into(), is_scoped: true, is_definition: true });
    for text in ["enum", "class", "Color", "{"] {
        b.expect(text);
    }
    leaf(
        &mut b,
        NodeData::EnumConstant { name: "Red".into(), ty: color.clone(), value: 0 },
        "Red",
    );
    b.expect(",");
    let green = b.start(NodeData::EnumConstant { name: "Green".into(), ty: color, value: 4 });
    b.expect("Green");
    b.expect("=");
    let constant = b.start(NodeData::Expr(NodeClass::ConstantExpr, int()));
    leaf(&mut b, NodeData::int(int(), 4), "4");
    constant.complete(&mut b);
    green.complete(&mut b);
    b.expect("}");
    en.complete(&mut b);
    b.expect(";");

    let point = b.start(NodeData::Record {
        name: "Point".into(),
        tag: TagTypeKind::Struct,
        is_definition: true,
    });
    for text in ["struct", "Point", "{"] {
        b.expect(text);
    }
    let field = b.start(NodeData::Field { name: "x".into(), ty: int(), bit_width: None });
    b.expect("int");
    b.expect("x");
    field.complete(&mut b);
    b.expect(";");
    let field = b.start(NodeData::Field { name: "y".into(), ty: int(), bit_width: Some(4) });
    for text in ["int", "y", ":", "4"] {
        b.expect(text);
    }
    field.complete(&mut b);
    b.expect(";");
    b.expect("}");
    point.complete(&mut b);
    b.expect(";");

    let shape = b.start(NodeData::Record {
        name: "Shape".into(),
        tag: TagTypeKind::Class,
        is_definition: true,
    });
    for text in ["class", "Shape", "{"] {
        b.expect(text);
    }
    let area = b.start(NodeData::Method(
        FunctionData::new("area", QualType::new("double () const")),
        MethodFlags { is_virtual: true, is_pure: true, is_const: true, is_static: false },
    ));
    for text in ["virtual", "double", "area", "(", ")", "const", "=", "0"] {
        b.expect(text);
    }
    area.complete(&mut b);
    b.expect(";");
    let count = b.start(NodeData::Method(
        FunctionData::new("count", QualType::new("int ()")),
        MethodFlags { is_static: true, ..MethodFlags::default() },
    ));
    for text in ["static", "int", "count", "(", ")"] {
        b.expect(text);
    }
    count.complete(&mut b);
    b.expect(";");
    b.expect("}");
    shape.complete(&mut b);
    b.expect(";");
    b.expect("}");
    ns.complete(&mut b);

    // The initializer is the macro expansion; its tokens are the invocation.
    let nine = b.start(NodeData::var("nine", int()));
    b.expect("int");
    b.expect("nine");
    b.expect("=");
    let mul = b.start(NodeData::binary(int(), BinaryOperatorKind::Mul));
    b.expect("SQUARE");
    b.expect("(");
    leaf(&mut b, NodeData::int(int(), 3), "3");
    let rhs = b.start(NodeData::int(int(), 3));
    rhs.complete(&mut b);
    b.expect(")");
    mul.complete(&mut b);
    nine.complete(&mut b);
    b.expect(";");

    tu.complete(&mut b);
    b.finish()
}

pub const FIXED: &str = "_Accum half = 0.5k;";

/// A fixed-point literal, a class newer front-ends introduced.
pub fn fixed() -> UnitStorage {
    let accum = QualType::new("_Accum");
    let mut b = Builder::new("fixed.c", FIXED);
    let tu = b.start(NodeData::TranslationUnit);
    let var = b.start(NodeData::var("half", accum.clone()));
    b.expect("_Accum");
    b.expect("half");
    b.expect("=");
    leaf(&mut b, NodeData::FixedPointLiteral { ty: accum, value: 1 << 14, scale: 15 }, "0.5k");
    var.complete(&mut b);
    b.expect(";");
    tu.complete(&mut b);
    b.finish()
}

pub const COAWAIT: &str = "int v = co_await t;";

/// A class the registry has no wrapper for.
pub fn coawait() -> UnitStorage {
    let mut b = Builder::new("coawait.cpp", COAWAIT);
    let tu = b.start(NodeData::TranslationUnit);
    let var = b.start(NodeData::var("v", int()));
    b.expect("int");
    b.expect("v");
    b.expect("=");
    let expr = b.start(NodeData::Expr(NodeClass::CoawaitExpr, int()));
    b.expect("co_await");
    leaf(&mut b, NodeData::decl_ref(int(), "t", None), "t");
    expr.complete(&mut b);
    var.complete(&mut b);
    b.expect(";");
    tu.complete(&mut b);
    b.finish()
}

pub fn load(index: &Index, storage: UnitStorage) -> TranslationUnit {
    index.load(storage)
}

pub fn children(node: &Node) -> Vec<Node> {
    node.children().unwrap().collect::<Result<_, _>>().unwrap()
}

pub fn kinds(nodes: &[Node]) -> Vec<NodeKind> {
    nodes.iter().map(|node| node.kind().unwrap()).collect()
}

pub fn spellings(node: &Node) -> Vec<String> {
    node.tokens().unwrap().iter().map(|token| token.spelling().unwrap()).collect()
}

/// First node in preorder with `kind`.
pub fn find(root: &Node, kind: NodeKind) -> Node {
    root.descendants()
        .unwrap()
        .map(Result::unwrap)
        .find(|node| node.kind().unwrap() == kind)
        .unwrap_or_else(|| panic!("no {kind} below {root:?}"))
}

/// First node in preorder named `name`.
pub fn named(root: &Node, name: &str) -> Node {
    root.descendants()
        .unwrap()
        .map(Result::unwrap)
        .find(|node| node.name().is_ok_and(|it| it == name))
        .unwrap_or_else(|| panic!("nothing named {name} below {root:?}"))
}
