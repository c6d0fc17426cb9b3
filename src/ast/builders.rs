//! Terse constructors for assembling trees by hand.
//!
//! Front ends that build the tree programmatically (and the test suite) use
//! these instead of spelling out every variant. Statements are created with a
//! default location; use [`Stmt::at`] to attach one.

use super::*;

// Types

pub fn t_int() -> Type {
    Type::new(BaseType::Int)
}

pub fn t_long() -> Type {
    Type::new(BaseType::Long)
}

pub fn t_unsigned() -> Type {
    Type::new(BaseType::Unsigned)
}

pub fn t_float() -> Type {
    Type::new(BaseType::Float)
}

pub fn t_double() -> Type {
    Type::new(BaseType::Double)
}

pub fn t_char() -> Type {
    Type::new(BaseType::Char)
}

pub fn t_string() -> Type {
    Type::new(BaseType::String)
}

pub fn t_void() -> Type {
    Type::new(BaseType::Void)
}

pub fn t_struct(name: &str) -> Type {
    Type::new(BaseType::Struct(name.to_string()))
}

pub fn t_union(name: &str) -> Type {
    Type::new(BaseType::Union(name.to_string()))
}

// Expressions

pub fn int(n: i64) -> Expr {
    Expr::Number(n.to_string())
}

/// Floating literal; the text always carries a decimal point
pub fn float(x: f64) -> Expr {
    Expr::Number(format!("{:?}", x))
}

pub fn str_lit(raw: &str) -> Expr {
    Expr::Str(raw.to_string())
}

pub fn char_lit(c: char) -> Expr {
    Expr::Char(c.to_string())
}

pub fn ident(name: &str) -> Expr {
    Expr::Identifier(name.to_string())
}

pub fn field(base: Expr, name: &str) -> Expr {
    Expr::Field {
        base: Box::new(base),
        field: name.to_string(),
    }
}

pub fn index(array: &str, idx: Expr) -> Expr {
    Expr::Index {
        array: array.to_string(),
        index: Box::new(idx),
    }
}

pub fn paren(inner: Expr) -> Expr {
    Expr::Paren(Box::new(inner))
}

pub fn bin(op: BinOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

pub fn add(left: Expr, right: Expr) -> Expr {
    bin(BinOp::Add, left, right)
}

pub fn sub(left: Expr, right: Expr) -> Expr {
    bin(BinOp::Sub, left, right)
}

pub fn mul(left: Expr, right: Expr) -> Expr {
    bin(BinOp::Mul, left, right)
}

pub fn div(left: Expr, right: Expr) -> Expr {
    bin(BinOp::Div, left, right)
}

pub fn lt(left: Expr, right: Expr) -> Expr {
    bin(BinOp::Lt, left, right)
}

pub fn le(left: Expr, right: Expr) -> Expr {
    bin(BinOp::Le, left, right)
}

pub fn eq(left: Expr, right: Expr) -> Expr {
    bin(BinOp::Eq, left, right)
}

pub fn neg(operand: Expr) -> Expr {
    Expr::Unary {
        op: UnOp::Neg,
        operand: Box::new(operand),
    }
}

pub fn not(operand: Expr) -> Expr {
    Expr::Unary {
        op: UnOp::Not,
        operand: Box::new(operand),
    }
}

pub fn call(name: &str, args: Vec<Expr>) -> Expr {
    Expr::Call {
        name: name.to_string(),
        args,
    }
}

// Statements

pub fn include(file: &str) -> Stmt {
    StmtKind::Directive(Directive::Include(file.to_string())).into()
}

pub fn define(name: &str, value: Option<Expr>) -> Stmt {
    StmtKind::Directive(Directive::Define {
        name: name.to_string(),
        value,
    })
    .into()
}

fn fields(list: &[(&str, Type)]) -> Vec<Field> {
    list.iter()
        .map(|(name, field_type)| Field {
            name: name.to_string(),
            field_type: field_type.clone(),
        })
        .collect()
}

pub fn struct_def(name: &str, field_list: &[(&str, Type)]) -> Stmt {
    StmtKind::StructDef {
        name: name.to_string(),
        fields: fields(field_list),
    }
    .into()
}

pub fn union_def(name: &str, field_list: &[(&str, Type)]) -> Stmt {
    StmtKind::UnionDef {
        name: name.to_string(),
        fields: fields(field_list),
    }
    .into()
}

pub fn var(name: &str, var_type: Type) -> Stmt {
    StmtKind::VarDecl {
        name: name.to_string(),
        var_type,
        init: None,
    }
    .into()
}

pub fn var_init(name: &str, var_type: Type, init: Expr) -> Stmt {
    StmtKind::VarDecl {
        name: name.to_string(),
        var_type,
        init: Some(init),
    }
    .into()
}

pub fn array(name: &str, element: Type, len: usize) -> Stmt {
    var(name, element.with_array(len))
}

pub fn assign(name: &str, value: Expr) -> Stmt {
    StmtKind::Assignment {
        target: AssignTarget::Variable(name.to_string()),
        value,
    }
    .into()
}

pub fn assign_field(base: &str, path: &[&str], value: Expr) -> Stmt {
    StmtKind::Assignment {
        target: AssignTarget::Field {
            base: base.to_string(),
            path: path.iter().map(|s| s.to_string()).collect(),
        },
        value,
    }
    .into()
}

pub fn assign_index(array: &str, idx: Expr, value: Expr) -> Stmt {
    StmtKind::Assignment {
        target: AssignTarget::Index {
            array: array.to_string(),
            index: idx,
        },
        value,
    }
    .into()
}

pub fn if_then(condition: Expr, then_branch: Stmt) -> Stmt {
    StmtKind::If {
        condition,
        then_branch: Box::new(then_branch),
        else_branch: None,
    }
    .into()
}

pub fn if_else(condition: Expr, then_branch: Stmt, else_branch: Stmt) -> Stmt {
    StmtKind::If {
        condition,
        then_branch: Box::new(then_branch),
        else_branch: Some(Box::new(else_branch)),
    }
    .into()
}

pub fn while_loop(condition: Expr, body: Stmt) -> Stmt {
    StmtKind::While {
        condition,
        body: Box::new(body),
    }
    .into()
}

pub fn do_while(body: Stmt, condition: Expr) -> Stmt {
    StmtKind::DoWhile {
        body: Box::new(body),
        condition,
    }
    .into()
}

pub fn for_loop(init: Option<Stmt>, condition: Option<Expr>, step: Option<Stmt>, body: Stmt) -> Stmt {
    StmtKind::For {
        init: init.map(Box::new),
        condition,
        step: step.map(Box::new),
        body: Box::new(body),
    }
    .into()
}

pub fn switch(expr: Expr, cases: Vec<(Expr, Vec<Stmt>)>, defaults: Vec<Vec<Stmt>>) -> Stmt {
    StmtKind::Switch {
        expr,
        cases: cases
            .into_iter()
            .map(|(label, statements)| CaseBlock { label, statements })
            .collect(),
        defaults,
    }
    .into()
}

pub fn brk() -> Stmt {
    StmtKind::Break.into()
}

pub fn cont() -> Stmt {
    StmtKind::Continue.into()
}

pub fn ret(value: Option<Expr>) -> Stmt {
    StmtKind::Return(value).into()
}

pub fn printf(format: &str, args: Vec<Expr>) -> Stmt {
    StmtKind::Io(IoStatement::Printf {
        format: format.to_string(),
        args,
    })
    .into()
}

pub fn scanf(format: &str, targets: &[&str]) -> Stmt {
    StmtKind::Io(IoStatement::Scanf {
        format: format.to_string(),
        targets: targets.iter().map(|s| s.to_string()).collect(),
    })
    .into()
}

pub fn gets(target: &str) -> Stmt {
    StmtKind::Io(IoStatement::Gets(target.to_string())).into()
}

pub fn puts(value: Expr) -> Stmt {
    StmtKind::Io(IoStatement::Puts(value)).into()
}

pub fn block(statements: Vec<Stmt>) -> Stmt {
    StmtKind::Block(statements).into()
}

pub fn expr_stmt(expr: Expr) -> Stmt {
    StmtKind::Expr(expr).into()
}

pub fn function(return_type: Type, name: &str, params: &[(&str, Type)], body: Vec<Stmt>) -> Stmt {
    StmtKind::FunctionDef(FunctionDef {
        name: name.to_string(),
        params: params
            .iter()
            .map(|(name, param_type)| Param {
                name: name.to_string(),
                param_type: param_type.clone(),
            })
            .collect(),
        body,
        return_type,
        location: SourceLocation::default(),
    })
    .into()
}

pub fn program(items: Vec<Stmt>) -> Program {
    Program::new(items)
}
