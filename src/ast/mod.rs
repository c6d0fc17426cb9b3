//! AST definitions consumed by the evaluator
//!
//! The tree is produced by an external front end; the evaluator only walks it.
//! Statements carry a [`SourceLocation`] for error reporting, expressions do
//! not (errors are attributed to the statement being executed).
//!
//! Literals keep the raw text the front end saw: numeric literals are parsed
//! by the evaluator (floating when the text contains a `.`), and string and
//! character literals are unescaped at evaluation time.

pub mod builders;

use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Base types supported by the evaluator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseType {
    Int,
    Short,
    Long,
    LongLong,
    Unsigned,
    UnsignedShort,
    UnsignedLong,
    Float,
    Double,
    Char,
    String,
    Void,
    Struct(String),
    Union(String),
}

impl BaseType {
    /// `int` and every sized/unsigned integer variant
    pub fn is_integral(&self) -> bool {
        matches!(
            self,
            BaseType::Int
                | BaseType::Short
                | BaseType::Long
                | BaseType::LongLong
                | BaseType::Unsigned
                | BaseType::UnsignedShort
                | BaseType::UnsignedLong
        )
    }

    pub fn is_floating(&self) -> bool {
        matches!(self, BaseType::Float | BaseType::Double)
    }
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaseType::Int => write!(f, "int"),
            BaseType::Short => write!(f, "short"),
            BaseType::Long => write!(f, "long"),
            BaseType::LongLong => write!(f, "long long"),
            BaseType::Unsigned => write!(f, "unsigned"),
            BaseType::UnsignedShort => write!(f, "unsigned short"),
            BaseType::UnsignedLong => write!(f, "unsigned long"),
            BaseType::Float => write!(f, "float"),
            BaseType::Double => write!(f, "double"),
            BaseType::Char => write!(f, "char"),
            BaseType::String => write!(f, "string"),
            BaseType::Void => write!(f, "void"),
            BaseType::Struct(name) => write!(f, "struct {}", name),
            BaseType::Union(name) => write!(f, "union {}", name),
        }
    }
}

/// Declared type: a base type, optionally as a fixed-length array
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Type {
    pub base: BaseType,
    pub array_len: Option<usize>,
}

impl Type {
    pub fn new(base: BaseType) -> Self {
        Type {
            base,
            array_len: None,
        }
    }

    pub fn with_array(mut self, len: usize) -> Self {
        self.array_len = Some(len);
        self
    }

    pub fn is_array(&self) -> bool {
        self.array_len.is_some()
    }

    /// Element type of an array type (the type itself for scalars)
    pub fn element_type(&self) -> Type {
        Type::new(self.base.clone())
    }

    /// Map the front end's type text (`"int"`, `"unsigned long"`,
    /// `"struct Point"`, `"structPoint"`) to a type.
    ///
    /// Unknown spellings yield `None`.
    pub fn parse(text: &str) -> Option<Type> {
        let words: Vec<&str> = text.split_whitespace().collect();
        let base = match words.as_slice() {
            ["int"] | ["signed"] | ["signed", "int"] => BaseType::Int,
            ["short"] | ["short", "int"] => BaseType::Short,
            ["long"] | ["long", "int"] => BaseType::Long,
            ["long", "long"] | ["long", "long", "int"] => BaseType::LongLong,
            ["unsigned"] | ["unsigned", "int"] => BaseType::Unsigned,
            ["unsigned", "short"] => BaseType::UnsignedShort,
            ["unsigned", "long"] | ["unsigned", "long", "long"] => BaseType::UnsignedLong,
            ["float"] => BaseType::Float,
            ["double"] => BaseType::Double,
            ["char"] => BaseType::Char,
            ["string"] => BaseType::String,
            ["void"] => BaseType::Void,
            ["struct", name] => BaseType::Struct(name.to_string()),
            ["union", name] => BaseType::Union(name.to_string()),
            [glued] => {
                // Token-concatenated spellings such as "structPoint"
                if let Some(name) = glued.strip_prefix("struct").filter(|n| !n.is_empty()) {
                    BaseType::Struct(name.to_string())
                } else if let Some(name) = glued.strip_prefix("union").filter(|n| !n.is_empty()) {
                    BaseType::Union(name.to_string())
                } else {
                    return None;
                }
            }
            _ => return None,
        };
        Some(Type::new(base))
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.array_len {
            Some(_) => write!(f, "{}[]", self.base),
            None => write!(f, "{}", self.base),
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    // Logical
    And,
    Or,
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
        };
        f.write_str(symbol)
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg, // -x
    Not, // !x
}

/// Function parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub param_type: Type,
}

/// Struct or union field
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub field_type: Type,
}

/// Function definition
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub name: String,
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
    pub return_type: Type,
    pub location: SourceLocation,
}

/// Preprocessor directive
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    Include(String),
    Define { name: String, value: Option<Expr> },
}

/// One `case label: statements` block of a switch
#[derive(Debug, Clone, PartialEq)]
pub struct CaseBlock {
    pub label: Expr,
    pub statements: Vec<Stmt>,
}

/// Left-hand side of an assignment
#[derive(Debug, Clone, PartialEq)]
pub enum AssignTarget {
    /// `x = ...`
    Variable(String),
    /// `a.b.c = ...`; `path` holds `["b", "c"]`
    Field { base: String, path: Vec<String> },
    /// `arr[i] = ...`
    Index { array: String, index: Expr },
}

/// Formatted I/O statements
#[derive(Debug, Clone, PartialEq)]
pub enum IoStatement {
    Printf { format: String, args: Vec<Expr> },
    Scanf { format: String, targets: Vec<String> },
    Gets(String),
    Puts(Expr),
}

/// Expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal text, e.g. `"42"` or `"3.14"`
    Number(String),
    /// String literal content without quotes, escapes not yet processed
    Str(String),
    /// Character literal content without quotes
    Char(String),
    Identifier(String),
    Field {
        base: Box<Expr>,
        field: String,
    },
    Index {
        array: String,
        index: Box<Expr>,
    },
    Paren(Box<Expr>),
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnOp,
        operand: Box<Expr>,
    },
    Call {
        name: String,
        args: Vec<Expr>,
    },
    /// A shape the front end produced but the evaluator does not model;
    /// evaluates to void
    Opaque(String),
}

/// Statement kinds
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    Directive(Directive),
    StructDef {
        name: String,
        fields: Vec<Field>,
    },
    UnionDef {
        name: String,
        fields: Vec<Field>,
    },
    VarDecl {
        name: String,
        var_type: Type,
        init: Option<Expr>,
    },
    Assignment {
        target: AssignTarget,
        value: Expr,
    },
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    Switch {
        expr: Expr,
        cases: Vec<CaseBlock>,
        defaults: Vec<Vec<Stmt>>,
    },
    While {
        condition: Expr,
        body: Box<Stmt>,
    },
    DoWhile {
        body: Box<Stmt>,
        condition: Expr,
    },
    For {
        init: Option<Box<Stmt>>,
        condition: Option<Expr>,
        step: Option<Box<Stmt>>,
        body: Box<Stmt>,
    },
    Break,
    Continue,
    Return(Option<Expr>),
    Io(IoStatement),
    FunctionDef(FunctionDef),
    Block(Vec<Stmt>),
    Expr(Expr),
}

/// A statement with its source location
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub location: SourceLocation,
}

impl Stmt {
    pub fn new(kind: StmtKind, location: SourceLocation) -> Self {
        Stmt { kind, location }
    }

    /// Attach a location to a statement built without one
    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.location = SourceLocation::new(line, column);
        self
    }
}

impl From<StmtKind> for Stmt {
    fn from(kind: StmtKind) -> Self {
        Stmt {
            kind,
            location: SourceLocation::default(),
        }
    }
}

/// Top-level program structure
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub items: Vec<Stmt>, // Directives, shapes, globals and function definitions
}

impl Program {
    pub fn new(items: Vec<Stmt>) -> Self {
        Program { items }
    }

    /// Find a top-level function definition by name
    pub fn function(&self, name: &str) -> Option<&FunctionDef> {
        self.items.iter().find_map(|item| match &item.kind {
            StmtKind::FunctionDef(def) if def.name == name => Some(def),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_type_spellings() {
        assert_eq!(Type::parse("int"), Some(Type::new(BaseType::Int)));
        assert_eq!(
            Type::parse("unsigned  long"),
            Some(Type::new(BaseType::UnsignedLong))
        );
        assert_eq!(
            Type::parse("struct Point"),
            Some(Type::new(BaseType::Struct("Point".to_string())))
        );
        assert_eq!(
            Type::parse("unionData"),
            Some(Type::new(BaseType::Union("Data".to_string())))
        );
        assert_eq!(Type::parse("struct"), None);
        assert_eq!(Type::parse("bool"), None);
    }

    #[test]
    fn test_type_display() {
        assert_eq!(Type::new(BaseType::Int).with_array(3).to_string(), "int[]");
        assert_eq!(
            Type::new(BaseType::Struct("P".to_string())).to_string(),
            "struct P"
        );
    }
}
