//! # Abstract Syntax Tree
//!
//! Typed tree produced by [`crate::parse_program`] and consumed read-only by
//! the interpreter, the diagram builder and static analysis.
//!
//! Every node category is a closed enum so adding a variant forces every
//! `match` in the parser and interpreter to handle it.
//!
//! ## Example
//!
//! ```rust
//! use pseint_parser::ast::{Expression, Literal};
//!
//! let expr = Expression::number(2.0);
//! assert_eq!(expr, Expression::Literal { value: Literal::Number(2.0) });
//! ```

use serde::{Deserialize, Serialize};

// =============================================================================
// PROGRAM
// =============================================================================

/// A complete parsed program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramAst {
    /// Name after `Algoritmo`.
    pub name: String,
    /// Global variable declarations, in source order.
    pub declarations: Vec<Declaration>,
    /// Global constants, in source order.
    pub constants: Vec<Constant>,
    /// Main statement list.
    pub statements: Vec<Statement>,
    /// Subprograms with a return variable.
    pub functions: Vec<Subprogram>,
    /// Subprograms without a return value.
    pub procedures: Vec<Subprogram>,
}

impl ProgramAst {
    /// Find a function by name.
    pub fn function(&self, name: &str) -> Option<&Subprogram> {
        self.functions.iter().find(|f| f.name == name)
    }

    /// Find a procedure by name.
    pub fn procedure(&self, name: &str) -> Option<&Subprogram> {
        self.procedures.iter().find(|p| p.name == name)
    }
}

// =============================================================================
// DECLARATIONS
// =============================================================================

/// Declared type of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VarType {
    Cadena,
    Entero,
    Real,
    Logico,
    Caracter,
}

impl VarType {
    /// Source spelling of the type.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Cadena => "Cadena",
            Self::Entero => "Entero",
            Self::Real => "Real",
            Self::Logico => "Logico",
            Self::Caracter => "Caracter",
        }
    }

    /// True for `Entero` and `Real`.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Entero | Self::Real)
    }
}

/// A `Definir` entry: one name with its type and optional array shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Declaration {
    pub name: String,
    pub var_type: VarType,
    /// `None` for scalars; for arrays one positive size per dimension.
    pub dimensions: Option<Vec<usize>>,
    pub line: usize,
}

impl Declaration {
    /// Scalar declaration.
    pub fn scalar(name: impl Into<String>, var_type: VarType, line: usize) -> Self {
        Self {
            name: name.into(),
            var_type,
            dimensions: None,
            line,
        }
    }

    /// Array declaration.
    pub fn array(name: impl Into<String>, var_type: VarType, dimensions: Vec<usize>, line: usize) -> Self {
        Self {
            name: name.into(),
            var_type,
            dimensions: Some(dimensions),
            line,
        }
    }

    /// True when the declaration has dimensions.
    pub fn is_array(&self) -> bool {
        self.dimensions.is_some()
    }

    /// Number of dimensions (0 for scalars).
    pub fn rank(&self) -> usize {
        self.dimensions.as_ref().map_or(0, Vec::len)
    }
}

/// A `Constante` binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constant {
    pub name: String,
    pub expression: Expression,
    pub line: usize,
}

// =============================================================================
// EXPRESSIONS
// =============================================================================

/// Literal value written in source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    String(String),
    Number(f64),
    Boolean(bool),
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOperator {
    /// `NO`
    Not,
    /// Leading `-`
    Negate,
}

/// Binary operators, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOperator {
    Or,
    And,
    GreaterEqual,
    LessEqual,
    Equal,
    NotEqual,
    Greater,
    Less,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
}

impl BinaryOperator {
    /// Canonical source symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Or => "O",
            Self::And => "Y",
            Self::GreaterEqual => ">=",
            Self::LessEqual => "<=",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Greater => ">",
            Self::Less => "<",
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
        }
    }
}

/// Expression tree. Nodes are pure; evaluation never mutates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Expression {
    Literal {
        value: Literal,
    },
    Identifier {
        name: String,
    },
    ArrayElement {
        name: String,
        indices: Vec<Expression>,
    },
    Unary {
        operator: UnaryOperator,
        operand: Box<Expression>,
    },
    Binary {
        operator: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    FunctionCall {
        name: String,
        arguments: Vec<Expression>,
    },
}

impl Expression {
    /// Numeric literal.
    pub fn number(value: f64) -> Self {
        Self::Literal {
            value: Literal::Number(value),
        }
    }

    /// String literal.
    pub fn string(value: impl Into<String>) -> Self {
        Self::Literal {
            value: Literal::String(value.into()),
        }
    }

    /// Boolean literal.
    pub fn boolean(value: bool) -> Self {
        Self::Literal {
            value: Literal::Boolean(value),
        }
    }

    /// Bare identifier.
    pub fn identifier(name: impl Into<String>) -> Self {
        Self::Identifier { name: name.into() }
    }

    /// Binary node.
    pub fn binary(operator: BinaryOperator, left: Expression, right: Expression) -> Self {
        Self::Binary {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Unary node.
    pub fn unary(operator: UnaryOperator, operand: Expression) -> Self {
        Self::Unary {
            operator,
            operand: Box::new(operand),
        }
    }

    /// View this expression as an assignable target, if it is one.
    pub fn as_target(&self) -> Option<TargetRef> {
        match self {
            Self::Identifier { name } => Some(TargetRef::Variable { name: name.clone() }),
            Self::ArrayElement { name, indices } => Some(TargetRef::ArrayElement {
                name: name.clone(),
                indices: indices.clone(),
            }),
            _ => None,
        }
    }
}

// =============================================================================
// TARGETS
// =============================================================================

/// Left-hand side of an assignment or a `Leer` target.
///
/// Indices are written 1-based in source and kept as expressions here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TargetRef {
    Variable {
        name: String,
    },
    ArrayElement {
        name: String,
        indices: Vec<Expression>,
    },
}

impl TargetRef {
    /// Name of the variable the target lives in.
    pub fn name(&self) -> &str {
        match self {
            Self::Variable { name } | Self::ArrayElement { name, .. } => name,
        }
    }
}

// =============================================================================
// STATEMENTS
// =============================================================================

/// A statement with the line it starts on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub line: usize,
    pub kind: StatementKind,
}

impl Statement {
    /// Create a statement.
    pub fn new(line: usize, kind: StatementKind) -> Self {
        Self { line, kind }
    }
}

/// One `Segun` case: its value list and body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchCase {
    pub values: Vec<Expression>,
    pub body: Vec<Statement>,
    pub line: usize,
}

/// Statement variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum StatementKind {
    Read {
        targets: Vec<TargetRef>,
    },
    Write {
        expressions: Vec<Expression>,
        /// `Sin Saltar`: keep the output line open.
        no_newline: bool,
    },
    Assign {
        target: TargetRef,
        value: Expression,
    },
    Call {
        name: String,
        arguments: Vec<Expression>,
    },
    If {
        condition: Expression,
        then_branch: Vec<Statement>,
        else_branch: Vec<Statement>,
    },
    For {
        iterator: String,
        start: Expression,
        end: Expression,
        step: Expression,
        body: Vec<Statement>,
    },
    While {
        condition: Expression,
        body: Vec<Statement>,
    },
    RepeatUntil {
        body: Vec<Statement>,
        condition: Expression,
    },
    Switch {
        subject: Expression,
        cases: Vec<SwitchCase>,
        default: Option<Vec<Statement>>,
    },
}

impl StatementKind {
    /// Marker used in execution traces.
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Read { .. } => "read",
            Self::Write { .. } => "write",
            Self::Assign { .. } => "assign",
            Self::Call { .. } => "call",
            Self::If { .. } => "if",
            Self::For { .. } => "for",
            Self::While { .. } => "while",
            Self::RepeatUntil { .. } => "repeatUntil",
            Self::Switch { .. } => "switch",
        }
    }
}

// =============================================================================
// SUBPROGRAMS
// =============================================================================

/// A subprogram parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,
    /// Arrays are always by reference.
    pub by_reference: bool,
    /// `Some(rank)` for `name[]` / `name[,]` parameters.
    pub array_rank: Option<usize>,
}

impl Parameter {
    /// True for array parameters.
    pub fn is_array(&self) -> bool {
        self.array_rank.is_some()
    }
}

/// A `Funcion` or `SubProceso` definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subprogram {
    pub name: String,
    /// Present for functions, absent for procedures.
    pub return_variable: Option<String>,
    pub parameters: Vec<Parameter>,
    /// Local declarations, including `Definir` of parameters.
    pub declarations: Vec<Declaration>,
    pub constants: Vec<Constant>,
    pub body: Vec<Statement>,
    pub line: usize,
}

impl Subprogram {
    /// Local declaration for `name`, if the body declared one.
    pub fn declaration(&self, name: &str) -> Option<&Declaration> {
        self.declarations.iter().find(|d| d.name == name)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_names() {
        let kind = StatementKind::RepeatUntil {
            body: Vec::new(),
            condition: Expression::boolean(true),
        };
        assert_eq!(kind.marker(), "repeatUntil");
    }

    #[test]
    fn test_declaration_rank() {
        let decl = Declaration::array("m", VarType::Entero, vec![2, 3], 1);
        assert!(decl.is_array());
        assert_eq!(decl.rank(), 2);
        assert_eq!(Declaration::scalar("x", VarType::Real, 1).rank(), 0);
    }

    #[test]
    fn test_expression_as_target() {
        let expr = Expression::identifier("x");
        assert_eq!(expr.as_target(), Some(TargetRef::Variable { name: "x".into() }));
        assert_eq!(Expression::number(1.0).as_target(), None);
    }

    #[test]
    fn test_expression_serializes_with_type_tag() {
        let json = serde_json::to_value(Expression::binary(
            BinaryOperator::Add,
            Expression::number(1.0),
            Expression::identifier("x"),
        ))
        .unwrap();
        assert_eq!(json["type"], "binary");
        assert_eq!(json["left"]["value"], 1.0);
        assert_eq!(json["right"]["name"], "x");
    }
}
