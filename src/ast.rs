//! Árbol de sintaxis abstracta.
//!
//! Cada nodo lleva la posición del primer terminal que contribuyó a su
//! construcción: la palabra clave `fn` para una función, el `let` para
//! una declaración, el token del operador para expresiones binarias y
//! unarias, y el primer terminal del literal para los literales. El
//! árbol es acíclico y la propiedad de cada hijo está anidada por
//! construcción; descartar la raíz libera el árbol completo.
//!
//! Los literales transportan su texto original tal cual; este frontend
//! nunca computa valores numéricos.

use std::fmt::{self, Display, Formatter};

use crate::source::Position;

/// Raíz del programa: una mezcla de declaraciones de función y
/// sentencias de nivel superior, en orden de aparición.
#[derive(Debug, PartialEq)]
pub struct Program {
    pub items: Vec<Item>,
    pub position: Position,
}

/// Elemento de nivel superior.
#[derive(Debug, PartialEq)]
pub enum Item {
    Function(Function),
    Statement(Statement),
}

/// Declaración de función. El lenguaje no admite parámetros ni
/// anotación de tipo de retorno.
#[derive(Debug, PartialEq)]
pub struct Function {
    pub name: String,
    pub body: Block,
    pub position: Position,
}

/// Bloque delimitado por llaves.
#[derive(Debug, PartialEq)]
pub struct Block {
    pub statements: Vec<Statement>,
    pub position: Position,
}

/// Sentencia.
#[derive(Debug, PartialEq)]
pub enum Statement {
    Let(LetStmt),
    Expr(ExprStmt),
    If(IfStmt),
    While(WhileStmt),
    Return(ReturnStmt),
    Break { position: Position },
    Continue { position: Position },
    Block(Block),
}

/// Nombre de tipo primitivo admitido en anotaciones `let`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TypeName {
    I32,
    F64,
    Bool,
    Char,
}

impl TypeName {
    pub fn as_str(self) -> &'static str {
        match self {
            TypeName::I32 => "i32",
            TypeName::F64 => "f64",
            TypeName::Bool => "bool",
            TypeName::Char => "char",
        }
    }
}

impl Display for TypeName {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> fmt::Result {
        fmt.write_str(self.as_str())
    }
}

/// Declaración `let`, con mutabilidad, tipo e inicializador opcionales.
#[derive(Debug, PartialEq)]
pub struct LetStmt {
    pub name: String,
    pub mutable: bool,
    pub ty: Option<TypeName>,
    pub init: Option<Expr>,
    pub position: Position,
}

/// Expresión en posición de sentencia.
#[derive(Debug, PartialEq)]
pub struct ExprStmt {
    pub expr: Expr,
    pub position: Position,
}

/// Condicional, con cadena `else if` representada como un `IfStmt`
/// anidado en la rama else.
#[derive(Debug, PartialEq)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_branch: Block,
    pub else_branch: Option<ElseBranch>,
    pub position: Position,
}

/// Rama `else`: o bien otro condicional (`else if`) o un bloque.
#[derive(Debug, PartialEq)]
pub enum ElseBranch {
    If(Box<IfStmt>),
    Block(Block),
}

/// Bucle `while`.
#[derive(Debug, PartialEq)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Block,
    pub position: Position,
}

/// Sentencia `return`, con valor opcional.
#[derive(Debug, PartialEq)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub position: Position,
}

/// Expresión: encabezado común con posición, y carga según la variante.
#[derive(Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub position: Position,
}

#[derive(Debug, PartialEq)]
pub enum ExprKind {
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },

    Identifier(String),
    Number(String),
    Str(String),
    Char(String),
    Bool(String),
}

/// Operador binario.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Neq,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
}

impl BinaryOp {
    pub fn as_str(self) -> &'static str {
        use BinaryOp::*;

        match self {
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Mod => "%",
            Eq => "==",
            Neq => "!=",
            Lt => "<",
            Le => "<=",
            Gt => ">",
            Ge => ">=",
            And => "&&",
            Or => "||",
            Assign => "=",
            AddAssign => "+=",
            SubAssign => "-=",
            MulAssign => "*=",
            DivAssign => "/=",
            ModAssign => "%=",
        }
    }
}

impl Display for BinaryOp {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> fmt::Result {
        fmt.write_str(self.as_str())
    }
}

/// Operador unario prefijo.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
    Plus,
}

impl UnaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Neg => "-",
            UnaryOp::Plus => "+",
        }
    }
}

impl Display for UnaryOp {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> fmt::Result {
        fmt.write_str(self.as_str())
    }
}

// ============================================================================
// Impresión jerárquica
// ============================================================================

fn pad(fmt: &mut Formatter<'_>, indent: usize) -> fmt::Result {
    for _ in 0..indent {
        fmt.write_str("  ")?;
    }
    Ok(())
}

impl Program {
    fn write_tree(&self, fmt: &mut Formatter<'_>, indent: usize) -> fmt::Result {
        pad(fmt, indent)?;
        writeln!(fmt, "Program ({} children)", self.items.len())?;
        for item in &self.items {
            match item {
                Item::Function(function) => function.write_tree(fmt, indent + 1)?,
                Item::Statement(statement) => statement.write_tree(fmt, indent + 1)?,
            }
        }
        Ok(())
    }
}

impl Function {
    fn write_tree(&self, fmt: &mut Formatter<'_>, indent: usize) -> fmt::Result {
        pad(fmt, indent)?;
        writeln!(fmt, "Function: {}", self.name)?;
        self.body.write_tree(fmt, indent + 1)
    }
}

impl Block {
    fn write_tree(&self, fmt: &mut Formatter<'_>, indent: usize) -> fmt::Result {
        pad(fmt, indent)?;
        writeln!(fmt, "Block ({} children)", self.statements.len())?;
        for statement in &self.statements {
            statement.write_tree(fmt, indent + 1)?;
        }
        Ok(())
    }
}

impl Statement {
    fn write_tree(&self, fmt: &mut Formatter<'_>, indent: usize) -> fmt::Result {
        match self {
            Statement::Let(let_stmt) => {
                pad(fmt, indent)?;
                write!(fmt, "LetStmt: ")?;
                if let_stmt.mutable {
                    write!(fmt, "mut ")?;
                }
                write!(fmt, "{}", let_stmt.name)?;
                if let Some(ty) = let_stmt.ty {
                    write!(fmt, ": {}", ty)?;
                }
                writeln!(fmt)?;
                if let Some(init) = &let_stmt.init {
                    init.write_tree(fmt, indent + 1)?;
                }
                Ok(())
            }

            Statement::Expr(expr_stmt) => {
                pad(fmt, indent)?;
                writeln!(fmt, "ExprStmt")?;
                expr_stmt.expr.write_tree(fmt, indent + 1)
            }

            Statement::If(if_stmt) => if_stmt.write_tree(fmt, indent),

            Statement::While(while_stmt) => {
                pad(fmt, indent)?;
                writeln!(fmt, "WhileStmt")?;
                pad(fmt, indent + 1)?;
                writeln!(fmt, "Condition:")?;
                while_stmt.condition.write_tree(fmt, indent + 2)?;
                pad(fmt, indent + 1)?;
                writeln!(fmt, "Body:")?;
                while_stmt.body.write_tree(fmt, indent + 2)
            }

            Statement::Return(return_stmt) => {
                pad(fmt, indent)?;
                writeln!(fmt, "ReturnStmt")?;
                if let Some(value) = &return_stmt.value {
                    value.write_tree(fmt, indent + 1)?;
                }
                Ok(())
            }

            Statement::Break { .. } => {
                pad(fmt, indent)?;
                writeln!(fmt, "BreakStmt")
            }

            Statement::Continue { .. } => {
                pad(fmt, indent)?;
                writeln!(fmt, "ContinueStmt")
            }

            Statement::Block(block) => block.write_tree(fmt, indent),
        }
    }
}

impl IfStmt {
    fn write_tree(&self, fmt: &mut Formatter<'_>, indent: usize) -> fmt::Result {
        pad(fmt, indent)?;
        writeln!(fmt, "IfStmt")?;
        pad(fmt, indent + 1)?;
        writeln!(fmt, "Condition:")?;
        self.condition.write_tree(fmt, indent + 2)?;
        pad(fmt, indent + 1)?;
        writeln!(fmt, "Then:")?;
        self.then_branch.write_tree(fmt, indent + 2)?;
        if let Some(else_branch) = &self.else_branch {
            pad(fmt, indent + 1)?;
            writeln!(fmt, "Else:")?;
            match else_branch {
                ElseBranch::If(if_stmt) => if_stmt.write_tree(fmt, indent + 2)?,
                ElseBranch::Block(block) => block.write_tree(fmt, indent + 2)?,
            }
        }
        Ok(())
    }
}

impl Expr {
    fn write_tree(&self, fmt: &mut Formatter<'_>, indent: usize) -> fmt::Result {
        pad(fmt, indent)?;
        match &self.kind {
            ExprKind::Binary { op, left, right } => {
                writeln!(fmt, "BinaryExpr: {}", op)?;
                left.write_tree(fmt, indent + 1)?;
                right.write_tree(fmt, indent + 1)
            }

            ExprKind::Unary { op, operand } => {
                writeln!(fmt, "UnaryExpr: {}", op)?;
                operand.write_tree(fmt, indent + 1)
            }

            ExprKind::Identifier(text) => writeln!(fmt, "Identifier: {}", text),
            ExprKind::Number(text) => writeln!(fmt, "Number: {}", text),
            ExprKind::Str(text) => writeln!(fmt, "String: {}", text),
            ExprKind::Char(text) => writeln!(fmt, "Char: {}", text),
            ExprKind::Bool(text) => writeln!(fmt, "Bool: {}", text),
        }
    }
}

impl Display for Program {
    /// Representación jerárquica indentada del árbol completo.
    fn fmt(&self, fmt: &mut Formatter<'_>) -> fmt::Result {
        self.write_tree(fmt, 0)
    }
}

// ============================================================================
// Emisión de fuente canónica
// ============================================================================

fn indent_line(out: &mut String, indent: usize) {
    for _ in 0..indent {
        out.push_str("    ");
    }
}

impl Program {
    /// Emite fuente canónica que, al volver a analizarse, produce un
    /// árbol isomorfo. Las expresiones compuestas se parentetizan por
    /// completo para que la forma del árbol no dependa de la
    /// precedencia al releer.
    pub fn to_source(&self) -> String {
        let mut out = String::new();
        for item in &self.items {
            match item {
                Item::Function(function) => function.emit(&mut out, 0),
                Item::Statement(statement) => statement.emit(&mut out, 0),
            }
        }
        out
    }
}

impl Function {
    fn emit(&self, out: &mut String, indent: usize) {
        indent_line(out, indent);
        out.push_str("fn ");
        out.push_str(&self.name);
        out.push_str("() ");
        self.body.emit_inline(out, indent);
        out.push('\n');
    }
}

impl Block {
    /// Emite el bloque comenzando en la posición actual de la línea.
    fn emit_inline(&self, out: &mut String, indent: usize) {
        out.push_str("{\n");
        for statement in &self.statements {
            statement.emit(out, indent + 1);
        }
        indent_line(out, indent);
        out.push('}');
    }
}

impl Statement {
    fn emit(&self, out: &mut String, indent: usize) {
        match self {
            Statement::Let(let_stmt) => {
                indent_line(out, indent);
                out.push_str("let ");
                if let_stmt.mutable {
                    out.push_str("mut ");
                }
                out.push_str(&let_stmt.name);
                if let Some(ty) = let_stmt.ty {
                    out.push_str(": ");
                    out.push_str(ty.as_str());
                }
                if let Some(init) = &let_stmt.init {
                    out.push_str(" = ");
                    init.emit(out);
                }
                out.push_str(";\n");
            }

            Statement::Expr(expr_stmt) => {
                indent_line(out, indent);
                expr_stmt.expr.emit(out);
                out.push_str(";\n");
            }

            Statement::If(if_stmt) => {
                indent_line(out, indent);
                if_stmt.emit_inline(out, indent);
                out.push('\n');
            }

            Statement::While(while_stmt) => {
                indent_line(out, indent);
                out.push_str("while ");
                while_stmt.condition.emit(out);
                out.push(' ');
                while_stmt.body.emit_inline(out, indent);
                out.push('\n');
            }

            Statement::Return(return_stmt) => {
                indent_line(out, indent);
                out.push_str("return");
                if let Some(value) = &return_stmt.value {
                    out.push(' ');
                    value.emit(out);
                }
                out.push_str(";\n");
            }

            Statement::Break { .. } => {
                indent_line(out, indent);
                out.push_str("break;\n");
            }

            Statement::Continue { .. } => {
                indent_line(out, indent);
                out.push_str("continue;\n");
            }

            Statement::Block(block) => {
                indent_line(out, indent);
                block.emit_inline(out, indent);
                out.push('\n');
            }
        }
    }
}

impl IfStmt {
    fn emit_inline(&self, out: &mut String, indent: usize) {
        out.push_str("if ");
        self.condition.emit(out);
        out.push(' ');
        self.then_branch.emit_inline(out, indent);
        if let Some(else_branch) = &self.else_branch {
            out.push_str(" else ");
            match else_branch {
                ElseBranch::If(if_stmt) => if_stmt.emit_inline(out, indent),
                ElseBranch::Block(block) => block.emit_inline(out, indent),
            }
        }
    }
}

impl Expr {
    fn emit(&self, out: &mut String) {
        match &self.kind {
            ExprKind::Binary { op, left, right } => {
                out.push('(');
                left.emit(out);
                out.push(' ');
                out.push_str(op.as_str());
                out.push(' ');
                right.emit(out);
                out.push(')');
            }

            ExprKind::Unary { op, operand } => {
                out.push('(');
                out.push_str(op.as_str());
                operand.emit(out);
                out.push(')');
            }

            ExprKind::Identifier(text)
            | ExprKind::Number(text)
            | ExprKind::Str(text)
            | ExprKind::Char(text)
            | ExprKind::Bool(text) => out.push_str(text),
        }
    }
}
