//! Análisis sintáctico.
//!
//! Parser predictivo descendente recursivo, organizado como una cascada
//! de precedencias: asignación, o-lógico, y-lógico, igualdad,
//! comparación, aditivos, multiplicativos, unarios y primarios. La
//! asignación es asociativa a la derecha (recursión por la derecha);
//! los demás niveles binarios son asociativos a la izquierda
//! (iterativos).
//!
//! El parser consume tokens del lexer bajo demanda con un solo token de
//! anticipación. El primer error sintáctico aborta el análisis: se
//! reporta un único diagnóstico con la posición del token ofensor y no
//! se retorna árbol alguno. Las palabras reservadas sin producción
//! (`match`, `loop`, `for`, `in`) provocan un error de sintaxis al
//! aparecer en posición de sentencia.

use thiserror::Error;

use crate::ast::{
    BinaryOp, Block, ElseBranch, Expr, ExprKind, ExprStmt, Function, IfStmt, Item, LetStmt,
    Program, ReturnStmt, Statement, TypeName, UnaryOp, WhileStmt,
};
use crate::lex::{Delimiter, Keyword, Lexer, Operator, Token, TokenKind};
use crate::source::{Located, Position};

/// Error de sintaxis. El texto de cada variante es la familia fija de
/// mensajes que el diagnóstico externo presenta.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParserError {
    #[error("expected ';'")]
    ExpectedSemicolon,

    #[error("expected '('")]
    ExpectedOpenParen,

    #[error("expected ')'")]
    ExpectedCloseParen,

    #[error("expected '{{'")]
    ExpectedOpenCurly,

    #[error("expected '}}'")]
    ExpectedCloseCurly,

    #[error("expected identifier after 'let'")]
    ExpectedIdentifierAfterLet,

    #[error("expected function name")]
    ExpectedFunctionName,

    #[error("expected type name after ':'")]
    ExpectedTypeName,

    #[error("expression expected")]
    ExpressionExpected,
}

/// Contadores del análisis, análogos a los desplazamientos y
/// reducciones de un parser por tablas.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ParserStats {
    /// Expresiones analizadas.
    pub expressions: usize,

    /// Producciones reducidas (funciones, bloques y sentencias
    /// estructuradas).
    pub reductions: usize,
}

type Parse<T> = Result<T, Located<ParserError>>;

/// Analiza el flujo de tokens del lexer dado y construye el programa.
pub fn parse(lexer: Lexer<'_>) -> Parse<Program> {
    Parser::new(lexer).parse()
}

/// Parser descendente recursivo sobre un lexer propio.
pub struct Parser<'src> {
    lexer: Lexer<'src>,
    current: Token,
    stats: ParserStats,
}

impl<'src> Parser<'src> {
    /// Crea un parser y carga el primer token.
    pub fn new(mut lexer: Lexer<'src>) -> Self {
        let current = lexer.next_token();
        Parser {
            lexer,
            current,
            stats: ParserStats::default(),
        }
    }

    /// Ejecuta el análisis completo hasta el fin de la entrada.
    pub fn parse(&mut self) -> Parse<Program> {
        self.program()
    }

    /// Contadores acumulados del análisis.
    pub fn stats(&self) -> ParserStats {
        self.stats
    }

    fn advance(&mut self) {
        // El token anterior se descarta aquí; cada token se consume y
        // libera antes de solicitar el siguiente
        self.current = self.lexer.next_token();
    }

    fn fail<T>(&self, error: ParserError) -> Parse<T> {
        Err(Located::at(error, self.current.position))
    }

    fn at_eof(&self) -> bool {
        self.current.kind == TokenKind::Eof
    }

    fn check_keyword(&self, keyword: Keyword) -> bool {
        self.current.kind == TokenKind::Keyword(keyword)
    }

    fn match_keyword(&mut self, keyword: Keyword) -> bool {
        if self.check_keyword(keyword) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn check_delimiter(&self, delimiter: Delimiter) -> bool {
        self.current.kind == TokenKind::Delimiter(delimiter)
    }

    fn match_delimiter(&mut self, delimiter: Delimiter) -> bool {
        if self.check_delimiter(delimiter) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_delimiter(&mut self, delimiter: Delimiter, error: ParserError) -> Parse<()> {
        if self.match_delimiter(delimiter) {
            Ok(())
        } else {
            self.fail(error)
        }
    }

    /// Operador bajo el token actual, si lo hay.
    fn current_operator(&self) -> Option<Operator> {
        match self.current.kind {
            TokenKind::Operator(operator) => Some(operator),
            _ => None,
        }
    }

    fn match_operator(&mut self, operator: Operator) -> bool {
        if self.current_operator() == Some(operator) {
            self.advance();
            true
        } else {
            false
        }
    }

    // ========================================================================
    // Programa y sentencias
    // ========================================================================

    fn program(&mut self) -> Parse<Program> {
        let mut items = Vec::new();

        while !self.at_eof() {
            let item = if self.check_keyword(Keyword::Fn) {
                Item::Function(self.function()?)
            } else {
                Item::Statement(self.statement()?)
            };
            items.push(item);
        }

        Ok(Program {
            items,
            position: Position::default(),
        })
    }

    fn function(&mut self) -> Parse<Function> {
        let position = self.current.position;
        self.advance(); // fn

        let name = match self.current.kind {
            TokenKind::Identifier => {
                let name = self.current.lexeme.clone();
                self.advance();
                name
            }
            _ => return self.fail(ParserError::ExpectedFunctionName),
        };

        self.expect_delimiter(Delimiter::OpenParen, ParserError::ExpectedOpenParen)?;
        self.expect_delimiter(Delimiter::CloseParen, ParserError::ExpectedCloseParen)?;

        let body = self.block()?;
        self.stats.reductions += 1;

        Ok(Function {
            name,
            body,
            position,
        })
    }

    fn block(&mut self) -> Parse<Block> {
        let position = self.current.position;
        self.expect_delimiter(Delimiter::OpenCurly, ParserError::ExpectedOpenCurly)?;

        let mut statements = Vec::new();
        while !self.check_delimiter(Delimiter::CloseCurly) && !self.at_eof() {
            statements.push(self.statement()?);
        }

        self.expect_delimiter(Delimiter::CloseCurly, ParserError::ExpectedCloseCurly)?;
        self.stats.reductions += 1;

        Ok(Block {
            statements,
            position,
        })
    }

    fn statement(&mut self) -> Parse<Statement> {
        if self.check_keyword(Keyword::Let) {
            let statement = self.let_statement()?;
            self.expect_delimiter(Delimiter::Semicolon, ParserError::ExpectedSemicolon)?;
            return Ok(Statement::Let(statement));
        }

        if self.check_keyword(Keyword::If) {
            return Ok(Statement::If(self.if_statement()?));
        }

        if self.check_keyword(Keyword::While) {
            return Ok(Statement::While(self.while_statement()?));
        }

        if self.check_keyword(Keyword::Return) {
            let statement = self.return_statement()?;
            self.expect_delimiter(Delimiter::Semicolon, ParserError::ExpectedSemicolon)?;
            return Ok(Statement::Return(statement));
        }

        if self.check_keyword(Keyword::Break) {
            let position = self.current.position;
            self.advance();
            self.expect_delimiter(Delimiter::Semicolon, ParserError::ExpectedSemicolon)?;
            return Ok(Statement::Break { position });
        }

        if self.check_keyword(Keyword::Continue) {
            let position = self.current.position;
            self.advance();
            self.expect_delimiter(Delimiter::Semicolon, ParserError::ExpectedSemicolon)?;
            return Ok(Statement::Continue { position });
        }

        if self.check_delimiter(Delimiter::OpenCurly) {
            return Ok(Statement::Block(self.block()?));
        }

        // Expresión en posición de sentencia
        let expr = self.expression()?;
        self.expect_delimiter(Delimiter::Semicolon, ParserError::ExpectedSemicolon)?;

        Ok(Statement::Expr(ExprStmt {
            position: expr.position,
            expr,
        }))
    }

    fn let_statement(&mut self) -> Parse<LetStmt> {
        let position = self.current.position;
        self.advance(); // let

        let mutable = self.match_keyword(Keyword::Mut);

        let name = match self.current.kind {
            TokenKind::Identifier => {
                let name = self.current.lexeme.clone();
                self.advance();
                name
            }
            _ => return self.fail(ParserError::ExpectedIdentifierAfterLet),
        };

        let ty = if self.match_delimiter(Delimiter::Colon) {
            Some(self.type_name()?)
        } else {
            None
        };

        let init = if self.match_operator(Operator::Assign) {
            Some(self.expression()?)
        } else {
            None
        };

        self.stats.reductions += 1;

        Ok(LetStmt {
            name,
            mutable,
            ty,
            init,
            position,
        })
    }

    fn type_name(&mut self) -> Parse<TypeName> {
        let ty = match self.current.kind {
            TokenKind::Keyword(Keyword::I32) => TypeName::I32,
            TokenKind::Keyword(Keyword::F64) => TypeName::F64,
            TokenKind::Keyword(Keyword::Bool) => TypeName::Bool,
            TokenKind::Keyword(Keyword::Char) => TypeName::Char,
            _ => return self.fail(ParserError::ExpectedTypeName),
        };

        self.advance();
        Ok(ty)
    }

    fn if_statement(&mut self) -> Parse<IfStmt> {
        let position = self.current.position;
        self.advance(); // if

        let condition = self.expression()?;
        let then_branch = self.block()?;

        let else_branch = if self.match_keyword(Keyword::Else) {
            if self.check_keyword(Keyword::If) {
                Some(ElseBranch::If(Box::new(self.if_statement()?)))
            } else {
                Some(ElseBranch::Block(self.block()?))
            }
        } else {
            None
        };

        self.stats.reductions += 1;

        Ok(IfStmt {
            condition,
            then_branch,
            else_branch,
            position,
        })
    }

    fn while_statement(&mut self) -> Parse<WhileStmt> {
        let position = self.current.position;
        self.advance(); // while

        let condition = self.expression()?;
        let body = self.block()?;
        self.stats.reductions += 1;

        Ok(WhileStmt {
            condition,
            body,
            position,
        })
    }

    fn return_statement(&mut self) -> Parse<ReturnStmt> {
        let position = self.current.position;
        self.advance(); // return

        let value = if self.check_delimiter(Delimiter::Semicolon) {
            None
        } else {
            Some(self.expression()?)
        };

        self.stats.reductions += 1;
        Ok(ReturnStmt { value, position })
    }

    // ========================================================================
    // Cascada de expresiones
    // ========================================================================

    fn expression(&mut self) -> Parse<Expr> {
        self.stats.expressions += 1;
        self.assignment()
    }

    /// La asignación recursa por la derecha: `a = b = c` se agrupa
    /// como `a = (b = c)`.
    fn assignment(&mut self) -> Parse<Expr> {
        let left = self.logical_or()?;

        let op = match self.current_operator() {
            Some(Operator::Assign) => BinaryOp::Assign,
            Some(Operator::PlusAssign) => BinaryOp::AddAssign,
            Some(Operator::MinusAssign) => BinaryOp::SubAssign,
            Some(Operator::TimesAssign) => BinaryOp::MulAssign,
            Some(Operator::SlashAssign) => BinaryOp::DivAssign,
            Some(Operator::PercentAssign) => BinaryOp::ModAssign,
            _ => return Ok(left),
        };

        let position = self.current.position;
        self.advance();
        let right = self.assignment()?;

        Ok(Expr {
            kind: ExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            position,
        })
    }

    fn logical_or(&mut self) -> Parse<Expr> {
        let mut left = self.logical_and()?;

        while self.current_operator() == Some(Operator::OrOr) {
            let position = self.current.position;
            self.advance();
            let right = self.logical_and()?;
            left = Expr {
                kind: ExprKind::Binary {
                    op: BinaryOp::Or,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                position,
            };
        }

        Ok(left)
    }

    fn logical_and(&mut self) -> Parse<Expr> {
        let mut left = self.equality()?;

        while self.current_operator() == Some(Operator::AndAnd) {
            let position = self.current.position;
            self.advance();
            let right = self.equality()?;
            left = Expr {
                kind: ExprKind::Binary {
                    op: BinaryOp::And,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                position,
            };
        }

        Ok(left)
    }

    fn equality(&mut self) -> Parse<Expr> {
        let mut left = self.comparison()?;

        loop {
            let op = match self.current_operator() {
                Some(Operator::Equals) => BinaryOp::Eq,
                Some(Operator::NotEquals) => BinaryOp::Neq,
                _ => break,
            };

            let position = self.current.position;
            self.advance();
            let right = self.comparison()?;
            left = Expr {
                kind: ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                position,
            };
        }

        Ok(left)
    }

    fn comparison(&mut self) -> Parse<Expr> {
        let mut left = self.term()?;

        loop {
            let op = match self.current_operator() {
                Some(Operator::Less) => BinaryOp::Lt,
                Some(Operator::LessEq) => BinaryOp::Le,
                Some(Operator::Greater) => BinaryOp::Gt,
                Some(Operator::GreaterEq) => BinaryOp::Ge,
                _ => break,
            };

            let position = self.current.position;
            self.advance();
            let right = self.term()?;
            left = Expr {
                kind: ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                position,
            };
        }

        Ok(left)
    }

    fn term(&mut self) -> Parse<Expr> {
        let mut left = self.factor()?;

        loop {
            let op = match self.current_operator() {
                Some(Operator::Plus) => BinaryOp::Add,
                Some(Operator::Minus) => BinaryOp::Sub,
                _ => break,
            };

            let position = self.current.position;
            self.advance();
            let right = self.factor()?;
            left = Expr {
                kind: ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                position,
            };
        }

        Ok(left)
    }

    fn factor(&mut self) -> Parse<Expr> {
        let mut left = self.unary()?;

        loop {
            let op = match self.current_operator() {
                Some(Operator::Times) => BinaryOp::Mul,
                Some(Operator::Slash) => BinaryOp::Div,
                Some(Operator::Percent) => BinaryOp::Mod,
                _ => break,
            };

            let position = self.current.position;
            self.advance();
            let right = self.unary()?;
            left = Expr {
                kind: ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                position,
            };
        }

        Ok(left)
    }

    /// Los prefijos unarios recursan por la derecha: `!!a`, `--a` no
    /// existe como token aquí porque `--` se lexea como decremento.
    fn unary(&mut self) -> Parse<Expr> {
        let op = match self.current_operator() {
            Some(Operator::Bang) => Some(UnaryOp::Not),
            Some(Operator::Minus) => Some(UnaryOp::Neg),
            Some(Operator::Plus) => Some(UnaryOp::Plus),
            _ => None,
        };

        if let Some(op) = op {
            let position = self.current.position;
            self.advance();
            let operand = self.unary()?;
            return Ok(Expr {
                kind: ExprKind::Unary {
                    op,
                    operand: Box::new(operand),
                },
                position,
            });
        }

        self.primary()
    }

    fn primary(&mut self) -> Parse<Expr> {
        let position = self.current.position;

        let kind = match &self.current.kind {
            TokenKind::Number => ExprKind::Number(self.current.lexeme.clone()),
            TokenKind::Str => ExprKind::Str(self.current.lexeme.clone()),
            TokenKind::Char => ExprKind::Char(self.current.lexeme.clone()),
            TokenKind::Identifier => ExprKind::Identifier(self.current.lexeme.clone()),

            TokenKind::Keyword(Keyword::True) | TokenKind::Keyword(Keyword::False) => {
                ExprKind::Bool(self.current.lexeme.clone())
            }

            TokenKind::Delimiter(Delimiter::OpenParen) => {
                self.advance();
                let expr = self.expression()?;
                self.expect_delimiter(Delimiter::CloseParen, ParserError::ExpectedCloseParen)?;
                // La agrupación no produce nodo propio
                return Ok(expr);
            }

            _ => return self.fail(ParserError::ExpressionExpected),
        };

        self.advance();
        Ok(Expr { kind, position })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_source(source: &str) -> Parse<Program> {
        parse(Lexer::new(source))
    }

    fn parse_expression(source: &str) -> Expr {
        let program = parse_source(&format!("{};", source)).expect("fuente inválida");
        match program.items.into_iter().next() {
            Some(Item::Statement(Statement::Expr(expr_stmt))) => expr_stmt.expr,
            other => panic!("se esperaba una expresión, no {:?}", other),
        }
    }

    fn binary_parts(expr: Expr) -> (BinaryOp, Expr, Expr) {
        match expr.kind {
            ExprKind::Binary { op, left, right } => (op, *left, *right),
            other => panic!("se esperaba expresión binaria, no {:?}", other),
        }
    }

    #[test]
    fn spec_scenario_function_with_let() {
        let program = parse_source("fn main() { let x: i32 = 42; }").unwrap();
        assert_eq!(program.items.len(), 1);

        let function = match &program.items[0] {
            Item::Function(function) => function,
            other => panic!("se esperaba función, no {:?}", other),
        };

        assert_eq!(function.name, "main");
        assert_eq!(function.position, Position::new(1, 1));
        assert_eq!(function.body.statements.len(), 1);

        let let_stmt = match &function.body.statements[0] {
            Statement::Let(let_stmt) => let_stmt,
            other => panic!("se esperaba let, no {:?}", other),
        };

        assert_eq!(let_stmt.name, "x");
        assert!(!let_stmt.mutable);
        assert_eq!(let_stmt.ty, Some(TypeName::I32));
        assert_eq!(
            let_stmt.init.as_ref().map(|e| &e.kind),
            Some(&ExprKind::Number("42".into()))
        );
    }

    #[test]
    fn spec_scenario_hex_and_bin_initializer() {
        let program = parse_source("let y = 0xFF + 0b10;").unwrap();
        let let_stmt = match &program.items[0] {
            Item::Statement(Statement::Let(let_stmt)) => let_stmt,
            other => panic!("se esperaba let, no {:?}", other),
        };

        match let_stmt.init.as_ref().map(|e| &e.kind) {
            Some(ExprKind::Binary { op, left, right }) => {
                assert_eq!(*op, BinaryOp::Add);
                assert_eq!(left.kind, ExprKind::Number("0xFF".into()));
                assert_eq!(right.kind, ExprKind::Number("0b10".into()));
            }
            other => panic!("se esperaba suma, no {:?}", other),
        }
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let (op, left, right) = binary_parts(parse_expression("a + b * c"));
        assert_eq!(op, BinaryOp::Add);
        assert_eq!(left.kind, ExprKind::Identifier("a".into()));

        let (op, left, right) = binary_parts(right);
        assert_eq!(op, BinaryOp::Mul);
        assert_eq!(left.kind, ExprKind::Identifier("b".into()));
        assert_eq!(right.kind, ExprKind::Identifier("c".into()));
    }

    #[test]
    fn and_binds_tighter_than_or() {
        let (op, left, right) = binary_parts(parse_expression("a || b && c"));
        assert_eq!(op, BinaryOp::Or);
        assert_eq!(left.kind, ExprKind::Identifier("a".into()));

        let (op, _, _) = binary_parts(right);
        assert_eq!(op, BinaryOp::And);
    }

    #[test]
    fn additive_operators_are_left_associative() {
        let (op, left, right) = binary_parts(parse_expression("a - b - c"));
        assert_eq!(op, BinaryOp::Sub);
        assert_eq!(right.kind, ExprKind::Identifier("c".into()));

        let (op, left, right) = binary_parts(left);
        assert_eq!(op, BinaryOp::Sub);
        assert_eq!(left.kind, ExprKind::Identifier("a".into()));
        assert_eq!(right.kind, ExprKind::Identifier("b".into()));
    }

    #[test]
    fn assignment_is_right_associative() {
        let (op, left, right) = binary_parts(parse_expression("a = b = c"));
        assert_eq!(op, BinaryOp::Assign);
        assert_eq!(left.kind, ExprKind::Identifier("a".into()));

        let (op, left, right) = binary_parts(right);
        assert_eq!(op, BinaryOp::Assign);
        assert_eq!(left.kind, ExprKind::Identifier("b".into()));
        assert_eq!(right.kind, ExprKind::Identifier("c".into()));
    }

    #[test]
    fn compound_assignment_operators() {
        for &(source, expected) in [
            ("a += b", BinaryOp::AddAssign),
            ("a -= b", BinaryOp::SubAssign),
            ("a *= b", BinaryOp::MulAssign),
            ("a /= b", BinaryOp::DivAssign),
            ("a %= b", BinaryOp::ModAssign),
        ]
        .iter()
        {
            let (op, _, _) = binary_parts(parse_expression(source));
            assert_eq!(op, expected);
        }
    }

    #[test]
    fn unary_prefix_binds_tighter_than_binary() {
        let (op, left, _) = binary_parts(parse_expression("-a * b"));
        assert_eq!(op, BinaryOp::Mul);
        match left.kind {
            ExprKind::Unary { op, operand } => {
                assert_eq!(op, UnaryOp::Neg);
                assert_eq!(operand.kind, ExprKind::Identifier("a".into()));
            }
            other => panic!("se esperaba negación, no {:?}", other),
        }
    }

    #[test]
    fn unary_operators_nest_to_the_right() {
        let expr = parse_expression("!!x");
        match expr.kind {
            ExprKind::Unary { op, operand } => {
                assert_eq!(op, UnaryOp::Not);
                assert!(matches!(operand.kind, ExprKind::Unary { op: UnaryOp::Not, .. }));
            }
            other => panic!("se esperaba negación lógica, no {:?}", other),
        }
    }

    #[test]
    fn grouping_produces_no_node() {
        let (op, left, right) = binary_parts(parse_expression("(a + b) * c"));
        assert_eq!(op, BinaryOp::Mul);
        assert!(matches!(left.kind, ExprKind::Binary { op: BinaryOp::Add, .. }));
        assert_eq!(right.kind, ExprKind::Identifier("c".into()));
    }

    #[test]
    fn binary_node_position_is_the_operator() {
        let expr = parse_expression("a + b");
        assert_eq!(expr.position, Position::new(1, 3));
    }

    #[test]
    fn else_if_chain_nests_in_else_branch() {
        let source = "if x < 10 { a = 1; } else if x < 20 { a = 2; } else { a = 3; }";
        let program = parse_source(source).unwrap();

        let if_stmt = match &program.items[0] {
            Item::Statement(Statement::If(if_stmt)) => if_stmt,
            other => panic!("se esperaba if, no {:?}", other),
        };

        let nested = match if_stmt.else_branch.as_ref() {
            Some(ElseBranch::If(nested)) => nested,
            other => panic!("se esperaba else-if, no {:?}", other),
        };

        assert!(matches!(nested.else_branch, Some(ElseBranch::Block(_))));
    }

    #[test]
    fn all_statement_forms_parse() {
        let source = "\
            let mut acc: f64 = 0.5;\n\
            while acc < 10 {\n\
                acc += 1;\n\
                if acc == 5 { continue; }\n\
                { acc = acc * 2; }\n\
            }\n\
            fn helper() { return 1 + 2; }\n\
            fn nothing() { return; }\n\
            loop_count;\n";
        let program = parse_source(source).unwrap();
        assert_eq!(program.items.len(), 5);
    }

    #[test]
    fn break_and_continue_require_semicolon() {
        assert!(parse_source("while x { break; }").is_ok());

        let error = parse_source("while x { break }").unwrap_err();
        assert_eq!(*error.val(), ParserError::ExpectedSemicolon);
    }

    #[test]
    fn spec_scenario_error_position() {
        let error = parse_source("a + * b").unwrap_err();
        assert_eq!(*error.val(), ParserError::ExpressionExpected);
        assert_eq!(error.position(), Position::new(1, 5));
    }

    #[test]
    fn missing_semicolon_is_fatal() {
        let error = parse_source("a + b").unwrap_err();
        assert_eq!(*error.val(), ParserError::ExpectedSemicolon);
        assert_eq!(error.position(), Position::new(1, 6));
    }

    #[test]
    fn error_families_and_positions() {
        let cases: &[(&str, ParserError)] = &[
            ("fn () {}", ParserError::ExpectedFunctionName),
            ("fn f {}", ParserError::ExpectedOpenParen),
            ("fn f( {}", ParserError::ExpectedCloseParen),
            ("fn f() 1;", ParserError::ExpectedOpenCurly),
            ("{ a;", ParserError::ExpectedCloseCurly),
            ("let 5 = 1;", ParserError::ExpectedIdentifierAfterLet),
            ("let x: y = 1;", ParserError::ExpectedTypeName),
            ("(a;", ParserError::ExpectedCloseParen),
            ("if { }", ParserError::ExpressionExpected),
        ];

        for (source, expected) in cases {
            let error = parse_source(*source).unwrap_err();
            assert_eq!(error.val(), expected, "fuente {:?}", source);
        }
    }

    #[test]
    fn error_messages_are_stable() {
        assert_eq!(ParserError::ExpectedSemicolon.to_string(), "expected ';'");
        assert_eq!(ParserError::ExpectedOpenCurly.to_string(), "expected '{'");
        assert_eq!(
            ParserError::ExpressionExpected.to_string(),
            "expression expected"
        );
    }

    #[test]
    fn reserved_words_error_in_statement_position() {
        for &source in ["match x { };", "loop { };", "for i in xs { };", "in;"].iter() {
            let error = parse_source(source).unwrap_err();
            assert_eq!(
                *error.val(),
                ParserError::ExpressionExpected,
                "fuente {:?}",
                source
            );
            assert_eq!(error.position(), Position::new(1, 1));
        }
    }

    #[test]
    fn error_determinism() {
        let first = parse_source("fn f() { let = 1; }").unwrap_err();
        let second = parse_source("fn f() { let = 1; }").unwrap_err();
        assert_eq!(first, second);
    }

    #[test]
    fn round_trip_through_canonical_source() {
        let source = "\
            fn main() {\n\
                let mut x: i32 = 0xFF;\n\
                let name = \"mundo\";\n\
                let initial = 'm';\n\
                if x < 10 { x += 1; } else if x < 20 { x -= 1; } else { x = 0; }\n\
                while true && !done {\n\
                    x = -x + +y * 3 % 2;\n\
                    if x == 0 { break; } else { continue; }\n\
                }\n\
                return x;\n\
            }\n\
            let top = 1.5e+3;\n";

        let first = parse_source(source).unwrap();
        let canonical = first.to_source();
        let second = parse_source(&canonical).unwrap();

        // Las posiciones difieren; la forma del árbol debe coincidir
        let reprinted = second.to_source();
        assert_eq!(canonical, reprinted);
    }

    #[test]
    fn stats_count_expressions_and_reductions() {
        let mut parser = Parser::new(Lexer::new("fn f() { let x = 1 + 2; }"));
        parser.parse().unwrap();

        let stats = parser.stats();
        assert_eq!(stats.expressions, 1);
        // función, bloque y let
        assert_eq!(stats.reductions, 3);
    }

    #[test]
    fn empty_input_is_an_empty_program() {
        let program = parse_source("").unwrap();
        assert!(program.items.is_empty());

        let program = parse_source("// solo comentarios\n/* y nada más */").unwrap();
        assert!(program.items.is_empty());
    }
}
