use std::collections::HashMap;
use std::rc::Rc;
use lazy_static::lazy_static;
use crate::interpreter::ast::{BlockStatement, Expression, Identifier, InfixOperator, PrefixOperator, Program, Statement};
use crate::interpreter::lexer::{Lexer, Token, TokenPos, TokenType};
use crate::util;


/// Binding strength of infix operators, weakest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
}

lazy_static! {
    static ref PRECEDENCES: HashMap<TokenType, Precedence> = HashMap::from([
        (TokenType::Equal, Precedence::Equals),
        (TokenType::NotEqual, Precedence::Equals),
        (TokenType::Less, Precedence::LessGreater),
        (TokenType::LessEqual, Precedence::LessGreater),
        (TokenType::Greater, Precedence::LessGreater),
        (TokenType::GreaterEqual, Precedence::LessGreater),
        (TokenType::Plus, Precedence::Sum),
        (TokenType::Minus, Precedence::Sum),
        (TokenType::Multiply, Precedence::Product),
        (TokenType::Divide, Precedence::Product),
        (TokenType::ParenthesisLeft, Precedence::Call),
    ]);
}

fn precedence_of(token_type: TokenType) -> Precedence {
    PRECEDENCES.get(&token_type).copied().unwrap_or(Precedence::Lowest)
}

type PrefixRule<'source> = fn(&mut Parser<'source>) -> Option<Expression>;
type InfixRule<'source> = fn(&mut Parser<'source>, Expression) -> Option<Expression>;

/// Parses a whole source text, returning the (possibly partial) program and every error found.
pub fn parse(source: &str) -> (Program, Vec<String>) {
    let mut parser = Parser::new(Lexer::new(source));
    let program = parser.parse_program();

    (program, parser.into_errors())
}

pub struct Parser<'source> {
    lexer: Lexer<'source>,
    current: Token, peek: Token,

    errors: Vec<String>,
}

impl<'source> Parser<'source> {
    pub fn new(lexer: Lexer<'source>) -> Parser<'source> {
        let mut parser = Parser {
            lexer,
            current: Token::eof(), peek: Token::eof(),
            errors: Vec::new(),
        };

        // Fill both `current` and `peek`
        parser.advance();
        parser.advance();
        parser
    }

    pub fn had_error(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }

    // Statement parsing

    /// Parses statements until the end of input. A statement that fails to parse is dropped
    /// and parsing resumes with the following token.
    pub fn parse_program(&mut self) -> Program {
        let mut program = Program::default();

        while !self.current_is(TokenType::Eof) {
            if let Some(stmt) = self.parse_statement() {
                program.statements.push(stmt);
            }

            self.advance();
        }

        tracing::debug!(statements = program.statements.len(), errors = self.errors.len(), "parsed program");
        program
    }

    fn parse_statement(&mut self) -> Option<Statement> {
        match self.current.token_type() {
            TokenType::Let => self.parse_let_statement(),
            TokenType::Return => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_let_statement(&mut self) -> Option<Statement> {
        self.expect_peek(TokenType::Identifier)?;
        let name = Identifier::new(self.current.literal());

        self.expect_peek(TokenType::Assign)?;
        self.advance();

        let value = self.parse_expression(Precedence::Lowest)?;
        self.skip_semicolon();

        Some(Statement::Let { name, value })
    }

    fn parse_return_statement(&mut self) -> Option<Statement> {
        self.advance();

        let value = self.parse_expression(Precedence::Lowest)?;
        self.skip_semicolon();

        Some(Statement::Return { value })
    }

    fn parse_expression_statement(&mut self) -> Option<Statement> {
        let expr = self.parse_expression(Precedence::Lowest)?;
        self.skip_semicolon();

        Some(Statement::Expression(expr))
    }

    /// Expects `current` to be the opening `{`; stops on the closing `}` or at end of input.
    fn parse_block_statement(&mut self) -> BlockStatement {
        let mut block = BlockStatement::default();
        self.advance();

        while !self.current_is(TokenType::BracketRight) && !self.current_is(TokenType::Eof) {
            if let Some(stmt) = self.parse_statement() {
                block.statements.push(stmt);
            }

            self.advance();
        }

        block
    }

    // Expression parsing

    fn prefix_rule(token_type: TokenType) -> Option<PrefixRule<'source>> {
        let rule: PrefixRule<'source> = match token_type {
            TokenType::Identifier => Self::parse_identifier,
            TokenType::Int => Self::parse_integer_literal,
            TokenType::True | TokenType::False => Self::parse_boolean_literal,
            TokenType::String => Self::parse_string_literal,
            TokenType::Not | TokenType::Minus => Self::parse_prefix_expression,
            TokenType::ParenthesisLeft => Self::parse_grouped_expression,
            TokenType::SquareBracketLeft => Self::parse_array_literal,
            TokenType::If => Self::parse_if_expression,
            TokenType::Function => Self::parse_function_literal,
            _ => return None,
        };

        Some(rule)
    }

    fn infix_rule(token_type: TokenType) -> Option<InfixRule<'source>> {
        let rule: InfixRule<'source> = match token_type {
            TokenType::Plus | TokenType::Minus
            | TokenType::Multiply | TokenType::Divide
            | TokenType::Equal | TokenType::NotEqual
            | TokenType::Less | TokenType::LessEqual
            | TokenType::Greater | TokenType::GreaterEqual => Self::parse_infix_expression,
            TokenType::ParenthesisLeft => Self::parse_call_expression,
            _ => return None,
        };

        Some(rule)
    }

    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expression> {
        util::ensure_sufficient_stack(|| {
            let prefix = match Self::prefix_rule(self.current.token_type()) {
                Some(rule) => rule,
                None => {
                    let message = format!("no prefix parse function for {} found", self.current.token_type());
                    self.error_at_current(message);
                    return None;
                },
            };

            let mut left = prefix(self)?;

            while !self.peek_is(TokenType::Semicolon) && precedence < self.peek_precedence() {
                let infix = match Self::infix_rule(self.peek.token_type()) {
                    Some(rule) => rule,
                    None => return Some(left),
                };

                self.advance();
                left = infix(self, left)?;
            }

            Some(left)
        })
    }

    fn parse_identifier(&mut self) -> Option<Expression> {
        Some(Expression::Identifier(Identifier::new(self.current.literal())))
    }

    fn parse_integer_literal(&mut self) -> Option<Expression> {
        match self.current.literal().parse::<i64>() {
            Ok(value) => Some(Expression::Integer(value)),
            Err(_) => {
                let message = format!("could not parse \"{}\" as an integer", self.current.literal());
                self.error_at_current(message);
                None
            },
        }
    }

    fn parse_boolean_literal(&mut self) -> Option<Expression> {
        Some(Expression::Boolean(self.current_is(TokenType::True)))
    }

    fn parse_string_literal(&mut self) -> Option<Expression> {
        Some(Expression::String(self.current.literal().to_owned()))
    }

    fn parse_prefix_expression(&mut self) -> Option<Expression> {
        let operator = PrefixOperator::from_token_type(self.current.token_type())?;
        self.advance();

        let right = self.parse_expression(Precedence::Prefix)?;
        Some(Expression::Prefix { operator, right: Box::new(right) })
    }

    fn parse_infix_expression(&mut self, left: Expression) -> Option<Expression> {
        let operator = InfixOperator::from_token_type(self.current.token_type())?;
        let precedence = self.current_precedence();
        self.advance();

        // Same precedence on the right makes chains left-associative
        let right = self.parse_expression(precedence)?;
        Some(Expression::Infix { left: Box::new(left), operator, right: Box::new(right) })
    }

    fn parse_grouped_expression(&mut self) -> Option<Expression> {
        self.advance();

        let expr = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenType::ParenthesisRight)?;

        Some(expr)
    }

    fn parse_array_literal(&mut self) -> Option<Expression> {
        let elements = self.parse_expression_list(TokenType::SquareBracketRight)?;
        Some(Expression::Array(elements))
    }

    fn parse_if_expression(&mut self) -> Option<Expression> {
        self.expect_peek(TokenType::ParenthesisLeft)?;
        self.advance();

        let condition = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenType::ParenthesisRight)?;
        self.expect_peek(TokenType::BracketLeft)?;

        let consequence = self.parse_block_statement();

        let alternative = if self.peek_is(TokenType::Else) {
            self.advance();
            self.expect_peek(TokenType::BracketLeft)?;

            Some(self.parse_block_statement())
        } else {
            None
        };

        Some(Expression::If { condition: Box::new(condition), consequence, alternative })
    }

    fn parse_function_literal(&mut self) -> Option<Expression> {
        self.expect_peek(TokenType::ParenthesisLeft)?;
        let parameters = self.parse_function_parameters()?;

        self.expect_peek(TokenType::BracketLeft)?;
        let body = self.parse_block_statement();

        Some(Expression::Function { parameters, body: Rc::new(body) })
    }

    fn parse_function_parameters(&mut self) -> Option<Vec<Identifier>> {
        let mut parameters = vec![];

        if self.peek_is(TokenType::ParenthesisRight) {
            self.advance();
            return Some(parameters);
        }

        self.expect_peek(TokenType::Identifier)?;
        parameters.push(Identifier::new(self.current.literal()));

        while self.peek_is(TokenType::Comma) {
            self.advance();
            self.expect_peek(TokenType::Identifier)?;
            parameters.push(Identifier::new(self.current.literal()));
        }

        self.expect_peek(TokenType::ParenthesisRight)?;
        Some(parameters)
    }

    fn parse_call_expression(&mut self, callee: Expression) -> Option<Expression> {
        let arguments = self.parse_expression_list(TokenType::ParenthesisRight)?;
        Some(Expression::Call { callee: Box::new(callee), arguments })
    }

    /// Parses comma-separated expressions after the opening delimiter in `current`, up to `end`.
    fn parse_expression_list(&mut self, end: TokenType) -> Option<Vec<Expression>> {
        let mut list = vec![];

        if self.peek_is(end) {
            self.advance();
            return Some(list);
        }

        self.advance();
        list.push(self.parse_expression(Precedence::Lowest)?);

        while self.peek_is(TokenType::Comma) {
            self.advance();
            self.advance();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }

        self.expect_peek(end)?;
        Some(list)
    }

    // Token handling

    fn advance(&mut self) {
        self.current = std::mem::replace(&mut self.peek, self.lexer.next_token());
    }

    /// Advances only if the next token has the given type; records an error otherwise.
    fn expect_peek(&mut self, token_type: TokenType) -> Option<()> {
        if self.peek_is(token_type) {
            self.advance();
            return Some(());
        }

        let message = format!("expected next token to be {}, got {} instead", token_type, self.peek.token_type());
        let pos = *self.peek.start();
        self.error(pos, message);
        None
    }

    fn skip_semicolon(&mut self) {
        if self.peek_is(TokenType::Semicolon) {
            self.advance();
        }
    }

    #[inline]
    fn current_is(&self, token_type: TokenType) -> bool {
        self.current.token_type() == token_type
    }

    #[inline]
    fn peek_is(&self, token_type: TokenType) -> bool {
        self.peek.token_type() == token_type
    }

    fn current_precedence(&self) -> Precedence {
        precedence_of(self.current.token_type())
    }

    fn peek_precedence(&self) -> Precedence {
        precedence_of(self.peek.token_type())
    }

    // Error handling

    fn error_at_current(&mut self, message: String) {
        let pos = *self.current.start();
        self.error(pos, message);
    }

    fn error(&mut self, pos: TokenPos, message: String) {
        tracing::debug!(line = pos.line, column = pos.column, "parse error: {}", message);
        self.errors.push(message);
    }
}
