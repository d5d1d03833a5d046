use std::fmt::{Display, Formatter};
use std::rc::Rc;
use crate::interpreter::lexer::TokenType;
use crate::util::{self, join};


/// The root of a parsed source text: its top-level statements in order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Display for Program {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.statements.iter().try_for_each(|stmt| write!(f, "{}", stmt))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    Let {
        name: Identifier,
        value: Expression,
    },
    Return {
        value: Expression,
    },
    Expression(Expression),
    Block(BlockStatement),
}

impl Display for Statement {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Statement::Let { name, value } => write!(f, "let {} = {};", name, value),
            Statement::Return { value } => write!(f, "return {};", value),
            Statement::Expression(expr) => write!(f, "{}", expr),
            Statement::Block(block) => write!(f, "{}", block),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BlockStatement {
    pub statements: Vec<Statement>,
}

impl Display for BlockStatement {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.statements.iter().try_for_each(|stmt| write!(f, "{}", stmt))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identifier {
    pub name: String,
}

impl Identifier {
    pub fn new(name: impl Into<String>) -> Identifier {
        Identifier { name: name.into() }
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrefixOperator {
    Not,
    Negate,
}

impl PrefixOperator {
    pub fn from_token_type(token_type: TokenType) -> Option<PrefixOperator> {
        match token_type {
            TokenType::Not => Some(PrefixOperator::Not),
            TokenType::Minus => Some(PrefixOperator::Negate),
            _ => None,
        }
    }
}

impl Display for PrefixOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PrefixOperator::Not => f.write_str("!"),
            PrefixOperator::Negate => f.write_str("-"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InfixOperator {
    Plus, Minus, Multiply, Divide,
    Equal, NotEqual,
    Less, LessEqual,
    Greater, GreaterEqual,
}

impl InfixOperator {
    pub fn from_token_type(token_type: TokenType) -> Option<InfixOperator> {
        match token_type {
            TokenType::Plus => Some(InfixOperator::Plus),
            TokenType::Minus => Some(InfixOperator::Minus),
            TokenType::Multiply => Some(InfixOperator::Multiply),
            TokenType::Divide => Some(InfixOperator::Divide),
            TokenType::Equal => Some(InfixOperator::Equal),
            TokenType::NotEqual => Some(InfixOperator::NotEqual),
            TokenType::Less => Some(InfixOperator::Less),
            TokenType::LessEqual => Some(InfixOperator::LessEqual),
            TokenType::Greater => Some(InfixOperator::Greater),
            TokenType::GreaterEqual => Some(InfixOperator::GreaterEqual),
            _ => None,
        }
    }
}

impl Display for InfixOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            InfixOperator::Plus => "+",
            InfixOperator::Minus => "-",
            InfixOperator::Multiply => "*",
            InfixOperator::Divide => "/",
            InfixOperator::Equal => "==",
            InfixOperator::NotEqual => "!=",
            InfixOperator::Less => "<",
            InfixOperator::LessEqual => "<=",
            InfixOperator::Greater => ">",
            InfixOperator::GreaterEqual => ">=",
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    Identifier(Identifier),
    Integer(i64),
    Boolean(bool),
    String(String),
    Array(Vec<Expression>),

    Prefix {
        operator: PrefixOperator,
        right: Box<Expression>,
    },
    Infix {
        left: Box<Expression>,
        operator: InfixOperator,
        right: Box<Expression>,
    },
    If {
        condition: Box<Expression>,
        consequence: BlockStatement,
        alternative: Option<BlockStatement>,
    },
    /// The body is shared with every function value created from this literal.
    Function {
        parameters: Vec<Identifier>,
        body: Rc<BlockStatement>,
    },
    Call {
        callee: Box<Expression>,
        arguments: Vec<Expression>,
    },
}

impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        util::ensure_sufficient_stack(|| match self {
            Expression::Identifier(identifier) => write!(f, "{}", identifier),
            Expression::Integer(value) => write!(f, "{}", value),
            Expression::Boolean(value) => write!(f, "{}", value),
            Expression::String(value) => write!(f, "\"{}\"", value),
            Expression::Array(elements) => write!(f, "[{}]", join(elements, ", ")),
            Expression::Prefix { operator, right } => write!(f, "({}{})", operator, right),
            Expression::Infix { left, operator, right } => write!(f, "({} {} {})", left, operator, right),
            Expression::If { condition, consequence, alternative } => {
                write!(f, "if{} {}", condition, consequence)?;

                if let Some(alternative) = alternative {
                    write!(f, "else {}", alternative)?;
                }

                Ok(())
            },
            Expression::Function { parameters, body } =>
                write!(f, "fn({}) {}", join(parameters, ", "), body),
            Expression::Call { callee, arguments } =>
                write!(f, "{}({})", callee, join(arguments, ", ")),
        })
    }
}

// Nested expressions are torn down from a worklist, so dropping a deep tree uses constant stack
impl Drop for Expression {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.take_children(&mut pending);

        while let Some(mut expr) = pending.pop() {
            expr.take_children(&mut pending);
        }
    }
}

impl Expression {
    fn take_children(&mut self, pending: &mut Vec<Expression>) {
        match self {
            Expression::Array(elements) => pending.append(elements),
            Expression::Prefix { right, .. } => pending.push(take_boxed(right)),
            Expression::Infix { left, right, .. } => {
                pending.push(take_boxed(left));
                pending.push(take_boxed(right));
            },
            Expression::If { condition, consequence, alternative } => {
                pending.push(take_boxed(condition));
                take_block(consequence, pending);

                if let Some(alternative) = alternative {
                    take_block(alternative, pending);
                }
            },
            Expression::Function { body, .. } => {
                // Still referenced by a function value otherwise
                if let Some(body) = Rc::get_mut(body) {
                    take_block(body, pending);
                }
            },
            Expression::Call { callee, arguments } => {
                pending.push(take_boxed(callee));
                pending.append(arguments);
            },
            Expression::Identifier(_) | Expression::Integer(_) | Expression::Boolean(_) | Expression::String(_) => {},
        }
    }
}

fn take_boxed(expr: &mut Box<Expression>) -> Expression {
    std::mem::replace(&mut **expr, Expression::Boolean(false))
}

fn take_block(block: &mut BlockStatement, pending: &mut Vec<Expression>) {
    let mut statements = std::mem::take(&mut block.statements);

    while let Some(stmt) = statements.pop() {
        match stmt {
            Statement::Let { value, .. } | Statement::Return { value } | Statement::Expression(value) => pending.push(value),
            Statement::Block(mut block) => statements.append(&mut block.statements),
        }
    }
}
