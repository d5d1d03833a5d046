use std::rc::Rc;
use crate::interpreter::ast::{BlockStatement, Expression, InfixOperator, PrefixOperator, Program, Statement};
use crate::interpreter::environment::{Env, Environment};
use crate::interpreter::object::{Function, Object};
use crate::util;


pub const DEFAULT_MAX_DEPTH: usize = 10_000;

/// Returns early with an error or `return` signal; yields any other value.
macro_rules! propagate {
    ($value:expr) => {
        match $value {
            signal @ (Object::Error(_) | Object::ReturnValue(_)) => return signal,
            value => value,
        }
    };
}

type InfixFunction = fn(Object, Object) -> Object;

/// Evaluates a whole program in `env` with the default call depth limit.
pub fn eval(program: &Program, env: &Env) -> Object {
    Evaluator::default().eval_program(program, env)
}

/// Tree-walking evaluator. Runtime failures are `Object::Error` values, never panics.
pub struct Evaluator {
    max_depth: usize,
    depth: usize,
}

impl Default for Evaluator {
    fn default() -> Self {
        Evaluator::new(DEFAULT_MAX_DEPTH)
    }
}

impl Evaluator {
    pub fn new(max_depth: usize) -> Evaluator {
        Evaluator { max_depth, depth: 0 }
    }

    /// Evaluates the statements in order. A `return` at top level yields its unwrapped value.
    pub fn eval_program(&mut self, program: &Program, env: &Env) -> Object {
        self.eval_program_value(program, env).unwrap_or(Object::Null)
    }

    /// Like [`Evaluator::eval_program`], but `None` when no statement produced a value,
    /// as for an empty program or one made only of `let`s.
    #[tracing::instrument(level = "debug", skip_all, fields(statements = program.statements.len()))]
    pub fn eval_program_value(&mut self, program: &Program, env: &Env) -> Option<Object> {
        let mut result = None;

        for stmt in &program.statements {
            match self.eval_statement(stmt, env) {
                Some(Object::ReturnValue(value)) => return Some(*value),
                Some(error @ Object::Error(_)) => return Some(error),
                Some(value) => result = Some(value),
                None => {},
            }
        }

        result
    }

    /// Like [`Evaluator::eval_program`], but a `return` signal is passed on still wrapped so
    /// the enclosing call can tell it apart from normal completion.
    pub fn eval_block(&mut self, block: &BlockStatement, env: &Env) -> Object {
        let mut result = Object::Null;

        for stmt in &block.statements {
            match self.eval_statement(stmt, env) {
                Some(signal @ (Object::ReturnValue(_) | Object::Error(_))) => return signal,
                Some(value) => result = value,
                None => {},
            }
        }

        result
    }

    /// Returns `None` for a successful `let`, which binds a name but produces no value.
    pub fn eval_statement(&mut self, stmt: &Statement, env: &Env) -> Option<Object> {
        match stmt {
            Statement::Let { name, value } => {
                let value = self.eval_expression(value, env);

                if matches!(value, Object::Error(_) | Object::ReturnValue(_)) {
                    return Some(value);
                }

                env.borrow_mut().set(name.name.as_str(), value);
                None
            },
            Statement::Return { value } => {
                let value = self.eval_expression(value, env);

                Some(match value {
                    Object::Error(_) | Object::ReturnValue(_) => value,
                    value => Object::ReturnValue(Box::new(value)),
                })
            },
            Statement::Expression(expr) => Some(self.eval_expression(expr, env)),
            Statement::Block(block) => Some(self.eval_nested_block(block, env)),
        }
    }

    pub fn eval_expression(&mut self, expr: &Expression, env: &Env) -> Object {
        util::ensure_sufficient_stack(|| match expr {
            Expression::Identifier(identifier) => match env.borrow().get(&identifier.name) {
                Some(value) => value,
                None => error(format!("identifier not found: {}", identifier.name)),
            },
            Expression::Integer(value) => Object::Integer(*value),
            Expression::Boolean(value) => Object::Boolean(*value),
            Expression::String(value) => Object::String(value.clone()),
            Expression::Array(elements) => match self.eval_expressions(elements, env) {
                Ok(elements) => Object::Array(elements),
                Err(signal) => signal,
            },

            Expression::Prefix { operator, right } => {
                let right = propagate!(self.eval_expression(right, env));
                eval_prefix_expression(*operator, right)
            },
            Expression::Infix { left, operator, right } => {
                let left = propagate!(self.eval_expression(left, env));
                let right = propagate!(self.eval_expression(right, env));

                infix_function(*operator)(left, right)
            },
            Expression::If { condition, consequence, alternative } => {
                let condition = propagate!(self.eval_expression(condition, env));

                if condition.is_truthy() {
                    self.eval_nested_block(consequence, env)
                } else if let Some(alternative) = alternative {
                    self.eval_nested_block(alternative, env)
                } else {
                    Object::Null
                }
            },
            Expression::Function { parameters, body } => Object::Function(Rc::new(Function {
                parameters: parameters.clone(),
                body: Rc::clone(body),
                env: Rc::clone(env),
            })),
            Expression::Call { callee, arguments } => {
                let callee = propagate!(self.eval_expression(callee, env));

                match self.eval_expressions(arguments, env) {
                    Ok(arguments) => self.apply_function(callee, arguments),
                    Err(signal) => signal,
                }
            },
        })
    }

    /// Evaluates left to right, stopping at the first error or `return` signal.
    fn eval_expressions(&mut self, exprs: &[Expression], env: &Env) -> Result<Vec<Object>, Object> {
        let mut values = Vec::with_capacity(exprs.len());

        for expr in exprs {
            match self.eval_expression(expr, env) {
                signal @ (Object::Error(_) | Object::ReturnValue(_)) => return Err(signal),
                value => values.push(value),
            }
        }

        Ok(values)
    }

    // Bindings made inside the block stay in the block
    fn eval_nested_block(&mut self, block: &BlockStatement, env: &Env) -> Object {
        let scope = Environment::new_enclosed(Rc::clone(env));
        self.eval_block(block, &scope)
    }

    fn apply_function(&mut self, callee: Object, arguments: Vec<Object>) -> Object {
        let function = match callee {
            Object::Function(function) => function,
            other => return error(format!("not a function: {}", other.object_type())),
        };

        if self.depth >= self.max_depth {
            return error(format!("maximum call depth exceeded ({})", self.max_depth));
        }

        tracing::trace!(depth = self.depth, parameters = function.parameters.len(), arguments = arguments.len(), "call");

        // Missing arguments leave their parameters unbound, extra arguments are ignored
        let scope = Environment::new_enclosed(Rc::clone(&function.env));
        {
            let mut scope = scope.borrow_mut();

            for (parameter, argument) in function.parameters.iter().zip(arguments) {
                scope.set(parameter.name.as_str(), argument);
            }
        }

        self.depth += 1;
        let result = self.eval_block(&function.body, &scope);
        self.depth -= 1;

        result.unwrap_return()
    }
}

fn error(message: String) -> Object {
    tracing::debug!("runtime error: {}", message);
    Object::Error(message)
}

fn eval_prefix_expression(operator: PrefixOperator, right: Object) -> Object {
    match (operator, right) {
        (PrefixOperator::Not, Object::Null) => error(String::from("unknown operator: !NULL")),
        (PrefixOperator::Not, right) => Object::Boolean(!right.is_truthy()),
        (PrefixOperator::Negate, Object::Integer(value)) => Object::Integer(value.wrapping_neg()),
        (PrefixOperator::Negate, right) => error(format!("unknown operator: -{}", right.object_type())),
    }
}

fn infix_function(operator: InfixOperator) -> InfixFunction {
    match operator {
        InfixOperator::Plus => infix_plus,
        InfixOperator::Minus => infix_minus,
        InfixOperator::Multiply => infix_multiply,
        InfixOperator::Divide => infix_divide,
        InfixOperator::Equal => infix_equal,
        InfixOperator::NotEqual => infix_not_equal,
        InfixOperator::Less => infix_less,
        InfixOperator::LessEqual => infix_less_equal,
        InfixOperator::Greater => infix_greater,
        InfixOperator::GreaterEqual => infix_greater_equal,
    }
}

fn type_mismatch(left: &Object, operator: InfixOperator, right: &Object) -> Object {
    error(format!("type mismatch: {} {} {}", left.object_type(), operator, right.object_type()))
}

fn unknown_operator(left: &Object, operator: InfixOperator, right: &Object) -> Object {
    error(format!("unknown operator: {} {} {}", left.object_type(), operator, right.object_type()))
}

/// Mismatched operand types are a type mismatch; matching but unsupported types are an unknown operator.
fn invalid_operands(left: &Object, operator: InfixOperator, right: &Object) -> Object {
    if left.object_type() != right.object_type() {
        type_mismatch(left, operator, right)
    } else {
        unknown_operator(left, operator, right)
    }
}

fn infix_plus(left: Object, right: Object) -> Object {
    match (left, right) {
        (Object::Integer(left), Object::Integer(right)) => Object::Integer(left.wrapping_add(right)),
        (Object::String(mut left), Object::String(right)) => {
            left.push_str(&right);
            Object::String(left)
        },
        (left, right) => invalid_operands(&left, InfixOperator::Plus, &right),
    }
}

fn infix_minus(left: Object, right: Object) -> Object {
    match (left, right) {
        (Object::Integer(left), Object::Integer(right)) => Object::Integer(left.wrapping_sub(right)),
        (left, right) => invalid_operands(&left, InfixOperator::Minus, &right),
    }
}

fn infix_multiply(left: Object, right: Object) -> Object {
    match (left, right) {
        (Object::Integer(left), Object::Integer(right)) => Object::Integer(left.wrapping_mul(right)),
        (left, right) => invalid_operands(&left, InfixOperator::Multiply, &right),
    }
}

fn infix_divide(left: Object, right: Object) -> Object {
    match (left, right) {
        (Object::Integer(_), Object::Integer(0)) => error(String::from("division by 0")),
        (Object::Integer(left), Object::Integer(right)) => Object::Integer(left.wrapping_div(right)),
        (left, right) => invalid_operands(&left, InfixOperator::Divide, &right),
    }
}

/// `None` when the operands have no defined equality.
fn values_equal(left: &Object, right: &Object) -> Option<bool> {
    match (left, right) {
        (Object::Null, _) | (_, Object::Null) => Some(matches!((left, right), (Object::Null, Object::Null))),
        (Object::Integer(left), Object::Integer(right)) => Some(left == right),
        (Object::Boolean(left), Object::Boolean(right)) => Some(left == right),
        _ => None,
    }
}

fn infix_equal(left: Object, right: Object) -> Object {
    match values_equal(&left, &right) {
        Some(equal) => Object::Boolean(equal),
        None => unknown_operator(&left, InfixOperator::Equal, &right),
    }
}

fn infix_not_equal(left: Object, right: Object) -> Object {
    match values_equal(&left, &right) {
        Some(equal) => Object::Boolean(!equal),
        None => unknown_operator(&left, InfixOperator::NotEqual, &right),
    }
}

fn compare_integers(left: Object, operator: InfixOperator, right: Object, compare: fn(&i64, &i64) -> bool) -> Object {
    match (&left, &right) {
        (Object::Integer(l), Object::Integer(r)) => Object::Boolean(compare(l, r)),
        _ => unknown_operator(&left, operator, &right),
    }
}

fn infix_less(left: Object, right: Object) -> Object {
    compare_integers(left, InfixOperator::Less, right, i64::lt)
}

fn infix_less_equal(left: Object, right: Object) -> Object {
    compare_integers(left, InfixOperator::LessEqual, right, i64::le)
}

fn infix_greater(left: Object, right: Object) -> Object {
    compare_integers(left, InfixOperator::Greater, right, i64::gt)
}

fn infix_greater_equal(left: Object, right: Object) -> Object {
    compare_integers(left, InfixOperator::GreaterEqual, right, i64::ge)
}
