use std::fmt::{Debug, Display, Formatter};
use std::rc::Rc;
use crate::interpreter::ast::{BlockStatement, Identifier};
use crate::interpreter::environment::Env;
use crate::util::join;

#[cfg(test)]
mod tests;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum ObjectType {
    // @formatter:off
    Integer, Boolean, String,
    Array, Null,
    Function,
    ReturnValue, Error,
    // @formatter:on
}

impl Display for ObjectType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ObjectType::Integer => "INTEGER",
            ObjectType::Boolean => "BOOLEAN",
            ObjectType::String => "STRING",
            ObjectType::Array => "ARRAY",
            ObjectType::Null => "NULL",
            ObjectType::Function => "FUNCTION",
            ObjectType::ReturnValue => "RETURN_VALUE",
            ObjectType::Error => "ERROR",
        })
    }
}

/// A user-defined function together with the environment it was created in.
pub struct Function {
    pub parameters: Vec<Identifier>,
    pub body: Rc<BlockStatement>,
    pub env: Env,
}

// The captured environment usually contains the function itself
impl Debug for Function {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Function")
            .field("parameters", &self.parameters)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
pub enum Object {
    Integer(i64),
    Boolean(bool),
    String(String),
    Array(Vec<Object>),
    Null,
    Function(Rc<Function>),

    /// Wraps the operand of a `return` while it travels up to the enclosing call.
    ReturnValue(Box<Object>),
    Error(String),
}

impl Object {
    pub fn object_type(&self) -> ObjectType {
        ObjectType::from(self)
    }

    /// Booleans are their own value, integers are truthy when nonzero, `null` is falsy and
    /// every other value is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Object::Boolean(value) => *value,
            Object::Integer(value) => *value != 0,
            Object::Null => false,
            Object::ReturnValue(value) => value.is_truthy(),
            Object::Error(_) => false,
            Object::String(_) | Object::Array(_) | Object::Function(_) => true,
        }
    }

    /// Unwraps a `return` signal; any other value is passed through.
    pub fn unwrap_return(self) -> Object {
        match self {
            Object::ReturnValue(value) => *value,
            other => other,
        }
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Object::Integer(value), Object::Integer(other)) => value == other,
            (Object::Boolean(value), Object::Boolean(other)) => value == other,
            (Object::String(value), Object::String(other)) => value == other,
            (Object::Array(elements), Object::Array(other)) => elements == other,
            (Object::Null, Object::Null) => true,
            (Object::Function(function), Object::Function(other)) => Rc::ptr_eq(function, other),
            (Object::ReturnValue(value), Object::ReturnValue(other)) => value == other,
            (Object::Error(message), Object::Error(other)) => message == other,
            _ => false,
        }
    }
}

impl Display for Object {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Object::Integer(value) => write!(f, "{}", value),
            Object::Boolean(value) => write!(f, "{}", value),
            Object::String(value) => f.write_str(value),
            Object::Array(elements) => write!(f, "[{}]", join(elements, ", ")),
            Object::Null => f.write_str("null"),
            Object::Function(function) =>
                write!(f, "fn({}) {{ {} }}", join(&function.parameters, ", "), function.body),
            Object::ReturnValue(value) => write!(f, "{}", value),
            Object::Error(message) => f.write_str(message),
        }
    }
}

impl From<&Object> for ObjectType {
    fn from(object: &Object) -> Self {
        match object {
            Object::Integer(_) => ObjectType::Integer,
            Object::Boolean(_) => ObjectType::Boolean,
            Object::String(_) => ObjectType::String,
            Object::Array(_) => ObjectType::Array,
            Object::Null => ObjectType::Null,
            Object::Function(_) => ObjectType::Function,
            Object::ReturnValue(_) => ObjectType::ReturnValue,
            Object::Error(_) => ObjectType::Error,
        }
    }
}
