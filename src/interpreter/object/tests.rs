use pretty_assertions::assert_eq;
use crate::interpreter::ast::Statement;
use crate::interpreter::ast::Expression;
use crate::interpreter::environment::Environment;
use super::*;

fn function() -> Object {
    Object::Function(Rc::new(Function {
        parameters: vec![Identifier::new("x"), Identifier::new("y")],
        body: Rc::new(BlockStatement {
            statements: vec![Statement::Expression(Expression::Identifier(Identifier::new("x")))],
        }),
        env: Environment::new_global(),
    }))
}

#[test]
fn inspect() {
    assert_eq!("5", Object::Integer(5).to_string());
    assert_eq!("-12", Object::Integer(-12).to_string());
    assert_eq!("true", Object::Boolean(true).to_string());
    assert_eq!("hello", Object::String(String::from("hello")).to_string());
    assert_eq!("null", Object::Null.to_string());
    assert_eq!("[1, two, [false]]", Object::Array(vec![
        Object::Integer(1),
        Object::String(String::from("two")),
        Object::Array(vec![Object::Boolean(false)]),
    ]).to_string());
    assert_eq!("fn(x, y) { x }", function().to_string());
    assert_eq!("division by 0", Object::Error(String::from("division by 0")).to_string());
}

#[test]
fn type_names() {
    assert_eq!("INTEGER", Object::Integer(1).object_type().to_string());
    assert_eq!("STRING", Object::String(String::new()).object_type().to_string());
    assert_eq!("ARRAY", Object::Array(vec![]).object_type().to_string());
    assert_eq!("FUNCTION", function().object_type().to_string());
    assert_eq!("RETURN_VALUE", Object::ReturnValue(Box::new(Object::Null)).object_type().to_string());
}

#[test]
fn truthiness() {
    assert!(Object::Boolean(true).is_truthy());
    assert!(!Object::Boolean(false).is_truthy());
    assert!(Object::Integer(-1).is_truthy());
    assert!(!Object::Integer(0).is_truthy());
    assert!(!Object::Null.is_truthy());
    assert!(Object::String(String::new()).is_truthy());
    assert!(function().is_truthy());
}

#[test]
fn functions_compare_by_identity() {
    let first = function();

    assert_eq!(first.clone(), first);
    assert_ne!(function(), first);
}

#[test]
fn unwrap_return() {
    assert_eq!(Object::Integer(3), Object::ReturnValue(Box::new(Object::Integer(3))).unwrap_return());
    assert_eq!(Object::Null, Object::Null.unwrap_return());
}
