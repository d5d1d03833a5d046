use pretty_assertions::assert_eq;
use super::*;

fn kinds_and_literals(source: &str) -> Vec<(TokenType, String)> {
    tokenize(source).into_iter()
        .map(|token| (token.token_type(), token.literal().to_owned()))
        .collect()
}

fn expected(tokens: &[(TokenType, &str)]) -> Vec<(TokenType, String)> {
    tokens.iter().map(|(token_type, literal)| (*token_type, (*literal).to_owned())).collect()
}

#[test]
fn single_character_tokens() {
    assert_eq!(expected(&[
        (TokenType::Assign, "="),
        (TokenType::Plus, "+"),
        (TokenType::ParenthesisLeft, "("),
        (TokenType::ParenthesisRight, ")"),
        (TokenType::BracketLeft, "{"),
        (TokenType::BracketRight, "}"),
        (TokenType::SquareBracketLeft, "["),
        (TokenType::SquareBracketRight, "]"),
        (TokenType::Comma, ","),
        (TokenType::Semicolon, ";"),
        (TokenType::Eof, ""),
    ]), kinds_and_literals("=+(){}[],;"));
}

#[test]
fn program_tokens() {
    let source = "let five = 5;
    let add = fn(x, y) {
        x + y;
    };
    let result = add(five, 10);
    !-/*5;
    5 < 10 > 5;
    if (5 < 10) { return true; } else { return false; }";

    assert_eq!(expected(&[
        (TokenType::Let, "let"), (TokenType::Identifier, "five"), (TokenType::Assign, "="),
        (TokenType::Int, "5"), (TokenType::Semicolon, ";"),
        (TokenType::Let, "let"), (TokenType::Identifier, "add"), (TokenType::Assign, "="),
        (TokenType::Function, "fn"), (TokenType::ParenthesisLeft, "("), (TokenType::Identifier, "x"),
        (TokenType::Comma, ","), (TokenType::Identifier, "y"), (TokenType::ParenthesisRight, ")"),
        (TokenType::BracketLeft, "{"),
        (TokenType::Identifier, "x"), (TokenType::Plus, "+"), (TokenType::Identifier, "y"),
        (TokenType::Semicolon, ";"),
        (TokenType::BracketRight, "}"), (TokenType::Semicolon, ";"),
        (TokenType::Let, "let"), (TokenType::Identifier, "result"), (TokenType::Assign, "="),
        (TokenType::Identifier, "add"), (TokenType::ParenthesisLeft, "("), (TokenType::Identifier, "five"),
        (TokenType::Comma, ","), (TokenType::Int, "10"), (TokenType::ParenthesisRight, ")"),
        (TokenType::Semicolon, ";"),
        (TokenType::Not, "!"), (TokenType::Minus, "-"), (TokenType::Divide, "/"),
        (TokenType::Multiply, "*"), (TokenType::Int, "5"), (TokenType::Semicolon, ";"),
        (TokenType::Int, "5"), (TokenType::Less, "<"), (TokenType::Int, "10"),
        (TokenType::Greater, ">"), (TokenType::Int, "5"), (TokenType::Semicolon, ";"),
        (TokenType::If, "if"), (TokenType::ParenthesisLeft, "("), (TokenType::Int, "5"),
        (TokenType::Less, "<"), (TokenType::Int, "10"), (TokenType::ParenthesisRight, ")"),
        (TokenType::BracketLeft, "{"), (TokenType::Return, "return"), (TokenType::True, "true"),
        (TokenType::Semicolon, ";"), (TokenType::BracketRight, "}"),
        (TokenType::Else, "else"),
        (TokenType::BracketLeft, "{"), (TokenType::Return, "return"), (TokenType::False, "false"),
        (TokenType::Semicolon, ";"), (TokenType::BracketRight, "}"),
        (TokenType::Eof, ""),
    ]), kinds_and_literals(source));
}

#[test]
fn two_character_operators() {
    assert_eq!(expected(&[
        (TokenType::Equal, "=="), (TokenType::NotEqual, "!="),
        (TokenType::LessEqual, "<="), (TokenType::GreaterEqual, ">="),
        (TokenType::PlusAssign, "+="), (TokenType::MinusAssign, "-="),
        (TokenType::MultiplyAssign, "*="), (TokenType::DivideAssign, "/="),
        (TokenType::Assign, "="), (TokenType::Not, "!"),
        (TokenType::Eof, ""),
    ]), kinds_and_literals("== != <= >= += -= *= /= = !"));
}

#[test]
fn identifiers_stop_at_digits() {
    assert_eq!(expected(&[
        (TokenType::Identifier, "foo_bar"),
        (TokenType::Int, "12"),
        (TokenType::Identifier, "letter"),
        (TokenType::Eof, ""),
    ]), kinds_and_literals("foo_bar12 letter"));
}

#[test]
fn strings() {
    assert_eq!(expected(&[
        (TokenType::String, "foobar"),
        (TokenType::String, "foo bar"),
        (TokenType::String, ""),
        (TokenType::Eof, ""),
    ]), kinds_and_literals("\"foobar\" \"foo bar\" \"\""));
}

#[test]
fn unterminated_string_runs_to_end_of_input() {
    assert_eq!(expected(&[
        (TokenType::Int, "1"),
        (TokenType::String, "abc def"),
        (TokenType::Eof, ""),
    ]), kinds_and_literals("1 \"abc def"));
}

#[test]
fn illegal_characters() {
    assert_eq!(expected(&[
        (TokenType::Identifier, "a"),
        (TokenType::Illegal, "@"),
        (TokenType::Identifier, "b"),
        (TokenType::Illegal, "é"),
        (TokenType::Eof, ""),
    ]), kinds_and_literals("a @ b é"));
}

#[test]
fn eof_is_idempotent() {
    let mut lexer = Lexer::new("x");

    assert_eq!(TokenType::Identifier, lexer.next_token().token_type());

    for _ in 0..3 {
        assert_eq!(TokenType::Eof, lexer.next_token().token_type());
    }
}

#[test]
fn token_positions() {
    let tokens = tokenize("let x\n  = 10;");

    assert_eq!(TokenPos::new(1, 1), *tokens[0].start());
    assert_eq!(TokenPos::new(1, 4), *tokens[0].end());
    assert_eq!(TokenPos::new(1, 5), *tokens[1].start());
    assert_eq!(TokenPos::new(2, 3), *tokens[2].start());
    assert_eq!(TokenPos::new(2, 5), *tokens[3].start());
}

#[test]
fn kind_names() {
    assert_eq!("IDENT", TokenType::Identifier.to_string());
    assert_eq!("FUNCTION", TokenType::Function.to_string());
    assert_eq!("==", TokenType::Equal.to_string());
    assert_eq!("EOF", TokenType::Eof.to_string());
}
