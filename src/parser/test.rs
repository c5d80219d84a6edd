use super::{
    format_tokens, parse, tokenize, BinaryOperator, Expected, Expression, LexicalErrorKind,
    Locatable, ParseError, Span, SyntaxError, TokenType as TT, Tokenizer,
};
use pretty_assertions::assert_eq;

fn token_types(input: &str) -> Vec<TT> {
    tokenize(input).iter().map(|t| t.typ).collect()
}

fn lexemes(input: &str) -> Vec<String> {
    tokenize(input)
        .iter()
        .filter_map(|t| t.value().map(str::to_string))
        .collect()
}

fn parse_tree_matches(input: &str, tree_repr: &str) {
    match parse(input) {
        Ok(tree) => assert_eq!(
            tree.to_string(),
            tree_repr,
            "\nFailed to parse \"{}\" into the expected tree\n",
            input
        ),
        Err(err) => panic!("Failed to parse \"{input}\": {err}"),
    }
}

fn parse_error(input: &str) -> ParseError {
    match parse(input) {
        Ok(tree) => panic!("Expected \"{input}\" to be rejected, got {tree}"),
        Err(err) => err,
    }
}

fn assert_unexpected(input: &str, expected: Expected, found: TT) {
    match parse_error(input).syntax {
        SyntaxError::UnexpectedToken {
            expected: e,
            found: f,
        } => {
            assert_eq!(e, expected, "wrong expectation for \"{input}\"");
            assert_eq!(f.typ, found, "wrong offending token for \"{input}\"");
        }
        other => panic!("Expected an unexpected-token error for \"{input}\", got {other:?}"),
    }
}

#[test]
fn test_single_character_tokens() {
    assert_eq!(
        token_types("+-*/^()"),
        vec![
            TT::PLUS,
            TT::MINUS,
            TT::STAR,
            TT::SLASH,
            TT::CIRCUMFLEX,
            TT::LPAR,
            TT::RPAR,
            TT::ENDMARKER,
        ]
    );
}

#[test]
fn test_number_literals() {
    assert_eq!(lexemes("12 1.5 12. .5"), vec!["12", "1.5", "12.", ".5"]);
    assert_eq!(lexemes("1.2.3"), vec!["1.2", ".3"]);
    assert_eq!(lexemes("007"), vec!["007"]);
}

#[test]
fn test_whitespace_is_skipped() {
    assert_eq!(
        token_types(" \t\n\r\x0B\x0C3 \n+\t4 "),
        vec![TT::NUMBER, TT::PLUS, TT::NUMBER, TT::ENDMARKER]
    );
    assert_eq!(token_types(""), vec![TT::ENDMARKER]);
    assert_eq!(token_types("   "), vec![TT::ENDMARKER]);
}

#[test]
fn test_token_spans() {
    let tokens = tokenize("12 + 3");
    let spans: Vec<Span> = tokens.iter().map(|t| t.span()).collect();
    assert_eq!(
        spans,
        vec![
            Span { start: 0, end: 2 },
            Span { start: 3, end: 4 },
            Span { start: 5, end: 6 },
            Span { start: 6, end: 6 },
        ]
    );
}

#[test]
fn test_end_marker_repeats() {
    let mut tokenizer = Tokenizer::new("7");
    assert_eq!(tokenizer.next_token().typ, TT::NUMBER);
    for _ in 0..3 {
        let token = tokenizer.next_token();
        assert_eq!(token.typ, TT::ENDMARKER);
        assert_eq!(token.value(), None);
        assert_eq!(tokenizer.position(), 1);
    }
}

#[test]
fn test_iterator_yields_end_marker_once() {
    let tokens: Vec<_> = Tokenizer::new("1+2").collect();
    assert_eq!(tokens.len(), 4);
    assert_eq!(tokens.last().map(|t| t.typ), Some(TT::ENDMARKER));
}

#[test]
fn test_unknown_character() {
    let mut tokenizer = Tokenizer::new("3 $ 4");
    let types: Vec<TT> = tokenizer.by_ref().map(|t| t.typ).collect();
    assert_eq!(
        types,
        vec![TT::NUMBER, TT::ERRORTOKEN, TT::NUMBER, TT::ENDMARKER]
    );
    let errors = tokenizer.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, LexicalErrorKind::UnknownCharacter);
    assert_eq!(errors[0].position, 2);
    assert_eq!(errors[0].character, '$');
    assert_eq!(
        errors[0].to_string(),
        "Lexical error at position 2: Unknown character '$'"
    );
}

#[test]
fn test_lone_decimal_point() {
    let mut tokenizer = Tokenizer::new(".");
    let token = tokenizer.next_token();
    assert_eq!(token.typ, TT::ERRORTOKEN);
    assert_eq!(token.value(), Some("."));
    assert_eq!(tokenizer.errors()[0].kind, LexicalErrorKind::MalformedNumber);
    assert_eq!(tokenizer.next_token().typ, TT::ENDMARKER);
}

#[test]
fn test_non_ascii_character_is_consumed_whole() {
    let tokens = tokenize("2 × 3");
    assert_eq!(tokens[1].typ, TT::ERRORTOKEN);
    assert_eq!(tokens[1].value(), Some("×"));
    assert_eq!(tokens[2].span(), Span { start: 5, end: 6 });
}

#[test]
fn test_tokenizing_is_repeatable() {
    let input = "(1.5 + 2) * -3 ^ 2 $";
    assert_eq!(tokenize(input), tokenize(input));
}

#[test]
fn test_format_tokens() {
    assert_eq!(
        format_tokens(&tokenize("3 + 4")),
        "[ NUMBER(3), PLUS(+), NUMBER(4) ]"
    );
    assert_eq!(
        format_tokens(&tokenize("(2)^x")),
        "[ LPAR((), NUMBER(2), RPAR()), CIRCUMFLEX(^), ERRORTOKEN(x) ]"
    );
}

#[test]
fn test_precedence() {
    parse_tree_matches("10-3*2", "(10 - (3 * 2))");
    parse_tree_matches("1+2*3^2", "(1 + (2 * (3 ^ 2)))");
    parse_tree_matches("(5+3)*2", "((5 + 3) * 2)");
}

#[test]
fn test_associativity() {
    parse_tree_matches("100/4/5", "((100 / 4) / 5)");
    parse_tree_matches("1-2+3", "((1 - 2) + 3)");
    parse_tree_matches("2^3^2", "(2 ^ (3 ^ 2))");
}

#[test]
fn test_unary_chains() {
    parse_tree_matches("--5", "(-(-5))");
    parse_tree_matches("+(4*3)", "(+(4 * 3))");
    parse_tree_matches("-2^2", "(-(2 ^ 2))");
    parse_tree_matches("2*-3", "(2 * (-3))");
    parse_tree_matches("-5+3", "((-5) + 3)");
}

#[test]
fn test_redundant_parentheses() {
    parse_tree_matches("((((7))))", "7");
    parse_tree_matches("1.5", "1.5");
}

#[test]
fn test_tree_shape_ignores_whitespace() {
    assert_eq!(parse("  3  +  4  ").ok(), parse("3+4").ok());
    let expected = Expression::BinaryOperation(
        BinaryOperator::Plus,
        Box::new((
            Expression::Number(3.0, Span::default()),
            Expression::Number(4.0, Span::default()),
        )),
        Span::default(),
    );
    assert_eq!(parse("3 + 4").ok(), Some(expected));
}

#[test]
fn test_debug_repr_omits_spans() {
    let tree = parse("2^3^2").unwrap();
    let repr = format!("{tree:?}");
    assert!(
        repr.contains("BinaryOperation(Power, (Number(2.0), BinaryOperation(Power"),
        "unexpected debug output {repr}"
    );
}

#[test]
fn test_expression_spans() {
    assert_eq!(parse("1 + 23").unwrap().span(), Span { start: 0, end: 6 });
    assert_eq!(parse("  -4").unwrap().span(), Span { start: 2, end: 4 });
}

#[test]
fn test_tree_dump() {
    let tree = parse("-(1+2)*3").unwrap();
    assert_eq!(
        tree.tree().to_string(),
        "BINARY_OP: STAR\n  UNARY_OP: MINUS\n    BINARY_OP: PLUS\n      NUMBER: 1\n      NUMBER: 2\n  NUMBER: 3\n"
    );
}

#[test]
fn test_missing_operand() {
    assert_unexpected("3 +", Expected::Operand, TT::ENDMARKER);
    assert_unexpected("", Expected::Operand, TT::ENDMARKER);
    assert_unexpected(")", Expected::Operand, TT::RPAR);
    assert_unexpected("2*/3", Expected::Operand, TT::SLASH);
    assert_unexpected("2^-1", Expected::Operand, TT::MINUS);
}

#[test]
fn test_unclosed_parenthesis() {
    assert_unexpected("(1+2", Expected::Token(TT::RPAR), TT::ENDMARKER);
    assert_unexpected("((1)", Expected::Token(TT::RPAR), TT::ENDMARKER);
}

#[test]
fn test_trailing_input() {
    let err = parse_error("1 2");
    match err.syntax {
        SyntaxError::TrailingInput { ref found } => {
            assert_eq!(found.typ, TT::NUMBER);
            assert_eq!(found.value(), Some("2"));
        }
        ref other => panic!("Expected trailing input, got {other:?}"),
    }
    assert!(matches!(
        parse_error("(1))").syntax,
        SyntaxError::TrailingInput { .. }
    ));
}

#[test]
fn test_lone_decimal_point_fails_to_parse() {
    let err = parse_error(".");
    assert_eq!(err.lexical.len(), 1);
    assert_eq!(err.lexical[0].kind, LexicalErrorKind::MalformedNumber);
    assert_eq!(err.syntax.token().map(|t| t.typ), Some(TT::ERRORTOKEN));
}

#[test]
fn test_lexical_errors_are_attached() {
    let err = parse_error("3 $ 4");
    assert!(matches!(err.syntax, SyntaxError::TrailingInput { .. }));
    assert_eq!(err.lexical.len(), 1);
    assert_eq!(err.lexical[0].character, '$');

    let err = parse_error("1 + # 2");
    assert_unexpected("1 + # 2", Expected::Operand, TT::ERRORTOKEN);
    assert_eq!(err.lexical[0].position, 4);
}

#[test]
fn test_error_messages() {
    assert_eq!(
        parse_error("3 +").to_string(),
        "Syntax error: expected number or '(', found end of input at position 3"
    );
    assert_eq!(
        parse_error("(1").to_string(),
        "Syntax error: expected ')', found end of input at position 2"
    );
    assert_eq!(
        parse_error("1 )").to_string(),
        "Syntax error: unexpected ')' after expression at position 2"
    );
}

fn assert_nesting_too_deep(input: &str) {
    let err = parse_error(input);
    match err.syntax {
        SyntaxError::NestingTooDeep { span } => assert!(span.end <= input.len()),
        other => panic!("expected NestingTooDeep, got {other:?}"),
    }
}

#[test]
fn test_deeply_nested_parentheses_are_rejected() {
    let input = format!("{}1{}", "(".repeat(20_000), ")".repeat(20_000));
    assert_nesting_too_deep(&input);
    assert!(crate::calculate(&input).is_err());
}

#[test]
fn test_long_sign_chains_are_rejected() {
    assert_nesting_too_deep(&format!("{}1", "-".repeat(50_000)));
    assert_nesting_too_deep(&format!("{}1", "+-".repeat(25_000)));
}

#[test]
fn test_long_power_chains_are_rejected() {
    assert_nesting_too_deep(&format!("{}2", "2^".repeat(50_000)));
}

#[test]
fn test_overly_tall_left_folds_are_rejected() {
    assert_nesting_too_deep(&format!("{}1", "1+".repeat(20_000)));
    assert_nesting_too_deep(&format!("{}1", "1*".repeat(20_000)));
}

#[test]
fn test_moderate_nesting_still_parses() {
    let parens = format!("{}1{}", "(".repeat(200), ")".repeat(200));
    parse_tree_matches(&parens, "1");
    let signs = format!("{}7", "-".repeat(200));
    assert_eq!(crate::calculate(&signs).ok(), Some(7.0));
    let sum = format!("{}1", "1+".repeat(999));
    assert_eq!(crate::calculate(&sum).ok(), Some(1000.0));
}

#[test]
fn test_nesting_message() {
    let input = format!("{}1", "(".repeat(1000));
    let message = parse_error(&input).to_string();
    assert!(message.starts_with("Syntax error: expression nested too deeply at position "));
}
