use std::collections::HashMap;

use mindb::sql::ast::*;
use mindb::sql::parser::MAX_CHAIN_LINKS;
use mindb::sql::Parser;
use mindb::{
    compile, tokenize, Database, DescribeExecutor, Executor, LexError, MinDbError, QueryResult,
    Result, Row, SyntaxError, Token, TokenType,
};

/// A toy in-memory executor that only knows the `users` table.
#[derive(Default)]
struct UsersTable {
    rows: Vec<Vec<ValueModel>>,
}

impl UsersTable {
    fn check_table(table: &ObjectModel) -> Result<()> {
        if table.name == "users" {
            Ok(())
        } else {
            Err(MinDbError::Execution(format!("table does not exist: {table}")))
        }
    }
}

impl Executor for UsersTable {
    fn select(&mut self, query: SelectQuery) -> Result<QueryResult> {
        Self::check_table(&query.target_table)?;
        let columns = std::sync::Arc::new(vec!["count".to_string()]);
        Ok(QueryResult {
            rows: vec![Row {
                columns: columns.clone(),
                values: vec![self.rows.len().to_string()],
            }],
            columns,
        })
    }

    fn insert(&mut self, query: InsertQuery) -> Result<QueryResult> {
        Self::check_table(&query.target_table)?;
        self.rows
            .extend(query.rows.into_iter().map(|group| group.values));
        Ok(QueryResult::empty())
    }

    fn delete(&mut self, query: DeleteQuery) -> Result<QueryResult> {
        Self::check_table(&query.target_table)?;
        if query.condition.is_none() {
            self.rows.clear();
        }
        Ok(QueryResult::empty())
    }
}

fn kinds(tokens: &[Token]) -> Vec<TokenType> {
    tokens.iter().map(|t| t.kind).collect()
}

/// Every leaf is an object or value, every internal node is an operator with
/// two children, and comparisons put the object left and the value right.
fn assert_well_formed(tree: &ConditionTree) {
    match tree {
        ConditionTree::Leaf(_) => {
            assert!(matches!(
                tree.payload(),
                ConditionNode::Object(_) | ConditionNode::Value(_)
            ));
        }
        ConditionTree::Node {
            left,
            operator,
            right,
        } => {
            if operator.kind.is_comparison() {
                assert!(matches!(left.payload(), ConditionNode::Object(_)), "{tree}");
                assert!(matches!(right.payload(), ConditionNode::Value(_)), "{tree}");
            } else {
                assert_well_formed(left);
                assert_well_formed(right);
            }
        }
    }
}

fn condition_of(query: QueryModel) -> ConditionTree {
    match query {
        QueryModel::Select(SelectQuery {
            condition: Some(c), ..
        })
        | QueryModel::Delete(DeleteQuery {
            condition: Some(c), ..
        }) => c,
        other => panic!("no condition in {other}"),
    }
}

#[test]
fn tokenize_select_star() {
    let tokens = tokenize("SELECT * FROM Users").unwrap();
    assert_eq!(
        tokens,
        vec![
            Token::marker(TokenType::SelectKeyword),
            Token::new(TokenType::Whitespace, " "),
            Token::new(TokenType::Star, "*"),
            Token::new(TokenType::Whitespace, " "),
            Token::marker(TokenType::FromKeyword),
            Token::new(TokenType::Whitespace, " "),
            Token::new(TokenType::Object, "users"),
            Token::end_of_sequence(),
        ]
    );
}

#[test]
fn parse_select_from_hand_built_tokens() {
    let query = Parser::new(vec![
        Token::marker(TokenType::SelectKeyword),
        Token::new(TokenType::Object, "FirstName"),
        Token::new(TokenType::Comma, ","),
        Token::new(TokenType::Object, "LastName"),
        Token::marker(TokenType::FromKeyword),
        Token::new(TokenType::Object, "Users"),
        Token::end_of_sequence(),
    ])
    .parse()
    .unwrap();

    assert_eq!(
        query,
        QueryModel::Select(SelectQuery {
            target_columns: vec![ObjectModel::new("FirstName"), ObjectModel::new("LastName")],
            target_table: ObjectModel::new("Users"),
            condition: None,
        })
    );
}

#[test]
fn select_through_the_lexer_is_case_folded() {
    let query = compile("SELECT FirstName, LastName FROM Users").unwrap();
    assert_eq!(
        query,
        QueryModel::Select(SelectQuery {
            target_columns: vec![ObjectModel::new("firstname"), ObjectModel::new("lastname")],
            target_table: ObjectModel::new("users"),
            condition: None,
        })
    );
}

#[test]
fn insert_two_rows() {
    let query = compile("INSERT INTO Users VALUES (1, 'John'), (2, 'Jane')").unwrap();
    let QueryModel::Insert(insert) = query else {
        panic!("expected Insert");
    };
    assert_eq!(insert.target_table, ObjectModel::new("users"));
    assert_eq!(
        insert.rows,
        vec![
            ValueGroup {
                values: vec![ValueModel::integer("1"), ValueModel::string("john")],
            },
            ValueGroup {
                values: vec![ValueModel::integer("2"), ValueModel::string("jane")],
            },
        ]
    );
}

#[test]
fn delete_with_condition() {
    let query = compile("DELETE FROM Users WHERE Age > 0").unwrap();
    assert_eq!(
        query,
        QueryModel::Delete(DeleteQuery {
            target_table: ObjectModel::new("users"),
            condition: Some(ConditionTree::comparison(
                ObjectModel::new("age"),
                OperatorKind::GreaterThan,
                ValueModel::integer("0"),
            )),
        })
    );
}

#[test]
fn lexical_errors() {
    assert!(matches!(
        tokenize("123abc"),
        Err(MinDbError::Lex(LexError::InvalidInteger { .. }))
    ));
    assert!(matches!(
        tokenize("'abc"),
        Err(MinDbError::Lex(LexError::UnterminatedString { .. }))
    ));
    assert!(matches!(
        compile("SELECT a FROM t WHERE a = 1.5"),
        Err(MinDbError::Lex(LexError::UnexpectedCharacter { character: '.', .. }))
    ));
}

#[test]
fn missing_table_names_object() {
    let err = compile("SELECT FirstName FROM").unwrap_err();
    match err {
        MinDbError::Syntax(SyntaxError::UnexpectedToken {
            expected, found, ..
        }) => {
            assert_eq!(expected, vec![TokenType::Object]);
            assert_eq!(found, TokenType::EndOfSequence);
        }
        other => panic!("expected syntax error, got {other:?}"),
    }
    assert_eq!(
        compile("SELECT FirstName FROM").unwrap_err().to_string(),
        "syntax error: expected Object, found EndOfSequence at token 3"
    );
}

#[test]
fn and_or_chain_groups_to_the_right() {
    let chained = condition_of(compile("SELECT a FROM t WHERE a = 1 AND b = 2 OR c = 3").unwrap());
    let right = condition_of(compile("SELECT a FROM t WHERE a = 1 AND (b = 2 OR c = 3)").unwrap());
    let left = condition_of(compile("SELECT a FROM t WHERE (a = 1 AND b = 2) OR c = 3").unwrap());

    assert_eq!(chained, right);
    assert_ne!(chained, left);
    assert_eq!(
        chained.to_string(),
        "[And [Equal a Integer 1] [Or [Equal b Integer 2] [Equal c Integer 3]]]"
    );
}

#[test]
fn accepted_conditions_are_well_formed() {
    let clauses = [
        "a = 1",
        "a <> 'x' OR b < 2",
        "(a <= 1)",
        "(a > 1 AND b >= 2) OR (c = 'z' AND (d < 4 OR e = 5))",
        "((a = 1) OR b = 2) AND c = 3 OR d = 4",
    ];
    for clause in clauses {
        for sql in [
            format!("SELECT x FROM t WHERE {clause}"),
            format!("DELETE FROM t WHERE {clause}"),
        ] {
            let tree = condition_of(compile(&sql).unwrap());
            assert_well_formed(&tree);
        }
    }
}

#[test]
fn tokenize_always_ends_with_one_sentinel_or_fails_once() {
    let inputs = [
        "",
        "   ",
        "select",
        "select a from t where b = 'x'",
        "insert into t values (1, 'a'), (2, 'b')",
        "'open",
        "99999999999",
        "a ! b",
        "<<>>=",
    ];
    for input in inputs {
        match tokenize(input) {
            Ok(tokens) => {
                assert_eq!(tokens.last(), Some(&Token::end_of_sequence()), "{input:?}");
                let sentinels = kinds(&tokens)
                    .into_iter()
                    .filter(|k| *k == TokenType::EndOfSequence)
                    .count();
                assert_eq!(sentinels, 1, "{input:?}");
            }
            Err(e) => assert!(matches!(e, MinDbError::Lex(_)), "{input:?}: {e}"),
        }
    }
}

#[test]
fn lexemes_round_trip() {
    let inputs = [
        "SELECT a , b FROM Users WHERE ( a >= 10 OR b <> 2 ) AND c < 3",
        "INSERT INTO T VALUES ( 1 , 2 ) , ( 3 , 4 )",
        "DELETE FROM t WHERE a <= 1 OR b > 2 OR c = 3",
    ];
    for input in inputs {
        let rebuilt: String = tokenize(input)
            .unwrap()
            .iter()
            .map(Token::lexeme)
            .collect();
        assert_eq!(rebuilt, input.to_lowercase());
    }
}

#[test]
fn database_routes_queries_to_executor() {
    let mut db = Database::new(UsersTable::default());

    db.execute("INSERT INTO users VALUES (1, 'a'), (2, 'b')").unwrap();
    db.execute("insert into USERS values (3, 'c')").unwrap();

    let result = db.execute("SELECT id FROM users").unwrap();
    assert_eq!(result.rows[0].get("count"), Some("3"));

    let err = db.execute("SELECT id FROM orders").unwrap_err();
    assert!(matches!(err, MinDbError::Execution(_)));
    assert!(!err.is_compile_error());

    db.execute("DELETE FROM users").unwrap();
    assert!(db.executor().rows.is_empty());
}

#[test]
fn database_reports_compile_errors_without_executing() {
    let mut db = Database::new(UsersTable::default());
    let mut errors = HashMap::new();
    for sql in ["INSERT INTO users VALUES (1", "INSERT INTO users VALUES (123abc)", ""] {
        let err = db.execute(sql).unwrap_err();
        errors.insert(sql, err.to_string());
    }
    assert!(errors["INSERT INTO users VALUES (1"].starts_with("syntax error"));
    assert!(errors["INSERT INTO users VALUES (123abc)"].starts_with("lexical error"));
    assert_eq!(errors[""], "unable to process query: no input");
    assert!(db.executor().rows.is_empty());
}

fn or_chain(terms: usize) -> String {
    let terms: Vec<String> = (0..terms).map(|i| format!("c{i} = {i}")).collect();
    format!("DELETE FROM t WHERE {}", terms.join(" OR "))
}

#[test]
fn long_chains_are_described_or_rejected() {
    for format in [mindb::OutputFormat::Text, mindb::OutputFormat::Json] {
        let mut db = Database::new(DescribeExecutor::new(format));
        let result = db.execute(&or_chain(MAX_CHAIN_LINKS + 1)).unwrap();
        assert_eq!(result.len(), 1);
    }

    let mut db = Database::new(DescribeExecutor::default());
    for terms in [MAX_CHAIN_LINKS + 2, 20_000] {
        let err = db.execute(&or_chain(terms)).unwrap_err();
        assert!(matches!(
            err,
            MinDbError::Syntax(SyntaxError::ChainTooLong { .. })
        ));
    }
}
