use std::rc::Rc;

use tracing::debug;

use crate::{
    ast::*,
    error::{Error, Result},
    interpreter::{
        environment::{Env, Environment},
        evaluator,
        object::*,
    },
    lexer::{token::Token, token_type::TokenType},
};

/// Binds every top-level `let <name> = macro(...) {...}` in `env` and removes
/// those statements from the program.
pub fn define_macros(program: &mut Program, env: &Env) {
    program.stmts.retain(|stmt| {
        let (name, mac) = match macro_definition(stmt) {
            Some(def) => def,
            None => return true,
        };

        let value = MObject::Macro(
            Rc::new(Macro {
                params: mac.params.clone(),
                body: mac.body.clone(),
                env: Rc::clone(env),
            })
        );

        debug!(macro_name = name, params = mac.params.len(), "defined macro");
        env.borrow_mut().insert(name.to_string(), value);

        false
    });
}

fn macro_definition(stmt: &Stmt) -> Option<(&str, &MacroLiteral)> {
    if let Stmt::Let(LetStatement { name, value: Expr::Macro(mac), .. }) = stmt {
        Some((&name.value, mac))
    } else {
        None
    }
}

/// Replaces every call to a macro bound in `env` with the code the macro
/// returns. Runs once; calls produced by an expansion are left alone.
pub fn expand_macros(program: Program, env: &Env) -> Result<Program> {
    modify_program(program, &mut |expr: Expr| {
        let call = match expr {
            Expr::Call(call) => call,
            other => return Ok(other),
        };

        let (name, mac) = match macro_for_call(&call, env) {
            Some(found) => found,
            None => return Ok(Expr::Call(call)),
        };

        if mac.params.len() != call.args.len() {
            return Err(Error::Macro(format!(
                "wrong number of arguments to `{}`: expected={}, got={}",
                name,
                mac.params.len(),
                call.args.len(),
            )));
        }

        let extended_env = Environment::enclose(&mac.env);
        for (param, arg) in mac.params.iter().zip(call.args) {
            let quoted = MObject::Quote(Rc::new(Quote { node: arg }));
            extended_env.borrow_mut().insert(param.value.clone(), quoted);
        }

        let evaluated = match evaluator::eval_block(&mac.body, &extended_env)? {
            MObject::Return(retval) => *retval.value,
            other => other,
        };

        debug!(macro_name = %name, "expanded macro call");

        match evaluated {
            MObject::Quote(quote) => Ok(quote.node.clone()),
            MObject::Err(e) => Err(Error::Macro(format!("`{}` failed: {}", name, e.value))),
            other => Err(Error::Macro(format!(
                "macros must return quoted code, got: {}",
                other.type_name(),
            ))),
        }
    })
}

fn macro_for_call(call: &FnCall, env: &Env) -> Option<(String, Rc<Macro>)> {
    let ident = match call.function.as_ref() {
        Expr::Ident(ident) => ident,
        _ => return None,
    };

    let bound = env.borrow().get(&ident.value);

    match bound {
        Some(MObject::Macro(mac)) => Some((ident.value.clone(), mac)),
        _ => None,
    }
}

/// The `quote` special form. `unquote(x)` calls anywhere inside the argument
/// are evaluated in `env` right away and spliced back in as literals.
pub fn quote(args: &[Expr], env: &Env) -> Result<MObject> {
    if args.len() != 1 {
        return Ok(new_error(format!("wrong number of arguments. got={}, want=1", args.len())));
    }

    let mut failure: Option<MObject> = None;

    let node = modify_expression(args[0].clone(), &mut |expr: Expr| {
        if failure.is_some() {
            return Ok(expr);
        }

        let call = match expr {
            Expr::Call(call) if is_unquote_call(&call) => call,
            other => return Ok(other),
        };

        let evaluated = evaluator::eval_expression(&call.args[0], env)?;

        match object_to_expr(&evaluated) {
            Some(node) => Ok(node),
            None => {
                failure = Some(if evaluated.is_error() {
                    evaluated
                } else {
                    new_error(format!("cannot unquote {} into code", evaluated.type_name()))
                });
                Ok(Expr::Call(call))
            },
        }
    })?;

    if let Some(err) = failure {
        return Ok(err);
    }

    Ok(MObject::Quote(Rc::new(Quote { node })))
}

fn is_unquote_call(call: &FnCall) -> bool {
    match call.function.as_ref() {
        Expr::Ident(ident) => ident.value == "unquote" && call.args.len() == 1,
        _ => false,
    }
}

/// Turns a value back into the literal that evaluates to it. Values with no
/// literal form yield `None`.
fn object_to_expr(obj: &MObject) -> Option<Expr> {
    let expr = match obj {
        MObject::Int(i) => Expr::Int(IntegerLiteral {
            token: Token::new(TokenType::INT, i.value.to_string()),
            value: i.value,
        }),
        MObject::Bool(b) => {
            let token_type = if b.value { TokenType::TRUE } else { TokenType::FALSE };

            Expr::Bool(BooleanLiteral {
                token: Token::new(token_type, b.value.to_string()),
                value: b.value,
            })
        },
        MObject::Str(s) => Expr::Str(StringLiteral {
            token: Token::new(TokenType::STRING, s.value.clone()),
            value: s.value.clone(),
        }),
        MObject::Array(arr) => Expr::Array(ArrayLiteral {
            token: Token::new(TokenType::LBRACKET, "[".to_string()),
            elements: arr.elements.iter().map(object_to_expr).collect::<Option<Vec<Expr>>>()?,
        }),
        MObject::Hash(h) => {
            let mut keys: Vec<&HashKey> = h.pairs.keys().collect();
            keys.sort();

            let mut pairs = Vec::with_capacity(keys.len());
            for k in keys {
                let pair = &h.pairs[k];
                pairs.push((object_to_expr(&pair.key)?, object_to_expr(&pair.value)?));
            }

            Expr::Hash(HashLiteral {
                token: Token::new(TokenType::LBRACE, "{".to_string()),
                pairs,
            })
        },
        MObject::Fn(f) => Expr::Fn(FnLiteral {
            token: Token::new(TokenType::FUNCTION, "fn".to_string()),
            params: f.params.clone(),
            body: f.body.clone(),
        }),
        MObject::Quote(q) => q.node.clone(),
        MObject::Null
        | MObject::Builtin(_)
        | MObject::Return(_)
        | MObject::Err(_)
        | MObject::Macro(_) => return None,
    };

    Some(expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    fn quoted_node(obj: MObject) -> String {
        match obj {
            MObject::Quote(q) => format!("{}", q.node),
            other => panic!("expected a quote, got {:?}", other),
        }
    }

    fn expand(input: &str) -> Result<Program> {
        let env = Environment::new();
        let mut program = parse(input.to_string())?;

        define_macros(&mut program, &env);
        expand_macros(program, &env)
    }

    #[test]
    fn test_quote() -> Result<()> {
        let tests = vec![
            ("quote(5)", "5"),
            ("quote(5 + 8)", "(5 + 8)"),
            ("quote(foobar)", "foobar"),
            ("quote(foobar + barfoo)", "(foobar + barfoo)"),
        ];

        for (input, expected) in tests {
            assert_eq!(expected, quoted_node(test_eval(input)?));
        }

        Ok(())
    }

    #[test]
    fn test_quote_unquote() -> Result<()> {
        let tests = vec![
            ("quote(unquote(4))", "4"),
            ("quote(unquote(4 + 4))", "8"),
            ("quote(8 + unquote(4 + 4))", "(8 + 8)"),
            ("quote(unquote(4 + 4) + 8)", "(8 + 8)"),
            ("let foobar = 8; quote(foobar)", "foobar"),
            ("let foobar = 8; quote(unquote(foobar))", "8"),
            ("quote(unquote(true))", "true"),
            ("quote(unquote(true == false))", "false"),
            ("quote(unquote(quote(4 + 4)))", "(4 + 4)"),
            (
                "let quotedInfixExpression = quote(4 + 4);
                quote(unquote(4 + 4) + unquote(quotedInfixExpression))",
                "(8 + (4 + 4))",
            ),
            ("quote(unquote(\"text\"))", "\"text\""),
            ("quote(unquote([1, 1 + 1]))", "[1, 2]"),
            ("quote(unquote({\"a\": 1 + 1}))", "{\"a\": 2}"),
            ("quote(unquote(fn(x) { x }))", "fn(x) x"),
            ("quote(if (unquote(1 < 2)) { unquote(3 * 3) })", "iftrue 9"),
        ];

        for (input, expected) in tests {
            assert_eq!(expected, quoted_node(test_eval(input)?), "input: {}", input);
        }

        Ok(())
    }

    #[test]
    fn test_quote_argument_count() -> Result<()> {
        let expected = new_error("wrong number of arguments. got=2, want=1".to_string());

        assert_eq!(expected, test_eval("quote(1, 2)")?);
        assert_eq!(new_error("wrong number of arguments. got=0, want=1".to_string()), test_eval("quote()")?);

        Ok(())
    }

    #[test]
    fn test_unquote_without_literal_form() -> Result<()> {
        let tests = vec![
            ("quote(unquote(if (false) { 1 }))", "cannot unquote NULL into code"),
            ("quote(unquote(len))", "cannot unquote BUILTIN into code"),
            ("quote(unquote([1, len]))", "cannot unquote ARRAY into code"),
            ("quote(unquote(missing))", "identifier not found: missing"),
            ("quote(unquote(1 + true))", "type mismatch: INTEGER + BOOLEAN"),
        ];

        for (input, expected) in tests {
            assert_eq!(new_error(expected.to_string()), test_eval(input)?, "input: {}", input);
        }

        Ok(())
    }

    #[test]
    fn test_define_macros() -> Result<()> {
        let env = Environment::new();
        let mut program = parse("
            let number = 1;
            let function = fn(x, y) { x + y };
            let mymacro = macro(x, y) { x + y; };
        ".to_string())?;

        define_macros(&mut program, &env);

        assert_eq!(2, program.stmts.len());
        assert_eq!(None, env.borrow().get("number"));
        assert_eq!(None, env.borrow().get("function"));

        match env.borrow().get("mymacro") {
            Some(MObject::Macro(mac)) => {
                assert_eq!(2, mac.params.len());
                assert_eq!("x", mac.params[0].value);
                assert_eq!("y", mac.params[1].value);
                assert_eq!("(x + y)", format!("{}", mac.body));
                assert!(Rc::ptr_eq(&env, &mac.env));
            },
            other => panic!("mymacro not bound to a macro: {:?}", other),
        }

        Ok(())
    }

    #[test]
    fn test_nested_macro_literal_is_not_a_definition() -> Result<()> {
        let env = Environment::new();
        let mut program = parse("let f = fn() { let m = macro(x) { x }; m };".to_string())?;

        define_macros(&mut program, &env);

        assert_eq!(1, program.stmts.len());
        assert_eq!(None, env.borrow().get("m"));

        Ok(())
    }

    #[test]
    fn test_expand_macros() -> Result<()> {
        let tests = vec![
            (
                "let infixExpression = macro() { quote(1 + 2); }; infixExpression();",
                "(1 + 2)",
            ),
            (
                "let reverse = macro(a, b) { quote(unquote(b) - unquote(a)); }; reverse(2 + 2, 10 - 5);",
                "(10 - 5) - (2 + 2)",
            ),
            (
                r#"
                let unless = macro(condition, consequence, alternative) {
                    quote(if (!(unquote(condition))) {
                        unquote(consequence);
                    } else {
                        unquote(alternative);
                    });
                };

                unless(10 > 5, puts("not greater"), puts("greater"));
                "#,
                r#"if (!(10 > 5)) { puts("not greater") } else { puts("greater") }"#,
            ),
        ];

        for (input, expected) in tests {
            let expanded = expand(input)?;
            let expected = parse(expected.to_string())?;

            assert_eq!(format!("{}", expected), format!("{}", expanded), "input: {}", input);
        }

        Ok(())
    }

    #[test]
    fn test_unless_matches_hand_written_if() -> Result<()> {
        let expanded = expand("
            let unless = macro(cond, cons, alt) {
                quote(if (!unquote(cond)) { unquote(cons) } else { unquote(alt) })
            };
            unless(10 > 5, a, b)
        ")?;
        let hand_written = parse("if (!(10 > 5)) { a } else { b }".to_string())?;

        assert_eq!(format!("{}", hand_written), format!("{}", expanded));

        Ok(())
    }

    #[test]
    fn test_expansion_reaches_nested_calls() -> Result<()> {
        let expanded = expand("
            let twice = macro(x) { quote(unquote(x) + unquote(x)) };
            let f = fn() { [twice(1), { \"k\": twice(y) }] };
        ")?;

        assert_eq!("let f = fn() [(1 + 1), {\"k\": (y + y)}];", format!("{}", expanded));

        Ok(())
    }

    #[test]
    fn test_expansion_is_single_pass() -> Result<()> {
        let expanded = expand("
            let inner = macro() { quote(1) };
            let outer = macro() { quote(inner()) };
            outer();
        ")?;

        assert_eq!("inner()", format!("{}", expanded));

        Ok(())
    }

    #[test]
    fn test_macro_must_return_quote() {
        match expand("let bad = macro() { 1 }; bad();") {
            Err(Error::Macro(msg)) => assert_eq!("macros must return quoted code, got: INTEGER", msg),
            other => panic!("expected a macro error, got {:?}", other),
        }
    }

    #[test]
    fn test_macro_arity_is_fatal() {
        match expand("let m = macro(a, b) { quote(a) }; m(1);") {
            Err(Error::Macro(msg)) => assert_eq!("wrong number of arguments to `m`: expected=2, got=1", msg),
            other => panic!("expected a macro error, got {:?}", other),
        }
    }

    #[test]
    fn test_macro_can_compute_at_expansion_time() -> Result<()> {
        let env = Environment::new();
        let mut program = parse("
            let square = macro(n) { let v = unquote(n); quote(unquote(n) * unquote(n)) };
            square(3);
        ".to_string())?;

        define_macros(&mut program, &env);

        // `unquote(n)` outside of `quote` is just an unknown function.
        assert!(expand_macros(program, &env).is_err());

        let expanded = expand("
            let constant = macro() { let v = 6 * 7; quote(unquote(v)) };
            constant() + 1;
        ")?;
        assert_eq!("(42 + 1)", format!("{}", expanded));

        let result = evaluator::eval_program(&expanded, &Environment::new())?;
        assert_eq!(i_to_o(43), result);

        Ok(())
    }
}
