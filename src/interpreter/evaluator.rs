use std::{collections::HashMap, rc::Rc};

use crate::{
    error::Result,
    interpreter::{
        builtin,
        environment::{Env, Environment},
        macro_expansion,
        object::*,
    },
    ast::*,
};

pub fn eval(node: &MNode, env: &Env) -> Result<MObject> {
    match node {
        MNode::Prog(x) => eval_program(x, env),
        MNode::Stmt(x) => eval_statement(x, env),
        MNode::Expr(x) => eval_expression(x, env),
    }
}

/// Runs the statements in order. A `return` ends the program with its
/// unwrapped value and the first error value ends it as is. Nothing to run
/// yields null.
pub fn eval_program(program: &Program, env: &Env) -> Result<MObject> {
    let mut result = NULL;

    for stmt in &program.stmts {
        result = eval_statement(stmt, env)?;

        if let MObject::Return(retval) = result {
            return Ok(*retval.value);
        } else if result.is_error() {
            return Ok(result);
        }
    }

    Ok(result)
}

/// Unlike [`eval_program`] a `return` stays wrapped so it can unwind through
/// enclosing blocks up to the function call.
pub fn eval_block(block: &BlockStatement, env: &Env) -> Result<MObject> {
    let mut result = NULL;

    for stmt in &block.stmts {
        result = eval_statement(stmt, env)?;

        if let MObject::Return(_) | MObject::Err(_) = result {
            return Ok(result);
        }
    }

    Ok(result)
}

fn eval_statement(stmt: &Stmt, env: &Env) -> Result<MObject> {
    match stmt {
        Stmt::Expression(x) => eval_expression(&x.expr, env),
        Stmt::Block(x) => eval_block(x, env),
        Stmt::Let(let_stmt) => {
            let value = eval_expression(&let_stmt.value, env)?;
            if value.is_error() { return Ok(value); };

            env.borrow_mut().insert(let_stmt.name.value.clone(), value.clone());

            Ok(value)
        },
        Stmt::Return(ret) => {
            let value = eval_expression(&ret.retval, env)?;
            if value.is_error() { return Ok(value); };

            Ok(MObject::Return(ReturnValue { value: Box::new(value) }))
        },
    }
}

pub fn eval_expression(expr: &Expr, env: &Env) -> Result<MObject> {
    match expr {
        Expr::Int(i) => Ok(MObject::Int(Integer { value: i.value })),
        Expr::Bool(b) => Ok(native_bool_to_boolean(b.value)),
        Expr::Str(s) => Ok(MObject::Str(MString { value: s.value.clone() })),
        Expr::Pre(prefix) => {
            let right = eval_expression(&prefix.right, env)?;
            if right.is_error() { return Ok(right); };

            Ok(eval_prefix_expression(&prefix.operator, right))
        },
        Expr::In(infix) => {
            let left = eval_expression(&infix.left, env)?;
            if left.is_error() { return Ok(left); };

            let right = eval_expression(&infix.right, env)?;
            if right.is_error() { return Ok(right); };

            Ok(eval_infix_expression(left, &infix.operator, right))
        },
        Expr::If(if_expr) => eval_if_expression(if_expr, env),
        Expr::Ident(ident) => Ok(eval_identifier(ident, env)),
        Expr::Fn(func) => {
            Ok(
                MObject::Fn(
                    Rc::new(Function {
                        params: func.params.clone(),
                        body: func.body.clone(),
                        env: Rc::clone(env),
                    })
                )
            )
        },
        Expr::Macro(mac) => {
            Ok(
                MObject::Macro(
                    Rc::new(Macro {
                        params: mac.params.clone(),
                        body: mac.body.clone(),
                        env: Rc::clone(env),
                    })
                )
            )
        },
        Expr::Call(call) => {
            if let Expr::Ident(ident) = call.function.as_ref() {
                if ident.value == "quote" {
                    return macro_expansion::quote(&call.args, env);
                }
            }

            let function = eval_expression(&call.function, env)?;
            if function.is_error() { return Ok(function); };

            let args = eval_expressions(&call.args, env)?;
            if let [err @ MObject::Err(_)] = args.as_slice() {
                return Ok(err.clone());
            }

            apply_function(function, args, env)
        },
        Expr::Array(a) => {
            let elements = eval_expressions(&a.elements, env)?;
            if let [err @ MObject::Err(_)] = elements.as_slice() {
                return Ok(err.clone());
            }

            Ok(new_array(elements))
        },
        Expr::Index(i) => {
            let left = eval_expression(&i.left, env)?;
            if left.is_error() { return Ok(left); };

            let index = eval_expression(&i.index, env)?;
            if index.is_error() { return Ok(index); };

            Ok(eval_index_expression(left, index))
        },
        Expr::Hash(h) => eval_hash_literal(h, env),
    }
}

// Left to right. On the first error value the result is just that error.
fn eval_expressions(exprs: &[Expr], env: &Env) -> Result<Vec<MObject>> {
    let mut results = Vec::with_capacity(exprs.len());

    for expr in exprs {
        let obj = eval_expression(expr, env)?;
        if obj.is_error() { return Ok(vec![obj]); };

        results.push(obj);
    }

    Ok(results)
}

fn apply_function(function: MObject, args: Vec<MObject>, env: &Env) -> Result<MObject> {
    match function {
        MObject::Fn(f) => {
            if f.params.len() != args.len() {
                return Ok(new_error(format!(
                    "wrong number of arguments: expected={}, got={}",
                    f.params.len(),
                    args.len(),
                )));
            }

            let extended_env = Environment::enclose(&f.env);
            for (param, arg) in f.params.iter().zip(args) {
                extended_env.borrow_mut().insert(param.value.clone(), arg);
            }

            let evaluated = eval_block(&f.body, &extended_env)?;

            if let MObject::Return(retval) = evaluated {
                Ok(*retval.value)
            } else {
                Ok(evaluated)
            }
        },
        MObject::Builtin(b) => (b.func)(args, env),
        other => Ok(new_error(format!("not a function: {}", other.type_name()))),
    }
}

fn eval_prefix_expression(op: &str, right: MObject) -> MObject {
    match op {
        "!" => native_bool_to_boolean(!right.is_truthy()),
        "-" => {
            if let MObject::Int(i) = right {
                MObject::Int(Integer { value: i.value.wrapping_neg() })
            } else {
                new_error(format!("unknown operator: -{}", right.type_name()))
            }
        },
        _ => new_error(format!("unknown operator: {}{}", op, right.type_name())),
    }
}

fn eval_infix_expression(left: MObject, op: &str, right: MObject) -> MObject {
    match (&left, &right) {
        (MObject::Int(l), MObject::Int(r)) => eval_integer_infix_expression(l.value, op, r.value),
        (MObject::Str(l), MObject::Str(r)) => eval_string_infix_expression(&l.value, op, &r.value),
        _ if op == "==" => native_bool_to_boolean(left.is_identical(&right)),
        _ if op == "!=" => native_bool_to_boolean(!left.is_identical(&right)),
        _ if left.type_name() != right.type_name() => {
            new_error(format!("type mismatch: {} {} {}", left.type_name(), op, right.type_name()))
        },
        _ => new_error(format!("unknown operator: {} {} {}", left.type_name(), op, right.type_name())),
    }
}

fn eval_integer_infix_expression(left: i64, op: &str, right: i64) -> MObject {
    match op {
        "+" => MObject::Int(Integer { value: left.wrapping_add(right) }),
        "-" => MObject::Int(Integer { value: left.wrapping_sub(right) }),
        "*" => MObject::Int(Integer { value: left.wrapping_mul(right) }),
        "/" if right == 0 => new_error("division by zero".to_string()),
        "/" => MObject::Int(Integer { value: left.wrapping_div(right) }),
        "<" => native_bool_to_boolean(left < right),
        ">" => native_bool_to_boolean(left > right),
        "==" => native_bool_to_boolean(left == right),
        "!=" => native_bool_to_boolean(left != right),
        _ => new_error(format!("unknown operator: INTEGER {} INTEGER", op)),
    }
}

fn eval_string_infix_expression(left: &str, op: &str, right: &str) -> MObject {
    match op {
        "+" => MObject::Str(MString { value: format!("{}{}", left, right) }),
        _ => new_error(format!("unknown operator: STRING {} STRING", op)),
    }
}

fn eval_if_expression(if_expr: &IfExpression, env: &Env) -> Result<MObject> {
    let condition = eval_expression(&if_expr.condition, env)?;

    if condition.is_error() {
        Ok(condition)
    } else if condition.is_truthy() {
        eval_block(&if_expr.consequence, env)
    } else if let Some(alternative) = &if_expr.alternative {
        eval_block(alternative, env)
    } else {
        Ok(NULL)
    }
}

fn eval_identifier(ident: &Identifier, env: &Env) -> MObject {
    if let Some(v) = env.borrow().get(&ident.value) {
        return v;
    }

    match builtin::lookup(&ident.value) {
        Some(b) => b,
        None => new_error(format!("identifier not found: {}", ident.value)),
    }
}

fn eval_index_expression(left: MObject, index: MObject) -> MObject {
    match (&left, &index) {
        (MObject::Array(arr), MObject::Int(i)) => eval_array_index_expression(arr, i.value),
        (MObject::Array(_), _) => {
            new_error(format!("index operator not supported: ARRAY[{}]", index.type_name()))
        },
        (MObject::Hash(h), _) => {
            let hash_key = match index.hash_key() {
                Some(k) => k,
                None => return new_error(format!("unusable as hash key: {}", index.type_name())),
            };

            match h.pairs.get(&hash_key) {
                Some(pair) => pair.value.clone(),
                None => NULL,
            }
        },
        _ => new_error(format!("index operator not supported: {}", left.type_name())),
    }
}

fn eval_array_index_expression(arr: &MArray, index: i64) -> MObject {
    usize::try_from(index).ok()
        .and_then(|idx| arr.elements.get(idx))
        .cloned()
        .unwrap_or(NULL)
}

// Pairs in source order: key, hashability, value. Later duplicates win.
fn eval_hash_literal(h: &HashLiteral, env: &Env) -> Result<MObject> {
    let mut pairs = HashMap::new();

    for (k_node, v_node) in &h.pairs {
        let key = eval_expression(k_node, env)?;
        if key.is_error() { return Ok(key); };

        let hash_key = match key.hash_key() {
            Some(k) => k,
            None => return Ok(new_error(format!("unusable as hash key: {}", key.type_name()))),
        };

        let value = eval_expression(v_node, env)?;
        if value.is_error() { return Ok(value); };

        pairs.insert(hash_key, HashPair { key, value });
    }

    Ok(MObject::Hash(Rc::new(MHash { pairs })))
}
