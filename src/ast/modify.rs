use crate::{
    ast::*,
    error::Result,
};

/// Rewrites a tree bottom-up: every child slot of every node kind is visited
/// first, then `modifier` gets the chance to replace the expression itself.
/// Nodes returned by `modifier` are spliced in as-is and not visited again.
pub fn modify<F>(node: MNode, modifier: &mut F) -> Result<MNode>
where
    F: FnMut(Expr) -> Result<Expr>,
{
    let modified = match node {
        MNode::Prog(prog) => MNode::Prog(modify_program(prog, modifier)?),
        MNode::Stmt(stmt) => MNode::Stmt(modify_statement(stmt, modifier)?),
        MNode::Expr(expr) => MNode::Expr(modify_expression(expr, modifier)?),
    };

    Ok(modified)
}

pub fn modify_program<F>(mut prog: Program, modifier: &mut F) -> Result<Program>
where
    F: FnMut(Expr) -> Result<Expr>,
{
    prog.stmts = modify_statements(prog.stmts, modifier)?;
    Ok(prog)
}

pub fn modify_expression<F>(expr: Expr, modifier: &mut F) -> Result<Expr>
where
    F: FnMut(Expr) -> Result<Expr>,
{
    let expr = match expr {
        Expr::Ident(_) | Expr::Int(_) | Expr::Bool(_) | Expr::Str(_) => expr,
        Expr::Array(mut a) => {
            a.elements = modify_expressions(a.elements, modifier)?;
            Expr::Array(a)
        },
        Expr::Hash(mut h) => {
            let mut pairs = Vec::with_capacity(h.pairs.len());
            for (k, v) in h.pairs {
                pairs.push((modify_expression(k, modifier)?, modify_expression(v, modifier)?));
            }
            h.pairs = pairs;
            Expr::Hash(h)
        },
        Expr::Pre(mut p) => {
            p.right = Box::new(modify_expression(*p.right, modifier)?);
            Expr::Pre(p)
        },
        Expr::In(mut i) => {
            i.left = Box::new(modify_expression(*i.left, modifier)?);
            i.right = Box::new(modify_expression(*i.right, modifier)?);
            Expr::In(i)
        },
        Expr::If(mut i) => {
            i.condition = Box::new(modify_expression(*i.condition, modifier)?);
            i.consequence = modify_block(i.consequence, modifier)?;
            i.alternative = match i.alternative {
                Some(alt) => Some(modify_block(alt, modifier)?),
                None => None,
            };
            Expr::If(i)
        },
        Expr::Fn(mut func) => {
            func.body = modify_block(func.body, modifier)?;
            Expr::Fn(func)
        },
        Expr::Macro(mut mac) => {
            mac.body = modify_block(mac.body, modifier)?;
            Expr::Macro(mac)
        },
        Expr::Call(mut call) => {
            call.function = Box::new(modify_expression(*call.function, modifier)?);
            call.args = modify_expressions(call.args, modifier)?;
            Expr::Call(call)
        },
        Expr::Index(mut i) => {
            i.left = Box::new(modify_expression(*i.left, modifier)?);
            i.index = Box::new(modify_expression(*i.index, modifier)?);
            Expr::Index(i)
        },
    };

    modifier(expr)
}

fn modify_statement<F>(stmt: Stmt, modifier: &mut F) -> Result<Stmt>
where
    F: FnMut(Expr) -> Result<Expr>,
{
    let stmt = match stmt {
        Stmt::Let(mut l) => {
            l.value = modify_expression(l.value, modifier)?;
            Stmt::Let(l)
        },
        Stmt::Return(mut r) => {
            r.retval = modify_expression(r.retval, modifier)?;
            Stmt::Return(r)
        },
        Stmt::Block(b) => Stmt::Block(modify_block(b, modifier)?),
        Stmt::Expression(mut e) => {
            e.expr = modify_expression(e.expr, modifier)?;
            Stmt::Expression(e)
        },
    };

    Ok(stmt)
}

fn modify_block<F>(mut block: BlockStatement, modifier: &mut F) -> Result<BlockStatement>
where
    F: FnMut(Expr) -> Result<Expr>,
{
    block.stmts = modify_statements(block.stmts, modifier)?;
    Ok(block)
}

fn modify_statements<F>(stmts: Vec<Stmt>, modifier: &mut F) -> Result<Vec<Stmt>>
where
    F: FnMut(Expr) -> Result<Expr>,
{
    stmts.into_iter()
        .map(|stmt| modify_statement(stmt, modifier))
        .collect()
}

fn modify_expressions<F>(exprs: Vec<Expr>, modifier: &mut F) -> Result<Vec<Expr>>
where
    F: FnMut(Expr) -> Result<Expr>,
{
    exprs.into_iter()
        .map(|expr| modify_expression(expr, modifier))
        .collect()
}
