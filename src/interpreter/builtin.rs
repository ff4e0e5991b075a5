use std::io::{self, Write};

use crate::{
    error::Result,
    interpreter::{environment::Env, object::*},
};

pub const LEN: MObject = MObject::Builtin(Builtin { name: "len", func: self::len });
pub const FIRST: MObject = MObject::Builtin(Builtin { name: "first", func: self::first });
pub const LAST: MObject = MObject::Builtin(Builtin { name: "last", func: self::last });
pub const REST: MObject = MObject::Builtin(Builtin { name: "rest", func: self::rest });
pub const PUSH: MObject = MObject::Builtin(Builtin { name: "push", func: self::push });
pub const PUTS: MObject = MObject::Builtin(Builtin { name: "puts", func: self::puts });

/// Consulted after the environment chain, so user bindings shadow built-ins.
pub fn lookup(name: &str) -> Option<MObject> {
    let builtin = match name {
        "len" => LEN,
        "first" => FIRST,
        "last" => LAST,
        "rest" => REST,
        "push" => PUSH,
        "puts" => PUTS,
        _ => return None,
    };

    Some(builtin)
}

fn wrong_arg_count(got: usize, want: usize) -> MObject {
    new_error(format!("wrong number of arguments. got={}, want={}", got, want))
}

fn len(args: Vec<MObject>, _env: &Env) -> Result<MObject> {
    if args.len() != 1 {
        return Ok(wrong_arg_count(args.len(), 1));
    }

    match &args[0] {
        MObject::Str(s) => Ok(MObject::Int(Integer { value: s.value.len() as i64 })),
        MObject::Array(arr) => Ok(MObject::Int(Integer { value: arr.elements.len() as i64 })),
        other => Ok(new_error(format!("argument to `len` not supported, got {}", other.type_name()))),
    }
}

fn first(args: Vec<MObject>, _env: &Env) -> Result<MObject> {
    if args.len() != 1 {
        return Ok(wrong_arg_count(args.len(), 1));
    }

    match &args[0] {
        MObject::Array(arr) => Ok(arr.elements.first().cloned().unwrap_or(NULL)),
        other => Ok(new_error(format!("argument to `first` must be ARRAY, got {}", other.type_name()))),
    }
}

fn last(args: Vec<MObject>, _env: &Env) -> Result<MObject> {
    if args.len() != 1 {
        return Ok(wrong_arg_count(args.len(), 1));
    }

    match &args[0] {
        MObject::Array(arr) => Ok(arr.elements.last().cloned().unwrap_or(NULL)),
        other => Ok(new_error(format!("argument to `last` must be ARRAY, got {}", other.type_name()))),
    }
}

fn rest(args: Vec<MObject>, _env: &Env) -> Result<MObject> {
    if args.len() != 1 {
        return Ok(wrong_arg_count(args.len(), 1));
    }

    match &args[0] {
        MObject::Array(arr) if arr.elements.is_empty() => Ok(NULL),
        MObject::Array(arr) => Ok(new_array(arr.elements[1..].to_vec())),
        other => Ok(new_error(format!("argument to `rest` must be ARRAY, got {}", other.type_name()))),
    }
}

fn push(args: Vec<MObject>, _env: &Env) -> Result<MObject> {
    if args.len() != 2 {
        return Ok(wrong_arg_count(args.len(), 2));
    }

    let mut args = args.into_iter();

    match (args.next(), args.next()) {
        (Some(MObject::Array(arr)), Some(value)) => {
            let mut elements = arr.elements.clone();
            elements.push(value);

            Ok(new_array(elements))
        },
        (Some(other), _) => Ok(new_error(format!("argument to `push` must be ARRAY, got {}", other.type_name()))),
        _ => Ok(wrong_arg_count(0, 2)),
    }
}

/// Writes to the output set on the outermost scope, or to stdout when there
/// is none.
fn puts(args: Vec<MObject>, env: &Env) -> Result<MObject> {
    let sink = env.borrow().output();

    if let Some(out) = sink {
        let mut out = out.borrow_mut();
        write_lines(&mut *out, &args)?;
    } else {
        write_lines(&mut io::stdout().lock(), &args)?;
    }

    Ok(NULL)
}

fn write_lines<W: Write + ?Sized>(output: &mut W, args: &[MObject]) -> Result<()> {
    for obj in args {
        writeln!(output, "{}", obj)?;
    }

    Ok(output.flush()?)
}
