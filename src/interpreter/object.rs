use std::{collections::HashMap, fmt, rc::Rc};

use crate::{
    ast,
    error::Result,
    interpreter::environment::Env,
};

pub const TRUE: MObject = MObject::Bool(Boolean { value: true });
pub const FALSE: MObject = MObject::Bool(Boolean { value: false });
pub const NULL: MObject = MObject::Null;

/// Built-ins receive the caller's scope so `puts` can find the session's output.
pub type BuiltinFn = fn(Vec<MObject>, &Env) -> Result<MObject>;

/// Values that can key a hash.
pub trait Hashable {
    fn hash_key(&self) -> HashKey;
}

#[derive(PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Debug, Hash)]
pub struct Integer {
    pub value: i64,
}

impl Hashable for Integer {
    fn hash_key(&self) -> HashKey {
        HashKey::Int(*self)
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[derive(PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Debug, Hash)]
pub struct Boolean {
    pub value: bool,
}

impl Hashable for Boolean {
    fn hash_key(&self) -> HashKey {
        HashKey::Bool(*self)
    }
}

impl fmt::Display for Boolean {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Debug, Hash)]
pub struct MString {
    pub value: String,
}

impl Hashable for MString {
    fn hash_key(&self) -> HashKey {
        HashKey::Str(self.clone())
    }
}

impl fmt::Display for MString {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct MArray {
    pub elements: Vec<MObject>,
}

impl fmt::Display for MArray {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "[{}]",
            self.elements.iter()
                .map(|e| e.nested_inspect())
                .collect::<Vec<String>>()
                .join(", ")
        )
    }
}

/// The kind tag travels with the value, so `1` and `true` never collide.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Debug, Hash)]
pub enum HashKey {
    Int(Integer),
    Bool(Boolean),
    Str(MString),
}

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct HashPair {
    pub key: MObject,
    pub value: MObject,
}

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct MHash {
    pub pairs: HashMap<HashKey, HashPair>,
}

impl fmt::Display for MHash {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // Sorted so the rendering does not depend on the map's iteration order.
        let mut keys: Vec<&HashKey> = self.pairs.keys().collect();
        keys.sort();

        write!(
            f,
            "{{{}}}",
            keys.into_iter()
                .map(|k| {
                    let pair = &self.pairs[k];
                    format!("{}: {}", pair.key.nested_inspect(), pair.value.nested_inspect())
                })
                .collect::<Vec<String>>()
                .join(", ")
        )
    }
}

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct ReturnValue {
    pub value: Box<MObject>,
}

impl fmt::Display for ReturnValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Debug, Hash)]
pub struct MError {
    pub value: String,
}

impl fmt::Display for MError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ERROR: {}", self.value)
    }
}

fn params_to_string(params: &[ast::Identifier]) -> String {
    params.iter()
        .map(|p| format!("{}", p))
        .collect::<Vec<String>>()
        .join(", ")
}

/// A closure. The environment is compared by identity: a function stored in
/// the scope it captured would otherwise recurse forever.
#[derive(Clone)]
pub struct Function {
    pub params: Vec<ast::Identifier>,
    pub body: ast::BlockStatement,
    pub env: Env,
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.params == other.params
            && self.body == other.body
            && Rc::ptr_eq(&self.env, &other.env)
    }
}

impl Eq for Function {}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Function")
            .field("params", &self.params)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "fn({}) {}", params_to_string(&self.params), self.body)
    }
}

#[derive(Clone)]
pub struct Macro {
    pub params: Vec<ast::Identifier>,
    pub body: ast::BlockStatement,
    pub env: Env,
}

impl PartialEq for Macro {
    fn eq(&self, other: &Self) -> bool {
        self.params == other.params
            && self.body == other.body
            && Rc::ptr_eq(&self.env, &other.env)
    }
}

impl Eq for Macro {}

impl fmt::Debug for Macro {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Macro")
            .field("params", &self.params)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Macro {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "macro({}) {}", params_to_string(&self.params), self.body)
    }
}

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Quote {
    pub node: ast::Expr,
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "QUOTE({})", self.node)
    }
}

#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub func: BuiltinFn,
}

impl PartialEq for Builtin {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Builtin {}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Builtin({})", self.name)
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "builtin: {}", self.name)
    }
}

/// Runtime values. Composite values sit behind `Rc` so that `==` in the
/// language can compare them by identity, while the derived `PartialEq`
/// compares structure.
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum MObject {
    Int(Integer),
    Bool(Boolean),
    Str(MString),
    Null,
    Array(Rc<MArray>),
    Hash(Rc<MHash>),
    Fn(Rc<Function>),
    Builtin(Builtin),
    Return(ReturnValue),
    Err(MError),
    Macro(Rc<Macro>),
    Quote(Rc<Quote>),
}

impl MObject {
    pub fn type_name(&self) -> &'static str {
        match self {
            MObject::Int(_) => "INTEGER",
            MObject::Bool(_) => "BOOLEAN",
            MObject::Str(_) => "STRING",
            MObject::Null => "NULL",
            MObject::Array(_) => "ARRAY",
            MObject::Hash(_) => "HASH",
            MObject::Fn(_) => "FUNCTION",
            MObject::Builtin(_) => "BUILTIN",
            MObject::Return(_) => "RETURN_VALUE",
            MObject::Err(_) => "ERROR",
            MObject::Macro(_) => "MACRO",
            MObject::Quote(_) => "QUOTE",
        }
    }

    pub fn hash_key(&self) -> Option<HashKey> {
        match self {
            MObject::Int(x) => Some(x.hash_key()),
            MObject::Bool(x) => Some(x.hash_key()),
            MObject::Str(x) => Some(x.hash_key()),
            _ => None,
        }
    }

    pub fn is_truthy(&self) -> bool {
        !matches!(self, MObject::Null | MObject::Bool(Boolean { value: false }))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, MObject::Err(_))
    }

    /// Equality as the language sees it. Scalars compare by value, reference
    /// kinds only equal themselves.
    pub fn is_identical(&self, other: &MObject) -> bool {
        match (self, other) {
            (MObject::Int(a), MObject::Int(b)) => a == b,
            (MObject::Bool(a), MObject::Bool(b)) => a == b,
            (MObject::Str(a), MObject::Str(b)) => a == b,
            (MObject::Null, MObject::Null) => true,
            (MObject::Array(a), MObject::Array(b)) => Rc::ptr_eq(a, b),
            (MObject::Hash(a), MObject::Hash(b)) => Rc::ptr_eq(a, b),
            (MObject::Fn(a), MObject::Fn(b)) => Rc::ptr_eq(a, b),
            (MObject::Macro(a), MObject::Macro(b)) => Rc::ptr_eq(a, b),
            (MObject::Quote(a), MObject::Quote(b)) => Rc::ptr_eq(a, b),
            (MObject::Builtin(a), MObject::Builtin(b)) => a == b,
            (MObject::Err(a), MObject::Err(b)) => a == b,
            (MObject::Return(a), MObject::Return(b)) => a.value.is_identical(&b.value),
            _ => false,
        }
    }

    // Inside arrays and hashes strings keep their quotes.
    fn nested_inspect(&self) -> String {
        match self {
            MObject::Str(s) => format!("\"{}\"", s.value),
            _ => format!("{}", self),
        }
    }
}

pub fn new_error(value: String) -> MObject {
    MObject::Err(
        MError {
            value,
        }
    )
}

#[inline]
pub fn native_bool_to_boolean(b: bool) -> MObject {
    if b { TRUE } else { FALSE }
}

pub fn new_array(elements: Vec<MObject>) -> MObject {
    MObject::Array(Rc::new(MArray { elements }))
}

impl fmt::Display for MObject {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MObject::Int(x) => write!(f, "{}", x),
            MObject::Bool(x) => write!(f, "{}", x),
            MObject::Str(x) => write!(f, "{}", x),
            MObject::Null => write!(f, "null"),
            MObject::Array(x) => write!(f, "{}", x),
            MObject::Hash(x) => write!(f, "{}", x),
            MObject::Fn(x) => write!(f, "{}", x),
            MObject::Builtin(x) => write!(f, "{}", x),
            MObject::Return(x) => write!(f, "{}", x),
            MObject::Err(x) => write!(f, "{}", x),
            MObject::Macro(x) => write!(f, "{}", x),
            MObject::Quote(x) => write!(f, "{}", x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{interpreter::environment::Environment, test_utils::*};

    fn str_obj(s: &str) -> MObject {
        MObject::Str(MString { value: s.to_string() })
    }

    #[test]
    fn test_string_hash_key() {
        let hello1 = str_obj("Hello World");
        let hello2 = str_obj("Hello World");
        let diff = str_obj("My name is johnny");

        assert_eq!(hello1.hash_key(), hello2.hash_key());
        assert_ne!(hello1.hash_key(), diff.hash_key());
    }

    #[test]
    fn test_hash_key_carries_kind() {
        assert_ne!(i_to_o(1).hash_key(), TRUE.hash_key());
        assert_ne!(i_to_o(1).hash_key(), str_obj("1").hash_key());
        assert_eq!(Some(HashKey::Bool(Boolean { value: false })), FALSE.hash_key());
    }

    #[test]
    fn test_unhashable_kinds() {
        let array = new_array(vec![i_to_o(1)]);

        assert_eq!(None, array.hash_key());
        assert_eq!(None, NULL.hash_key());
        assert_eq!(None, mhash![].hash_key());
        assert_eq!(None, new_error("boom".to_string()).hash_key());
    }

    #[test]
    fn test_truthiness() {
        assert!(!NULL.is_truthy());
        assert!(!FALSE.is_truthy());
        assert!(TRUE.is_truthy());
        assert!(i_to_o(0).is_truthy());
        assert!(str_obj("").is_truthy());
        assert!(new_array(vec![]).is_truthy());
    }

    #[test]
    fn test_identity_versus_structure() {
        let a = new_array(vec![i_to_o(1), i_to_o(2)]);
        let b = new_array(vec![i_to_o(1), i_to_o(2)]);

        assert_eq!(a, b);
        assert!(!a.is_identical(&b));
        assert!(a.is_identical(&a.clone()));

        assert!(i_to_o(3).is_identical(&i_to_o(3)));
        assert!(str_obj("x").is_identical(&str_obj("x")));
        assert!(NULL.is_identical(&NULL));
        assert!(!NULL.is_identical(&FALSE));
    }

    #[test]
    fn test_function_compares_env_by_identity() {
        let env = Environment::new();
        let func = Function {
            params: vec![],
            body: ast::BlockStatement {
                token: crate::lexer::token::Token::new(
                    crate::lexer::token_type::TokenType::LBRACE,
                    "{".to_string(),
                ),
                stmts: vec![],
            },
            env: env.clone(),
        };
        let same_env = func.clone();
        let other_env = Function { env: Environment::new(), ..func.clone() };

        assert_eq!(func, same_env);
        assert_ne!(func, other_env);
    }

    #[test]
    fn test_inspect() {
        let tests = vec![
            (i_to_o(-7), "-7"),
            (TRUE, "true"),
            (NULL, "null"),
            (str_obj("plain"), "plain"),
            (new_array(vec![i_to_o(1), str_obj("two"), NULL]), "[1, \"two\", null]"),
            (mhash![(str_obj("a"), i_to_o(1))], "{\"a\": 1}"),
            (mhash![(i_to_o(2), TRUE), (i_to_o(1), FALSE)], "{1: false, 2: true}"),
            (new_error("boom".to_string()), "ERROR: boom"),
            (MObject::Return(ReturnValue { value: Box::new(i_to_o(4)) }), "4"),
            (MObject::Quote(Rc::new(Quote { node: i_to_expr(5) })), "QUOTE(5)"),
        ];

        for (obj, expected) in tests {
            assert_eq!(expected, format!("{}", obj));
        }
    }

    #[test]
    fn test_type_names() {
        assert_eq!("INTEGER", i_to_o(1).type_name());
        assert_eq!("STRING", str_obj("").type_name());
        assert_eq!("ARRAY", new_array(vec![]).type_name());
        assert_eq!("HASH", mhash![].type_name());
        assert_eq!("ERROR", new_error(String::new()).type_name());
    }
}
