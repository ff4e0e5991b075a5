/// Builds an `MObject::Hash` from `(key, value)` pairs. Panics on a key kind
/// that cannot be hashed.
#[macro_export]
macro_rules! mhash {
    () => ({
        $crate::interpreter::object::MObject::Hash(
            std::rc::Rc::new(
                $crate::interpreter::object::MHash {
                    pairs: std::collections::HashMap::new()
                }
            )
        )
    });

    ( $( ($k:expr, $v:expr) ),*) => ({
        let mut pairs = std::collections::HashMap::new();

        $(
            let key: $crate::interpreter::object::MObject = $k;
            let hash_key = match key.hash_key() {
                Some(hash_key) => hash_key,
                None => panic!("Expected key to be Int, Str, or Bool. Got: {:?}", key),
            };

            let pair = $crate::interpreter::object::HashPair {
                key,
                value: $v,
            };

            pairs.insert(hash_key, pair);
        )*

        $crate::interpreter::object::MObject::Hash(
            std::rc::Rc::new(
                $crate::interpreter::object::MHash {
                    pairs,
                }
            )
        )
    });

    ( $( ($k:expr, $v:expr) ),* ,) => ({
        $crate::mhash![ $( ($k, $v) ), * ]
    });
}
