/// Propagates a `Result<T, E>` failure out of a function returning
/// `Option<Result<T, E>>`, yielding the `Ok` value otherwise.
///
/// Intended for `next()` implementations of an `Iterator<Item = Result<T, E>>`
/// that call fallible helpers: an `Err(e)` becomes an early
/// `return Some(Err(e))` from the enclosing function.
#[macro_export]
macro_rules! try_some {
    ($expr:expr) => {
        match $expr {
            Ok(value) => value,
            Err(err) => {
                return Some(Err(err));
            }
        }
    };
}
