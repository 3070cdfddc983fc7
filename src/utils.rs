#[macro_export]
macro_rules! const_try {
    ($e:expr) => {{
        let raw = $e;
        match raw {
            Ok(val) => val,
            Err(e) => {
                return Err(e);
            }
        }
    }};
}

/// Euclidean remainder that is usable in `const` contexts.
pub const fn wrap(value: i32, modulus: i32) -> i32 {
    let rem = value % modulus;
    if rem < 0 {
        rem + modulus
    } else {
        rem
    }
}
