// commonly used modules
pub use crate::{expression, function, inner_type_def, state, value};

// commonly used top-level crate types
pub use crate::{Error, Expr, Expression, Function, InnerTypeDef, Object, Result, TypeDef, Value};

// commonly used expressions
pub use crate::expression::{Array, Literal, Map, Noop, Path, Variable};

// commonly used function types
pub use crate::function::{ArgumentList, Parameter};

// commonly used macros
pub use crate::generate_param_list;

// test helpers
pub use crate::{array, bench_function, func_args, lit, map, test_function, test_type_def};
