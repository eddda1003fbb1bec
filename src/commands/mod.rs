mod parse;
mod tokenize;
mod type_expr;

pub use parse::*;
pub use tokenize::*;
pub use type_expr::*;
