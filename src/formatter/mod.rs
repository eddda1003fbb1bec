pub mod type_expr;

pub use type_expr::stringify_type;
