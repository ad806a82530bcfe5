pub mod vars;

pub use vars::{load_variables, parse_variables, VariableSet};
