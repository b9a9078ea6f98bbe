pub mod argparse;
pub mod commands;
pub mod filter_expr;
pub mod logger;
