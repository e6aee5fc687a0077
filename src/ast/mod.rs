/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: Program root, metadata header, functions and parameters
/// - expressions: Expression nodes and operators
/// - statements: Statement nodes, blocks and assignment targets
/// - types: The type descriptor shared by the parser and the checker
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
