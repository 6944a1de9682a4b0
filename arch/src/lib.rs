pub mod op;
pub mod reg;
