// src/shared/mod.rs

pub mod erros;
pub mod persistencia;
#[cfg(test)]
pub mod persistencia_memoria;
pub mod persistencia_postgres;
pub mod shared_structs;
pub mod telemetria;
