// src/produtos/mod.rs

// Declara o submódulo que contém as definições das structs de produtos
pub mod produtos_structs;
// Declara o submódulo com as rotas de produtos
pub mod produtos_router;
// Registro de estoque usado pela compra
pub mod estoque_service;
