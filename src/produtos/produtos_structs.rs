// src/produtos/produtos_structs.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::shared::erros::{ErroApp, ResultadoApp};

/// Estrutura que representa um produto no banco de dados.
/// Preço em centavos; estoque nunca negativo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Produto {
    pub id: i32,
    pub vendedor_id: i32,
    pub nome: String,
    pub preco: i64,
    pub estoque: i32,
}

/// Estrutura para receber dados do produto na requisição POST/PUT.
/// O vendedor vem sempre do token, nunca do corpo.
#[derive(Debug, Deserialize)]
pub struct NovoProduto {
    pub nome: String,
    pub preco: i64,
    pub estoque: i32,
}

impl NovoProduto {
    pub fn validar(&self) -> ResultadoApp<()> {
        if self.nome.trim().is_empty() {
            return Err(ErroApp::requisicao_invalida("o nome do produto é obrigatório"));
        }
        if self.preco <= 0 {
            return Err(ErroApp::requisicao_invalida("o preço deve ser positivo"));
        }
        if self.estoque < 0 {
            return Err(ErroApp::requisicao_invalida("o estoque não pode ser negativo"));
        }
        Ok(())
    }
}

/// Corpo do PUT: o vendedor altera nome e preço. O estoque só muda por
/// compra ou por reposição, nunca por sobrescrita.
#[derive(Debug, Deserialize)]
pub struct AtualizacaoProduto {
    pub nome: String,
    pub preco: i64,
}

impl AtualizacaoProduto {
    pub fn validar(&self) -> ResultadoApp<()> {
        if self.nome.trim().is_empty() {
            return Err(ErroApp::requisicao_invalida("o nome do produto é obrigatório"));
        }
        if self.preco <= 0 {
            return Err(ErroApp::requisicao_invalida("o preço deve ser positivo"));
        }
        Ok(())
    }
}

/// Corpo da reposição de estoque: unidades a somar.
#[derive(Debug, Deserialize)]
pub struct Reposicao {
    pub quantidade: i32,
}

/// Estrutura para a resposta da API ao listar produtos.
#[derive(Serialize)]
pub struct ListaProdutos {
    pub data: Vec<Produto>,
    pub meta: crate::shared::shared_structs::Paginacao,
}
