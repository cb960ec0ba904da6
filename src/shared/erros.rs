// src/shared/erros.rs

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use super::shared_structs::GenericResponse;

/// Resultado padrão usado pelos serviços da aplicação.
pub type ResultadoApp<T> = Result<T, ErroApp>;

/// Erros da aplicação.
///
/// Cada variante carrega o id ofendido quando existe, para que a camada HTTP
/// monte uma mensagem precisa sem precisar reconsultar o banco.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ErroApp {
    /// Um ou mais produtos referenciados não existem.
    #[error("produto(s) não encontrado(s): {0:?}")]
    ProdutoNaoEncontrado(Vec<i32>),

    /// A conta do usuário não existe.
    #[error("conta {0} não encontrada")]
    ContaNaoEncontrada(i32),

    #[error("depósito insuficiente: necessário {necessario}, disponível {disponivel}")]
    SaldoInsuficiente { necessario: i64, disponivel: i64 },

    #[error("estoque insuficiente para o produto {produto_id}: disponível {disponivel}, solicitado {solicitado}")]
    EstoqueInsuficiente {
        produto_id: i32,
        disponivel: i32,
        solicitado: i32,
    },

    /// Pedido malformado (lista vazia, quantidade não positiva, id repetido...).
    #[error("requisição inválida: {0}")]
    RequisicaoInvalida(String),

    /// O custo total não cabe em centavos i64.
    #[error("estouro aritmético ao calcular valores")]
    EstouroAritmetico,

    /// Contenção ou timeout na unidade de trabalho. A chamada inteira pode ser repetida.
    #[error("falha transitória do armazenamento: {0}")]
    Transitorio(String),

    #[error("falha interna do armazenamento: {0}")]
    Armazenamento(String),

    #[error("não autenticado: {0}")]
    NaoAutenticado(String),

    #[error("acesso negado: {0}")]
    AcessoNegado(String),

    #[error("conflito: {0}")]
    Conflito(String),

    #[error("erro interno: {0}")]
    Interno(String),
}

impl ErroApp {
    pub fn requisicao_invalida(msg: impl Into<String>) -> Self {
        Self::RequisicaoInvalida(msg.into())
    }

    /// Somente falhas transitórias podem ser repetidas às cegas.
    pub fn eh_transitorio(&self) -> bool {
        matches!(self, Self::Transitorio(_))
    }
}

/// Converte erros do sqlx separando o que é contenção/timeout (repetível)
/// do que é falha definitiva.
impl From<sqlx::Error> for ErroApp {
    fn from(erro: sqlx::Error) -> Self {
        match &erro {
            sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) | sqlx::Error::PoolClosed => {
                Self::Transitorio(erro.to_string())
            }
            sqlx::Error::Database(db) => classificar_sqlstate(db.code().as_deref(), erro.to_string()),
            _ => Self::Armazenamento(erro.to_string()),
        }
    }
}

/// Classifica um erro do banco pelo SQLSTATE.
fn classificar_sqlstate(codigo: Option<&str>, mensagem: String) -> ErroApp {
    match codigo {
        // serialization_failure, deadlock_detected, lock_not_available
        Some("40001") | Some("40P01") | Some("55P03") => ErroApp::Transitorio(mensagem),
        // unique_violation: quem perdeu a corrida pelo mesmo e-mail
        Some("23505") => ErroApp::Conflito("registro duplicado".to_string()),
        _ => ErroApp::Armazenamento(mensagem),
    }
}

impl ResponseError for ErroApp {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::ProdutoNaoEncontrado(_) | Self::ContaNaoEncontrada(_) => StatusCode::NOT_FOUND,
            Self::SaldoInsuficiente { .. } | Self::EstoqueInsuficiente { .. } => StatusCode::CONFLICT,
            Self::Conflito(_) => StatusCode::CONFLICT,
            Self::RequisicaoInvalida(_) => StatusCode::BAD_REQUEST,
            Self::EstouroAritmetico => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Transitorio(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::NaoAutenticado(_) => StatusCode::UNAUTHORIZED,
            Self::AcessoNegado(_) => StatusCode::FORBIDDEN,
            Self::Armazenamento(_) | Self::Interno(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Detalhes de falhas internas ficam só no log.
        let message = match self {
            Self::Armazenamento(_) | Self::Interno(_) => "Erro interno do servidor.".to_string(),
            outro => outro.to_string(),
        };

        HttpResponse::build(self.status_code()).json(GenericResponse::<()> {
            status: "error".to_string(),
            message,
            body: None,
        })
    }
}
