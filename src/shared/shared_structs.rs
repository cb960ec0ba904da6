// src/shared/shared_structs.rs

use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};

use super::erros::{ErroApp, ResultadoApp};

/// Estrutura genérica para padronizar as respostas da API.
/// 'T' é o tipo do corpo da resposta, que pode ser opcional.
#[derive(Serialize)]
pub struct GenericResponse<T> {
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")] // Não serializa 'body' se for None
    pub body: Option<T>,
}

impl<T: Serialize> GenericResponse<T> {
    /// Monta uma resposta 200 de sucesso com corpo.
    pub fn sucesso(message: impl Into<String>, body: T) -> HttpResponse {
        HttpResponse::Ok().json(GenericResponse {
            status: "success".to_string(),
            message: message.into(),
            body: Some(body),
        })
    }
}

/// Resposta 200 de sucesso sem corpo.
pub fn sucesso_sem_corpo(message: impl Into<String>) -> HttpResponse {
    HttpResponse::Ok().json(GenericResponse::<()> {
        status: "success".to_string(),
        message: message.into(),
        body: None,
    })
}

/// Metadados de paginação das listagens.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Paginacao {
    pub total: i64,
    pub page: i64,
    #[serde(rename = "lastPage")]
    pub last_page: i64,
}

impl Paginacao {
    pub fn new(total: i64, page: i64, limit: i64) -> Self {
        let last_page = if limit > 0 { (total + limit - 1) / limit } else { 0 };
        Self { total, page, last_page }
    }
}

/// Parâmetros de paginação das listagens (`?page=&limit=`).
#[derive(Debug, Deserialize)]
pub struct ConsultaPagina {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl ConsultaPagina {
    /// Página (>= 1), limite (1..=100, padrão 10) e o OFFSET correspondente.
    /// Uma página tão alta que o OFFSET não cabe em i64 é requisição inválida.
    pub fn normalizar(&self) -> ResultadoApp<(i64, i64, i64)> {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self.limit.unwrap_or(10).clamp(1, 100);
        let offset = (page - 1)
            .checked_mul(limit)
            .ok_or_else(|| ErroApp::requisicao_invalida(format!("página {page} fora do intervalo")))?;
        Ok((page, limit, offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ultima_pagina_arredonda_para_cima() {
        assert_eq!(Paginacao::new(21, 1, 10).last_page, 3);
        assert_eq!(Paginacao::new(20, 2, 10).last_page, 2);
        assert_eq!(Paginacao::new(0, 1, 10).last_page, 0);
    }

    #[test]
    fn paginacao_usa_padroes_e_limites() {
        let consulta = ConsultaPagina { page: None, limit: None };
        assert_eq!(consulta.normalizar().unwrap(), (1, 10, 0));

        let consulta = ConsultaPagina { page: Some(0), limit: Some(1000) };
        assert_eq!(consulta.normalizar().unwrap(), (1, 100, 0));

        let consulta = ConsultaPagina { page: Some(3), limit: Some(20) };
        assert_eq!(consulta.normalizar().unwrap(), (3, 20, 40));
    }

    #[test]
    fn pagina_gigante_e_rejeitada_sem_estourar() {
        let consulta = ConsultaPagina { page: Some(i64::MAX), limit: Some(100) };
        assert!(matches!(consulta.normalizar(), Err(ErroApp::RequisicaoInvalida(_))));
    }
}
