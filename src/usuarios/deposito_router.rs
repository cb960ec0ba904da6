// src/usuarios/deposito_router.rs

use actix_web::{post, web, HttpResponse};

use super::auth_middleware::Comprador;
use super::deposito_service::{depositar, resetar};
use super::usuario_structs::Deposito;
use crate::shared::erros::ErroApp;
use crate::shared::shared_structs::{sucesso_sem_corpo, GenericResponse};
use crate::AppState;

/// Moedas aceitas pela máquina, em centavos.
pub const MOEDAS_ACEITAS: [i64; 5] = [5, 10, 20, 50, 100];

/// A restrição de moedas é desta camada; o serviço de depósito aceita qualquer valor não negativo.
pub fn validar_moeda(centavos: i64) -> Result<(), ErroApp> {
    if MOEDAS_ACEITAS.contains(&centavos) {
        Ok(())
    } else {
        Err(ErroApp::requisicao_invalida(format!(
            "moeda de {centavos} centavos não aceita; use uma de {MOEDAS_ACEITAS:?}"
        )))
    }
}

/// Rota para o comprador depositar uma moeda.
#[post("/deposito")]
pub async fn depositar_moeda(
    data: web::Data<AppState>,
    comprador: Comprador,
    deposito: web::Json<Deposito>,
) -> Result<HttpResponse, ErroApp> {
    validar_moeda(deposito.cents)?;

    let novo = depositar(&data.armazem, comprador.0.user_id, deposito.cents, data.limite_transacao).await?;

    Ok(GenericResponse::sucesso(
        format!("Depósito de {} centavos realizado", deposito.cents),
        serde_json::json!({ "deposit": novo }),
    ))
}

/// Rota para zerar o depósito do comprador.
#[post("/deposito/reset")]
pub async fn resetar_deposito(
    data: web::Data<AppState>,
    comprador: Comprador,
) -> Result<HttpResponse, ErroApp> {
    resetar(&data.armazem, comprador.0.user_id, data.limite_transacao).await?;
    Ok(sucesso_sem_corpo("Depósito zerado com sucesso"))
}
