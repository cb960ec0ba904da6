// src/vendas/vendas_router.rs

use actix_web::{post, web, HttpResponse};

// Importa o AppState do módulo raiz (main.rs)
use crate::AppState;
use crate::shared::erros::ErroApp;
use crate::shared::shared_structs::GenericResponse;
use crate::usuarios::auth_middleware::Comprador;
use super::vendas_service::comprar;
use super::vendas_structs::PedidoCompra;

/// Rota para o comprador comprar um conjunto de produtos.
///
/// O débito do depósito e a baixa de estoque acontecem numa única transação
/// (ver `vendas_service::comprar`); em caso de erro nada é alterado e o
/// corpo da resposta descreve o motivo.
#[post("/comprar")]
pub async fn realizar_compra(
    data: web::Data<AppState>,
    comprador: Comprador,
    pedido: web::Json<PedidoCompra>,
) -> Result<HttpResponse, ErroApp> {
    let recibo = comprar(&data.armazem, comprador.0.user_id, &pedido.itens, data.limite_transacao).await?;

    Ok(GenericResponse::sucesso("Compra realizada com sucesso!", recibo))
}
