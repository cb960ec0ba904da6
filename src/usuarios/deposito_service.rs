// src/usuarios/deposito_service.rs

use std::time::Duration;

use futures::FutureExt;
use tracing::info;

use crate::shared::erros::{ErroApp, ResultadoApp};
use crate::shared::persistencia::{executar_em_transacao, Armazem, Transacao};

/// Debita `valor` centavos do depósito do usuário dentro da transação `tx`.
///
/// O saldo é relido com bloqueio, então um gasto concorrente que já consumiu
/// o depósito faz esta chamada falhar com `SaldoInsuficiente`.
/// Retorna o novo saldo.
pub async fn debitar<T: Transacao>(tx: &mut T, usuario_id: i32, valor: i64) -> ResultadoApp<i64> {
    if valor < 0 {
        return Err(ErroApp::requisicao_invalida("o valor do débito não pode ser negativo"));
    }

    let atual = tx
        .buscar_deposito(usuario_id)
        .await?
        .ok_or(ErroApp::ContaNaoEncontrada(usuario_id))?;

    if atual < valor {
        return Err(ErroApp::SaldoInsuficiente { necessario: valor, disponivel: atual });
    }

    let novo = atual - valor;
    tx.gravar_deposito(usuario_id, novo).await?;
    Ok(novo)
}

/// Credita `valor` centavos. Não há teto: quem chama restringe as moedas aceitas.
pub async fn creditar<T: Transacao>(tx: &mut T, usuario_id: i32, valor: i64) -> ResultadoApp<i64> {
    if valor < 0 {
        return Err(ErroApp::requisicao_invalida("o valor do crédito não pode ser negativo"));
    }

    let atual = tx
        .buscar_deposito(usuario_id)
        .await?
        .ok_or(ErroApp::ContaNaoEncontrada(usuario_id))?;

    let novo = atual.checked_add(valor).ok_or(ErroApp::EstouroAritmetico)?;
    tx.gravar_deposito(usuario_id, novo).await?;
    Ok(novo)
}

/// Zera o depósito do usuário.
pub async fn zerar<T: Transacao>(tx: &mut T, usuario_id: i32) -> ResultadoApp<()> {
    tx.buscar_deposito(usuario_id)
        .await?
        .ok_or(ErroApp::ContaNaoEncontrada(usuario_id))?;

    tx.gravar_deposito(usuario_id, 0).await
}

/// Depósito avulso: crédito na sua própria transação.
pub async fn depositar<A: Armazem>(
    armazem: &A,
    usuario_id: i32,
    centavos: i64,
    limite: Duration,
) -> ResultadoApp<i64> {
    let novo = executar_em_transacao(armazem, limite, move |tx| {
        async move { creditar(tx, usuario_id, centavos).await }.boxed()
    })
    .await?;

    info!(usuario_id, centavos, deposito = novo, "depósito realizado");
    Ok(novo)
}

pub async fn resetar<A: Armazem>(armazem: &A, usuario_id: i32, limite: Duration) -> ResultadoApp<()> {
    executar_em_transacao(armazem, limite, move |tx| {
        async move { zerar(tx, usuario_id).await }.boxed()
    })
    .await?;

    info!(usuario_id, "depósito zerado");
    Ok(())
}
