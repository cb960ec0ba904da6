// src/vendas/vendas_service.rs

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use futures::FutureExt;
use tracing::{info, instrument, warn};

use super::vendas_structs::{ItemCompra, ItemRecibo, Recibo};
use crate::produtos::estoque_service::{buscar_por_ids, decrementar_em_lote, ids_ausentes};
use crate::produtos::produtos_structs::Produto;
use crate::shared::erros::{ErroApp, ResultadoApp};
use crate::shared::persistencia::{executar_em_transacao, Armazem};
use crate::usuarios::deposito_service::debitar;

/// Rejeita pedidos vazios, quantidades não positivas e produtos repetidos.
pub fn validar_pedido(itens: &[ItemCompra]) -> ResultadoApp<()> {
    if itens.is_empty() {
        return Err(ErroApp::requisicao_invalida("o pedido precisa de ao menos um item"));
    }

    let mut vistos = HashSet::with_capacity(itens.len());
    for item in itens {
        if item.quantidade <= 0 {
            return Err(ErroApp::requisicao_invalida(format!(
                "quantidade inválida para o produto {}",
                item.produto_id
            )));
        }
        if !vistos.insert(item.produto_id) {
            return Err(ErroApp::requisicao_invalida(format!(
                "produto {} repetido no pedido",
                item.produto_id
            )));
        }
    }
    Ok(())
}

/// Σ preço × quantidade em centavos, com aritmética verificada.
pub fn calcular_total(produtos: &HashMap<i32, Produto>, itens: &[ItemCompra]) -> ResultadoApp<i64> {
    itens.iter().try_fold(0i64, |total, item| {
        let produto = produtos
            .get(&item.produto_id)
            .ok_or_else(|| ErroApp::ProdutoNaoEncontrado(vec![item.produto_id]))?;

        produto
            .preco
            .checked_mul(i64::from(item.quantidade))
            .and_then(|subtotal| total.checked_add(subtotal))
            .ok_or(ErroApp::EstouroAritmetico)
    })
}

/// Realiza a compra de `itens` pelo comprador `comprador_id`.
///
/// Passos:
/// 1. Valida o pedido e resolve todos os produtos numa busca em lote.
/// 2. Calcula o total em centavos.
/// 3. Confere o depósito atual (verificação rápida, apenas consultiva).
/// 4. Numa única transação: debita o comprador e decrementa o estoque de
///    todos os itens, relendo tudo com bloqueio. Qualquer falha desfaz tudo.
/// 5. Monta o recibo a partir do que foi efetivado.
#[instrument(skip(armazem, itens, limite), fields(itens = itens.len()))]
pub async fn comprar<A: Armazem>(
    armazem: &A,
    comprador_id: i32,
    itens: &[ItemCompra],
    limite: Duration,
) -> ResultadoApp<Recibo> {
    validar_pedido(itens)?;

    let ids: Vec<i32> = itens.iter().map(|i| i.produto_id).collect();
    let produtos = buscar_por_ids(armazem, &ids).await?;
    let faltando = ids_ausentes(&ids, &produtos);
    if !faltando.is_empty() {
        return Err(ErroApp::ProdutoNaoEncontrado(faltando));
    }
    let por_id: HashMap<i32, Produto> = produtos.into_iter().map(|p| (p.id, p)).collect();

    let total = calcular_total(&por_id, itens)?;

    let deposito = armazem
        .buscar_deposito(comprador_id)
        .await?
        .ok_or(ErroApp::ContaNaoEncontrada(comprador_id))?;
    if deposito < total {
        return Err(ErroApp::SaldoInsuficiente { necessario: total, disponivel: deposito });
    }

    let baixas: Vec<(i32, i32)> = itens.iter().map(|i| (i.produto_id, i.quantidade)).collect();
    let resultado = executar_em_transacao(armazem, limite, move |tx| {
        async move {
            let restante = debitar(tx, comprador_id, total).await?;
            decrementar_em_lote(tx, &baixas).await?;
            Ok(restante)
        }
        .boxed()
    })
    .await;

    let deposito_restante = match resultado {
        Ok(restante) => restante,
        Err(erro) => {
            warn!(error = %erro, total, retentavel = erro.eh_transitorio(), "compra desfeita");
            return Err(erro);
        }
    };

    let itens_recibo = itens
        .iter()
        .map(|item| ItemRecibo {
            id: item.produto_id,
            nome_produto: por_id[&item.produto_id].nome.clone(),
            quantidade_comprada: item.quantidade,
        })
        .collect();

    info!(total, deposito_restante, "compra concluída");

    Ok(Recibo {
        total_gasto: total,
        itens: itens_recibo,
        deposito_restante,
    })
}
