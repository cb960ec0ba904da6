// src/produtos/estoque_service.rs

use std::collections::HashMap;
use std::time::Duration;

use futures::FutureExt;
use tracing::info;

use super::produtos_structs::Produto;
use crate::shared::erros::{ErroApp, ResultadoApp};
use crate::shared::persistencia::{executar_em_transacao, Armazem, Transacao};

/// Busca em lote os produtos existentes entre `ids`.
///
/// Ids inexistentes simplesmente não aparecem no resultado; quem chama
/// compara as contagens para descobrir o que falta.
pub async fn buscar_por_ids<A: Armazem>(armazem: &A, ids: &[i32]) -> ResultadoApp<Vec<Produto>> {
    armazem.buscar_produtos(ids).await
}

/// Ids de `pedidos` que não aparecem em `encontrados`, sem repetição e na ordem pedida.
pub fn ids_ausentes(pedidos: &[i32], encontrados: &[Produto]) -> Vec<i32> {
    let mut ausentes: Vec<i32> = Vec::new();
    for id in pedidos {
        if !encontrados.iter().any(|p| p.id == *id) && !ausentes.contains(id) {
            ausentes.push(*id);
        }
    }
    ausentes
}

/// Decrementa o estoque de todos os `(produto_id, quantidade)` dentro de `tx`.
///
/// Tudo ou nada: o estoque de cada item é relido com bloqueio e verificado
/// antes de qualquer escrita. Se um único item não couber, nenhum
/// decremento é aplicado.
pub async fn decrementar_em_lote<T: Transacao>(tx: &mut T, itens: &[(i32, i32)]) -> ResultadoApp<()> {
    if itens.iter().any(|(_, quantidade)| *quantidade <= 0) {
        return Err(ErroApp::requisicao_invalida("a quantidade deve ser maior que zero"));
    }

    let ids: Vec<i32> = itens.iter().map(|(id, _)| *id).collect();
    let atuais = tx.buscar_produtos(&ids).await?;

    let faltando = ids_ausentes(&ids, &atuais);
    if !faltando.is_empty() {
        return Err(ErroApp::ProdutoNaoEncontrado(faltando));
    }

    let estoque: HashMap<i32, i32> = atuais.iter().map(|p| (p.id, p.estoque)).collect();

    // 1. verifica todos
    for (produto_id, quantidade) in itens {
        let disponivel = estoque[produto_id];
        if disponivel < *quantidade {
            return Err(ErroApp::EstoqueInsuficiente {
                produto_id: *produto_id,
                disponivel,
                solicitado: *quantidade,
            });
        }
    }

    // 2. aplica todos
    for (produto_id, quantidade) in itens {
        tx.gravar_estoque(*produto_id, estoque[produto_id] - quantidade).await?;
    }

    Ok(())
}

/// Soma `quantidade` ao estoque atual, relido com bloqueio dentro de `tx`.
///
/// Só o vendedor dono pode repor. Como o incremento é sobre o valor travado,
/// uma compra concorrente nunca tem sua baixa sobrescrita.
pub async fn repor<T: Transacao>(
    tx: &mut T,
    vendedor_id: i32,
    produto_id: i32,
    quantidade: i32,
) -> ResultadoApp<i32> {
    if quantidade <= 0 {
        return Err(ErroApp::requisicao_invalida("a reposição deve ser maior que zero"));
    }

    let produto = tx
        .buscar_produtos(&[produto_id])
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| ErroApp::ProdutoNaoEncontrado(vec![produto_id]))?;

    if produto.vendedor_id != vendedor_id {
        return Err(ErroApp::AcessoNegado("Você não pode alterar este produto".to_string()));
    }

    let novo = produto.estoque.checked_add(quantidade).ok_or(ErroApp::EstouroAritmetico)?;
    tx.gravar_estoque(produto_id, novo).await?;
    Ok(novo)
}

/// Reposição avulsa na sua própria transação.
pub async fn repor_estoque<A: Armazem>(
    armazem: &A,
    vendedor_id: i32,
    produto_id: i32,
    quantidade: i32,
    limite: Duration,
) -> ResultadoApp<i32> {
    let novo = executar_em_transacao(armazem, limite, move |tx| {
        async move { repor(tx, vendedor_id, produto_id, quantidade).await }.boxed()
    })
    .await?;

    info!(produto_id, vendedor_id, quantidade, estoque = novo, "estoque reposto");
    Ok(novo)
}
