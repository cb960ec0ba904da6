// src/produtos/produtos_router.rs

use actix_web::{delete, get, post, put, web, HttpResponse};
use sqlx::{query_as, query_scalar};
use tracing::info;

// Importa as structs definidas no módulo `produtos_structs` dentro da mesma pasta `produtos`
use super::estoque_service;
use super::produtos_structs::{AtualizacaoProduto, ListaProdutos, NovoProduto, Produto, Reposicao};
use crate::shared::erros::ErroApp;
use crate::shared::shared_structs::{sucesso_sem_corpo, ConsultaPagina, GenericResponse, Paginacao};
use crate::usuarios::auth_middleware::Vendedor;
// Importa o AppState do módulo raiz (main.rs)
use crate::AppState;

/// Rota para listar os produtos, paginada por `page` e `limit`.
#[get("/produtos")]
pub async fn buscar_produtos(
    data: web::Data<AppState>,
    consulta: web::Query<ConsultaPagina>,
) -> Result<HttpResponse, ErroApp> {
    let (page, limit, offset) = consulta.normalizar()?;

    let produtos = query_as::<_, Produto>(
        "SELECT id, vendedor_id, nome, preco, estoque FROM produtos ORDER BY id LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(&data.db_pool)
    .await?;

    let total = query_scalar::<_, i64>("SELECT COUNT(*) FROM produtos")
        .fetch_one(&data.db_pool)
        .await?;

    Ok(GenericResponse::sucesso(
        "Produtos encontrados",
        ListaProdutos { data: produtos, meta: Paginacao::new(total, page, limit) },
    ))
}

/// Rota para buscar um produto pelo ID.
#[get("/produtos/{id}")]
pub async fn buscar_produto_por_id(
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ErroApp> {
    let id = path.into_inner();

    let produto = query_as::<_, Produto>(
        "SELECT id, vendedor_id, nome, preco, estoque FROM produtos WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&data.db_pool)
    .await?
    .ok_or_else(|| ErroApp::ProdutoNaoEncontrado(vec![id]))?;

    Ok(GenericResponse::sucesso("Produto encontrado", produto))
}

/// Rota para o vendedor cadastrar um produto. O dono é o vendedor do token.
#[post("/produtos")]
pub async fn cadastrar_produto(
    data: web::Data<AppState>,
    vendedor: Vendedor,
    item: web::Json<NovoProduto>,
) -> Result<HttpResponse, ErroApp> {
    item.validar()?;

    let id = query_scalar::<_, i32>(
        "INSERT INTO produtos (vendedor_id, nome, preco, estoque) VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(vendedor.0.user_id)
    .bind(&item.nome)
    .bind(item.preco)
    .bind(item.estoque)
    .fetch_one(&data.db_pool)
    .await?;

    info!(produto_id = id, vendedor_id = vendedor.0.user_id, "produto cadastrado");
    Ok(GenericResponse::sucesso("Produto cadastrado com sucesso", serde_json::json!({ "id": id })))
}

/// Distingue "não existe" de "é de outro vendedor" depois de um UPDATE/DELETE sem linhas afetadas.
async fn erro_de_posse(data: &AppState, id: i32) -> ErroApp {
    match query_scalar::<_, i32>("SELECT vendedor_id FROM produtos WHERE id = $1")
        .bind(id)
        .fetch_optional(&data.db_pool)
        .await
    {
        Ok(Some(_)) => ErroApp::AcessoNegado("Você não pode alterar este produto".to_string()),
        Ok(None) => ErroApp::ProdutoNaoEncontrado(vec![id]),
        Err(e) => e.into(),
    }
}

/// Rota para o vendedor dono atualizar nome e preço de um produto.
#[put("/produtos/{id}")]
pub async fn atualizar_produto(
    data: web::Data<AppState>,
    vendedor: Vendedor,
    path: web::Path<i32>,
    item: web::Json<AtualizacaoProduto>,
) -> Result<HttpResponse, ErroApp> {
    let id = path.into_inner();
    item.validar()?;

    // A condição de dono fica no próprio UPDATE. O estoque não é tocado aqui.
    let resultado = sqlx::query(
        "UPDATE produtos SET nome = $1, preco = $2 WHERE id = $3 AND vendedor_id = $4",
    )
    .bind(&item.nome)
    .bind(item.preco)
    .bind(id)
    .bind(vendedor.0.user_id)
    .execute(&data.db_pool)
    .await?;

    if resultado.rows_affected() == 0 {
        return Err(erro_de_posse(&data, id).await);
    }

    info!(produto_id = id, "produto atualizado");
    Ok(sucesso_sem_corpo("Produto atualizado com sucesso"))
}

/// Rota para o vendedor dono repor estoque. Soma sobre o valor travado,
/// na mesma disciplina de transação das compras.
#[post("/produtos/{id}/estoque")]
pub async fn repor_estoque(
    data: web::Data<AppState>,
    vendedor: Vendedor,
    path: web::Path<i32>,
    corpo: web::Json<Reposicao>,
) -> Result<HttpResponse, ErroApp> {
    let id = path.into_inner();

    let estoque = estoque_service::repor_estoque(
        &data.armazem,
        vendedor.0.user_id,
        id,
        corpo.quantidade,
        data.limite_transacao,
    )
    .await?;

    Ok(GenericResponse::sucesso(
        "Estoque reposto com sucesso",
        serde_json::json!({ "id": id, "estoque": estoque }),
    ))
}

/// Rota para o vendedor dono remover um produto.
#[delete("/produtos/{id}")]
pub async fn deletar_produto(
    data: web::Data<AppState>,
    vendedor: Vendedor,
    path: web::Path<i32>,
) -> Result<HttpResponse, ErroApp> {
    let id = path.into_inner();

    let resultado = sqlx::query("DELETE FROM produtos WHERE id = $1 AND vendedor_id = $2")
        .bind(id)
        .bind(vendedor.0.user_id)
        .execute(&data.db_pool)
        .await?;

    if resultado.rows_affected() == 0 {
        return Err(erro_de_posse(&data, id).await);
    }

    info!(produto_id = id, "produto removido");
    Ok(sucesso_sem_corpo("Produto removido com sucesso"))
}
