// src/shared/persistencia_postgres.rs

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Transaction};

use super::erros::{ErroApp, ResultadoApp};
use super::persistencia::{Armazem, Transacao};
use crate::produtos::produtos_structs::Produto;

/// Armazém sobre o pool PostgreSQL.
///
/// As leituras dentro da transação usam `FOR UPDATE`, então duas compras
/// disputando o mesmo produto ou a mesma conta se enfileiram na linha em vez
/// de lerem o mesmo valor antigo.
#[derive(Clone)]
pub struct ArmazemPostgres {
    pool: Pool<Postgres>,
}

impl ArmazemPostgres {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

pub struct TransacaoPostgres {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl Transacao for TransacaoPostgres {
    async fn buscar_deposito(&mut self, usuario_id: i32) -> ResultadoApp<Option<i64>> {
        let deposito = sqlx::query_scalar::<_, i64>(
            "SELECT deposito FROM usuarios WHERE id = $1 FOR UPDATE",
        )
        .bind(usuario_id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(deposito)
    }

    async fn gravar_deposito(&mut self, usuario_id: i32, novo_deposito: i64) -> ResultadoApp<()> {
        let resultado = sqlx::query("UPDATE usuarios SET deposito = $1 WHERE id = $2")
            .bind(novo_deposito)
            .bind(usuario_id)
            .execute(&mut *self.tx)
            .await?;

        if resultado.rows_affected() == 0 {
            return Err(ErroApp::ContaNaoEncontrada(usuario_id));
        }
        Ok(())
    }

    async fn buscar_produtos(&mut self, ids: &[i32]) -> ResultadoApp<Vec<Produto>> {
        // ORDER BY id: todas as transações travam as linhas na mesma ordem (sem deadlock).
        let produtos = sqlx::query_as::<_, Produto>(
            "SELECT id, vendedor_id, nome, preco, estoque FROM produtos \
             WHERE id = ANY($1) ORDER BY id FOR UPDATE",
        )
        .bind(ids)
        .fetch_all(&mut *self.tx)
        .await?;

        Ok(produtos)
    }

    async fn gravar_estoque(&mut self, produto_id: i32, novo_estoque: i32) -> ResultadoApp<()> {
        let resultado = sqlx::query("UPDATE produtos SET estoque = $1 WHERE id = $2")
            .bind(novo_estoque)
            .bind(produto_id)
            .execute(&mut *self.tx)
            .await?;

        if resultado.rows_affected() == 0 {
            return Err(ErroApp::ProdutoNaoEncontrado(vec![produto_id]));
        }
        Ok(())
    }

    async fn commit(self) -> ResultadoApp<()> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> ResultadoApp<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}

#[async_trait]
impl Armazem for ArmazemPostgres {
    type Tx = TransacaoPostgres;

    async fn iniciar(&self) -> ResultadoApp<TransacaoPostgres> {
        let tx = self.pool.begin().await?;
        Ok(TransacaoPostgres { tx })
    }

    async fn buscar_produtos(&self, ids: &[i32]) -> ResultadoApp<Vec<Produto>> {
        let produtos = sqlx::query_as::<_, Produto>(
            "SELECT id, vendedor_id, nome, preco, estoque FROM produtos WHERE id = ANY($1) ORDER BY id",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(produtos)
    }

    async fn buscar_deposito(&self, usuario_id: i32) -> ResultadoApp<Option<i64>> {
        let deposito = sqlx::query_scalar::<_, i64>("SELECT deposito FROM usuarios WHERE id = $1")
            .bind(usuario_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(deposito)
    }
}
