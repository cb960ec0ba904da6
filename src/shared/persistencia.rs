// src/shared/persistencia.rs

use std::time::Duration;

use async_trait::async_trait;
use futures::future::BoxFuture;
use tracing::warn;

use crate::produtos::produtos_structs::Produto;
use crate::shared::erros::{ErroApp, ResultadoApp};

/// Unidade de trabalho aberta no armazenamento.
///
/// As leituras aqui são leituras com bloqueio: as linhas lidas ficam presas
/// até o commit ou rollback. Descartar a transação sem commit equivale a
/// rollback.
#[async_trait]
pub trait Transacao: Send {
    /// Lê (e bloqueia) o depósito do usuário. `None` se a conta não existe.
    async fn buscar_deposito(&mut self, usuario_id: i32) -> ResultadoApp<Option<i64>>;

    async fn gravar_deposito(&mut self, usuario_id: i32, novo_deposito: i64) -> ResultadoApp<()>;

    /// Lê (e bloqueia) os produtos existentes entre `ids`, em ordem crescente de id.
    async fn buscar_produtos(&mut self, ids: &[i32]) -> ResultadoApp<Vec<Produto>>;

    async fn gravar_estoque(&mut self, produto_id: i32, novo_estoque: i32) -> ResultadoApp<()>;

    async fn commit(self) -> ResultadoApp<()>;

    async fn rollback(self) -> ResultadoApp<()>;
}

/// Armazenamento durável que fornece transações e leituras sem bloqueio.
#[async_trait]
pub trait Armazem: Send + Sync {
    type Tx: Transacao;

    async fn iniciar(&self) -> ResultadoApp<Self::Tx>;

    /// Leitura instantânea (sem bloqueio) dos produtos existentes entre `ids`.
    async fn buscar_produtos(&self, ids: &[i32]) -> ResultadoApp<Vec<Produto>>;

    /// Leitura instantânea (sem bloqueio) do depósito do usuário.
    async fn buscar_deposito(&self, usuario_id: i32) -> ResultadoApp<Option<i64>>;
}

/// Executa `trabalho` dentro de uma única transação.
///
/// Commit somente se o trabalho retornar `Ok`; qualquer erro faz rollback
/// antes de ser devolvido. Se o conjunto não terminar dentro de `limite`, o
/// futuro é descartado (o que desfaz a transação) e o erro é `Transitorio`.
pub async fn executar_em_transacao<A, T, F>(
    armazem: &A,
    limite: Duration,
    trabalho: F,
) -> ResultadoApp<T>
where
    A: Armazem,
    T: Send,
    F: for<'t> FnOnce(&'t mut A::Tx) -> BoxFuture<'t, ResultadoApp<T>> + Send,
{
    let execucao = async move {
        let mut tx = armazem.iniciar().await?;

        match trabalho(&mut tx).await {
            Ok(valor) => {
                tx.commit().await?;
                Ok(valor)
            }
            Err(erro) => {
                if let Err(falha) = tx.rollback().await {
                    warn!(error = %falha, "rollback falhou; a conexão descarta a transação");
                }
                Err(erro)
            }
        }
    };

    match tokio::time::timeout(limite, execucao).await {
        Ok(resultado) => resultado,
        Err(_) => {
            warn!(limite_ms = limite.as_millis() as u64, "transação excedeu o tempo limite");
            Err(ErroApp::Transitorio(format!(
                "a transação não terminou em {} ms",
                limite.as_millis()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::FutureExt;

    use super::*;
    use crate::shared::persistencia_memoria::ArmazemMemoria;

    #[tokio::test]
    async fn erro_no_trabalho_desfaz_escritas() {
        let armazem = ArmazemMemoria::new();
        armazem.inserir_conta(1, 100).await;

        let erro = executar_em_transacao(&armazem, Duration::from_secs(1), |tx| {
            async move {
                tx.gravar_deposito(1, 0).await?;
                Err::<(), _>(ErroApp::requisicao_invalida("abortado"))
            }
            .boxed()
        })
        .await
        .unwrap_err();

        assert!(matches!(erro, ErroApp::RequisicaoInvalida(_)));
        assert_eq!(armazem.deposito(1).await, Some(100));
    }

    #[tokio::test]
    async fn timeout_descarta_a_transacao_e_e_transitorio() {
        let armazem = ArmazemMemoria::new();
        armazem.inserir_conta(1, 100).await;

        let erro = executar_em_transacao(&armazem, Duration::from_millis(50), |tx| {
            async move {
                tx.gravar_deposito(1, 40).await?;
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            }
            .boxed()
        })
        .await
        .unwrap_err();

        assert!(erro.eh_transitorio());
        assert_eq!(armazem.deposito(1).await, Some(100));
    }

    #[tokio::test]
    async fn sucesso_faz_commit() {
        let armazem = ArmazemMemoria::new();
        armazem.inserir_conta(1, 100).await;

        let valor = executar_em_transacao(&armazem, Duration::from_secs(1), |tx| {
            async move {
                tx.gravar_deposito(1, 60).await?;
                Ok(60)
            }
            .boxed()
        })
        .await
        .unwrap();

        assert_eq!(valor, 60);
        assert_eq!(armazem.deposito(1).await, Some(60));
    }
}
