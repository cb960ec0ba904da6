// src/shared/persistencia_memoria.rs

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::erros::{ErroApp, ResultadoApp};
use super::persistencia::{Armazem, Transacao};
use crate::produtos::produtos_structs::Produto;

#[derive(Debug, Clone, Default)]
struct EstadoMemoria {
    depositos: HashMap<i32, i64>,
    produtos: BTreeMap<i32, Produto>,
}

/// Armazém em memória, usado em testes e para rodar sem banco.
///
/// Cada transação segura o estado inteiro (serializável) e trabalha sobre uma
/// cópia; só o commit publica a cópia.
#[derive(Clone, Default)]
pub struct ArmazemMemoria {
    estado: Arc<Mutex<EstadoMemoria>>,
}

impl ArmazemMemoria {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn inserir_conta(&self, usuario_id: i32, deposito: i64) {
        self.estado.lock().await.depositos.insert(usuario_id, deposito);
    }

    pub async fn inserir_produto(&self, produto: Produto) {
        self.estado.lock().await.produtos.insert(produto.id, produto);
    }

    pub async fn deposito(&self, usuario_id: i32) -> Option<i64> {
        self.estado.lock().await.depositos.get(&usuario_id).copied()
    }

    pub async fn estoque(&self, produto_id: i32) -> Option<i32> {
        self.estado.lock().await.produtos.get(&produto_id).map(|p| p.estoque)
    }
}

pub struct TransacaoMemoria {
    guarda: OwnedMutexGuard<EstadoMemoria>,
    rascunho: EstadoMemoria,
}

#[async_trait]
impl Transacao for TransacaoMemoria {
    async fn buscar_deposito(&mut self, usuario_id: i32) -> ResultadoApp<Option<i64>> {
        Ok(self.rascunho.depositos.get(&usuario_id).copied())
    }

    async fn gravar_deposito(&mut self, usuario_id: i32, novo_deposito: i64) -> ResultadoApp<()> {
        let deposito = self
            .rascunho
            .depositos
            .get_mut(&usuario_id)
            .ok_or(ErroApp::ContaNaoEncontrada(usuario_id))?;
        *deposito = novo_deposito;
        Ok(())
    }

    async fn buscar_produtos(&mut self, ids: &[i32]) -> ResultadoApp<Vec<Produto>> {
        Ok(selecionar(&self.rascunho.produtos, ids))
    }

    async fn gravar_estoque(&mut self, produto_id: i32, novo_estoque: i32) -> ResultadoApp<()> {
        let produto = self
            .rascunho
            .produtos
            .get_mut(&produto_id)
            .ok_or_else(|| ErroApp::ProdutoNaoEncontrado(vec![produto_id]))?;
        produto.estoque = novo_estoque;
        Ok(())
    }

    async fn commit(mut self) -> ResultadoApp<()> {
        *self.guarda = self.rascunho;
        Ok(())
    }

    async fn rollback(self) -> ResultadoApp<()> {
        Ok(())
    }
}

#[async_trait]
impl Armazem for ArmazemMemoria {
    type Tx = TransacaoMemoria;

    async fn iniciar(&self) -> ResultadoApp<TransacaoMemoria> {
        let guarda = self.estado.clone().lock_owned().await;
        let rascunho = guarda.clone();
        Ok(TransacaoMemoria { guarda, rascunho })
    }

    async fn buscar_produtos(&self, ids: &[i32]) -> ResultadoApp<Vec<Produto>> {
        Ok(selecionar(&self.estado.lock().await.produtos, ids))
    }

    async fn buscar_deposito(&self, usuario_id: i32) -> ResultadoApp<Option<i64>> {
        Ok(self.deposito(usuario_id).await)
    }
}

fn selecionar(produtos: &BTreeMap<i32, Produto>, ids: &[i32]) -> Vec<Produto> {
    produtos
        .values()
        .filter(|p| ids.contains(&p.id))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn produto(id: i32, estoque: i32) -> Produto {
        Produto { id, vendedor_id: 1, nome: format!("p{id}"), preco: 10, estoque }
    }

    #[tokio::test]
    async fn commit_publica_e_drop_descarta() {
        let armazem = ArmazemMemoria::new();
        armazem.inserir_conta(1, 100).await;
        armazem.inserir_produto(produto(5, 3)).await;

        {
            let mut tx = armazem.iniciar().await.unwrap();
            tx.gravar_deposito(1, 40).await.unwrap();
            tx.gravar_estoque(5, 0).await.unwrap();
            // sem commit
        }
        assert_eq!(armazem.deposito(1).await, Some(100));
        assert_eq!(armazem.estoque(5).await, Some(3));

        let mut tx = armazem.iniciar().await.unwrap();
        tx.gravar_deposito(1, 40).await.unwrap();
        tx.commit().await.unwrap();
        assert_eq!(armazem.deposito(1).await, Some(40));
    }

    #[tokio::test]
    async fn escrita_em_linha_inexistente_e_erro() {
        let armazem = ArmazemMemoria::new();
        armazem.inserir_conta(1, 100).await;
        armazem.inserir_produto(produto(5, 3)).await;

        let mut tx = armazem.iniciar().await.unwrap();
        assert_eq!(tx.gravar_deposito(2, 10).await.unwrap_err(), ErroApp::ContaNaoEncontrada(2));
        assert_eq!(tx.gravar_estoque(6, 1).await.unwrap_err(), ErroApp::ProdutoNaoEncontrado(vec![6]));
        tx.commit().await.unwrap();

        assert_eq!(armazem.deposito(2).await, None);
        assert_eq!(armazem.estoque(6).await, None);
    }

    #[tokio::test]
    async fn busca_retorna_apenas_existentes_em_ordem() {
        let armazem = ArmazemMemoria::new();
        armazem.inserir_produto(produto(3, 1)).await;
        armazem.inserir_produto(produto(1, 1)).await;

        let produtos = Armazem::buscar_produtos(&armazem, &[3, 99, 1]).await.unwrap();
        let ids: Vec<i32> = produtos.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }
}
