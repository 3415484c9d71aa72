//! Authenticated transfer reads and writes against the remote API.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    auth::{Session, UserId},
    transaction::model::{
        Tag, TagId, Transaction, TransactionDraft, TransactionId, TransactionKind, parse_wire_date,
    },
};

use super::client::ApiClient;

/// The remote collection path for transfers.
const TRANSACTIONS_PATH: &str = "/api/transacoes";

#[derive(Debug, Deserialize)]
struct TransactionListResponse {
    data: Vec<WireTransaction>,
}

/// A transfer as the API transmits it.
#[derive(Debug, Deserialize)]
struct WireTransaction {
    id: TransactionId,
    descricao: String,
    valor: String,
    tipo: TransactionKind,
    data: String,
    #[serde(default)]
    tags: Vec<WireTag>,
}

#[derive(Debug, Deserialize)]
struct WireTag {
    id: TagId,
    nome: String,
}

impl WireTransaction {
    fn into_domain(self) -> Result<Transaction, Error> {
        let amount = self.valor.try_into()?;
        let date = parse_wire_date(&self.data)?;

        // The API should not send duplicate tags, but the table and the
        // edit form both assume unique ids, so enforce it here.
        let mut seen = HashSet::new();
        let tags = self
            .tags
            .into_iter()
            .filter(|tag| seen.insert(tag.id))
            .map(|tag| Tag {
                id: tag.id,
                name: tag.nome,
            })
            .collect();

        Ok(Transaction {
            id: self.id,
            description: self.descricao,
            amount,
            kind: self.tipo,
            date,
            tags,
        })
    }
}

#[derive(Debug, Serialize)]
struct CreateEnvelope<'a> {
    transacao: CreateBody<'a>,
}

#[derive(Debug, Serialize)]
struct CreateBody<'a> {
    descricao: &'a str,
    usuario_id: UserId,
    tipo: TransactionKind,
    valor: &'a str,
    data: Date,
    tag_ids: &'a [TagId],
}

#[derive(Debug, Serialize)]
struct UpdateBody<'a> {
    descricao: &'a str,
    valor: &'a str,
    tipo: TransactionKind,
    data: Date,
    tag_ids: &'a [TagId],
}

/// Fetch every transfer belonging to the session user.
///
/// No pagination: the full set is always requested and held in memory.
///
/// # Errors
///
/// Returns an [Error::ApiUnreachable], [Error::ApiStatus], or
/// [Error::MalformedResponse] depending on where the request failed. The
/// caller's snapshot must be left untouched in every error case.
pub async fn fetch_transactions(
    api: &ApiClient,
    session: &Session,
) -> Result<Vec<Transaction>, Error> {
    let response = api
        .http()
        .get(api.url(TRANSACTIONS_PATH))
        .query(&[("usuario_id", session.user_id())])
        .bearer_auth(session.token())
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(Error::ApiStatus(response.status().as_u16()));
    }

    let body: TransactionListResponse = response.json().await?;

    body.data
        .into_iter()
        .map(WireTransaction::into_domain)
        .collect()
}

/// Create a transfer for the session user from a validated draft.
///
/// Any 2xx response counts as success. The caller is responsible for
/// triggering the full-list reload afterwards; this function never patches
/// local state.
pub async fn create_transaction(
    api: &ApiClient,
    session: &Session,
    draft: &TransactionDraft,
) -> Result<(), Error> {
    let body = CreateEnvelope {
        transacao: CreateBody {
            descricao: &draft.description,
            usuario_id: session.user_id(),
            tipo: draft.kind,
            valor: draft.amount.text(),
            data: draft.date,
            tag_ids: &draft.tag_ids,
        },
    };

    let response = api
        .http()
        .post(api.url(TRANSACTIONS_PATH))
        .bearer_auth(session.token())
        .json(&body)
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(Error::ApiStatus(response.status().as_u16()));
    }

    Ok(())
}

/// Update the transfer `id` with the full edited field set.
pub async fn update_transaction(
    api: &ApiClient,
    session: &Session,
    id: TransactionId,
    draft: &TransactionDraft,
) -> Result<(), Error> {
    let body = UpdateBody {
        descricao: &draft.description,
        valor: draft.amount.text(),
        tipo: draft.kind,
        data: draft.date,
        tag_ids: &draft.tag_ids,
    };

    let response = api
        .http()
        .put(api.url(&format!("{TRANSACTIONS_PATH}/{id}")))
        .bearer_auth(session.token())
        .json(&body)
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(Error::ApiStatus(response.status().as_u16()));
    }

    Ok(())
}

/// Delete the transfer `id`.
///
/// No soft delete and no undo; the row disappears on the next reload.
pub async fn delete_transaction(
    api: &ApiClient,
    session: &Session,
    id: TransactionId,
) -> Result<(), Error> {
    let response = api
        .http()
        .delete(api.url(&format!("{TRANSACTIONS_PATH}/{id}")))
        .bearer_auth(session.token())
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(Error::ApiStatus(response.status().as_u16()));
    }

    Ok(())
}
