//! In-memory store implementation.
//!
//! Backs all three store traits with `RwLock`-guarded maps. Nothing is
//! ever deleted; the lifecycle is create-once, read-many.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use tendermill_core::error::CoreError;
use tendermill_core::proposal::{NewProposal, Proposal};
use tendermill_core::tender::Tender;
use tendermill_core::types::{new_id, EntityId};
use tendermill_core::webhook::{is_http_url, Webhook};

use crate::{ProposalStore, StoreResult, TenderStore, WebhookStore};

/// In-memory implementation of every store trait.
///
/// Individual operations serialize on the per-collection locks, so
/// concurrent synthesizers and handlers see a consistent view without
/// any further coordination.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tenders: RwLock<HashMap<EntityId, Tender>>,
    proposals: RwLock<Vec<Proposal>>,
    webhooks: RwLock<Vec<Webhook>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TenderStore for MemoryStore {
    async fn create(&self, tender: Tender) -> StoreResult<Tender> {
        let mut tenders = self.tenders.write().await;
        tenders.insert(tender.id, tender.clone());
        Ok(tender)
    }

    async fn find(&self, id: EntityId) -> StoreResult<Option<Tender>> {
        let tenders = self.tenders.read().await;
        Ok(tenders.get(&id).cloned())
    }

    async fn list(&self) -> StoreResult<Vec<Tender>> {
        let tenders = self.tenders.read().await;
        let mut all: Vec<Tender> = tenders.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }
}

#[async_trait]
impl ProposalStore for MemoryStore {
    async fn create(&self, proposal: NewProposal) -> StoreResult<Proposal> {
        // Referential integrity: the tender must exist.
        {
            let tenders = self.tenders.read().await;
            if !tenders.contains_key(&proposal.tender_id) {
                return Err(CoreError::NotFound {
                    entity: "Tender",
                    id: proposal.tender_id,
                });
            }
        }

        proposal.plan.validate_cost()?;

        let mut proposals = self.proposals.write().await;

        // Idempotency key: one proposal per (tender, capability).
        let duplicate = proposals.iter().any(|p| {
            p.tender_id == proposal.tender_id && p.capability == proposal.capability
        });
        if duplicate {
            return Err(CoreError::InvalidState(format!(
                "a '{}' proposal already exists for tender {}",
                proposal.capability, proposal.tender_id
            )));
        }

        let created = Proposal {
            id: new_id(),
            tender_id: proposal.tender_id,
            capability: proposal.capability,
            reasoning: proposal.reasoning,
            plan: proposal.plan,
            created_at: Utc::now(),
        };
        proposals.push(created.clone());
        tracing::debug!(
            proposal_id = %created.id,
            tender_id = %created.tender_id,
            capability = %created.capability,
            "Proposal persisted"
        );
        Ok(created)
    }

    async fn find_by_tender(&self, tender_id: EntityId) -> StoreResult<Vec<Proposal>> {
        let proposals = self.proposals.read().await;
        Ok(proposals
            .iter()
            .filter(|p| p.tender_id == tender_id)
            .cloned()
            .collect())
    }

    async fn list(&self) -> StoreResult<Vec<Proposal>> {
        let proposals = self.proposals.read().await;
        let mut all = proposals.clone();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }
}

#[async_trait]
impl WebhookStore for MemoryStore {
    async fn register(&self, url: &str) -> StoreResult<Webhook> {
        if !is_http_url(url) {
            return Err(CoreError::Validation("Invalid URL format".into()));
        }

        let webhook = Webhook {
            id: new_id(),
            url: url.to_string(),
            created_at: Utc::now(),
        };

        let mut webhooks = self.webhooks.write().await;
        webhooks.push(webhook.clone());
        Ok(webhook)
    }

    async fn list(&self) -> StoreResult<Vec<Webhook>> {
        let webhooks = self.webhooks.read().await;
        let mut all = webhooks.clone();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
