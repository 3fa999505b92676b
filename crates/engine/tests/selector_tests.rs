//! Selection behavior of the proposal evaluator.

mod common;

use std::sync::Arc;

use tendermill_core::capability::CapabilityKind;
use tendermill_core::error::CoreError;
use tendermill_core::proposal::{ApiCall, NewProposal, Plan, Step};
use tendermill_core::types::{new_id, EntityId};
use tendermill_engine::{Selector, SINGLE_PROPOSAL_REASONING};
use tendermill_store::{MemoryStore, ProposalStore, TenderStore};

use common::{biotech_tender, MockOracle};

fn one_step_plan(kind: CapabilityKind, price: f64) -> Plan {
    let api_call = match kind {
        CapabilityKind::Search => ApiCall::Search {
            endpoint: "https://api.search.example/v1/search".into(),
            method: "POST".into(),
            query: "biotech news".into(),
        },
        CapabilityKind::News => ApiCall::Parameterized {
            endpoint: "https://api.news.example/news".into(),
            method: "GET".into(),
            parameter: tendermill_core::proposal::CallParameter {
                name: "feed_categories".into(),
                value: "biotech".into(),
            },
        },
    };
    Plan {
        steps: vec![Step {
            step_number: 1,
            action: "fetch".into(),
            api_call,
            price_per_call: price,
        }],
        total_estimated_cost: price,
        expected_outcome: "articles".into(),
    }
}

async fn seed_proposal(
    store: &MemoryStore,
    tender_id: EntityId,
    kind: CapabilityKind,
    price: f64,
) -> EntityId {
    ProposalStore::create(
        store,
        NewProposal {
            tender_id,
            capability: kind,
            reasoning: format!("{kind} fits this tender"),
            plan: one_step_plan(kind, price),
        },
    )
    .await
    .unwrap()
    .id
}

fn selector(oracle: Arc<MockOracle>, store: Arc<MemoryStore>) -> Selector {
    Selector::new(oracle, store.clone(), store)
}

#[tokio::test]
async fn unknown_tender_is_not_found() {
    let oracle = Arc::new(MockOracle::new());
    let store = Arc::new(MemoryStore::new());

    let err = selector(oracle, store).evaluate(new_id()).await.unwrap_err();

    assert!(matches!(err, CoreError::NotFound { entity: "Tender", .. }));
}

#[tokio::test]
async fn tender_without_proposals_is_invalid_state() {
    let oracle = Arc::new(MockOracle::new());
    let store = Arc::new(MemoryStore::new());
    let tender = TenderStore::create(store.as_ref(), biotech_tender())
        .await
        .unwrap();

    let err = selector(oracle, store)
        .evaluate(tender.id)
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::InvalidState(_)));
}

#[tokio::test]
async fn single_proposal_is_selected_without_consulting_the_oracle() {
    let oracle = Arc::new(MockOracle::new());
    let store = Arc::new(MemoryStore::new());
    let tender = TenderStore::create(store.as_ref(), biotech_tender())
        .await
        .unwrap();
    let proposal_id = seed_proposal(&store, tender.id, CapabilityKind::News, 0.01).await;

    let evaluation = selector(oracle.clone(), store)
        .evaluate(tender.id)
        .await
        .unwrap();

    assert_eq!(evaluation.selected_proposal_id, proposal_id);
    assert_eq!(evaluation.reasoning, SINGLE_PROPOSAL_REASONING);
    assert_eq!(oracle.call_count(), 0);
}

#[tokio::test]
async fn oracle_choice_inside_the_candidate_set_is_accepted() {
    let oracle = Arc::new(MockOracle::new());
    let store = Arc::new(MemoryStore::new());
    let tender = TenderStore::create(store.as_ref(), biotech_tender())
        .await
        .unwrap();
    let _search = seed_proposal(&store, tender.id, CapabilityKind::Search, 0.05).await;
    let news = seed_proposal(&store, tender.id, CapabilityKind::News, 0.01).await;

    oracle.push_object(serde_json::json!({
        "selectedProposalId": news.to_string(),
        "reasoning": "Cheaper and directly on topic"
    }));

    let evaluation = selector(oracle.clone(), store)
        .evaluate(tender.id)
        .await
        .unwrap();

    assert_eq!(evaluation.selected_proposal_id, news);
    assert_eq!(evaluation.reasoning, "Cheaper and directly on topic");
    assert_eq!(oracle.call_count(), 1);
}

#[tokio::test]
async fn oracle_choice_outside_the_candidate_set_is_rejected() {
    let oracle = Arc::new(MockOracle::new());
    let store = Arc::new(MemoryStore::new());
    let tender = TenderStore::create(store.as_ref(), biotech_tender())
        .await
        .unwrap();
    seed_proposal(&store, tender.id, CapabilityKind::Search, 0.05).await;
    seed_proposal(&store, tender.id, CapabilityKind::News, 0.01).await;

    // A syntactically valid id that belongs to no proposal of this tender.
    oracle.push_object(serde_json::json!({
        "selectedProposalId": new_id().to_string(),
        "reasoning": "Hallucinated"
    }));

    let err = selector(oracle, store).evaluate(tender.id).await.unwrap_err();

    assert!(matches!(err, CoreError::Upstream(_)));
}

#[tokio::test]
async fn unparseable_oracle_id_is_an_upstream_error() {
    let oracle = Arc::new(MockOracle::new());
    let store = Arc::new(MemoryStore::new());
    let tender = TenderStore::create(store.as_ref(), biotech_tender())
        .await
        .unwrap();
    seed_proposal(&store, tender.id, CapabilityKind::Search, 0.05).await;
    seed_proposal(&store, tender.id, CapabilityKind::News, 0.01).await;

    oracle.push_object(serde_json::json!({
        "selectedProposalId": "proposal-one",
        "reasoning": "Not even a uuid"
    }));

    let err = selector(oracle, store).evaluate(tender.id).await.unwrap_err();

    assert!(matches!(err, CoreError::Upstream(_)));
}

#[tokio::test]
async fn evaluation_carries_the_tender_submission_endpoint() {
    let oracle = Arc::new(MockOracle::new());
    let store = Arc::new(MemoryStore::new());

    let mut tender = biotech_tender();
    tender.submission_format.endpoint = Some("https://buyer.example/submit".into());
    let tender = TenderStore::create(store.as_ref(), tender).await.unwrap();
    seed_proposal(&store, tender.id, CapabilityKind::News, 0.01).await;

    let evaluation = selector(oracle, store).evaluate(tender.id).await.unwrap();

    assert_eq!(
        evaluation.endpoint.as_deref(),
        Some("https://buyer.example/submit")
    );
}
