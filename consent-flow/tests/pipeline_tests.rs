//! End-to-end pipeline: discovery feeds linking, linking feeds consent

mod support;

use consent_core::{ApprovalMode, TypedIdentifier};
use consent_flow::{ConsentAggregator, DiscoveryCoordinator, LinkingCoordinator};
use std::sync::Arc;
use support::{consent_detail, discovered, fip_details, verified_gateway, MockAa, GOOD_OTP};

/// The documented walkthrough: one PAN identifier, two discovered accounts,
/// one selected, linked, confirmed with OTP "123456", then approved.
#[tokio::test]
async fn discover_link_confirm_approve_round_trip() {
    let mut mock = MockAa::default();
    mock.fips = vec![consent_core::FipInfo {
        fip_id: "FIP-1".to_string(),
        product_name: Some("Demo Bank".to_string()),
        fip_fi_types: vec!["DEPOSIT".to_string()],
    }];
    mock.fip_details
        .insert("FIP-1".to_string(), fip_details("FIP-1"));
    mock.discoverable = vec![discovered("acc-1"), discovered("acc-2")];
    mock.consent_details
        .insert("h-1".to_string(), consent_detail("h-1"));
    let mock = Arc::new(mock);
    let gateway = verified_gateway(mock.clone()).await;

    // Discovery round with one user-supplied identifier.
    let mut discovery = DiscoveryCoordinator::new(gateway.clone());
    let mut linking = LinkingCoordinator::new(gateway.clone());
    linking.fetch_linked_accounts().await.unwrap();

    discovery.add_identifier(TypedIdentifier::new("PAN", "ID", "ABCDE1234F"));
    let found = discovery
        .discover_filtered(
            "FIP-1",
            &["DEPOSIT".to_string()],
            linking.linked_references(),
        )
        .await
        .unwrap();
    assert_eq!(found.len(), 2);

    // Select one account, link it, confirm with the OTP.
    let selection = vec![found[0].clone()];
    linking
        .link_accounts(&fip_details("FIP-1"), &selection)
        .await
        .unwrap();
    let confirmation = linking.confirm_linking(GOOD_OTP).await.unwrap();
    assert_eq!(confirmation.linked_accounts.len(), 1);
    assert_eq!(
        confirmation.linked_accounts[0].account_reference_number,
        "acc-1"
    );

    // The fresh link shows up in a subsequent fetch...
    let all_linked = linking.fetch_linked_accounts().await.unwrap();
    assert!(all_linked
        .iter()
        .any(|a| a.account_reference_number == "acc-1"));

    // ...and is excluded from the next discovery round.
    let next_round = discovery
        .discover_filtered(
            "FIP-1",
            &["DEPOSIT".to_string()],
            linking.linked_references(),
        )
        .await
        .unwrap();
    assert!(next_round
        .iter()
        .all(|a| a.account_reference_number != "acc-1"));

    // Approve the consent over the linked account.
    let mut aggregator = ConsentAggregator::new(gateway, vec!["h-1".to_string()]);
    assert!(aggregator.fetch_details().await.is_empty());
    aggregator
        .approve(ApprovalMode::Multiple, &all_linked)
        .await
        .unwrap();

    let calls = mock.approve_calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1, vec!["acc-1".to_string()]);
}
