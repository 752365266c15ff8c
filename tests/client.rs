#[macro_use]
extern crate tracing;


use std::sync::Arc;

use anyhow::Result;
use reqwest::{StatusCode, header};
use rust_decimal_macros::dec;

use quickbooks_rs::{
    Account, AccountType, Credentials, ErrorKind, JournalEntry, Line, TransportError,
    TransportErrorKind,
};

use test_utils::{
    AUTHORIZATION, EchoTransport, REALM_ID, ScriptedTransport, account_success_body, client_with,
    do_setup, validation_fault_body,
};

#[tokio::test]
async fn create_account_end_to_end() -> Result<()> {
    do_setup();

    let transport =
        Arc::new(ScriptedTransport::new().respond_json(StatusCode::OK, &account_success_body()));
    let client = client_with(Arc::clone(&transport));

    let created = client
        .accounts()
        .create(&Account::new("Office Supplies", AccountType::Expense))
        .await?;
    info!("created account {:?}", created.id);

    assert_eq!(created.id.as_deref(), Some("94"));
    assert_eq!(created.name, "Office Supplies");

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.url.path(), format!("/v3/company/{REALM_ID}/account"));
    assert_eq!(request.headers[header::AUTHORIZATION], AUTHORIZATION);
    assert_eq!(request.body_json()?["Name"], "Office Supplies");

    Ok(())
}

#[tokio::test]
async fn create_journal_entry_end_to_end() -> Result<()> {
    do_setup();

    let transport = Arc::new(ScriptedTransport::new().respond(
        StatusCode::OK,
        r#"{"JournalEntry":{"Id":"227","SyncToken":"0","TotalAmt":100,"Line":[
            {"Id":"0","Amount":100.0,"DetailType":"JournalEntryLineDetail","JournalEntryLineDetail":{"PostingType":"Debit","AccountRef":{"value":"39"}}},
            {"Id":"1","Amount":100.0,"DetailType":"JournalEntryLineDetail","JournalEntryLineDetail":{"PostingType":"Credit","AccountRef":{"value":"44"}}}
        ]},"time":"2024-01-01T00:00:00.000-08:00"}"#,
    ));
    let client = client_with(Arc::clone(&transport));

    let entry = JournalEntry::new(vec![
        Line::debit(dec!(100), "39"),
        Line::credit(dec!(100), "44"),
    ]);
    let created = client.journal_entries().create(&entry).await?;

    assert_eq!(created.id.as_deref(), Some("227"));
    assert_eq!(created.total_amt, Some(dec!(100)));
    assert_eq!(
        transport.requests()[0].url.path(),
        format!("/v3/company/{REALM_ID}/journalentry")
    );

    Ok(())
}

#[tokio::test]
async fn remote_fault_is_returned_not_retried() {
    do_setup();

    let transport = Arc::new(
        ScriptedTransport::new().respond_json(StatusCode::BAD_REQUEST, &validation_fault_body()),
    );
    let client = client_with(Arc::clone(&transport));

    let err = client
        .accounts()
        .create(&Account::new("Office Supplies", AccountType::Expense))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RemoteFault);
    assert_eq!(err.fault().unwrap().code(), Some("6000"));
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn transport_failure_is_surfaced_once() {
    do_setup();

    let transport = Arc::new(ScriptedTransport::new().fail(TransportError::new(
        TransportErrorKind::Timeout,
        "deadline elapsed",
    )));
    let client = client_with(Arc::clone(&transport));

    let err = client
        .accounts()
        .create(&Account::new("Office Supplies", AccountType::Expense))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.transport_error().unwrap().kind, TransportErrorKind::Timeout);
    assert!(err.span_trace().is_some());
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn invalid_request_never_reaches_the_transport() {
    do_setup();

    let transport = Arc::new(ScriptedTransport::new());
    let mut client = client_with(Arc::clone(&transport));
    client.set_credentials(Credentials::new("", AUTHORIZATION));

    let err = client
        .accounts()
        .create(&Account::new("Office Supplies", AccountType::Expense))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn unbalanced_journal_entry_is_sent_as_is() {
    do_setup();

    let transport = Arc::new(
        ScriptedTransport::new().respond_json(StatusCode::BAD_REQUEST, &validation_fault_body()),
    );
    let client = client_with(Arc::clone(&transport));

    let entry = JournalEntry::new(vec![
        Line::debit(dec!(100), "39"),
        Line::credit(dec!(90), "44"),
    ]);
    let err = client.journal_entries().create(&entry).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RemoteFault);
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_do_not_leak_between_calls() -> Result<()> {
    do_setup();

    let client = Arc::new(client_with(EchoTransport));

    let handles: Vec<_> = (0..32)
        .map(|i| {
            let client = Arc::clone(&client);
            tokio::spawn(async move {
                let name = format!("Account {i}");
                let account = Account::new(name.clone(), AccountType::Expense)
                    .with_acct_num(format!("6{i:03}"));
                let created = client.accounts().create(&account).await?;
                anyhow::Ok((i, name, created))
            })
        })
        .collect();

    for handle in handles {
        let (i, name, created) = handle.await??;
        assert_eq!(created.name, name);
        assert_eq!(created.acct_num, Some(format!("6{i:03}")));
        assert_eq!(created.id, Some(format!("id-{name}")));
    }

    Ok(())
}
