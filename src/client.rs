use crate::{
    classify::classify,
    config::ClientConfig,
    credentials::Credentials,
    entities::{Entity, Envelope, account::Account, journal_entry::JournalEntry},
    error::Result,
    request::RequestBuilder,
    transport::{Executor, HttpTransport, ReqwestTransport},
};

/// This is the client that is used for creating entities in a QuickBooks
/// Online company. It holds the company (realm) and authorization every
/// request is scoped to.
///
/// A client carries no per-call state; share it behind an `Arc` to issue
/// creates concurrently.
#[derive(Clone, Debug)]
pub struct Client<H = ReqwestTransport> {
    executor: Executor<H>,
    requests: RequestBuilder,
    credentials: Credentials,
}

impl Client {
    /// Creates a client sending requests through `reqwest`.
    pub fn new(credentials: Credentials, config: &ClientConfig) -> Result<Self> {
        let http = ReqwestTransport::new(config.timeout)?;
        Self::with_transport(http, credentials, config)
    }

    /// Creates a client from `QUICKBOOKS_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let config = ClientConfig::from_env()?;
        let credentials = Credentials::from_env()?;
        Self::new(credentials, &config)
    }
}

impl<H: HttpTransport> Client<H> {
    /// Creates a client sending requests through a custom transport.
    ///
    /// `config.timeout` is not applied; the transport owns its own timeouts.
    pub fn with_transport(http: H, credentials: Credentials, config: &ClientConfig) -> Result<Self> {
        let requests = RequestBuilder::from_config(config)?;
        debug!(base_url = %requests.base_url(), realm_id = credentials.realm_id(), "created client");
        Ok(Self {
            executor: Executor::new(http),
            requests,
            credentials,
        })
    }

    /// Replaces the credentials, e.g. after the caller refreshed its token.
    pub fn set_credentials(&mut self, credentials: Credentials) {
        trace!(realm_id = credentials.realm_id(), "updating credentials");
        self.credentials = credentials;
    }

    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    #[must_use]
    pub fn request_builder(&self) -> &RequestBuilder {
        &self.requests
    }

    #[must_use]
    pub fn transport(&self) -> &H {
        self.executor.transport()
    }

    /// Creates an entity and returns the service's copy of it.
    ///
    /// The request is sent at most once. Faults come back as
    /// [`Error::RemoteFault`](crate::Error::RemoteFault) whatever the HTTP
    /// status was.
    #[instrument(skip(self, payload), fields(kind = %E::KIND))]
    pub async fn create<E: Entity>(&self, payload: &E) -> Result<Envelope<E>> {
        let request = self.requests.build(&self.credentials, payload)?;
        let response = self.executor.execute(request).await?;
        classify::<E>(response.status, &response.body)
    }

    /// Access the accounts API
    #[must_use]
    pub fn accounts(&self) -> AccountsApi<'_, H> {
        AccountsApi { client: self }
    }

    /// Access the journal entries API
    #[must_use]
    pub fn journal_entries(&self) -> JournalEntriesApi<'_, H> {
        JournalEntriesApi { client: self }
    }
}

/// API handler for Account endpoints
#[derive(Debug)]
pub struct AccountsApi<'a, H> {
    client: &'a Client<H>,
}

impl<H: HttpTransport> AccountsApi<'_, H> {
    /// Create a new account
    #[instrument(skip(self, account))]
    pub async fn create(&self, account: &Account) -> Result<Envelope<Account>> {
        self.client.create(account).await
    }
}

/// API handler for JournalEntry endpoints
#[derive(Debug)]
pub struct JournalEntriesApi<'a, H> {
    client: &'a Client<H>,
}

impl<H: HttpTransport> JournalEntriesApi<'_, H> {
    /// Create a new journal entry
    ///
    /// Balance is not checked locally; an unbalanced entry is rejected by
    /// the service with a validation fault.
    #[instrument(skip(self, journal_entry))]
    pub async fn create(&self, journal_entry: &JournalEntry) -> Result<Envelope<JournalEntry>> {
        if !journal_entry.is_balanced() {
            debug!(
                debits = %journal_entry.total_debits(),
                credits = %journal_entry.total_credits(),
                "journal entry is not balanced"
            );
        }
        self.client.create(journal_entry).await
    }
}
