//! # Mock Clients
//!
//! `MockClient<T>` hands out a real [`ResourceClient<T>`] whose requests are answered from
//! a queue of scripted expectations instead of a running actor. Code that orchestrates
//! several clients (a transfer that debits one account and credits another, a checkout
//! that creates an order then charges a wallet) can be driven into its failure branches
//! without arranging real state.
//!
//! | | MockClient | Real Actor |
//! |---|---|---|
//! | **State** | None, replies are scripted | Real entity store |
//! | **Error Injection** | `return_err` on any step | Requires arranging state |
//! | **Use Case** | Logic *around* the client | The entity hooks themselves |
//!
//! Expectations are consumed strictly in order. A request that does not match the next
//! expectation's kind panics the mock task, which the caller observes as
//! [`FrameworkError::ActorDropped`].
//!
//! ```rust
//! use actor_framework::mock::MockClient;
//! use actor_framework::{ActorEntity, FrameworkError};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)] struct Wallet { id: u32, balance: u64 }
//! #[derive(Debug)] struct WalletCreate;
//! #[derive(Debug)] struct WalletUpdate;
//! #[derive(Debug)] enum WalletAction { Debit(u64) }
//! #[derive(Debug, thiserror::Error)] #[error("insufficient balance")] struct Insufficient;
//!
//! #[async_trait]
//! impl ActorEntity for Wallet {
//!     type Id = u32; type Create = WalletCreate; type Update = WalletUpdate;
//!     type Action = WalletAction; type ActionResult = u64; type Context = (); type Error = Insufficient;
//!     fn id(&self) -> &u32 { &self.id }
//!     fn from_create_params(id: u32, _: WalletCreate) -> Result<Self, Insufficient> { Ok(Self { id, balance: 0 }) }
//!     async fn on_update(&mut self, _: WalletUpdate, _: &()) -> Result<(), Insufficient> { Ok(()) }
//!     async fn handle_action(&mut self, _: WalletAction, _: &()) -> Result<u64, Insufficient> { Err(Insufficient) }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockClient::<Wallet>::new();
//!     mock.expect_action(7).return_err(FrameworkError::ActorClosed);
//!
//!     let client = mock.client();
//!     let result = client.perform_action(7, WalletAction::Debit(10)).await;
//!     assert!(matches!(result, Err(FrameworkError::ActorClosed)));
//!     assert_eq!(mock.recorded(), vec!["Action 7 Debit(10)".to_string()]);
//!     mock.verify();
//! }
//! ```
//!
//! For tests that need to inspect the raw request (for example to assert on a create
//! payload), [`create_mock_client`] returns the receiving end of the channel directly.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};

enum Expectation<T: ActorEntity> {
    Create(Result<T::Id, FrameworkError>),
    Get(T::Id, Result<Option<T>, FrameworkError>),
    List(Result<Vec<T>, FrameworkError>),
    Update(T::Id, Result<T, FrameworkError>),
    Delete(T::Id, Result<(), FrameworkError>),
    Action(T::Id, Result<T::ActionResult, FrameworkError>),
}

type Queue<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

fn lock<V>(m: &Mutex<V>) -> std::sync::MutexGuard<'_, V> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A mock client with expectation tracking for fluent testing.
pub struct MockClient<T: ActorEntity> {
    client: ResourceClient<T>,
    expectations: Queue<T>,
    recorded: Arc<Mutex<Vec<String>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ActorEntity> MockClient<T> {
    /// Creates a new mock client with no expectations. Must be called inside a runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let expectations: Queue<T> = Arc::new(Mutex::new(VecDeque::new()));
        let recorded = Arc::new(Mutex::new(Vec::new()));
        let queue = expectations.clone();
        let log = recorded.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = lock(&queue).pop_front();
                lock(&log).push(describe(&request));

                match (request, expectation) {
                    (ResourceRequest::Create { respond_to, .. }, Some(Expectation::Create(r))) => {
                        let _ = respond_to.send(r);
                    }
                    (ResourceRequest::Get { id, respond_to }, Some(Expectation::Get(want, r))) => {
                        assert_eq!(id, want, "get for unexpected id");
                        let _ = respond_to.send(r);
                    }
                    (ResourceRequest::List { respond_to }, Some(Expectation::List(r))) => {
                        let _ = respond_to.send(r);
                    }
                    (
                        ResourceRequest::Update { id, respond_to, .. },
                        Some(Expectation::Update(want, r)),
                    ) => {
                        assert_eq!(id, want, "update for unexpected id");
                        let _ = respond_to.send(r);
                    }
                    (
                        ResourceRequest::Delete { id, respond_to },
                        Some(Expectation::Delete(want, r)),
                    ) => {
                        assert_eq!(id, want, "delete for unexpected id");
                        let _ = respond_to.send(r);
                    }
                    (
                        ResourceRequest::Action { id, respond_to, .. },
                        Some(Expectation::Action(want, r)),
                    ) => {
                        assert_eq!(id, want, "action for unexpected id");
                        let _ = respond_to.send(r);
                    }
                    (ResourceRequest::Shutdown { respond_to }, _) => {
                        let _ = respond_to.send(0);
                        break;
                    }
                    (request, _) => {
                        panic!("Unexpected request: {}", describe(&request));
                    }
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            expectations,
            recorded,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    pub fn expect_create(&mut self) -> ExpectationBuilder<T, T::Id> {
        self.builder(Expectation::Create)
    }

    pub fn expect_get(&mut self, id: T::Id) -> ExpectationBuilder<T, Option<T>> {
        self.builder(move |r| Expectation::Get(id, r))
    }

    pub fn expect_list(&mut self) -> ExpectationBuilder<T, Vec<T>> {
        self.builder(Expectation::List)
    }

    pub fn expect_update(&mut self, id: T::Id) -> ExpectationBuilder<T, T> {
        self.builder(move |r| Expectation::Update(id, r))
    }

    pub fn expect_delete(&mut self, id: T::Id) -> ExpectationBuilder<T, ()> {
        self.builder(move |r| Expectation::Delete(id, r))
    }

    pub fn expect_action(&mut self, id: T::Id) -> ExpectationBuilder<T, T::ActionResult> {
        self.builder(move |r| Expectation::Action(id, r))
    }

    fn builder<R>(
        &mut self,
        wrap: impl FnOnce(Result<R, FrameworkError>) -> Expectation<T> + Send + 'static,
    ) -> ExpectationBuilder<T, R> {
        ExpectationBuilder {
            wrap: Box::new(wrap),
            expectations: self.expectations.clone(),
        }
    }

    /// One line per request received so far, e.g. `"Action acc_1 Credit { .. }"`.
    pub fn recorded(&self) -> Vec<String> {
        lock(&self.recorded).clone()
    }

    /// Panics if any expectation was not consumed.
    pub fn verify(&self) {
        let remaining = lock(&self.expectations).len();
        if remaining > 0 {
            panic!("Not all expectations were met. {} remaining", remaining);
        }
    }
}

fn describe<T: ActorEntity>(request: &ResourceRequest<T>) -> String {
    match request {
        ResourceRequest::Create { params, .. } => format!("Create {:?}", params),
        ResourceRequest::Get { id, .. } => format!("Get {}", id),
        ResourceRequest::List { .. } => "List".to_string(),
        ResourceRequest::Update { id, update, .. } => format!("Update {} {:?}", id, update),
        ResourceRequest::Delete { id, .. } => format!("Delete {}", id),
        ResourceRequest::Action { id, action, .. } => format!("Action {} {:?}", id, action),
        ResourceRequest::Shutdown { .. } => "Shutdown".to_string(),
    }
}

/// Queues the reply for one expected request.
pub struct ExpectationBuilder<T: ActorEntity, R> {
    wrap: Box<dyn FnOnce(Result<R, FrameworkError>) -> Expectation<T> + Send>,
    expectations: Queue<T>,
}

impl<T: ActorEntity, R> ExpectationBuilder<T, R> {
    pub fn return_ok(self, value: R) {
        let expectation = (self.wrap)(Ok(value));
        lock(&self.expectations).push_back(expectation);
    }

    pub fn return_err(self, error: FrameworkError) {
        let expectation = (self.wrap)(Err(error));
        lock(&self.expectations).push_back(expectation);
    }
}

/// Creates a client and the receiving end of its channel, for tests that answer
/// requests by hand.
pub fn create_mock_client<T: ActorEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Waits for the next request and returns it if it is a Create.
pub async fn expect_create<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Create, oneshot::Sender<Result<T::Id, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Waits for the next request and returns it if it is an Action.
pub async fn expect_action<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(
    T::Id,
    T::Action,
    oneshot::Sender<Result<T::ActionResult, FrameworkError>>,
)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action {
            id,
            action,
            respond_to,
        }) => Some((id, action, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    #[derive(Clone, Debug, PartialEq)]
    struct Coupon {
        code: String,
        uses: u32,
    }

    #[derive(Debug)]
    struct CouponCreate {
        code: String,
    }

    #[derive(Debug)]
    struct CouponUpdate;

    #[derive(Debug)]
    enum CouponAction {
        Redeem,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("coupon error")]
    struct CouponError;

    #[async_trait]
    impl ActorEntity for Coupon {
        type Id = String;
        type Create = CouponCreate;
        type Update = CouponUpdate;
        type Action = CouponAction;
        type ActionResult = u32;
        type Context = ();
        type Error = CouponError;

        fn id(&self) -> &String {
            &self.code
        }

        fn assigned_id(params: &CouponCreate) -> Option<String> {
            Some(params.code.clone())
        }

        fn from_create_params(code: String, _: CouponCreate) -> Result<Self, CouponError> {
            Ok(Self { code, uses: 0 })
        }

        async fn on_update(&mut self, _: CouponUpdate, _: &()) -> Result<(), CouponError> {
            Ok(())
        }

        async fn handle_action(&mut self, _: CouponAction, _: &()) -> Result<u32, CouponError> {
            self.uses += 1;
            Ok(self.uses)
        }
    }

    #[tokio::test]
    async fn test_raw_receiver_sees_create_payload() {
        let (client, mut receiver) = create_mock_client::<Coupon>(10);

        let create_task = tokio::spawn(async move {
            client
                .create(CouponCreate {
                    code: "SAVE20".to_string(),
                })
                .await
        });

        let (payload, responder) = expect_create(&mut receiver)
            .await
            .expect("Expected Create request");
        assert_eq!(payload.code, "SAVE20");
        responder.send(Ok("SAVE20".to_string())).unwrap();

        let result = create_task.await.unwrap();
        assert_eq!(result.unwrap(), "SAVE20");
    }

    #[tokio::test]
    async fn test_expectations_answer_in_order() {
        let mut mock = MockClient::<Coupon>::new();
        mock.expect_get("SAVE20".to_string()).return_ok(Some(Coupon {
            code: "SAVE20".to_string(),
            uses: 2,
        }));
        mock.expect_action("SAVE20".to_string()).return_ok(3);
        mock.expect_list().return_ok(vec![]);

        let client = mock.client();
        let coupon = client.get("SAVE20".to_string()).await.unwrap().unwrap();
        assert_eq!(coupon.uses, 2);
        let uses = client
            .perform_action("SAVE20".to_string(), CouponAction::Redeem)
            .await
            .unwrap();
        assert_eq!(uses, 3);
        assert!(client.list().await.unwrap().is_empty());

        mock.verify();
        assert_eq!(
            mock.recorded(),
            vec!["Get SAVE20", "Action SAVE20 Redeem", "List"]
        );
    }

    #[tokio::test]
    async fn test_unexpected_request_drops_reply() {
        let mock = MockClient::<Coupon>::new();
        let client = mock.client();

        let result = client.delete("NOPE".to_string()).await;
        assert!(matches!(result, Err(FrameworkError::ActorDropped)));
    }

    #[tokio::test]
    async fn test_delete_and_update_errors() {
        let mut mock = MockClient::<Coupon>::new();
        mock.expect_update("A".to_string())
            .return_err(FrameworkError::NotFound("A".to_string()));
        mock.expect_delete("A".to_string()).return_ok(());

        let client = mock.client();
        let err = client
            .update("A".to_string(), CouponUpdate)
            .await
            .unwrap_err();
        assert!(matches!(err, FrameworkError::NotFound(id) if id == "A"));
        client.delete("A".to_string()).await.unwrap();
        mock.verify();
    }
}
