use actor_framework::{ActorEntity, FrameworkError, ResourceActor};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};

// --- Test Entity ---

#[derive(Clone, Debug, PartialEq)]
struct Locker {
    id: u32,
    label: String,
    items: Vec<String>,
}

#[derive(Debug)]
struct LockerCreate {
    id: Option<u32>,
    label: String,
}

#[derive(Debug)]
struct LockerUpdate {
    label: Option<String>,
}

#[derive(Debug)]
enum LockerAction {
    Store(String),
    /// Stores the item, then fails if the locker is now over capacity.
    StoreChecked(String, usize),
}

#[derive(Debug, thiserror::Error, PartialEq)]
enum LockerError {
    #[error("label must not be empty")]
    EmptyLabel,
    #[error("locker full")]
    Full,
}

#[async_trait]
impl ActorEntity for Locker {
    type Id = u32;
    type Create = LockerCreate;
    type Update = LockerUpdate;
    type Action = LockerAction;
    type ActionResult = usize;
    type Context = ();
    type Error = LockerError;

    fn id(&self) -> &u32 {
        &self.id
    }

    fn assigned_id(params: &LockerCreate) -> Option<u32> {
        params.id
    }

    fn from_create_params(id: u32, params: LockerCreate) -> Result<Self, Self::Error> {
        if params.label.is_empty() {
            return Err(LockerError::EmptyLabel);
        }
        Ok(Self {
            id,
            label: params.label,
            items: Vec::new(),
        })
    }

    async fn on_update(&mut self, update: LockerUpdate, _ctx: &()) -> Result<(), Self::Error> {
        if let Some(label) = update.label {
            self.label = label;
            if self.label.is_empty() {
                return Err(LockerError::EmptyLabel);
            }
        }
        Ok(())
    }

    async fn handle_action(&mut self, action: LockerAction, _ctx: &()) -> Result<usize, Self::Error> {
        match action {
            LockerAction::Store(item) => {
                self.items.push(item);
                Ok(self.items.len())
            }
            LockerAction::StoreChecked(item, capacity) => {
                self.items.push(item);
                if self.items.len() > capacity {
                    return Err(LockerError::Full);
                }
                Ok(self.items.len())
            }
        }
    }
}

fn spawn_lockers() -> actor_framework::ResourceClient<Locker> {
    let counter = AtomicU32::new(1);
    let (actor, client) = ResourceActor::with_id_generator(10, move || {
        counter.fetch_add(1, Ordering::SeqCst)
    });
    tokio::spawn(actor.run(()));
    client
}

fn create(label: &str) -> LockerCreate {
    LockerCreate {
        id: None,
        label: label.to_string(),
    }
}

// --- Tests ---

#[tokio::test]
async fn test_framework_full_lifecycle() {
    let client = spawn_lockers();

    let id = client.create(create("gym")).await.unwrap();
    assert_eq!(id, 1);

    let count = client
        .perform_action(id, LockerAction::Store("towel".into()))
        .await
        .unwrap();
    assert_eq!(count, 1);

    let updated = client
        .update(
            id,
            LockerUpdate {
                label: Some("pool".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.label, "pool");
    assert_eq!(updated.items, vec!["towel".to_string()]);

    client.delete(id).await.unwrap();
    assert!(client.get(id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_failed_action_rolls_back() {
    let client = spawn_lockers();
    let id = client.create(create("gym")).await.unwrap();

    client
        .perform_action(id, LockerAction::StoreChecked("towel".into(), 1))
        .await
        .unwrap();
    let err = client
        .perform_action(id, LockerAction::StoreChecked("shoes".into(), 1))
        .await
        .unwrap_err();
    assert_eq!(err.into_entity_error::<LockerError>().unwrap(), LockerError::Full);

    let locker = client.get(id).await.unwrap().unwrap();
    assert_eq!(locker.items, vec!["towel".to_string()]);
}

#[tokio::test]
async fn test_failed_update_rolls_back() {
    let client = spawn_lockers();
    let id = client.create(create("gym")).await.unwrap();

    let err = client
        .update(
            id,
            LockerUpdate {
                label: Some(String::new()),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, FrameworkError::EntityError(_)));
    assert_eq!(client.get(id).await.unwrap().unwrap().label, "gym");
}

#[tokio::test]
async fn test_assigned_ids_and_duplicates() {
    let client = spawn_lockers();

    let id = client
        .create(LockerCreate {
            id: Some(42),
            label: "vip".into(),
        })
        .await
        .unwrap();
    assert_eq!(id, 42);

    let err = client
        .create(LockerCreate {
            id: Some(42),
            label: "again".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, FrameworkError::AlreadyExists(ref id) if id == "42"));

    let err = client.create(create("")).await.unwrap_err();
    assert_eq!(
        err.into_entity_error::<LockerError>().unwrap(),
        LockerError::EmptyLabel
    );
    assert_eq!(client.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_missing_id_without_generator() {
    let (actor, client) = ResourceActor::<Locker>::new(10);
    tokio::spawn(actor.run(()));

    let err = client.create(create("gym")).await.unwrap_err();
    assert!(matches!(err, FrameworkError::MissingId));
}

#[tokio::test]
async fn test_seed_and_shutdown() {
    let (mut actor, client) = ResourceActor::<Locker>::new(10);
    actor.seed(vec![
        Locker {
            id: 7,
            label: "a".into(),
            items: vec![],
        },
        Locker {
            id: 8,
            label: "b".into(),
            items: vec![],
        },
    ]);
    assert_eq!(actor.len(), 2);
    let handle = tokio::spawn(actor.run(()));

    assert_eq!(client.get(8).await.unwrap().unwrap().label, "b");
    assert_eq!(client.shutdown().await, 2);
    handle.await.unwrap();

    assert!(matches!(
        client.get(7).await,
        Err(FrameworkError::ActorClosed)
    ));
    assert_eq!(client.shutdown().await, 0);
}
