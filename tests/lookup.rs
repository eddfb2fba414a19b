//! Registration and lookup glue: add-if-absent registration, async lookup
//! accessors, synchronous fallback, and lifetime handling for resolver
//! instances.

use defer_di::{DiError, Lifetime, ServiceCollection, ServiceProvider};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, PartialEq)]
struct Endpoint {
    url: String,
}

#[tokio::test]
async fn value_types_resolve_through_registration_and_lookup() {
    let mut services = ServiceCollection::new();
    services.try_add_async_resolver::<u32, _>(
        |_: ServiceProvider| async {
            tokio::time::sleep(std::time::Duration::from_millis(3)).await;
            Ok(Arc::new(42u32))
        },
        Lifetime::Singleton,
    );

    let provider = services.build();
    let value = provider.get_required_async::<u32>().await.unwrap();
    assert_eq!(*value, 42);
}

#[tokio::test]
async fn reference_types_resolve_through_registration_and_lookup() {
    let mut services = ServiceCollection::new();
    services.try_add_async_resolver::<Endpoint, _>(
        |_: ServiceProvider| async {
            Ok(Arc::new(Endpoint {
                url: "https://api.internal/v2".to_string(),
            }))
        },
        Lifetime::Singleton,
    );

    let provider = services.build();
    let endpoint = provider.get_required_async::<Endpoint>().await.unwrap();
    assert_eq!(endpoint.url, "https://api.internal/v2");
}

#[tokio::test]
async fn try_add_never_overwrites_an_existing_registration() {
    let first_calls = Arc::new(AtomicUsize::new(0));
    let second_calls = Arc::new(AtomicUsize::new(0));

    let mut services = ServiceCollection::new();
    let counting = first_calls.clone();
    services.try_add_async_resolver::<u32, _>(
        move |_: ServiceProvider| {
            let calls = counting.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(Arc::new(1u32))
            }
        },
        Lifetime::Singleton,
    );
    let counting = second_calls.clone();
    services.try_add_async_resolver::<u32, _>(
        move |_: ServiceProvider| {
            let calls = counting.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(Arc::new(2u32))
            }
        },
        Lifetime::Singleton,
    );

    let provider = services.build();
    let value = provider.get_required_async::<u32>().await.unwrap();

    assert_eq!(*value, 1);
    assert_eq!(first_calls.load(Ordering::SeqCst), 1);
    assert_eq!(second_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn get_async_returns_none_when_nothing_is_registered() {
    let provider = ServiceCollection::new().build();
    let result = provider.get_async::<Endpoint>().await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn get_required_async_errors_when_nothing_is_registered() {
    let provider = ServiceCollection::new().build();
    match provider.get_required_async::<Endpoint>().await {
        Err(DiError::NotFound(name)) => assert!(name.contains("Endpoint")),
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn lookup_falls_back_to_synchronous_registrations() {
    let mut services = ServiceCollection::new();
    services.add_singleton(Endpoint {
        url: "https://sync.internal".to_string(),
    });

    let provider = services.build();
    let endpoint = provider.get_async::<Endpoint>().await.unwrap().unwrap();
    assert_eq!(endpoint.url, "https://sync.internal");

    let required = provider.get_required_async::<Endpoint>().await.unwrap();
    assert!(Arc::ptr_eq(&endpoint, &required));
}

#[tokio::test]
async fn async_resolver_takes_precedence_over_sync_registration() {
    let mut services = ServiceCollection::new();
    services.add_singleton(1u32);
    services.try_add_async_resolver::<u32, _>(|_: ServiceProvider| async { Ok(Arc::new(2u32)) }, Lifetime::Singleton);

    let provider = services.build();
    let value = provider.get_required_async::<u32>().await.unwrap();
    assert_eq!(*value, 2);
}

#[tokio::test]
async fn faults_propagate_through_the_lookup_accessors() {
    let mut services = ServiceCollection::new();
    services.try_add_async_resolver::<Endpoint, _>(
        |_: ServiceProvider| async { Err(DiError::fault("endpoint discovery failed")) },
        Lifetime::Singleton,
    );

    let provider = services.build();
    let err = provider.get_required_async::<Endpoint>().await.unwrap_err();
    assert!(err.is_faulted());
    assert!(err.to_string().contains("endpoint discovery failed"));

    // The optional accessor propagates the fault too; absence is only
    // reported for missing registrations.
    assert!(provider.get_async::<Endpoint>().await.is_err());
}

#[tokio::test]
async fn singleton_resolver_memoizes_across_scopes() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counting = calls.clone();

    let mut services = ServiceCollection::new();
    services.try_add_async_resolver::<Endpoint, _>(
        move |_: ServiceProvider| {
            let calls = counting.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(Arc::new(Endpoint {
                    url: "https://shared.internal".to_string(),
                }))
            }
        },
        Lifetime::Singleton,
    );

    let provider = services.build();
    let root = provider.get_required_async::<Endpoint>().await.unwrap();
    let scope1 = provider.create_scope();
    let scope2 = provider.create_scope();
    let a = scope1.get_required_async::<Endpoint>().await.unwrap();
    let b = scope2.get_required_async::<Endpoint>().await.unwrap();

    assert!(Arc::ptr_eq(&root, &a));
    assert!(Arc::ptr_eq(&root, &b));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn scoped_resolver_memoizes_per_scope() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counting = calls.clone();

    let mut services = ServiceCollection::new();
    services.try_add_async_resolver::<u32, _>(
        move |_: ServiceProvider| {
            let calls = counting.clone();
            async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                Ok(Arc::new(n as u32))
            }
        },
        Lifetime::Scoped,
    );

    let provider = services.build();

    let scope1 = provider.create_scope();
    assert_eq!(*scope1.get_required_async::<u32>().await.unwrap(), 1);
    assert_eq!(*scope1.get_required_async::<u32>().await.unwrap(), 1);

    let scope2 = provider.create_scope();
    assert_eq!(*scope2.get_required_async::<u32>().await.unwrap(), 2);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn scoped_resolver_from_the_root_provider_is_an_error() {
    let mut services = ServiceCollection::new();
    services.try_add_async_resolver::<u32, _>(|_: ServiceProvider| async { Ok(Arc::new(1u32)) }, Lifetime::Scoped);

    let provider = services.build();
    match provider.get_required_async::<u32>().await {
        Err(DiError::WrongLifetime(_)) => {}
        other => panic!("expected WrongLifetime, got {:?}", other),
    }
}

#[tokio::test]
async fn transient_resolver_is_rebuilt_on_every_lookup() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counting = calls.clone();

    let mut services = ServiceCollection::new();
    services.try_add_async_resolver::<u32, _>(
        move |_: ServiceProvider| {
            let calls = counting.clone();
            async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                Ok(Arc::new(n as u32))
            }
        },
        Lifetime::Transient,
    );

    let provider = services.build();

    // A fresh resolver instance per lookup means a fresh cache slot per
    // lookup: the factory runs every time.
    assert_eq!(*provider.get_required_async::<u32>().await.unwrap(), 1);
    assert_eq!(*provider.get_required_async::<u32>().await.unwrap(), 2);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn async_factories_resolve_their_own_dependencies() {
    let mut services = ServiceCollection::new();
    services.add_singleton("https://config.internal".to_string());
    services.try_add_async_resolver::<Endpoint, _>(
        |provider: ServiceProvider| async move {
            use defer_di::Resolver;
            let base = provider.get::<String>()?;
            Ok(Arc::new(Endpoint {
                url: format!("{}/v2", base),
            }))
        },
        Lifetime::Singleton,
    );

    let provider = services.build();
    let endpoint = provider.get_required_async::<Endpoint>().await.unwrap();
    assert_eq!(endpoint.url, "https://config.internal/v2");
}
