use defer_di::{DiError, ServiceCollection, Resolver};
use std::sync::{Arc, Mutex};

#[test]
fn test_concrete_singleton() {
    let mut sc = ServiceCollection::new();
    sc.add_singleton(42usize);
    sc.add_singleton("hello".to_string());

    let sp = sc.build();

    let num1 = sp.get_required::<usize>();
    let num2 = sp.get_required::<usize>();
    let str1 = sp.get_required::<String>();
    let str2 = sp.get_required::<String>();

    assert_eq!(*num1, 42);
    assert_eq!(*str1, "hello");
    assert!(Arc::ptr_eq(&num1, &num2)); // Same instance
    assert!(Arc::ptr_eq(&str1, &str2)); // Same instance
}

#[test]
fn test_factory_with_dependencies() {
    #[derive(Debug)]
    struct Config {
        port: u16,
    }

    #[derive(Debug)]
    struct Server {
        config: Arc<Config>,
        name: String,
    }

    let mut sc = ServiceCollection::new();
    sc.add_singleton(Config { port: 8080 });
    sc.add_singleton_factory::<Server, _>(|r| Server {
        config: r.get_required::<Config>(),
        name: "MyServer".to_string(),
    });

    let sp = sc.build();
    let server = sp.get_required::<Server>();

    assert_eq!(server.config.port, 8080);
    assert_eq!(server.name, "MyServer");
}

#[test]
fn test_singleton_factory_runs_once() {
    let counter = Arc::new(Mutex::new(0));
    let counter_clone = counter.clone();

    let mut sc = ServiceCollection::new();
    sc.add_singleton_factory::<String, _>(move |_| {
        let mut c = counter_clone.lock().unwrap();
        *c += 1;
        format!("instance-{}", *c)
    });

    let sp = sc.build();
    let a = sp.get_required::<String>();
    let b = sp.get_required::<String>();

    assert_eq!(*a, "instance-1");
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(*counter.lock().unwrap(), 1);
}

#[test]
fn test_transient_creates_new_instances() {
    let counter = Arc::new(Mutex::new(0));
    let counter_clone = counter.clone();

    let mut sc = ServiceCollection::new();
    sc.add_transient_factory::<String, _>(move |_| {
        let mut c = counter_clone.lock().unwrap();
        *c += 1;
        format!("instance-{}", *c)
    });

    let sp = sc.build();

    let a = sp.get_required::<String>();
    let b = sp.get_required::<String>();
    let c = sp.get_required::<String>();

    assert_eq!(*a, "instance-1");
    assert_eq!(*b, "instance-2");
    assert_eq!(*c, "instance-3");

    assert!(!Arc::ptr_eq(&a, &b));
    assert!(!Arc::ptr_eq(&b, &c));
}

#[test]
fn test_scoped_resolution() {
    let counter = Arc::new(Mutex::new(0));
    let counter_clone = counter.clone();

    let mut sc = ServiceCollection::new();
    sc.add_scoped_factory::<String, _>(move |_| {
        let mut c = counter_clone.lock().unwrap();
        *c += 1;
        format!("scoped-{}", *c)
    });

    let sp = sc.build();

    // Same scope should have same instance
    let scope1 = sp.create_scope();
    let s1a = scope1.get_required::<String>();
    let s1b = scope1.get_required::<String>();
    assert!(Arc::ptr_eq(&s1a, &s1b));

    // Different scope should have different instance
    let scope2 = sp.create_scope();
    let s2 = scope2.get_required::<String>();
    assert!(!Arc::ptr_eq(&s1a, &s2));
}

#[test]
fn test_scoped_from_root_is_an_error() {
    let mut sc = ServiceCollection::new();
    sc.add_scoped_factory::<String, _>(|_| "scoped".to_string());

    let sp = sc.build();
    assert!(matches!(sp.get::<String>(), Err(DiError::WrongLifetime(_))));
}

#[test]
fn test_singletons_shared_across_scopes() {
    let mut sc = ServiceCollection::new();
    sc.add_singleton(7u64);

    let sp = sc.build();
    let root = sp.get_required::<u64>();
    let scoped = sp.create_scope().get_required::<u64>();
    assert!(Arc::ptr_eq(&root, &scoped));
}

#[test]
fn test_not_found_error() {
    struct UnregisteredType;

    let sc = ServiceCollection::new();
    let sp = sc.build();

    match sp.get::<UnregisteredType>() {
        Err(DiError::NotFound(name)) => assert!(name.contains("UnregisteredType")),
        _ => panic!("Expected NotFound when resolving unregistered type"),
    }
}

#[test]
fn test_replace_semantics_for_plain_registration() {
    let mut sc = ServiceCollection::new();

    // Plain registration replaces: last one wins.
    sc.add_singleton(1usize);
    sc.add_singleton(2usize);

    let sp = sc.build();
    assert_eq!(*sp.get_required::<usize>(), 2);
}
