mod helpers;

use std::sync::Arc;
use std::thread;

use drip::drop::{
    CollectionDrop, Droppable, LiquidDrop, Registry, ASSOCIATION_RELATION, COLLECTION_PROXY,
};
use drip::value::{object, Object};
use drip::{Context, ErrorKind, Value};

use crate::helpers::{proxy, registry, relation, Orphan, Post, PostDrop};

fn drop_of(value: Value) -> drip::drop::DropValue {
    match value {
        Value::Drop(drop) => drop,
        value => panic!("expected drop, got {value:?}"),
    }
}

#[test]
fn registry_same_type_same_drop() {
    let registry = registry();
    let a = Object::new(Post::new("a"));
    let b = Object::new(Post::new("b"));
    let (name_a, _) = registry.factory_for(&a).unwrap();
    let (name_b, _) = registry.factory_for(&b).unwrap();
    assert_eq!(name_a, name_b);
    assert_eq!(&*name_a, "PostDrop");
}

#[test]
fn registry_collection_proxies_share_collection_drop() {
    let registry = Registry::new();
    assert_eq!(
        registry.drop_name_for(COLLECTION_PROXY).unwrap(),
        CollectionDrop::NAME
    );
    assert_eq!(
        registry.drop_name_for(ASSOCIATION_RELATION).unwrap(),
        CollectionDrop::NAME
    );

    let mut ctx = Context::new(Arc::new(registry));
    ctx.set("a", proxy(vec![]));
    ctx.set("b", relation(vec![]));
    assert_eq!(drop_of(ctx.find_variable("a").unwrap()).name(), "CollectionDrop");
    assert_eq!(drop_of(ctx.find_variable("b").unwrap()).name(), "CollectionDrop");
}

#[test]
fn registry_override_beats_convention() {
    struct Draft;

    impl Droppable for Draft {
        fn type_name(&self) -> &str {
            "Draft"
        }
    }

    // `DraftDrop` exists but the override wins
    let registry = Registry::builder()
        .drop::<PostDrop>("PostDrop")
        .drop_with("DraftDrop", |_| unreachable!())
        .override_type("Draft", "PostDrop")
        .build()
        .unwrap();
    assert_eq!(registry.drop_name_for("Draft").unwrap(), "PostDrop");
    let (name, _) = registry.factory_for(&Object::new(Draft)).unwrap();
    assert_eq!(&*name, "PostDrop");
}

#[test]
fn registry_build_fails_for_undeclared_drop() {
    let err = Registry::builder().host("Orphan").build().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
    assert_eq!(
        err.to_string(),
        "no drop registered for host type `Orphan`, expected `OrphanDrop`"
    );
}

#[test]
fn registry_build_fails_for_override_to_missing_drop() {
    let err = Registry::builder()
        .override_type("Post", "MissingDrop")
        .build()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
}

#[test]
fn registry_convert_unregistered_is_config_error() {
    let registry = registry();
    let err = registry.convert(Object::new(Orphan)).err().unwrap();
    assert_eq!(err.kind(), ErrorKind::Config);
}

#[test]
fn registry_concurrent_first_use() {
    let registry = registry();
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let registry = registry.clone();
            thread::spawn(move || {
                let object = Object::new(Post::new(&i.to_string()));
                let (name, factory) = registry.factory_for(&object).unwrap();
                let drop = factory(object);
                (name.to_string(), drop.attribute("title"))
            })
        })
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        let (name, title) = handle.join().unwrap();
        assert_eq!(name, "PostDrop");
        assert_eq!(title, Value::from(i.to_string()));
    }
}

#[test]
fn registry_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Registry>();
    assert_send_sync::<Value>();
}

#[test]
fn drop_only_exposes_declared_attributes() {
    let mut ctx = Context::new(registry());
    ctx.set("post", object(Post::new("Hello")));
    let post = drop_of(ctx.find_variable("post").unwrap());
    assert_eq!(post.attributes(), ["title", "body"]);
    assert_eq!(post.get("title"), Value::from("Hello"));
    assert_eq!(post.get("body"), Value::from("Hello body"));
    assert_eq!(post.get("secret"), Value::None);
    assert_eq!(post.get("type_name"), Value::None);
}

#[test]
fn drop_without_context_capability_ignores_binding() {
    struct Plain(Object);

    impl LiquidDrop for Plain {
        fn attributes(&self) -> &[&'static str] {
            &["kind"]
        }

        fn attribute(&self, _: &str) -> Value {
            Value::from(self.0.type_name())
        }
    }

    let registry = Registry::builder()
        .drop_with("PostDrop", |object| Box::new(Plain(object)))
        .build()
        .unwrap();
    let mut ctx = Context::new(Arc::new(registry));
    ctx.set("post", object(Post::new("Hello")));
    let post = drop_of(ctx.find_variable("post").unwrap());
    assert_eq!(post.get("kind"), Value::from("Post"));
}

#[test]
fn collection_drop_attributes() {
    let mut ctx = Context::new(registry());
    ctx.set("posts", proxy(vec!["a", "b", "c"]));
    let posts = drop_of(ctx.find_variable("posts").unwrap());

    assert_eq!(posts.get("size"), Value::Integer(3));
    assert_eq!(posts.get("empty"), Value::Bool(false));
    assert_eq!(posts.get("any"), Value::Bool(true));

    let first = drop_of(posts.get("first"));
    assert_eq!(first.get("title"), Value::from("a"));
    let last = drop_of(posts.get("last"));
    assert_eq!(last.get("title"), Value::from("c"));

    match posts.get("to_a") {
        Value::List(list) => {
            let titles: Vec<_> = list
                .into_iter()
                .map(|post| drop_of(post).get("title"))
                .collect();
            assert_eq!(titles, [Value::from("a"), Value::from("b"), Value::from("c")]);
        }
        value => panic!("expected list, got {value:?}"),
    }

    assert_eq!(posts.get("each"), Value::None);
}

#[test]
fn collection_drop_empty() {
    let mut ctx = Context::new(registry());
    ctx.set("posts", relation(vec![]));
    let posts = drop_of(ctx.find_variable("posts").unwrap());
    assert_eq!(posts.get("size"), Value::Integer(0));
    assert_eq!(posts.get("empty"), Value::Bool(true));
    assert_eq!(posts.get("any"), Value::Bool(false));
    assert_eq!(posts.get("first"), Value::None);
    assert_eq!(posts.get("last"), Value::None);
}

#[test]
fn collection_drop_member_without_drop_is_config_error() {
    struct Orphans;

    impl Droppable for Orphans {
        fn type_name(&self) -> &str {
            COLLECTION_PROXY
        }

        fn members(&self) -> Option<Vec<Value>> {
            Some(vec![object(Post::new("a")), object(Orphan)])
        }
    }

    let mut ctx = Context::new(registry());
    ctx.set("orphans", object(Orphans));
    let err = ctx.find_variable("orphans").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
    assert_eq!(
        err.to_string(),
        "no drop registered for host type `Orphan`, expected `OrphanDrop`"
    );
}

#[test]
fn collection_drop_unbound_has_raw_members() {
    let registry = registry();
    let Value::Object(posts) = proxy(vec!["a"]) else {
        panic!("expected object");
    };
    let (_, drop) = registry.convert(posts).unwrap();
    assert!(matches!(drop.attribute("first"), Value::Object(_)));
    assert_eq!(drop.attribute("size"), Value::Integer(1));
}
