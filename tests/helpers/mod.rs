#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use drip::context::ContextRef;
use drip::drop::{
    Droppable, LiquidDrop, Registry, ASSOCIATION_RELATION, COLLECTION_PROXY,
};
use drip::value::{object, Object};
use drip::Value;

pub struct Post {
    pub title: String,
    pub body: String,
    pub secret: String,
}

impl Post {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_owned(),
            body: format!("{title} body"),
            secret: String::from("hunter2"),
        }
    }
}

impl Droppable for Post {
    fn type_name(&self) -> &str {
        "Post"
    }
}

pub struct PostDrop(Object);

impl From<Object> for PostDrop {
    fn from(object: Object) -> Self {
        Self(object)
    }
}

impl LiquidDrop for PostDrop {
    fn attributes(&self) -> &[&'static str] {
        &["title", "body"]
    }

    fn attribute(&self, name: &str) -> Value {
        let post = match self.0.downcast_ref::<Post>() {
            Some(post) => post,
            None => return Value::None,
        };
        match name {
            "title" => Value::from(post.title.as_str()),
            "body" => Value::from(post.body.as_str()),
            // never reachable through `DropValue::get`
            "secret" => Value::from(post.secret.as_str()),
            _ => Value::None,
        }
    }
}

/// A host type whose drop wants to see the context.
pub struct Page;

impl Droppable for Page {
    fn type_name(&self) -> &str {
        "Page"
    }
}

#[derive(Default)]
pub struct PageDrop {
    ctx: Option<ContextRef>,
}

impl LiquidDrop for PageDrop {
    fn attributes(&self) -> &[&'static str] {
        &["bound", "locale"]
    }

    fn attribute(&self, name: &str) -> Value {
        match name {
            "bound" => Value::Bool(self.ctx.is_some()),
            "locale" => self
                .ctx
                .as_ref()
                .and_then(|ctx| ctx.register("locale"))
                .unwrap_or_default(),
            _ => Value::None,
        }
    }

    fn bind_context(&mut self, ctx: ContextRef) -> drip::Result<()> {
        self.ctx = Some(ctx);
        Ok(())
    }
}

/// A host type that nobody registered a drop for.
pub struct Orphan;

impl Droppable for Orphan {
    fn type_name(&self) -> &str {
        "Orphan"
    }
}

/// A relational collection, reporting one of the two proxy type names.
pub struct Relation {
    pub name: &'static str,
    pub posts: Vec<&'static str>,
}

impl Droppable for Relation {
    fn type_name(&self) -> &str {
        self.name
    }

    fn members(&self) -> Option<Vec<Value>> {
        Some(self.posts.iter().map(|t| object(Post::new(t))).collect())
    }
}

pub fn proxy(posts: Vec<&'static str>) -> Value {
    object(Relation {
        name: COLLECTION_PROXY,
        posts,
    })
}

pub fn relation(posts: Vec<&'static str>) -> Value {
    object(Relation {
        name: ASSOCIATION_RELATION,
        posts,
    })
}

pub fn registry() -> Arc<Registry> {
    let registry = Registry::builder()
        .drop::<PostDrop>("PostDrop")
        .drop_with("PageDrop", |_| Box::<PageDrop>::default())
        .host("Post")
        .host("Page")
        .build()
        .unwrap();
    Arc::new(registry)
}

/// Returns a lazy producer and a counter of how often it ran.
pub fn counting(value: Value) -> (impl FnOnce() -> Value + Send + 'static, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let c = calls.clone();
    let f = move || {
        c.fetch_add(1, Ordering::SeqCst);
        value
    };
    (f, calls)
}

pub fn calls(counter: &AtomicUsize) -> usize {
    counter.load(Ordering::SeqCst)
}
