use std::sync::Arc;

use drip::drop::{Droppable, LiquidDrop, Registry};
use drip::value::{object, Object};
use drip::{Environment, Value};
use rand::Rng;

#[derive(serde::Serialize)]
pub struct Site {
    pub title: String,
    pub users: Vec<User>,
}

#[derive(serde::Serialize)]
pub struct User {
    pub name: String,
    pub age: u32,
    pub is_disabled: bool,
}

impl Droppable for User {
    fn type_name(&self) -> &str {
        "User"
    }
}

pub struct UserDrop(Object);

impl From<Object> for UserDrop {
    fn from(object: Object) -> Self {
        Self(object)
    }
}

impl LiquidDrop for UserDrop {
    fn attributes(&self) -> &[&'static str] {
        &["name", "age"]
    }

    fn attribute(&self, name: &str) -> Value {
        let Some(user) = self.0.downcast_ref::<User>() else {
            return Value::None;
        };
        match name {
            "name" => Value::from(user.name.as_str()),
            "age" => Value::from(user.age),
            _ => Value::None,
        }
    }
}

fn word(rng: &mut impl Rng) -> String {
    (0..20).map(|_| rng.gen_range('a'..='z')).collect()
}

pub fn user() -> User {
    let mut rng = rand::thread_rng();
    User {
        name: word(&mut rng),
        age: rng.gen_range(21..100),
        is_disabled: rng.gen_ratio(1, 4),
    }
}

pub fn random(n: usize) -> Site {
    let mut rng = rand::thread_rng();
    Site {
        title: word(&mut rng),
        users: (0..n).map(|_| user()).collect(),
    }
}

/// Returns `n` environments with random names, none of which are `title`.
pub fn environments(n: usize) -> Vec<Environment> {
    let mut rng = rand::thread_rng();
    (0..n)
        .map(|_| Environment::from_iter((0..10).map(|_| (word(&mut rng), Value::from(1)))))
        .collect()
}

pub fn registry() -> Arc<Registry> {
    let registry = Registry::builder()
        .drop::<UserDrop>("UserDrop")
        .host("User")
        .build()
        .unwrap();
    Arc::new(registry)
}

pub fn host() -> Value {
    object(user())
}
